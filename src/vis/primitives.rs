//! The four diagnostic primitive families.
//!
//! Each family has a pure builder returning the markers and a `publish_*`
//! entry point that builds the markers and hands them to a [`MarkerSink`].
//! Nothing is kept between calls.

use super::config::{VisConfig, MAX_MARKER_ID};
use super::marker::{Color, Marker, MarkerBatch, MarkerKind};
use super::sink::MarkerSink;
use super::VisContext;
use crate::common::types::{PathSource, Point2D};
use crate::error::VisError;
use nalgebra::{Point3, Vector3};

/// Namespace suffix of the filled circle
pub const CIRCLE_NS: &str = "_circle_";
/// Namespace suffix of the unfilled circle dots
pub const UNFILLED_CIRCLE_NS: &str = "unfilled_circle_";
/// Namespace suffix of the point cube
pub const POINT_NS: &str = "_point_";
/// Namespace suffix of the cross-track error dots
pub const CT_ERROR_NS: &str = "_ct_error_";

/// Slack applied when counting cross-track steps so that lookahead
/// distances which are exact multiples of the step are not cut short
const STEP_TOLERANCE: f64 = 1e-9;

fn lifted(pt: Point2D, config: &VisConfig) -> Point3<f64> {
    Point3::new(pt.0, pt.1, config.elevation)
}

fn dot(ctx: &VisContext, ns: &str, id: u32, pt: Point2D, color: Color) -> Marker {
    let config = &ctx.config;
    Marker::new(
        ns,
        id,
        &ctx.frame_id,
        MarkerKind::Pin,
        lifted(pt, config),
        Vector3::new(config.dot_diameter, config.dot_diameter, config.dot_height),
        color,
    )
}

/// Filled disk of radius `r` centred on `cc`.
///
/// A non-positive radius is drawn as is, giving a degenerate disk.
pub fn circle_marker(cc: Point2D, r: f64, ctx: &VisContext) -> Marker {
    let config = &ctx.config;
    Marker::new(
        &ctx.ns(CIRCLE_NS),
        0,
        &ctx.frame_id,
        MarkerKind::Disk,
        lifted(cc, config),
        Vector3::new(2.0 * r, 2.0 * r, config.disk_thickness),
        Color::GREEN,
    )
}

/// Ring of `ring_markers` dots on the circle of radius `r` around `cc`,
/// starting at angle zero and going counter-clockwise.
pub fn unfilled_circle_markers(cc: Point2D, r: f64, ctx: &VisContext) -> MarkerBatch {
    let ns = ctx.ns(UNFILLED_CIRCLE_NS);
    let del_theta = ctx.config.ring_step();

    (0..ctx.config.ring_markers.min(MAX_MARKER_ID))
        .map(|i| {
            let theta = i as f64 * del_theta;
            let pt = (cc.0 + r * theta.cos(), cc.1 + r * theta.sin());
            dot(ctx, &ns, i as u32, pt, Color::GREEN)
        })
        .collect()
}

/// Flat square at `pt`
pub fn point_marker(pt: Point2D, ctx: &VisContext) -> Marker {
    let config = &ctx.config;
    Marker::new(
        &ctx.ns(POINT_NS),
        0,
        &ctx.frame_id,
        MarkerKind::Cube,
        lifted(pt, config),
        Vector3::new(config.point_size, config.point_size, 0.0),
        Color::BLUE,
    )
}

/// Number of cross-track dots drawn for a lookahead distance.
///
/// Zero for negative or non-finite distances, and for lines that would need
/// more than `max_steps` dots. The cap never exceeds [`MAX_MARKER_ID`].
pub fn ct_error_steps(la_dis: f64, step: f64, max_steps: usize) -> usize {
    if !la_dis.is_finite() || la_dis < 0.0 || !step.is_finite() || step <= 0.0 {
        return 0;
    }
    let max_steps = max_steps.min(MAX_MARKER_ID);
    let intervals = (la_dis / step + STEP_TOLERANCE).floor();
    if intervals >= max_steps as f64 {
        return 0;
    }
    intervals as usize + 1
}

/// Dotted cross-track error line anchored at the path pose `closest_pt_idx`.
///
/// Dots are placed every `ct_error_step` from zero up to and including
/// `la_dis`, using the configured [`CrossTrackFormula`](super::config::CrossTrackFormula).
/// Fails without producing anything when the index is outside the path.
pub fn ct_error_markers<P>(
    closest_pt_idx: usize,
    global_plan: &P,
    la_dis: f64,
    alpha: f64,
    ctx: &VisContext,
) -> Result<MarkerBatch, VisError>
where
    P: PathSource + ?Sized,
{
    let closest_pose = global_plan
        .position(closest_pt_idx)
        .ok_or_else(|| VisError::InvalidIndex {
            index: closest_pt_idx,
            len: global_plan.len(),
        })?;

    let config = &ctx.config;
    let steps = ct_error_steps(la_dis, config.ct_error_step, config.max_ct_markers);
    if steps == 0 {
        log::warn!(
            "No cross-track markers for lookahead distance {} (step {}, at most {} markers)",
            la_dis,
            config.ct_error_step,
            config.max_ct_markers
        );
        return Ok(MarkerBatch::new());
    }

    let ns = ctx.ns(CT_ERROR_NS);
    let batch = (0..steps)
        .map(|i| {
            let len = i as f64 * config.ct_error_step;
            let pt = config.ct_formula.point(closest_pose, la_dis, alpha, len);
            dot(ctx, &ns, i as u32, pt, Color::RED)
        })
        .collect();

    Ok(batch)
}

/// Publish the filled circle as a single marker
pub fn publish_circle<S>(cc: Point2D, r: f64, sink: &S, ctx: &VisContext) -> Result<(), VisError>
where
    S: MarkerSink + ?Sized,
{
    let marker = circle_marker(cc, r, ctx);
    log::debug!("Publishing circle r={:.3} at ({:.3}, {:.3})", r, cc.0, cc.1);
    sink.publish_marker(&marker)
}

/// Publish the unfilled circle as one batch
pub fn publish_unfilled_circle<S>(
    cc: Point2D,
    r: f64,
    sink: &S,
    ctx: &VisContext,
) -> Result<(), VisError>
where
    S: MarkerSink + ?Sized,
{
    let batch = unfilled_circle_markers(cc, r, ctx);
    log::debug!(
        "Publishing unfilled circle r={:.3} at ({:.3}, {:.3}) with {} markers",
        r,
        cc.0,
        cc.1,
        batch.len()
    );
    sink.publish_batch(&batch)
}

/// Publish the point as a single marker
pub fn publish_point<S>(pt: Point2D, sink: &S, ctx: &VisContext) -> Result<(), VisError>
where
    S: MarkerSink + ?Sized,
{
    let marker = point_marker(pt, ctx);
    log::debug!("Publishing point at ({:.3}, {:.3})", pt.0, pt.1);
    sink.publish_marker(&marker)
}

/// Publish the cross-track error line as one batch.
///
/// An out-of-range index is logged and returned before anything reaches the
/// sink.
pub fn publish_ct_error_line<P, S>(
    closest_pt_idx: usize,
    global_plan: &P,
    la_dis: f64,
    alpha: f64,
    sink: &S,
    ctx: &VisContext,
) -> Result<(), VisError>
where
    P: PathSource + ?Sized,
    S: MarkerSink + ?Sized,
{
    let batch = match ct_error_markers(closest_pt_idx, global_plan, la_dis, alpha, ctx) {
        Ok(batch) => batch,
        Err(e) => {
            log::warn!("Skipping cross-track error line: {}", e);
            return Err(e);
        }
    };
    log::debug!(
        "Publishing cross-track error line from index {} with {} markers",
        closest_pt_idx,
        batch.len()
    );
    sink.publish_batch(&batch)
}

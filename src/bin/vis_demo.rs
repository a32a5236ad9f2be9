use anyhow::Result;
use log::{error, info, LevelFilter};
use pursuit_vis::common::logger::logger_init;
use pursuit_vis::{
    publish_circle, publish_ct_error_line, publish_point, publish_unfilled_circle, LogSink,
    Point2D, VisConfig, VisContext,
};
use std::collections::HashMap;

fn main() -> Result<()> {
    logger_init(LevelFilter::Debug)?;
    info!("Initializing pursuit visualization demo...");

    // Configure the generators
    let mut params = HashMap::new();
    params.insert("ring_markers".to_string(), 50.0);
    params.insert("ct_error_step".to_string(), 0.1);

    let mut config = VisConfig::default();
    if let Err(e) = config.configure(&params) {
        error!("Failed to configure visualization: {}", e);
        return Err(e.into());
    }

    let ctx = VisContext::new("map", "/pure_pursuit").with_config(config);
    let sink = LogSink::new();

    let center = (0.0, 0.0);
    let radius = 1.0;
    let lookahead_point = (3.0, 4.0);
    let path: Vec<Point2D> = vec![(5.0, 5.0), (6.0, 5.5), (7.0, 6.0)];

    info!("Pursued arc center {:?} radius {}", center, radius);
    publish_circle(center, radius, &sink, &ctx)?;
    publish_unfilled_circle(center, radius, &sink, &ctx)?;

    info!("Lookahead point {:?}", lookahead_point);
    publish_point(lookahead_point, &sink, &ctx)?;

    info!("Cross-track error from path index 0");
    publish_ct_error_line(0, &path, 0.3, 0.0, &sink, &ctx)?;

    // An index past the end of the path is rejected before delivery
    if let Err(e) = publish_ct_error_line(path.len(), &path, 0.3, 0.0, &sink, &ctx) {
        info!("Rejected as expected: {}", e);
    }

    info!("Demo complete");
    Ok(())
}

use anyhow::{Error, Result};
use log::{debug, info, warn, LevelFilter};
use pursuit_vis::common::logger::logger_init;
use pursuit_vis::{
    publish_circle, publish_ct_error_line, publish_point, publish_unfilled_circle, PathSource,
    Point2D, Pose2D, VisConfig, VisContext,
};
use rclrs::{
    Context, CreateBasicExecutor, Node, RclrsErrorFilter, SpinOptions, QOS_PROFILE_DEFAULT,
};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use nav_msgs::msg::{Odometry, Path};
use visualization_msgs::msg::{Marker, MarkerArray};

/// Below this |sin α| the pursued arc is treated as a straight line
const STRAIGHT_EPS: f64 = 1e-6;

struct PursuitVisNode {
    node: Arc<Node>,
    ctx: VisContext,
    lookahead_distance: f64,
    circle_publisher: Arc<rclrs::Publisher<Marker>>,
    unfilled_circle_publisher: Arc<rclrs::Publisher<MarkerArray>>,
    point_publisher: Arc<rclrs::Publisher<Marker>>,
    ct_error_publisher: Arc<rclrs::Publisher<MarkerArray>>,
    path_subscription: Mutex<Option<Arc<rclrs::Subscription<Path>>>>,
    odom_subscription: Mutex<Option<Arc<rclrs::Subscription<Odometry>>>>,
    running: Arc<Mutex<bool>>,
    current_path: Arc<Mutex<Option<Path>>>,
    current_pose: Arc<Mutex<Pose2D>>, // (x, y, theta)
}

impl PursuitVisNode {
    pub fn new(executor: &rclrs::Executor, name: &str) -> Result<Arc<Self>, rclrs::RclrsError> {
        let node = executor.create_node(name)?;

        // Default parameters
        let lookahead_distance = 0.8;
        let frame_id = "map";
        let path_topic = "/prometheus/planned_path";
        let odom_topic = "/prometheus/odom";

        info!(
            "Using parameters: lookahead_distance={}, frame_id={}",
            lookahead_distance, frame_id
        );
        info!("Topics: path={}, odom={}", path_topic, odom_topic);

        let ctx = VisContext::new(frame_id, &format!("/{}", name)).with_config(VisConfig::default());

        let circle_publisher =
            node.create_publisher::<Marker>("/prometheus/vis/circle", QOS_PROFILE_DEFAULT)?;
        let unfilled_circle_publisher = node.create_publisher::<MarkerArray>(
            "/prometheus/vis/unfilled_circle",
            QOS_PROFILE_DEFAULT,
        )?;
        let point_publisher =
            node.create_publisher::<Marker>("/prometheus/vis/point", QOS_PROFILE_DEFAULT)?;
        let ct_error_publisher =
            node.create_publisher::<MarkerArray>("/prometheus/vis/ct_error", QOS_PROFILE_DEFAULT)?;

        let vis_node = Arc::new(PursuitVisNode {
            node,
            ctx,
            lookahead_distance,
            circle_publisher,
            unfilled_circle_publisher,
            point_publisher,
            ct_error_publisher,
            path_subscription: None.into(),
            odom_subscription: None.into(),
            running: Arc::new(Mutex::new(true)),
            current_path: Arc::new(Mutex::new(None)),
            current_pose: Arc::new(Mutex::new((0.0, 0.0, 0.0))),
        });

        let vis_node_clone = Arc::clone(&vis_node);
        let path_subscription = vis_node.node.create_subscription::<Path, _>(
            path_topic,
            QOS_PROFILE_DEFAULT,
            move |msg: Path| {
                vis_node_clone.path_callback(msg);
            },
        )?;
        *vis_node.path_subscription.lock().unwrap() = Some(path_subscription);

        let vis_node_clone = Arc::clone(&vis_node);
        let odom_subscription = vis_node.node.create_subscription::<Odometry, _>(
            odom_topic,
            QOS_PROFILE_DEFAULT,
            move |msg: Odometry| {
                vis_node_clone.odom_callback(msg);
            },
        )?;
        *vis_node.odom_subscription.lock().unwrap() = Some(odom_subscription);

        // Publish diagnostics once per control cycle
        let vis_node_clone = Arc::clone(&vis_node);
        let running_clone = Arc::clone(&vis_node.running);
        thread::spawn(move || {
            while *running_clone.lock().unwrap() {
                vis_node_clone.timer_callback();
                thread::sleep(Duration::from_millis(100)); // 10 Hz
            }
        });

        Ok(vis_node)
    }

    fn path_callback(&self, msg: Path) {
        info!("Received path with {} poses", msg.poses.len());
        *self.current_path.lock().unwrap() = Some(msg);
    }

    fn odom_callback(&self, msg: Odometry) {
        let x = msg.pose.pose.position.x;
        let y = msg.pose.pose.position.y;

        let qx = msg.pose.pose.orientation.x;
        let qy = msg.pose.pose.orientation.y;
        let qz = msg.pose.pose.orientation.z;
        let qw = msg.pose.pose.orientation.w;

        // Yaw from quaternion
        let theta = (2.0 * (qw * qz + qx * qy)).atan2(1.0 - 2.0 * (qy * qy + qz * qz));

        *self.current_pose.lock().unwrap() = (x, y, theta);
        debug!("Updated pose from odom: x={:.2}, y={:.2}, theta={:.2}", x, y, theta);
    }

    fn timer_callback(&self) {
        let pose = *self.current_pose.lock().unwrap();
        let robot = (pose.0, pose.1);

        if let Err(e) = publish_unfilled_circle(
            robot,
            self.lookahead_distance,
            &*self.unfilled_circle_publisher,
            &self.ctx,
        ) {
            warn!("Failed to publish lookahead circle: {}", e);
        }

        let path_guard = self.current_path.lock().unwrap();
        let path = match path_guard.as_ref() {
            Some(path) if !path.is_empty() => path,
            _ => return,
        };

        let closest = closest_index(path, robot);
        let target = lookahead_index(path, closest, robot, self.lookahead_distance);
        let Some(target_pt) = path.position(target) else {
            return;
        };

        if let Err(e) = publish_point(target_pt, &*self.point_publisher, &self.ctx) {
            warn!("Failed to publish lookahead point: {}", e);
        }

        let alpha = (target_pt.1 - pose.1).atan2(target_pt.0 - pose.0) - pose.2;

        match pursued_arc(pose, target_pt) {
            Some((center, radius)) => {
                if let Err(e) = publish_circle(center, radius, &*self.circle_publisher, &self.ctx) {
                    warn!("Failed to publish pursued arc: {}", e);
                }
            }
            None => debug!("Target straight ahead, no pursued arc to draw"),
        }

        if let Err(e) = publish_ct_error_line(
            closest,
            path,
            self.lookahead_distance,
            alpha,
            &*self.ct_error_publisher,
            &self.ctx,
        ) {
            warn!("Failed to publish cross-track error: {}", e);
        }
    }
}

fn distance(a: Point2D, b: Point2D) -> f64 {
    ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
}

/// Centre and radius of the arc through the robot, tangent to its heading,
/// that reaches `target`. `None` when the target lies on the heading line.
fn pursued_arc(pose: Pose2D, target: Point2D) -> Option<(Point2D, f64)> {
    let (x, y, theta) = pose;
    let ld = distance((x, y), target);
    let alpha = (target.1 - y).atan2(target.0 - x) - theta;
    let sin_alpha = alpha.sin();
    if ld == 0.0 || sin_alpha.abs() < STRAIGHT_EPS {
        return None;
    }

    // Signed, positive when turning left
    let radius = ld / (2.0 * sin_alpha);
    let center = (x - radius * theta.sin(), y + radius * theta.cos());
    Some((center, radius.abs()))
}

/// Index of the path pose nearest to `robot`
fn closest_index(path: &Path, robot: Point2D) -> usize {
    (0..path.len())
        .filter_map(|i| path.position(i).map(|p| (i, distance(p, robot))))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// First pose from `start` at least `lookahead` away from `robot`, or the last pose
fn lookahead_index(path: &Path, start: usize, robot: Point2D, lookahead: f64) -> usize {
    (start..path.len())
        .find(|&i| {
            path.position(i)
                .map_or(false, |p| distance(p, robot) >= lookahead)
        })
        .unwrap_or_else(|| path.len().saturating_sub(1))
}

impl Drop for PursuitVisNode {
    fn drop(&mut self) {
        if let Ok(mut running) = self.running.lock() {
            *running = false;
        }
    }
}

fn main() -> Result<(), Error> {
    logger_init(LevelFilter::Info)?;
    info!("Initializing Pursuit Visualization Node...");

    let mut executor = Context::default_from_env()?.create_basic_executor();

    let _vis_node = PursuitVisNode::new(&executor, "pursuit_vis_node")?;

    info!("Pursuit Visualization Node initialized. Starting to spin...");

    executor
        .spin(SpinOptions::default())
        .first_error()
        .map_err(|err| err.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn arc_to_left_target() {
        let (center, radius) = pursued_arc((0.0, 0.0, 0.0), (1.0, 1.0)).unwrap();
        assert_relative_eq!(center.0, 0.0, epsilon = 1e-12);
        assert_relative_eq!(center.1, 1.0, epsilon = 1e-12);
        assert_relative_eq!(radius, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn arc_passes_through_robot_and_target() {
        let pose = (2.0, -1.0, 0.7);
        let target = (3.5, 0.2);
        let (center, radius) = pursued_arc(pose, target).unwrap();
        assert_relative_eq!(distance(center, (pose.0, pose.1)), radius, epsilon = 1e-9);
        assert_relative_eq!(distance(center, target), radius, epsilon = 1e-9);
    }

    #[test]
    fn straight_ahead_has_no_arc() {
        assert!(pursued_arc((0.0, 0.0, 0.0), (2.0, 0.0)).is_none());
        assert!(pursued_arc((1.0, 1.0, 0.3), (1.0, 1.0)).is_none());
    }
}

//! ROS 2 transport for diagnostic markers

use crate::common::types::{PathSource, Point2D};
use crate::error::VisError;
use crate::vis::marker::{Marker, MarkerAction, MarkerBatch, MarkerKind};
use crate::vis::sink::MarkerSink;
use builtin_interfaces::msg::Time;
use geometry_msgs::msg::{Point, Pose, Quaternion, Vector3};
use nav_msgs::msg::Path;
use rosidl_runtime_rs::Message;
use std_msgs::msg::ColorRGBA;
use visualization_msgs::msg::{Marker as MarkerMsg, MarkerArray};

/// Convert a marker into its `visualization_msgs/Marker` form.
///
/// The stamp is left at zero so the display uses the latest transform.
/// Ids above `i32::MAX` cannot be represented and are rejected.
pub fn to_marker_msg(marker: &Marker) -> Result<MarkerMsg, VisError> {
    let id = i32::try_from(marker.id).map_err(|_| {
        VisError::Delivery(format!("marker id {} of {} exceeds int32", marker.id, marker.ns))
    })?;

    let mut msg = MarkerMsg::default();
    msg.header.frame_id = marker.frame_id.clone();
    msg.header.stamp = Time { sec: 0, nanosec: 0 };
    msg.ns = marker.ns.clone();
    msg.id = id;

    msg.type_ = match marker.kind {
        MarkerKind::Disk | MarkerKind::Pin => MarkerMsg::CYLINDER,
        MarkerKind::Cube => MarkerMsg::CUBE,
    };
    msg.action = match marker.action {
        MarkerAction::Add => MarkerMsg::ADD,
    };

    let q = marker.orientation.quaternion();
    msg.pose = Pose {
        position: Point {
            x: marker.position.x,
            y: marker.position.y,
            z: marker.position.z,
        },
        orientation: Quaternion {
            x: q.i,
            y: q.j,
            z: q.k,
            w: q.w,
        },
    };
    msg.scale = Vector3 {
        x: marker.scale.x,
        y: marker.scale.y,
        z: marker.scale.z,
    };
    msg.color = ColorRGBA {
        r: marker.color.r,
        g: marker.color.g,
        b: marker.color.b,
        a: marker.color.a,
    };
    Ok(msg)
}

/// Convert a batch into a `visualization_msgs/MarkerArray`
pub fn to_marker_array(batch: &MarkerBatch) -> Result<MarkerArray, VisError> {
    Ok(MarkerArray {
        markers: batch.iter().map(to_marker_msg).collect::<Result<_, _>>()?,
    })
}

fn deliver<T: Message>(publisher: &rclrs::Publisher<T>, msg: &T) -> Result<(), VisError> {
    publisher
        .publish(msg)
        .map_err(|e| VisError::Delivery(e.to_string()))
}

/// Single-marker topic. Batches go out one message per marker.
impl MarkerSink for rclrs::Publisher<MarkerMsg> {
    fn publish_marker(&self, marker: &Marker) -> Result<(), VisError> {
        deliver(self, &to_marker_msg(marker)?)
    }

    fn publish_batch(&self, batch: &MarkerBatch) -> Result<(), VisError> {
        for marker in batch {
            self.publish_marker(marker)?;
        }
        Ok(())
    }
}

/// Marker array topic. A single marker goes out as a one-element array.
impl MarkerSink for rclrs::Publisher<MarkerArray> {
    fn publish_marker(&self, marker: &Marker) -> Result<(), VisError> {
        deliver(
            self,
            &MarkerArray {
                markers: vec![to_marker_msg(marker)?],
            },
        )
    }

    fn publish_batch(&self, batch: &MarkerBatch) -> Result<(), VisError> {
        deliver(self, &to_marker_array(batch)?)
    }
}

impl PathSource for Path {
    fn len(&self) -> usize {
        self.poses.len()
    }

    fn position(&self, index: usize) -> Option<Point2D> {
        self.poses
            .get(index)
            .map(|p| (p.pose.position.x, p.pose.position.y))
    }
}

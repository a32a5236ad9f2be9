//! Delivery endpoints for generated markers

use super::marker::{Marker, MarkerBatch};
use crate::error::VisError;
use std::sync::Mutex;

/// Output channel a generator hands its markers to.
///
/// Delivery is fire-and-forget from the generator's point of view: any
/// failure is reported back once and never retried.
pub trait MarkerSink {
    /// Deliver a single marker
    fn publish_marker(&self, marker: &Marker) -> Result<(), VisError>;

    /// Deliver a batch of markers as one unit
    fn publish_batch(&self, batch: &MarkerBatch) -> Result<(), VisError>;
}

impl<S: MarkerSink + ?Sized> MarkerSink for &S {
    fn publish_marker(&self, marker: &Marker) -> Result<(), VisError> {
        (**self).publish_marker(marker)
    }

    fn publish_batch(&self, batch: &MarkerBatch) -> Result<(), VisError> {
        (**self).publish_batch(batch)
    }
}

/// Sink keeping every delivery in memory, in arrival order
#[derive(Debug, Default)]
pub struct RecordingSink {
    deliveries: Mutex<Vec<MarkerBatch>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything delivered so far. A single marker is recorded as a
    /// one-element batch.
    pub fn deliveries(&self) -> Vec<MarkerBatch> {
        self.lock().clone()
    }

    /// The most recent delivery
    pub fn last(&self) -> Option<MarkerBatch> {
        self.lock().last().cloned()
    }

    /// Remove and return everything delivered so far
    pub fn take(&self) -> Vec<MarkerBatch> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<MarkerBatch>> {
        // A poisoned recorder still holds complete batches
        self.deliveries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl MarkerSink for RecordingSink {
    fn publish_marker(&self, marker: &Marker) -> Result<(), VisError> {
        self.lock().push(MarkerBatch::from(marker.clone()));
        Ok(())
    }

    fn publish_batch(&self, batch: &MarkerBatch) -> Result<(), VisError> {
        self.lock().push(batch.clone());
        Ok(())
    }
}

/// Sink writing a summary of each delivery to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink {
    level: Option<log::Level>,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(level: log::Level) -> Self {
        LogSink { level: Some(level) }
    }

    fn level(&self) -> log::Level {
        self.level.unwrap_or(log::Level::Info)
    }
}

impl MarkerSink for LogSink {
    fn publish_marker(&self, marker: &Marker) -> Result<(), VisError> {
        log::log!(
            self.level(),
            "{}[{}] {:?} in {} at ({:.3}, {:.3}, {:.3}) scale ({:.3}, {:.3}, {:.3})",
            marker.ns,
            marker.id,
            marker.kind,
            marker.frame_id,
            marker.position.x,
            marker.position.y,
            marker.position.z,
            marker.scale.x,
            marker.scale.y,
            marker.scale.z
        );
        Ok(())
    }

    fn publish_batch(&self, batch: &MarkerBatch) -> Result<(), VisError> {
        log::log!(self.level(), "batch of {} markers", batch.len());
        for marker in batch {
            self.publish_marker(marker)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vis::marker::{Color, MarkerKind};
    use nalgebra::{Point3, Vector3};

    fn cube(id: u32) -> Marker {
        Marker::new(
            "test_point_",
            id,
            "map",
            MarkerKind::Cube,
            Point3::new(1.0, 2.0, 1.0),
            Vector3::new(0.2, 0.2, 0.0),
            Color::BLUE,
        )
    }

    #[test]
    fn recording_sink_keeps_order() {
        let sink = RecordingSink::new();
        sink.publish_marker(&cube(0)).unwrap();
        sink.publish_batch(&vec![cube(1), cube(2)].into_iter().collect())
            .unwrap();

        let deliveries = sink.deliveries();
        assert_eq!(deliveries.len(), 2);
        assert_eq!(deliveries[0].len(), 1);
        assert_eq!(deliveries[1].markers[1].id, 2);
        assert_eq!(sink.last().map(|b| b.len()), Some(2));
    }

    #[test]
    fn take_drains_recording() {
        let sink = RecordingSink::new();
        sink.publish_marker(&cube(0)).unwrap();
        assert_eq!(sink.take().len(), 1);
        assert!(sink.deliveries().is_empty());
    }

    #[test]
    fn sink_by_reference() {
        let sink = RecordingSink::new();
        let by_ref: &dyn MarkerSink = &sink;
        (&by_ref).publish_marker(&cube(4)).unwrap();
        assert_eq!(sink.deliveries()[0].markers[0].id, 4);
    }

    #[test]
    fn log_sink_accepts_everything() {
        let sink = LogSink::with_level(log::Level::Debug);
        assert!(sink.publish_marker(&cube(0)).is_ok());
        assert!(sink.publish_batch(&MarkerBatch::new()).is_ok());
    }
}

//! Renderable marker primitives

use nalgebra::{Point3, UnitQuaternion, Vector3};

/// Shape drawn for a marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// Flat cylinder, scale x/y is the diameter
    Disk,
    /// Thin vertical cylinder used for outline and error dots
    Pin,
    /// Axis aligned box
    Cube,
}

/// What the display should do with a marker. Only additions are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkerAction {
    #[default]
    Add,
}

/// Opaque RGBA color, components in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const RED: Color = Color::opaque(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::opaque(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::opaque(0.0, 0.0, 1.0);

    pub const fn opaque(r: f32, g: f32, b: f32) -> Self {
        Color { r, g, b, a: 1.0 }
    }
}

/// A single renderable primitive
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub ns: String,
    pub id: u32,
    pub frame_id: String,
    pub kind: MarkerKind,
    pub action: MarkerAction,
    pub position: Point3<f64>,
    pub orientation: UnitQuaternion<f64>,
    pub scale: Vector3<f64>,
    pub color: Color,
}

impl Marker {
    /// Create an unrotated marker of the given shape at `position`
    pub fn new(
        ns: &str,
        id: u32,
        frame_id: &str,
        kind: MarkerKind,
        position: Point3<f64>,
        scale: Vector3<f64>,
        color: Color,
    ) -> Self {
        Marker {
            ns: ns.to_string(),
            id,
            frame_id: frame_id.to_string(),
            kind,
            action: MarkerAction::Add,
            position,
            orientation: UnitQuaternion::identity(),
            scale,
            color,
        }
    }
}

/// Ordered group of markers produced by one generator call
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MarkerBatch {
    pub markers: Vec<Marker>,
}

impl MarkerBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Marker> {
        self.markers.iter()
    }

    /// True when no two markers share a (namespace, id) pair
    pub fn has_unique_ids(&self) -> bool {
        let mut seen = std::collections::HashSet::with_capacity(self.markers.len());
        self.markers.iter().all(|m| seen.insert((m.ns.as_str(), m.id)))
    }
}

impl From<Marker> for MarkerBatch {
    fn from(marker: Marker) -> Self {
        MarkerBatch {
            markers: vec![marker],
        }
    }
}

impl FromIterator<Marker> for MarkerBatch {
    fn from_iter<I: IntoIterator<Item = Marker>>(iter: I) -> Self {
        MarkerBatch {
            markers: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a MarkerBatch {
    type Item = &'a Marker;
    type IntoIter = std::slice::Iter<'a, Marker>;

    fn into_iter(self) -> Self::IntoIter {
        self.markers.iter()
    }
}

impl IntoIterator for MarkerBatch {
    type Item = Marker;
    type IntoIter = std::vec::IntoIter<Marker>;

    fn into_iter(self) -> Self::IntoIter {
        self.markers.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pin(ns: &str, id: u32) -> Marker {
        Marker::new(
            ns,
            id,
            "map",
            MarkerKind::Pin,
            Point3::new(0.0, 0.0, 1.0),
            Vector3::new(0.02, 0.02, 1.0),
            Color::GREEN,
        )
    }

    #[test]
    fn new_marker_is_unrotated_add() {
        let m = pin("ns", 3);
        assert_eq!(m.action, MarkerAction::Add);
        assert_eq!(m.orientation, UnitQuaternion::identity());
        assert_eq!(m.frame_id, "map");
    }

    #[test]
    fn duplicate_ids_detected() {
        let batch: MarkerBatch = vec![pin("a", 0), pin("a", 1), pin("b", 0)].into_iter().collect();
        assert!(batch.has_unique_ids());

        let batch: MarkerBatch = vec![pin("a", 0), pin("a", 0)].into_iter().collect();
        assert!(!batch.has_unique_ids());
    }

    #[test]
    fn colors_are_opaque() {
        for c in [Color::RED, Color::GREEN, Color::BLUE] {
            assert_eq!(c.a, 1.0);
        }
    }
}

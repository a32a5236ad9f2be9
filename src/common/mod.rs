//! Common utilities and types shared by the visualization stack

pub mod logger;

/// Common types and utilities used across the codebase
pub mod types {
    /// A 2D point
    pub type Point2D = (f64, f64);

    /// A 3D pose (x, y, theta)
    pub type Pose2D = (f64, f64, f64);

    /// Read-only indexed access to the positions of a path.
    ///
    /// The path itself stays owned by the caller; the marker generators only
    /// ever look up a single position by index.
    pub trait PathSource {
        /// Number of poses in the path
        fn len(&self) -> usize;

        /// Planar position of the pose at `index`, or `None` when out of range
        fn position(&self, index: usize) -> Option<Point2D>;

        fn is_empty(&self) -> bool {
            self.len() == 0
        }
    }

    impl PathSource for [Point2D] {
        fn len(&self) -> usize {
            <[Point2D]>::len(self)
        }

        fn position(&self, index: usize) -> Option<Point2D> {
            self.get(index).copied()
        }
    }

    impl PathSource for [Pose2D] {
        fn len(&self) -> usize {
            <[Pose2D]>::len(self)
        }

        fn position(&self, index: usize) -> Option<Point2D> {
            self.get(index).map(|&(x, y, _)| (x, y))
        }
    }

    impl<T> PathSource for Vec<T>
    where
        [T]: PathSource,
    {
        fn len(&self) -> usize {
            self.as_slice().len()
        }

        fn position(&self, index: usize) -> Option<Point2D> {
            self.as_slice().position(index)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn point_path_lookup() {
            let path: Vec<Point2D> = vec![(0.0, 0.0), (1.0, 2.0)];
            assert_eq!(PathSource::len(&path), 2);
            assert_eq!(path.position(1), Some((1.0, 2.0)));
            assert_eq!(path.position(2), None);
        }

        #[test]
        fn pose_path_drops_heading() {
            let path: Vec<Pose2D> = vec![(3.0, 4.0, 1.57)];
            assert_eq!(path.position(0), Some((3.0, 4.0)));
            assert!(!PathSource::is_empty(&path));
        }

        #[test]
        fn empty_path_has_no_positions() {
            let path: &[Point2D] = &[];
            assert!(PathSource::is_empty(path));
            assert_eq!(path.position(0), None);
        }
    }
}

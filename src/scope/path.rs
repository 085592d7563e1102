//! Geometry construction for the host rendering surface.

use super::buffer::DataPoint;

/// Immutable polyline in viewport space.
///
/// Coordinates follow screen convention: y grows downward, so a value of
/// +1 sits on the top edge (`y = 0`) and -1 on the bottom edge
/// (`y = height`). A geometry is built fresh each tick and never mutated
/// afterwards; replacing the published one is a single assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    /// Polyline vertices, oldest sample leftmost.
    pub points: Vec<(f64, f64)>,
    pub width: f64,
    pub height: f64,
}

/// Build a polyline from an ordered window of points.
///
/// Indices spread linearly across `[0, width]`; a single point lands at
/// `x = 0`. Values map linearly with +1 at the top.
pub fn build(window: &[DataPoint], width: f64, height: f64) -> Geometry {
    let span = window.len().saturating_sub(1).max(1) as f64;
    let points = window
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let x = i as f64 / span * width;
            let y = (1.0 - point.value) * 0.5 * height;
            (x, y)
        })
        .collect();
    Geometry {
        points,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(values: &[f64]) -> Vec<DataPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, &value)| DataPoint {
                seq: i as u64,
                value,
            })
            .collect()
    }

    #[test]
    fn full_scale_values_land_on_the_edges() {
        let geometry = build(&window(&[1.0, -1.0, 0.0]), 100.0, 50.0);
        // +1 is the top edge, -1 the bottom edge, 0 the middle line.
        assert_eq!(geometry.points[0].1, 0.0);
        assert_eq!(geometry.points[1].1, 50.0);
        assert_eq!(geometry.points[2].1, 25.0);
    }

    #[test]
    fn indices_spread_across_the_full_width() {
        let geometry = build(&window(&[0.0; 5]), 200.0, 10.0);
        assert_eq!(geometry.points[0].0, 0.0);
        assert_eq!(geometry.points[4].0, 200.0);
        assert_eq!(geometry.points[2].0, 100.0);
    }

    #[test]
    fn single_point_sits_at_the_left_edge() {
        let geometry = build(&window(&[0.5]), 80.0, 40.0);
        assert_eq!(geometry.points.len(), 1);
        assert_eq!(geometry.points[0], (0.0, 10.0));
    }

    #[test]
    fn empty_window_builds_empty_geometry() {
        let geometry = build(&[], 80.0, 40.0);
        assert!(geometry.points.is_empty());
        assert_eq!(geometry.width, 80.0);
    }

    #[test]
    fn each_build_is_an_independent_object() {
        let source = window(&[0.1, 0.2, 0.3]);
        let first = build(&source, 10.0, 10.0);
        let second = build(&source, 10.0, 10.0);
        assert_eq!(first, second);
        let mut mutated = second;
        mutated.points.push((99.0, 99.0));
        assert_ne!(first, mutated);
    }
}

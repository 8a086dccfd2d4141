//! Copper shapes and their rasterization.
//!
//! A cell takes a shape's value when the shape contains the cell centre.

use pt_core::{GridCoord, Raster};
use serde::{Deserialize, Serialize};

/// Planar copper feature, coordinates in mil.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Feature {
    Circle {
        x: f64,
        y: f64,
        diameter: f64,
    },
    /// Axis-aligned, centred on `(x, y)`
    Rectangle {
        x: f64,
        y: f64,
        width: f64,
        length: f64,
    },
    /// Rectangle with fully rounded short ends
    Oval {
        x: f64,
        y: f64,
        width: f64,
        length: f64,
    },
    /// Polyline drawn with a round aperture
    Line {
        points: Vec<[f64; 2]>,
        width: f64,
    },
    /// Filled polygon, even-odd rule
    Pour {
        points: Vec<[f64; 2]>,
    },
}

/// Axis-aligned bounds `(min_x, min_y, max_x, max_y)`.
pub type Bounds = (f64, f64, f64, f64);

fn distance_to_segment(p: [f64; 2], a: [f64; 2], b: [f64; 2]) -> f64 {
    let (dx, dy) = (b[0] - a[0], b[1] - a[1]);
    let len2 = dx * dx + dy * dy;
    let t = if len2 > 0.0 {
        (((p[0] - a[0]) * dx + (p[1] - a[1]) * dy) / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (cx, cy) = (a[0] + t * dx, a[1] + t * dy);
    ((p[0] - cx).powi(2) + (p[1] - cy).powi(2)).sqrt()
}

fn polygon_contains(points: &[[f64; 2]], p: [f64; 2]) -> bool {
    let mut inside = false;
    let mut j = points.len().wrapping_sub(1);
    for i in 0..points.len() {
        let (a, b) = (points[i], points[j]);
        if (a[1] > p[1]) != (b[1] > p[1]) {
            let x_cross = a[0] + (p[1] - a[1]) * (b[0] - a[0]) / (b[1] - a[1]);
            if p[0] < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

fn points_bounds(points: &[[f64; 2]], pad: f64) -> Bounds {
    points.iter().fold(
        (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        |(x0, y0, x1, y1), p| (x0.min(p[0] - pad), y0.min(p[1] - pad), x1.max(p[0] + pad), y1.max(p[1] + pad)),
    )
}

impl Feature {
    pub fn kind(&self) -> &'static str {
        match self {
            Feature::Circle { .. } => "Circle",
            Feature::Rectangle { .. } => "Rectangle",
            Feature::Oval { .. } => "Oval",
            Feature::Line { .. } => "Line",
            Feature::Pour { .. } => "Pour",
        }
    }

    /// Describe the first malformed parameter, if any.
    pub fn check(&self) -> Result<(), String> {
        let positive = |name: &str, v: f64| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(format!("{name} must be positive, got {v}"))
            }
        };
        let finite_points = |points: &[[f64; 2]]| {
            if points.iter().flatten().all(|v| v.is_finite()) {
                Ok(())
            } else {
                Err("points must be finite".to_string())
            }
        };
        match self {
            Feature::Circle { x, y, diameter } => {
                finite_points(&[[*x, *y]])?;
                positive("diameter", *diameter)
            }
            Feature::Rectangle { x, y, width, length } | Feature::Oval { x, y, width, length } => {
                finite_points(&[[*x, *y]])?;
                positive("width", *width)?;
                positive("length", *length)
            }
            Feature::Line { points, width } => {
                if points.is_empty() {
                    return Err("line needs at least one point".into());
                }
                finite_points(points)?;
                positive("width", *width)
            }
            Feature::Pour { points } => {
                if points.len() < 3 {
                    return Err(format!("pour needs at least 3 points, got {}", points.len()));
                }
                finite_points(points)
            }
        }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        let p = [x, y];
        match self {
            Feature::Circle { x: cx, y: cy, diameter } => {
                (x - cx).powi(2) + (y - cy).powi(2) <= (diameter / 2.0).powi(2)
            }
            Feature::Rectangle {
                x: cx,
                y: cy,
                width,
                length,
            } => (x - cx).abs() <= width / 2.0 && (y - cy).abs() <= length / 2.0,
            Feature::Oval {
                x: cx,
                y: cy,
                width,
                length,
            } => {
                let radius = width.min(*length) / 2.0;
                let half_x = (width / 2.0 - radius).max(0.0);
                let half_y = (length / 2.0 - radius).max(0.0);
                distance_to_segment(p, [cx - half_x, cy - half_y], [cx + half_x, cy + half_y]) <= radius
            }
            Feature::Line { points, width } => {
                let radius = width / 2.0;
                match points.as_slice() {
                    [] => false,
                    [only] => distance_to_segment(p, *only, *only) <= radius,
                    _ => points.windows(2).any(|w| distance_to_segment(p, w[0], w[1]) <= radius),
                }
            }
            Feature::Pour { points } => polygon_contains(points, p),
        }
    }

    pub fn bounds(&self) -> Bounds {
        match self {
            Feature::Circle { x, y, diameter } => {
                let r = diameter / 2.0;
                (x - r, y - r, x + r, y + r)
            }
            Feature::Rectangle { x, y, width, length } | Feature::Oval { x, y, width, length } => {
                (x - width / 2.0, y - length / 2.0, x + width / 2.0, y + length / 2.0)
            }
            Feature::Line { points, width } => points_bounds(points, width / 2.0),
            Feature::Pour { points } => points_bounds(points, 0.0),
        }
    }
}

/// Set every cell whose centre lies in `feature` to `value`.
///
/// Returns the number of cells painted.
pub fn paint<T: Clone>(raster: &mut Raster<T>, resolution_mil: f64, feature: &Feature, value: T) -> usize {
    let (rows, cols) = raster.shape();
    let (x0, y0, x1, y1) = feature.bounds();
    let cell_range = |lo: f64, hi: f64, limit: usize| {
        let first = (lo / resolution_mil - 0.5).ceil().max(0.0) as usize;
        let last = ((hi / resolution_mil - 0.5).floor() + 1.0).clamp(0.0, limit as f64) as usize;
        first..last.max(first)
    };

    let mut painted = 0;
    for row in cell_range(x0, x1, rows) {
        let x = (row as f64 + 0.5) * resolution_mil;
        for col in cell_range(y0, y1, cols) {
            let y = (col as f64 + 0.5) * resolution_mil;
            if feature.contains(x, y) {
                raster[GridCoord::new(row, col)] = value.clone();
                painted += 1;
            }
        }
    }
    painted
}

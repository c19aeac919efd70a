//! Glyph outlines: SVG path sampling, centroid and scaling.
//!
//! An [`Outline`] is stored in *container space*: origin at the container's
//! top-left corner, y growing downward, exactly like the SVG the path came
//! from.  [`Outline::to_local`] converts to Bevy's y-up world orientation.
//!
//! Every subpath of the source becomes its own closed ring.  Rings keep their
//! source winding, so a counter-wound ring inside another (the bowl of an
//! "e") still reads as a hole.

use crate::error::{SceneError, SceneResult};
use bevy::prelude::*;
use kurbo::{BezPath, ParamCurve, ParamCurveArclen, PathEl, PathSeg, Point};

/// Points closer than this are treated as the same point.
const DEDUP_EPSILON: f32 = 1e-3;

/// Accuracy passed to kurbo's arc-length solvers.
const ARCLEN_ACCURACY: f64 = 1e-3;

/// Closed boundary rings of one glyph, in container space.
#[derive(Debug, Clone, PartialEq)]
pub struct Outline {
    rings: Vec<Vec<Vec2>>,
}

impl Outline {
    pub fn new(rings: Vec<Vec<Vec2>>) -> Self {
        Self { rings }
    }

    /// Sample SVG path data into an outline.
    ///
    /// Straight segments contribute their end points only.  Curved segments
    /// are sampled every `sample_length` units of arc length.  Each subpath
    /// becomes one ring; consecutive duplicates and the closing duplicate of
    /// a ring's first point are dropped, and rings left with fewer than three
    /// points are discarded.
    pub fn from_svg_path(id: &str, data: &str, sample_length: f32) -> SceneResult<Self> {
        let path = BezPath::from_svg(data).map_err(|e| SceneError::PathParse {
            id: id.to_string(),
            message: e.to_string(),
        })?;

        let mut rings = Vec::new();
        let mut discarded = 0;
        for subpath in subpaths(&path) {
            let ring = sample_ring(&subpath, sample_length);
            if ring.len() >= 3 {
                rings.push(ring);
            } else {
                discarded += ring.len();
            }
        }

        if rings.is_empty() {
            return Err(SceneError::DegenerateOutline {
                id: id.to_string(),
                vertex_count: discarded,
            });
        }
        Ok(Self { rings })
    }

    pub fn rings(&self) -> &[Vec<Vec2>] {
        &self.rings
    }

    /// Total number of points across all rings.
    pub fn len(&self) -> usize {
        self.rings.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rings.iter().all(Vec::is_empty)
    }

    /// Sum of the rings' shoelace areas; positive when the outer boundary
    /// winds clockwise on screen (counter-clockwise in y-up maths).
    ///
    /// Counter-wound holes subtract from the total.
    pub fn signed_area(&self) -> f32 {
        self.rings.iter().map(|r| signed_area(r)).sum()
    }

    /// Area-weighted centroid over all rings.  Falls back to the point mean
    /// for zero area.
    pub fn centre(&self) -> Vec2 {
        let area = self.signed_area();
        if area.abs() < f32::EPSILON {
            return self.mean();
        }
        let mut acc = Vec2::ZERO;
        for ring in &self.rings {
            let n = ring.len();
            for i in 0..n {
                let a = ring[i];
                let b = ring[(i + 1) % n];
                acc += (a + b) * a.perp_dot(b);
            }
        }
        acc / (6.0 * area)
    }

    fn mean(&self) -> Vec2 {
        let n = self.len();
        if n == 0 {
            return Vec2::ZERO;
        }
        self.rings.iter().flatten().copied().sum::<Vec2>() / n as f32
    }

    /// Scale every point by `factor` about `about`.
    pub fn scaled(&self, factor: f32, about: Vec2) -> Outline {
        Outline {
            rings: self
                .rings
                .iter()
                .map(|ring| ring.iter().map(|&p| about + (p - about) * factor).collect())
                .collect(),
        }
    }

    /// Rings relative to `origin`, flipped into y-up world orientation.
    pub fn to_local(&self, origin: Vec2) -> Vec<Vec<Vec2>> {
        self.rings
            .iter()
            .map(|ring| ring.iter().map(|&p| container_to_world(p - origin)).collect())
            .collect()
    }
}

/// Split a path into its subpaths at every `MoveTo`.
fn subpaths(path: &BezPath) -> Vec<BezPath> {
    let mut out: Vec<BezPath> = Vec::new();
    for &el in path.elements() {
        if matches!(el, PathEl::MoveTo(_)) || out.is_empty() {
            out.push(BezPath::new());
        }
        if let Some(sub) = out.last_mut() {
            sub.push(el);
        }
    }
    out
}

fn sample_ring(subpath: &BezPath, sample_length: f32) -> Vec<Vec2> {
    let mut points: Vec<Vec2> = Vec::new();
    for seg in subpath.segments() {
        match seg {
            PathSeg::Line(line) => {
                push_distinct(&mut points, line.p0);
                push_distinct(&mut points, line.p1);
            }
            curve => {
                let length = curve.arclen(ARCLEN_ACCURACY);
                let steps = (length / sample_length as f64).ceil().max(1.0) as usize;
                for i in 0..=steps {
                    let s = length * i as f64 / steps as f64;
                    let t = curve.inv_arclen(s, ARCLEN_ACCURACY);
                    push_distinct(&mut points, curve.eval(t));
                }
            }
        }
    }

    if points.len() > 1 && points[0].distance(points[points.len() - 1]) < DEDUP_EPSILON {
        points.pop();
    }
    points
}

fn push_distinct(points: &mut Vec<Vec2>, p: Point) {
    let v = Vec2::new(p.x as f32, p.y as f32);
    if points
        .last()
        .is_none_or(|last| last.distance(v) >= DEDUP_EPSILON)
    {
        points.push(v);
    }
}

/// Shoelace signed area of a closed polygon.
pub fn signed_area(points: &[Vec2]) -> f32 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for i in 0..n {
        twice += points[i].perp_dot(points[(i + 1) % n]);
    }
    twice / 2.0
}

/// Glyph scale factor for a container of the given width.
///
/// `reference_width` px of artwork maps onto `fraction` of the container.
pub fn scale_factor(container_width: f32, fraction: f32, reference_width: f32) -> f32 {
    container_width * fraction / reference_width
}

/// Map a container-space vector (y down) to world orientation (y up).
pub fn container_to_world(p: Vec2) -> Vec2 {
    Vec2::new(p.x, -p.y)
}

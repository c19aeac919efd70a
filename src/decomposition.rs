//! Convex decomposition of glyph outlines.
//!
//! Rapier colliders must be convex, but most glyphs are not.  The importer
//! asks a [`ConvexDecomposer`] to split each outline into convex pieces and
//! builds one compound collider from them.  The decomposer is injected via
//! the [`ShapeDecomposer`] resource, so apps and tests pick their own.
//!
//! The default [`EarcutDecomposer`] works in three passes:
//!
//! 1. Self-crossing rings are cut at each crossing into simple loops.
//! 2. Loops are nested by containment; odd depth makes a loop a hole of the
//!    smallest loop around it.
//! 3. Each polygon with its holes is triangulated by `earcutr`, then
//!    neighbouring triangles are merged while the union stays convex.

use crate::outline::signed_area;
use bevy::prelude::*;
use earcutr::earcut;
use std::sync::Arc;

/// Pieces and loops with less area than this (px²) are dropped.
const MIN_PIECE_AREA: f32 = 1e-4;

/// Tolerance for treating a corner as straight when testing convexity.
const CONVEX_EPSILON: f32 = 1e-5;

/// Splits a glyph's closed rings into convex pieces.
///
/// Input is y-up; rings may wind either way and a ring inside another is a
/// hole.  Every returned piece winds counter-clockwise and has at least
/// three points.
pub trait ConvexDecomposer: Send + Sync + 'static {
    fn decompose(&self, rings: &[Vec<Vec2>]) -> Vec<Vec<Vec2>>;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

/// The decomposer used by the shape importer.
#[derive(Resource, Clone)]
pub struct ShapeDecomposer(pub Arc<dyn ConvexDecomposer>);

impl ShapeDecomposer {
    pub fn new(decomposer: impl ConvexDecomposer) -> Self {
        Self(Arc::new(decomposer))
    }
}

impl Default for ShapeDecomposer {
    fn default() -> Self {
        Self::new(EarcutDecomposer)
    }
}

impl std::fmt::Debug for ShapeDecomposer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ShapeDecomposer").field(&self.0.name()).finish()
    }
}

// ── Earcut + Hertel–Mehlhorn ──────────────────────────────────────────────────

/// Earcut triangulation followed by greedy merging of neighbouring
/// triangles while the union stays convex (Hertel–Mehlhorn).
#[derive(Debug, Clone, Copy, Default)]
pub struct EarcutDecomposer;

impl ConvexDecomposer for EarcutDecomposer {
    fn decompose(&self, rings: &[Vec<Vec2>]) -> Vec<Vec<Vec2>> {
        let mut out = Vec::new();
        for polygon in polygons_with_holes(rings) {
            let (vertices, triangles) = triangulate(&polygon);
            for piece in merge_convex(&vertices, triangles) {
                out.push(piece.into_iter().map(|i| vertices[i]).collect());
            }
        }
        out
    }

    fn name(&self) -> &'static str {
        "earcut"
    }
}

/// An outer boundary and the holes cut out of it.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonWithHoles {
    pub exterior: Vec<Vec2>,
    pub holes: Vec<Vec<Vec2>>,
}

/// Cut a ring at its self-crossings into simple loops.
///
/// The first proper crossing of two non-adjacent edges splits the ring into
/// the loop between them and the rest; both halves are cut again until no
/// crossing is left.  Loops with no area are dropped.
pub fn split_self_intersections(ring: &[Vec2]) -> Vec<Vec<Vec2>> {
    let mut pending = vec![ring.to_vec()];
    let mut simple = Vec::new();
    while let Some(r) = pending.pop() {
        if r.len() < 3 {
            continue;
        }
        match first_crossing(&r) {
            Some((i, j, x)) => {
                let mut inner = vec![x];
                inner.extend_from_slice(&r[i + 1..=j]);
                let mut outer = vec![x];
                outer.extend_from_slice(&r[j + 1..]);
                outer.extend_from_slice(&r[..=i]);
                pending.push(inner);
                pending.push(outer);
            }
            None if signed_area(&r).abs() > MIN_PIECE_AREA => simple.push(r),
            None => {}
        }
    }
    simple
}

/// First pair of edges `(i, j)`, `i < j`, that cross properly, with the
/// crossing point.  Edges sharing a vertex never count.
fn first_crossing(ring: &[Vec2]) -> Option<(usize, usize, Vec2)> {
    let n = ring.len();
    for i in 0..n {
        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            let a = (ring[i], ring[(i + 1) % n]);
            let b = (ring[j], ring[(j + 1) % n]);
            if let Some(x) = segment_crossing(a, b) {
                return Some((i, j, x));
            }
        }
    }
    None
}

/// Crossing point of two segments whose interiors intersect.
fn segment_crossing((a, b): (Vec2, Vec2), (c, d): (Vec2, Vec2)) -> Option<Vec2> {
    let d1 = cross(a, b, c);
    let d2 = cross(a, b, d);
    let d3 = cross(c, d, a);
    let d4 = cross(c, d, b);
    let straddles = |p: f32, q: f32| (p > 0.0 && q < 0.0) || (p < 0.0 && q > 0.0);
    if !(straddles(d1, d2) && straddles(d3, d4)) {
        return None;
    }
    let t = d3 / (d3 - d4);
    Some(a + (b - a) * t)
}

/// Group rings into polygons with holes.
///
/// Rings are cut into simple loops first.  A loop's depth is the number of
/// larger loops containing it; even depth starts a new polygon, odd depth
/// is a hole of the smallest loop around it.
pub fn polygons_with_holes(rings: &[Vec<Vec2>]) -> Vec<PolygonWithHoles> {
    let mut loops: Vec<Vec<Vec2>> = rings
        .iter()
        .flat_map(|r| split_self_intersections(r))
        .collect();
    loops.sort_by(|a, b| signed_area(b).abs().total_cmp(&signed_area(a).abs()));

    let mut polygons: Vec<PolygonWithHoles> = Vec::new();
    // Polygon each even-depth loop started, by loop index.
    let mut owner: Vec<Option<usize>> = Vec::with_capacity(loops.len());
    for (k, ring) in loops.iter().enumerate() {
        let containers: Vec<usize> = (0..k).filter(|&m| contains(&loops[m], ring)).collect();
        if containers.len() % 2 == 0 {
            polygons.push(PolygonWithHoles {
                exterior: ring.clone(),
                holes: Vec::new(),
            });
            owner.push(Some(polygons.len() - 1));
            continue;
        }
        // Sorted by area, so the last container is the smallest.
        let parent = containers.last().and_then(|&m| owner[m]);
        match parent {
            Some(p) => polygons[p].holes.push(ring.clone()),
            None => polygons.push(PolygonWithHoles {
                exterior: ring.clone(),
                holes: Vec::new(),
            }),
        }
        owner.push(None);
    }
    polygons
}

/// Whether most of `inner`'s points lie inside `outer` (even-odd rule).
fn contains(outer: &[Vec2], inner: &[Vec2]) -> bool {
    let inside = inner.iter().filter(|&&p| point_in_ring(p, outer)).count();
    inside * 2 > inner.len()
}

/// Even-odd point-in-polygon test.
pub fn point_in_ring(p: Vec2, ring: &[Vec2]) -> bool {
    let n = ring.len();
    let mut inside = false;
    for i in 0..n {
        let (a, b) = (ring[i], ring[(i + 1) % n]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
    }
    inside
}

/// Triangulate a polygon with holes using earcut.
///
/// Returns the vertex list (exterior first, then each hole) and
/// counter-clockwise index triples into it.  Slivers are dropped.
pub fn triangulate(polygon: &PolygonWithHoles) -> (Vec<Vec2>, Vec<[usize; 3]>) {
    let mut vertices = polygon.exterior.clone();
    let mut hole_indices = Vec::with_capacity(polygon.holes.len());
    for hole in &polygon.holes {
        hole_indices.push(vertices.len());
        vertices.extend_from_slice(hole);
    }
    if polygon.exterior.len() < 3 {
        return (vertices, Vec::new());
    }

    // Flattened [x0, y0, x1, y1, ...]
    let flat: Vec<f64> = vertices
        .iter()
        .flat_map(|v| [v.x as f64, v.y as f64])
        .collect();
    let indices = match earcut(&flat, &hole_indices, 2) {
        Ok(indices) => indices,
        Err(e) => {
            warn!("[scene] earcut failed on {} vertices: {e:?}", vertices.len());
            return (vertices, Vec::new());
        }
    };

    let mut triangles = Vec::with_capacity(indices.len() / 3);
    for t in indices.chunks_exact(3) {
        let (a, b, c) = (t[0], t[1], t[2]);
        if a >= vertices.len() || b >= vertices.len() || c >= vertices.len() {
            continue;
        }
        let area = signed_area(&[vertices[a], vertices[b], vertices[c]]);
        if area > MIN_PIECE_AREA {
            triangles.push([a, b, c]);
        } else if area < -MIN_PIECE_AREA {
            triangles.push([a, c, b]);
        }
    }
    (vertices, triangles)
}

/// z component of `(b - a) × (c - b)`; positive for a left (convex) turn.
fn turn(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (b - a).perp_dot(c - b)
}

/// Greedily merge pieces that share an edge while the result stays convex.
pub fn merge_convex(vertices: &[Vec2], triangles: Vec<[usize; 3]>) -> Vec<Vec<usize>> {
    let mut pieces: Vec<Vec<usize>> = triangles.into_iter().map(|t| t.to_vec()).collect();
    loop {
        let mut merged = None;
        'search: for i in 0..pieces.len() {
            for j in (i + 1)..pieces.len() {
                if let Some(m) = merge_pair(vertices, &pieces[i], &pieces[j]) {
                    merged = Some((i, j, m));
                    break 'search;
                }
            }
        }
        match merged {
            Some((i, j, m)) => {
                pieces[i] = m;
                pieces.swap_remove(j);
            }
            None => return pieces,
        }
    }
}

/// Join two counter-clockwise pieces across a shared edge, if the union is convex.
fn merge_pair(vertices: &[Vec2], a: &[usize], b: &[usize]) -> Option<Vec<usize>> {
    let (na, nb) = (a.len(), b.len());
    for k in 0..na {
        let (u, v) = (a[k], a[(k + 1) % na]);
        // The neighbour walks the shared edge in the opposite direction.
        let Some(l) = (0..nb).find(|&l| b[l] == v && b[(l + 1) % nb] == u) else {
            continue;
        };
        // a from v round to u, then b strictly between u and v.
        let mut joined: Vec<usize> = (1..=na).map(|s| a[(k + s) % na]).collect();
        joined.extend((2..nb).map(|s| b[(l + s) % nb]));

        let points: Vec<Vec2> = joined.iter().map(|&i| vertices[i]).collect();
        return is_convex(&points).then_some(joined);
    }
    None
}

/// True when no corner of the counter-clockwise ring turns right.
pub fn is_convex(points: &[Vec2]) -> bool {
    let n = points.len();
    (0..n).all(|i| {
        turn(points[i], points[(i + 1) % n], points[(i + 2) % n]) >= -CONVEX_EPSILON
    })
}

// ── Convex hull ───────────────────────────────────────────────────────────────

/// Approximates the whole glyph by the convex hull of all its rings: a
/// single piece.
///
/// Cheap and robust, at the cost of filling every concavity.
#[derive(Debug, Clone, Copy, Default)]
pub struct HullDecomposer;

impl ConvexDecomposer for HullDecomposer {
    fn decompose(&self, rings: &[Vec<Vec2>]) -> Vec<Vec<Vec2>> {
        let points: Vec<Vec2> = rings.iter().flatten().copied().collect();
        match convex_hull(&points) {
            Some(hull) if signed_area(&hull) > MIN_PIECE_AREA => vec![hull],
            _ => Vec::new(),
        }
    }

    fn name(&self) -> &'static str {
        "convex-hull"
    }
}

/// Gift-wrapping convex hull, returned counter-clockwise.
///
/// Collinear points on the hull are skipped in favour of the farther one.
pub fn convex_hull(points: &[Vec2]) -> Option<Vec<Vec2>> {
    if points.len() < 3 {
        return None;
    }

    // Find leftmost point (lowest y breaks ties)
    let mut start = 0;
    for i in 1..points.len() {
        if points[i].x < points[start].x
            || (points[i].x == points[start].x && points[i].y < points[start].y)
        {
            start = i;
        }
    }

    let mut hull = Vec::new();
    let mut current = start;
    loop {
        hull.push(points[current]);
        let mut next = (current + 1) % points.len();
        for i in 0..points.len() {
            let o = points[current];
            let c = cross(o, points[next], points[i]);
            // Clockwise of the candidate, or collinear but farther away.
            if c < 0.0 || (c == 0.0 && o.distance(points[i]) > o.distance(points[next])) {
                next = i;
            }
        }
        current = next;
        if current == start || hull.len() > points.len() {
            break;
        }
    }

    if hull.len() < 3 {
        return None;
    }
    Some(hull)
}

/// Cross product to determine turn direction
fn cross(o: Vec2, a: Vec2, b: Vec2) -> f32 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

//! Per-face scoring (§4.2 "Per-face scoring"): support, confidence, coverage.
//!
//! Runs as a pass over the finished hypothesis graph (never during
//! construction, per §9 "exact/inexact duality" — scoring is where exact
//! coordinates are converted to float and discarded).

use nalgebra::Vector2;

use crate::alpha_shape::AlphaShapeMesh;
use crate::config::Config;
use crate::segment::PlanarSegment;

use super::types::{Face, HypothesisGraph};

/// Score every face in `graph` against its segment's points and alpha
/// shape, mutating `support`/`confidence`/`coverage` in place.
pub fn score_faces(graph: &mut HypothesisGraph, segments: &[PlanarSegment], alpha_shapes: &[AlphaShapeMesh], cfg: &Config) {
    for face in graph.faces.iter_mut() {
        if face.is_bbox_face {
            // No segment backs a bounding-box face: zero data-fit reward by
            // construction (spec.md §4.2 "Faces with supp(f) = 0 and
            // conf(f) = 0 are retained").
            continue;
        }
        let segment = &segments[face.plane_index];
        let alpha_mesh = &alpha_shapes[face.plane_index];
        let frame = segment.plane.frame();
        let face_2d: Vec<Vector2<f64>> = face
            .exact_boundary
            .iter()
            .map(|v| {
                let p = v.to_f64();
                frame.to_2d(nalgebra::Vector3::new(p[0], p[1], p[2]))
            })
            .collect();

        let eps = cfg
            .residual_tolerance
            .unwrap_or_else(|| 3.0 * segment.mean_point_spacing());

        face.support = support_term(face, segment, &face_2d, eps, &frame);
        face.confidence = confidence_term(&face_2d, alpha_mesh);
        face.coverage = face.confidence * face.area;
    }
}

fn support_term(
    face: &Face,
    segment: &PlanarSegment,
    face_2d: &[Vector2<f64>],
    eps: f64,
    frame: &crate::segment::Frame2D,
) -> f64 {
    let _ = face; // kept for symmetry with confidence_term's signature
    if eps <= 0.0 || face_2d.len() < 3 {
        return 0.0;
    }
    let mut total = 0.0;
    for p in &segment.points {
        let pos = p.position_vec();
        let p2 = frame.to_2d(pos);
        if !point_in_convex_polygon(face_2d, p2) {
            continue;
        }
        let d = segment.plane.eval(pos); // signed distance (plane is unit-normal)
        let reward = 1.0 - (d * d) / (eps * eps);
        total += reward.max(0.0);
    }
    total
}

fn confidence_term(face_2d: &[Vector2<f64>], alpha_mesh: &AlphaShapeMesh) -> f64 {
    if face_2d.len() < 3 {
        return 0.0;
    }
    let face_area = polygon_area_2d(face_2d);
    if face_area <= f64::EPSILON {
        return 0.0;
    }
    let mut covered = 0.0;
    for tri in &alpha_mesh.triangles {
        let clipped = clip_convex_convex(&tri.verts_2d, face_2d);
        covered += polygon_area_2d(&clipped);
    }
    (covered / face_area).clamp(0.0, 1.0)
}

/// Point-in-convex-polygon test robust to either winding direction: a point
/// is inside iff the cross product of every boundary edge with the
/// point-to-vertex vector has the same sign throughout.
fn point_in_convex_polygon(poly: &[Vector2<f64>], p: Vector2<f64>) -> bool {
    let n = poly.len();
    if n < 3 {
        return false;
    }
    let mut pos = false;
    let mut neg = false;
    for i in 0..n {
        let a = poly[i];
        let b = poly[(i + 1) % n];
        let cross = (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
        if cross > 1e-12 {
            pos = true;
        } else if cross < -1e-12 {
            neg = true;
        }
        if pos && neg {
            return false;
        }
    }
    true
}

fn polygon_area_2d(poly: &[Vector2<f64>]) -> f64 {
    if poly.len() < 3 {
        return 0.0;
    }
    let mut acc = 0.0;
    for i in 0..poly.len() {
        let a = poly[i];
        let b = poly[(i + 1) % poly.len()];
        acc += a.x * b.y - b.x * a.y;
    }
    (acc * 0.5).abs()
}

fn centroid_2d(poly: &[Vector2<f64>]) -> Vector2<f64> {
    let mut c = Vector2::new(0.0, 0.0);
    for p in poly {
        c += p;
    }
    c / (poly.len().max(1) as f64)
}

/// Intersect a convex `subject` polygon against a convex `clip` polygon via
/// iterated half-plane clipping, orientation-agnostic (the keep side of
/// each `clip` edge is chosen so that `clip`'s own centroid stays inside).
fn clip_convex_convex(subject: &[Vector2<f64>], clip: &[Vector2<f64>]) -> Vec<Vector2<f64>> {
    if subject.len() < 3 || clip.len() < 3 {
        return Vec::new();
    }
    let centroid = centroid_2d(clip);
    let mut output = subject.to_vec();
    for i in 0..clip.len() {
        if output.is_empty() {
            break;
        }
        let a = clip[i];
        let b = clip[(i + 1) % clip.len()];
        let edge = b - a;
        let centroid_side = edge.x * (centroid.y - a.y) - edge.y * (centroid.x - a.x);
        let keep_sign = if centroid_side >= 0.0 { 1.0 } else { -1.0 };
        output = clip_by_halfplane(&output, a, b, keep_sign);
    }
    output
}

fn clip_by_halfplane(poly: &[Vector2<f64>], a: Vector2<f64>, b: Vector2<f64>, keep_sign: f64) -> Vec<Vector2<f64>> {
    let edge = b - a;
    let side = |p: Vector2<f64>| (edge.x * (p.y - a.y) - edge.y * (p.x - a.x)) * keep_sign;
    let n = poly.len();
    let mut out = Vec::with_capacity(n + 1);
    for i in 0..n {
        let cur = poly[i];
        let next = poly[(i + 1) % n];
        let cur_in = side(cur) >= -1e-12;
        let next_in = side(next) >= -1e-12;
        if cur_in {
            out.push(cur);
        }
        if cur_in != next_in {
            let s_cur = side(cur);
            let s_next = side(next);
            let denom = s_cur - s_next;
            if denom.abs() > 1e-15 {
                let t = s_cur / denom;
                out.push(cur + (next - cur) * t);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_in_square_detects_interior_and_exterior() {
        let sq = vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(1.0, 1.0),
            Vector2::new(0.0, 1.0),
        ];
        assert!(point_in_convex_polygon(&sq, Vector2::new(0.5, 0.5)));
        assert!(!point_in_convex_polygon(&sq, Vector2::new(1.5, 0.5)));
    }

    #[test]
    fn clip_full_overlap_returns_full_area() {
        let sq = vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(1.0, 1.0),
            Vector2::new(0.0, 1.0),
        ];
        let tri = vec![Vector2::new(0.0, 0.0), Vector2::new(1.0, 0.0), Vector2::new(1.0, 1.0)];
        let clipped = clip_convex_convex(&tri, &sq);
        assert!((polygon_area_2d(&clipped) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn clip_disjoint_regions_is_empty() {
        let sq = vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(1.0, 1.0),
            Vector2::new(0.0, 1.0),
        ];
        let far_tri = vec![
            Vector2::new(10.0, 10.0),
            Vector2::new(11.0, 10.0),
            Vector2::new(11.0, 11.0),
        ];
        let clipped = clip_convex_convex(&far_tri, &sq);
        assert!(polygon_area_2d(&clipped) < 1e-9);
    }
}

//! Alpha-shape boundary extractor (§4.1).
//!
//! Given a planar segment, builds a 2D Delaunay triangulation of its
//! projected points (via `spade`), filters simplices by the alpha-shape
//! circumradius test, and lifts the retained triangles back to 3D. The
//! result is used downstream purely as a coverage test during scoring
//! (`arrangement::scoring`), so it stays entirely in inexact f64.

use nalgebra::Vector2;
use spade::{DelaunayTriangulation, Point2, Triangulation};

use crate::segment::{Frame2D, PlanarSegment};

/// A single alpha-shape triangle, kept in both 2D (for clipping against
/// candidate faces) and 3D (for any downstream rendering/diagnostics).
#[derive(Clone, Copy, Debug)]
pub struct Triangle2 {
    pub verts_2d: [Vector2<f64>; 3],
}

impl Triangle2 {
    pub fn area(&self) -> f64 {
        let [a, b, c] = self.verts_2d;
        0.5 * ((b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)).abs()
    }

    pub fn circumradius(&self) -> f64 {
        let [a, b, c] = self.verts_2d;
        let ab = (b - a).norm();
        let bc = (c - b).norm();
        let ca = (a - c).norm();
        let area = self.area();
        if area <= f64::EPSILON {
            return f64::INFINITY;
        }
        (ab * bc * ca) / (4.0 * area)
    }
}

/// A 2D triangle mesh on a segment's supporting plane, approximating the
/// region actually covered by its points.
#[derive(Clone, Debug, Default)]
pub struct AlphaShapeMesh {
    pub triangles: Vec<Triangle2>,
}

impl AlphaShapeMesh {
    pub fn total_area(&self) -> f64 {
        self.triangles.iter().map(Triangle2::area).sum()
    }
}

/// Build the alpha-shape mesh for `segment`. `alpha` is the alpha-shape
/// radius parameter; pass `None` to use the auto-alpha policy
/// (`alpha_scale * mean_nearest_neighbor_distance`).
///
/// Returns an empty mesh (not an error) when the segment has fewer than 3
/// points or all points are collinear in 2D, per §4.1 "Failure".
pub fn build_alpha_shape(segment: &PlanarSegment, alpha_scale: f64) -> AlphaShapeMesh {
    let pts = segment.points_2d();
    if pts.len() < 3 {
        return AlphaShapeMesh::default();
    }

    let mut triangulation: DelaunayTriangulation<Point2<f64>> = DelaunayTriangulation::new();
    for p in &pts {
        if p.x.is_finite() && p.y.is_finite() {
            let _ = triangulation.insert(Point2::new(p.x, p.y));
        }
    }
    if triangulation.num_inner_faces() == 0 {
        return AlphaShapeMesh::default(); // collinear or degenerate point set
    }

    let alpha = alpha_scale * segment.mean_point_spacing();
    if !(alpha > 0.0) {
        return AlphaShapeMesh::default();
    }

    let mut triangles = Vec::new();
    for face in triangulation.inner_faces() {
        let verts: Vec<Point2<f64>> = face.vertices().iter().map(|v| *v.data()).collect();
        let tri = Triangle2 {
            verts_2d: [
                Vector2::new(verts[0].x, verts[0].y),
                Vector2::new(verts[1].x, verts[1].y),
                Vector2::new(verts[2].x, verts[2].y),
            ],
        };
        // "interior" (circumradius <= alpha) and "regular" (shares an edge
        // with the alpha-complex boundary) triangles are both retained; in
        // practice the circumradius test alone classifies both cases for a
        // uniformly-sampled planar region, since a regular triangle's
        // circumscribed circle is, by definition of regularity, no larger
        // than alpha on at least one side.
        if tri.circumradius() <= alpha {
            triangles.push(tri);
        }
    }
    AlphaShapeMesh { triangles }
}

/// Lift a 2D alpha-shape mesh back into 3D using the segment's frame
/// (used by diagnostics/rendering only; scoring works in 2D directly).
pub fn lift_to_3d(mesh: &AlphaShapeMesh, frame: &Frame2D) -> Vec<[nalgebra::Vector3<f64>; 3]> {
    mesh.triangles
        .iter()
        .map(|t| {
            [
                frame.to_3d(t.verts_2d[0]),
                frame.to_3d(t.verts_2d[1]),
                frame.to_3d(t.verts_2d[2]),
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::{PlaneEq, PointSample};

    fn grid_segment(n: usize) -> PlanarSegment {
        let mut points = Vec::new();
        for i in 0..n {
            for j in 0..n {
                points.push(PointSample {
                    position: [i as f64, j as f64, 0.0],
                    normal: None,
                    color: None,
                });
            }
        }
        PlanarSegment {
            points,
            plane: PlaneEq {
                a: 0.0,
                b: 0.0,
                c: 1.0,
                d: 0.0,
            },
            color: None,
        }
    }

    #[test]
    fn dense_grid_yields_nonempty_coverage() {
        let seg = grid_segment(10);
        let mesh = build_alpha_shape(&seg, 5.0);
        assert!(!mesh.triangles.is_empty());
        assert!(mesh.total_area() > 0.0);
    }

    #[test]
    fn too_few_points_yields_empty_mesh() {
        let seg = PlanarSegment {
            points: vec![
                PointSample {
                    position: [0.0, 0.0, 0.0],
                    normal: None,
                    color: None,
                },
                PointSample {
                    position: [1.0, 0.0, 0.0],
                    normal: None,
                    color: None,
                },
            ],
            plane: PlaneEq {
                a: 0.0,
                b: 0.0,
                c: 1.0,
                d: 0.0,
            },
            color: None,
        };
        let mesh = build_alpha_shape(&seg, 5.0);
        assert!(mesh.triangles.is_empty());
    }

    #[test]
    fn collinear_points_yield_empty_mesh() {
        let points = (0..10)
            .map(|i| PointSample {
                position: [i as f64, 0.0, 0.0],
                normal: None,
                color: None,
            })
            .collect();
        let seg = PlanarSegment {
            points,
            plane: PlaneEq {
                a: 0.0,
                b: 0.0,
                c: 1.0,
                d: 0.0,
            },
            color: None,
        };
        let mesh = build_alpha_shape(&seg, 5.0);
        assert!(mesh.triangles.is_empty());
    }
}

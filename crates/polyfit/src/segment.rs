//! Planar segment model (§3 "Planar segment S").
//!
//! A segment is an immutable input: a member-point set, a supporting plane,
//! and (lazily, via `alpha_shape::build_alpha_shape`) a 2D alpha-shape mesh
//! over its own frame. The hypothesis graph never mutates a segment after
//! construction.

use nalgebra::{Vector2, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::PolyfitError;

/// A single 3D point sample, optionally colored, optionally normal-bearing,
/// and belonging to at most one planar segment (tracked by the segment that
/// owns it, not by the point itself — see §3 "null if unassigned").
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct PointSample {
    pub position: [f64; 3],
    pub normal: Option<[f64; 3]>,
    pub color: Option<[u8; 3]>,
}

impl PointSample {
    pub fn position_vec(&self) -> Vector3<f64> {
        Vector3::new(self.position[0], self.position[1], self.position[2])
    }
}

/// Supporting plane `a*x + b*y + c*z + d = 0` with unit `(a, b, c)`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct PlaneEq {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl PlaneEq {
    pub fn normal(&self) -> Vector3<f64> {
        Vector3::new(self.a, self.b, self.c)
    }

    pub fn eval(&self, p: Vector3<f64>) -> f64 {
        self.a * p.x + self.b * p.y + self.c * p.z + self.d
    }

    pub fn is_unit_normal(&self, eps: f64) -> bool {
        (self.normal().norm() - 1.0).abs() <= eps
    }

    /// An orthonormal 2D frame `(u, v)` spanning the plane, with origin at
    /// the point on the plane nearest the global origin. Used only to embed
    /// member points for alpha-shape work and to score faces; never used by
    /// arrangement construction (which stays in exact 3D, see `kernel`).
    pub fn frame(&self) -> Frame2D {
        let n = self.normal();
        let origin = -self.d * n; // n is unit, so this is the foot of the perpendicular from 0.
        let helper = if n.x.abs() < 0.9 {
            Vector3::new(1.0, 0.0, 0.0)
        } else {
            Vector3::new(0.0, 1.0, 0.0)
        };
        let u = (helper - helper.dot(&n) * n).normalize();
        let v = n.cross(&u);
        Frame2D { origin, u, v, n }
    }
}

/// Orthonormal 2D parametrization of a plane embedded in R^3.
#[derive(Clone, Copy, Debug)]
pub struct Frame2D {
    pub origin: Vector3<f64>,
    pub u: Vector3<f64>,
    pub v: Vector3<f64>,
    pub n: Vector3<f64>,
}

impl Frame2D {
    pub fn to_2d(&self, p: Vector3<f64>) -> Vector2<f64> {
        let d = p - self.origin;
        Vector2::new(d.dot(&self.u), d.dot(&self.v))
    }

    pub fn to_3d(&self, p: Vector2<f64>) -> Vector3<f64> {
        self.origin + p.x * self.u + p.y * self.v
    }
}

/// A planar point subset with its supporting plane. Immutable once built.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlanarSegment {
    pub points: Vec<PointSample>,
    pub plane: PlaneEq,
    pub color: Option<[u8; 3]>,
}

impl PlanarSegment {
    pub fn validate(&self, eps_unit_normal: f64) -> Result<(), PolyfitError> {
        if self.points.len() < 3 {
            return Err(PolyfitError::InvalidInput(format!(
                "segment has {} points, need >= 3",
                self.points.len()
            )));
        }
        if !self.plane.is_unit_normal(eps_unit_normal) {
            return Err(PolyfitError::InvalidInput(format!(
                "segment plane normal is not unit: |n| = {}",
                self.plane.normal().norm()
            )));
        }
        Ok(())
    }

    pub fn mean_point_spacing(&self) -> f64 {
        nearest_neighbor_mean_spacing(&self.points_2d())
    }

    pub fn points_2d(&self) -> Vec<Vector2<f64>> {
        let frame = self.plane.frame();
        self.points
            .iter()
            .map(|p| frame.to_2d(p.position_vec()))
            .collect()
    }
}

/// Merge segments that share the same supporting plane (spec.md §9 open
/// question: "merge such segments at entry (union of points) before
/// constructing pi, since the arrangement treats each plane once").
/// Planes are considered the same when their unit normals and offsets
/// agree within `eps`.
pub fn merge_duplicate_planes(segments: Vec<PlanarSegment>, eps: f64) -> Vec<PlanarSegment> {
    let mut merged: Vec<PlanarSegment> = Vec::with_capacity(segments.len());
    'outer: for seg in segments {
        for existing in merged.iter_mut() {
            let same_plane = (existing.plane.a - seg.plane.a).abs() <= eps
                && (existing.plane.b - seg.plane.b).abs() <= eps
                && (existing.plane.c - seg.plane.c).abs() <= eps
                && (existing.plane.d - seg.plane.d).abs() <= eps;
            if same_plane {
                existing.points.extend(seg.points.iter().copied());
                if existing.color.is_none() {
                    existing.color = seg.color;
                }
                continue 'outer;
            }
        }
        merged.push(seg);
    }
    merged
}

/// Mean nearest-neighbor distance among 2D points (O(n^2); segments are
/// small enough in practice that a spatial index would be premature here,
/// consistent with the teacher's "explicit over clever" style for
/// moderate-count geometry).
pub fn nearest_neighbor_mean_spacing(points: &[Vector2<f64>]) -> f64 {
    if points.len() < 2 {
        return 1.0;
    }
    let mut total = 0.0;
    for (i, p) in points.iter().enumerate() {
        let mut best = f64::INFINITY;
        for (j, q) in points.iter().enumerate() {
            if i == j {
                continue;
            }
            let d = (p - q).norm();
            if d < best {
                best = d;
            }
        }
        total += best;
    }
    total / points.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(x: f64, y: f64, z: f64) -> PointSample {
        PointSample {
            position: [x, y, z],
            normal: None,
            color: None,
        }
    }

    #[test]
    fn frame_round_trips_plane_points() {
        let plane = PlaneEq {
            a: 0.0,
            b: 0.0,
            c: 1.0,
            d: -2.0,
        }; // z = 2
        let frame = plane.frame();
        let p = Vector3::new(1.5, -0.5, 2.0);
        let p2 = frame.to_2d(p);
        let back = frame.to_3d(p2);
        assert!((back - p).norm() < 1e-9);
    }

    #[test]
    fn rejects_too_few_points() {
        let seg = PlanarSegment {
            points: vec![sample(0.0, 0.0, 0.0), sample(1.0, 0.0, 0.0)],
            plane: PlaneEq {
                a: 0.0,
                b: 0.0,
                c: 1.0,
                d: 0.0,
            },
            color: None,
        };
        assert!(seg.validate(1e-6).is_err());
    }

    #[test]
    fn merges_segments_sharing_a_plane() {
        let plane = PlaneEq {
            a: 0.0,
            b: 0.0,
            c: 1.0,
            d: 0.0,
        };
        let a = PlanarSegment {
            points: vec![sample(0.0, 0.0, 0.0), sample(1.0, 0.0, 0.0), sample(0.0, 1.0, 0.0)],
            plane,
            color: None,
        };
        let b = PlanarSegment {
            points: vec![sample(2.0, 0.0, 0.0), sample(2.0, 1.0, 0.0), sample(2.0, 2.0, 0.0)],
            plane,
            color: None,
        };
        let merged = merge_duplicate_planes(vec![a, b], 1e-9);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].points.len(), 6);
    }
}

//! Exact-rational geometry kernel: predicates and constructions needed by
//! the hypothesis generator (§4.2). Every input plane/point is a `f64`; we
//! lift it once into an exact rational (`BigRational::from_float` is exact
//! for any finite `f64` — it reproduces the value's binary fraction bit for
//! bit) and keep all downstream construction arithmetic exact. Conversion
//! back to `f64` is deferred to scoring and the output mesh.
//!
//! Why this design
//! - Plane-plane(-plane) intersection and polygon clipping are the only
//!   operations that must never accumulate floating-point error: a single
//!   misclassified "which side of this cut" decision silently drops or
//!   duplicates a candidate face. Everything downstream (areas, alpha-shape
//!   coverage) tolerates float error, so it stays in `nalgebra` f64.
//! - `num_rational::BigRational` already reduces to lowest terms and derives
//!   `Eq`/`Hash`, so exact vertex/edge identity (spec: "Edge identity") falls
//!   out of `HashMap` for free; no custom quantization is needed.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, Zero};

/// Exact rational scalar used throughout arrangement construction.
pub type Exact = BigRational;

#[inline]
pub fn to_exact(x: f64) -> Exact {
    BigRational::from_float(x).unwrap_or_else(|| BigRational::from_integer(BigInt::zero()))
}

#[inline]
pub fn to_f64(x: &Exact) -> f64 {
    // `to_f64` rounds to nearest representable f64; acceptable since this is
    // the documented exact -> inexact boundary (scoring/output).
    use num_traits::ToPrimitive;
    x.to_f64().unwrap_or(0.0)
}

/// Exact point/vector in R^3.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ExactVec3 {
    pub x: Exact,
    pub y: Exact,
    pub z: Exact,
}

impl ExactVec3 {
    pub fn new(x: Exact, y: Exact, z: Exact) -> Self {
        Self { x, y, z }
    }

    pub fn from_f64(x: f64, y: f64, z: f64) -> Self {
        Self::new(to_exact(x), to_exact(y), to_exact(z))
    }

    pub fn to_f64(&self) -> [f64; 3] {
        [to_f64(&self.x), to_f64(&self.y), to_f64(&self.z)]
    }

    pub fn sub(&self, other: &Self) -> Self {
        Self::new(
            &self.x - &other.x,
            &self.y - &other.y,
            &self.z - &other.z,
        )
    }

    pub fn add(&self, other: &Self) -> Self {
        Self::new(
            &self.x + &other.x,
            &self.y + &other.y,
            &self.z + &other.z,
        )
    }

    pub fn scale(&self, s: &Exact) -> Self {
        Self::new(&self.x * s, &self.y * s, &self.z * s)
    }

    pub fn lerp(&self, other: &Self, t: &Exact) -> Self {
        self.add(&other.sub(self).scale(t))
    }
}

/// A supporting plane `a*x + b*y + c*z + d = 0`, lifted to exact rationals.
/// `(a, b, c)` need not be unit in exact form (normalization is an inexact
/// concept); the spec's unit-normal invariant is checked on the original
/// `f64` input at the `PlaneEq` boundary (see `segment.rs`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ExactPlane {
    pub a: Exact,
    pub b: Exact,
    pub c: Exact,
    pub d: Exact,
}

impl ExactPlane {
    pub fn from_f64(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self {
            a: to_exact(a),
            b: to_exact(b),
            c: to_exact(c),
            d: to_exact(d),
        }
    }

    /// Signed evaluation `a*x + b*y + c*z + d`; sign determines which side
    /// of the plane a point lies on. Zero means exactly on the plane.
    pub fn eval(&self, p: &ExactVec3) -> Exact {
        &self.a * &p.x + &self.b * &p.y + &self.c * &p.z + &self.d
    }
}

/// Axis-aligned bounding box with exact corner coordinates.
#[derive(Clone, Debug)]
pub struct ExactBox {
    pub min: ExactVec3,
    pub max: ExactVec3,
}

impl ExactBox {
    pub fn corners(&self) -> [ExactVec3; 8] {
        let xs = [self.min.x.clone(), self.max.x.clone()];
        let ys = [self.min.y.clone(), self.max.y.clone()];
        let zs = [self.min.z.clone(), self.max.z.clone()];
        let mut out: Vec<ExactVec3> = Vec::with_capacity(8);
        for x in &xs {
            for y in &ys {
                for z in &zs {
                    out.push(ExactVec3::new(x.clone(), y.clone(), z.clone()));
                }
            }
        }
        out.try_into().unwrap_or_else(|_| unreachable!())
    }

    /// The 12 edges of the box as index pairs into `corners()`.
    pub fn edges() -> [(usize, usize); 12] {
        // corners() enumerates (x,y,z) in binary order: bit0=x, bit1=y, bit2=z.
        let mut edges = Vec::with_capacity(12);
        for bit in 0..3 {
            for i in 0..8 {
                if (i >> bit) & 1 == 0 {
                    let j = i | (1 << bit);
                    edges.push((i, j));
                }
            }
        }
        edges.try_into().unwrap_or_else(|_| unreachable!())
    }

    /// The 6 axis-aligned half-spaces bounding the box, as planes oriented
    /// so that the box interior satisfies `eval <= 0`.
    pub fn half_spaces(&self) -> [ExactPlane; 6] {
        let zero = Exact::zero();
        let one = Exact::from_integer(BigInt::from(1));
        let neg_one = -one.clone();
        [
            ExactPlane {
                a: one.clone(),
                b: zero.clone(),
                c: zero.clone(),
                d: -self.max.x.clone(),
            },
            ExactPlane {
                a: neg_one.clone(),
                b: zero.clone(),
                c: zero.clone(),
                d: self.min.x.clone(),
            },
            ExactPlane {
                a: zero.clone(),
                b: one.clone(),
                c: zero.clone(),
                d: -self.max.y.clone(),
            },
            ExactPlane {
                a: zero.clone(),
                b: neg_one.clone(),
                c: zero.clone(),
                d: self.min.y.clone(),
            },
            ExactPlane {
                a: zero.clone(),
                b: zero.clone(),
                c: one,
                d: -self.max.z.clone(),
            },
            ExactPlane {
                a: zero.clone(),
                b: zero,
                c: neg_one,
                d: self.min.z.clone(),
            },
        ]
    }
}

/// Intersect an infinite plane with the box, returning the (possibly empty)
/// convex polygon of intersection as a cyclically-ordered list of exact
/// vertices. Empty when the plane misses the box, or touches it only at a
/// vertex/edge (degenerate, < 3 distinct points).
///
/// Algorithm: classify each of the 8 box corners by the sign of `plane`,
/// walk the 12 box edges and record an exact crossing point wherever the
/// sign changes (or touches zero), dedup, then order the resulting points
/// around their centroid using an exact pseudo-angle (cross-product based,
/// no trigonometry) after dropping the coordinate axis most aligned with
/// the plane normal.
pub fn plane_cap_box(plane: &ExactPlane, bbox: &ExactBox) -> Vec<ExactVec3> {
    let corners = bbox.corners();
    let signs: Vec<Exact> = corners.iter().map(|p| plane.eval(p)).collect();

    let mut points: Vec<ExactVec3> = Vec::new();
    for (i, &v) in signs.iter().enumerate() {
        if v.is_zero() {
            points.push(corners[i].clone());
        }
    }
    for (i, j) in ExactBox::edges() {
        let (si, sj) = (&signs[i], &signs[j]);
        if si.is_zero() || sj.is_zero() {
            continue; // endpoint already captured above
        }
        if si.is_positive() == sj.is_positive() {
            continue; // no sign change: plane does not cross this edge
        }
        let denom = si - sj;
        let t = si / &denom;
        points.push(corners[i].lerp(&corners[j], &t));
    }
    dedup_exact_points(&mut points);
    if points.len() < 3 {
        return Vec::new();
    }
    order_convex_polygon(&mut points, plane);
    points
}

fn dedup_exact_points(points: &mut Vec<ExactVec3>) {
    let mut out: Vec<ExactVec3> = Vec::with_capacity(points.len());
    for p in points.drain(..) {
        if !out.iter().any(|q| q == &p) {
            out.push(p);
        }
    }
    *points = out;
}

/// Order points lying on `plane` cyclically (CCW with respect to the
/// plane's normal) around their centroid, using exact arithmetic only.
fn order_convex_polygon(points: &mut [ExactVec3], plane: &ExactPlane) {
    // Drop the axis most aligned with the plane normal so the remaining two
    // coordinates give a non-degenerate 2D projection. The choice of axis
    // only affects traversal order, never a coordinate value, so using an
    // f64 comparison here does not reintroduce inexactness into geometry.
    let (af, bf, cf) = (to_f64(&plane.a), to_f64(&plane.b), to_f64(&plane.c));
    let drop_axis = if af.abs() >= bf.abs() && af.abs() >= cf.abs() {
        0
    } else if bf.abs() >= cf.abs() {
        1
    } else {
        2
    };
    let proj = |p: &ExactVec3| -> (Exact, Exact) {
        match drop_axis {
            0 => (p.y.clone(), p.z.clone()),
            1 => (p.x.clone(), p.z.clone()),
            _ => (p.x.clone(), p.y.clone()),
        }
    };
    let n = points.len();
    let mut cx = Exact::zero();
    let mut cy = Exact::zero();
    let coords: Vec<(Exact, Exact)> = points.iter().map(proj).collect();
    for (x, y) in &coords {
        cx += x;
        cy += y;
    }
    let count = Exact::from_integer(BigInt::from(n as i64));
    cx /= &count;
    cy /= &count;

    let mut indexed: Vec<(usize, Exact, Exact)> = coords
        .into_iter()
        .enumerate()
        .map(|(i, (x, y))| (i, x - &cx, y - &cy))
        .collect();
    indexed.sort_by(|(_, ax, ay), (_, bx, by)| pseudo_angle_cmp(ax, ay, bx, by));
    let order: Vec<usize> = indexed.into_iter().map(|(i, _, _)| i).collect();
    let reordered: Vec<ExactVec3> = order.into_iter().map(|i| points[i].clone()).collect();
    points.clone_from_slice(&reordered);
}

/// Compare two vectors by polar angle without trigonometry: first by
/// half-plane (y >= 0 before y < 0), then by cross-product sign within a
/// half-plane.
fn pseudo_angle_cmp(ax: &Exact, ay: &Exact, bx: &Exact, by: &Exact) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    let half = |y: &Exact, x: &Exact| -> i32 {
        if y.is_positive() || (y.is_zero() && x.is_positive()) {
            0
        } else {
            1
        }
    };
    let ha = half(ay, ax);
    let hb = half(by, bx);
    if ha != hb {
        return ha.cmp(&hb);
    }
    let cross = ax * by - ay * bx;
    if cross.is_positive() {
        Ordering::Less
    } else if cross.is_negative() {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

/// Split a convex polygon (cyclic list of exact vertices, assumed coplanar)
/// by `plane`, returning `(negative_side, positive_side)` where the
/// negative side keeps `plane.eval(p) <= 0` and the positive side keeps
/// `plane.eval(p) >= 0`. Vertices exactly on `plane` belong to both sides
/// (standard Sutherland-Hodgman boundary handling). Either side may be
/// empty/degenerate (< 3 distinct vertices); callers should drop those.
pub fn split_convex_polygon(
    poly: &[ExactVec3],
    plane: &ExactPlane,
) -> (Vec<ExactVec3>, Vec<ExactVec3>) {
    if poly.len() < 3 {
        return (Vec::new(), Vec::new());
    }
    let mut neg = Vec::with_capacity(poly.len() + 1);
    let mut pos = Vec::with_capacity(poly.len() + 1);
    let n = poly.len();
    for i in 0..n {
        let cur = &poly[i];
        let next = &poly[(i + 1) % n];
        let ec = plane.eval(cur);
        let en = plane.eval(next);
        if !ec.is_positive() {
            neg.push(cur.clone());
        }
        if !ec.is_negative() {
            pos.push(cur.clone());
        }
        let crosses = (ec.is_positive() && en.is_negative()) || (ec.is_negative() && en.is_positive());
        if crosses {
            let denom = &ec - &en;
            let t = &ec / denom;
            let x = cur.lerp(next, &t);
            neg.push(x.clone());
            pos.push(x);
        }
    }
    dedup_exact_points(&mut neg);
    dedup_exact_points(&mut pos);
    (neg, pos)
}

/// Inexact (f64) polygon area via the shoelace-on-a-plane formula (sum of
/// cross products about the centroid), used only for scoring.
pub fn polygon_area_f64(poly: &[[f64; 3]]) -> f64 {
    if poly.len() < 3 {
        return 0.0;
    }
    let c = polygon_centroid_f64(poly);
    let mut total = [0.0f64; 3];
    for i in 0..poly.len() {
        let a = sub3(poly[i], c);
        let b = sub3(poly[(i + 1) % poly.len()], c);
        let cr = cross3(a, b);
        for k in 0..3 {
            total[k] += cr[k];
        }
    }
    0.5 * (total[0] * total[0] + total[1] * total[1] + total[2] * total[2]).sqrt()
}

pub fn polygon_centroid_f64(poly: &[[f64; 3]]) -> [f64; 3] {
    let n = poly.len() as f64;
    let mut c = [0.0; 3];
    for p in poly {
        for k in 0..3 {
            c[k] += p[k];
        }
    }
    for k in 0..3 {
        c[k] /= n.max(1.0);
    }
    c
}

fn sub3(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn cross3(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox_unit() -> ExactBox {
        ExactBox {
            min: ExactVec3::from_f64(-1.0, -1.0, -1.0),
            max: ExactVec3::from_f64(1.0, 1.0, 1.0),
        }
    }

    #[test]
    fn plane_cap_box_gives_square_for_axis_aligned_plane() {
        // z = 0 cuts the [-1,1]^3 cube into a 2x2 square.
        let plane = ExactPlane::from_f64(0.0, 0.0, 1.0, 0.0);
        let poly = plane_cap_box(&plane, &bbox_unit());
        assert_eq!(poly.len(), 4);
        let f: Vec<[f64; 3]> = poly.iter().map(|p| p.to_f64()).collect();
        let area = polygon_area_f64(&f);
        assert!((area - 4.0).abs() < 1e-9, "area={area}");
    }

    #[test]
    fn plane_missing_box_yields_empty() {
        let plane = ExactPlane::from_f64(0.0, 0.0, 1.0, -10.0); // z = 10
        let poly = plane_cap_box(&plane, &bbox_unit());
        assert!(poly.is_empty());
    }

    #[test]
    fn split_diagonal_plane_partitions_square() {
        let plane = ExactPlane::from_f64(0.0, 0.0, 1.0, 0.0);
        let square = plane_cap_box(&plane, &bbox_unit());
        // Cut the square (at z=0) by x <= 0 / x >= 0.
        let cut = ExactPlane::from_f64(1.0, 0.0, 0.0, 0.0);
        let (neg, pos) = split_convex_polygon(&square, &cut);
        assert!(neg.len() >= 3);
        assert!(pos.len() >= 3);
        let neg_area = polygon_area_f64(&neg.iter().map(|p| p.to_f64()).collect::<Vec<_>>());
        let pos_area = polygon_area_f64(&pos.iter().map(|p| p.to_f64()).collect::<Vec<_>>());
        assert!((neg_area - 2.0).abs() < 1e-9);
        assert!((pos_area - 2.0).abs() < 1e-9);
    }

    #[test]
    fn split_by_non_intersecting_plane_keeps_one_side_whole() {
        let plane = ExactPlane::from_f64(0.0, 0.0, 1.0, 0.0);
        let square = plane_cap_box(&plane, &bbox_unit());
        // x <= 10 is satisfied everywhere; x >= 10 is satisfied nowhere.
        let cut = ExactPlane::from_f64(1.0, 0.0, 0.0, -10.0);
        let (neg, pos) = split_convex_polygon(&square, &cut);
        assert_eq!(neg.len(), square.len());
        assert!(pos.is_empty());
    }
}

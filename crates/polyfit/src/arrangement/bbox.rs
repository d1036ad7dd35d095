//! Bounding box construction (§4.2 step 1).

use crate::kernel::{to_exact, ExactBox, ExactVec3};
use crate::segment::PlanarSegment;

/// Axis-aligned bounding box in f64, for diagnostics and as the source of
/// the exact box used by arrangement construction.
#[derive(Clone, Copy, Debug)]
pub struct BoundingBox {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl BoundingBox {
    pub fn diagonal(&self) -> f64 {
        let d = [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ];
        (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt()
    }

    pub fn inflated(&self, margin_fraction: f64) -> Self {
        let diag = self.diagonal();
        let pad = diag * margin_fraction;
        Self {
            min: [self.min[0] - pad, self.min[1] - pad, self.min[2] - pad],
            max: [self.max[0] + pad, self.max[1] + pad, self.max[2] + pad],
        }
    }

    pub fn to_exact(self) -> ExactBox {
        ExactBox {
            min: ExactVec3::new(to_exact(self.min[0]), to_exact(self.min[1]), to_exact(self.min[2])),
            max: ExactVec3::new(to_exact(self.max[0]), to_exact(self.max[1]), to_exact(self.max[2])),
        }
    }
}

/// Compute the bounding box enclosing every point across every segment,
/// inflated by `margin_fraction` of the (un-inflated) diagonal.
pub fn compute_bounding_box(segments: &[PlanarSegment], margin_fraction: f64) -> Option<BoundingBox> {
    let mut min = [f64::INFINITY; 3];
    let mut max = [f64::NEG_INFINITY; 3];
    let mut any = false;
    for seg in segments {
        for p in &seg.points {
            any = true;
            for k in 0..3 {
                min[k] = min[k].min(p.position[k]);
                max[k] = max[k].max(p.position[k]);
            }
        }
    }
    if !any {
        return None;
    }
    Some(BoundingBox { min, max }.inflated(margin_fraction))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::{PlaneEq, PlanarSegment, PointSample};

    #[test]
    fn inflates_by_fraction_of_diagonal() {
        let seg = PlanarSegment {
            points: vec![
                PointSample { position: [0.0, 0.0, 0.0], normal: None, color: None },
                PointSample { position: [1.0, 1.0, 1.0], normal: None, color: None },
            ],
            plane: PlaneEq { a: 0.0, b: 0.0, c: 1.0, d: 0.0 },
            color: None,
        };
        let bbox = compute_bounding_box(&[seg], 0.0).unwrap();
        assert!((bbox.min[0] - 0.0).abs() < 1e-9);
        assert!((bbox.max[0] - 1.0).abs() < 1e-9);

        let bbox_margin = compute_bounding_box(
            &[PlanarSegment {
                points: vec![
                    PointSample { position: [0.0, 0.0, 0.0], normal: None, color: None },
                    PointSample { position: [1.0, 1.0, 1.0], normal: None, color: None },
                ],
                plane: PlaneEq { a: 0.0, b: 0.0, c: 1.0, d: 0.0 },
                color: None,
            }],
            0.05,
        )
        .unwrap();
        assert!(bbox_margin.min[0] < 0.0);
        assert!(bbox_margin.max[0] > 1.0);
    }
}

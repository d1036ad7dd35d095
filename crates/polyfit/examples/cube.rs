//! Reconstructs a unit cube from six axis-aligned planar segments, the
//! literal end-to-end scenario from the testable-properties list: 6 faces,
//! 12 edges, 8 vertices, data-fit term close to 1.

use polyfit::{reconstruct, Config, PlaneEq, PlanarSegment, PointSample};

fn cube_face(plane: PlaneEq, to3d: impl Fn(f64, f64) -> [f64; 3]) -> PlanarSegment {
    let mut points = Vec::new();
    for i in 0..10 {
        for j in 0..10 {
            let u = (i as f64 / 9.0 - 0.5) * 0.9;
            let v = (j as f64 / 9.0 - 0.5) * 0.9;
            points.push(PointSample {
                position: to3d(u, v),
                normal: None,
                color: None,
            });
        }
    }
    PlanarSegment { points, plane, color: None }
}

fn main() {
    tracing_subscriber::fmt().with_target(false).init();

    let segments = vec![
        cube_face(PlaneEq { a: 1.0, b: 0.0, c: 0.0, d: -0.5 }, |u, v| [0.5, u, v]),
        cube_face(PlaneEq { a: -1.0, b: 0.0, c: 0.0, d: -0.5 }, |u, v| [-0.5, u, v]),
        cube_face(PlaneEq { a: 0.0, b: 1.0, c: 0.0, d: -0.5 }, |u, v| [u, 0.5, v]),
        cube_face(PlaneEq { a: 0.0, b: -1.0, c: 0.0, d: -0.5 }, |u, v| [u, -0.5, v]),
        cube_face(PlaneEq { a: 0.0, b: 0.0, c: 1.0, d: -0.5 }, |u, v| [u, v, 0.5]),
        cube_face(PlaneEq { a: 0.0, b: 0.0, c: -1.0, d: -0.5 }, |u, v| [u, v, -0.5]),
    ];

    let (mesh, diagnostics) = reconstruct(segments, Config::default()).expect("reconstruction should succeed");

    println!("faces: {}", mesh.faces.len());
    println!("vertices: {}", mesh.vertices.len());
    println!("diagnostics: {diagnostics:?}");
}

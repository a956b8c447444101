//! Tessellation of URDF primitive shapes
//!
//! All shapes are centred on the origin of their visual frame; cylinders run along Z.

use std::f32::consts::{PI, TAU};

use super::TriMesh;

const CYLINDER_SEGMENTS: u32 = 32;
const SPHERE_SEGMENTS: u32 = 32;
const SPHERE_RINGS: u32 = 16;

/// Axis-aligned box with the given full extents: 8 corners, 12 outward-facing triangles
pub fn box_mesh(size: [f32; 3]) -> TriMesh {
    let [hx, hy, hz] = [size[0] / 2.0, size[1] / 2.0, size[2] / 2.0];

    let vertices = vec![
        [-hx, -hy, -hz],
        [hx, -hy, -hz],
        [hx, hy, -hz],
        [-hx, hy, -hz],
        [-hx, -hy, hz],
        [hx, -hy, hz],
        [hx, hy, hz],
        [-hx, hy, hz],
    ];

    let faces = vec![
        // -Z
        [0, 2, 1],
        [0, 3, 2],
        // +Z
        [4, 5, 6],
        [4, 6, 7],
        // -Y
        [0, 1, 5],
        [0, 5, 4],
        // +Y
        [3, 6, 2],
        [3, 7, 6],
        // -X
        [0, 4, 7],
        [0, 7, 3],
        // +X
        [1, 2, 6],
        [1, 6, 5],
    ];

    TriMesh::new(vertices, faces)
}

/// Capped cylinder of the given radius and length
pub fn cylinder_mesh(radius: f32, length: f32) -> TriMesh {
    let n = CYLINDER_SEGMENTS;
    let hz = length / 2.0;

    let mut vertices = Vec::with_capacity(2 * n as usize + 2);
    for z in [-hz, hz] {
        for i in 0..n {
            let theta = TAU * i as f32 / n as f32;
            vertices.push([radius * theta.cos(), radius * theta.sin(), z]);
        }
    }
    let bottom_center = 2 * n;
    let top_center = 2 * n + 1;
    vertices.push([0.0, 0.0, -hz]);
    vertices.push([0.0, 0.0, hz]);

    let mut faces = Vec::with_capacity(4 * n as usize);
    for i in 0..n {
        let j = (i + 1) % n;
        let (b0, b1, t0, t1) = (i, j, i + n, j + n);
        faces.push([b0, b1, t1]);
        faces.push([b0, t1, t0]);
        faces.push([bottom_center, b1, b0]);
        faces.push([top_center, t0, t1]);
    }

    TriMesh::new(vertices, faces)
}

/// UV sphere with single pole vertices
pub fn sphere_mesh(radius: f32) -> TriMesh {
    let (segments, rings) = (SPHERE_SEGMENTS, SPHERE_RINGS);

    let mut vertices = Vec::with_capacity((segments * (rings - 1) + 2) as usize);
    vertices.push([0.0, 0.0, radius]);
    for r in 1..rings {
        let phi = PI * r as f32 / rings as f32;
        for s in 0..segments {
            let theta = TAU * s as f32 / segments as f32;
            vertices.push([
                radius * phi.sin() * theta.cos(),
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
            ]);
        }
    }
    let south = vertices.len() as u32;
    vertices.push([0.0, 0.0, -radius]);

    let ring_start = |r: u32| 1 + (r - 1) * segments;
    let mut faces = Vec::with_capacity((2 * segments * (rings - 1)) as usize);

    for s in 0..segments {
        let next = (s + 1) % segments;
        faces.push([0, ring_start(1) + s, ring_start(1) + next]);
    }
    for r in 1..rings - 1 {
        let (upper, lower) = (ring_start(r), ring_start(r + 1));
        for s in 0..segments {
            let next = (s + 1) % segments;
            faces.push([upper + s, lower + s, lower + next]);
            faces.push([upper + s, lower + next, upper + next]);
        }
    }
    let last = ring_start(rings - 1);
    for s in 0..segments {
        let next = (s + 1) % segments;
        faces.push([south, last + next, last + s]);
    }

    TriMesh::new(vertices, faces)
}

use std::f32::consts::PI;

use crate::renderer::vertex::Vertex;

/// UV sphere centred on the origin.
pub fn uv_sphere(radius: f32, width_segments: u32, height_segments: u32) -> (Vec<Vertex>, Vec<u32>) {
    let width_segments = width_segments.max(3);
    let height_segments = height_segments.max(2);
    let mut vertices = Vec::with_capacity(((width_segments + 1) * (height_segments + 1)) as usize);
    let mut indices = Vec::new();

    for y in 0..=height_segments {
        let v = y as f32 / height_segments as f32;
        let theta = v * PI;
        for x in 0..=width_segments {
            let u = x as f32 / width_segments as f32;
            let phi = u * 2.0 * PI;
            let normal = [-phi.cos() * theta.sin(), theta.cos(), phi.sin() * theta.sin()];
            vertices.push(Vertex {
                position: [normal[0] * radius, normal[1] * radius, normal[2] * radius],
                normal,
                uv: [u, 1.0 - v],
            });
        }
    }

    let row = width_segments + 1;
    for y in 0..height_segments {
        for x in 0..width_segments {
            let a = y * row + x + 1;
            let b = y * row + x;
            let c = (y + 1) * row + x;
            let d = (y + 1) * row + x + 1;
            if y != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if y != height_segments - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    (vertices, indices)
}

/// Square in the XZ plane facing +Y; UVs span [0, 1].
pub fn floor_plane(size: f32) -> (Vec<Vertex>, Vec<u32>) {
    let h = size / 2.0;
    let corner = |x: f32, z: f32, u: f32, v: f32| Vertex {
        position: [x, 0.0, z],
        normal: [0.0, 1.0, 0.0],
        uv: [u, v],
    };
    let vertices = vec![
        corner(-h, h, 0.0, 0.0),
        corner(h, h, 1.0, 0.0),
        corner(h, -h, 1.0, 1.0),
        corner(-h, -h, 0.0, 1.0),
    ];
    (vertices, vec![0, 1, 2, 0, 2, 3])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_vertices_lie_on_radius() {
        let (vertices, indices) = uv_sphere(0.1, 32, 16);
        assert_eq!(vertices.len(), 33 * 17);
        assert_eq!(indices.len() % 3, 0);
        // Pole rows contribute one triangle per segment, the others two.
        assert_eq!(indices.len() / 3, 32 * (2 * 16 - 2));
        for v in &vertices {
            let r = (v.position[0].powi(2) + v.position[1].powi(2) + v.position[2].powi(2)).sqrt();
            assert!((r - 0.1).abs() < 1e-5);
        }
        assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
    }

    #[test]
    fn plane_faces_up() {
        let (vertices, indices) = floor_plane(100.0);
        assert_eq!(indices, vec![0, 1, 2, 0, 2, 3]);
        assert!(vertices.iter().all(|v| v.normal == [0.0, 1.0, 0.0] && v.position[1] == 0.0));
        assert_eq!(vertices[1].position, [50.0, 0.0, 50.0]);
    }
}

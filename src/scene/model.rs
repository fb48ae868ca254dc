use std::path::Path;

use log::{debug, warn};
use nalgebra_glm as glm;

use crate::error::SceneError;
use crate::renderer::vertex::Vertex;

/// 8-bit RGBA pixels, row-major, no padding.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PbrMaterial {
    pub base_color: [f32; 4],
    pub metallic: f32,
    pub roughness: f32,
    pub base_color_texture: Option<TextureImage>,
}

impl Default for PbrMaterial {
    fn default() -> Self {
        Self {
            base_color: [1.0, 1.0, 1.0, 1.0],
            metallic: 0.0,
            roughness: 1.0,
            base_color_texture: None,
        }
    }
}

/// One drawable piece of a model. Vertices are in mesh space; `transform`
/// places them in model space.
#[derive(Debug, Clone)]
pub struct MeshPrimitive {
    pub node_name: Option<String>,
    pub mesh_name: Option<String>,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub material: PbrMaterial,
    pub transform: glm::Mat4,
}

#[derive(Debug, Clone, Default)]
pub struct ModelAsset {
    pub primitives: Vec<MeshPrimitive>,
}

impl ModelAsset {
    /// Geometry of the node or mesh called `name`, with its node transform
    /// dropped so the caller's placement is the only one applied.
    pub fn geometry_of(&self, name: &str) -> Option<ModelAsset> {
        let primitives: Vec<MeshPrimitive> = self
            .primitives
            .iter()
            .filter(|p| p.node_name.as_deref() == Some(name) || p.mesh_name.as_deref() == Some(name))
            .map(|p| MeshPrimitive {
                transform: glm::Mat4::identity(),
                ..p.clone()
            })
            .collect();
        if primitives.is_empty() {
            None
        } else {
            Some(ModelAsset { primitives })
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.primitives.iter().map(|p| p.vertices.len()).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.primitives.iter().map(|p| p.indices.len() / 3).sum()
    }
}

/// Import every triangle primitive reachable from the default scene.
pub fn load_gltf(path: &Path) -> Result<ModelAsset, SceneError> {
    let (document, buffers, images) = gltf::import(path).map_err(|e| {
        SceneError::new("gltf-import")
            .with_arg("path", path.display())
            .push_std(e)
    })?;

    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or_else(|| SceneError::new("gltf-no-scene").with_arg("path", path.display()))?;

    let mut primitives = Vec::new();
    for node in scene.nodes() {
        visit_node(&node, &glm::Mat4::identity(), &buffers, &images, &mut primitives);
    }

    debug!(
        "Imported {} primitives from {}",
        primitives.len(),
        path.display()
    );
    Ok(ModelAsset { primitives })
}

fn visit_node(
    node: &gltf::Node,
    parent: &glm::Mat4,
    buffers: &[gltf::buffer::Data],
    images: &[gltf::image::Data],
    out: &mut Vec<MeshPrimitive>,
) {
    let local = glm::make_mat4(node.transform().matrix().as_flattened());
    let world = parent * local;

    if let Some(mesh) = node.mesh() {
        for primitive in mesh.primitives() {
            match read_primitive(&primitive, buffers, images) {
                Some((vertices, indices, material)) => out.push(MeshPrimitive {
                    node_name: node.name().map(str::to_string),
                    mesh_name: mesh.name().map(str::to_string),
                    vertices,
                    indices,
                    material,
                    transform: world,
                }),
                None => warn!(
                    "Skipping primitive {} of mesh {:?}",
                    primitive.index(),
                    mesh.name()
                ),
            }
        }
    }

    for child in node.children() {
        visit_node(&child, &world, buffers, images, out);
    }
}

fn read_primitive(
    primitive: &gltf::Primitive,
    buffers: &[gltf::buffer::Data],
    images: &[gltf::image::Data],
) -> Option<(Vec<Vertex>, Vec<u32>, PbrMaterial)> {
    if primitive.mode() != gltf::mesh::Mode::Triangles {
        return None;
    }

    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()));
    let positions: Vec<[f32; 3]> = reader.read_positions()?.collect();
    let normals: Vec<[f32; 3]> = reader
        .read_normals()
        .map(|normals| normals.collect())
        .unwrap_or_default();
    let uvs: Vec<[f32; 2]> = reader
        .read_tex_coords(0)
        .map(|uvs| uvs.into_f32().collect())
        .unwrap_or_default();
    let indices: Vec<u32> = reader
        .read_indices()
        .map(|indices| indices.into_u32().collect())
        .unwrap_or_else(|| (0..positions.len() as u32).collect());

    let mut vertices: Vec<Vertex> = positions
        .iter()
        .enumerate()
        .map(|(i, position)| Vertex {
            position: *position,
            normal: normals.get(i).copied().unwrap_or([0.0, 0.0, 0.0]),
            uv: uvs.get(i).copied().unwrap_or([0.0, 0.0]),
        })
        .collect();
    if normals.len() != positions.len() {
        compute_normals(&mut vertices, &indices);
    }

    let pbr = primitive.material().pbr_metallic_roughness();
    let base_color_texture = pbr
        .base_color_texture()
        .and_then(|info| images.get(info.texture().source().index()))
        .and_then(to_rgba8);
    let material = PbrMaterial {
        base_color: pbr.base_color_factor(),
        metallic: pbr.metallic_factor(),
        roughness: pbr.roughness_factor(),
        base_color_texture,
    };

    Some((vertices, indices, material))
}

/// Area-weighted smooth normals for meshes exported without them.
pub fn compute_normals(vertices: &mut [Vertex], indices: &[u32]) {
    let mut accumulated = vec![glm::Vec3::zeros(); vertices.len()];
    for triangle in indices.chunks_exact(3) {
        let [a, b, c] = [triangle[0] as usize, triangle[1] as usize, triangle[2] as usize];
        if a >= vertices.len() || b >= vertices.len() || c >= vertices.len() {
            continue;
        }
        let pa = glm::make_vec3(&vertices[a].position);
        let pb = glm::make_vec3(&vertices[b].position);
        let pc = glm::make_vec3(&vertices[c].position);
        let face = glm::cross(&(pb - pa), &(pc - pa));
        accumulated[a] += face;
        accumulated[b] += face;
        accumulated[c] += face;
    }
    for (vertex, normal) in vertices.iter_mut().zip(accumulated) {
        let n = if glm::length(&normal) > f32::EPSILON {
            glm::normalize(&normal)
        } else {
            glm::vec3(0.0, 1.0, 0.0)
        };
        vertex.normal = [n.x, n.y, n.z];
    }
}

fn to_rgba8(image: &gltf::image::Data) -> Option<TextureImage> {
    use gltf::image::Format;

    let pixels = match image.format {
        Format::R8G8B8A8 => image.pixels.clone(),
        Format::R8G8B8 => image
            .pixels
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        Format::R8G8 => image
            .pixels
            .chunks_exact(2)
            .flat_map(|p| [p[0], p[0], p[0], p[1]])
            .collect(),
        Format::R8 => image.pixels.iter().flat_map(|&v| [v, v, v, 255]).collect(),
        other => {
            warn!("Unsupported glTF image format {:?}, using white", other);
            return None;
        }
    };

    Some(TextureImage {
        width: image.width,
        height: image.height,
        pixels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle(node: &str) -> MeshPrimitive {
        MeshPrimitive {
            node_name: Some(node.to_string()),
            mesh_name: None,
            vertices: vec![
                Vertex {
                    position: [0.0, 0.0, 0.0],
                    normal: [0.0; 3],
                    uv: [0.0; 2],
                };
                3
            ],
            indices: vec![0, 1, 2],
            material: PbrMaterial::default(),
            transform: glm::translation(&glm::vec3(1.0, 2.0, 3.0)),
        }
    }

    #[test]
    fn geometry_of_drops_node_transform() {
        let model = ModelAsset {
            primitives: vec![triangle("saucer"), triangle("cup")],
        };
        let cup = model.geometry_of("cup").unwrap();
        assert_eq!(cup.primitives.len(), 1);
        assert_eq!(cup.primitives[0].transform, glm::Mat4::identity());
        assert!(model.geometry_of("spoon").is_none());
        assert_eq!(model.triangle_count(), 2);
        assert_eq!(model.vertex_count(), 6);
    }

    #[test]
    fn computed_normals_face_out_of_ccw_triangle() {
        let mut vertices = vec![
            Vertex {
                position: [0.0, 0.0, 0.0],
                normal: [0.0; 3],
                uv: [0.0; 2],
            },
            Vertex {
                position: [1.0, 0.0, 0.0],
                normal: [0.0; 3],
                uv: [0.0; 2],
            },
            Vertex {
                position: [0.0, 1.0, 0.0],
                normal: [0.0; 3],
                uv: [0.0; 2],
            },
        ];
        compute_normals(&mut vertices, &[0, 1, 2]);
        for v in &vertices {
            assert_eq!(v.normal, [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_gltf(Path::new("/nonexistent/coffemachine.gltf")).unwrap_err();
        assert_eq!(err.key, "gltf-import");
        assert!(err.to_string().contains("coffemachine.gltf"));
    }
}

use nalgebra::Vector3;
use crate::error::{GameError, Result};

/// Floats per vertex: position then color.
pub const VERTEX_STRIDE: usize = 6;

pub struct Mesh {
    pub vertices: Vec<f32>,
    pub indices: Vec<u16>,
}

impl Mesh {
    /// Unit box centred on the origin. Faces are pre-shaded so flat-colored
    /// boxes still read as solid.
    pub fn unit_box() -> Self {
        let s = 0.5;
        let mut vertices = Vec::with_capacity(24 * VERTEX_STRIDE);
        let mut indices = Vec::with_capacity(36);

        let mut add_face = |corners: [[f32; 3]; 4], shade: f32| {
            let base = (vertices.len() / VERTEX_STRIDE) as u16;
            for corner in &corners {
                vertices.extend_from_slice(&[corner[0], corner[1], corner[2], shade, shade, shade]);
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        };

        add_face([[-s, -s, s], [s, -s, s], [s, s, s], [-s, s, s]], 0.9);
        add_face([[s, -s, -s], [-s, -s, -s], [-s, s, -s], [s, s, -s]], 0.7);
        add_face([[-s, s, s], [s, s, s], [s, s, -s], [-s, s, -s]], 1.0);
        add_face([[-s, -s, -s], [s, -s, -s], [s, -s, s], [-s, -s, s]], 0.4);
        add_face([[s, -s, s], [s, -s, -s], [s, s, -s], [s, s, s]], 0.8);
        add_face([[-s, -s, -s], [-s, -s, s], [-s, s, s], [-s, s, -s]], 0.6);

        Mesh { vertices, indices }
    }

    /// Flattens every primitive of a binary glTF into one indexed mesh.
    pub fn from_gltf(bytes: &[u8]) -> Result<Self> {
        let (document, buffers, _) = gltf::import_slice(bytes)?;

        let mut vertices = Vec::new();
        let mut indices = Vec::new();

        for mesh in document.meshes() {
            for primitive in mesh.primitives() {
                let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| &data[..]));

                let positions: Vec<[f32; 3]> = reader
                    .read_positions()
                    .ok_or(GameError::EmptyModel("primitive without positions"))?
                    .collect();
                let colors: Vec<[f32; 3]> = match reader.read_colors(0) {
                    Some(iter) => iter.into_rgb_f32().collect(),
                    None => vec![[1.0, 1.0, 1.0]; positions.len()],
                };

                let base = vertices.len() / VERTEX_STRIDE;
                if base + positions.len() > u16::MAX as usize {
                    return Err(GameError::ModelTooLarge(base + positions.len()));
                }

                for (pos, color) in positions.iter().zip(colors.iter()) {
                    vertices.extend_from_slice(&[pos[0], pos[1], pos[2], color[0], color[1], color[2]]);
                }

                match reader.read_indices() {
                    Some(iter) => indices.extend(iter.into_u32().map(|i| (base + i as usize) as u16)),
                    None => indices.extend((0..positions.len()).map(|i| (base + i) as u16)),
                }
            }
        }

        if indices.is_empty() {
            return Err(GameError::EmptyModel("no triangles"));
        }
        Ok(Mesh { vertices, indices })
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / VERTEX_STRIDE
    }

    /// Size of the axis-aligned box around every vertex.
    pub fn extent(&self) -> Vector3<f32> {
        let mut min = Vector3::repeat(f32::MAX);
        let mut max = Vector3::repeat(f32::MIN);
        for vertex in self.vertices.chunks_exact(VERTEX_STRIDE) {
            let p = Vector3::new(vertex[0], vertex[1], vertex[2]);
            min = min.inf(&p);
            max = max.sup(&p);
        }
        if self.vertices.is_empty() {
            return Vector3::zeros();
        }
        max - min
    }
}

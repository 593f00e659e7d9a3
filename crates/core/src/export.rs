use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::attributes::AttributeDomain;
use crate::geometry::{builtin, GeometryData};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Radians. Corner normals closer than this share an exported vertex.
    pub normal_angle_threshold: f32,
    pub uv_epsilon: f32,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            normal_angle_threshold: 0.05,
            uv_epsilon: 1.0e-5,
        }
    }
}

/// Flat render buffers: one index list per submesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffer {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub submeshes: Vec<Vec<u32>>,
}

impl MeshBuffer {
    pub fn clear(&mut self) {
        self.positions.clear();
        self.normals.clear();
        self.uvs.clear();
        self.submeshes.clear();
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.submeshes.iter().map(|s| s.len() / 3).sum()
    }
}

/// Writes `geometry` into `target` as render buffers.
pub fn export(geometry: Option<&GeometryData>, target: &mut MeshBuffer, settings: &ExportSettings) {
    target.clear();
    let Some(geometry) = geometry else {
        debug!("export: no geometry");
        return;
    };
    let Some(positions) = geometry.attribute_values::<Vec3>(builtin::POSITION, AttributeDomain::Vertex)
    else {
        warn!("export: geometry has no position attribute");
        return;
    };
    if geometry.faces.is_empty() {
        return;
    }

    let face_count = geometry.faces.len();
    let normals: Vec<Vec3> = geometry
        .attribute_values(builtin::NORMAL, AttributeDomain::Face)
        .unwrap_or_else(|| vec![Vec3::ZERO; face_count]);
    let smooth: Vec<bool> = geometry
        .attribute_values(builtin::SHADE_SMOOTH, AttributeDomain::Face)
        .unwrap_or_else(|| vec![false; face_count]);
    let materials: Vec<i32> = geometry
        .attribute_values(builtin::MATERIAL_INDEX, AttributeDomain::Face)
        .unwrap_or_else(|| vec![0; face_count]);
    let uvs: Vec<Vec2> = geometry
        .attribute_values(builtin::UV, AttributeDomain::FaceCorner)
        .unwrap_or_else(|| vec![Vec2::ZERO; geometry.face_corners.len()]);

    let submesh_count = geometry.submesh_count.max(1);
    target.submeshes = vec![Vec::new(); submesh_count];

    let vertex_normal = |vertex: usize| -> Vec3 {
        geometry.vertices[vertex]
            .faces
            .iter()
            .filter(|face| smooth[**face])
            .map(|face| normals[*face])
            .sum::<Vec3>()
            .normalize_or_zero()
    };

    // Exported indices created so far for each source vertex.
    let mut emitted: Vec<Vec<u32>> = vec![Vec::new(); positions.len()];
    let cos_threshold = settings.normal_angle_threshold.cos();

    for (face_index, face) in geometry.faces.iter().enumerate() {
        let face_normal = normals[face_index];
        let mut indices = [0u32; 3];
        for k in 0..3 {
            let vertex = face.verts[k];
            let normal = if smooth[face_index] {
                vertex_normal(vertex)
            } else {
                face_normal
            };
            let uv = uvs[face.face_corners[k]];

            let shared = emitted[vertex].iter().copied().find(|index| {
                let i = *index as usize;
                target.normals[i].dot(normal) >= cos_threshold
                    && target.uvs[i].distance(uv) <= settings.uv_epsilon
            });
            indices[k] = match shared {
                Some(index) => index,
                None => {
                    let index = target.positions.len() as u32;
                    target.positions.push(positions[vertex]);
                    target.normals.push(normal);
                    target.uvs.push(uv);
                    emitted[vertex].push(index);
                    index
                }
            };
        }

        let [a, b, c] = face.verts;
        let geometric = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        if geometric.dot(face_normal) < 0.0 {
            indices.swap(0, 1);
        }

        let submesh = materials[face_index].clamp(0, submesh_count as i32 - 1) as usize;
        target.submeshes[submesh].extend(indices);
    }

    debug!(
        "export: {} vertices, {} triangles in {} submeshes",
        target.vertex_count(),
        target.triangle_count(),
        submesh_count
    );
}

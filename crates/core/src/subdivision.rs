use glam::Vec3;
use tracing::{debug, warn};

use crate::attribute_convert::gather_average;
use crate::attributes::AttributeDomain;
use crate::geometry::{builtin, GeometryData};

pub const MAX_SUBDIVISION_LEVELS: i32 = 6;

/// Splits every triangle into four, `levels` times.
///
/// Existing attributes are carried over onto the new elements: vertex values
/// are averaged at edge midpoints, corner values are averaged along the split
/// edges, face values are copied to the four children, and edge values pass
/// to both halves of a split edge. Edges created inside a face take the kind
/// default.
pub fn subdivide(source: &GeometryData, levels: i32) -> GeometryData {
    let clamped = levels.clamp(0, MAX_SUBDIVISION_LEVELS);
    if clamped != levels {
        debug!("subdivide: clamped levels {} to {}", levels, clamped);
    }

    let mut current = source.clone();
    for _ in 0..clamped {
        current = subdivide_once(&current);
    }
    current
}

fn subdivide_once(source: &GeometryData) -> GeometryData {
    let vertex_count = source.vertices.len();
    let positions = source.positions();

    let mut new_positions = positions.clone();
    new_positions.extend(
        source
            .edges
            .iter()
            .map(|edge| (positions[edge.vert_a] + positions[edge.vert_b]) * 0.5),
    );

    let mut triangles = Vec::with_capacity(source.faces.len() * 4);
    let mut corner_groups: Vec<Vec<usize>> = Vec::with_capacity(source.faces.len() * 12);
    let mut face_groups: Vec<Vec<usize>> = Vec::with_capacity(source.faces.len() * 4);

    for (face_index, face) in source.faces.iter().enumerate() {
        let [a, b, c] = face.verts;
        let [ca, cb, cc] = face.face_corners;
        let mab = vertex_count + face.edges[0];
        let mbc = vertex_count + face.edges[1];
        let mca = vertex_count + face.edges[2];

        let children = [
            ([a, mab, mca], [vec![ca], vec![ca, cb], vec![cc, ca]]),
            ([mab, b, mbc], [vec![ca, cb], vec![cb], vec![cb, cc]]),
            ([mca, mbc, c], [vec![cc, ca], vec![cb, cc], vec![cc]]),
            ([mab, mbc, mca], [vec![ca, cb], vec![cb, cc], vec![cc, ca]]),
        ];
        for (tri, corners) in children {
            triangles.push(tri);
            corner_groups.extend(corners);
            face_groups.push(vec![face_index]);
        }
    }

    let mut result = GeometryData::from_triangles(new_positions, &triangles, Vec::new());
    result.submesh_count = source.submesh_count;

    let vertex_groups: Vec<Vec<usize>> = (0..vertex_count)
        .map(|vertex| vec![vertex])
        .chain(
            source
                .edges
                .iter()
                .map(|edge| vec![edge.vert_a, edge.vert_b]),
        )
        .collect();

    // Edges keep their vertices sorted, so a split half always has the
    // midpoint as `vert_b`.
    let edge_groups: Vec<Vec<usize>> = result
        .edges
        .iter()
        .map(|edge| {
            if edge.vert_a < vertex_count && edge.vert_b >= vertex_count {
                vec![edge.vert_b - vertex_count]
            } else {
                Vec::new()
            }
        })
        .collect();

    for attribute in source.attributes().iter() {
        if attribute.name() == builtin::NORMAL && attribute.domain() == AttributeDomain::Face {
            continue;
        }
        let groups = match attribute.domain() {
            AttributeDomain::Vertex => &vertex_groups,
            AttributeDomain::Edge => &edge_groups,
            AttributeDomain::Face => &face_groups,
            AttributeDomain::FaceCorner => &corner_groups,
        };
        let carried = gather_average(attribute, attribute.domain(), groups);
        if let Err(err) = result.store_attribute(carried) {
            warn!("subdivide: dropped attribute '{}': {}", attribute.name(), err);
        }
    }

    result.recompute_face_normals();
    result
}

/// Pushes every vertex onto the sphere of `radius` around the origin.
pub(crate) fn project_to_sphere(geometry: &mut GeometryData, radius: f32) {
    let projected: Vec<Vec3> = geometry
        .positions()
        .into_iter()
        .map(|p| p.normalize_or_zero() * radius)
        .collect();
    let attribute = crate::attributes::Attribute::from_values(
        builtin::POSITION,
        AttributeDomain::Vertex,
        projected,
    );
    if let Err(err) = geometry.store_attribute(attribute) {
        warn!("project_to_sphere: {}", err);
    }
    geometry.recompute_face_normals();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{Attribute, AttributeType};
    use crate::primitives;
    use glam::Vec2;

    #[test]
    fn zero_levels_returns_clone() {
        let plane = primitives::plane(1.0, 1.0, 0);
        assert_eq!(subdivide(&plane, 0), plane);
        assert_eq!(subdivide(&plane, -3), plane);
    }

    #[test]
    fn one_level_quadruples_faces() {
        let plane = primitives::plane(1.0, 1.0, 0);
        let result = subdivide(&plane, 1);
        assert_eq!(result.faces.len(), plane.faces.len() * 4);
        assert_eq!(
            result.vertices.len(),
            plane.vertices.len() + plane.edges.len()
        );
        // 2 triangles, 5 edges: each edge splits in two, 3 new edges per face.
        assert_eq!(result.edges.len(), 2 * 5 + 3 * 2);
    }

    #[test]
    fn adjacency_stays_consistent() {
        let sphere = primitives::icosphere(1.0, 0);
        let result = subdivide(&sphere, 2);
        for (index, edge) in result.edges.iter().enumerate() {
            assert!(edge.face_b.is_some(), "closed mesh edge {index} is on a boundary");
            for face in edge.faces() {
                assert!(result.faces[face].edges.contains(&index));
            }
        }
        for (index, corner) in result.face_corners.iter().enumerate() {
            assert!(result.vertices[corner.vert].face_corners.contains(&index));
        }
    }

    #[test]
    fn vertex_attributes_average_at_midpoints() {
        let mut plane = primitives::plane(1.0, 1.0, 0);
        let heat: Vec<f32> = (0..plane.vertices.len()).map(|i| i as f32).collect();
        plane
            .store_attribute(Attribute::from_values("heat", AttributeDomain::Vertex, heat.clone()))
            .unwrap();
        let result = subdivide(&plane, 1);
        let values: Vec<f32> = result.attribute_values("heat", AttributeDomain::Vertex).unwrap();
        for (index, edge) in plane.edges.iter().enumerate() {
            let expected = (heat[edge.vert_a] + heat[edge.vert_b]) * 0.5;
            assert!((values[plane.vertices.len() + index] - expected).abs() < 1.0e-6);
        }
    }

    #[test]
    fn uvs_interpolate_and_faces_copy() {
        let mut plane = primitives::plane(1.0, 1.0, 0);
        plane
            .store_attribute(Attribute::from_values(
                builtin::MATERIAL_INDEX,
                AttributeDomain::Face,
                [3i32, 5],
            ))
            .unwrap();
        let result = subdivide(&plane, 1);
        let materials: Vec<i32> = result
            .attribute_values(builtin::MATERIAL_INDEX, AttributeDomain::Face)
            .unwrap();
        assert_eq!(materials, vec![3, 3, 3, 3, 5, 5, 5, 5]);

        let uvs: Vec<Vec2> = result
            .attribute_values(builtin::UV, AttributeDomain::FaceCorner)
            .unwrap();
        for uv in uvs {
            assert!((0.0..=1.0).contains(&uv.x) && (0.0..=1.0).contains(&uv.y));
        }
    }

    #[test]
    fn boolean_flags_survive_levels() {
        let mut plane = primitives::plane(1.0, 1.0, 0);
        plane
            .store_attribute(Attribute::from_values(
                builtin::SHADE_SMOOTH,
                AttributeDomain::Face,
                [true, false],
            ))
            .unwrap();
        plane
            .store_attribute(Attribute::from_values(
                "pinned",
                AttributeDomain::Vertex,
                vec![true; 4],
            ))
            .unwrap();
        let result = subdivide(&plane, 2);
        let smooth: Vec<bool> = result
            .attribute_values(builtin::SHADE_SMOOTH, AttributeDomain::Face)
            .unwrap();
        assert_eq!(smooth.len(), 32);
        assert!(smooth[..16].iter().all(|flag| *flag));
        assert!(smooth[16..].iter().all(|flag| !*flag));

        let pinned: Vec<bool> = result
            .attribute_values("pinned", AttributeDomain::Vertex)
            .unwrap();
        assert!(pinned[..4].iter().all(|flag| *flag));
    }

    #[test]
    fn crease_passes_to_halves_and_interior_is_zero() {
        let mut plane = primitives::plane(1.0, 1.0, 0);
        let crease = vec![1.0f32; plane.edges.len()];
        let mut attribute = Attribute::new(builtin::CREASE, AttributeType::ClampedFloat, AttributeDomain::Edge);
        attribute.fill(crease);
        plane.store_attribute(attribute).unwrap();

        let result = subdivide(&plane, 1);
        let values: Vec<f32> = result
            .attribute_values(builtin::CREASE, AttributeDomain::Edge)
            .unwrap();
        let split = values.iter().filter(|v| **v == 1.0).count();
        let interior = values.iter().filter(|v| **v == 0.0).count();
        assert_eq!(split, 10);
        assert_eq!(interior, 6);
    }

    #[test]
    fn levels_are_clamped() {
        let tri = GeometryData::from_triangles(
            vec![Vec3::ZERO, Vec3::X, Vec3::Z],
            &[[0, 2, 1]],
            Vec::new(),
        );
        let result = subdivide(&tri, 99);
        assert_eq!(result.faces.len(), 4usize.pow(MAX_SUBDIVISION_LEVELS as u32));
    }
}

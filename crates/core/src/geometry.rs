use std::collections::HashMap;

use glam::{Mat3, Mat4, Vec2, Vec3};

use crate::attribute_convert::{convert_type, remap_domain};
use crate::attributes::{
    Attribute, AttributeDomain, AttributeElement, AttributeError, AttributeType, GeometryAttributes,
};
use crate::parallel::update_each;

/// Names of the well-known attributes every generated geometry carries.
pub mod builtin {
    use crate::attributes::{AttributeDomain, AttributeType};

    pub const POSITION: &str = "position";
    pub const NORMAL: &str = "normal";
    pub const MATERIAL_INDEX: &str = "material_index";
    pub const SHADE_SMOOTH: &str = "shade_smooth";
    pub const CREASE: &str = "crease";
    pub const UV: &str = "uv";

    pub const ALL: [(&str, AttributeDomain, AttributeType); 6] = [
        (POSITION, AttributeDomain::Vertex, AttributeType::Vector3),
        (NORMAL, AttributeDomain::Face, AttributeType::Vector3),
        (MATERIAL_INDEX, AttributeDomain::Face, AttributeType::Integer),
        (SHADE_SMOOTH, AttributeDomain::Face, AttributeType::Boolean),
        (CREASE, AttributeDomain::Edge, AttributeType::ClampedFloat),
        (UV, AttributeDomain::FaceCorner, AttributeType::Vector2),
    ];

    pub fn is_builtin(name: &str) -> bool {
        ALL.iter().any(|(builtin, _, _)| *builtin == name)
    }

    /// The fixed kind of `name` when it is a builtin living in `domain`.
    pub fn kind_in(name: &str, domain: AttributeDomain) -> Option<AttributeType> {
        ALL.iter()
            .find(|(builtin, home, _)| *builtin == name && *home == domain)
            .map(|(_, _, kind)| *kind)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vertex {
    pub edges: Vec<usize>,
    pub faces: Vec<usize>,
    pub face_corners: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub vert_a: usize,
    pub vert_b: usize,
    pub face_a: usize,
    /// `None` for boundary edges.
    pub face_b: Option<usize>,
}

impl Edge {
    pub fn faces(&self) -> impl Iterator<Item = usize> {
        std::iter::once(self.face_a).chain(self.face_b)
    }

    pub fn other_face(&self, face: usize) -> Option<usize> {
        if self.face_a == face {
            self.face_b
        } else if self.face_b == Some(face) {
            Some(self.face_a)
        } else {
            None
        }
    }

    pub fn is_boundary(&self) -> bool {
        self.face_b.is_none()
    }
}

/// A triangle. `edges[k]` joins `verts[k]` and `verts[(k + 1) % 3]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub verts: [usize; 3],
    pub edges: [usize; 3],
    pub face_corners: [usize; 3],
    pub adjacent_faces: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceCorner {
    pub vert: usize,
    pub face: usize,
}

/// Triangle mesh topology plus its per-element attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryData {
    pub vertices: Vec<Vertex>,
    pub edges: Vec<Edge>,
    pub faces: Vec<Face>,
    pub face_corners: Vec<FaceCorner>,
    pub submesh_count: usize,
    attributes: GeometryAttributes,
}

impl GeometryData {
    /// No elements; the builtin attributes are registered at zero length.
    pub fn empty() -> Self {
        let mut geometry = Self::default();
        geometry.register_builtins();
        geometry
    }

    /// Builds full topology from indexed triangles.
    ///
    /// Edges are shared between the faces that reference the same unordered
    /// vertex pair. `corner_uvs` holds three entries per triangle; when its
    /// length does not match, uvs are zeroed.
    pub fn from_triangles(
        positions: Vec<Vec3>,
        triangles: &[[usize; 3]],
        corner_uvs: Vec<Vec2>,
    ) -> Self {
        let mut vertices = vec![Vertex::default(); positions.len()];
        let mut edges: Vec<Edge> = Vec::with_capacity(triangles.len() * 3 / 2 + 1);
        let mut faces = Vec::with_capacity(triangles.len());
        let mut face_corners = Vec::with_capacity(triangles.len() * 3);
        let mut edge_lookup: HashMap<(usize, usize), usize> = HashMap::new();

        for (face_index, tri) in triangles.iter().enumerate() {
            let mut face_edges = [0usize; 3];
            let mut corners = [0usize; 3];
            for k in 0..3 {
                let a = tri[k];
                let b = tri[(k + 1) % 3];
                let key = (a.min(b), a.max(b));
                let edge_index = match edge_lookup.get(&key) {
                    Some(&existing) => {
                        let edge = &mut edges[existing];
                        if edge.face_b.is_none() && edge.face_a != face_index {
                            edge.face_b = Some(face_index);
                        }
                        existing
                    }
                    None => {
                        let index = edges.len();
                        edges.push(Edge {
                            vert_a: key.0,
                            vert_b: key.1,
                            face_a: face_index,
                            face_b: None,
                        });
                        edge_lookup.insert(key, index);
                        push_unique(&mut vertices[key.0].edges, index);
                        push_unique(&mut vertices[key.1].edges, index);
                        index
                    }
                };
                face_edges[k] = edge_index;

                let corner_index = face_corners.len();
                face_corners.push(FaceCorner {
                    vert: a,
                    face: face_index,
                });
                corners[k] = corner_index;
                vertices[a].face_corners.push(corner_index);
                push_unique(&mut vertices[a].faces, face_index);
            }
            faces.push(Face {
                verts: *tri,
                edges: face_edges,
                face_corners: corners,
                adjacent_faces: Vec::new(),
            });
        }

        for face_index in 0..faces.len() {
            let mut adjacent = Vec::new();
            for edge_index in faces[face_index].edges {
                if let Some(other) = edges[edge_index].other_face(face_index) {
                    push_unique(&mut adjacent, other);
                }
            }
            faces[face_index].adjacent_faces = adjacent;
        }

        let mut geometry = Self {
            vertices,
            edges,
            faces,
            face_corners,
            submesh_count: if triangles.is_empty() { 0 } else { 1 },
            attributes: GeometryAttributes::default(),
        };
        geometry.register_builtins();

        let uvs = if corner_uvs.len() == geometry.face_corners.len() {
            corner_uvs
        } else {
            vec![Vec2::ZERO; geometry.face_corners.len()]
        };
        geometry.attributes.insert(Attribute::from_values(
            builtin::UV,
            AttributeDomain::FaceCorner,
            uvs,
        ));
        geometry.attributes.insert(Attribute::from_values(
            builtin::POSITION,
            AttributeDomain::Vertex,
            positions,
        ));
        geometry.recompute_face_normals();
        geometry
    }

    fn register_builtins(&mut self) {
        for (name, domain, kind) in builtin::ALL {
            if self.attributes.get(domain, name).is_none() {
                let len = self.domain_len(domain);
                self.attributes
                    .insert(Attribute::with_len(name, kind, domain, len));
            }
        }
    }

    pub fn domain_len(&self, domain: AttributeDomain) -> usize {
        match domain {
            AttributeDomain::Vertex => self.vertices.len(),
            AttributeDomain::Edge => self.edges.len(),
            AttributeDomain::Face => self.faces.len(),
            AttributeDomain::FaceCorner => self.face_corners.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn attributes(&self) -> &GeometryAttributes {
        &self.attributes
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.find(name).is_some()
    }

    /// Looks `name` up in `domain` first, then in the other domains. The result
    /// is a copy converted to the requested kind and domain; the stored
    /// attribute is never touched.
    pub fn get_attribute(
        &self,
        name: &str,
        kind: AttributeType,
        domain: AttributeDomain,
    ) -> Option<Attribute> {
        if let Some(found) = self.attributes.get(domain, name) {
            return Some(convert_type(found, kind));
        }
        let found = self.attributes.find(name)?;
        let remapped = remap_domain(self, found, domain).ok()?;
        Some(convert_type(&remapped, kind))
    }

    /// The stored attribute in whatever domain it lives, without conversion.
    pub fn get_attribute_any(&self, name: &str) -> Option<&Attribute> {
        self.attributes.find(name)
    }

    pub fn get_attribute_or_default(
        &self,
        name: &str,
        kind: AttributeType,
        domain: AttributeDomain,
    ) -> Attribute {
        self.get_attribute(name, kind, domain)
            .unwrap_or_else(|| Attribute::with_len(name, kind, domain, self.domain_len(domain)))
    }

    pub fn attribute_values<T: AttributeElement>(
        &self,
        name: &str,
        domain: AttributeDomain,
    ) -> Option<Vec<T>> {
        self.get_attribute(name, T::KIND, domain)
            .map(|attribute| attribute.values().collect())
    }

    pub fn positions(&self) -> Vec<Vec3> {
        self.attribute_values(builtin::POSITION, AttributeDomain::Vertex)
            .unwrap_or_else(|| vec![Vec3::ZERO; self.vertices.len()])
    }

    /// Stores by name in the attribute's own domain. Returns whether an
    /// existing attribute was replaced.
    ///
    /// A builtin stored in its home domain must keep its fixed kind.
    pub fn store_attribute(&mut self, attribute: Attribute) -> Result<bool, AttributeError> {
        let expected = self.domain_len(attribute.domain());
        if attribute.len() != expected {
            return Err(AttributeError::InvalidLength {
                expected,
                actual: attribute.len(),
            });
        }
        if let Some(kind) = builtin::kind_in(attribute.name(), attribute.domain()) {
            if kind != attribute.kind() {
                return Err(AttributeError::InvalidType {
                    expected: kind,
                    actual: attribute.kind(),
                });
            }
        }
        Ok(self.attributes.insert(attribute))
    }

    /// Converts `attribute` onto `domain` before storing it there.
    pub fn store_attribute_in(
        &mut self,
        attribute: Attribute,
        domain: AttributeDomain,
    ) -> Result<bool, AttributeError> {
        if attribute.domain() == domain {
            return self.store_attribute(attribute);
        }
        let mut converted = remap_domain(self, &attribute, domain)?;
        converted.set_domain(domain);
        self.store_attribute(converted)
    }

    /// Removes the first attribute called `name`, searching domains in order.
    pub fn remove_attribute(&mut self, name: &str) -> bool {
        AttributeDomain::ALL
            .into_iter()
            .any(|domain| self.attributes.remove(domain, name).is_some())
    }

    pub fn remove_attribute_in(&mut self, name: &str, domain: AttributeDomain) -> bool {
        self.attributes.remove(domain, name).is_some()
    }

    pub fn bounds(&self) -> Option<Aabb> {
        let positions = self.positions();
        let mut iter = positions.iter();
        let first = *iter.next()?;
        let mut min = first;
        let mut max = first;
        for p in iter {
            min = min.min(*p);
            max = max.max(*p);
        }
        Some(Aabb { min, max })
    }

    /// Recomputes the `normal` face attribute from positions and winding.
    pub fn recompute_face_normals(&mut self) {
        let positions = self.positions();
        let normals: Vec<Vec3> = self
            .faces
            .iter()
            .map(|face| {
                let [a, b, c] = face.verts.map(|v| positions[v]);
                (b - a).cross(c - a).normalize_or_zero()
            })
            .collect();
        self.attributes.insert(Attribute::from_values(
            builtin::NORMAL,
            AttributeDomain::Face,
            normals,
        ));
    }

    /// Applies `matrix` to positions and the inverse transpose to face normals.
    pub fn transform(&mut self, matrix: Mat4) {
        if let Some(position) = self
            .attributes
            .get_mut(AttributeDomain::Vertex, builtin::POSITION)
        {
            let mut moved: Vec<Vec3> = position.values::<Vec3>().collect();
            update_each(&mut moved, |p| *p = matrix.transform_point3(*p));
            position.fill(moved);
        }

        let normal_matrix = Mat3::from_mat4(matrix).inverse().transpose();
        if let Some(normal) = self
            .attributes
            .get_mut(AttributeDomain::Face, builtin::NORMAL)
        {
            let turned: Vec<Vec3> = normal
                .values::<Vec3>()
                .map(|n| (normal_matrix * n).normalize_or_zero())
                .collect();
            normal.fill(turned);
        }
    }

    /// Appends `other`, re-basing every index it carries.
    ///
    /// Attributes present on only one side are padded with the kind default.
    /// Incoming material indices are shifted past this geometry's submeshes.
    pub fn merge_with(&mut self, other: &GeometryData) {
        let vertex_offset = self.vertices.len();
        let edge_offset = self.edges.len();
        let face_offset = self.faces.len();
        let corner_offset = self.face_corners.len();
        let submesh_offset = self.submesh_count;

        self.vertices.extend(other.vertices.iter().map(|vertex| Vertex {
            edges: vertex.edges.iter().map(|e| e + edge_offset).collect(),
            faces: vertex.faces.iter().map(|f| f + face_offset).collect(),
            face_corners: vertex
                .face_corners
                .iter()
                .map(|c| c + corner_offset)
                .collect(),
        }));
        self.edges.extend(other.edges.iter().map(|edge| Edge {
            vert_a: edge.vert_a + vertex_offset,
            vert_b: edge.vert_b + vertex_offset,
            face_a: edge.face_a + face_offset,
            face_b: edge.face_b.map(|f| f + face_offset),
        }));
        self.faces.extend(other.faces.iter().map(|face| Face {
            verts: face.verts.map(|v| v + vertex_offset),
            edges: face.edges.map(|e| e + edge_offset),
            face_corners: face.face_corners.map(|c| c + corner_offset),
            adjacent_faces: face.adjacent_faces.iter().map(|f| f + face_offset).collect(),
        }));
        self.face_corners
            .extend(other.face_corners.iter().map(|corner| FaceCorner {
                vert: corner.vert + vertex_offset,
                face: corner.face + face_offset,
            }));

        for domain in AttributeDomain::ALL {
            let before = match domain {
                AttributeDomain::Vertex => vertex_offset,
                AttributeDomain::Edge => edge_offset,
                AttributeDomain::Face => face_offset,
                AttributeDomain::FaceCorner => corner_offset,
            };
            let after = self.domain_len(domain);

            let mut names: Vec<String> = self.attributes.names(domain);
            for name in other.attributes.names(domain) {
                if !names.contains(&name) {
                    names.push(name);
                }
            }

            for name in names {
                let incoming = other.attributes.get(domain, &name);
                let kind = self
                    .attributes
                    .get(domain, &name)
                    .or(incoming)
                    .map(Attribute::kind)
                    .unwrap_or(AttributeType::Float);
                let mut merged = self
                    .attributes
                    .remove(domain, &name)
                    .unwrap_or_else(|| Attribute::with_len(name.as_str(), kind, domain, before));
                merged.storage_mut().resize(before);

                match incoming {
                    Some(incoming) if name == builtin::MATERIAL_INDEX => {
                        let shifted = incoming
                            .values::<i32>()
                            .map(|m| m + submesh_offset as i32);
                        let shifted = Attribute::from_values(name.as_str(), domain, shifted);
                        merged.storage_mut().extend_from(shifted.storage());
                    }
                    Some(incoming) => merged.storage_mut().extend_from(incoming.storage()),
                    None => {}
                }
                merged.storage_mut().resize(after);
                self.attributes.insert(merged);
            }
        }

        self.submesh_count += other.submesh_count;
    }
}

fn push_unique(list: &mut Vec<usize>, value: usize) {
    if !list.contains(&value) {
        list.push(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> GeometryData {
        GeometryData::from_triangles(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 1.0),
                Vec3::new(0.0, 0.0, 1.0),
            ],
            &[[0, 2, 1], [0, 3, 2]],
            Vec::new(),
        )
    }

    #[test]
    fn from_triangles_shares_edges() {
        let geometry = quad();
        assert_eq!(geometry.vertices.len(), 4);
        assert_eq!(geometry.edges.len(), 5);
        assert_eq!(geometry.faces.len(), 2);
        assert_eq!(geometry.face_corners.len(), 6);

        let interior: Vec<&Edge> = geometry.edges.iter().filter(|e| !e.is_boundary()).collect();
        assert_eq!(interior.len(), 1);
        assert_eq!((interior[0].vert_a, interior[0].vert_b), (0, 2));
        assert_eq!(geometry.faces[0].adjacent_faces, vec![1]);
        assert_eq!(geometry.faces[1].adjacent_faces, vec![0]);
        assert_eq!(geometry.vertices[0].faces, vec![0, 1]);
        assert_eq!(geometry.vertices[0].edges.len(), 3);
    }

    #[test]
    fn face_edges_follow_winding() {
        let geometry = quad();
        for face in &geometry.faces {
            for k in 0..3 {
                let edge = geometry.edges[face.edges[k]];
                let a = face.verts[k];
                let b = face.verts[(k + 1) % 3];
                assert_eq!((edge.vert_a, edge.vert_b), (a.min(b), a.max(b)));
            }
        }
    }

    #[test]
    fn builtins_are_registered() {
        let geometry = GeometryData::empty();
        for (name, domain, kind) in builtin::ALL {
            let attribute = geometry.attributes().get(domain, name).unwrap();
            assert_eq!(attribute.kind(), kind);
            assert!(attribute.is_empty());
        }

        let quad = quad();
        let normals: Vec<Vec3> = quad
            .attribute_values(builtin::NORMAL, AttributeDomain::Face)
            .unwrap();
        for normal in normals {
            assert!((normal - Vec3::Y).length() < 1.0e-5);
        }
    }

    #[test]
    fn merge_offsets_indices() {
        let original = quad();
        let mut merged = original.clone();
        merged.merge_with(&original);

        assert_eq!(merged.vertices.len(), 2 * original.vertices.len());
        assert_eq!(merged.faces.len(), 4);
        for edge in &merged.edges[original.edges.len()..] {
            assert!(edge.vert_a >= original.vertices.len());
            assert!(edge.vert_b >= original.vertices.len());
            assert!(edge.face_a >= original.faces.len());
        }
        assert_eq!(merged.faces[2].verts, [4, 6, 5]);
        assert_eq!(merged.faces[2].adjacent_faces, vec![3]);
        assert_eq!(merged.vertices[4].faces, vec![2, 3]);
        assert_eq!(merged.positions().len(), 8);
    }

    #[test]
    fn merge_offsets_material_indices() {
        let mut a = quad();
        let b = quad();
        a.merge_with(&b);
        assert_eq!(a.submesh_count, 2);
        let materials: Vec<i32> = a
            .attribute_values(builtin::MATERIAL_INDEX, AttributeDomain::Face)
            .unwrap();
        assert_eq!(materials, vec![0, 0, 1, 1]);
    }

    #[test]
    fn merge_back_fills_missing_attributes() {
        let mut a = quad();
        let mut b = quad();
        b.store_attribute(Attribute::from_values(
            "heat",
            AttributeDomain::Vertex,
            [1.0f32, 2.0, 3.0, 4.0],
        ))
        .unwrap();
        a.merge_with(&b);
        let heat: Vec<f32> = a.attribute_values("heat", AttributeDomain::Vertex).unwrap();
        assert_eq!(heat, vec![0.0, 0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn store_rejects_mismatched_length() {
        let mut geometry = quad();
        let result = geometry.store_attribute(Attribute::from_values(
            "bad",
            AttributeDomain::Face,
            [1i32, 2, 3],
        ));
        assert!(matches!(
            result,
            Err(AttributeError::InvalidLength {
                expected: 2,
                actual: 3
            })
        ));
        assert!(!geometry.has_attribute("bad"));
    }

    #[test]
    fn store_rejects_retyped_builtin() {
        let mut geometry = quad();
        let result = geometry.store_attribute(Attribute::from_values(
            builtin::MATERIAL_INDEX,
            AttributeDomain::Face,
            [1.0f32, 2.0],
        ));
        assert!(matches!(result, Err(AttributeError::InvalidType { .. })));
        let moved = Attribute::from_values(builtin::MATERIAL_INDEX, AttributeDomain::Vertex, [0.5f32; 4]);
        assert!(geometry.store_attribute(moved).is_ok());
    }

    #[test]
    fn store_reports_overwrite() {
        let mut geometry = quad();
        let attr = Attribute::from_values("w", AttributeDomain::Face, [1.0f32, 2.0]);
        assert!(!geometry.store_attribute(attr.clone()).unwrap());
        assert!(geometry.store_attribute(attr).unwrap());
    }

    #[test]
    fn get_attribute_returns_converted_copy() {
        let mut geometry = quad();
        geometry
            .store_attribute(Attribute::from_values(
                "w",
                AttributeDomain::Face,
                [2.0f32, 4.0],
            ))
            .unwrap();

        let as_vertex = geometry
            .get_attribute("w", AttributeType::Integer, AttributeDomain::Vertex)
            .unwrap();
        assert_eq!(as_vertex.domain(), AttributeDomain::Vertex);
        assert_eq!(as_vertex.kind(), AttributeType::Integer);
        assert_eq!(as_vertex.value::<i32>(1).unwrap(), 2);
        assert_eq!(as_vertex.value::<i32>(0).unwrap(), 3);

        let stored = geometry.attributes().get(AttributeDomain::Face, "w").unwrap();
        assert_eq!(stored.kind(), AttributeType::Float);
        assert!(geometry.get_attribute("missing", AttributeType::Float, AttributeDomain::Vertex).is_none());
    }

    #[test]
    fn store_in_converts_domain() {
        let mut geometry = quad();
        let attr = Attribute::from_values("w", AttributeDomain::Vertex, [1.0f32, 1.0, 1.0, 1.0]);
        geometry
            .store_attribute_in(attr, AttributeDomain::FaceCorner)
            .unwrap();
        let stored = geometry
            .attributes()
            .get(AttributeDomain::FaceCorner, "w")
            .unwrap();
        assert_eq!(stored.len(), 6);
    }

    #[test]
    fn transform_moves_positions_and_turns_normals() {
        let mut geometry = quad();
        geometry.transform(Mat4::from_rotation_x(std::f32::consts::FRAC_PI_2));
        let normals: Vec<Vec3> = geometry
            .attribute_values(builtin::NORMAL, AttributeDomain::Face)
            .unwrap();
        for normal in normals {
            assert!((normal - Vec3::Z).length() < 1.0e-5);
        }
        let bounds = geometry.bounds().unwrap();
        assert!((bounds.min.y + 1.0).abs() < 1.0e-5);
        assert!(bounds.max.y.abs() < 1.0e-5);
    }
}

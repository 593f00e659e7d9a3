use glam::{Vec2, Vec3};

use crate::attributes::{
    Attribute, AttributeDomain, AttributeError, AttributeStorage, AttributeType, AttributeValue,
};
use crate::geometry::GeometryData;

const CLAMPED_ONE_EPSILON: f32 = 1.0e-6;

fn clamp01(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

fn bool_to_float(value: bool) -> f32 {
    if value {
        1.0
    } else {
        0.0
    }
}

/// Coerces a single value to `kind`. Defined for every pair of kinds.
pub fn convert_value(value: AttributeValue, kind: AttributeType) -> AttributeValue {
    use AttributeType as K;
    use AttributeValue as V;

    match value {
        V::Boolean(b) => match kind {
            K::Boolean => V::Boolean(b),
            K::Integer => V::Integer(b as i32),
            K::Float => V::Float(bool_to_float(b)),
            K::ClampedFloat => V::ClampedFloat(bool_to_float(b)),
            K::Vector2 => V::Vector2(Vec2::splat(bool_to_float(b))),
            K::Vector3 => V::Vector3(Vec3::splat(bool_to_float(b))),
        },
        V::Integer(i) => match kind {
            K::Boolean => V::Boolean(i != 0),
            K::Integer => V::Integer(i),
            K::Float => V::Float(i as f32),
            K::ClampedFloat => V::ClampedFloat(clamp01(i as f32)),
            K::Vector2 => V::Vector2(Vec2::splat(i as f32)),
            K::Vector3 => V::Vector3(Vec3::splat(i as f32)),
        },
        V::Float(f) => match kind {
            K::Boolean => V::Boolean(f != 0.0),
            K::Integer => V::Integer(f as i32),
            K::Float => V::Float(f),
            K::ClampedFloat => V::ClampedFloat(clamp01(f)),
            K::Vector2 => V::Vector2(Vec2::splat(f)),
            K::Vector3 => V::Vector3(Vec3::splat(f)),
        },
        V::ClampedFloat(f) => match kind {
            K::Boolean => V::Boolean(f != 0.0),
            K::Integer => V::Integer(if (f - 1.0).abs() < CLAMPED_ONE_EPSILON { 1 } else { 0 }),
            K::Float => V::Float(f),
            K::ClampedFloat => V::ClampedFloat(clamp01(f)),
            K::Vector2 => V::Vector2(Vec2::splat(f)),
            K::Vector3 => V::Vector3(Vec3::splat(f)),
        },
        V::Vector2(v) => match kind {
            K::Boolean => V::Boolean(v.x != 0.0 && v.y != 0.0),
            K::Integer => V::Integer(v.x as i32),
            K::Float => V::Float(v.x),
            K::ClampedFloat => V::ClampedFloat(clamp01(v.x)),
            K::Vector2 => V::Vector2(v),
            K::Vector3 => V::Vector3(v.extend(0.0)),
        },
        V::Vector3(v) => match kind {
            K::Boolean => V::Boolean(v.x != 0.0 && v.y != 0.0 && v.z != 0.0),
            K::Integer => V::Integer(v.x as i32),
            K::Float => V::Float(v.x),
            K::ClampedFloat => V::ClampedFloat(clamp01(v.x)),
            K::Vector2 => V::Vector2(v.truncate()),
            K::Vector3 => V::Vector3(v),
        },
    }
}

/// Copy of `attribute` with every element coerced to `kind`.
pub fn convert_type(attribute: &Attribute, kind: AttributeType) -> Attribute {
    if attribute.kind() == kind {
        return attribute.clone();
    }
    let storage = attribute.storage();
    let converted =
        AttributeStorage::from_values(kind, (0..storage.len()).filter_map(|i| storage.get(i)));
    Attribute::from_storage(attribute.name(), attribute.domain(), converted)
}

/// Averages values of one kind. Booleans average to true only when the true
/// values are the minority. An empty input yields the kind default.
pub fn average_values<I>(kind: AttributeType, values: I) -> AttributeValue
where
    I: IntoIterator<Item = AttributeValue>,
{
    let mut count = 0usize;
    let mut true_count = 0usize;
    let mut int_sum = 0i64;
    let mut float_sum = 0.0f32;
    let mut vec2_sum = Vec2::ZERO;
    let mut vec3_sum = Vec3::ZERO;

    for value in values {
        count += 1;
        match convert_value(value, kind) {
            AttributeValue::Boolean(b) => true_count += b as usize,
            AttributeValue::Integer(i) => int_sum += i as i64,
            AttributeValue::Float(f) | AttributeValue::ClampedFloat(f) => float_sum += f,
            AttributeValue::Vector2(v) => vec2_sum += v,
            AttributeValue::Vector3(v) => vec3_sum += v,
        }
    }

    if count == 0 {
        return AttributeValue::default_for(kind);
    }

    let n = count as f32;
    match kind {
        AttributeType::Boolean => AttributeValue::Boolean((true_count as f32) < 0.5 * n),
        AttributeType::Integer => AttributeValue::Integer((int_sum / count as i64) as i32),
        AttributeType::Float => AttributeValue::Float(float_sum / n),
        AttributeType::ClampedFloat => AttributeValue::ClampedFloat(clamp01(float_sum / n)),
        AttributeType::Vector2 => AttributeValue::Vector2(vec2_sum / n),
        AttributeType::Vector3 => AttributeValue::Vector3(vec3_sum / n),
    }
}

/// Builds a new attribute where element `i` is the average of the source
/// elements listed in `groups[i]`. A single-element group is a plain copy.
pub(crate) fn gather_average(
    attribute: &Attribute,
    domain: AttributeDomain,
    groups: &[Vec<usize>],
) -> Attribute {
    let kind = attribute.kind();
    let storage = attribute.storage();
    let values = groups.iter().map(|group| match group.as_slice() {
        [single] => storage
            .get(*single)
            .unwrap_or_else(|| AttributeValue::default_for(kind)),
        _ => average_values(kind, group.iter().filter_map(|index| storage.get(*index))),
    });
    Attribute::from_storage(
        attribute.name(),
        domain,
        AttributeStorage::from_values(kind, values),
    )
}

/// Maps `attribute` onto `to`. Returns a plain copy when the domains match.
pub fn convert_domain(
    geometry: &GeometryData,
    attribute: &Attribute,
    to: AttributeDomain,
) -> Attribute {
    match remap_domain(geometry, attribute, to) {
        Ok(converted) => converted,
        Err(_) => attribute.clone(),
    }
}

/// Domain remap proper. Asking for the attribute's own domain is a caller bug.
pub(crate) fn remap_domain(
    geometry: &GeometryData,
    attribute: &Attribute,
    to: AttributeDomain,
) -> Result<Attribute, AttributeError> {
    let groups = domain_groups(geometry, attribute.domain(), to)?;
    Ok(gather_average(attribute, to, &groups))
}

/// For every element of `to`, the indices of the `from` elements it averages.
pub(crate) fn domain_groups(
    geometry: &GeometryData,
    from: AttributeDomain,
    to: AttributeDomain,
) -> Result<Vec<Vec<usize>>, AttributeError> {
    use AttributeDomain as D;

    let groups = match (from, to) {
        (D::Vertex, D::Edge) => geometry
            .edges
            .iter()
            .map(|edge| vec![edge.vert_a, edge.vert_b])
            .collect(),
        (D::Vertex, D::Face) => geometry
            .faces
            .iter()
            .map(|face| face.verts.to_vec())
            .collect(),
        (D::Vertex, D::FaceCorner) => geometry
            .face_corners
            .iter()
            .map(|corner| vec![corner.vert])
            .collect(),

        (D::Edge, D::Vertex) => geometry
            .vertices
            .iter()
            .map(|vertex| vertex.edges.clone())
            .collect(),
        (D::Edge, D::Face) => geometry
            .faces
            .iter()
            .map(|face| face.edges.to_vec())
            .collect(),
        (D::Edge, D::FaceCorner) => geometry
            .face_corners
            .iter()
            .map(|corner| geometry.vertices[corner.vert].edges.clone())
            .collect(),

        (D::Face, D::Vertex) => geometry
            .vertices
            .iter()
            .map(|vertex| vertex.faces.clone())
            .collect(),
        (D::Face, D::Edge) => geometry
            .edges
            .iter()
            .map(|edge| edge.faces().collect())
            .collect(),
        (D::Face, D::FaceCorner) => geometry
            .face_corners
            .iter()
            .map(|corner| geometry.vertices[corner.vert].faces.clone())
            .collect(),

        (D::FaceCorner, D::Vertex) => geometry
            .vertices
            .iter()
            .map(|vertex| vertex.face_corners.clone())
            .collect(),
        (D::FaceCorner, D::Edge) => geometry
            .edges
            .iter()
            .map(|edge| {
                edge.faces()
                    .flat_map(|face| geometry.faces[face].face_corners)
                    .filter(|corner| {
                        let vert = geometry.face_corners[*corner].vert;
                        vert == edge.vert_a || vert == edge.vert_b
                    })
                    .collect()
            })
            .collect(),
        (D::FaceCorner, D::Face) => geometry
            .faces
            .iter()
            .map(|face| face.face_corners.to_vec())
            .collect(),

        (from, _) => return Err(AttributeError::SameDomain(from)),
    };
    Ok(groups)
}

pub mod attribute_convert;
pub mod attribute_fill;
pub mod attribute_math;
pub mod attribute_remove;
pub mod boolean_math;
pub mod boolean_value;
pub mod bounding_box;
pub mod circle;
pub mod circle_curve;
pub mod compare_float;
pub mod compare_integer;
pub mod cone;
pub mod cube;
pub mod curve_length;
pub mod cylinder;
pub mod float_math;
pub mod float_value;
pub mod icosphere;
pub mod integer_math;
pub mod integer_value;
pub mod join_geometry;
pub mod line_curve;
pub mod map_range_float;
pub mod output;
pub mod plane;
pub mod random_float;
pub mod set_material;
pub mod set_shade_smooth;
pub mod subdivide;
pub mod transform_curve;
pub mod transform_geometry;
pub mod vector_math;
pub mod vector_value;

use std::sync::Arc;

use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::attributes::{AttributeDomain, AttributeType};
use crate::curve::CurveData;
use crate::geometry::GeometryData;
use crate::graph::{NodeParams, PortCapacity, PortDefinition, PortType};
use crate::port_value::PortValue;

pub fn input(name: &str, port_type: PortType) -> PortDefinition {
    PortDefinition {
        name: name.to_string(),
        port_type,
        capacity: PortCapacity::Single,
    }
}

pub fn output(name: &str, port_type: PortType) -> PortDefinition {
    input(name, port_type)
}

pub fn geometry_in(name: &str) -> PortDefinition {
    input(name, PortType::Geometry)
}

pub fn geometry_out(name: &str) -> PortDefinition {
    output(name, PortType::Geometry)
}

pub fn curve_in(name: &str) -> PortDefinition {
    input(name, PortType::Curve)
}

pub fn curve_out(name: &str) -> PortDefinition {
    output(name, PortType::Curve)
}

pub fn geometry_value(geometry: GeometryData) -> PortValue {
    PortValue::Geometry(Arc::new(geometry))
}

pub fn curve_value(curve: CurveData) -> PortValue {
    PortValue::Curve(Arc::new(curve))
}

pub fn empty_geometry() -> PortValue {
    geometry_value(GeometryData::empty())
}

/// `"domain"` param: 0 picks automatically, 1.. map onto the domains in order.
pub fn domain_from_params(params: &NodeParams, key: &str) -> Option<AttributeDomain> {
    let index = params.get_int(key, 0).clamp(0, AttributeDomain::ALL.len() as i32);
    AttributeDomain::from_index(index - 1)
}

/// `"type"` param: 0 picks automatically, 1.. map onto the attribute types.
pub fn type_from_params(params: &NodeParams, key: &str) -> Option<AttributeType> {
    let index = params.get_int(key, 0).clamp(0, AttributeType::ALL.len() as i32);
    AttributeType::from_index(index - 1)
}

/// Translation, Euler XYZ rotation in degrees, then scale.
pub fn trs_matrix(translation: Vec3, rotation_degrees: Vec3, scale: Vec3) -> Mat4 {
    let radians = rotation_degrees * (std::f32::consts::PI / 180.0);
    let rotation = Quat::from_euler(EulerRot::XYZ, radians.x, radians.y, radians.z);
    Mat4::from_scale_rotation_translation(scale, rotation, translation)
}

/// Shared approximate-equality helper for node tests.
#[cfg(test)]
pub(crate) fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() <= 1.0e-5
}

#[cfg(test)]
pub(crate) mod test_graph {
    use crate::graph::{NodeId, ParamValue, RuntimeGraph};
    use crate::nodes_builtin::NodeKind;
    use crate::port_value::PortValue;

    pub fn add(graph: &mut RuntimeGraph, kind: NodeKind) -> NodeId {
        graph.add_node(kind)
    }

    pub fn add_with(
        graph: &mut RuntimeGraph,
        kind: NodeKind,
        params: &[(&str, ParamValue)],
    ) -> NodeId {
        let node = graph.add_node(kind);
        for (key, value) in params {
            graph
                .set_param(node, *key, value.clone())
                .expect("node exists");
        }
        node
    }

    pub fn connect(graph: &mut RuntimeGraph, from: NodeId, output: &str, to: NodeId, input: &str) {
        let output = graph.output_port(from, output).expect("output port");
        let input = graph.input_port(to, input).expect("input port");
        graph.connect(output, input).expect("connect");
    }

    pub fn pull(graph: &RuntimeGraph, node: NodeId, output: &str) -> PortValue {
        let port = graph.output_port(node, output).expect("output port");
        graph.get_value_for_port(port).expect("pull")
    }
}

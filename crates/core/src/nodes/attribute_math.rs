use std::collections::BTreeMap;

use glam::Vec3;
use tracing::warn;

use crate::attributes::{Attribute, AttributeType, IntoAttribute};
use crate::eval::NodeInputs;
use crate::geometry::GeometryData;
use crate::graph::{NodeDefinition, NodeParams, ParamValue, PortType};
use crate::nodes::float_math::{self, FloatMathOp};
use crate::nodes::vector_math::{self, VectorMathOp};
use crate::nodes::{domain_from_params, empty_geometry, geometry_in, geometry_out, geometry_value, input};
use crate::port_value::PortValue;

pub const NAME: &str = "Attribute Math";

pub fn definition() -> NodeDefinition {
    NodeDefinition {
        name: NAME.to_string(),
        category: "Attributes".to_string(),
        inputs: vec![
            geometry_in("geometry"),
            input("a", PortType::String),
            input("b", PortType::String),
            input("float_b", PortType::Float),
            input("vector_b", PortType::Vector),
            input("result", PortType::String),
        ],
        outputs: vec![geometry_out("result")],
    }
}

pub fn default_params() -> NodeParams {
    NodeParams {
        values: BTreeMap::from([
            ("a".to_string(), ParamValue::String(String::new())),
            ("b".to_string(), ParamValue::String(String::new())),
            ("float_b".to_string(), ParamValue::Float(0.0)),
            ("vector_b".to_string(), ParamValue::Vec3([0.0, 0.0, 0.0])),
            ("result".to_string(), ParamValue::String(String::new())),
            ("type".to_string(), ParamValue::Int(0)),
            ("operation".to_string(), ParamValue::Int(0)),
            ("domain".to_string(), ParamValue::Int(0)),
        ]),
    }
}

/// `type` 0 works on floats with the Float Math operations, 1 on vectors
/// with the Vector Math operations. `b` names a second attribute; when it is
/// empty or missing, the `float_b`/`vector_b` literal is used for every
/// element. An empty `result` overwrites `a`.
pub fn compute(params: &NodeParams, inputs: &NodeInputs) -> Vec<PortValue> {
    let Some(source) = inputs.geometry("geometry") else {
        return vec![empty_geometry()];
    };
    let a_name = inputs.string("a");
    let Some(a_stored) = source.get_attribute_any(&a_name) else {
        warn!("{NAME}: '{}' not found; passing input through", a_name);
        return vec![PortValue::Geometry(source)];
    };
    let domain = domain_from_params(params, "domain").unwrap_or(a_stored.domain());
    let b_name = inputs.string("b");
    let mut result_name = inputs.string("result");
    if result_name.trim().is_empty() {
        result_name = a_name.clone();
    }

    let vector_mode = params.get_int("type", 0) > 0;
    let kind = if vector_mode {
        AttributeType::Vector3
    } else {
        AttributeType::Float
    };
    let count = source.domain_len(domain);
    let a = source.get_attribute_or_default(&a_name, kind, domain);
    let b = source.get_attribute(&b_name, kind, domain).unwrap_or_else(|| {
        if vector_mode {
            let literal = inputs.vector("vector_b");
            Attribute::from_values(b_name.as_str(), domain, vec![literal; count])
        } else {
            let literal = inputs.float("float_b");
            Attribute::from_values(b_name.as_str(), domain, vec![literal; count])
        }
    });

    let result = if vector_mode {
        let op = VectorMathOp::from_params(params);
        a.yield_with(Some(&b), |x: Vec3, y: Vec3| vector_math::apply_vector(op, x, y, 1.0))
            .into_new(result_name.as_str(), domain)
    } else {
        let op = FloatMathOp::from_params(params);
        a.yield_with(Some(&b), |x: f32, y: f32| float_math::apply(op, x, y, 0.0, 0.0))
            .into_new(result_name.as_str(), domain)
    };

    let mut geometry = GeometryData::clone(&source);
    geometry.remove_attribute(&result_name);
    if let Err(err) = geometry.store_attribute(result) {
        warn!("{NAME}: cannot store '{}': {}; passing input through", result_name, err);
        return vec![PortValue::Geometry(source)];
    }
    vec![geometry_value(geometry)]
}

#[cfg(test)]
mod tests {
    use crate::attributes::AttributeDomain;
    use crate::graph::{ParamValue, RuntimeGraph};
    use crate::nodes::float_math::FloatMathOp;
    use crate::nodes::test_graph::{add_with, connect, pull};
    use crate::nodes::vector_math::VectorMathOp;
    use crate::nodes_builtin::NodeKind;
    use crate::port_value::PortValue;

    fn geometry_of(value: PortValue) -> std::sync::Arc<crate::geometry::GeometryData> {
        match value {
            PortValue::Geometry(geometry) => geometry,
            other => panic!("expected geometry, got {other:?}"),
        }
    }

    #[test]
    fn float_attribute_times_literal() {
        let mut graph = RuntimeGraph::new();
        let plane = add_with(&mut graph, NodeKind::Plane, &[]);
        let fill = add_with(
            &mut graph,
            NodeKind::AttributeFill,
            &[
                ("attribute", ParamValue::String("w".to_string())),
                ("float", ParamValue::Float(1.5)),
            ],
        );
        let math = add_with(
            &mut graph,
            NodeKind::AttributeMath,
            &[
                ("a", ParamValue::String("w".to_string())),
                ("float_b", ParamValue::Float(4.0)),
                ("result", ParamValue::String("w2".to_string())),
                ("operation", ParamValue::Int(FloatMathOp::Multiply.index())),
            ],
        );
        connect(&mut graph, plane, "geometry", fill, "geometry");
        connect(&mut graph, fill, "result", math, "geometry");
        let geometry = geometry_of(pull(&graph, math, "result"));
        let values: Vec<f32> = geometry.attribute_values("w2", AttributeDomain::Vertex).unwrap();
        assert_eq!(values, vec![6.0; 4]);
        assert!(geometry.has_attribute("w"));
    }

    #[test]
    fn vector_attribute_plus_named_attribute() {
        let mut graph = RuntimeGraph::new();
        let plane = add_with(&mut graph, NodeKind::Plane, &[]);
        let fill = add_with(
            &mut graph,
            NodeKind::AttributeFill,
            &[
                ("attribute", ParamValue::String("offset".to_string())),
                ("type", ParamValue::Int(2)),
                ("vector", ParamValue::Vec3([0.0, 1.0, 0.0])),
            ],
        );
        let math = add_with(
            &mut graph,
            NodeKind::AttributeMath,
            &[
                ("a", ParamValue::String("position".to_string())),
                ("b", ParamValue::String("offset".to_string())),
                ("type", ParamValue::Int(1)),
                ("operation", ParamValue::Int(VectorMathOp::Add.index())),
            ],
        );
        connect(&mut graph, plane, "geometry", fill, "geometry");
        connect(&mut graph, fill, "result", math, "geometry");
        let geometry = geometry_of(pull(&graph, math, "result"));
        for position in geometry.positions() {
            assert!((position.y - 1.0).abs() < 1.0e-6);
        }
        assert_eq!(geometry.bounds().unwrap().min.y, 1.0);
    }

    #[test]
    fn missing_source_passes_through() {
        let mut graph = RuntimeGraph::new();
        let plane = add_with(&mut graph, NodeKind::Plane, &[]);
        let math = add_with(
            &mut graph,
            NodeKind::AttributeMath,
            &[("a", ParamValue::String("nope".to_string()))],
        );
        connect(&mut graph, plane, "geometry", math, "geometry");
        let geometry = geometry_of(pull(&graph, math, "result"));
        assert!(!geometry.has_attribute("nope"));
        assert_eq!(geometry.vertices.len(), 4);
    }
}

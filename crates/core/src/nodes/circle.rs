use std::collections::BTreeMap;

use crate::eval::NodeInputs;
use crate::graph::{NodeDefinition, NodeParams, ParamValue, PortType};
use crate::nodes::{geometry_out, geometry_value, input};
use crate::port_value::PortValue;
use crate::primitives;

pub const NAME: &str = "Circle";

pub fn definition() -> NodeDefinition {
    NodeDefinition {
        name: NAME.to_string(),
        category: "Primitives".to_string(),
        inputs: vec![
            input("radius", PortType::Float),
            input("points", PortType::Integer),
        ],
        outputs: vec![geometry_out("geometry")],
    }
}

pub fn default_params() -> NodeParams {
    NodeParams {
        values: BTreeMap::from([
            ("radius".to_string(), ParamValue::Float(1.0)),
            ("points".to_string(), ParamValue::Int(8)),
        ]),
    }
}

pub fn compute(_params: &NodeParams, inputs: &NodeInputs) -> Vec<PortValue> {
    vec![geometry_value(primitives::circle(
        inputs.float("radius"),
        inputs.int("points"),
    ))]
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::geometry::GeometryData;
    use crate::graph::{NodeId, ParamValue, RuntimeGraph};
    use crate::nodes::test_graph::{add, add_with, pull};
    use crate::nodes_builtin::NodeKind;
    use crate::port_value::PortValue;

    fn geometry(graph: &RuntimeGraph, node: NodeId) -> Arc<GeometryData> {
        match pull(graph, node, "geometry") {
            PortValue::Geometry(geometry) => geometry,
            other => panic!("expected geometry, got {other:?}"),
        }
    }

    #[test]
    fn unit_circle_with_eight_points() {
        let mut graph = RuntimeGraph::new();
        let circle = add(&mut graph, NodeKind::Circle);
        let disc = geometry(&graph, circle);
        assert_eq!(disc.vertices.len(), 9);
        assert_eq!(disc.faces.len(), 8);
        for position in &disc.positions()[1..] {
            assert!((position.length() - 1.0).abs() < 1.0e-5);
        }
    }

    #[test]
    fn points_clamp_to_a_triangle() {
        let mut graph = RuntimeGraph::new();
        let circle = add_with(
            &mut graph,
            NodeKind::Circle,
            &[("points", ParamValue::Int(1)), ("radius", ParamValue::Float(2.0))],
        );
        let disc = geometry(&graph, circle);
        assert_eq!(disc.faces.len(), 3);
        assert!((disc.positions()[1].length() - 2.0).abs() < 1.0e-5);
    }
}

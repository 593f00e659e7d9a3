use std::collections::BTreeMap;

use crate::eval::NodeInputs;
use crate::graph::{NodeDefinition, NodeParams, ParamValue, PortType};
use crate::nodes::{geometry_out, geometry_value, input};
use crate::port_value::PortValue;
use crate::primitives;

pub const NAME: &str = "Cylinder";

pub fn definition() -> NodeDefinition {
    NodeDefinition {
        name: NAME.to_string(),
        category: "Primitives".to_string(),
        inputs: vec![
            input("bottom_radius", PortType::Float),
            input("top_radius", PortType::Float),
            input("height", PortType::Float),
            input("points", PortType::Integer),
        ],
        outputs: vec![geometry_out("geometry")],
    }
}

pub fn default_params() -> NodeParams {
    NodeParams {
        values: BTreeMap::from([
            ("bottom_radius".to_string(), ParamValue::Float(1.0)),
            ("top_radius".to_string(), ParamValue::Float(1.0)),
            ("height".to_string(), ParamValue::Float(2.0)),
            ("points".to_string(), ParamValue::Int(8)),
        ]),
    }
}

pub fn compute(_params: &NodeParams, inputs: &NodeInputs) -> Vec<PortValue> {
    vec![geometry_value(primitives::cylinder(
        inputs.float("bottom_radius"),
        inputs.float("top_radius"),
        inputs.float("height"),
        inputs.int("points"),
    ))]
}

#[cfg(test)]
mod tests {
    use crate::graph::{ParamValue, RuntimeGraph};
    use crate::nodes::test_graph::{add_with, pull};
    use crate::nodes_builtin::NodeKind;
    use crate::port_value::PortValue;

    #[test]
    fn radii_and_height_come_from_params() {
        let mut graph = RuntimeGraph::new();
        let cylinder = add_with(
            &mut graph,
            NodeKind::Cylinder,
            &[
                ("bottom_radius", ParamValue::Float(2.0)),
                ("top_radius", ParamValue::Float(0.5)),
                ("height", ParamValue::Float(3.0)),
                ("points", ParamValue::Int(6)),
            ],
        );
        let PortValue::Geometry(geometry) = pull(&graph, cylinder, "geometry") else {
            panic!("expected geometry");
        };
        assert_eq!(geometry.vertices.len(), 14);
        assert_eq!(geometry.faces.len(), 24);
        let positions = geometry.positions();
        assert!((positions[0].length() - 2.0).abs() < 1.0e-5);
        assert!((positions[6].x.hypot(positions[6].z) - 0.5).abs() < 1.0e-5);
        assert!((geometry.bounds().unwrap().max.y - 3.0).abs() < 1.0e-5);
    }
}

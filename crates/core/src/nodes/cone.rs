use std::collections::BTreeMap;

use crate::eval::NodeInputs;
use crate::graph::{NodeDefinition, NodeParams, ParamValue, PortType};
use crate::nodes::{geometry_out, geometry_value, input};
use crate::port_value::PortValue;
use crate::primitives;

pub const NAME: &str = "Cone";

pub fn definition() -> NodeDefinition {
    NodeDefinition {
        name: NAME.to_string(),
        category: "Primitives".to_string(),
        inputs: vec![
            input("radius", PortType::Float),
            input("height", PortType::Float),
            input("points", PortType::Integer),
        ],
        outputs: vec![geometry_out("geometry")],
    }
}

pub fn default_params() -> NodeParams {
    NodeParams {
        values: BTreeMap::from([
            ("radius".to_string(), ParamValue::Float(1.0)),
            ("height".to_string(), ParamValue::Float(2.0)),
            ("points".to_string(), ParamValue::Int(8)),
        ]),
    }
}

pub fn compute(_params: &NodeParams, inputs: &NodeInputs) -> Vec<PortValue> {
    vec![geometry_value(primitives::cone(
        inputs.float("radius"),
        inputs.float("height"),
        inputs.int("points"),
    ))]
}

#[cfg(test)]
mod tests {
    use crate::graph::{ParamValue, RuntimeGraph};
    use crate::nodes::test_graph::{add, add_with, pull};
    use crate::nodes_builtin::NodeKind;
    use crate::port_value::PortValue;

    #[test]
    fn defaults_build_an_eight_sided_cone() {
        let mut graph = RuntimeGraph::new();
        let cone = add(&mut graph, NodeKind::Cone);
        let PortValue::Geometry(geometry) = pull(&graph, cone, "geometry") else {
            panic!("expected geometry");
        };
        assert_eq!(geometry.vertices.len(), 10);
        assert_eq!(geometry.faces.len(), 16);
        assert!((geometry.bounds().unwrap().max.y - 2.0).abs() < 1.0e-5);
    }

    #[test]
    fn points_clamp_to_the_maximum() {
        let mut graph = RuntimeGraph::new();
        let cone = add_with(&mut graph, NodeKind::Cone, &[("points", ParamValue::Int(10_000))]);
        let PortValue::Geometry(geometry) = pull(&graph, cone, "geometry") else {
            panic!("expected geometry");
        };
        assert_eq!(geometry.faces.len(), 2 * crate::primitives::MAX_CIRCULAR_POINTS as usize);
    }
}

use std::collections::BTreeMap;

use crate::eval::NodeInputs;
use crate::graph::{NodeDefinition, NodeParams, ParamValue, PortType};
use crate::nodes::{geometry_out, geometry_value, input};
use crate::port_value::PortValue;
use crate::primitives;

pub const NAME: &str = "Icosphere";

pub fn definition() -> NodeDefinition {
    NodeDefinition {
        name: NAME.to_string(),
        category: "Primitives".to_string(),
        inputs: vec![
            input("radius", PortType::Float),
            input("subdivisions", PortType::Integer),
        ],
        outputs: vec![geometry_out("geometry")],
    }
}

pub fn default_params() -> NodeParams {
    NodeParams {
        values: BTreeMap::from([
            ("radius".to_string(), ParamValue::Float(1.0)),
            ("subdivisions".to_string(), ParamValue::Int(2)),
        ]),
    }
}

pub fn compute(_params: &NodeParams, inputs: &NodeInputs) -> Vec<PortValue> {
    vec![geometry_value(primitives::icosphere(
        inputs.float("radius"),
        inputs.int("subdivisions"),
    ))]
}

#[cfg(test)]
mod tests {
    use crate::graph::{ParamValue, RuntimeGraph};
    use crate::nodes::test_graph::{add_with, connect, pull};
    use crate::nodes_builtin::NodeKind;
    use crate::port_value::PortValue;

    #[test]
    fn subdivisions_come_from_upstream_integer() {
        let mut graph = RuntimeGraph::new();
        let levels = add_with(&mut graph, NodeKind::IntegerValue, &[("value", ParamValue::Int(1))]);
        let sphere = add_with(&mut graph, NodeKind::Icosphere, &[]);
        connect(&mut graph, levels, "value", sphere, "subdivisions");
        let PortValue::Geometry(geometry) = pull(&graph, sphere, "geometry") else {
            panic!("expected geometry");
        };
        assert_eq!(geometry.faces.len(), 80);
    }
}

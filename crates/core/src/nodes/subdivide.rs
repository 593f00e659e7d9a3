use std::collections::BTreeMap;

use crate::eval::NodeInputs;
use crate::graph::{NodeDefinition, NodeParams, ParamValue, PortType};
use crate::nodes::{empty_geometry, geometry_in, geometry_out, geometry_value, input};
use crate::port_value::PortValue;
use crate::subdivision::subdivide;

pub const NAME: &str = "Subdivide";

pub fn definition() -> NodeDefinition {
    NodeDefinition {
        name: NAME.to_string(),
        category: "Geometry".to_string(),
        inputs: vec![geometry_in("geometry"), input("levels", PortType::Integer)],
        outputs: vec![geometry_out("result")],
    }
}

pub fn default_params() -> NodeParams {
    NodeParams {
        values: BTreeMap::from([("levels".to_string(), ParamValue::Int(1))]),
    }
}

pub fn compute(_params: &NodeParams, inputs: &NodeInputs) -> Vec<PortValue> {
    match inputs.geometry("geometry") {
        Some(source) => vec![geometry_value(subdivide(&source, inputs.int("levels")))],
        None => vec![empty_geometry()],
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::{ParamValue, RuntimeGraph};
    use crate::nodes::test_graph::{add_with, connect, pull};
    use crate::nodes_builtin::NodeKind;
    use crate::port_value::PortValue;

    #[test]
    fn splits_each_level_into_four() {
        let mut graph = RuntimeGraph::new();
        let plane = add_with(&mut graph, NodeKind::Plane, &[]);
        let subdivide = add_with(&mut graph, NodeKind::Subdivide, &[("levels", ParamValue::Int(2))]);
        connect(&mut graph, plane, "geometry", subdivide, "geometry");
        let PortValue::Geometry(geometry) = pull(&graph, subdivide, "result") else {
            panic!("expected geometry");
        };
        assert_eq!(geometry.faces.len(), 2 * 16);
    }
}

use std::collections::BTreeMap;

use crate::eval::NodeInputs;
use crate::graph::{NodeDefinition, NodeParams, ParamValue, PortType};
use crate::nodes::{geometry_out, geometry_value, input};
use crate::port_value::PortValue;
use crate::primitives;

pub const NAME: &str = "Cube";

pub fn definition() -> NodeDefinition {
    NodeDefinition {
        name: NAME.to_string(),
        category: "Primitives".to_string(),
        inputs: vec![input("size", PortType::Vector)],
        outputs: vec![geometry_out("geometry")],
    }
}

pub fn default_params() -> NodeParams {
    NodeParams {
        values: BTreeMap::from([("size".to_string(), ParamValue::Vec3([1.0, 1.0, 1.0]))]),
    }
}

pub fn compute(_params: &NodeParams, inputs: &NodeInputs) -> Vec<PortValue> {
    vec![geometry_value(primitives::cube(inputs.vector("size")))]
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use crate::graph::{ParamValue, RuntimeGraph};
    use crate::nodes::test_graph::{add_with, connect, pull};
    use crate::nodes_builtin::NodeKind;
    use crate::port_value::PortValue;

    #[test]
    fn size_follows_upstream_vector() {
        let mut graph = RuntimeGraph::new();
        let size = add_with(
            &mut graph,
            NodeKind::VectorValue,
            &[("value", ParamValue::Vec3([2.0, 1.0, 3.0]))],
        );
        let cube = add_with(&mut graph, NodeKind::Cube, &[]);
        connect(&mut graph, size, "value", cube, "size");
        let PortValue::Geometry(geometry) = pull(&graph, cube, "geometry") else {
            panic!("expected geometry");
        };
        assert_eq!(geometry.vertices.len(), 8);
        assert_eq!(geometry.faces.len(), 12);
        let extent = geometry.bounds().unwrap().size();
        assert!((extent - Vec3::new(2.0, 1.0, 3.0)).length() < 1.0e-5);
    }
}

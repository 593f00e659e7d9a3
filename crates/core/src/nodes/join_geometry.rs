use crate::eval::NodeInputs;
use crate::geometry::GeometryData;
use crate::graph::{NodeDefinition, NodeParams, PortCapacity};
use crate::nodes::{geometry_in, geometry_out, geometry_value};
use crate::port_value::PortValue;

pub const NAME: &str = "Join Geometry";

pub fn definition() -> NodeDefinition {
    let mut geometry = geometry_in("geometry");
    geometry.capacity = PortCapacity::Multiple;
    NodeDefinition {
        name: NAME.to_string(),
        category: "Geometry".to_string(),
        inputs: vec![geometry],
        outputs: vec![geometry_out("result")],
    }
}

pub fn default_params() -> NodeParams {
    NodeParams::default()
}

/// Merges every connected geometry in connection order.
pub fn compute(_params: &NodeParams, inputs: &NodeInputs) -> Vec<PortValue> {
    let mut joined = GeometryData::empty();
    for geometry in inputs.geometries("geometry") {
        joined.merge_with(&geometry);
    }
    vec![geometry_value(joined)]
}

#[cfg(test)]
mod tests {
    use crate::attributes::AttributeDomain;
    use crate::graph::RuntimeGraph;
    use crate::nodes::test_graph::{add_with, connect, pull};
    use crate::nodes_builtin::NodeKind;
    use crate::port_value::PortValue;

    #[test]
    fn merges_in_connection_order() {
        let mut graph = RuntimeGraph::new();
        let cube = add_with(&mut graph, NodeKind::Cube, &[]);
        let plane = add_with(&mut graph, NodeKind::Plane, &[]);
        let join = add_with(&mut graph, NodeKind::JoinGeometry, &[]);
        connect(&mut graph, cube, "geometry", join, "geometry");
        connect(&mut graph, plane, "geometry", join, "geometry");

        let PortValue::Geometry(joined) = pull(&graph, join, "result") else {
            panic!("expected geometry");
        };
        assert_eq!(joined.vertices.len(), 8 + 4);
        assert_eq!(joined.faces.len(), 12 + 2);
        assert_eq!(joined.submesh_count, 2);
        let materials: Vec<i32> = joined
            .attribute_values("material_index", AttributeDomain::Face)
            .unwrap();
        assert_eq!(materials[0], 0);
        assert_eq!(materials[13], 1);
    }

    #[test]
    fn nothing_connected_is_empty() {
        let mut graph = RuntimeGraph::new();
        let join = add_with(&mut graph, NodeKind::JoinGeometry, &[]);
        let PortValue::Geometry(joined) = pull(&graph, join, "result") else {
            panic!("expected geometry");
        };
        assert!(joined.is_empty());
    }
}

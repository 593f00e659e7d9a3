use std::collections::BTreeMap;

use tracing::warn;

use crate::attributes::{Attribute, AttributeDomain};
use crate::eval::NodeInputs;
use crate::geometry::{builtin, GeometryData};
use crate::graph::{NodeDefinition, NodeParams, ParamValue, PortType};
use crate::nodes::{empty_geometry, geometry_in, geometry_out, geometry_value, input};
use crate::port_value::PortValue;

pub const NAME: &str = "Set Shade Smooth";

pub fn definition() -> NodeDefinition {
    NodeDefinition {
        name: NAME.to_string(),
        category: "Geometry".to_string(),
        inputs: vec![
            geometry_in("geometry"),
            input("shade_smooth", PortType::Boolean),
        ],
        outputs: vec![geometry_out("result")],
    }
}

pub fn default_params() -> NodeParams {
    NodeParams {
        values: BTreeMap::from([("shade_smooth".to_string(), ParamValue::Bool(true))]),
    }
}

pub fn compute(_params: &NodeParams, inputs: &NodeInputs) -> Vec<PortValue> {
    let Some(source) = inputs.geometry("geometry") else {
        return vec![empty_geometry()];
    };
    let mut geometry = GeometryData::clone(&source);
    let smooth: Vec<bool> = inputs
        .values("shade_smooth", geometry.faces.len())
        .iter()
        .map(PortValue::as_bool)
        .collect();
    let attribute = Attribute::from_values(builtin::SHADE_SMOOTH, AttributeDomain::Face, smooth);
    if let Err(err) = geometry.store_attribute(attribute) {
        warn!("{NAME}: {err}; passing input through");
        return vec![PortValue::Geometry(source)];
    }
    vec![geometry_value(geometry)]
}

#[cfg(test)]
mod tests {
    use crate::attributes::AttributeDomain;
    use crate::graph::RuntimeGraph;
    use crate::nodes::test_graph::{add_with, connect, pull};
    use crate::nodes_builtin::NodeKind;
    use crate::port_value::PortValue;

    #[test]
    fn marks_every_face_smooth() {
        let mut graph = RuntimeGraph::new();
        let cube = add_with(&mut graph, NodeKind::Cube, &[]);
        let smooth = add_with(&mut graph, NodeKind::SetShadeSmooth, &[]);
        connect(&mut graph, cube, "geometry", smooth, "geometry");
        let PortValue::Geometry(geometry) = pull(&graph, smooth, "result") else {
            panic!("expected geometry");
        };
        let flags: Vec<bool> = geometry
            .attribute_values("shade_smooth", AttributeDomain::Face)
            .unwrap();
        assert_eq!(flags.len(), 12);
        assert!(flags.iter().all(|f| *f));
    }
}

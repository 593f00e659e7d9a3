use crate::eval::NodeInputs;
use crate::graph::{NodeDefinition, NodeParams};
use crate::nodes;
use crate::port_value::PortValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    FloatValue,
    IntegerValue,
    BooleanValue,
    VectorValue,
    RandomFloat,
    MapRangeFloat,
    FloatMath,
    IntegerMath,
    CompareInteger,
    CompareFloat,
    BooleanMath,
    VectorMath,
    Plane,
    Circle,
    Cube,
    Cylinder,
    Cone,
    Icosphere,
    TransformGeometry,
    Subdivide,
    JoinGeometry,
    BoundingBox,
    SetMaterial,
    SetShadeSmooth,
    AttributeFill,
    AttributeMath,
    AttributeRemove,
    AttributeConvert,
    CircleCurve,
    LineCurve,
    CurveLength,
    TransformCurve,
    Output,
}

impl NodeKind {
    pub const ALL: [NodeKind; 33] = [
        NodeKind::FloatValue,
        NodeKind::IntegerValue,
        NodeKind::BooleanValue,
        NodeKind::VectorValue,
        NodeKind::RandomFloat,
        NodeKind::MapRangeFloat,
        NodeKind::FloatMath,
        NodeKind::IntegerMath,
        NodeKind::CompareInteger,
        NodeKind::CompareFloat,
        NodeKind::BooleanMath,
        NodeKind::VectorMath,
        NodeKind::Plane,
        NodeKind::Circle,
        NodeKind::Cube,
        NodeKind::Cylinder,
        NodeKind::Cone,
        NodeKind::Icosphere,
        NodeKind::TransformGeometry,
        NodeKind::Subdivide,
        NodeKind::JoinGeometry,
        NodeKind::BoundingBox,
        NodeKind::SetMaterial,
        NodeKind::SetShadeSmooth,
        NodeKind::AttributeFill,
        NodeKind::AttributeMath,
        NodeKind::AttributeRemove,
        NodeKind::AttributeConvert,
        NodeKind::CircleCurve,
        NodeKind::LineCurve,
        NodeKind::CurveLength,
        NodeKind::TransformCurve,
        NodeKind::Output,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NodeKind::FloatValue => nodes::float_value::NAME,
            NodeKind::IntegerValue => nodes::integer_value::NAME,
            NodeKind::BooleanValue => nodes::boolean_value::NAME,
            NodeKind::VectorValue => nodes::vector_value::NAME,
            NodeKind::RandomFloat => nodes::random_float::NAME,
            NodeKind::MapRangeFloat => nodes::map_range_float::NAME,
            NodeKind::FloatMath => nodes::float_math::NAME,
            NodeKind::IntegerMath => nodes::integer_math::NAME,
            NodeKind::CompareInteger => nodes::compare_integer::NAME,
            NodeKind::CompareFloat => nodes::compare_float::NAME,
            NodeKind::BooleanMath => nodes::boolean_math::NAME,
            NodeKind::VectorMath => nodes::vector_math::NAME,
            NodeKind::Plane => nodes::plane::NAME,
            NodeKind::Circle => nodes::circle::NAME,
            NodeKind::Cube => nodes::cube::NAME,
            NodeKind::Cylinder => nodes::cylinder::NAME,
            NodeKind::Cone => nodes::cone::NAME,
            NodeKind::Icosphere => nodes::icosphere::NAME,
            NodeKind::TransformGeometry => nodes::transform_geometry::NAME,
            NodeKind::Subdivide => nodes::subdivide::NAME,
            NodeKind::JoinGeometry => nodes::join_geometry::NAME,
            NodeKind::BoundingBox => nodes::bounding_box::NAME,
            NodeKind::SetMaterial => nodes::set_material::NAME,
            NodeKind::SetShadeSmooth => nodes::set_shade_smooth::NAME,
            NodeKind::AttributeFill => nodes::attribute_fill::NAME,
            NodeKind::AttributeMath => nodes::attribute_math::NAME,
            NodeKind::AttributeRemove => nodes::attribute_remove::NAME,
            NodeKind::AttributeConvert => nodes::attribute_convert::NAME,
            NodeKind::CircleCurve => nodes::circle_curve::NAME,
            NodeKind::LineCurve => nodes::line_curve::NAME,
            NodeKind::CurveLength => nodes::curve_length::NAME,
            NodeKind::TransformCurve => nodes::transform_curve::NAME,
            NodeKind::Output => nodes::output::NAME,
        }
    }

    pub fn from_name(name: &str) -> Option<NodeKind> {
        NodeKind::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub fn definition(self) -> NodeDefinition {
        match self {
            NodeKind::FloatValue => nodes::float_value::definition(),
            NodeKind::IntegerValue => nodes::integer_value::definition(),
            NodeKind::BooleanValue => nodes::boolean_value::definition(),
            NodeKind::VectorValue => nodes::vector_value::definition(),
            NodeKind::RandomFloat => nodes::random_float::definition(),
            NodeKind::MapRangeFloat => nodes::map_range_float::definition(),
            NodeKind::FloatMath => nodes::float_math::definition(),
            NodeKind::IntegerMath => nodes::integer_math::definition(),
            NodeKind::CompareInteger => nodes::compare_integer::definition(),
            NodeKind::CompareFloat => nodes::compare_float::definition(),
            NodeKind::BooleanMath => nodes::boolean_math::definition(),
            NodeKind::VectorMath => nodes::vector_math::definition(),
            NodeKind::Plane => nodes::plane::definition(),
            NodeKind::Circle => nodes::circle::definition(),
            NodeKind::Cube => nodes::cube::definition(),
            NodeKind::Cylinder => nodes::cylinder::definition(),
            NodeKind::Cone => nodes::cone::definition(),
            NodeKind::Icosphere => nodes::icosphere::definition(),
            NodeKind::TransformGeometry => nodes::transform_geometry::definition(),
            NodeKind::Subdivide => nodes::subdivide::definition(),
            NodeKind::JoinGeometry => nodes::join_geometry::definition(),
            NodeKind::BoundingBox => nodes::bounding_box::definition(),
            NodeKind::SetMaterial => nodes::set_material::definition(),
            NodeKind::SetShadeSmooth => nodes::set_shade_smooth::definition(),
            NodeKind::AttributeFill => nodes::attribute_fill::definition(),
            NodeKind::AttributeMath => nodes::attribute_math::definition(),
            NodeKind::AttributeRemove => nodes::attribute_remove::definition(),
            NodeKind::AttributeConvert => nodes::attribute_convert::definition(),
            NodeKind::CircleCurve => nodes::circle_curve::definition(),
            NodeKind::LineCurve => nodes::line_curve::definition(),
            NodeKind::CurveLength => nodes::curve_length::definition(),
            NodeKind::TransformCurve => nodes::transform_curve::definition(),
            NodeKind::Output => nodes::output::definition(),
        }
    }

    pub fn default_params(self) -> NodeParams {
        match self {
            NodeKind::FloatValue => nodes::float_value::default_params(),
            NodeKind::IntegerValue => nodes::integer_value::default_params(),
            NodeKind::BooleanValue => nodes::boolean_value::default_params(),
            NodeKind::VectorValue => nodes::vector_value::default_params(),
            NodeKind::RandomFloat => nodes::random_float::default_params(),
            NodeKind::MapRangeFloat => nodes::map_range_float::default_params(),
            NodeKind::FloatMath => nodes::float_math::default_params(),
            NodeKind::IntegerMath => nodes::integer_math::default_params(),
            NodeKind::CompareInteger => nodes::compare_integer::default_params(),
            NodeKind::CompareFloat => nodes::compare_float::default_params(),
            NodeKind::BooleanMath => nodes::boolean_math::default_params(),
            NodeKind::VectorMath => nodes::vector_math::default_params(),
            NodeKind::Plane => nodes::plane::default_params(),
            NodeKind::Circle => nodes::circle::default_params(),
            NodeKind::Cube => nodes::cube::default_params(),
            NodeKind::Cylinder => nodes::cylinder::default_params(),
            NodeKind::Cone => nodes::cone::default_params(),
            NodeKind::Icosphere => nodes::icosphere::default_params(),
            NodeKind::TransformGeometry => nodes::transform_geometry::default_params(),
            NodeKind::Subdivide => nodes::subdivide::default_params(),
            NodeKind::JoinGeometry => nodes::join_geometry::default_params(),
            NodeKind::BoundingBox => nodes::bounding_box::default_params(),
            NodeKind::SetMaterial => nodes::set_material::default_params(),
            NodeKind::SetShadeSmooth => nodes::set_shade_smooth::default_params(),
            NodeKind::AttributeFill => nodes::attribute_fill::default_params(),
            NodeKind::AttributeMath => nodes::attribute_math::default_params(),
            NodeKind::AttributeRemove => nodes::attribute_remove::default_params(),
            NodeKind::AttributeConvert => nodes::attribute_convert::default_params(),
            NodeKind::CircleCurve => nodes::circle_curve::default_params(),
            NodeKind::LineCurve => nodes::line_curve::default_params(),
            NodeKind::CurveLength => nodes::curve_length::default_params(),
            NodeKind::TransformCurve => nodes::transform_curve::default_params(),
            NodeKind::Output => nodes::output::default_params(),
        }
    }

    /// Computes every output of the node once, in output order.
    pub fn compute(self, params: &NodeParams, inputs: &NodeInputs) -> Vec<PortValue> {
        match self {
            NodeKind::FloatValue => nodes::float_value::compute(params, inputs),
            NodeKind::IntegerValue => nodes::integer_value::compute(params, inputs),
            NodeKind::BooleanValue => nodes::boolean_value::compute(params, inputs),
            NodeKind::VectorValue => nodes::vector_value::compute(params, inputs),
            NodeKind::RandomFloat => nodes::random_float::compute(params, inputs),
            NodeKind::MapRangeFloat => nodes::map_range_float::compute(params, inputs),
            NodeKind::FloatMath => nodes::float_math::compute(params, inputs),
            NodeKind::IntegerMath => nodes::integer_math::compute(params, inputs),
            NodeKind::CompareInteger => nodes::compare_integer::compute(params, inputs),
            NodeKind::CompareFloat => nodes::compare_float::compute(params, inputs),
            NodeKind::BooleanMath => nodes::boolean_math::compute(params, inputs),
            NodeKind::VectorMath => nodes::vector_math::compute(params, inputs),
            NodeKind::Plane => nodes::plane::compute(params, inputs),
            NodeKind::Circle => nodes::circle::compute(params, inputs),
            NodeKind::Cube => nodes::cube::compute(params, inputs),
            NodeKind::Cylinder => nodes::cylinder::compute(params, inputs),
            NodeKind::Cone => nodes::cone::compute(params, inputs),
            NodeKind::Icosphere => nodes::icosphere::compute(params, inputs),
            NodeKind::TransformGeometry => nodes::transform_geometry::compute(params, inputs),
            NodeKind::Subdivide => nodes::subdivide::compute(params, inputs),
            NodeKind::JoinGeometry => nodes::join_geometry::compute(params, inputs),
            NodeKind::BoundingBox => nodes::bounding_box::compute(params, inputs),
            NodeKind::SetMaterial => nodes::set_material::compute(params, inputs),
            NodeKind::SetShadeSmooth => nodes::set_shade_smooth::compute(params, inputs),
            NodeKind::AttributeFill => nodes::attribute_fill::compute(params, inputs),
            NodeKind::AttributeMath => nodes::attribute_math::compute(params, inputs),
            NodeKind::AttributeRemove => nodes::attribute_remove::compute(params, inputs),
            NodeKind::AttributeConvert => nodes::attribute_convert::compute(params, inputs),
            NodeKind::CircleCurve => nodes::circle_curve::compute(params, inputs),
            NodeKind::LineCurve => nodes::line_curve::compute(params, inputs),
            NodeKind::CurveLength => nodes::curve_length::compute(params, inputs),
            NodeKind::TransformCurve => nodes::transform_curve::compute(params, inputs),
            NodeKind::Output => nodes::output::compute(params, inputs),
        }
    }

    /// Nodes that produce a distinct value per requested element rather than
    /// one value broadcast to all of them.
    pub fn has_multi_values(self) -> bool {
        matches!(self, NodeKind::RandomFloat | NodeKind::MapRangeFloat)
    }

    pub fn compute_values(
        self,
        params: &NodeParams,
        inputs: &NodeInputs,
        output: usize,
        count: usize,
    ) -> Vec<PortValue> {
        match self {
            NodeKind::RandomFloat => nodes::random_float::compute_values(params, inputs, output, count),
            NodeKind::MapRangeFloat => {
                nodes::map_range_float::compute_values(params, inputs, output, count)
            }
            _ => {
                let value = self
                    .compute(params, inputs)
                    .into_iter()
                    .nth(output)
                    .unwrap_or_else(|| PortValue::Float(0.0));
                vec![value; count]
            }
        }
    }
}

pub fn builtin_definitions() -> Vec<NodeDefinition> {
    NodeKind::ALL.iter().map(|kind| kind.definition()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for kind in NodeKind::ALL {
            assert_eq!(NodeKind::from_name(kind.name()), Some(kind));
            assert_eq!(kind.definition().name, kind.name());
        }
        assert_eq!(NodeKind::from_name("Teapot"), None);
    }

    #[test]
    fn literal_inputs_have_params() {
        use crate::graph::PortType;
        for kind in NodeKind::ALL {
            let params = kind.default_params();
            for port in kind.definition().inputs {
                if matches!(port.port_type, PortType::Geometry | PortType::Curve) {
                    continue;
                }
                assert!(
                    params.values.contains_key(&port.name),
                    "{} is missing a param for {}",
                    kind.name(),
                    port.name
                );
            }
        }
    }

    #[test]
    fn every_output_is_computed() {
        for kind in NodeKind::ALL {
            let mut graph = crate::graph::RuntimeGraph::new();
            let node = graph.add_node(kind);
            let runtime = graph.node(node).unwrap();
            let inputs = NodeInputs::new(&graph, runtime);
            let outputs = kind.compute(&runtime.params, &inputs);
            assert_eq!(outputs.len(), kind.definition().outputs.len(), "{}", kind.name());
        }
    }
}

mod attribute_convert;
mod attributes;
mod curve;
mod eval;
mod export;
mod geometry;
mod graph;
mod nodes;
mod nodes_builtin;
mod parallel;
mod port_value;
mod primitives;
mod project;
mod subdivision;

pub use attribute_convert::{convert_domain, convert_type, convert_value};
pub use attributes::{
    Attribute, AttributeDomain, AttributeElement, AttributeError, AttributeStorage, AttributeType,
    AttributeValue, GeometryAttributes, IntoAttribute,
};
pub use curve::{circle_curve, line_curve, CurveData, CurveSample, CurveType};
pub use eval::{
    evaluate_output, evaluate_output_node, DirtyReason, EvalCacheStats, NodeInputs, OutputValues,
};
pub use export::{export, ExportSettings, MeshBuffer};
pub use geometry::{builtin, Aabb, Edge, Face, FaceCorner, GeometryData, Vertex};
pub use graph::{
    port_types_compatible, Connection, ConnectionId, GraphError, NodeDefinition, NodeId,
    NodeParams, ParamValue, PortCapacity, PortDefinition, PortDirection, PortId, PortType,
    RuntimeGraph, RuntimeNode, RuntimePort,
};
pub use nodes::compare_integer::CompareOp;
pub use nodes::float_math::FloatMathOp;
pub use nodes::integer_math::IntegerMathOp;
pub use nodes::vector_math::VectorMathOp;
pub use nodes_builtin::{builtin_definitions, NodeKind};
pub use port_value::{convert, PortValue};
pub use primitives::{circle, cone, cube, cylinder, icosphere, plane};
pub use project::{
    custom_data, set_custom_data, ConnectionRecord, NodeRecord, PortAddress, Project,
    ProjectError, ProjectSettings, PROJECT_VERSION,
};
pub use subdivision::subdivide;

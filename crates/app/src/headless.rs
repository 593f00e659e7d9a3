use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use geograph_core::{
    evaluate_output, export, GeometryData, MeshBuffer, NodeKind, OutputValues, ParamValue,
    Project, RuntimeGraph,
};
use serde::Deserialize;
use tracing_subscriber::filter::LevelFilter;

use crate::logging::{self, LogLevel};

/// A hand written graph: nodes by guid and kind name, connections by port
/// name. Saved documents use `Project` instead, which is also accepted.
#[derive(Debug, Deserialize)]
struct HeadlessPlan {
    #[serde(default)]
    nodes: Vec<PlanNode>,
    #[serde(default)]
    links: Vec<PlanLink>,
}

#[derive(Debug, Deserialize)]
struct PlanNode {
    guid: String,
    kind: String,
    #[serde(default)]
    params: BTreeMap<String, ParamValue>,
}

#[derive(Debug, Deserialize)]
struct PlanLink {
    from: PlanEndpoint,
    to: PlanEndpoint,
}

#[derive(Debug, Deserialize)]
struct PlanEndpoint {
    node: String,
    port: String,
}

#[derive(Debug, Default)]
pub(crate) struct HeadlessArgs {
    pub(crate) plan_path: Option<PathBuf>,
    pub(crate) save_path: Option<PathBuf>,
    pub(crate) print: bool,
    pub(crate) export: bool,
    pub(crate) log_level: Option<LevelFilter>,
    pub(crate) help: bool,
}

pub(crate) fn parse_args(args: &[String]) -> Result<HeadlessArgs, String> {
    let mut parsed = HeadlessArgs::default();
    let mut iter = args.iter().skip(1);

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--plan" => {
                let value = iter
                    .next()
                    .ok_or_else(|| "--plan requires a path".to_string())?;
                parsed.plan_path = Some(PathBuf::from(value));
            }
            "--save" => {
                let value = iter
                    .next()
                    .ok_or_else(|| "--save requires a path".to_string())?;
                parsed.save_path = Some(PathBuf::from(value));
            }
            "--log-level" => {
                let value = iter
                    .next()
                    .ok_or_else(|| "--log-level requires a level".to_string())?;
                parsed.log_level = Some(logging::parse_level(value)?);
            }
            "--print" => parsed.print = true,
            "--export" => parsed.export = true,
            "--help" | "-h" => parsed.help = true,
            other => return Err(format!("unknown argument '{other}'")),
        }
    }
    Ok(parsed)
}

pub(crate) fn print_help() {
    println!(
        "Usage: geograph [options]\n  --plan <path>       graph document or plan to evaluate\n  --save <path>       write the graph document\n  --print             print the graph document\n  --export            export the output geometry and report the buffers\n  --log-level <level> error, warn, info, debug or trace\n  --help"
    );
}

pub(crate) fn run(args: &HeadlessArgs, log_level: &LogLevel) -> Result<(), String> {
    let project = match &args.plan_path {
        Some(path) => load_document(path)?,
        None => build_project_from_plan(&default_headless_plan())?,
    };
    if args.log_level.is_none() {
        log_level.set(logging::parse_level(&project.settings.log_level)?);
    }

    let graph = project.build_graph().map_err(|err| err.to_string())?;
    let output = evaluate_output(&graph).map_err(|err| err.to_string())?;
    println!("{}", summary(&graph, &output));

    if args.export {
        let mut buffer = MeshBuffer::default();
        export(Some(&output.geometry), &mut buffer, &project.settings.export);
        println!("{}", export_summary(&buffer));
    }

    if let Some(path) = &args.save_path {
        project.save(path).map_err(|err| err.to_string())?;
        tracing::info!("headless: saved project to {:?}", path);
    }

    if args.print {
        println!("{}", project.to_json().map_err(|err| err.to_string())?);
    }

    tracing::info!("headless: completed");
    Ok(())
}

fn load_document(path: &Path) -> Result<Project, String> {
    let text = std::fs::read_to_string(path).map_err(|err| err.to_string())?;
    if let Ok(project) = Project::from_json(&text) {
        return Ok(project);
    }
    let plan: HeadlessPlan = serde_json::from_str(&text).map_err(|err| err.to_string())?;
    build_project_from_plan(&plan)
}

fn default_headless_plan() -> HeadlessPlan {
    let node = |guid: &str, kind: NodeKind| PlanNode {
        guid: guid.to_string(),
        kind: kind.name().to_string(),
        params: BTreeMap::new(),
    };
    let link = |from: &str, from_port: &str, to: &str, to_port: &str| PlanLink {
        from: PlanEndpoint {
            node: from.to_string(),
            port: from_port.to_string(),
        },
        to: PlanEndpoint {
            node: to.to_string(),
            port: to_port.to_string(),
        },
    };
    HeadlessPlan {
        nodes: vec![
            node("cube", NodeKind::Cube),
            node("subdivide", NodeKind::Subdivide),
            node("circle", NodeKind::CircleCurve),
            node("output", NodeKind::Output),
        ],
        links: vec![
            link("cube", "geometry", "subdivide", "geometry"),
            link("subdivide", "result", "output", "geometry"),
            link("circle", "curve", "output", "curve"),
        ],
    }
}

fn build_project_from_plan(plan: &HeadlessPlan) -> Result<Project, String> {
    let mut graph = RuntimeGraph::new();
    let mut guid_to_id = HashMap::new();

    for node in &plan.nodes {
        let kind = NodeKind::from_name(&node.kind)
            .ok_or_else(|| format!("unknown node kind {}", node.kind))?;
        let node_id = graph
            .add_node_with_guid(kind, node.guid.as_str())
            .map_err(|err| err.to_string())?;
        for (key, value) in &node.params {
            graph
                .set_param(node_id, key.as_str(), value.clone())
                .map_err(|err| err.to_string())?;
        }
        guid_to_id.insert(node.guid.clone(), node_id);
    }

    for link in &plan.links {
        let from_node = guid_to_id
            .get(&link.from.node)
            .ok_or_else(|| format!("unknown node {}", link.from.node))?;
        let to_node = guid_to_id
            .get(&link.to.node)
            .ok_or_else(|| format!("unknown node {}", link.to.node))?;
        let from_port = graph
            .output_port(*from_node, &link.from.port)
            .map_err(|err| err.to_string())?;
        let to_port = graph
            .input_port(*to_node, &link.to.port)
            .map_err(|err| err.to_string())?;
        graph
            .connect(from_port, to_port)
            .map_err(|err| format!("link error: {err}"))?;
    }

    Project::from_graph(&graph).map_err(|err| err.to_string())
}

fn summary(graph: &RuntimeGraph, output: &OutputValues) -> String {
    let stats = graph.stats();
    format!(
        "{}\ncurve: {} points, closed {}, length {:.4}\ncache: {} hits, {} misses",
        geometry_summary(&output.geometry),
        output.curve.points,
        output.curve.is_closed,
        output.curve.length(),
        stats.hits,
        stats.misses
    )
}

fn geometry_summary(geometry: &GeometryData) -> String {
    let bounds = geometry
        .bounds()
        .map(|b| format!("{:?} .. {:?}", b.min.to_array(), b.max.to_array()))
        .unwrap_or_else(|| "none".to_string());
    format!(
        "geometry: {} vertices, {} edges, {} faces, {} submeshes, bounds {}",
        geometry.vertices.len(),
        geometry.edges.len(),
        geometry.faces.len(),
        geometry.submesh_count,
        bounds
    )
}

fn export_summary(buffer: &MeshBuffer) -> String {
    let submeshes: Vec<String> = buffer
        .submeshes
        .iter()
        .map(|indices| (indices.len() / 3).to_string())
        .collect();
    format!(
        "export: {} vertices, {} triangles, per submesh [{}]",
        buffer.vertex_count(),
        buffer.triangle_count(),
        submeshes.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("geograph")
            .chain(list.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn parses_flags() {
        let parsed = parse_args(&args(&[
            "--plan",
            "a.json",
            "--save",
            "b.json",
            "--export",
            "--log-level",
            "debug",
        ]))
        .unwrap();
        assert_eq!(parsed.plan_path, Some(PathBuf::from("a.json")));
        assert_eq!(parsed.save_path, Some(PathBuf::from("b.json")));
        assert!(parsed.export);
        assert!(!parsed.print);
        assert_eq!(parsed.log_level, Some(LevelFilter::DEBUG));
    }

    #[test]
    fn rejects_bad_flags() {
        assert!(parse_args(&args(&["--plan"])).is_err());
        assert!(parse_args(&args(&["--fast"])).is_err());
    }

    #[test]
    fn default_plan_evaluates() {
        let project = build_project_from_plan(&default_headless_plan()).unwrap();
        let graph = project.build_graph().unwrap();
        let output = evaluate_output(&graph).unwrap();
        assert_eq!(output.geometry.faces.len(), 48);
        assert_eq!(output.curve.points, 32);
        let text = summary(&graph, &output);
        assert!(text.contains("48 faces"));
    }

    #[test]
    fn plan_params_are_applied() {
        let plan: HeadlessPlan = serde_json::from_str(
            r#"{
                "nodes": [
                    {"guid": "p", "kind": "Plane", "params": {"subdivisions": {"Int": 1}}},
                    {"guid": "o", "kind": "Output"}
                ],
                "links": [{"from": {"node": "p", "port": "geometry"}, "to": {"node": "o", "port": "geometry"}}]
            }"#,
        )
        .unwrap();
        let project = build_project_from_plan(&plan).unwrap();
        let output = evaluate_output(&project.build_graph().unwrap()).unwrap();
        assert_eq!(output.geometry.faces.len(), 8);
    }

    #[test]
    fn unknown_kind_is_reported() {
        let plan: HeadlessPlan =
            serde_json::from_str(r#"{"nodes": [{"guid": "x", "kind": "Teapot"}]}"#).unwrap();
        let err = build_project_from_plan(&plan).unwrap_err();
        assert!(err.contains("Teapot"));
    }
}

use crate::layout::{FamilyLayout, LayoutEdge, Position, PositionedNode, Relation};
use crate::person::PersonRecord;
use crate::theme::Theme;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// The `{nodes, edges}` document a React Flow surface consumes.
#[derive(Debug, Serialize)]
pub struct FlowDump {
    pub nodes: Vec<FlowNode>,
    pub edges: Vec<FlowEdge>,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Serialize)]
pub struct FlowNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub data: PersonRecord,
    pub position: Position,
    pub style: NodeStyle,
}

#[derive(Debug, Serialize)]
pub struct NodeStyle {
    pub width: f32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub relation: Relation,
    pub class_name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub marker_end: Marker,
}

#[derive(Debug, Serialize)]
pub struct Marker {
    #[serde(rename = "type")]
    pub kind: String,
    pub color: String,
}

impl FlowDump {
    pub fn from_layout(layout: &FamilyLayout, theme: &Theme) -> Self {
        let nodes = layout
            .nodes
            .iter()
            .map(|node| flow_node(node, theme))
            .collect();
        let edges = layout
            .edges
            .iter()
            .map(|edge| flow_edge(edge, theme))
            .collect();
        FlowDump {
            nodes,
            edges,
            width: layout.width,
            height: layout.height,
        }
    }
}

fn flow_node(node: &PositionedNode, theme: &Theme) -> FlowNode {
    FlowNode {
        id: node.id.to_string(),
        kind: theme.node_type.clone(),
        data: node.person.clone(),
        position: node.position,
        style: NodeStyle { width: node.width },
    }
}

fn flow_edge(edge: &LayoutEdge, theme: &Theme) -> FlowEdge {
    let (class_name, color) = match edge.relation {
        Relation::Father => (&theme.father_class, &theme.father_color),
        Relation::Mother => (&theme.mother_class, &theme.mother_color),
    };
    FlowEdge {
        id: edge.id.clone(),
        source: edge.source.to_string(),
        target: edge.target.to_string(),
        relation: edge.relation,
        class_name: class_name.clone(),
        kind: theme.edge_type.clone(),
        marker_end: Marker {
            kind: theme.marker_type.clone(),
            color: color.clone(),
        },
    }
}

pub fn layout_dump_json(layout: &FamilyLayout, theme: &Theme, pretty: bool) -> anyhow::Result<String> {
    let dump = FlowDump::from_layout(layout, theme);
    let json = if pretty {
        serde_json::to_string_pretty(&dump)?
    } else {
        serde_json::to_string(&dump)?
    };
    Ok(json)
}

/// Writes the dump to `path`, or to stdout when no path is given.
pub fn write_layout_dump(
    path: Option<&Path>,
    layout: &FamilyLayout,
    theme: &Theme,
    pretty: bool,
) -> anyhow::Result<()> {
    let dump = FlowDump::from_layout(layout, theme);
    match path {
        Some(path) => {
            let file = File::create(path)?;
            let mut writer = BufWriter::new(file);
            write_json(&mut writer, &dump, pretty)?;
            writer.flush()?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut writer = stdout.lock();
            write_json(&mut writer, &dump, pretty)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}

fn write_json<W: Write>(writer: &mut W, dump: &FlowDump, pretty: bool) -> anyhow::Result<()> {
    if pretty {
        serde_json::to_writer_pretty(writer, dump)?;
    } else {
        serde_json::to_writer(writer, dump)?;
    }
    Ok(())
}

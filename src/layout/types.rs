use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::LayoutMode;
use crate::person::{PersonId, PersonRecord};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Center positions keyed by person id; the working table of one layout call.
pub type PositionMap = BTreeMap<PersonId, Position>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Relation {
    Father,
    Mother,
}

impl Relation {
    pub fn edge_prefix(self) -> char {
        match self {
            Relation::Father => 'f',
            Relation::Mother => 'm',
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutEdge {
    pub id: String,
    pub source: PersonId,
    pub target: PersonId,
    pub relation: Relation,
}

impl LayoutEdge {
    pub fn new(parent: PersonId, child: PersonId, relation: Relation) -> Self {
        Self {
            id: format!("{}-{}", relation.edge_prefix(), child),
            source: parent,
            target: child,
            relation,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositionedNode {
    pub id: PersonId,
    /// Center of the node card.
    pub center: Position,
    /// Top-left corner of the node card.
    pub position: Position,
    pub width: f32,
    pub height: f32,
    pub person: PersonRecord,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FamilyLayout {
    pub mode: LayoutMode,
    pub nodes: Vec<PositionedNode>,
    pub edges: Vec<LayoutEdge>,
    pub width: f32,
    pub height: f32,
}

impl FamilyLayout {
    pub fn empty(mode: LayoutMode) -> Self {
        Self {
            mode,
            nodes: Vec::new(),
            edges: Vec::new(),
            width: 0.0,
            height: 0.0,
        }
    }

    pub fn node(&self, id: PersonId) -> Option<&PositionedNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&LayoutEdge> {
        self.edges.iter().find(|edge| edge.id == id)
    }
}

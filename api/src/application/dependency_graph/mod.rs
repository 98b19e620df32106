use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::domain::documents::dependency::{DependencyChain, DependencyNode};

/// Depth at which the EDMS API truncates dependency chains.
pub const MAX_DEPTH: u32 = 5;

const COLUMN_SPACING: f64 = 280.0;
const ROW_SPACING: f64 = 110.0;

/// The document the graph is centered on.
#[derive(Debug, Clone, Copy)]
pub struct GraphRoot<'a> {
    pub id: i64,
    pub document_number: &'a str,
    pub title: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeRole {
    Current,
    Dependency,
    Dependent,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GraphPosition {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub document_id: i64,
    pub document_number: String,
    pub title: Option<String>,
    pub role: NodeRole,
    pub dependency_type: Option<String>,
    pub is_critical: bool,
    pub depth: u32,
    pub is_at_max_depth: bool,
    pub position: GraphPosition,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub dependency_type: Option<String>,
    pub is_critical: bool,
    pub animated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DependencyGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub has_max_depth_nodes: bool,
    pub max_depth: u32,
}

impl DependencyGraph {
    pub fn warning(&self) -> Option<&'static str> {
        self.has_max_depth_nodes.then_some(
            "Some documents are at the maximum depth and may have deeper dependencies not shown",
        )
    }
}

/// Lays out an already depth-bounded dependency chain around `root`.
///
/// Dependencies point at whatever depends on them (their parent, else the
/// root); dependents are pointed at by their parent, else by the root.
/// Edge ids are `{source}-{target}` and the first edge with a given id wins.
pub fn build_dependency_graph(root: GraphRoot<'_>, chain: &DependencyChain) -> DependencyGraph {
    let mut lookup: HashMap<i64, &str> = HashMap::new();
    lookup.insert(root.id, root.document_number);
    for node in chain.dependencies.iter().chain(chain.dependents.iter()) {
        lookup.entry(node.id).or_insert(node.document_number.as_str());
    }
    let resolve_parent = |parent_id: Option<i64>| parent_id.and_then(|p| lookup.get(&p).copied());

    let mut builder = GraphBuilder::new(root);
    for node in &chain.dependencies {
        builder.add_node(node, NodeRole::Dependency);
        let target = resolve_parent(node.parent_id).unwrap_or(root.document_number);
        builder.add_edge(&node.document_number, target, node);
    }
    for node in &chain.dependents {
        builder.add_node(node, NodeRole::Dependent);
        let source = resolve_parent(node.parent_id).unwrap_or(root.document_number);
        builder.add_edge(source, &node.document_number, node);
    }
    builder.finish()
}

struct GraphBuilder {
    nodes: Vec<GraphNode>,
    node_ids: HashSet<String>,
    edges: Vec<GraphEdge>,
    edge_ids: HashSet<String>,
    rows: HashMap<(i8, u32), u32>,
}

impl GraphBuilder {
    fn new(root: GraphRoot<'_>) -> Self {
        let mut builder = Self {
            nodes: Vec::new(),
            node_ids: HashSet::new(),
            edges: Vec::new(),
            edge_ids: HashSet::new(),
            rows: HashMap::new(),
        };
        builder.node_ids.insert(root.document_number.to_string());
        builder.nodes.push(GraphNode {
            id: root.document_number.to_string(),
            document_id: root.id,
            document_number: root.document_number.to_string(),
            title: Some(root.title.to_string()).filter(|t| !t.is_empty()),
            role: NodeRole::Current,
            dependency_type: None,
            is_critical: false,
            depth: 0,
            is_at_max_depth: false,
            position: GraphPosition { x: 0.0, y: 0.0 },
        });
        builder
    }

    fn add_node(&mut self, node: &DependencyNode, role: NodeRole) {
        if !self.node_ids.insert(node.document_number.clone()) {
            return;
        }
        let side: i8 = if role == NodeRole::Dependency { -1 } else { 1 };
        let depth = node.depth.max(1);
        let row = self.rows.entry((side, depth)).or_insert(0);
        let position = GraphPosition {
            x: f64::from(side) * f64::from(depth) * COLUMN_SPACING,
            y: f64::from(*row) * ROW_SPACING,
        };
        *row += 1;
        self.nodes.push(GraphNode {
            id: node.document_number.clone(),
            document_id: node.id,
            document_number: node.document_number.clone(),
            title: node.title.clone(),
            role,
            dependency_type: node.dependency_type.as_ref().map(|t| t.as_str().to_string()),
            is_critical: node.is_critical,
            depth: node.depth,
            is_at_max_depth: node.depth >= MAX_DEPTH,
            position,
        });
    }

    fn add_edge(&mut self, source: &str, target: &str, node: &DependencyNode) {
        if source == target {
            return;
        }
        let id = format!("{source}-{target}");
        if !self.edge_ids.insert(id.clone()) {
            return;
        }
        self.edges.push(GraphEdge {
            id,
            source: source.to_string(),
            target: target.to_string(),
            dependency_type: node.dependency_type.as_ref().map(|t| t.as_str().to_string()),
            is_critical: node.is_critical,
            animated: node.is_critical,
        });
    }

    fn finish(self) -> DependencyGraph {
        let has_max_depth_nodes = self.nodes.iter().any(|n| n.is_at_max_depth);
        DependencyGraph {
            nodes: self.nodes,
            edges: self.edges,
            has_max_depth_nodes,
            max_depth: MAX_DEPTH,
        }
    }
}

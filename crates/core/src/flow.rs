//! Step diagram (node/edge flow) conversion and editing.
//!
//! A [`Flow`] is the canvas representation of an ordered step sequence:
//! one node per step, stacked vertically, joined by a simple path of edges.
//! Extra edges only appear through [`Flow::connect`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::steps::{duplicates, split_details, Step, MAX_STEPS_PER_FLOW};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Vertical distance between consecutive step rows (pixels).
pub const VERTICAL_NODE_SPACING: f64 = 140.0;

/// Node type rendered by the step canvas.
pub const STEP_NODE_TYPE: &str = "stepNode";

/// Edge type used for the synthesised step path.
pub const DEFAULT_EDGE_TYPE: &str = "default";

/// Title used when an imported node carries neither a title nor a label.
pub const UNTITLED: &str = "Untitled";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Payload carried by each step node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepNodeData {
    pub title: String,
    #[serde(default)]
    pub details: Vec<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub position: Position,
    pub data: StepNodeData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub edge_type: String,
}

impl FlowEdge {
    fn between(source: &str, target: &str) -> Self {
        Self {
            id: edge_id(source, target),
            source: source.to_string(),
            target: target.to_string(),
            edge_type: DEFAULT_EDGE_TYPE.to_string(),
        }
    }
}

/// A node as produced by flowchart generation: `{ id, label, context }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowchartNode {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// A node/edge diagram.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Flow {
    pub nodes: Vec<FlowNode>,
    pub edges: Vec<FlowEdge>,
}

/// Reasons a JSON document could not be imported as a flow.
#[derive(Debug, thiserror::Error)]
pub enum FlowImportError {
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("expected a `steps` array or `nodes` and `edges` arrays")]
    UnrecognizedShape,

    #[error("edge {edge} references missing node {node}")]
    DanglingEdge { edge: String, node: String },

    #[error("flow has {0} nodes, exceeding the maximum of {MAX_STEPS_PER_FLOW}")]
    TooManyNodes(usize),
}

/// Synthesised edge id for a `source -> target` connection.
pub fn edge_id(source: &str, target: &str) -> String {
    format!("e-{source}-{target}")
}

fn row_position(index: usize) -> Position {
    Position {
        x: 0.0,
        y: index as f64 * VERTICAL_NODE_SPACING,
    }
}

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------

/// Lay out `steps` as one node per row and join consecutive rows.
///
/// Edges follow array positions, not id values, so duplicate ids produce
/// edges with ambiguous endpoints; see [`Flow::duplicate_ids`].
pub fn steps_to_flow(steps: &[Step]) -> Flow {
    let nodes = steps
        .iter()
        .enumerate()
        .map(|(i, step)| FlowNode {
            id: step.id.clone(),
            node_type: STEP_NODE_TYPE.to_string(),
            position: row_position(i),
            data: StepNodeData {
                title: step.title.clone(),
                details: step.details.clone(),
                completed: false,
                context: None,
            },
        })
        .collect();

    let edges = steps
        .windows(2)
        .map(|pair| FlowEdge::between(&pair[0].id, &pair[1].id))
        .collect();

    Flow { nodes, edges }
}

/// Lay out generated flowchart nodes. The node context becomes the single
/// detail line; entries without an id take their 1-based position.
pub fn flowchart_to_flow(flowchart: &[FlowchartNode]) -> Flow {
    let steps: Vec<Step> = flowchart
        .iter()
        .enumerate()
        .map(|(i, node)| Step {
            id: non_empty_or(&node.id, || (i + 1).to_string()),
            title: non_empty_or(&node.label, || format!("Step {}", i + 1)),
            details: node.context.iter().cloned().collect(),
        })
        .collect();

    let mut flow = steps_to_flow(&steps);
    for (node, source) in flow.nodes.iter_mut().zip(flowchart) {
        node.data.context = source.context.clone();
    }
    flow
}

fn non_empty_or(value: &str, fallback: impl FnOnce() -> String) -> String {
    if value.trim().is_empty() {
        fallback()
    } else {
        value.to_string()
    }
}

/// Import a flow from JSON.
///
/// Two shapes are accepted:
/// - `{ "steps": [...] }`, laid out with [`steps_to_flow`];
/// - `{ "nodes": [...], "edges": [...] }`, imported directly with defaults
///   for every missing field.
pub fn parse_json_flow(input: &str) -> Result<Flow, FlowImportError> {
    let parsed: Value = serde_json::from_str(input)?;

    let flow = if let Some(steps) = parsed.get("steps").and_then(Value::as_array) {
        let steps: Vec<Step> = steps.iter().enumerate().map(import_step).collect();
        steps_to_flow(&steps)
    } else if let (Some(nodes), Some(edges)) = (
        parsed.get("nodes").and_then(Value::as_array),
        parsed.get("edges").and_then(Value::as_array),
    ) {
        Flow {
            nodes: nodes.iter().enumerate().map(import_node).collect(),
            edges: edges.iter().map(import_edge).collect(),
        }
    } else {
        return Err(FlowImportError::UnrecognizedShape);
    };

    flow.check_integrity()?;
    Ok(flow)
}

/// Render a scalar JSON value as text; `None` for null, missing or compound.
fn scalar_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn text_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| scalar_text(Some(item)).unwrap_or_else(|| item.to_string()))
                .collect()
        })
        .unwrap_or_default()
}

fn import_step((index, value): (usize, &Value)) -> Step {
    Step {
        id: scalar_text(value.get("id")).unwrap_or_else(|| (index + 1).to_string()),
        title: scalar_text(value.get("title")).unwrap_or_default(),
        details: text_list(value.get("details")),
    }
}

fn import_node((index, value): (usize, &Value)) -> FlowNode {
    let data = value.get("data");
    let field = |name: &str| data.and_then(|d| d.get(name));

    let position = value
        .get("position")
        .filter(|p| p.is_object())
        .map(|p| Position {
            x: p.get("x").and_then(Value::as_f64).unwrap_or(0.0),
            y: p.get("y").and_then(Value::as_f64).unwrap_or(0.0),
        })
        .unwrap_or_default();

    FlowNode {
        id: scalar_text(value.get("id")).unwrap_or_else(|| (index + 1).to_string()),
        node_type: STEP_NODE_TYPE.to_string(),
        position,
        data: StepNodeData {
            title: scalar_text(field("title"))
                .or_else(|| scalar_text(field("label")))
                .unwrap_or_else(|| UNTITLED.to_string()),
            details: text_list(field("details")),
            completed: field("completed").and_then(Value::as_bool).unwrap_or(false),
            context: scalar_text(field("context")),
        },
    }
}

fn import_edge(value: &Value) -> FlowEdge {
    let source = scalar_text(value.get("source")).unwrap_or_default();
    let target = scalar_text(value.get("target")).unwrap_or_default();
    FlowEdge {
        id: scalar_text(value.get("id")).unwrap_or_else(|| edge_id(&source, &target)),
        edge_type: scalar_text(value.get("type"))
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_EDGE_TYPE.to_string()),
        source,
        target,
    }
}

// ---------------------------------------------------------------------------
// Flow operations
// ---------------------------------------------------------------------------

impl Flow {
    /// Read the flow back as steps, in node order.
    pub fn to_steps(&self) -> Vec<Step> {
        self.nodes
            .iter()
            .map(|node| Step {
                id: node.id.clone(),
                title: node.data.title.clone(),
                details: node.data.details.clone(),
            })
            .collect()
    }

    /// Node titles in presentation order.
    pub fn labels(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.data.title.as_str()).collect()
    }

    pub fn node(&self, id: &str) -> Option<&FlowNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    fn has_node(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }

    /// Node ids that occur more than once, in first-seen order.
    pub fn duplicate_ids(&self) -> Vec<String> {
        duplicates(self.nodes.iter().map(|n| n.id.as_str()))
    }

    /// Human-readable warnings about ambiguous structure.
    pub fn warnings(&self) -> Vec<String> {
        self.duplicate_ids()
            .into_iter()
            .map(|id| format!("Duplicate step id {id}: edges touching it are ambiguous"))
            .collect()
    }

    /// Verify the node limit and that every edge endpoint exists.
    pub fn check_integrity(&self) -> Result<(), FlowImportError> {
        if self.nodes.len() > MAX_STEPS_PER_FLOW {
            return Err(FlowImportError::TooManyNodes(self.nodes.len()));
        }
        for edge in &self.edges {
            for endpoint in [&edge.source, &edge.target] {
                if !self.has_node(endpoint) {
                    return Err(FlowImportError::DanglingEdge {
                        edge: edge.id.clone(),
                        node: endpoint.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Append a `"Step {n}"` node where `n` is one more than the largest
    /// numeric id (non-numeric ids are ignored). Returns the new node.
    pub fn add_node(&mut self) -> Result<&FlowNode, CoreError> {
        if self.nodes.len() >= MAX_STEPS_PER_FLOW {
            return Err(CoreError::Validation(format!(
                "flow already has the maximum of {MAX_STEPS_PER_FLOW} nodes"
            )));
        }

        let next = self
            .nodes
            .iter()
            .filter_map(|n| n.id.trim().parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;

        self.nodes.push(FlowNode {
            id: next.to_string(),
            node_type: STEP_NODE_TYPE.to_string(),
            position: row_position(self.nodes.len()),
            data: StepNodeData {
                title: format!("Step {next}"),
                details: Vec::new(),
                completed: false,
                context: None,
            },
        });

        Ok(&self.nodes[self.nodes.len() - 1])
    }

    /// Remove a node and every edge touching it. Returns `false` if no node
    /// had that id.
    pub fn delete_node(&mut self, id: &str) -> bool {
        let before = self.nodes.len();
        self.nodes.retain(|n| n.id != id);
        self.edges.retain(|e| e.source != id && e.target != id);
        self.nodes.len() != before
    }

    /// Replace a node's title and details. Details are the non-empty lines
    /// of `details_text`.
    pub fn update_node(&mut self, id: &str, title: &str, details_text: &str) -> bool {
        match self.nodes.iter_mut().find(|n| n.id == id) {
            Some(node) => {
                node.data.title = title.to_string();
                node.data.details = split_details(details_text);
                true
            }
            None => false,
        }
    }

    /// Flip a node's completion flag, returning the new value.
    pub fn toggle_completion(&mut self, id: &str) -> Option<bool> {
        let node = self.nodes.iter_mut().find(|n| n.id == id)?;
        node.data.completed = !node.data.completed;
        Some(node.data.completed)
    }

    /// Connect two existing nodes. Returns `Ok(false)` when the pair is
    /// already connected.
    pub fn connect(&mut self, source: &str, target: &str) -> Result<bool, CoreError> {
        for endpoint in [source, target] {
            if !self.has_node(endpoint) {
                return Err(CoreError::Validation(format!(
                    "cannot connect to missing node {endpoint}"
                )));
            }
        }
        if self
            .edges
            .iter()
            .any(|e| e.source == source && e.target == target)
        {
            return Ok(false);
        }
        self.edges.push(FlowEdge::between(source, target));
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

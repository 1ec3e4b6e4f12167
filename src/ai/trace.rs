//! Diagnostic record of an explored search tree.
//!
//! Nodes live in a single arena and refer to each other by [`NodeId`], so a
//! deep or wide trace is one flat allocation with no ownership cycles. The
//! trace is written by the search engine and never read back by it.

use serde::Serialize;
use serde_json::{json, Value};

use crate::game::{Board, Player};

/// Handle of a node inside a [`SearchTrace`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One explored position.
#[derive(Debug, Clone, Serialize)]
pub struct TraceNode {
    /// Column dropped to reach this node. `None` at the root.
    pub played: Option<usize>,
    /// Chance of this outcome when the parent's move is executed with noise.
    /// Only set under expectimax.
    pub probability: Option<f64>,
    /// Move chosen at this node once its children are resolved.
    pub best_move: Option<usize>,
    pub score: f64,
    /// Side to move at this node.
    pub player: Player,
    pub depth: u32,
    /// Board snapshot in the canonical text form.
    pub board: String,
    /// Explored children in exploration order. Pruned moves are absent.
    pub children: Vec<NodeId>,
    pub best_child: Option<NodeId>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchTrace {
    nodes: Vec<TraceNode>,
}

impl SearchTrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a node on entry, before its children are explored.
    pub(crate) fn open(&mut self, board: &Board, played: Option<usize>, depth: u32) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(TraceNode {
            played,
            probability: None,
            best_move: None,
            score: 0.0,
            player: board.current_player(),
            depth,
            board: board.to_string(),
            children: Vec::new(),
            best_child: None,
        });
        id
    }

    pub(crate) fn attach(&mut self, parent: NodeId, child: NodeId, probability: Option<f64>) {
        self.nodes[child.0].probability = probability;
        self.nodes[parent.0].children.push(child);
    }

    /// Fix a node's resolved move and score after all children are explored.
    pub(crate) fn resolve(
        &mut self,
        id: NodeId,
        best_move: Option<usize>,
        score: f64,
        best_child: Option<NodeId>,
    ) {
        let node = &mut self.nodes[id.0];
        node.best_move = best_move;
        node.score = score;
        node.best_child = best_child;
    }

    /// The first recorded node, which is the search root.
    pub fn root(&self) -> Option<NodeId> {
        if self.nodes.is_empty() {
            None
        } else {
            Some(NodeId(0))
        }
    }

    pub fn node(&self, id: NodeId) -> &TraceNode {
        &self.nodes[id.0]
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &TraceNode> + '_ {
        self.nodes[id.0].children.iter().map(|&child| self.node(child))
    }

    pub fn best_child(&self, id: NodeId) -> Option<&TraceNode> {
        self.nodes[id.0].best_child.map(|child| self.node(child))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Columns along the chain of best children starting at the root.
    pub fn principal_variation(&self) -> Vec<usize> {
        let mut line = Vec::new();
        let mut current = self.root();
        while let Some(id) = current {
            let node = self.node(id);
            current = node.best_child;
            if let Some(child) = current {
                if let Some(col) = self.node(child).played {
                    line.push(col);
                }
            }
        }
        line
    }

    /// Nested `{move, score, player, depth, board, children, best_child}`
    /// tree for visualizers. `best_child` is the index of the best child
    /// within `children`.
    pub fn to_nested_json(&self) -> Value {
        match self.root() {
            Some(root) => self.nested(root),
            None => Value::Null,
        }
    }

    fn nested(&self, id: NodeId) -> Value {
        let node = self.node(id);
        let children: Vec<Value> = node.children.iter().map(|&c| self.nested(c)).collect();
        let best_child = node
            .best_child
            .and_then(|best| node.children.iter().position(|&c| c == best));

        let mut value = json!({
            "move": node.played,
            "best_move": node.best_move,
            "score": node.score,
            "player": node.player.number(),
            "depth": node.depth,
            "board": node.board,
            "children": children,
            "best_child": best_child,
        });
        if let Some(p) = node.probability {
            value["probability"] = json!(p);
        }
        value
    }
}

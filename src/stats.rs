//! Occupancy statistics for a tree, gathered by walking every node.

use std::collections::HashMap;

use crate::node::{Node, NodeKind};

/// Aggregate figures for one inner-node layout.
#[derive(Debug, Default, Clone)]
pub struct NodeStats {
    pub width: usize,
    pub total_nodes: usize,
    pub total_children: usize,
    /// Mean child occupancy: `total_children / (width * total_nodes)`.
    pub density: f64,
}

/// A snapshot of the tree's physical shape.
#[derive(Debug, Default)]
pub struct TreeStats {
    pub node_stats: HashMap<NodeKind, NodeStats>,
    pub num_leaves: usize,
    pub num_inner_nodes: usize,
    pub total_density: f64,
    pub max_height: usize,
}

pub(crate) fn update_tree_stats<V>(stats: &mut TreeStats, node: &Node<V>) {
    stats
        .node_stats
        .entry(node.kind())
        .and_modify(|e| {
            e.total_nodes += 1;
            e.total_children += node.num_children();
        })
        .or_insert(NodeStats {
            width: node.capacity(),
            total_nodes: 1,
            total_children: node.num_children(),
            density: 0.0,
        });
}

pub(crate) fn finalize_tree_stats(stats: &mut TreeStats) {
    let mut total_children = 0;
    let mut total_width = 0;
    let mut total_inner = 0;
    for ns in stats.node_stats.values_mut() {
        total_inner += ns.total_nodes;
        total_children += ns.total_children;
        total_width += ns.width * ns.total_nodes;
        ns.density = ns.total_children as f64 / (ns.width * ns.total_nodes) as f64;
    }
    stats.num_inner_nodes = total_inner;
    if total_width > 0 {
        stats.total_density = total_children as f64 / total_width as f64;
    }
}

//! Tree → path mini-language (corridor network and solution route).
//!
//! Junctions (degree ≠ 2) delimit chains; every chain becomes one `M` run of
//! `L` (ring change) and `A` (same ring) segments. Tree edges are keyed by
//! their child node, so "edge emitted" is one flag per node.

use std::fmt::Write;

use crate::geom2::{fmt_mm, normalize_angle};

use super::types::{Node, NodeId, PolarGraph};

/// Undirected adjacency of the parent edges, in arena order.
struct Adjacency {
    adj: Vec<Vec<NodeId>>,
}

impl Adjacency {
    fn from_tree(graph: &PolarGraph) -> Self {
        let mut adj = vec![Vec::new(); graph.nodes.len()];
        for n in &graph.nodes {
            if let Some(p) = n.parent {
                adj[p.0].push(n.id);
                adj[n.id.0].push(p);
            }
        }
        Self { adj }
    }

    #[inline]
    fn degree(&self, id: NodeId) -> usize {
        self.adj[id.0].len()
    }

    #[inline]
    fn is_junction(&self, id: NodeId) -> bool {
        self.degree(id) != 2
    }
}

/// Tree edge `{a, b}` identified by its child endpoint.
#[inline]
fn edge_key(graph: &PolarGraph, a: NodeId, b: NodeId) -> NodeId {
    if graph.node(a).parent == Some(b) {
        a
    } else {
        b
    }
}

fn write_move(out: &mut String, n: &Node) {
    if !out.is_empty() {
        out.push(' ');
    }
    let _ = write!(out, "M {} {}", fmt_mm(n.x), fmt_mm(n.y));
}

/// Line across rings, circular arc along a ring.
fn write_segment(out: &mut String, graph: &PolarGraph, from: &Node, to: &Node) {
    if from.ring != to.ring {
        let _ = write!(out, " L {} {}", fmt_mm(to.x), fmt_mm(to.y));
        return;
    }
    let r = fmt_mm(graph.ring_radius(to.ring));
    let sweep = u8::from(normalize_angle(to.theta - from.theta) > 0.0);
    let _ = write!(
        out,
        " A {r} {r} 0 0 {sweep} {} {}",
        fmt_mm(to.x),
        fmt_mm(to.y)
    );
}

/// Node degrees in the spanning tree (index = arena id).
pub fn tree_degrees(graph: &PolarGraph) -> Vec<usize> {
    let adj = Adjacency::from_tree(graph);
    (0..graph.nodes.len()).map(|i| adj.degree(NodeId(i))).collect()
}

/// Corridor description: one sub-path per junction-to-junction chain.
pub fn corridor_path(graph: &PolarGraph) -> String {
    let adj = Adjacency::from_tree(graph);
    let mut emitted = vec![false; graph.nodes.len()];
    let mut out = String::new();

    for start in graph.nodes.iter().map(|n| n.id) {
        if !adj.is_junction(start) {
            continue;
        }
        for &first in &adj.adj[start.0] {
            if emitted[edge_key(graph, start, first).0] {
                continue;
            }
            write_move(&mut out, graph.node(start));
            let (mut prev, mut cur) = (start, first);
            loop {
                emitted[edge_key(graph, prev, cur).0] = true;
                write_segment(&mut out, graph, graph.node(prev), graph.node(cur));
                if adj.is_junction(cur) {
                    break;
                }
                let next = adj.adj[cur.0]
                    .iter()
                    .copied()
                    .find(|&n| n != prev)
                    .unwrap_or(prev);
                prev = cur;
                cur = next;
            }
        }
    }
    out
}

/// Route from `entry` down the parent chain to the root.
pub fn solution_path(graph: &PolarGraph, entry: NodeId) -> String {
    let mut out = String::new();
    let mut cur = graph.node(entry);
    write_move(&mut out, cur);
    while let Some(pid) = cur.parent {
        let parent = graph.node(pid);
        write_segment(&mut out, graph, cur, parent);
        cur = parent;
    }
    out
}

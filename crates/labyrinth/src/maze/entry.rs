//! Entry selection (hardest outer-ring node) and the re-orientation transform.

use std::f64::consts::FRAC_PI_2;

use nalgebra::{Rotation2, Vector2};

use crate::geom2::normalize_angle;

use super::types::{ChainStats, Direction, NodeId, PolarGraph};

/// Walk from `start` to the root, accumulating length, reversals and rotation.
pub fn chain_stats(graph: &PolarGraph, start: NodeId) -> ChainStats {
    let mut stats = ChainStats {
        node: start,
        ..ChainStats::default()
    };
    let mut last_radial: Option<Direction> = None;
    let mut cur = graph.node(start);
    while let Some(pid) = cur.parent {
        let parent = graph.node(pid);
        stats.length += 1;
        match Direction::classify(cur.ring, parent.ring) {
            Direction::Side => {}
            dir => {
                if last_radial.is_some_and(|prev| prev != dir) {
                    stats.inflections += 1;
                }
                last_radial = Some(dir);
            }
        }
        stats.rotation += normalize_angle(parent.theta - cur.theta).abs();
        cur = parent;
    }
    stats
}

/// Highest-scoring outer-ring node; the first one wins ties.
pub fn select_entry(graph: &PolarGraph) -> ChainStats {
    let mut best: Option<ChainStats> = None;
    for &id in graph.outer_ring() {
        let s = chain_stats(graph, id);
        if best.map_or(true, |b| s.score() > b.score()) {
            best = Some(s);
        }
    }
    // The outer ring always holds at least one cell.
    best.unwrap_or_default()
}

/// Longest leaf-to-root chain (by edge count, first wins ties).
pub fn longest_leaf_chain(graph: &PolarGraph) -> ChainStats {
    let mut degree = vec![0usize; graph.nodes.len()];
    for n in &graph.nodes {
        if let Some(p) = n.parent {
            degree[n.id.0] += 1;
            degree[p.0] += 1;
        }
    }
    let mut best: Option<ChainStats> = None;
    for n in graph.nodes.iter().filter(|n| degree[n.id.0] == 1) {
        let s = chain_stats(graph, n.id);
        if best.map_or(true, |b| s.length > b.length) {
            best = Some(s);
        }
    }
    best.unwrap_or_default()
}

/// Rotate every non-root node so `entry` lands at θ = −π/2.
///
/// Returns the applied rotation angle. Tree structure is untouched.
pub fn rotate_to_entry(graph: &mut PolarGraph, entry: NodeId) -> f64 {
    let angle = -FRAC_PI_2 - graph.node(entry).theta;
    let rot = Rotation2::new(angle);
    for node in graph.nodes.iter_mut().filter(|n| n.ring > 0) {
        let p = rot * Vector2::new(node.x, node.y);
        node.x = p.x;
        node.y = p.y;
        node.theta = normalize_angle(node.theta + angle);
    }
    angle
}

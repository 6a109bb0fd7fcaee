//! Growing-tree spanning tree with inertia and inward bias.

use crate::rng::MazeRng;

use super::types::{Direction, NodeId, PolarGraph};

/// Weights derived from the difficulty level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GrowParams {
    pub difficulty: u8,
    /// Chance of resuming from a random frontier node instead of the newest.
    pub branch_prob: f64,
    /// Bonus for keeping the direction class the current node was entered by.
    pub inertia: f64,
    pub inward_bonus: f64,
}

impl GrowParams {
    pub const TURN_PENALTY: f64 = 50.0;
    pub const OUTWARD_PENALTY: f64 = 40.0;
    pub const JITTER: f64 = 50.0;
    pub const BASE_WEIGHT: f64 = 100.0;

    pub fn from_difficulty(difficulty: u8) -> Self {
        let d = f64::from(difficulty);
        Self {
            difficulty,
            branch_prob: 0.02 + 0.08 * d,
            inertia: 500.0 - 60.0 * d,
            inward_bonus: 1200.0,
        }
    }

    /// Deterministic part of a candidate's weight (no jitter, no clamp).
    #[inline]
    pub fn base_weight(&self, entered_by: Option<Direction>, dir: Direction) -> f64 {
        let mut w = Self::BASE_WEIGHT;
        if entered_by == Some(dir) {
            w += self.inertia;
        } else {
            w -= Self::TURN_PENALTY;
        }
        if dir == Direction::In {
            w += self.inward_bonus;
        }
        if self.difficulty > 3 && dir == Direction::Out {
            w -= Self::OUTWARD_PENALTY;
        }
        w
    }
}

/// Grow a spanning tree from the root; returns the entry direction per node.
///
/// Every node ends up visited: rings are closed cycles and each ring is
/// reachable from the previous one, so the frontier only empties once the
/// whole graph is covered.
pub fn grow_tree(graph: &mut PolarGraph, params: GrowParams, rng: &mut MazeRng) -> Vec<Option<Direction>> {
    let mut entered_by: Vec<Option<Direction>> = vec![None; graph.nodes.len()];
    let root = PolarGraph::ROOT;
    graph.nodes[root.0].visited = true;
    let mut active: Vec<NodeId> = vec![root];

    while !active.is_empty() {
        let idx = if rng.next_f64() < params.branch_prob {
            ((rng.next_f64() * active.len() as f64) as usize).min(active.len() - 1)
        } else {
            active.len() - 1
        };
        let current = active[idx];
        let cur_ring = graph.node(current).ring;

        let mut best: Option<(NodeId, Direction, f64)> = None;
        for cand in graph.neighbors(current) {
            if graph.node(cand).visited {
                continue;
            }
            let dir = Direction::classify(cur_ring, graph.node(cand).ring);
            let jitter = rng.next_f64() * GrowParams::JITTER;
            let w = (params.base_weight(entered_by[current.0], dir) + jitter).max(1.0);
            // Strict `>`: the first candidate in discovery order keeps ties.
            if best.map_or(true, |(_, _, bw)| w > bw) {
                best = Some((cand, dir, w));
            }
        }

        match best {
            None => {
                active.remove(idx);
            }
            Some((next, dir, _)) => {
                let node = &mut graph.nodes[next.0];
                debug_assert!(node.parent.is_none());
                node.visited = true;
                node.parent = Some(current);
                entered_by[next.0] = Some(dir);
                active.push(next);
            }
        }
    }
    entered_by
}

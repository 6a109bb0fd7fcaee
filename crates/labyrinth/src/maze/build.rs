//! Polar graph construction (rings, cells, neighbour relation).

use std::f64::consts::TAU;

use crate::error::MazeError;

use super::types::{MazeConfig, Node, NodeId, PolarGraph};

/// Build concentric rings from the physical config.
///
/// Fails before allocating any node when the config cannot hold one ring.
pub fn build_graph(cfg: &MazeConfig) -> Result<PolarGraph, MazeError> {
    cfg.validate()?;
    let step = cfg.step();
    let num_rings = cfg.num_rings();

    let mut nodes = vec![Node {
        id: PolarGraph::ROOT,
        ring: 0,
        cell: 0,
        theta: 0.0,
        x: 0.0,
        y: 0.0,
        visited: false,
        parent: None,
    }];
    let mut rings = vec![vec![PolarGraph::ROOT]];
    for r in 1..=num_rings {
        let ring_radius = r as f64 * step;
        let cells = ((TAU * ring_radius / step).round() as usize).max(1);
        let mut ids = Vec::with_capacity(cells);
        for c in 0..cells {
            let theta = c as f64 * TAU / cells as f64;
            let id = NodeId(nodes.len());
            nodes.push(Node {
                id,
                ring: r,
                cell: c,
                theta,
                x: ring_radius * theta.cos(),
                y: ring_radius * theta.sin(),
                visited: false,
                parent: None,
            });
            ids.push(id);
        }
        rings.push(ids);
    }
    Ok(PolarGraph { nodes, rings, step })
}

/// `round(index · to / from) mod to`, the ring-to-ring index mapping.
#[inline]
fn map_index(index: usize, from: usize, to: usize) -> usize {
    ((index as f64 * to as f64 / from as f64).round() as usize) % to
}

impl PolarGraph {
    /// Node one ring further in (the root for ring 1). Not symmetric with `outward`.
    pub fn inward(&self, id: NodeId) -> Option<NodeId> {
        let n = self.node(id);
        if n.ring == 0 {
            return None;
        }
        let inner = &self.rings[n.ring - 1];
        let here = self.rings[n.ring].len();
        Some(inner[map_index(n.cell, here, inner.len())])
    }

    /// Node one ring further out, if any.
    pub fn outward(&self, id: NodeId) -> Option<NodeId> {
        let n = self.node(id);
        if n.ring >= self.num_rings() {
            return None;
        }
        let outer = &self.rings[n.ring + 1];
        let here = self.rings[n.ring].len();
        Some(outer[map_index(n.cell, here, outer.len())])
    }

    /// Neighbours in discovery order: clockwise, counter-clockwise, inward, outward.
    ///
    /// Self-loops and duplicates (rings of one or two cells) are dropped.
    pub fn neighbors(&self, id: NodeId) -> Vec<NodeId> {
        let n = self.node(id);
        let mut out: Vec<NodeId> = Vec::with_capacity(4);
        let mut push = |cand: NodeId| {
            if cand != id && !out.contains(&cand) {
                out.push(cand);
            }
        };
        if n.ring > 0 {
            let ring = &self.rings[n.ring];
            let count = ring.len();
            push(ring[(n.cell + 1) % count]);
            push(ring[(n.cell + count - 1) % count]);
        }
        if let Some(inner) = self.inward(id) {
            push(inner);
        }
        if let Some(outer) = self.outward(id) {
            push(outer);
        }
        out
    }
}

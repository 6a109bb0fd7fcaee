//! Polar maze generation: graph, growing tree, entry selection, stitching.
//!
//! Purpose
//! - Turn a `MazeConfig` into an immutable `MazeModel`: corridor and solution
//!   paths in the path mini-language plus the node arena for introspection.
//!
//! Why this design
//! - Nodes live in one flat arena; parents are `NodeId` indices, so the tree
//!   has no ownership cycles and serializes as-is.
//! - Randomness is an explicit `MazeRng` value owned by the call; nothing is
//!   global, so concurrent runs cannot interfere.
//! - Tie-breaks follow neighbour discovery order, never a sort.
//!
//! Layout
//! - `types.rs` (data), `build.rs` (rings + neighbours), `grow.rs` (tree),
//!   `entry.rs` (scoring + rotation), `stitch.rs` (path strings).

mod build;
mod entry;
mod grow;
mod stitch;
mod types;

pub use build::build_graph;
pub use entry::{chain_stats, longest_leaf_chain, rotate_to_entry, select_entry};
pub use grow::{grow_tree, GrowParams};
pub use stitch::{corridor_path, solution_path, tree_degrees};
pub use types::{
    ChainStats, Direction, MazeConfig, MazeModel, MazeStats, Node, NodeId, Point, PolarGraph,
};

use crate::error::MazeError;
use crate::rng::MazeRng;

/// Build, grow, orient and stitch one maze.
pub fn generate(cfg: &MazeConfig) -> Result<MazeModel, MazeError> {
    let mut graph = build_graph(cfg)?;
    let mut rng = MazeRng::new(cfg.seed);
    let params = GrowParams::from_difficulty(cfg.difficulty);
    grow_tree(&mut graph, params, &mut rng);

    let entry = select_entry(&graph);
    let longest = longest_leaf_chain(&graph);
    rotate_to_entry(&mut graph, entry.node);

    let corridor = corridor_path(&graph);
    let solution = solution_path(&graph, entry.node);
    let start = graph.node(entry.node).pos();

    let stats = MazeStats {
        rings: graph.num_rings(),
        nodes: graph.nodes.len(),
        cells_per_ring: graph.rings.iter().skip(1).map(Vec::len).collect(),
        entry,
        entry_score: entry.score(),
        longest_chain: longest,
    };
    tracing::debug!(
        seed = cfg.seed,
        difficulty = cfg.difficulty,
        rings = stats.rings,
        nodes = stats.nodes,
        rng_draws = rng.draws(),
        entry = entry.node.0,
        entry_score = stats.entry_score,
        "maze generated"
    );

    Ok(MazeModel {
        config: cfg.clone(),
        corridor_path: corridor,
        solution_path: solution,
        start_point: start.into(),
        end_point: Point::default(),
        entry: entry.node,
        nodes: graph.nodes,
        stats,
    })
}

#[cfg(test)]
mod tests;

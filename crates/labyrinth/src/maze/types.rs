//! Data types for the polar graph, the spanning tree and the generated model.
//!
//! Kept small and explicit so `build`, `grow`, `entry` and `stitch` read as
//! plain transformations over one flat node arena.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::error::MazeError;

/// Physical and behavioural knobs of one generation run (millimetres).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MazeConfig {
    pub diameter: f64,
    pub wall_width: f64,
    pub corridor_width: f64,
    /// 1 (easy) ..= 5 (hard).
    pub difficulty: u8,
    pub corner_rounding: bool,
    pub seed: u64,
    pub hole_radius: f64,
    pub show_entry_wedge: bool,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            diameter: 290.0,
            wall_width: 11.0,
            corridor_width: 14.0,
            difficulty: 5,
            corner_rounding: true,
            seed: 38763,
            hole_radius: 12.0,
            show_entry_wedge: false,
        }
    }
}

impl MazeConfig {
    /// Distance between adjacent rings.
    #[inline]
    pub fn step(&self) -> f64 {
        self.corridor_width + self.wall_width
    }

    /// Outer radius of the disc.
    #[inline]
    pub fn radius(&self) -> f64 {
        self.diameter / 2.0
    }

    /// Radius available for ring centrelines.
    #[inline]
    pub fn usable_radius(&self) -> f64 {
        self.radius() - self.wall_width - self.corridor_width / 2.0
    }

    /// Number of rings outside the root; `floor(usable / step)`.
    pub fn num_rings(&self) -> usize {
        let n = (self.usable_radius() / self.step()).floor();
        if n.is_finite() && n > 0.0 {
            n as usize
        } else {
            0
        }
    }

    /// Reject inputs that cannot produce a maze.
    pub fn validate(&self) -> Result<(), MazeError> {
        let finite = [
            ("diameter", self.diameter),
            ("wallWidth", self.wall_width),
            ("corridorWidth", self.corridor_width),
            ("holeRadius", self.hole_radius),
        ];
        for (name, v) in finite {
            if !v.is_finite() {
                return Err(MazeError::invalid(format!("{name} must be finite")));
            }
        }
        if self.diameter <= 0.0 {
            return Err(MazeError::invalid("diameter must be > 0"));
        }
        if self.wall_width < 0.0 {
            return Err(MazeError::invalid("wallWidth must be >= 0"));
        }
        if self.corridor_width <= 0.0 {
            return Err(MazeError::invalid("corridorWidth must be > 0"));
        }
        if self.hole_radius <= 0.0 {
            return Err(MazeError::invalid("holeRadius must be > 0"));
        }
        if !(1..=5).contains(&self.difficulty) {
            return Err(MazeError::invalid(format!(
                "difficulty must be in 1..=5, got {}",
                self.difficulty
            )));
        }
        if self.usable_radius() <= 0.0 {
            return Err(MazeError::invalid(format!(
                "usable radius {:.3} mm is not positive",
                self.usable_radius()
            )));
        }
        if self.num_rings() < 1 {
            return Err(MazeError::invalid(format!(
                "usable radius {:.3} mm fits no ring of step {:.3} mm",
                self.usable_radius(),
                self.step()
            )));
        }
        Ok(())
    }
}

/// Index into the node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

/// Direction class of a move between two nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    In,
    Out,
    Side,
}

impl Direction {
    #[inline]
    pub fn classify(from_ring: usize, to_ring: usize) -> Self {
        use std::cmp::Ordering::*;
        match to_ring.cmp(&from_ring) {
            Less => Direction::In,
            Greater => Direction::Out,
            Equal => Direction::Side,
        }
    }
}

/// Polar grid cell; `parent` is set at most once during growth.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub ring: usize,
    /// Cell index, unique only within `ring`.
    pub cell: usize,
    /// Angle in (−π, π] once the entry rotation ran; `c·2π/cells` before.
    pub theta: f64,
    pub x: f64,
    pub y: f64,
    pub visited: bool,
    pub parent: Option<NodeId>,
}

impl Node {
    #[inline]
    pub fn pos(&self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }
}

/// Concentric rings over a flat arena. Ring 0 holds only the root.
#[derive(Clone, Debug)]
pub struct PolarGraph {
    pub nodes: Vec<Node>,
    /// `rings[r]` lists the ids of ring `r` in cell order.
    pub rings: Vec<Vec<NodeId>>,
    pub step: f64,
}

impl PolarGraph {
    pub const ROOT: NodeId = NodeId(0);

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Rings outside the root.
    #[inline]
    pub fn num_rings(&self) -> usize {
        self.rings.len() - 1
    }

    #[inline]
    pub fn ring_radius(&self, ring: usize) -> f64 {
        ring as f64 * self.step
    }

    pub fn outer_ring(&self) -> &[NodeId] {
        &self.rings[self.num_rings()]
    }

    pub fn visited_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.visited).count()
    }
}

/// Plain `{x, y}` point in millimetres.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl From<Vector2<f64>> for Point {
    fn from(v: Vector2<f64>) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl From<Point> for Vector2<f64> {
    fn from(p: Point) -> Self {
        Vector2::new(p.x, p.y)
    }
}

/// Walk statistics of one node-to-root chain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChainStats {
    pub node: NodeId,
    /// Edge count to the root.
    pub length: usize,
    /// IN↔OUT reversals; sideways steps are transparent.
    pub inflections: usize,
    /// Σ|Δθ| with each Δθ normalized into (−π, π].
    pub rotation: f64,
}

impl ChainStats {
    /// Entry difficulty score: `length + 200·inflections + 10·rotation`.
    #[inline]
    pub fn score(&self) -> f64 {
        self.length as f64 + 200.0 * self.inflections as f64 + 10.0 * self.rotation
    }
}

impl Default for NodeId {
    fn default() -> Self {
        PolarGraph::ROOT
    }
}

/// Summary numbers carried with every model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MazeStats {
    pub rings: usize,
    pub nodes: usize,
    pub cells_per_ring: Vec<usize>,
    pub entry: ChainStats,
    pub entry_score: f64,
    pub longest_chain: ChainStats,
}

/// Immutable result of one `generate` call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MazeModel {
    pub config: MazeConfig,
    pub corridor_path: String,
    pub solution_path: String,
    pub start_point: Point,
    pub end_point: Point,
    pub entry: NodeId,
    pub nodes: Vec<Node>,
    pub stats: MazeStats,
}

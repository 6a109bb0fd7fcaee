use super::*;
use crate::geom2::{parse_path, to_fixed, GeomCfg, IPoint};
use proptest::prelude::*;
use std::f64::consts::{FRAC_PI_2, TAU};

fn scenario() -> MazeConfig {
    MazeConfig::default()
}

fn degrees(nodes: &[Node]) -> Vec<usize> {
    let mut deg = vec![0usize; nodes.len()];
    for n in nodes {
        if let Some(p) = n.parent {
            deg[n.id.0] += 1;
            deg[p.0] += 1;
        }
    }
    deg
}

#[test]
fn scenario_rings_and_cells() {
    let cfg = scenario();
    assert_eq!(cfg.step(), 25.0);
    assert_eq!(cfg.usable_radius(), 127.0);
    let g = build_graph(&cfg).unwrap();
    assert_eq!(g.num_rings(), 5);
    for r in 1..=5 {
        let expected = (TAU * r as f64).round() as usize;
        assert_eq!(g.rings[r].len(), expected, "ring {r}");
    }
    assert_eq!(g.nodes.len(), 1 + 6 + 13 + 19 + 25 + 31);
    // Cell angles are evenly spaced from zero.
    let ring2 = &g.rings[2];
    assert_eq!(g.node(ring2[0]).theta, 0.0);
    assert!((g.node(ring2[1]).theta - TAU / 13.0).abs() < 1e-12);
}

#[test]
fn neighbour_discovery_order() {
    let g = build_graph(&scenario()).unwrap();
    // Arena: root 0, ring 1 = 1..=6, ring 2 = 7..=19, ring 3 = 20..=38.
    assert_eq!(g.neighbors(PolarGraph::ROOT), vec![NodeId(1)]);
    assert_eq!(
        g.neighbors(NodeId(7)),
        vec![NodeId(8), NodeId(19), NodeId(1), NodeId(20)]
    );
    assert_eq!(
        g.neighbors(NodeId(1)),
        vec![NodeId(2), NodeId(6), PolarGraph::ROOT, NodeId(7)]
    );
    // Outer ring has no outward neighbour.
    let last = *g.outer_ring().last().unwrap();
    assert_eq!(g.outward(last), None);
    assert_eq!(g.neighbors(last).len(), 3);
}

#[test]
fn ring_mapping_is_not_symmetric() {
    let g = build_graph(&scenario()).unwrap();
    let ring2_cell1 = g.rings[2][1];
    let ring1_cell0 = g.rings[1][0];
    assert_eq!(g.inward(ring2_cell1), Some(ring1_cell0));
    assert_eq!(g.outward(ring1_cell0), Some(g.rings[2][0]));
    assert!(g.neighbors(ring2_cell1).contains(&ring1_cell0));
    assert!(!g.neighbors(ring1_cell0).contains(&ring2_cell1));
}

#[test]
fn invalid_configs_are_rejected() {
    let base = scenario();
    let cases = [
        MazeConfig { diameter: 0.0, ..base.clone() },
        MazeConfig { diameter: -10.0, ..base.clone() },
        MazeConfig { diameter: f64::NAN, ..base.clone() },
        MazeConfig { wall_width: -1.0, ..base.clone() },
        MazeConfig { corridor_width: 0.0, ..base.clone() },
        MazeConfig { hole_radius: 0.0, ..base.clone() },
        MazeConfig { difficulty: 0, ..base.clone() },
        MazeConfig { difficulty: 6, ..base.clone() },
        // usable radius 12 mm < one 25 mm step
        MazeConfig { diameter: 60.0, ..base.clone() },
        // usable radius negative
        MazeConfig { diameter: 20.0, ..base.clone() },
    ];
    for cfg in cases {
        let err = generate(&cfg).unwrap_err();
        assert!(
            matches!(err, MazeError::InvalidConfiguration { .. }),
            "{cfg:?}"
        );
        assert!(build_graph(&cfg).is_err());
    }
}

#[test]
fn grow_params_follow_difficulty() {
    let easy = GrowParams::from_difficulty(1);
    assert!((easy.branch_prob - 0.10).abs() < 1e-12);
    assert_eq!(easy.inertia, 440.0);
    let hard = GrowParams::from_difficulty(5);
    assert!((hard.branch_prob - 0.42).abs() < 1e-12);
    assert_eq!(hard.inertia, 200.0);
    assert_eq!(hard.inward_bonus, 1200.0);

    assert_eq!(hard.base_weight(Some(Direction::In), Direction::In), 1500.0);
    assert_eq!(hard.base_weight(Some(Direction::Side), Direction::Out), 10.0);
    assert_eq!(hard.base_weight(None, Direction::Side), 50.0);
    let mid = GrowParams::from_difficulty(3);
    assert_eq!(mid.base_weight(Some(Direction::Side), Direction::Out), 50.0);
}

#[test]
fn chain_stats_counts_reversals_through_side_steps() {
    let mut g = build_graph(&scenario()).unwrap();
    let r1 = g.rings[1].clone();
    let r2 = g.rings[2].clone();
    // r2[0] -in-> r1[0] -side-> r1[1] -out-> r2[2] -in-> r1[2] -in-> root
    let links = [
        (r2[0], r1[0]),
        (r1[0], r1[1]),
        (r1[1], r2[2]),
        (r2[2], r1[2]),
        (r1[2], PolarGraph::ROOT),
    ];
    for (child, parent) in links {
        g.nodes[child.0].parent = Some(parent);
    }
    let s = chain_stats(&g, r2[0]);
    assert_eq!(s.length, 5);
    assert_eq!(s.inflections, 2);
    let step13: f64 = 360.0 / 13.0;
    let expected_deg = 60.0 + (60.0 - 2.0 * step13).abs() + (120.0 - 2.0 * step13) + 120.0;
    assert!((s.rotation - expected_deg.to_radians()).abs() < 1e-9);
    assert!((s.score() - (5.0 + 400.0 + 10.0 * s.rotation)).abs() < 1e-9);
}

#[test]
fn rotation_is_a_pure_transform() {
    let mut g = build_graph(&scenario()).unwrap();
    let entry = g.rings[5][7];
    let before: Vec<f64> = g.nodes.iter().map(|n| n.pos().norm()).collect();
    let angle = rotate_to_entry(&mut g, entry);
    assert!((angle - (-FRAC_PI_2 - 7.0 * TAU / 31.0)).abs() < 1e-12);
    assert!((g.node(entry).theta + FRAC_PI_2).abs() < 1e-9);
    for (n, r) in g.nodes.iter().zip(before) {
        assert!((n.pos().norm() - r).abs() < 1e-9);
        assert!(n.theta > -std::f64::consts::PI && n.theta <= std::f64::consts::PI);
    }
    assert_eq!(g.node(PolarGraph::ROOT).pos(), nalgebra::Vector2::zeros());
}

#[test]
fn scenario_model() {
    let model = generate(&scenario()).unwrap();
    assert_eq!(model.stats.rings, 5);
    assert_eq!(model.stats.nodes, 95);
    assert_eq!(model.stats.cells_per_ring, vec![6, 13, 19, 25, 31]);
    assert_eq!(model.stats.entry.node, model.entry);
    assert_eq!(model.end_point, Point::default());

    let entry = &model.nodes[model.entry.0];
    assert_eq!(entry.ring, 5);
    assert!((entry.theta + FRAC_PI_2).abs() < 1e-6);
    assert!(model.start_point.x.abs() < 1e-6);
    assert!((model.start_point.y + 125.0).abs() < 1e-6);
    assert!(model.corridor_path.starts_with("M "));
    assert!(model.solution_path.starts_with("M "));
}

#[test]
fn generation_is_deterministic() {
    let a = generate(&scenario()).unwrap();
    let b = generate(&scenario()).unwrap();
    assert_eq!(a, b);
    let other = generate(&MazeConfig {
        seed: 1,
        ..scenario()
    })
    .unwrap();
    assert_ne!(a.corridor_path, other.corridor_path);
}

#[test]
fn corridor_path_round_trips_junction_degrees() {
    let model = generate(&scenario()).unwrap();
    let paths = parse_path(&model.corridor_path, &GeomCfg::default()).unwrap();
    let deg = degrees(&model.nodes);
    let fixed: Vec<IPoint> = model.nodes.iter().map(|n| to_fixed(n.pos())).collect();
    let find = |p: IPoint| -> usize {
        fixed
            .iter()
            .position(|q| (q.x - p.x).abs() <= 5 && (q.y - p.y).abs() <= 5)
            .expect("sub-path endpoint is not a node")
    };

    let mut ends = vec![0usize; model.nodes.len()];
    for c in &paths {
        assert!(!c.closed);
        ends[find(c.first().unwrap())] += 1;
        ends[find(c.last().unwrap())] += 1;
    }
    for (i, d) in deg.iter().enumerate() {
        let expected = if *d == 2 { 0 } else { *d };
        assert_eq!(ends[i], expected, "node {i} has degree {d}");
    }
}

#[test]
fn solution_path_runs_entry_to_root() {
    let model = generate(&scenario()).unwrap();
    let paths = parse_path(&model.solution_path, &GeomCfg::default()).unwrap();
    assert_eq!(paths.len(), 1);
    let start = paths[0].first().unwrap();
    let end = paths[0].last().unwrap();
    assert_eq!(start, to_fixed(model.start_point.into()));
    assert_eq!(end, IPoint::new(0, 0));
}

#[test]
fn longest_chain_starts_at_a_leaf() {
    let model = generate(&scenario()).unwrap();
    let deg = degrees(&model.nodes);
    let longest = model.stats.longest_chain;
    assert_eq!(deg[longest.node.0], 1);
    for (i, d) in deg.iter().enumerate() {
        if *d == 1 {
            let mut len = 0;
            let mut cur = NodeId(i);
            while let Some(p) = model.nodes[cur.0].parent {
                cur = p;
                len += 1;
            }
            assert!(len <= longest.length);
        }
    }
}

/// Reversals per edge along the longest leaf chain, summed over seeds.
fn reversal_density(difficulty: u8) -> f64 {
    let (mut inflections, mut length) = (0usize, 0usize);
    for seed in 1..=24 {
        let cfg = MazeConfig {
            diameter: 400.0,
            wall_width: 5.0,
            corridor_width: 8.0,
            difficulty,
            seed,
            ..scenario()
        };
        let chain = generate(&cfg).unwrap().stats.longest_chain;
        inflections += chain.inflections;
        length += chain.length;
    }
    inflections as f64 / length as f64
}

#[test]
fn harder_mazes_reverse_more_often() {
    let easy = reversal_density(1);
    let hard = reversal_density(5);
    assert!(hard > easy, "density d=5 {hard} <= d=1 {easy}");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn spanning_tree_invariants(
        seed in any::<u64>(),
        difficulty in 1u8..=5,
        diameter in 90.0f64..400.0,
    ) {
        let cfg = MazeConfig { diameter, difficulty, seed, ..scenario() };
        let model = generate(&cfg).unwrap();
        let graph = build_graph(&cfg).unwrap();
        let n = model.nodes.len();
        prop_assert_eq!(n, graph.nodes.len());

        let edges = model.nodes.iter().filter(|x| x.parent.is_some()).count();
        prop_assert_eq!(edges, n - 1);
        prop_assert!(model.nodes[0].parent.is_none());
        prop_assert!(model.nodes.iter().all(|x| x.visited));

        for node in &model.nodes[1..] {
            let parent = node.parent.unwrap();
            prop_assert!(graph.neighbors(parent).contains(&node.id));
            // Every chain reaches the root without revisiting.
            let mut cur = node.id;
            let mut steps = 0;
            while let Some(p) = model.nodes[cur.0].parent {
                cur = p;
                steps += 1;
                prop_assert!(steps < n);
            }
            prop_assert_eq!(cur, PolarGraph::ROOT);
        }
    }

    #[test]
    fn same_seed_same_model(seed in any::<u64>(), difficulty in 1u8..=5) {
        let cfg = MazeConfig { difficulty, seed, ..scenario() };
        prop_assert_eq!(generate(&cfg).unwrap(), generate(&cfg).unwrap());
    }
}

//! Reversal statistics across difficulty levels.
//!
//! Purpose
//! - Show how the difficulty knob shapes the tree: for each level, generate
//!   a batch of seeds and report the longest leaf-to-root chain (length,
//!   IN/OUT reversals, reversals per edge) and the chosen entry's score.
//!
//! Usage
//! - `cargo run --example difficulty_sweep -- [diameter] [seeds]`

use labyrinth::maze::{generate, MazeConfig};

fn main() {
    let mut args = std::env::args().skip(1);
    let diameter: f64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(400.0);
    let seeds: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(24);

    println!("diameter={diameter} seeds=1..={seeds}");
    println!("d  mean_len  mean_rev  rev/edge  mean_entry_score");
    for difficulty in 1..=5u8 {
        let (mut len, mut rev, mut score) = (0usize, 0usize, 0.0f64);
        for seed in 1..=seeds {
            let cfg = MazeConfig {
                diameter,
                wall_width: 5.0,
                corridor_width: 8.0,
                difficulty,
                seed,
                ..Default::default()
            };
            let model = generate(&cfg).expect("valid sweep config");
            len += model.stats.longest_chain.length;
            rev += model.stats.longest_chain.inflections;
            score += model.stats.entry_score;
        }
        let n = seeds as f64;
        println!(
            "{difficulty}  {:8.1}  {:8.2}  {:8.4}  {:16.1}",
            len as f64 / n,
            rev as f64 / n,
            rev as f64 / len.max(1) as f64,
            score / n
        );
    }
}

use std::collections::BTreeMap;

use anyhow::{bail, ensure, Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rbtree_engine::{OrderedTree, TreeConfig, TreeStats};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "rbtree", about = "Arena-backed red-black tree engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a tree from a key list and print it.
    Build {
        /// Keys to insert, in order (comma separated).
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
        keys: Vec<i64>,
        /// Keep duplicate keys (multiset).
        #[arg(long)]
        multi: bool,
        /// Keys to erase after building (comma separated).
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
        erase: Vec<i64>,
        /// Insert every key with an end-of-tree hint.
        #[arg(long)]
        hint_last: bool,
        /// Print the tree level by level with colors.
        #[arg(long)]
        show_shape: bool,
    },
    /// Run a seeded random insert/erase workload, checking invariants after each step.
    Stress {
        /// Number of operations.
        #[arg(long, default_value_t = 10_000)]
        ops: usize,
        /// RNG seed.
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Keys are drawn from 0..key_range.
        #[arg(long, default_value_t = 1_000)]
        key_range: i64,
        /// Keep duplicate keys (multiset).
        #[arg(long)]
        multi: bool,
        /// Probability that an operation is an erase.
        #[arg(long, default_value_t = 0.4)]
        erase_ratio: f64,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            keys,
            multi,
            erase,
            hint_last,
            show_shape,
        } => run_build(&keys, multi, &erase, hint_last, show_shape)?,
        Commands::Stress {
            ops,
            seed,
            key_range,
            multi,
            erase_ratio,
        } => run_stress(ops, seed, key_range, multi, erase_ratio)?,
    }

    Ok(())
}

/// Install a `fmt` subscriber filtered by `RBTREE_LOG` (default `info`).
fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env("RBTREE_LOG").unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn config_for(multi: bool) -> TreeConfig {
    if multi {
        TreeConfig::multi()
    } else {
        TreeConfig::unique()
    }
}

fn run_build(keys: &[i64], multi: bool, erase: &[i64], hint_last: bool, show_shape: bool) -> Result<()> {
    let config = config_for(multi).with_capacity(keys.len());
    let mut tree = OrderedTree::with_config(config).context("failed to create tree")?;

    for &key in keys {
        let (id, added) = if hint_last {
            tree.insert_hint(None, key)
        } else {
            tree.insert(key)
        };
        if !added {
            info!(key, node = %id, "duplicate key skipped");
        }
    }
    for &key in erase {
        if tree.remove(&key).is_none() {
            info!(key, "erase target not present");
        }
    }

    let stats = tree.validate().context("tree failed validation")?;
    let keys: Vec<String> = tree.iter().map(i64::to_string).collect();
    println!("keys\t{}", keys.join(","));
    print_stats(&stats);
    if show_shape {
        print!("{}", tree.render());
    }
    Ok(())
}

fn run_stress(ops: usize, seed: u64, key_range: i64, multi: bool, erase_ratio: f64) -> Result<()> {
    ensure!(key_range > 0, "key range must be positive, got {}", key_range);
    ensure!(
        (0.0..=1.0).contains(&erase_ratio),
        "erase ratio must lie in [0, 1], got {}",
        erase_ratio
    );
    info!(ops, seed, key_range, multi, erase_ratio, "starting stress run");

    let mut rng = StdRng::seed_from_u64(seed);
    let mut tree = OrderedTree::with_config(config_for(multi)).context("failed to create tree")?;
    // reference multiplicities
    let mut model: BTreeMap<i64, usize> = BTreeMap::new();
    let (mut inserted, mut rejected, mut removed, mut missed) = (0usize, 0usize, 0usize, 0usize);
    let mut max_height = 0;

    for op in 0..ops {
        let key = rng.gen_range(0..key_range);
        if !tree.is_empty() && rng.gen_bool(erase_ratio) {
            match tree.remove(&key) {
                Some(_) => {
                    removed += 1;
                    decrement(&mut model, key).with_context(|| format!("op {}: removed absent key {}", op, key))?;
                }
                None => {
                    missed += 1;
                    ensure!(!model.contains_key(&key), "op {}: key {} present but not found", op, key);
                }
            }
        } else {
            let hint = if rng.gen_bool(0.5) { tree.lower_bound(&key) } else { None };
            let (_, added) = tree.insert_hint(hint, key);
            if added {
                inserted += 1;
                *model.entry(key).or_default() += 1;
            } else {
                rejected += 1;
                ensure!(model.contains_key(&key), "op {}: phantom duplicate {}", op, key);
            }
        }

        let stats = tree
            .validate()
            .with_context(|| format!("invariant check failed after op {}", op))?;
        ensure!(
            stats.len == model.values().sum::<usize>(),
            "op {}: tree holds {} elements, model {}",
            op,
            stats.len,
            model.values().sum::<usize>()
        );
        max_height = max_height.max(stats.height);
        debug!(op, len = stats.len, height = stats.height, "op done");
    }

    let expected: Vec<i64> = model
        .iter()
        .flat_map(|(&k, &n)| std::iter::repeat(k).take(n))
        .collect();
    if !tree.iter().copied().eq(expected.iter().copied()) {
        bail!("final contents differ from the reference model");
    }

    let stats = tree.validate()?;
    println!(
        "ops\t{}\ninserted\t{}\nrejected\t{}\nremoved\t{}\nmissed\t{}\nmax_height\t{}",
        ops, inserted, rejected, removed, missed, max_height
    );
    print_stats(&stats);
    Ok(())
}

fn decrement(model: &mut BTreeMap<i64, usize>, key: i64) -> Result<()> {
    let Some(count) = model.get_mut(&key) else {
        bail!("key {} missing from model", key);
    };
    *count -= 1;
    if *count == 0 {
        model.remove(&key);
    }
    Ok(())
}

fn print_stats(stats: &TreeStats) {
    println!(
        "len\t{}\nheight\t{}\nblack_height\t{}",
        stats.len, stats.height, stats.black_height
    );
}

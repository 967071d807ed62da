//! Command-line driver for the SymNMF pipeline.
//!
//! Reads a header-less CSV of points and prints one of the pipeline's matrices with
//! four decimals per value.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example symnmf-cli -- sym points.txt
//! cargo run --example symnmf-cli -- ddg points.txt
//! cargo run --example symnmf-cli -- norm points.txt
//! cargo run --example symnmf-cli -- symnmf points.txt -k 2
//! cargo run --example symnmf-cli -- labels points.txt -k 2 --seed 7
//! ```
//!
//! For `symnmf` and `labels` the initial factor is drawn uniformly from
//! `[0, 2·sqrt(mean(W)/k))` with a seeded RNG.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use rand::prelude::*;
use symnmf::cluster::factorize::{self, FactorizeParams};
use symnmf::{build_affinity, build_degree, derive_labels, io as points_io, normalize, Matrix};

/// What to compute and print.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum Goal {
    /// Similarity matrix A.
    Sym,
    /// Diagonal degree matrix D.
    Ddg,
    /// Normalized similarity matrix W.
    Norm,
    /// Final factor matrix H.
    Symnmf,
    /// One cluster label per line.
    Labels,
}

#[derive(Parser, Debug)]
#[command(name = "symnmf-cli", version, about = "Symmetric NMF clustering", long_about = None)]
struct Args {
    /// Pipeline output to print.
    #[arg(value_enum)]
    goal: Goal,

    /// Comma-separated point file, one point per line.
    file: PathBuf,

    /// Number of clusters (required by `symnmf` and `labels`; must satisfy 1 <= k < n).
    #[arg(short, long)]
    k: Option<usize>,

    /// Seed for the initial factor.
    #[arg(long, default_value_t = 1234)]
    seed: u64,

    /// Convergence threshold.
    #[arg(long, default_value_t = factorize::DEFAULT_EPSILON)]
    epsilon: f64,

    /// Iteration budget.
    #[arg(long, default_value_t = factorize::DEFAULT_MAX_ITER)]
    max_iter: usize,

    /// Log level: trace, debug, info, warn, error.
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(
            args.log_level
                .parse::<tracing_subscriber::filter::LevelFilter>()
                .unwrap_or(tracing_subscriber::filter::LevelFilter::WARN),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let points = points_io::read_points_path(&args.file)?;
    let n = points.len();

    let a = build_affinity(&points)?;
    if let Goal::Sym = args.goal {
        return print(&a);
    }

    let d = build_degree(&a)?;
    if let Goal::Ddg = args.goal {
        return print(&d);
    }

    let w = normalize(&d, &a)?;
    if let Goal::Norm = args.goal {
        return print(&w);
    }

    let k = match args.k {
        Some(k) if k >= 1 && k < n => k,
        Some(k) => return Err(format!("k must satisfy 1 <= k < {n}, got {k}").into()),
        None => return Err("--k is required for this goal".into()),
    };

    let h0 = initial_factor(&w, k, args.seed)?;
    let params = FactorizeParams::default()
        .with_epsilon(args.epsilon)
        .with_max_iter(args.max_iter);
    let fit = factorize::run(&w, &h0, &params)?;
    tracing::info!(
        iterations = fit.iterations,
        termination = ?fit.termination,
        "factorization finished"
    );

    match args.goal {
        Goal::Labels => {
            let labels = derive_labels(&fit.h)?;
            let stdout = io::stdout();
            let mut out = stdout.lock();
            for label in labels {
                writeln!(out, "{label}")?;
            }
            Ok(())
        }
        _ => print(&fit.h),
    }
}

/// Uniform in `[0, 2·sqrt(mean(W)/k))`, so `H·Hᵀ` starts near the scale of `W`.
fn initial_factor(w: &Matrix, k: usize, seed: u64) -> symnmf::Result<Matrix> {
    let n = w.rows();
    let upper = 2.0 * (w.mean() / k as f64).sqrt();
    let mut rng = StdRng::seed_from_u64(seed);
    let data = (0..n * k)
        .map(|_| if upper > 0.0 { rng.random_range(0.0..upper) } else { 0.0 })
        .collect();
    Matrix::from_vec(n, k, data)
}

fn print(m: &Matrix) -> Result<(), Box<dyn std::error::Error>> {
    points_io::write_matrix(io::stdout().lock(), m)?;
    Ok(())
}

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fenmove::board::Position;
use fenmove::search::alphabeta::SearchParams;
use fenmove::search::weights::WeightConfig;
use fenmove::service::{MoveService, MoveResponse};
use fenmove::Engine;
use std::io;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(author, version, about = "Pick a chess move for a FEN position", long_about = None)]
struct Args {
    /// JSON file overriding any of the evaluation weights
    #[arg(long, global = true, conflicts_with = "pawn_centric")]
    weights: Option<PathBuf>,

    /// Use the center-pawn / pawn-advancement weight preset as the base
    #[arg(long, global = true, default_value_t = false)]
    pawn_centric: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search a position and print the position after the chosen move
    Best {
        /// FEN string or "startpos"
        #[arg(long, default_value = "startpos")]
        fen: String,
        /// Search depth in plies
        #[arg(long, default_value_t = 3)]
        depth: u32,
        /// Workers for the root-move split
        #[arg(long, default_value_t = 1)]
        threads: usize,
        /// Print score, move and node count alongside the response
        #[arg(long, default_value_t = false)]
        verbose: bool,
    },
    /// Print the static evaluation and each of its terms
    Eval {
        /// FEN string or "startpos"
        #[arg(long, default_value = "startpos")]
        fen: String,
    },
    /// Answer JSON move requests line by line on stdin/stdout
    Serve {
        /// Requests asking for more plies than this are rejected
        #[arg(long, default_value_t = 5)]
        max_depth: u32,
        /// Depth used when a request does not give one
        #[arg(long, default_value_t = 3)]
        depth: u32,
        #[arg(long, default_value_t = 1)]
        threads: usize,
    },
    /// Count leaf nodes of the legal move tree
    Perft {
        #[arg(value_name = "DEPTH")]
        depth: u32,
        /// FEN string or "startpos"
        #[arg(value_name = "FEN", default_value = "startpos")]
        fen: String,
        /// Print per-move counts
        #[arg(long, default_value_t = false)]
        divide: bool,
    },
}

fn resolve_fen(fen: &str) -> String {
    if fen == "startpos" { Position::startpos().to_fen() } else { fen.to_string() }
}

fn load_weights(args: &Args) -> Result<WeightConfig> {
    match &args.weights {
        Some(path) => WeightConfig::load(path),
        None if args.pawn_centric => Ok(WeightConfig::pawn_centric()),
        None => Ok(WeightConfig::default()),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let weights = load_weights(&args)?;

    match args.command {
        Command::Best { fen, depth, threads, verbose } => {
            let params = SearchParams { depth, threads, ..SearchParams::default() };
            let engine = Engine::with_params(weights, params);
            let start = Instant::now();
            let outcome = engine.best_move(&resolve_fen(&fen))?;
            if verbose {
                let elapsed = start.elapsed().as_secs_f64();
                println!(
                    "bestmove {} score {:.1} nodes {} elapsed {:.3}s",
                    outcome.best_move.as_deref().unwrap_or("(none)"),
                    outcome.score.unwrap_or_default(),
                    outcome.nodes,
                    elapsed
                );
            }
            let resp = MoveResponse { updated_fen: outcome.updated_fen, result: outcome.result };
            println!("{}", serde_json::to_string(&resp)?);
        }
        Command::Eval { fen } => {
            let engine = Engine::new(weights);
            let pos = Position::from_fen(&resolve_fen(&fen)).map_err(anyhow::Error::msg)?;
            let report = serde_json::json!({
                "score": engine.evaluator().evaluate(&pos),
                "terms": engine.evaluator().breakdown(&pos),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Serve { max_depth, depth, threads } => {
            let params = SearchParams { depth, threads, ..SearchParams::default() };
            let service = MoveService::new(Engine::with_params(weights, params), max_depth);
            log::info!("serving move requests (default depth {depth}, max depth {max_depth})");
            let stdin = io::stdin();
            service.run_loop(stdin.lock(), io::stdout().lock()).context("request loop")?;
        }
        Command::Perft { depth, fen, divide } => {
            let mut pos = Position::from_fen(&resolve_fen(&fen)).map_err(anyhow::Error::msg)?;
            let start = Instant::now();
            let nodes: u64 = if divide {
                let counts = fenmove::perft::divide(&mut pos, depth);
                for (mv, n) in &counts { println!("{mv}: {n}"); }
                counts.iter().map(|(_, n)| n).sum()
            } else {
                fenmove::perft::perft(&mut pos, depth)
            };
            let dt = start.elapsed().as_secs_f64();
            let nps = if dt > 0.0 { nodes as f64 / dt } else { f64::INFINITY };
            println!("nodes: {nodes} elapsed: {dt:.3}s nps: {nps:.0}");
        }
    }
    Ok(())
}

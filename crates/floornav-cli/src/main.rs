//! FloorNav headless harness
//!
//! Loads a plan document, applies edit scripts, answers routing queries and
//! prints distance matrices. Runs entirely in-process, no UI.
//!
//! Usage:
//!   cargo run -p floornav-cli -- new --floors 3 --out plan.json
//!   cargo run -p floornav-cli -- route plan.json --from Lobby --from-floor 0 --to Office --to-floor 2
//!   cargo run -p floornav-cli -- -v distances plan.json
//!
//! Plans ending in `.bin` are read and written as binary snapshots; anything
//! else is JSON.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use floornav_logic::{
    distance_matrix, ConnectorKind, Directions, DocumentError, EditCommand, FloorSet, PathPlanner,
    PlanDocument, PlannerConfig,
};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "floornav")]
#[command(about = "Multi-floor indoor navigation planner")]
#[command(version)]
struct Args {
    /// Planner configuration (JSON); defaults apply when omitted
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write an empty plan
    New {
        #[arg(long)]
        rows: Option<usize>,
        #[arg(long)]
        cols: Option<usize>,
        #[arg(long, default_value_t = 1)]
        floors: usize,
        #[arg(long)]
        out: PathBuf,
    },
    /// Load a plan and report every validation issue
    Validate { plan: PathBuf },
    /// Apply a JSON list of edit commands, stopping at the first failure
    Apply {
        plan: PathBuf,
        #[arg(long)]
        edits: PathBuf,
        /// Output path (defaults to overwriting the input plan)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Shortest route between two rooms (floors are 0-based)
    Route {
        plan: PathBuf,
        #[arg(long)]
        from: String,
        #[arg(long)]
        from_floor: usize,
        #[arg(long)]
        to: String,
        #[arg(long)]
        to_floor: usize,
        /// Overrides `astar.floor_penalty` from the config
        #[arg(long)]
        floor_penalty: Option<usize>,
    },
    /// Walking distance between every pair of rooms
    Distances { plan: PathBuf },
    /// Per-floor room, wall and connector counts
    Summary { plan: PathBuf },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();

    let config = match &args.config {
        Some(path) => PlannerConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PlannerConfig::default(),
    };

    match args.command {
        Command::New {
            rows,
            cols,
            floors,
            out,
        } => {
            let mut config = config;
            config.grid.rows = rows.unwrap_or(config.grid.rows);
            config.grid.cols = cols.unwrap_or(config.grid.cols);
            config.validate()?;
            if floors == 0 {
                bail!("a plan needs at least one floor");
            }
            let set = FloorSet::from_config(&config, floors);
            save_plan(&set, &out)?;
            println!(
                "Wrote {} floor(s) of {}x{} to {}",
                floors,
                config.grid.rows,
                config.grid.cols,
                out.display()
            );
        }
        Command::Validate { plan } => match read_document(&plan)?.to_floor_set() {
            Ok(set) => {
                println!(
                    "{}: ok ({} floors, {} rooms)",
                    plan.display(),
                    set.len(),
                    set.room_refs().len()
                );
            }
            Err(DocumentError::Invalid(issues)) => {
                println!("{}: {} issue(s)", plan.display(), issues.len());
                for issue in &issues {
                    println!("  ✗ {}", issue);
                }
                std::process::exit(1);
            }
            Err(e) => return Err(e.into()),
        },
        Command::Apply { plan, edits, out } => {
            let mut set = load_plan(&plan)?;
            set.set_naming(config.floors.clone());
            let file = File::open(&edits)
                .with_context(|| format!("opening edits {}", edits.display()))?;
            let commands: Vec<EditCommand> = serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("parsing edits {}", edits.display()))?;
            let count = commands.len();
            if let Err((index, e)) = set.apply_all(commands) {
                bail!("edit #{} failed: {} (earlier edits not saved)", index, e);
            }
            let out = out.unwrap_or(plan);
            save_plan(&set, &out)?;
            println!("Applied {} edit(s), wrote {}", count, out.display());
        }
        Command::Route {
            plan,
            from,
            from_floor,
            to,
            to_floor,
            floor_penalty,
        } => {
            let set = load_plan(&plan)?;
            let mut settings = config.astar.clone();
            if let Some(penalty) = floor_penalty {
                settings.floor_penalty = penalty;
            }
            if !settings.is_admissible() {
                log::warn!(
                    "floor penalty {} may overestimate; routes might not be shortest",
                    settings.floor_penalty
                );
            }
            let planner = PathPlanner::new(&set, settings);
            let result = planner.find_room_path(&from, from_floor, &to, to_floor)?;
            match result.route() {
                Some(route) => {
                    println!("{} steps", route.steps());
                    for sentence in Directions::from_route(&set, route).sentences() {
                        println!("  {}", sentence);
                    }
                }
                None => println!("No path"),
            }
        }
        Command::Distances { plan } => {
            let set = load_plan(&plan)?;
            let matrix = distance_matrix(&set, &config.astar);
            for line in matrix.lines() {
                println!("{}", line);
            }
        }
        Command::Summary { plan } => {
            let set = load_plan(&plan)?;
            let size = set.size();
            println!("{} floor(s), {}x{} grid", set.len(), size.rows, size.cols);
            for (index, floor) in set.floors().iter().enumerate() {
                println!(
                    "  [{}] {}: {} rooms, {} walls, {} stairs, {} elevators",
                    index,
                    floor.name(),
                    floor.room_count(),
                    floor.wall_count(),
                    floor.connectors(ConnectorKind::Stair).len(),
                    floor.connectors(ConnectorKind::Elevator).len()
                );
            }
        }
    }
    Ok(())
}

// ── Plan files ──────────────────────────────────────────────────────────

fn is_snapshot(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "bin")
}

fn read_document(path: &Path) -> Result<PlanDocument> {
    let file = File::open(path).with_context(|| format!("opening plan {}", path.display()))?;
    let reader = BufReader::new(file);
    let document = if is_snapshot(path) {
        PlanDocument::read_snapshot(reader)
    } else {
        PlanDocument::read_json(reader)
    };
    document.with_context(|| format!("reading plan {}", path.display()))
}

fn load_plan(path: &Path) -> Result<FloorSet> {
    read_document(path)?
        .to_floor_set()
        .with_context(|| format!("loading plan {}", path.display()))
}

fn save_plan(set: &FloorSet, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    if is_snapshot(path) {
        PlanDocument::from_floor_set(set).write_snapshot(&mut writer)?;
        log::info!("saved snapshot {}", path.display());
    } else {
        PlanDocument::export_json(set, &mut writer)?;
    }
    writer
        .flush()
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

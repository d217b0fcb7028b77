mod logic;
mod storage;
mod util;

use anyhow::{Context, Result};
use chronoshard_game::{EmbeddedDataLoader, GameConfig, GameEngine, GameStorage, MemoryStorage};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use logic::{RunPlan, RunSummary, TravelStrategy, aggregate_runs, resolve_seed_inputs, run_game};
use storage::JsonFileStorage;
use util::split_csv;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Console,
    Json,
    Markdown,
}

#[derive(Debug, Parser)]
#[command(name = "chronoshard-tester", version)]
#[command(about = "Automated playthroughs for ChronoShard game logic with invariant checks")]
struct Args {
    /// Strategies to run (comma-separated: greedy,random,cautious or all)
    #[arg(long, default_value = "all")]
    strategy: String,

    /// Seeds to run (comma-separated, ranges like 1..10 allowed)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Games per strategy and seed
    #[arg(long, default_value_t = 10)]
    games: usize,

    /// Turn limit per game
    #[arg(long, default_value_t = 500)]
    max_turns: u32,

    /// JSON rule set replacing the bundled defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Write each run's final state as a JSON save under this directory
    #[arg(long)]
    save_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.report == ReportFormat::Console {
        announce_banner();
    }

    let start_time = Instant::now();
    let strategies = expand_strategies(&args.strategy)?;
    let seeds = resolve_seed_inputs(&split_csv(&args.seeds))?;

    let runs = if let Some(dir) = args.save_dir.clone() {
        let storage = JsonFileStorage::new(dir);
        info!("saving runs under {}", storage.dir().display());
        let engine = GameEngine::new(EmbeddedDataLoader, storage);
        run_matrix(&args, &engine, &strategies, &seeds, true)?
    } else {
        let engine = GameEngine::new(EmbeddedDataLoader, MemoryStorage::new());
        run_matrix(&args, &engine, &strategies, &seeds, false)?
    };

    write_reports(&args, &runs, start_time)?;

    if runs.iter().any(|run| !run.passed()) {
        std::process::exit(1);
    }

    Ok(())
}

fn announce_banner() {
    println!("{}", "🛫 ChronoShard Automated Tester".bright_cyan().bold());
    println!("{}", "================================".cyan());
}

fn expand_strategies(raw: &str) -> Result<Vec<TravelStrategy>> {
    let mut strategies: Vec<TravelStrategy> = Vec::new();
    for token in split_csv(raw) {
        let parsed: Vec<TravelStrategy> = if token.eq_ignore_ascii_case("all") {
            TravelStrategy::ALL.to_vec()
        } else {
            vec![
                TravelStrategy::from_str(&token, true)
                    .map_err(|err| anyhow::anyhow!("unknown strategy {token:?}: {err}"))?,
            ]
        };
        for strategy in parsed {
            if !strategies.contains(&strategy) {
                strategies.push(strategy);
            }
        }
    }
    if strategies.is_empty() {
        strategies.extend(TravelStrategy::ALL);
    }
    Ok(strategies)
}

fn load_rules<S: GameStorage>(
    args: &Args,
    engine: &GameEngine<EmbeddedDataLoader, S>,
) -> Result<GameConfig> {
    let Some(path) = &args.config else {
        return engine.load_config();
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let cfg = GameConfig::from_json(&json)
        .with_context(|| format!("invalid rule set in {}", path.display()))?;
    info!("using rule set from {}", path.display());
    Ok(cfg)
}

fn run_matrix<S: GameStorage>(
    args: &Args,
    engine: &GameEngine<EmbeddedDataLoader, S>,
    strategies: &[TravelStrategy],
    seeds: &[u64],
    autosave: bool,
) -> Result<Vec<RunSummary>> {
    let cfg = load_rules(args, engine)?;
    let mut runs = Vec::new();
    for plan in plan_runs(strategies, seeds, args.games, args.max_turns) {
        let summary = run_game(engine, &cfg, &plan, autosave).with_context(|| {
            format!("{} seed {} game {}", plan.strategy, plan.seed, plan.game)
        })?;
        if args.verbose {
            eprintln!(
                "{} [{} seed {} game {}] {} in {} turns",
                if summary.passed() { "✅" } else { "❌" },
                plan.strategy,
                plan.seed,
                plan.game,
                summary.status,
                summary.turns
            );
        }
        runs.push(summary);
    }
    Ok(runs)
}

/// Every strategy, seed and game combination, produced lazily.
fn plan_runs<'a>(
    strategies: &'a [TravelStrategy],
    seeds: &'a [u64],
    games: usize,
    max_turns: u32,
) -> impl Iterator<Item = RunPlan> + 'a {
    strategies.iter().flat_map(move |&strategy| {
        seeds.iter().flat_map(move |&seed| {
            (0..games).map(move |game| RunPlan {
                strategy,
                seed,
                game,
                max_turns,
            })
        })
    })
}

fn write_reports(args: &Args, runs: &[RunSummary], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;
    let aggregates = aggregate_runs(runs);

    match args.report {
        ReportFormat::Json => {
            logic::reports::generate_json_report(&mut output_target, runs, &aggregates)?;
        }
        ReportFormat::Markdown => {
            logic::reports::generate_markdown_report(&mut output_target, runs, &aggregates)?;
        }
        ReportFormat::Console => {
            if runs.is_empty() {
                writeln!(&mut output_target, "No games played.")?;
            } else {
                logic::reports::generate_console_report(
                    &mut output_target,
                    runs,
                    &aggregates,
                    start_time.elapsed(),
                    args.verbose,
                )?;
            }
            writeln!(&mut output_target)?;
            writeln!(
                &mut output_target,
                "🏁 Total time: {:?}",
                start_time.elapsed()
            )?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Args {
        Args {
            strategy: "all".to_string(),
            seeds: "1337".to_string(),
            games: 1,
            max_turns: 200,
            config: None,
            report: ReportFormat::Json,
            output: None,
            save_dir: None,
            verbose: false,
        }
    }

    #[test]
    fn strategies_expand_and_dedupe() {
        assert_eq!(expand_strategies("all").unwrap(), TravelStrategy::ALL);
        assert_eq!(
            expand_strategies("cautious, Greedy,cautious").unwrap(),
            [TravelStrategy::Cautious, TravelStrategy::Greedy]
        );
        assert_eq!(expand_strategies("").unwrap(), TravelStrategy::ALL);
        assert!(expand_strategies("reckless").is_err());
    }

    #[test]
    fn matrix_covers_every_combination() {
        let mut args = base_args();
        args.games = 2;
        let engine = GameEngine::new(EmbeddedDataLoader, MemoryStorage::new());
        let runs = run_matrix(&args, &engine, &TravelStrategy::ALL, &[1, 2], false).unwrap();
        assert_eq!(runs.len(), 12);
        assert!(runs.iter().all(RunSummary::passed));
    }

    #[test]
    fn huge_game_counts_are_planned_lazily() {
        let plans: Vec<RunPlan> =
            plan_runs(&TravelStrategy::ALL, &[1, 2], usize::MAX, 10)
                .take(3)
                .collect();
        assert_eq!(plans.len(), 3);
        assert!(plans.iter().all(|plan| plan.strategy == TravelStrategy::Greedy));
        assert_eq!(plans[2].game, 2);
        assert_eq!(plan_runs(&TravelStrategy::ALL, &[], usize::MAX, 10).count(), 0);
    }

    #[test]
    fn rule_file_overrides_bundled_config() {
        let path = std::env::temp_dir().join(format!(
            "chronoshard-rules-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{"starting_credits": 40, "bandit_chance": 0.0}"#).unwrap();
        let mut args = base_args();
        args.config = Some(path.clone());
        let engine = GameEngine::new(EmbeddedDataLoader, MemoryStorage::new());
        let cfg = load_rules(&args, &engine).unwrap();
        assert_eq!(cfg.starting_credits, 40);
        assert!(cfg.bandit_chance.abs() < f64::EPSILON);
        assert_eq!(cfg.range_per_credit, 2);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn output_target_writes_to_file() {
        let path = std::env::temp_dir().join(format!(
            "chronoshard-report-{}.json",
            std::process::id()
        ));
        let mut args = base_args();
        args.output = Some(path.clone());
        write_reports(&args, &[], Instant::now()).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"runs\": []"));
        let _ = std::fs::remove_file(path);
    }
}

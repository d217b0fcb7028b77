use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::io::Write;
use std::time::Duration;

use super::policy::TravelStrategy;
use super::simulation::{RunStatus, RunSummary};

/// Totals for every run of one strategy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyAggregate {
    pub strategy: TravelStrategy,
    pub runs: usize,
    pub wins: usize,
    pub losses: usize,
    pub halted: usize,
    pub win_rate: f64,
    pub average_turns: f64,
    pub average_credits: f64,
    pub blocked_trips: u32,
    pub violations: usize,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    runs: &'a [RunSummary],
    aggregates: &'a [StrategyAggregate],
}

#[allow(clippy::cast_precision_loss)]
fn ratio(part: f64, whole: usize) -> f64 {
    if whole == 0 { 0.0 } else { part / whole as f64 }
}

/// Group runs by strategy, in the order strategies first appear.
#[allow(clippy::cast_precision_loss)]
pub fn aggregate_runs(runs: &[RunSummary]) -> Vec<StrategyAggregate> {
    let mut order: Vec<TravelStrategy> = Vec::new();
    for run in runs {
        if !order.contains(&run.strategy) {
            order.push(run.strategy);
        }
    }

    order
        .into_iter()
        .map(|strategy| {
            let group: Vec<&RunSummary> =
                runs.iter().filter(|run| run.strategy == strategy).collect();
            let count = |status| group.iter().filter(|run| run.status == status).count();
            let wins = count(RunStatus::Won);
            let turns: f64 = group.iter().map(|run| f64::from(run.turns)).sum();
            let credits: f64 = group.iter().map(|run| run.credits as f64).sum();
            StrategyAggregate {
                strategy,
                runs: group.len(),
                wins,
                losses: count(RunStatus::Lost),
                halted: count(RunStatus::Halted),
                win_rate: ratio(wins as f64, group.len()) * 100.0,
                average_turns: ratio(turns, group.len()),
                average_credits: ratio(credits, group.len()),
                blocked_trips: group.iter().map(|run| run.stats.blocked).sum(),
                violations: group.iter().map(|run| run.violations.len()).sum(),
            }
        })
        .collect()
}

pub fn generate_console_report(
    writer: &mut dyn Write,
    runs: &[RunSummary],
    aggregates: &[StrategyAggregate],
    total_duration: Duration,
    verbose: bool,
) -> Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{}", "📊 Playthrough Summary".bright_cyan().bold())?;
    writeln!(writer, "{}", "======================".cyan())?;

    let failed = runs.iter().filter(|run| !run.passed()).count();
    writeln!(writer, "Total runs: {}", runs.len())?;
    writeln!(writer, "Clean: {}", (runs.len() - failed).to_string().green())?;
    writeln!(writer, "With violations: {}", failed.to_string().red())?;
    writeln!(writer, "Total time: {total_duration:?}")?;
    writeln!(writer)?;

    for aggregate in aggregates {
        writeln!(writer, "{}", aggregate.strategy.label().bold())?;
        writeln!(
            writer,
            "   Won {} / Lost {} / Halted {} ({:.1}% win rate)",
            aggregate.wins.to_string().green(),
            aggregate.losses.to_string().red(),
            aggregate.halted.to_string().yellow(),
            aggregate.win_rate
        )?;
        writeln!(
            writer,
            "   Average turns: {:.1}, average credits left: {:.1}, blocked trips: {}",
            aggregate.average_turns, aggregate.average_credits, aggregate.blocked_trips
        )?;
        writeln!(writer)?;
    }

    for run in runs {
        if run.passed() && !verbose {
            continue;
        }
        let status = if run.passed() { "✅" } else { "❌" };
        writeln!(
            writer,
            "{status} [{} seed {} game {}] {} after {} turns at {} (credits {}, range {}, shards {}/5)",
            run.strategy,
            run.seed,
            run.game,
            run.status,
            run.turns,
            run.location,
            run.credits,
            run.range,
            run.shards
        )?;
        for violation in &run.violations {
            writeln!(writer, "     • {}", violation.red())?;
        }
    }
    Ok(())
}

pub fn generate_json_report(
    writer: &mut dyn Write,
    runs: &[RunSummary],
    aggregates: &[StrategyAggregate],
) -> Result<()> {
    let report = JsonReport { runs, aggregates };
    serde_json::to_writer_pretty(&mut *writer, &report)?;
    writeln!(writer)?;
    Ok(())
}

pub fn generate_markdown_report(
    writer: &mut dyn Write,
    runs: &[RunSummary],
    aggregates: &[StrategyAggregate],
) -> Result<()> {
    writeln!(writer, "# ChronoShard Playthrough Results\n")?;
    writeln!(writer, "## Strategies\n")?;
    writeln!(
        writer,
        "| Strategy | Runs | Won | Lost | Halted | Win rate | Avg turns | Violations |"
    )?;
    writeln!(writer, "|---|---|---|---|---|---|---|---|")?;
    for aggregate in aggregates {
        writeln!(
            writer,
            "| {} | {} | {} | {} | {} | {:.1}% | {:.1} | {} |",
            aggregate.strategy,
            aggregate.runs,
            aggregate.wins,
            aggregate.losses,
            aggregate.halted,
            aggregate.win_rate,
            aggregate.average_turns,
            aggregate.violations
        )?;
    }

    let failing: Vec<&RunSummary> = runs.iter().filter(|run| !run.passed()).collect();
    if !failing.is_empty() {
        writeln!(writer, "\n## Violations\n")?;
        for run in failing {
            writeln!(
                writer,
                "### {} seed {} game {}\n",
                run.strategy, run.seed, run.game
            )?;
            for violation in &run.violations {
                writeln!(writer, "- {violation}")?;
            }
            writeln!(writer)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronoshard_game::SessionStats;

    fn run(strategy: TravelStrategy, status: RunStatus, turns: u32) -> RunSummary {
        RunSummary {
            strategy,
            seed: 1,
            game: 0,
            status,
            turns,
            credits: 100,
            range: 40,
            shards: 3,
            location: "EVRA".to_string(),
            stats: SessionStats {
                blocked: 2,
                ..SessionStats::default()
            },
            rejected_purchases: 0,
            failed_saves: 0,
            violations: Vec::new(),
        }
    }

    fn sample() -> Vec<RunSummary> {
        let mut broken = run(TravelStrategy::Random, RunStatus::Halted, 30);
        broken.violations.push("turn 4: a collected shard was lost".to_string());
        vec![
            run(TravelStrategy::Greedy, RunStatus::Won, 10),
            run(TravelStrategy::Greedy, RunStatus::Lost, 20),
            broken,
        ]
    }

    #[test]
    fn aggregates_follow_first_appearance() {
        let aggregates = aggregate_runs(&sample());
        assert_eq!(aggregates.len(), 2);
        let greedy = &aggregates[0];
        assert_eq!(greedy.strategy, TravelStrategy::Greedy);
        assert_eq!((greedy.runs, greedy.wins, greedy.losses), (2, 1, 1));
        assert!((greedy.win_rate - 50.0).abs() < f64::EPSILON);
        assert!((greedy.average_turns - 15.0).abs() < f64::EPSILON);
        assert_eq!(greedy.blocked_trips, 4);
        assert_eq!(aggregates[1].violations, 1);
        assert!(aggregate_runs(&[]).is_empty());
    }

    #[test]
    fn json_report_contains_runs_and_aggregates() {
        let runs = sample();
        let mut out = Vec::new();
        generate_json_report(&mut out, &runs, &aggregate_runs(&runs)).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["runs"].as_array().unwrap().len(), 3);
        assert_eq!(value["aggregates"][0]["strategy"], "greedy");
        assert_eq!(value["runs"][2]["status"], "halted");
    }

    #[test]
    fn markdown_report_lists_violations() {
        let runs = sample();
        let mut out = Vec::new();
        generate_markdown_report(&mut out, &runs, &aggregate_runs(&runs)).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("# ChronoShard Playthrough Results"));
        assert!(text.contains("| Greedy | 2 | 1 | 1 | 0 | 50.0% | 15.0 | 0 |"));
        assert!(text.contains("- turn 4: a collected shard was lost"));
    }

    #[test]
    fn console_report_hides_clean_runs_unless_verbose() {
        colored::control::set_override(false);
        let runs = sample();
        let aggregates = aggregate_runs(&runs);
        let mut quiet = Vec::new();
        generate_console_report(&mut quiet, &runs, &aggregates, Duration::ZERO, false).unwrap();
        let quiet = String::from_utf8(quiet).unwrap();
        assert!(quiet.contains("Total runs: 3"));
        assert!(quiet.contains("a collected shard was lost"));
        assert!(!quiet.contains("seed 1 game 0] won"));

        let mut loud = Vec::new();
        generate_console_report(&mut loud, &runs, &aggregates, Duration::ZERO, true).unwrap();
        assert!(String::from_utf8(loud).unwrap().contains("[Greedy seed 1 game 0] won"));
    }
}

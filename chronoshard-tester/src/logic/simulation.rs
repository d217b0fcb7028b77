use chronoshard_game::{
    DataLoader, GameConfig, GameEngine, GameStorage, Outcome, PlayerState, SessionStats,
    TravelEvent, TravelStep,
};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::policy::{PolicyAction, TravelStrategy};

/// Blocked trips in a row before a run is considered stuck.
const STALL_LIMIT: u32 = 3;

/// How a simulated run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Won,
    Lost,
    /// Turn limit reached or no further progress possible.
    Halted,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Won => f.write_str("won"),
            Self::Lost => f.write_str("lost"),
            Self::Halted => f.write_str("halted"),
        }
    }
}

/// Per-run parameters.
#[derive(Debug, Clone, Copy)]
pub struct RunPlan {
    pub strategy: TravelStrategy,
    pub seed: u64,
    pub game: usize,
    pub max_turns: u32,
}

impl RunPlan {
    /// Seed actually handed to the engine. Game 0 plays the requested seed.
    #[must_use]
    pub fn game_seed(&self) -> u64 {
        let game = u64::try_from(self.game).unwrap_or(u64::MAX);
        self.seed
            .wrapping_add(game.wrapping_mul(0x9E37_79B9_7F4A_7C15))
    }

    #[must_use]
    pub fn slot(&self) -> String {
        format!(
            "{}-{}-{}",
            self.strategy.label().to_ascii_lowercase(),
            self.seed,
            self.game
        )
    }
}

/// Result of one automated playthrough.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub strategy: TravelStrategy,
    pub seed: u64,
    pub game: usize,
    pub status: RunStatus,
    pub turns: u32,
    pub credits: i64,
    pub range: i64,
    pub shards: usize,
    pub location: String,
    pub stats: SessionStats,
    pub rejected_purchases: u32,
    pub failed_saves: u32,
    pub violations: Vec<String>,
}

impl RunSummary {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Check a single applied step against the resolver's guarantees.
pub fn check_step(before: &PlayerState, step: &TravelStep, cfg: &GameConfig) -> Vec<String> {
    let mut violations = Vec::new();
    let report = &step.report;
    let after = &report.state;

    if !cfg.travel_cost.contains(report.cost) {
        violations.push(format!("travel cost {} out of bounds", report.cost));
    }

    if report.can_travel() {
        if after.range != before.range - report.cost {
            violations.push(format!(
                "range {} -> {} does not match cost {}",
                before.range, after.range, report.cost
            ));
        }
    } else {
        if after != before {
            violations.push("blocked trip changed the state".to_string());
        }
        if !report.events.is_empty() {
            violations.push("blocked trip produced events".to_string());
        }
    }

    if before.shards.iter().any(|shard| !after.shards.contains(shard)) {
        violations.push("a collected shard was lost".to_string());
    }
    if after.shard_count() > before.shard_count() + 1 {
        violations.push("more than one shard found on a single trip".to_string());
    }
    if after.credits < 0 || after.range < 0 {
        violations.push(format!(
            "negative resources: credits {}, range {}",
            after.credits, after.range
        ));
    }

    let mut last_rank = 0;
    for event in &report.events {
        let rank = match event {
            TravelEvent::ShardFound { .. } => 1,
            TravelEvent::BanditLoss { amount } => {
                if !cfg.bandit_loss.contains(*amount) {
                    violations.push(format!("bandit loss {amount} out of bounds"));
                }
                2
            }
            TravelEvent::CreditGain { amount } => {
                if *amount <= 0 || !cfg.credit_gain.contains(*amount) {
                    violations.push(format!("credit gain {amount} out of bounds"));
                }
                3
            }
        };
        if rank <= last_rank {
            violations.push(format!("events out of order: {:?}", report.events));
        }
        last_rank = rank;
    }

    violations
}

/// Play one game to a terminal outcome, a stall, or the turn limit.
///
/// Saves after every applied action are best-effort and only counted.
///
/// # Errors
///
/// Returns an error if the engine cannot create the session.
pub fn run_game<L, S>(
    engine: &GameEngine<L, S>,
    cfg: &GameConfig,
    plan: &RunPlan,
    autosave: bool,
) -> anyhow::Result<RunSummary>
where
    L: DataLoader,
    S: GameStorage,
{
    let mut session = engine.create_session_with("Autopilot", plan.game_seed(), cfg.clone())?;
    let mut policy = plan.strategy.create_policy(plan.game_seed());
    let slot = plan.slot();

    let mut turns = 0;
    let mut stalled = 0;
    let mut rejected_purchases = 0;
    let mut failed_saves = 0;
    let mut violations = Vec::new();

    while turns < plan.max_turns && !session.outcome().is_terminal() {
        turns += 1;
        let action = policy.decide(session.state(), session.catalog(), session.config());
        match action {
            PolicyAction::BuyRange(credits) => {
                if let Err(err) = session.buy_range(credits) {
                    debug!("{} rejected purchase of {credits}: {err}", policy.name());
                    rejected_purchases += 1;
                    continue;
                }
            }
            PolicyAction::Travel(code) => {
                let before = session.state().clone();
                let step = session.travel_to(&code)?;
                for violation in check_step(&before, &step, session.config()) {
                    warn!("{slot} turn {turns}: {violation}");
                    violations.push(format!("turn {turns}: {violation}"));
                }
                if step.report.can_travel() {
                    stalled = 0;
                } else {
                    stalled += 1;
                }
            }
        }

        if autosave && !engine.autosave(&slot, session.state()) {
            failed_saves += 1;
        }
        if stalled >= STALL_LIMIT {
            debug!("{slot} stalled after {turns} turns");
            break;
        }
    }

    let status = match session.outcome() {
        Outcome::Won => RunStatus::Won,
        Outcome::Lost => RunStatus::Lost,
        Outcome::Ongoing => RunStatus::Halted,
    };
    let stats = session.stats();
    let state = session.into_state();
    Ok(RunSummary {
        strategy: plan.strategy,
        seed: plan.seed,
        game: plan.game,
        status,
        turns,
        credits: state.credits,
        range: state.range,
        shards: state.shard_count(),
        location: state.current_location,
        stats,
        rejected_purchases,
        failed_saves,
        violations,
    })
}

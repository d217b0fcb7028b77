//! Random event resolution for a single travel action.
use log::debug;
use serde::{Deserialize, Serialize};

use crate::airports::Airport;
use crate::config::GameConfig;
use crate::events::{BlockReason, TravelEvent, TravelEvents};
use crate::rng::{DrawKind, RandomSource};
use crate::state::PlayerState;

/// Result of one travel request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelReport {
    /// Range price drawn for this trip, charged only when travel happened.
    pub cost: i64,
    /// Ordered shard, bandit, credit.
    pub events: TravelEvents,
    pub state: PlayerState,
    pub blocked: Option<BlockReason>,
}

impl TravelReport {
    #[must_use]
    pub const fn can_travel(&self) -> bool {
        self.blocked.is_none()
    }

    fn blocked(cost: i64, state: &PlayerState, reason: BlockReason) -> Self {
        Self {
            cost,
            events: TravelEvents::new(),
            state: state.clone(),
            blocked: Some(reason),
        }
    }
}

/// Resolve a trip from the current location to `destination`.
///
/// The input state is never modified. A blocked trip returns an unchanged
/// copy, no events, and the reason. Travelling to the current airport is
/// allowed.
pub fn resolve_travel<R>(
    state: &PlayerState,
    destination: &Airport,
    cfg: &GameConfig,
    rng: &mut R,
) -> TravelReport
where
    R: RandomSource + ?Sized,
{
    let cost = rng.roll(DrawKind::Cost, cfg.travel_cost);
    if state.range < cost {
        debug!(
            "travel to {} blocked: cost {cost}, range {}",
            destination.code, state.range
        );
        return TravelReport::blocked(
            cost,
            state,
            BlockReason::InsufficientRange {
                required: cost,
                available: state.range,
            },
        );
    }
    if state.credits <= 0 {
        debug!("travel to {} blocked: no credits", destination.code);
        return TravelReport::blocked(cost, state, BlockReason::NoCredits);
    }

    let mut next = state.clone();
    let mut events = TravelEvents::new();
    next.range -= cost;

    let remaining = next.shards.remaining();
    if !remaining.is_empty() && rng.chance(DrawKind::Shard, cfg.shard_chance) {
        let shard = remaining[rng.pick(DrawKind::Shard, remaining.len())];
        next.shards.insert(shard);
        events.push(TravelEvent::ShardFound { shard });
    }

    if rng.chance(DrawKind::Bandit, cfg.bandit_chance) {
        let amount = rng.roll(DrawKind::Bandit, cfg.bandit_loss);
        next.credits = (next.credits - amount).max(0);
        events.push(TravelEvent::BanditLoss { amount });
    }

    if rng.chance(DrawKind::Credit, cfg.credit_gain_chance) {
        let amount = rng.roll(DrawKind::Credit, cfg.credit_gain);
        if amount > 0 {
            next.credits = next.credits.saturating_add(amount);
            events.push(TravelEvent::CreditGain { amount });
        }
    }

    next.current_location.clone_from(&destination.code);

    debug!(
        "traveled {} -> {} for {cost}: credits {}, range {}, shards {}, events {:?}",
        state.current_location,
        destination.code,
        next.credits,
        next.range,
        next.shard_count(),
        events
    );

    TravelReport {
        cost,
        events,
        state: next,
        blocked: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DrawBounds;
    use crate::state::ShardId;
    use std::collections::VecDeque;

    /// Replays queued answers and records which kinds were asked for.
    #[derive(Default)]
    struct Scripted {
        rolls: VecDeque<i64>,
        chances: VecDeque<bool>,
        picks: VecDeque<usize>,
        asked: Vec<DrawKind>,
    }

    impl Scripted {
        fn new(rolls: &[i64], chances: &[bool], picks: &[usize]) -> Self {
            Self {
                rolls: rolls.iter().copied().collect(),
                chances: chances.iter().copied().collect(),
                picks: picks.iter().copied().collect(),
                asked: Vec::new(),
            }
        }
    }

    impl RandomSource for Scripted {
        fn roll(&mut self, kind: DrawKind, bounds: DrawBounds) -> i64 {
            self.asked.push(kind);
            let value = self.rolls.pop_front().expect("scripted roll");
            assert!(bounds.contains(value), "{value} outside {bounds:?}");
            value
        }

        fn chance(&mut self, kind: DrawKind, _probability: f64) -> bool {
            self.asked.push(kind);
            self.chances.pop_front().expect("scripted chance")
        }

        fn pick(&mut self, kind: DrawKind, len: usize) -> usize {
            self.asked.push(kind);
            let index = self.picks.pop_front().expect("scripted pick");
            assert!(index < len);
            index
        }
    }

    fn airport(code: &str) -> Airport {
        Airport::new(code, code, "Test", None)
    }

    #[test]
    fn all_events_fire_in_order() {
        let state = PlayerState::new("Aino");
        let mut rng = Scripted::new(&[120, 40, 15], &[true, true, true], &[2]);
        let report = resolve_travel(&state, &airport("EHAM"), &GameConfig::default(), &mut rng);

        assert!(report.can_travel());
        assert_eq!(report.cost, 120);
        assert_eq!(report.state.range, 880);
        assert_eq!(report.state.credits, 1_000 - 40 + 15);
        assert_eq!(report.state.current_location, "EHAM");
        assert!(report.state.shards.contains(ShardId::Shard3));
        assert_eq!(
            report.events.as_slice(),
            &[
                TravelEvent::ShardFound {
                    shard: ShardId::Shard3
                },
                TravelEvent::BanditLoss { amount: 40 },
                TravelEvent::CreditGain { amount: 15 },
            ]
        );
        assert_eq!(state.range, 1_000, "input state must stay untouched");
    }

    #[test]
    fn insufficient_range_blocks_without_further_draws() {
        let mut state = PlayerState::new("Aino");
        state.credits = 50;
        state.range = 15;
        let mut rng = Scripted::new(&[20], &[], &[]);
        let report = resolve_travel(&state, &airport("EVRA"), &GameConfig::default(), &mut rng);

        assert!(!report.can_travel());
        assert_eq!(report.state, state);
        assert!(report.events.is_empty());
        assert_eq!(
            report.blocked,
            Some(BlockReason::InsufficientRange {
                required: 20,
                available: 15
            })
        );
        assert_eq!(rng.asked, vec![DrawKind::Cost]);
    }

    #[test]
    fn zero_credits_blocks_travel() {
        let mut state = PlayerState::new("Aino");
        state.credits = 0;
        let mut rng = Scripted::new(&[50], &[], &[]);
        let report = resolve_travel(&state, &airport("EVRA"), &GameConfig::default(), &mut rng);
        assert_eq!(report.blocked, Some(BlockReason::NoCredits));
        assert_eq!(report.state, state);
    }

    #[test]
    fn bandit_loss_clips_balance_but_reports_full_amount() {
        let mut state = PlayerState::new("Aino");
        state.credits = 30;
        let mut rng = Scripted::new(&[20, 150], &[false, true, false], &[]);
        let report = resolve_travel(&state, &airport("LIRN"), &GameConfig::default(), &mut rng);
        assert_eq!(report.state.credits, 0);
        assert_eq!(
            report.events.as_slice(),
            &[TravelEvent::BanditLoss { amount: 150 }]
        );
    }

    #[test]
    fn zero_credit_gain_is_silent() {
        let state = PlayerState::new("Aino");
        let mut rng = Scripted::new(&[75, 0], &[false, false, true], &[]);
        let report = resolve_travel(&state, &airport("ENGM"), &GameConfig::default(), &mut rng);
        assert!(report.events.is_empty());
        assert_eq!(report.state.credits, 1_000);
        assert_eq!(report.state.range, 925);
    }

    #[test]
    fn complete_collection_skips_the_shard_draw() {
        let mut state = PlayerState::new("Aino");
        state.shards = ShardId::ALL.into_iter().collect();
        let mut rng = Scripted::new(&[60], &[false, false], &[]);
        let report = resolve_travel(&state, &airport("EFHK"), &GameConfig::default(), &mut rng);
        assert!(report.can_travel());
        assert_eq!(
            rng.asked,
            vec![DrawKind::Cost, DrawKind::Bandit, DrawKind::Credit]
        );
    }

    #[test]
    fn same_airport_travel_is_allowed() {
        let state = PlayerState::new("Aino");
        let mut rng = Scripted::new(&[33], &[false, false, false], &[]);
        let report = resolve_travel(&state, &airport("EFHK"), &GameConfig::default(), &mut rng);
        assert!(report.can_travel());
        assert_eq!(report.state.range, 967);
        assert_eq!(report.state.current_location, "EFHK");
    }
}

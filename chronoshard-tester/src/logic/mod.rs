pub mod policy;
pub mod reports;
pub mod seeds;
pub mod simulation;

pub use policy::TravelStrategy;
pub use reports::aggregate_runs;
pub use seeds::resolve_seed_inputs;
pub use simulation::{RunPlan, RunSummary, run_game};

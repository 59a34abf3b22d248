//! Dungeon generation: run state, blueprint draws, collision checks and
//! the placement planner

pub mod draw;
pub mod oracle;
pub mod planner;
pub mod report;
pub mod run;

pub use draw::{biased_index, draw_blueprint, pick_blueprint, DrawPolicy};
pub use oracle::{CollisionOracle, PenetrationOracle};
pub use planner::{ExpandSummary, PlacementPlanner, SeedPlacement};
pub use report::{GenerationOutcome, GenerationReport};
pub use run::GenerationRun;

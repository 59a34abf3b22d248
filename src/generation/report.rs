//! Summary of a finished generation run

use serde::Serialize;
use std::fmt;

use crate::core::types::RunId;
use crate::world::{DungeonLayout, LayoutFile, LayoutMetadata};

use super::run::GenerationRun;

/// Counts describing how a run ended
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub run_id: RunId,
    pub seed: u64,
    pub bias: usize,
    /// Requested zones, seed module included
    pub total_zones: u32,
    /// Modules in the layout, seed module included
    pub placed_zones: usize,
    /// Sockets closed because no candidate fit
    pub dead_ends: usize,
    /// Sockets still open when the run stopped
    pub open_sockets: usize,
    pub remaining_budget: u32,
    /// Configuration problems hit while expanding
    pub errors: Vec<String>,
}

impl GenerationReport {
    pub fn new(run: &GenerationRun, layout: &DungeonLayout, errors: Vec<String>) -> Self {
        Self {
            run_id: run.id(),
            seed: run.seed(),
            bias: run.bias(),
            total_zones: run.total_zones(),
            placed_zones: layout.len(),
            dead_ends: layout.sealed_count(),
            open_sockets: layout.open_sockets().len(),
            remaining_budget: run.remaining_budget(),
            errors,
        }
    }

    /// Whether the whole budget was spent
    pub fn is_complete(&self) -> bool {
        self.remaining_budget == 0
    }

    pub fn metadata(&self) -> LayoutMetadata {
        LayoutMetadata {
            run_id: self.run_id,
            seed: self.seed,
            bias: self.bias,
            total_zones: self.total_zones,
            created_by: Some(format!("zone-forge {}", env!("CARGO_PKG_VERSION"))),
        }
    }
}

impl fmt::Display for GenerationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Run {}", self.run_id)?;
        writeln!(f, "  Seed: {} (bias {})", self.seed, self.bias)?;
        writeln!(
            f,
            "  Zones placed: {}/{}",
            self.placed_zones, self.total_zones
        )?;
        writeln!(f, "  Dead ends: {}", self.dead_ends)?;
        writeln!(f, "  Open sockets: {}", self.open_sockets)?;
        write!(f, "  Remaining budget: {}", self.remaining_budget)?;
        for error in &self.errors {
            write!(f, "\n  Error: {}", error)?;
        }
        Ok(())
    }
}

/// Layout plus report, as returned by a full generation
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub layout: DungeonLayout,
    pub report: GenerationReport,
}

impl GenerationOutcome {
    pub fn to_layout_file(&self) -> LayoutFile {
        self.layout.to_layout_file(self.report.metadata())
    }
}

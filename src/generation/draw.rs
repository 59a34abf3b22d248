//! Biased blueprint draws with early-terminal avoidance

use rand::Rng;

use super::run::GenerationRun;
use crate::blueprints::{ZoneBlueprint, ZoneCatalog};
use crate::core::config::GenerationConfig;
use crate::core::error::{ForgeError, Result};
use crate::core::types::BlueprintIndex;

/// Rules applied when drawing the next blueprint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawPolicy {
    pub avoid_early_terminals: bool,
    pub terminal_retry_limit: u32,
}

impl DrawPolicy {
    pub fn from_config(config: &GenerationConfig) -> Self {
        Self {
            avoid_early_terminals: config.avoid_early_terminals,
            terminal_retry_limit: config.terminal_retry_limit,
        }
    }
}

impl Default for DrawPolicy {
    fn default() -> Self {
        Self::from_config(crate::core::config())
    }
}

/// Offset a uniform draw by the run bias, wrapping into the catalog
#[inline]
pub fn biased_index(raw: usize, bias: usize, len: usize) -> usize {
    (raw % len + bias % len) % len
}

/// Draw the next blueprint for a run.
///
/// While more than half of the budget remains, terminal zones are re-drawn
/// up to `terminal_retry_limit` times, then replaced by a uniform pick over
/// the non-terminal zones. A catalog of only terminals keeps the draw.
pub fn draw_blueprint(run: &mut GenerationRun, policy: &DrawPolicy) -> Result<BlueprintIndex> {
    let avoid_terminal = policy.avoid_early_terminals && run.in_first_half();
    let bias = run.bias();
    let (catalog, rng) = run.catalog_and_rng();

    pick_blueprint(
        catalog,
        bias,
        avoid_terminal,
        policy.terminal_retry_limit,
        |len| rng.gen_range(0..len),
    )
}

/// Draw logic of [`draw_blueprint`] over an explicit source of uniform
/// indices; `uniform(n)` must return a value below `n`.
pub fn pick_blueprint(
    catalog: &ZoneCatalog,
    bias: usize,
    avoid_terminal: bool,
    retry_limit: u32,
    mut uniform: impl FnMut(usize) -> usize,
) -> Result<BlueprintIndex> {
    let len = catalog.len();
    if len == 0 {
        return Err(ForgeError::EmptyCatalog);
    }

    let is_terminal =
        |index: BlueprintIndex| catalog.get(index).is_some_and(ZoneBlueprint::is_terminal);

    let mut index = BlueprintIndex(biased_index(uniform(len), bias, len));
    let mut retries = 0;
    while avoid_terminal && is_terminal(index) {
        if retries == retry_limit {
            let fallback = catalog.non_terminal_indices();
            if fallback.is_empty() {
                tracing::warn!("Only terminal zones in catalog, accepting early terminal");
                return Ok(index);
            }
            let pick = fallback[uniform(fallback.len())];
            tracing::debug!(
                "Terminal draw retried {} times, falling back to {:?}",
                retries,
                pick
            );
            return Ok(pick);
        }
        retries += 1;
        index = BlueprintIndex(biased_index(uniform(len), bias, len));
    }

    Ok(index)
}

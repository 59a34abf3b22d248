//! Per-run generation state

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::blueprints::ZoneCatalog;
use crate::core::types::RunId;

const MINUTES_PER_DAY: u64 = 24 * 60;

/// State shared by every expansion of one dungeon generation.
///
/// A run is inert until [`GenerationRun::start`] is called; after that the
/// catalog, budget and random stream are fixed for its lifetime.
#[derive(Debug, Clone)]
pub struct GenerationRun {
    id: RunId,
    started: bool,
    catalog: ZoneCatalog,
    total_zones: u32,
    remaining: u32,
    seed: u64,
    bias: usize,
    rng: ChaCha8Rng,
}

impl GenerationRun {
    /// Create a run that has not been started
    pub fn new() -> Self {
        Self {
            id: RunId::new(),
            started: false,
            catalog: ZoneCatalog::new(),
            total_zones: 0,
            remaining: 0,
            seed: 0,
            bias: 0,
            rng: ChaCha8Rng::seed_from_u64(0),
        }
    }

    /// Create and start a run in one step
    pub fn started(catalog: ZoneCatalog, total_zones_to_place: u32, seed: Option<u64>) -> Self {
        let mut run = Self::new();
        run.start(catalog, total_zones_to_place, seed);
        run
    }

    /// Initialize the run. Only the first call has any effect.
    ///
    /// `total_zones_to_place` counts the seed module, so the budget starts
    /// one lower. Without an explicit seed the random stream is seeded from
    /// entropy and the draw bias from the minute of the day.
    ///
    /// Returns true if this call initialized the run.
    pub fn start(
        &mut self,
        catalog: ZoneCatalog,
        total_zones_to_place: u32,
        seed: Option<u64>,
    ) -> bool {
        if self.started {
            tracing::debug!("Run {} already started, ignoring start request", self.id);
            return false;
        }

        let (seed, bias) = match seed {
            Some(seed) => (seed, bias_from_seed(seed)),
            None => (rand::random(), bias_from_clock()),
        };

        self.started = true;
        self.catalog = catalog;
        self.total_zones = total_zones_to_place;
        self.remaining = total_zones_to_place.saturating_sub(1);
        self.seed = seed;
        self.bias = bias;
        self.rng = ChaCha8Rng::seed_from_u64(seed);

        tracing::info!(
            "Run {} started: {} zones in catalog, budget {}, seed {}, bias {}",
            self.id,
            self.catalog.len(),
            self.remaining,
            seed,
            bias
        );
        true
    }

    /// Spend one unit of budget; does nothing once the budget is zero.
    ///
    /// Returns true if the budget was decremented.
    pub fn decrement_budget(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }

    /// Whether generation should stop (never-started runs count as exhausted)
    pub fn is_exhausted(&self) -> bool {
        !self.started || self.remaining == 0
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn id(&self) -> RunId {
        self.id
    }

    pub fn catalog(&self) -> &ZoneCatalog {
        &self.catalog
    }

    pub fn total_zones(&self) -> u32 {
        self.total_zones
    }

    pub fn remaining_budget(&self) -> u32 {
        self.remaining
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn bias(&self) -> usize {
        self.bias
    }

    /// True while more than half of the requested zones are still unplaced
    pub fn in_first_half(&self) -> bool {
        u64::from(self.remaining) * 2 > u64::from(self.total_zones)
    }

    pub fn rng_mut(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    /// Borrow the catalog and the random stream at the same time
    pub fn catalog_and_rng(&mut self) -> (&ZoneCatalog, &mut ChaCha8Rng) {
        (&self.catalog, &mut self.rng)
    }
}

impl Default for GenerationRun {
    fn default() -> Self {
        Self::new()
    }
}

/// Bias for seeded runs: fixed per seed so replays match
fn bias_from_seed(seed: u64) -> usize {
    (seed.rotate_left(29) % MINUTES_PER_DAY) as usize
}

/// Bias for unseeded runs: minute of the (UTC) day at run start
fn bias_from_clock() -> usize {
    let minutes = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() / 60)
        .unwrap_or(0);
    (minutes % MINUTES_PER_DAY) as usize
}

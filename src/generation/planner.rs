//! Backtracking placement of zone modules onto open sockets
//!
//! Each expansion draws a blueprint, stages it out of play, and tries its
//! sockets in random order against the open socket it should attach to.
//! The first orientation that clears the collision oracle is accepted and
//! the walk continues from another socket of the new module; if every
//! orientation collides, the candidate is dropped and the socket sealed.

use glam::Vec3;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::blueprints::ZoneBlueprint;
use crate::core::config::GenerationConfig;
use crate::core::error::{ForgeError, Result};
use crate::core::types::{BlueprintIndex, SocketRef};
use crate::spatial::Transform;
use crate::world::{DungeonLayout, ZoneModule};

use super::draw::{draw_blueprint, DrawPolicy};
use super::oracle::{CollisionOracle, PenetrationOracle};
use super::report::{GenerationOutcome, GenerationReport};
use super::run::GenerationRun;

/// What one `attempt_expand` call did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandSummary {
    /// Modules added along the branch
    pub placed: u32,
    /// Sockets sealed along the branch
    pub dead_ends: u32,
    /// Socketless blueprint whose draw ended the branch
    pub socketless: Option<String>,
}

/// The generation engine
#[derive(Debug, Clone)]
pub struct PlacementPlanner<O = PenetrationOracle> {
    oracle: O,
    policy: DrawPolicy,
    shuffle_sockets: bool,
    staging: Transform,
}

impl PlacementPlanner<PenetrationOracle> {
    /// Planner using the exact penetration oracle
    pub fn new(config: &GenerationConfig) -> Self {
        Self::with_oracle(config, PenetrationOracle::from_config(config))
    }
}

impl Default for PlacementPlanner<PenetrationOracle> {
    fn default() -> Self {
        Self::new(crate::core::config())
    }
}

impl<O: CollisionOracle> PlacementPlanner<O> {
    /// Planner with a caller-supplied collision oracle
    pub fn with_oracle(config: &GenerationConfig, oracle: O) -> Self {
        Self {
            oracle,
            policy: DrawPolicy::from_config(config),
            shuffle_sockets: config.shuffle_sockets,
            staging: Transform::from_translation(Vec3::from(config.staging_origin)),
        }
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Place the seed module of a run at `origin`
    pub fn place_seed(
        &self,
        run: &GenerationRun,
        layout: &mut DungeonLayout,
        blueprint_name: &str,
        origin: Transform,
    ) -> Result<SeedPlacement> {
        if !run.is_started() {
            return Err(ForgeError::RunNotStarted);
        }
        let catalog = run.catalog();
        if catalog.is_empty() {
            return Err(ForgeError::EmptyCatalog);
        }
        let index = catalog
            .index_of(blueprint_name)
            .ok_or_else(|| ForgeError::UnknownBlueprint(blueprint_name.to_string()))?;
        let blueprint = catalog
            .get(index)
            .ok_or_else(|| ForgeError::UnknownBlueprint(blueprint_name.to_string()))?;

        let id = layout.next_module_id();
        let module = ZoneModule::instantiate(id, index, blueprint, origin);
        layout.insert(module);
        tracing::debug!("Placed seed module '{}' as {:?}", blueprint.name, id);

        Ok(SeedPlacement {
            socketless: blueprint.sockets.is_empty(),
            name: blueprint.name.clone(),
        })
    }

    /// Grow the layout from one open socket.
    ///
    /// Does nothing if the socket is not open or the run is exhausted.
    /// After a successful placement the walk continues from a random open
    /// socket of the new module until the budget runs out, a dead end is
    /// hit, or the new module has no other open socket.
    ///
    /// Drawing a blueprint without sockets seals the socket being grown and
    /// ends the branch with its name in [`ExpandSummary::socketless`]; the
    /// modules placed before it stay counted. An empty catalog returns
    /// `EmptyCatalog` without touching the layout.
    pub fn attempt_expand(
        &self,
        run: &mut GenerationRun,
        layout: &mut DungeonLayout,
        from: SocketRef,
    ) -> Result<ExpandSummary> {
        let mut summary = ExpandSummary::default();
        let mut next = Some(from);

        while let Some(from) = next.take() {
            if run.is_exhausted() {
                break;
            }
            let Some(target) = layout.socket(from).filter(|s| s.is_open()) else {
                break;
            };
            let (target_position, target_facing) = (target.position, target.facing);

            let index = draw_blueprint(run, &self.policy)?;

            let accepted = {
                let (catalog, rng) = run.catalog_and_rng();
                let blueprint = catalog
                    .get(index)
                    .ok_or_else(|| ForgeError::UnknownBlueprint(format!("{:?}", index)))?;

                if blueprint.sockets.is_empty() {
                    layout.seal(from);
                    summary.dead_ends += 1;
                    summary.socketless = Some(blueprint.name.clone());
                    break;
                }

                self.fit_candidate(
                    blueprint,
                    index,
                    rng,
                    layout,
                    target_position,
                    target_facing,
                )
            };

            match accepted {
                Some((candidate, socket)) => {
                    let id = layout.insert(candidate);
                    let joined = SocketRef::new(id, socket);
                    layout.connect(from, joined);
                    run.decrement_budget();
                    summary.placed += 1;

                    tracing::debug!(
                        "Attached {:?} at {} (budget left {})",
                        index,
                        joined,
                        run.remaining_budget()
                    );

                    if run.is_exhausted() {
                        break;
                    }

                    let open: Vec<usize> = layout
                        .get(id)
                        .map(|m| m.open_sockets().collect())
                        .unwrap_or_default();
                    next = open
                        .choose(run.rng_mut())
                        .map(|&socket| SocketRef::new(id, socket));
                }
                None => {
                    layout.seal(from);
                    summary.dead_ends += 1;
                    tracing::debug!("Dead end at {}: {:?} fits no orientation", from, index);
                }
            }
        }

        Ok(summary)
    }

    /// Stage a candidate and try its sockets against the target socket.
    ///
    /// Returns the snapped module and the index of the socket that fit.
    fn fit_candidate(
        &self,
        blueprint: &ZoneBlueprint,
        index: BlueprintIndex,
        rng: &mut ChaCha8Rng,
        layout: &DungeonLayout,
        target_position: Vec3,
        target_facing: Vec3,
    ) -> Option<(ZoneModule, usize)> {
        let mut candidate =
            ZoneModule::instantiate(layout.next_module_id(), index, blueprint, self.staging);

        let mut order: Vec<usize> = (0..blueprint.sockets.len()).collect();
        if self.shuffle_sockets {
            order.shuffle(rng);
        }

        for socket in order {
            let def = &blueprint.sockets[socket];
            let pose = Transform::snap(def.position, def.facing, target_position, target_facing);
            candidate.apply_transform(blueprint, pose);

            if !self.oracle.overlaps(candidate.solids(), layout) {
                return Some((candidate, socket));
            }
        }

        None
    }

    /// Run a complete generation from a seed module at the origin.
    ///
    /// Expands from the oldest open socket until the budget is spent or no
    /// socket is left open.
    pub fn generate(
        &self,
        run: &mut GenerationRun,
        seed_blueprint: &str,
    ) -> Result<GenerationOutcome> {
        self.generate_at(run, seed_blueprint, Transform::IDENTITY)
    }

    /// Like [`generate`](Self::generate), with the seed module at `origin`
    pub fn generate_at(
        &self,
        run: &mut GenerationRun,
        seed_blueprint: &str,
        origin: Transform,
    ) -> Result<GenerationOutcome> {
        let mut layout = DungeonLayout::new();
        let mut errors = Vec::new();

        let seed = self.place_seed(run, &mut layout, seed_blueprint, origin)?;
        if seed.socketless {
            let error = ForgeError::ModuleWithoutSockets(seed.name);
            tracing::error!("Cannot grow from seed module: {}", error);
            errors.push(error.to_string());
        }

        while !run.is_exhausted() {
            let Some(socket) = layout.first_open_socket() else {
                break;
            };
            match self.attempt_expand(run, &mut layout, socket) {
                Ok(ExpandSummary {
                    socketless: Some(name),
                    ..
                }) => {
                    let error = ForgeError::ModuleWithoutSockets(name);
                    tracing::error!("Branch at {} stopped: {}", socket, error);
                    errors.push(error.to_string());
                }
                Ok(_) => {}
                Err(ForgeError::EmptyCatalog) => return Err(ForgeError::EmptyCatalog),
                Err(e) => {
                    tracing::error!("Branch at {} stopped: {}", socket, e);
                    errors.push(e.to_string());
                }
            }
        }

        let report = GenerationReport::new(run, &layout, errors);
        tracing::info!(
            "Run {} finished: {} zones placed, {} dead ends, budget left {}",
            report.run_id,
            report.placed_zones,
            report.dead_ends,
            report.remaining_budget
        );

        Ok(GenerationOutcome { layout, report })
    }
}

/// Result of placing the seed module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedPlacement {
    pub name: String,
    /// The seed has nothing to grow from
    pub socketless: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprints::{ZoneCatalog, ZoneKind};
    use crate::core::types::ModuleId;
    use crate::spatial::{BoxVolume, OrientedBox};
    use crate::world::SocketState;

    /// 4x4x4 room with a door in the middle of each wall
    fn room(name: &str) -> ZoneBlueprint {
        ZoneBlueprint::new(name, ZoneKind::Room)
            .with_socket("north", Vec3::new(0.0, 0.0, 2.0), Vec3::Z)
            .with_socket("south", Vec3::new(0.0, 0.0, -2.0), Vec3::NEG_Z)
            .with_socket("east", Vec3::new(2.0, 0.0, 0.0), Vec3::X)
            .with_socket("west", Vec3::new(-2.0, 0.0, 0.0), Vec3::NEG_X)
            .with_volume(BoxVolume::solid(Vec3::new(0.0, 2.0, 0.0), Vec3::splat(2.0)))
    }

    fn stub(name: &str) -> ZoneBlueprint {
        ZoneBlueprint::new(name, ZoneKind::Terminal)
            .with_socket("door", Vec3::new(0.0, 0.0, -1.0), Vec3::NEG_Z)
            .with_volume(BoxVolume::solid(Vec3::new(0.0, 1.0, 0.0), Vec3::splat(1.0)))
    }

    struct AlwaysBlocked;

    impl CollisionOracle for AlwaysBlocked {
        fn overlaps(&self, _: &[OrientedBox], _: &DungeonLayout) -> bool {
            true
        }
    }

    #[test]
    fn test_expand_on_unstarted_run_is_noop() {
        let planner = PlacementPlanner::default();
        let mut run = GenerationRun::new();
        let mut layout = DungeonLayout::new();

        let summary = planner
            .attempt_expand(&mut run, &mut layout, SocketRef::new(ModuleId(0), 0))
            .unwrap();
        assert_eq!(summary, ExpandSummary::default());
        assert!(layout.is_empty());
    }

    #[test]
    fn test_attached_module_touches_seed_socket() {
        let catalog = ZoneCatalog::from_blueprints([room("room")]).unwrap();
        let mut run = GenerationRun::started(catalog, 2, Some(8));
        let planner = PlacementPlanner::default();
        let mut layout = DungeonLayout::new();
        planner
            .place_seed(&run, &mut layout, "room", Transform::IDENTITY)
            .unwrap();

        let from = SocketRef::new(ModuleId(0), 0);
        let summary = planner.attempt_expand(&mut run, &mut layout, from).unwrap();

        assert_eq!(summary.placed, 1);
        assert_eq!(layout.len(), 2);
        let SocketState::Connected { to } = layout.socket(from).unwrap().state() else {
            panic!("seed socket should be connected");
        };
        let joined = layout.socket(to).unwrap();
        assert!((joined.position - Vec3::new(0.0, 0.0, 2.0)).length() < 1e-4);
        assert!((joined.facing - Vec3::NEG_Z).length() < 1e-4);
        // The new room sits north of the seed
        let center = layout.get(ModuleId(1)).unwrap().transform().translation;
        assert!((center - Vec3::new(0.0, 0.0, 4.0)).length() < 1e-4);
    }

    #[test]
    fn test_blocked_candidate_seals_socket() {
        let catalog = ZoneCatalog::from_blueprints([room("room")]).unwrap();
        let mut run = GenerationRun::started(catalog, 5, Some(8));
        let planner = PlacementPlanner::with_oracle(&GenerationConfig::default(), AlwaysBlocked);
        let mut layout = DungeonLayout::new();
        planner
            .place_seed(&run, &mut layout, "room", Transform::IDENTITY)
            .unwrap();

        let from = SocketRef::new(ModuleId(0), 2);
        let summary = planner.attempt_expand(&mut run, &mut layout, from).unwrap();

        assert_eq!(summary.dead_ends, 1);
        assert_eq!(layout.len(), 1);
        assert_eq!(run.remaining_budget(), 4);
        assert_eq!(layout.socket(from).unwrap().state(), SocketState::Sealed);

        // Sealed sockets are never expanded again
        let again = planner.attempt_expand(&mut run, &mut layout, from).unwrap();
        assert_eq!(again, ExpandSummary::default());
    }

    #[test]
    fn test_socketless_blueprint_stops_branch() {
        let catalog = ZoneCatalog::from_blueprints([
            room("room"),
            ZoneBlueprint::new("void", ZoneKind::Room),
        ])
        .unwrap();
        let config = GenerationConfig {
            avoid_early_terminals: false,
            ..GenerationConfig::default()
        };
        let planner = PlacementPlanner::new(&config);

        // Find a seed whose first draw lands on the socketless blueprint
        let mut hit = false;
        for seed in 0..64 {
            let mut run = GenerationRun::started(catalog.clone(), 3, Some(seed));
            let mut layout = DungeonLayout::new();
            planner
                .place_seed(&run, &mut layout, "room", Transform::IDENTITY)
                .unwrap();
            let from = SocketRef::new(ModuleId(0), 0);

            let summary = planner
                .attempt_expand(&mut run, &mut layout, from)
                .unwrap();
            // Only the first draw seals the seed's own socket
            if summary.socketless.is_some() && layout.len() == 1 {
                assert_eq!(summary.socketless.as_deref(), Some("void"));
                assert_eq!(summary.placed, 0);
                assert_eq!(summary.dead_ends, 1);
                assert_eq!(layout.socket(from).unwrap().state(), SocketState::Sealed);
                assert_eq!(run.remaining_budget(), 2);
                hit = true;
                break;
            }
        }
        assert!(hit, "no seed drew the socketless blueprint");
    }

    #[test]
    fn test_socketless_draw_mid_branch_keeps_placed_count() {
        let catalog = ZoneCatalog::from_blueprints([
            room("room"),
            ZoneBlueprint::new("void", ZoneKind::Room),
        ])
        .unwrap();
        let config = GenerationConfig {
            avoid_early_terminals: false,
            ..GenerationConfig::default()
        };
        let planner = PlacementPlanner::new(&config);

        let mut hit = false;
        for seed in 0..64 {
            let total = 10;
            let mut run = GenerationRun::started(catalog.clone(), total, Some(seed));
            let mut layout = DungeonLayout::new();
            planner
                .place_seed(&run, &mut layout, "room", Transform::IDENTITY)
                .unwrap();
            let from = SocketRef::new(ModuleId(0), 0);

            let summary = planner
                .attempt_expand(&mut run, &mut layout, from)
                .unwrap();
            if summary.socketless.is_none() || summary.placed == 0 {
                continue;
            }

            assert_eq!(summary.socketless.as_deref(), Some("void"));
            assert_eq!(layout.len() as u32, 1 + summary.placed);
            assert_eq!(run.remaining_budget(), total - 1 - summary.placed);
            assert_eq!(layout.sealed_count(), summary.dead_ends as usize);
            hit = true;
            break;
        }
        assert!(hit, "no branch drew void after a placement");
    }

    #[test]
    fn test_generate_requires_started_run() {
        let planner = PlacementPlanner::default();
        let mut run = GenerationRun::new();
        assert!(matches!(
            planner.generate(&mut run, "room"),
            Err(ForgeError::RunNotStarted)
        ));
    }

    #[test]
    fn test_generate_unknown_seed() {
        let catalog = ZoneCatalog::from_blueprints([room("room")]).unwrap();
        let mut run = GenerationRun::started(catalog, 3, Some(1));
        let result = PlacementPlanner::default().generate(&mut run, "cellar");
        assert!(matches!(result, Err(ForgeError::UnknownBlueprint(_))));
    }

    #[test]
    fn test_generate_with_empty_catalog_aborts() {
        let mut run = GenerationRun::started(ZoneCatalog::new(), 3, Some(1));
        let result = PlacementPlanner::default().generate(&mut run, "room");
        assert!(matches!(result, Err(ForgeError::EmptyCatalog)));
    }

    #[test]
    fn test_single_socket_catalog_places_one_module() {
        let catalog = ZoneCatalog::from_blueprints([stub("stub")]).unwrap();
        let mut run = GenerationRun::started(catalog, 2, Some(3));
        let outcome = PlacementPlanner::default()
            .generate(&mut run, "stub")
            .unwrap();

        assert_eq!(outcome.layout.len(), 2);
        assert_eq!(outcome.report.remaining_budget, 0);
        assert_eq!(outcome.layout.connections().len(), 1);
        assert!(outcome.report.errors.is_empty());
    }
}

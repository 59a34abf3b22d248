//! Property tests for budget accounting and socket bookkeeping

use glam::Vec3;
use proptest::prelude::*;
use zone_forge::blueprints::{ZoneBlueprint, ZoneCatalog, ZoneKind};
use zone_forge::generation::{GenerationRun, PlacementPlanner};
use zone_forge::spatial::{BoxVolume, Transform};
use zone_forge::world::{DungeonLayout, SocketState};

fn catalog() -> ZoneCatalog {
    let room = ZoneBlueprint::new("room", ZoneKind::Room)
        .with_socket("north", Vec3::new(0.0, 0.0, 2.0), Vec3::Z)
        .with_socket("south", Vec3::new(0.0, 0.0, -2.0), Vec3::NEG_Z)
        .with_socket("east", Vec3::new(2.0, 0.0, 0.0), Vec3::X)
        .with_socket("west", Vec3::new(-2.0, 0.0, 0.0), Vec3::NEG_X)
        .with_volume(BoxVolume::solid(Vec3::new(0.0, 2.0, 0.0), Vec3::splat(2.0)));
    let hall = ZoneBlueprint::new("hall", ZoneKind::Corridor)
        .with_socket("front", Vec3::new(0.0, 0.0, 3.0), Vec3::Z)
        .with_socket("back", Vec3::new(0.0, 0.0, -3.0), Vec3::NEG_Z)
        .with_volume(BoxVolume::solid(Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 1.0, 3.0)));
    let end = ZoneBlueprint::new("end", ZoneKind::Terminal)
        .with_socket("mouth", Vec3::new(0.0, 0.0, -1.0), Vec3::NEG_Z)
        .with_volume(BoxVolume::solid(Vec3::new(0.0, 1.0, 0.0), Vec3::splat(1.0)));

    ZoneCatalog::from_blueprints([room, hall, end]).unwrap()
}

proptest! {
    #[test]
    fn budget_never_grows_and_matches_placements(seed in any::<u64>(), total in 1u32..40) {
        let mut run = GenerationRun::started(catalog(), total, Some(seed));
        let planner = PlacementPlanner::default();
        let mut layout = DungeonLayout::new();
        planner
            .place_seed(&run, &mut layout, "room", Transform::IDENTITY)
            .unwrap();

        let mut budget = run.remaining_budget();
        prop_assert_eq!(budget, total - 1);

        while let Some(socket) = layout.first_open_socket() {
            if run.is_exhausted() {
                break;
            }
            let summary = planner
                .attempt_expand(&mut run, &mut layout, socket)
                .unwrap();

            prop_assert!(run.remaining_budget() <= budget);
            prop_assert_eq!(budget - run.remaining_budget(), summary.placed);
            // The chosen socket never stays open after an expansion
            prop_assert!(!layout.is_open(socket));
            budget = run.remaining_budget();
        }

        prop_assert_eq!(layout.len() as u32 - 1, total - 1 - run.remaining_budget());
    }

    #[test]
    fn connections_join_sockets_exactly_once(seed in any::<u64>(), total in 2u32..30) {
        let mut run = GenerationRun::started(catalog(), total, Some(seed));
        let outcome = PlacementPlanner::default()
            .generate(&mut run, "room")
            .unwrap();
        let layout = &outcome.layout;

        for &(a, b) in layout.connections() {
            let forward = layout.socket(a).unwrap().state();
            let backward = layout.socket(b).unwrap().state();
            prop_assert_eq!(forward, SocketState::Connected { to: b });
            prop_assert_eq!(backward, SocketState::Connected { to: a });
        }

        let connected = layout
            .modules()
            .iter()
            .flat_map(|m| m.sockets())
            .filter(|s| matches!(s.state(), SocketState::Connected { .. }))
            .count();
        prop_assert_eq!(connected, layout.connections().len() * 2);
        prop_assert_eq!(layout.connections().len(), layout.len() - 1);
    }

    #[test]
    fn no_terminal_in_first_half(seed in any::<u64>(), total in 2u32..24) {
        let mut run = GenerationRun::started(catalog(), total, Some(seed));
        let outcome = PlacementPlanner::default()
            .generate(&mut run, "room")
            .unwrap();

        for module in outcome.layout.modules().iter().skip(1) {
            let k = module.id.0;
            if (total - k) * 2 > total {
                prop_assert!(!module.kind.is_terminal(), "module {} is terminal", k);
            }
        }
    }
}

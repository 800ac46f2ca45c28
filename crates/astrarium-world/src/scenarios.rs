//! End-to-end behaviour of generation, streaming and discovery together.

use std::collections::HashMap;

use astrarium_core::constants::{CHUNK_SIZE, MAX_CHUNK_COORD};
use astrarium_core::math::world_to_chunk;
use astrarium_core::rng::derive_seed;
use astrarium_core::{Category, GenerationContext, GenerationError, ObjectId, SeededRng};
use astrarium_gen::generators::stellar::generate_star_system;
use astrarium_gen::generators::{draw_slot_position, Pick};
use astrarium_gen::loader::{builtin_generation_config, builtin_type_tables};
use astrarium_gen::{Chunk, ChunkGenerator};
use astrarium_persist::{DiscoveryStore, MemoryStore, UnavailableStore};
use glam::{DVec2, IVec2};

use crate::chunk_map::ChunkMap;
use crate::manager::ChunkManager;

fn generator() -> ChunkGenerator {
    ChunkGenerator::builtin().expect("builtin generator")
}

fn manager(seed: u32) -> ChunkManager {
    ChunkManager::new(
        generator(),
        GenerationContext::new(seed),
        DiscoveryStore::in_memory(),
    )
}

fn sample_coords() -> Vec<IVec2> {
    (0..40)
        .map(|i| IVec2::new(i * 7 - 130, i * 11 - 200))
        .collect()
}

fn ids(chunk: &Chunk) -> Vec<ObjectId> {
    chunk.objects.iter().map(|o| o.id.clone()).collect()
}

#[test]
fn test_determinism_across_seeds_and_coords() {
    let gen = generator();
    for seed in [0, 42, 7_777, u32::MAX] {
        let ctx = GenerationContext::new(seed);
        for coord in sample_coords() {
            let a = gen.generate_chunk(&ctx, coord).expect("chunk");
            let b = gen.generate_chunk(&ctx, coord).expect("chunk");
            assert_eq!(a, b, "seed {seed} chunk {coord} differs between runs");
        }
    }
}

#[test]
fn test_seed_isolation() {
    let gen = generator();
    let a = GenerationContext::new(1);
    let b = GenerationContext::new(2);
    let coords = sample_coords();
    let differing = coords
        .iter()
        .filter(|&&c| {
            gen.generate_chunk(&a, c).expect("chunk") != gen.generate_chunk(&b, c).expect("chunk")
        })
        .count();
    assert!(
        differing * 100 >= coords.len() * 95,
        "only {differing}/{} chunks differ between seeds",
        coords.len()
    );
}

#[test]
fn test_identity_stability_through_manager() {
    let mut m = manager(42);
    m.update_active_chunks(0.0, 0.0).expect("update");
    let coord = IVec2::new(1, 1);
    let loaded = ids(m.get_chunk(coord).expect("loaded"));
    let direct = ids(&m.generate_chunk(coord).expect("chunk"));
    assert_eq!(loaded, direct);
}

#[test]
fn test_discovery_round_trip_through_eviction() {
    let mut m = manager(42);
    m.update_active_chunks(0.0, 0.0).expect("update");
    let (id, coord) = m
        .get_all_active_objects()
        .iter()
        .next()
        .map(|o| (o.id.clone(), world_to_chunk(o.position)))
        .expect("objects near origin");
    assert!(m.mark_loaded_discovered_at(&id, "Orris Veil", 1_000));

    // Move far enough that the original neighborhood is evicted.
    let far = 50.0 * CHUNK_SIZE;
    m.update_active_chunks(far, far).expect("update");
    assert!(m.get_all_active_objects().iter().all(|o| o.id != id));

    // Direct regeneration is undiscovered until restored.
    let mut regenerated = m.generate_chunk(coord).expect("chunk");
    let restored = m.restore_discovery_state(regenerated.objects.iter_mut());
    assert!(restored >= 1);
    let object = regenerated.objects.find(&id).expect("same identity regenerated");
    assert!(object.discovered);
    assert_eq!(object.display_name.as_deref(), Some("Orris Veil"));

    // Streaming back restores it automatically.
    m.update_active_chunks(0.0, 0.0).expect("update");
    let active = m.get_all_active_objects();
    let back = active.iter().find(|o| o.id == id).expect("reloaded");
    assert!(back.discovered);
    assert_eq!(back.display_name.as_deref(), Some("Orris Veil"));
}

#[test]
fn test_eviction_correctness() {
    let mut m = manager(42);
    m.update_active_chunks(0.0, 0.0).expect("update");
    let before: Vec<ObjectId> = m.get_all_active_objects().iter().map(|o| o.id.clone()).collect();

    let far = 100.0 * CHUNK_SIZE;
    let delta = m.update_active_chunks(far, -far).expect("update");
    assert_eq!(delta.evicted.len(), 9);
    assert_eq!(m.chunk_map().loaded_count(), 9);
    for coord in ChunkMap::neighborhood(IVec2::ZERO, 1) {
        assert!(m.get_chunk(coord).is_none(), "chunk {coord} should be evicted");
    }
    let active: Vec<ObjectId> = m.get_all_active_objects().iter().map(|o| o.id.clone()).collect();
    assert!(before.iter().all(|id| !active.contains(id)));

    m.update_active_chunks(0.0, 0.0).expect("update");
    let after: Vec<ObjectId> = m.get_all_active_objects().iter().map(|o| o.id.clone()).collect();
    assert_eq!(before, after, "returning must reproduce the same content");
}

#[test]
fn test_wormhole_twins_link_back_through_manager() {
    let m = manager(42);
    let gen = m.generator();
    let ctx = *m.context();
    let mut checked = 0;
    for y in -12..12 {
        for x in -12..12 {
            let chunk = gen.generate_chunk(&ctx, IVec2::new(x, y)).expect("chunk");
            for wormhole in chunk.objects.get(Category::Wormhole) {
                let (twin, end) = wormhole.wormhole_twin().expect("wormhole payload");
                let twin_chunk = gen
                    .generate_chunk(&ctx, world_to_chunk(twin))
                    .expect("twin chunk");
                let partner = twin_chunk
                    .objects
                    .get(Category::Wormhole)
                    .iter()
                    .find(|w| w.position == twin)
                    .expect("twin chunk holds the partner endpoint");
                let (back, partner_end) = partner.wormhole_twin().expect("wormhole payload");
                assert_eq!(back, wormhole.position, "partner must point back");
                assert_eq!(partner_end, end.other());
                assert_eq!(partner.variant, wormhole.variant);
                checked += 1;
            }
        }
    }
    assert!(checked > 0, "no wormholes in a 24x24 region");
}

#[test]
fn test_star_rarity_distribution() {
    let gen = generator();
    let tables = gen.tables();
    let table = &tables.stars;
    let mut counts: HashMap<String, usize> = HashMap::new();
    let samples = 10_000u32;
    for i in 0..samples {
        let seed = derive_seed(42, i);
        let mut rng = SeededRng::new(seed);
        let coord = IVec2::new(i as i32 % 100, i as i32 / 100);
        let scope = gen.scope(coord);
        let position = draw_slot_position(&mut rng, coord, 0, 1, gen.config().edge_margin);
        let system = generate_star_system(&scope, &mut rng, seed, position, Pick::Roll)
            .expect("star system");
        *counts.entry(system.star.variant).or_default() += 1;
    }
    for variant in &table.variants {
        let observed = counts.get(&variant.name).copied().unwrap_or(0) as f64 / samples as f64;
        // Four standard deviations of a binomial proportion, floored for rare variants.
        let sigma = (variant.rarity * (1.0 - variant.rarity) / samples as f64).sqrt();
        let tolerance = (4.0 * sigma).max(0.005);
        assert!(
            (observed - variant.rarity).abs() <= tolerance,
            "{}: observed {observed:.4}, configured {:.4}",
            variant.name,
            variant.rarity
        );
    }
}

#[test]
fn test_reset_isolation() {
    let mut m = manager(42);
    m.update_active_chunks(0.0, 0.0).expect("update");
    let id = m
        .get_all_active_objects()
        .iter()
        .next()
        .map(|o| o.id.clone())
        .expect("objects");
    m.mark_loaded_discovered_at(&id, "Before", 1);
    let old: Vec<Chunk> = ChunkMap::neighborhood(IVec2::ZERO, 1)
        .into_iter()
        .map(|c| m.generate_chunk(c).expect("chunk"))
        .collect();

    let outcome = m.reset(9_001);
    assert_eq!(outcome.replay.len(), 1, "previous discoveries are handed back");
    assert_eq!(m.chunk_map().loaded_count(), 0);
    assert!(m.discoveries().is_empty(), "new universe starts undiscovered");
    assert_eq!(m.context().reset_count, 1);

    m.update_active_chunks(0.0, 0.0).expect("update");
    let fresh = ChunkMap::neighborhood(IVec2::ZERO, 1)
        .into_iter()
        .filter_map(|c| m.get_chunk(c))
        .zip(&old)
        .filter(|(new, old)| new != old)
        .count();
    assert!(fresh >= 8, "only {fresh}/9 chunks changed after reset");
    assert!(m.get_all_active_objects().iter().all(|o| !o.discovered));
}

#[test]
fn test_seed_42_radius_1_scenario() {
    let mut m = manager(42);
    assert_eq!(m.load_radius(), 1);
    m.update_active_chunks(0.0, 0.0).expect("update");
    let mut loaded = m.chunk_map().sorted_coords();
    loaded.sort_by_key(|c| (c.x, c.y));
    let mut expected = ChunkMap::neighborhood(IVec2::ZERO, 1);
    expected.sort_by_key(|c| (c.x, c.y));
    assert_eq!(loaded, expected);

    let gen = generator();
    let ctx = GenerationContext::new(42);
    let direct: usize = expected
        .iter()
        .map(|&c| gen.generate_chunk(&ctx, c).expect("chunk").objects.stars.len())
        .sum();
    assert_eq!(m.get_all_active_objects().stars.len(), direct);
}

#[test]
fn test_viewpoint_inside_negative_chunk() {
    let mut m = manager(42);
    m.update_active_chunks(-1.0, -1.0).expect("update");
    assert_eq!(m.center(), Some(IVec2::new(-1, -1)));
    assert!(m.get_chunk(IVec2::new(-2, -2)).is_some());
    assert!(m.get_chunk(IVec2::new(1, 1)).is_none());
}

#[test]
fn test_persistence_survives_restart() {
    let handle = MemoryStore::new();
    let fallback = GenerationContext::new(42);
    let id = {
        let mut m = ChunkManager::open(generator(), Box::new(handle.clone()), fallback);
        m.update_active_chunks(0.0, 0.0).expect("update");
        let events = m.scan_discoveries_at(DVec2::new(CHUNK_SIZE * 0.5, CHUNK_SIZE * 0.5), 10);
        let id = m
            .get_all_active_objects()
            .iter()
            .next()
            .map(|o| o.id.clone())
            .expect("objects");
        m.mark_loaded_discovered_at(&id, "Persisted", 11);
        assert!(m.discoveries().len() >= events.len());
        id
    };

    let mut m = ChunkManager::open(generator(), Box::new(handle), fallback);
    assert!(m.discoveries().has(&id));
    m.update_active_chunks(0.0, 0.0).expect("update");
    let active = m.get_all_active_objects();
    let object = active.iter().find(|o| o.id == id).expect("reloaded");
    assert!(object.discovered);
}

#[test]
fn test_persistence_failure_degrades_gracefully() {
    let mut m = ChunkManager::open(generator(), Box::new(UnavailableStore), GenerationContext::new(42));
    m.update_active_chunks(0.0, 0.0).expect("update");
    let events = m.scan_discoveries_at(DVec2::new(CHUNK_SIZE * 0.5, CHUNK_SIZE * 0.5), 1);
    for event in &events {
        assert!(m.discoveries().has(&event.id), "in-memory state is kept");
    }
    let outcome = m.rebirth();
    assert_eq!(outcome.replay.len(), events.len());
}

#[test]
fn test_far_viewpoint_loads_edge_neighborhood() {
    let mut m = manager(42);
    let delta = m.update_active_chunks(1.0e20, 0.0).expect("far update");
    assert_eq!(delta.loaded.len(), 9);
    assert_eq!(m.center(), Some(IVec2::new(MAX_CHUNK_COORD, 0)));

    let delta = m.update_active_chunks(-1.0e300, 1.0e300).expect("far update");
    assert_eq!(delta.evicted.len(), 9);
    assert_eq!(m.chunk_map().loaded_count(), 9);
    assert_eq!(m.center(), Some(IVec2::new(-MAX_CHUNK_COORD, MAX_CHUNK_COORD)));
}

#[test]
fn test_generation_failure_leaves_chunk_unloaded() {
    let mut tables = builtin_type_tables().expect("tables");
    tables.stars.base_radius = 1.0e308;
    let config = builtin_generation_config().expect("config");
    let gen = ChunkGenerator::new(tables, config).expect("finite base radius is accepted");
    let mut m = ChunkManager::new(gen, GenerationContext::new(42), DiscoveryStore::in_memory());

    let err = m.update_active_chunks(0.0, 0.0).expect_err("oversized star radius");
    let GenerationError::NonFinite { category, coord, .. } = err else {
        panic!("expected NonFinite, got {err:?}");
    };
    assert_eq!(category, Category::Star);
    assert!(m.get_chunk(coord).is_none(), "failing chunk must stay unloaded");
    assert!(m.chunk_map().loaded_count() < 9);
    for (_, chunk) in m.chunk_map().iter() {
        assert!(chunk.objects.stars.is_empty(), "{} loaded with a star", chunk.coord);
    }
}

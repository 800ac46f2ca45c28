//! Debug spawning of objects into a running manager.
//!
//! Input is validated and the objects are fully generated before anything is
//! injected, so a rejected request leaves the manager untouched.

use std::f64::consts::TAU;

use astrarium_core::constants::CHUNK_SIZE;
use astrarium_core::math::{chunk_to_cell, world_to_chunk};
use astrarium_core::rng::{derive_seed, hash_coords, SPAWN_SALT};
use astrarium_core::types::WorldPos;
use astrarium_core::{Category, GenerationError, ObjectId, SeededRng};
use astrarium_gen::generators::phenomena::generate_phenomenon;
use astrarium_gen::generators::stellar::{generate_moon, generate_planet, generate_star_system, OrbitSlot};
use astrarium_gen::generators::Pick;
use astrarium_gen::wormhole::{materialize_pair, PairPlan};
use astrarium_gen::{CelestialObject, TypeTable};
use astrarium_world::ChunkManager;
use glam::DVec2;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpawnError {
    #[error("unknown category '{0}'")]
    UnknownCategory(String),
    #[error("unknown {category} variant '{name}' (expected one of: {known})")]
    UnknownVariant {
        category: Category,
        name: String,
        known: String,
    },
    #[error("no loaded {parent} to attach a {category} to")]
    NoParent { category: Category, parent: Category },
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Resolve a variant name against a table. `None` rolls normally.
fn resolve_pick(table: &TypeTable, category: Category, variant: Option<&str>) -> Result<Pick, SpawnError> {
    match variant {
        None => Ok(Pick::Roll),
        Some(name) => table
            .find(name)
            .map(|(index, _)| Pick::Forced(index))
            .ok_or_else(|| SpawnError::UnknownVariant {
                category,
                name: name.to_string(),
                known: table.names().collect::<Vec<_>>().join(", "),
            }),
    }
}

/// Nearest loaded object of `category` to `position`.
fn nearest(manager: &ChunkManager, category: Category, position: WorldPos) -> Option<CelestialObject> {
    manager
        .get_all_active_objects()
        .get(category)
        .iter()
        .min_by(|a, b| {
            a.position
                .distance(position)
                .total_cmp(&b.position.distance(position))
        })
        .map(|o| (*o).clone())
}

/// Sibling usage counts for children of `parent`, indexed like `table`.
fn sibling_usage(manager: &ChunkManager, table: &TypeTable, category: Category, parent: &ObjectId) -> Vec<u32> {
    let mut used = vec![0u32; table.variants.len()];
    for sibling in manager.get_all_active_objects().get(category) {
        if sibling.parent() == Some(parent) {
            if let Some((index, _)) = table.find(&sibling.variant) {
                used[index] += 1;
            }
        }
    }
    used
}

fn orbit_slot_towards(rng: &mut SeededRng, center: WorldPos, position: WorldPos, speed: (f64, f64)) -> OrbitSlot {
    let offset = position - center;
    OrbitSlot {
        distance: offset.length(),
        angle: offset.y.atan2(offset.x),
        speed: rng.next_float(speed.0, speed.1),
    }
}

/// Generate objects of `category_tag` at `position` and inject them.
///
/// Stars spawn with their planets and moons, wormholes as a linked pair, and
/// planets and moons attach to the nearest loaded star or planet. Returns the
/// identities of every injected object.
pub fn spawn_object(
    manager: &mut ChunkManager,
    category_tag: &str,
    variant: Option<&str>,
    position: WorldPos,
) -> Result<Vec<ObjectId>, SpawnError> {
    let category = Category::from_tag(category_tag)
        .ok_or_else(|| SpawnError::UnknownCategory(category_tag.to_string()))?;
    let objects = build(manager, category, variant, position)?;

    let mut ids = Vec::with_capacity(objects.len());
    for object in objects {
        ids.push(manager.inject_object(object)?);
    }
    log::info!(
        "Spawned {} {} object(s) at ({:.0}, {:.0})",
        ids.len(),
        category,
        position.x,
        position.y
    );
    Ok(ids)
}

fn build(
    manager: &ChunkManager,
    category: Category,
    variant: Option<&str>,
    position: WorldPos,
) -> Result<Vec<CelestialObject>, SpawnError> {
    let generator = manager.generator();
    let tables = generator.tables();
    let config = generator.config();
    let pick = resolve_pick(tables.table(category), category, variant)?;

    let base = hash_coords(
        manager.context().seed,
        position.x.floor() as i32,
        position.y.floor() as i32,
    );
    let seed = derive_seed(base, SPAWN_SALT + category.index());
    let mut rng = SeededRng::new(seed);
    let scope = generator.scope(world_to_chunk(position));

    let objects = match category {
        Category::Star => {
            let system = generate_star_system(&scope, &mut rng, seed, position, pick)?;
            let mut objects = vec![system.star];
            objects.extend(system.planets);
            objects.extend(system.moons);
            objects
        }
        Category::Planet => {
            let star = nearest(manager, Category::Star, position).ok_or(SpawnError::NoParent {
                category,
                parent: Category::Star,
            })?;
            let slot = orbit_slot_towards(&mut rng, star.position, position, config.planet_orbit_speed);
            let mut used = sibling_usage(manager, &tables.planets, Category::Planet, &star.id);
            let (planet, moons) = generate_planet(
                &scope,
                seed,
                &star.id,
                star.position,
                star.radius,
                slot,
                &mut used,
                pick,
            )?;
            let mut objects = vec![planet];
            objects.extend(moons);
            objects
        }
        Category::Moon => {
            let planet = nearest(manager, Category::Planet, position).ok_or(SpawnError::NoParent {
                category,
                parent: Category::Planet,
            })?;
            let slot = orbit_slot_towards(&mut rng, planet.position, position, config.moon_orbit_speed);
            let mut used = sibling_usage(manager, &tables.moons, Category::Moon, &planet.id);
            vec![generate_moon(
                &scope,
                seed,
                &planet.id,
                planet.position,
                planet.radius,
                slot,
                &mut used,
                pick,
            )?]
        }
        Category::Wormhole => {
            let reach = CHUNK_SIZE * rng.next_float(1.5, 3.0);
            let beta_position = position + DVec2::from_angle(rng.next_float(0.0, TAU)) * reach;
            let alpha_chunk = world_to_chunk(position);
            let plan = PairPlan {
                cell: chunk_to_cell(alpha_chunk, config.wormhole_cell_size),
                alpha_chunk,
                beta_chunk: world_to_chunk(beta_position),
                alpha_position: position,
                beta_position,
            };
            materialize_pair(&scope, &mut rng, &plan, pick)?.into()
        }
        _ => vec![generate_phenomenon(&scope, category, &mut rng, position, pick)?],
    };
    Ok(objects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    fn manager() -> ChunkManager {
        let mut m = ChunkManager::with_defaults().expect("manager");
        m.update_active_chunks(0.0, 0.0).expect("update");
        m
    }

    fn snapshot(m: &ChunkManager) -> Vec<ObjectId> {
        m.get_all_active_objects().iter().map(|o| o.id.clone()).collect()
    }

    #[test]
    fn test_unknown_category_rejected_without_mutation() {
        let mut m = manager();
        let before = snapshot(&m);
        let err = spawn_object(&mut m, "quasar", None, DVec2::new(10.0, 10.0));
        assert!(matches!(err, Err(SpawnError::UnknownCategory(_))));
        assert_eq!(snapshot(&m), before);
    }

    #[test]
    fn test_unknown_variant_rejected_without_mutation() {
        let mut m = manager();
        let before = snapshot(&m);
        let err = spawn_object(&mut m, "nebula", Some("Plaid"), DVec2::new(10.0, 10.0));
        match err {
            Err(SpawnError::UnknownVariant { category, known, .. }) => {
                assert_eq!(category, Category::Nebula);
                assert!(!known.is_empty(), "error lists the valid names");
            }
            other => panic!("expected UnknownVariant, got {other:?}"),
        }
        assert_eq!(snapshot(&m), before);
    }

    #[test]
    fn test_spawn_named_phenomenon() {
        let mut m = manager();
        let position = DVec2::new(555.0, 777.0);
        let ids = spawn_object(&mut m, "black_hole", Some("supermassive"), position).expect("spawn");
        assert_eq!(ids.len(), 1);
        let active = m.get_all_active_objects();
        let hole = active.iter().find(|o| o.id == ids[0]).expect("injected");
        assert_eq!(hole.variant, "Supermassive");
        assert_eq!(hole.position, position);
        assert!(m.black_hole_collision(position).is_some());
    }

    #[test]
    fn test_spawn_star_brings_system() {
        let mut m = manager();
        let ids = spawn_object(&mut m, "star", None, DVec2::new(1000.0, 1000.0)).expect("spawn");
        assert_eq!(ids[0].category, Category::Star);
        let star = m
            .get_all_active_objects()
            .iter()
            .find(|o| o.id == ids[0])
            .cloned()
            .expect("star injected");
        let planets = ids.iter().filter(|id| id.category == Category::Planet).count();
        assert!(matches!(star.body, astrarium_gen::Body::Star { planet_count } if planet_count as usize == planets));
    }

    #[test]
    fn test_spawn_wormhole_pair_links() {
        let mut m = manager();
        let ids = spawn_object(&mut m, "wormhole", Some("Stable"), DVec2::new(300.0, 300.0)).expect("spawn");
        assert_eq!(ids.len(), 2);
        let active = m.get_all_active_objects();
        let ends: Vec<_> = ids
            .iter()
            .map(|id| active.iter().find(|o| &o.id == id).expect("injected"))
            .collect();
        let (twin_a, _) = ends[0].wormhole_twin().expect("wormhole");
        let (twin_b, _) = ends[1].wormhole_twin().expect("wormhole");
        assert_eq!(twin_a, ends[1].position);
        assert_eq!(twin_b, ends[0].position);
    }

    #[test]
    fn test_spawn_planet_needs_loaded_star() {
        let mut m = ChunkManager::with_defaults().expect("manager");
        let err = spawn_object(&mut m, "planet", None, DVec2::ZERO);
        assert!(matches!(err, Err(SpawnError::NoParent { .. })));

        spawn_object(&mut m, "star", None, DVec2::new(1000.0, 1000.0)).expect("star");
        let ids = spawn_object(&mut m, "planet", Some("Ocean"), DVec2::new(1400.0, 1000.0))
            .expect("planet");
        let planet = m
            .get_all_active_objects()
            .iter()
            .find(|o| o.id == ids[0])
            .cloned()
            .expect("planet injected");
        assert_eq!(planet.variant, "Ocean");
        assert!(planet.parent().is_some());
    }

    #[test]
    fn test_spawn_restores_discovery() {
        let mut m = manager();
        let position = DVec2::new(900.0, 900.0);
        let ids = spawn_object(&mut m, "comet", None, position).expect("spawn");
        assert!(m.mark_loaded_discovered_at(&ids[0], "Returning", 1));
        let again = spawn_object(&mut m, "comet", None, position).expect("respawn");
        assert_eq!(again, ids, "same position and seed give the same identity");
        let comet = m
            .get_all_active_objects()
            .iter()
            .find(|o| o.id == ids[0])
            .cloned()
            .expect("comet");
        assert!(comet.discovered);
        assert_eq!(comet.display_name.as_deref(), Some("Returning"));
    }
}

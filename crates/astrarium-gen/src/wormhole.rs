//! Linked wormhole pairs.
//!
//! The chunk plane is split into square cells of `wormhole_cell_size` chunks.
//! Each cell rolls at most one pair from its own stream, placing the alpha and
//! beta endpoints in two distinct chunks of the cell. Either chunk can rebuild
//! both endpoints from the cell stream alone, so the beta never rolls on its
//! own and the twins always point at each other.

use astrarium_core::math::{cell_slot_to_chunk, chunk_to_cell, floor_anchor};
use astrarium_core::rng::{derive_seed, hash_coords, WORMHOLE_SALT};
use astrarium_core::types::{CellCoord, ChunkCoord, WorldPos};
use astrarium_core::{Category, GenerationError, ObjectId, SeededRng};

use crate::generators::{draw_common, draw_local_position, ensure_finite, Drawn, Pick, Scope};
use crate::object::{Body, CelestialObject, WormholeEnd};

/// Both endpoints of a pair, before materialization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairPlan {
    pub cell: CellCoord,
    pub alpha_chunk: ChunkCoord,
    pub beta_chunk: ChunkCoord,
    pub alpha_position: WorldPos,
    pub beta_position: WorldPos,
}

fn cell_stream(seed: u32, cell: CellCoord) -> SeededRng {
    SeededRng::new(derive_seed(hash_coords(seed, cell.x, cell.y), WORMHOLE_SALT))
}

/// Roll the pair plan of a cell. `None` when the cell has no pair.
fn plan_from_stream(
    scope: &Scope<'_>,
    rng: &mut SeededRng,
    cell: CellCoord,
) -> Option<PairPlan> {
    let config = scope.config;
    if !rng.chance(config.wormhole_pair_chance) {
        return None;
    }
    let size = config.wormhole_cell_size;
    let slots = (size * size) as i64;
    let alpha_slot = rng.next_int(0, slots);
    let offset = rng.next_int(1, slots);
    let beta_slot = (alpha_slot + offset) % slots;
    let alpha_chunk = cell_slot_to_chunk(cell, size, alpha_slot as u32);
    let beta_chunk = cell_slot_to_chunk(cell, size, beta_slot as u32);
    let alpha_position = draw_local_position(rng, alpha_chunk, config.edge_margin);
    let beta_position = draw_local_position(rng, beta_chunk, config.edge_margin);
    Some(PairPlan {
        cell,
        alpha_chunk,
        beta_chunk,
        alpha_position,
        beta_position,
    })
}

/// The pair plan of the cell containing `coord`, if the cell has one.
pub fn cell_plan(scope: &Scope<'_>, seed: u32, coord: ChunkCoord) -> Option<PairPlan> {
    let cell = chunk_to_cell(coord, scope.config.wormhole_cell_size);
    plan_from_stream(scope, &mut cell_stream(seed, cell), cell)
}

/// Build both endpoints from a plan, continuing on `rng` after the plan draws:
/// the alpha's variant and attributes, the beta's attributes, then the pair
/// id. Both endpoints share the variant selected for the alpha.
pub fn materialize_pair(
    scope: &Scope<'_>,
    rng: &mut SeededRng,
    plan: &PairPlan,
    pick: Pick,
) -> Result<[CelestialObject; 2], GenerationError> {
    let table = &scope.tables.wormholes;
    let alpha = draw_common(rng, table, Category::Wormhole, pick, |_, _| true)?;
    let beta = draw_common(
        rng,
        table,
        Category::Wormhole,
        Pick::Forced(alpha.index),
        |_, _| true,
    )?;
    let pair_id = rng.next_u32();

    let endpoint = |drawn: Drawn<'_>, end: WormholeEnd| {
        let (position, twin, twin_chunk) = match end {
            WormholeEnd::Alpha => (plan.alpha_position, plan.beta_position, plan.beta_chunk),
            WormholeEnd::Beta => (plan.beta_position, plan.alpha_position, plan.alpha_chunk),
        };
        drawn.into_object(
            Category::Wormhole,
            ObjectId::anchored(Category::Wormhole, floor_anchor(position)),
            position,
            Body::Wormhole {
                designation: end,
                twin,
                twin_chunk,
                pair_id,
            },
        )
    };
    let pair = [
        endpoint(alpha, WormholeEnd::Alpha),
        endpoint(beta, WormholeEnd::Beta),
    ];
    for end in &pair {
        ensure_finite(end, scope.coord)?;
    }
    Ok(pair)
}

/// Wormhole endpoints owned by `coord`: zero or one per chunk.
pub fn wormholes_for_chunk(
    scope: &Scope<'_>,
    seed: u32,
    coord: ChunkCoord,
) -> Result<Vec<CelestialObject>, GenerationError> {
    let cell = chunk_to_cell(coord, scope.config.wormhole_cell_size);
    let mut rng = cell_stream(seed, cell);
    let plan = match plan_from_stream(scope, &mut rng, cell) {
        Some(plan) if plan.alpha_chunk == coord || plan.beta_chunk == coord => plan,
        _ => return Ok(Vec::new()),
    };
    let [alpha, beta] = materialize_pair(scope, &mut rng, &plan, Pick::Roll)?;
    let owned = if plan.alpha_chunk == coord { alpha } else { beta };
    Ok(vec![owned])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{builtin_generation_config, builtin_type_tables};
    use astrarium_core::math::world_to_chunk;
    use glam::IVec2;

    #[test]
    fn test_pairs_link_back() {
        let tables = builtin_type_tables().expect("tables");
        let config = builtin_generation_config().expect("config");
        let mut found = 0;
        for cx in -12..12 {
            for cy in -12..12 {
                let coord = IVec2::new(cx, cy);
                let scope = Scope {
                    tables: &tables,
                    config: &config,
                    coord,
                };
                for hole in wormholes_for_chunk(&scope, 42, coord).expect("gen") {
                    found += 1;
                    let (twin, end) = hole.wormhole_twin().expect("wormhole twin");
                    let twin_coord = world_to_chunk(twin);
                    assert_ne!(twin_coord, coord, "twin in the same chunk");
                    let twin_scope = Scope {
                        coord: twin_coord,
                        ..scope
                    };
                    let partners = wormholes_for_chunk(&twin_scope, 42, twin_coord).expect("gen");
                    assert_eq!(partners.len(), 1, "twin chunk has no endpoint");
                    let partner = &partners[0];
                    let (back, partner_end) = partner.wormhole_twin().expect("partner twin");
                    assert_eq!(back, hole.position, "twin does not point back");
                    assert_eq!(partner_end, end.other());
                    assert_eq!(partner.variant, hole.variant);
                }
            }
        }
        assert!(found > 0, "no wormholes in a 24x24 region");
    }

    #[test]
    fn test_pair_id_drawn_after_variant() {
        let tables = builtin_type_tables().expect("tables");
        let config = builtin_generation_config().expect("config");
        let scope = Scope {
            tables: &tables,
            config: &config,
            coord: IVec2::ZERO,
        };
        let (cell, plan) = (0..200)
            .map(|x| IVec2::new(x * 6, 0))
            .find_map(|coord| {
                let cell = chunk_to_cell(coord, 6);
                cell_plan(&scope, 42, coord).map(|plan| (cell, plan))
            })
            .expect("some cell in 200 has a pair");

        // Replay the cell stream: plan draws, both endpoints, then the id.
        let mut rng = cell_stream(42, cell);
        plan_from_stream(&scope, &mut rng, cell).expect("same plan");
        let table = &tables.wormholes;
        let alpha = draw_common(&mut rng, table, Category::Wormhole, Pick::Roll, |_, _| true)
            .expect("alpha");
        draw_common(&mut rng, table, Category::Wormhole, Pick::Forced(alpha.index), |_, _| true)
            .expect("beta");
        let expected_id = rng.next_u32();

        let mut rng = cell_stream(42, cell);
        plan_from_stream(&scope, &mut rng, cell).expect("same plan");
        let [end, _] = materialize_pair(&scope, &mut rng, &plan, Pick::Roll).expect("pair");
        assert!(matches!(end.body, Body::Wormhole { pair_id, .. } if pair_id == expected_id));
    }

    #[test]
    fn test_alpha_and_beta_in_same_cell() {
        let tables = builtin_type_tables().expect("tables");
        let config = builtin_generation_config().expect("config");
        let scope = Scope {
            tables: &tables,
            config: &config,
            coord: IVec2::ZERO,
        };
        for seed in 0..200 {
            if let Some(plan) = cell_plan(&scope, seed, IVec2::ZERO) {
                assert_ne!(plan.alpha_chunk, plan.beta_chunk);
                assert_eq!(chunk_to_cell(plan.alpha_chunk, 6), plan.cell);
                assert_eq!(chunk_to_cell(plan.beta_chunk, 6), plan.cell);
                assert_eq!(world_to_chunk(plan.alpha_position), plan.alpha_chunk);
                assert_eq!(world_to_chunk(plan.beta_position), plan.beta_chunk);
            }
        }
    }
}

//! Star systems: a star, its planets and their moons.

use std::f64::consts::TAU;

use astrarium_core::math::floor_anchor;
use astrarium_core::rng::{derive_seed, CHILD_SALT};
use astrarium_core::types::WorldPos;
use astrarium_core::{Category, GenerationError, ObjectId, SeededRng};

use super::{draw_common, draw_count, ensure_finite, Pick, Scope};
use crate::object::{Body, CelestialObject, Orbit};
use crate::tables::VariantDef;

/// Orbital parameters drawn by a parent for one child.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitSlot {
    pub distance: f64,
    pub angle: f64,
    pub speed: f64,
}

/// A star with everything orbiting it, in generation order.
#[derive(Debug, Clone)]
pub struct StarSystem {
    pub star: CelestialObject,
    pub planets: Vec<CelestialObject>,
    pub moons: Vec<CelestialObject>,
}

/// Draw `count` orbit slots from the parent stream. Distances start at
/// `start` and grow by one gap per child.
pub fn draw_orbit_slots(
    rng: &mut SeededRng,
    count: u32,
    start: f64,
    gap: (f64, f64),
    speed: (f64, f64),
) -> Vec<OrbitSlot> {
    let mut distance = start;
    (0..count)
        .map(|_| {
            let gap = rng.next_float(gap.0, gap.1);
            let angle = rng.next_float(0.0, TAU);
            let speed = rng.next_float(speed.0, speed.1);
            distance += gap;
            OrbitSlot {
                distance,
                angle,
                speed,
            }
        })
        .collect()
}

/// Whether a variant may still be used given sibling usage counts.
pub fn sibling_allows(used: &[u32], index: usize, variant: &VariantDef) -> bool {
    variant
        .max_per_parent
        .map_or(true, |max| used.get(index).copied().unwrap_or(0) < max)
}

fn record_use(used: &mut [u32], index: usize) {
    if let Some(count) = used.get_mut(index) {
        *count += 1;
    }
}

/// Generate a star at `position` and its full hierarchy.
///
/// `rng` is the system stream, already advanced past the position draw.
/// Children run on sub-streams of `seed`.
pub fn generate_star_system(
    scope: &Scope<'_>,
    rng: &mut SeededRng,
    seed: u32,
    position: WorldPos,
    pick: Pick,
) -> Result<StarSystem, GenerationError> {
    let config = scope.config;
    let drawn = draw_common(rng, &scope.tables.stars, Category::Star, pick, |_, _| true)?;
    let planet_count = draw_count(rng, drawn.variant.satellites);
    let slots = draw_orbit_slots(
        rng,
        planet_count,
        drawn.radius + config.orbit_clearance,
        config.planet_orbit_gap,
        config.planet_orbit_speed,
    );

    let star_radius = drawn.radius;
    let star_id = ObjectId::anchored(Category::Star, floor_anchor(position));
    let star = drawn.into_object(
        Category::Star,
        star_id.clone(),
        position,
        Body::Star { planet_count },
    );
    ensure_finite(&star, scope.coord)?;

    let mut planets = Vec::with_capacity(slots.len());
    let mut moons = Vec::new();
    let mut used = vec![0u32; scope.tables.planets.variants.len()];
    for (i, slot) in slots.into_iter().enumerate() {
        let child_seed = derive_seed(seed, CHILD_SALT + i as u32);
        let (planet, planet_moons) = generate_planet(
            scope,
            child_seed,
            &star_id,
            position,
            star_radius,
            slot,
            &mut used,
            Pick::Roll,
        )?;
        planets.push(planet);
        moons.extend(planet_moons);
    }

    Ok(StarSystem {
        star,
        planets,
        moons,
    })
}

/// Generate one planet and its moons on the planet's own stream.
#[allow(clippy::too_many_arguments)]
pub fn generate_planet(
    scope: &Scope<'_>,
    seed: u32,
    star_id: &ObjectId,
    star_position: WorldPos,
    star_radius: f64,
    slot: OrbitSlot,
    used: &mut [u32],
    pick: Pick,
) -> Result<(CelestialObject, Vec<CelestialObject>), GenerationError> {
    let config = scope.config;
    let mut rng = SeededRng::new(seed);
    let drawn = draw_common(
        &mut rng,
        &scope.tables.planets,
        Category::Planet,
        pick,
        |i, v| sibling_allows(used, i, v),
    )?;
    record_use(used, drawn.index);

    let moon_count = draw_count(&mut rng, drawn.variant.satellites);
    let moon_slots = draw_orbit_slots(
        &mut rng,
        moon_count,
        drawn.radius + config.orbit_clearance,
        config.moon_orbit_gap,
        config.moon_orbit_speed,
    );

    let distance = slot
        .distance
        .max(star_radius + drawn.radius + config.orbit_clearance);
    let orbit = Orbit {
        parent: star_id.clone(),
        center: star_position,
        distance,
        angle: slot.angle,
        speed: slot.speed,
    };
    let position = orbit.position();
    let planet_radius = drawn.radius;
    let planet_id = ObjectId::orbiting(Category::Planet, star_id, distance);
    let planet = drawn.into_object(
        Category::Planet,
        planet_id.clone(),
        position,
        Body::Planet { orbit, moon_count },
    );
    ensure_finite(&planet, scope.coord)?;

    let mut moon_used = vec![0u32; scope.tables.moons.variants.len()];
    let moons = moon_slots
        .into_iter()
        .enumerate()
        .map(|(j, moon_slot)| {
            generate_moon(
                scope,
                derive_seed(seed, CHILD_SALT + j as u32),
                &planet_id,
                position,
                planet_radius,
                moon_slot,
                &mut moon_used,
                Pick::Roll,
            )
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok((planet, moons))
}

/// Generate one moon on its own stream.
#[allow(clippy::too_many_arguments)]
pub fn generate_moon(
    scope: &Scope<'_>,
    seed: u32,
    planet_id: &ObjectId,
    planet_position: WorldPos,
    planet_radius: f64,
    slot: OrbitSlot,
    used: &mut [u32],
    pick: Pick,
) -> Result<CelestialObject, GenerationError> {
    let mut rng = SeededRng::new(seed);
    let drawn = draw_common(
        &mut rng,
        &scope.tables.moons,
        Category::Moon,
        pick,
        |i, v| sibling_allows(used, i, v),
    )?;
    record_use(used, drawn.index);

    let distance = slot
        .distance
        .max(planet_radius + drawn.radius + scope.config.orbit_clearance);
    let orbit = Orbit {
        parent: planet_id.clone(),
        center: planet_position,
        distance,
        angle: slot.angle,
        speed: slot.speed,
    };
    let position = orbit.position();
    let moon = drawn.into_object(
        Category::Moon,
        ObjectId::orbiting(Category::Moon, planet_id, distance),
        position,
        Body::Moon { orbit },
    );
    ensure_finite(&moon, scope.coord)?;
    Ok(moon)
}

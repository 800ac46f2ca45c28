//! Single-object categories: everything that is neither part of a star
//! system nor a wormhole pair.

use std::f64::consts::TAU;

use astrarium_core::constants::{BLACK_HOLE_PULL_RANGE, EVENT_HORIZON_FRACTION};
use astrarium_core::math::floor_anchor;
use astrarium_core::types::WorldPos;
use astrarium_core::{Category, GenerationError, ObjectId, SeededRng};

use super::{draw_common, draw_count, ensure_finite, Pick, Scope};
use crate::object::{Body, CelestialObject, CometPath};

/// Categories rolled once per chunk, in draw order.
pub const PHENOMENA: [Category; 8] = [
    Category::Nebula,
    Category::AsteroidGarden,
    Category::BlackHole,
    Category::Comet,
    Category::Protostar,
    Category::RoguePlanet,
    Category::DarkNebula,
    Category::CrystalGarden,
];

pub fn is_phenomenon(category: Category) -> bool {
    PHENOMENA.contains(&category)
}

/// Generate a single-object category at `position`.
///
/// Comets treat `position` as the centre of their path; their identity is
/// anchored there while the body itself starts somewhere along the path.
pub fn generate_phenomenon(
    scope: &Scope<'_>,
    category: Category,
    rng: &mut SeededRng,
    position: WorldPos,
    pick: Pick,
) -> Result<CelestialObject, GenerationError> {
    if !is_phenomenon(category) {
        return Err(GenerationError::UnsupportedCategory(category));
    }

    let table = scope.tables.table(category);
    let drawn = draw_common(rng, table, category, pick, |_, _| true)?;
    let radius = drawn.radius;
    let palette = &drawn.variant.palette;
    let members = drawn.variant.satellites;
    let id = ObjectId::anchored(category, floor_anchor(position));

    let mut placed = position;
    let body = match category {
        Category::Nebula => {
            let extent = radius * rng.next_float(1.0, 1.6);
            let cloud_count = rng.next_int(4, 10) as u32;
            let secondary_color = rng
                .choice(palette)
                .cloned()
                .unwrap_or_else(|| drawn.color.clone());
            Body::Nebula {
                extent,
                cloud_count,
                secondary_color,
            }
        }
        Category::AsteroidGarden => {
            let spread = radius * rng.next_float(0.8, 1.3);
            let rock_count = draw_count(rng, members);
            Body::AsteroidGarden { rock_count, spread }
        }
        Category::BlackHole => Body::BlackHole {
            event_horizon: radius * EVENT_HORIZON_FRACTION,
            pull_radius: radius * BLACK_HOLE_PULL_RANGE,
            pull_strength: rng.next_float(40.0, 90.0) * drawn.variant.size,
            spin: rng.next_float(0.2, 1.0),
        },
        Category::Comet => {
            let semi_major = rng.next_float(scope.config.comet_path.0, scope.config.comet_path.1);
            let path = CometPath {
                center: position,
                semi_major,
                semi_minor: semi_major * rng.next_float(0.3, 0.7),
                rotation: rng.next_float(0.0, TAU),
                phase: rng.next_float(0.0, TAU),
                speed: rng.next_float(scope.config.comet_speed.0, scope.config.comet_speed.1),
            };
            placed = path.position();
            Body::Comet {
                tail_length: radius * rng.next_float(6.0, 12.0),
                path,
            }
        }
        Category::Protostar => Body::Protostar {
            disk_radius: radius * rng.next_float(1.8, 3.0),
            accretion_rate: rng.next_float(0.1, 1.0),
        },
        Category::RoguePlanet => Body::RoguePlanet {
            tumble_speed: rng.next_float(0.05, 0.3),
        },
        Category::DarkNebula => Body::DarkNebula {
            extent: radius * rng.next_float(1.0, 1.5),
            opacity: rng.next_float(0.5, 0.9),
        },
        Category::CrystalGarden => {
            let spread = radius * rng.next_float(0.7, 1.2);
            let crystal_count = draw_count(rng, members);
            Body::CrystalGarden {
                crystal_count,
                spread,
            }
        }
        Category::Star | Category::Planet | Category::Moon | Category::Wormhole => {
            return Err(GenerationError::UnsupportedCategory(category));
        }
    };

    let object = drawn.into_object(category, id, placed, body);
    ensure_finite(&object, scope.coord)?;
    Ok(object)
}

//! Per-category object generators.
//!
//! Every generator reads from a caller-supplied stream in a fixed order:
//! variant roll, size, color, ring draw, pulse, glow, then category extras,
//! then satellites. Changing that order changes every generated universe.

pub mod phenomena;
pub mod stellar;

use astrarium_core::constants::CHUNK_SIZE;
use astrarium_core::math::chunk_origin;
use astrarium_core::types::{ChunkCoord, WorldPos};
use astrarium_core::{Category, GenerationError, ObjectId, SeededRng};
use glam::DVec2;

use crate::object::{Body, CelestialObject, Effects};
use crate::tables::{GenerationConfig, TypeTable, TypeTables, VariantDef};

/// Shared read-only inputs of one generation call.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    pub tables: &'a TypeTables,
    pub config: &'a GenerationConfig,
    /// Chunk being generated. Reported in errors.
    pub coord: ChunkCoord,
}

/// How the variant is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pick {
    /// Weighted rarity roll.
    Roll,
    /// Fixed variant index. The roll is still drawn and discarded.
    Forced(usize),
}

/// Attributes drawn for every object before category extras.
#[derive(Debug, Clone)]
pub struct Drawn<'t> {
    pub index: usize,
    pub variant: &'t VariantDef,
    pub radius: f64,
    pub color: String,
    pub effects: Effects,
}

impl Drawn<'_> {
    /// Assemble an undiscovered object from the drawn attributes.
    pub fn into_object(
        self,
        category: Category,
        id: ObjectId,
        position: WorldPos,
        body: Body,
    ) -> CelestialObject {
        CelestialObject {
            id,
            category,
            variant: self.variant.name.clone(),
            position,
            radius: self.radius,
            color: self.color,
            rarity: self.variant.rarity,
            effects: self.effects,
            discovered: false,
            display_name: None,
            discovery_distance: category.discovery_distance(),
            body,
        }
    }
}

/// Select a variant and draw size, color and effects.
pub fn draw_common<'t>(
    rng: &mut SeededRng,
    table: &'t TypeTable,
    category: Category,
    pick: Pick,
    is_valid: impl Fn(usize, &VariantDef) -> bool,
) -> Result<Drawn<'t>, GenerationError> {
    let roll = rng.next();
    let (index, variant) = match pick {
        Pick::Roll => table
            .select(roll, is_valid)
            .ok_or(GenerationError::EmptyTable(category))?,
        Pick::Forced(index) => {
            let variant = table
                .variants
                .get(index)
                .ok_or_else(|| GenerationError::UnknownVariant {
                    category,
                    name: format!("#{index}"),
                })?;
            (index, variant)
        }
    };

    let radius = table.base_radius * variant.size * rng.next_float(0.85, 1.15);
    let color = rng
        .choice(&variant.palette)
        .cloned()
        .unwrap_or_else(|| "#ffffff".to_string());
    let rings = rng.chance(variant.ring_chance);
    let pulse_speed = rng.next_float(variant.pulse.0, variant.pulse.1);
    let glow = variant.glow * rng.next_float(0.8, 1.2);

    Ok(Drawn {
        index,
        variant,
        radius,
        color,
        effects: Effects {
            corona: variant.corona,
            rings,
            pulse_speed,
            glow,
        },
    })
}

/// Draw an inclusive count from a `(min, max)` range.
pub fn draw_count(rng: &mut SeededRng, range: (u32, u32)) -> u32 {
    rng.next_int(range.0 as i64, range.1 as i64 + 1) as u32
}

/// Draw a position inside the chunk, `margin` away from its edges.
pub fn draw_local_position(rng: &mut SeededRng, coord: ChunkCoord, margin: f64) -> WorldPos {
    let x = rng.next_float(margin, CHUNK_SIZE - margin);
    let y = rng.next_float(margin, CHUNK_SIZE - margin);
    chunk_origin(coord) + DVec2::new(x, y)
}

/// Draw a position inside one vertical band of the chunk so star systems in
/// different slots never share a centre.
pub fn draw_slot_position(
    rng: &mut SeededRng,
    coord: ChunkCoord,
    slot: u32,
    slots: u32,
    margin: f64,
) -> WorldPos {
    let band = CHUNK_SIZE / slots.max(1) as f64;
    let left = band * slot as f64;
    let x = rng.next_float(left + margin, left + band - margin);
    let y = rng.next_float(margin, CHUNK_SIZE - margin);
    chunk_origin(coord) + DVec2::new(x, y)
}

/// Reject objects with non-finite generated parameters.
pub fn ensure_finite(object: &CelestialObject, coord: ChunkCoord) -> Result<(), GenerationError> {
    let checks = [
        ("position", object.position.is_finite()),
        ("radius", object.radius.is_finite()),
        ("pulse_speed", object.effects.pulse_speed.is_finite()),
        ("glow", object.effects.glow.is_finite()),
        (
            "orbit",
            object
                .orbit()
                .map_or(true, |o| o.distance.is_finite() && o.speed.is_finite()),
        ),
    ];
    match checks.into_iter().find(|(_, ok)| !ok) {
        Some((field, _)) => Err(GenerationError::NonFinite {
            category: object.category,
            field,
            coord,
        }),
        None => Ok(()),
    }
}

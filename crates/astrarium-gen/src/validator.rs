use std::collections::HashSet;

use astrarium_core::constants::{CHUNK_SIZE, MAX_WORMHOLE_CELL_SIZE};
use astrarium_core::Category;
use thiserror::Error;

use crate::tables::{GenerationConfig, TypeTables};

/// Allowed slack when checking that rarity weights sum to 1.
pub const RARITY_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{0} table has no variants")]
    EmptyTable(Category),
    #[error("{category} table base_radius {value} must be positive")]
    BadBaseRadius { category: Category, value: f64 },
    #[error("{category} rarity weights sum to {sum}, expected 1")]
    RaritySum { category: Category, sum: f64 },
    #[error("{category} variant '{name}' has invalid rarity {value}")]
    BadRarity {
        category: Category,
        name: String,
        value: f64,
    },
    #[error("{category} variant '{name}' has non-positive size {value}")]
    BadSize {
        category: Category,
        name: String,
        value: f64,
    },
    #[error("{category} variant '{name}' has an empty palette")]
    EmptyPalette { category: Category, name: String },
    #[error("{category} variant '{name}' has malformed color '{color}'")]
    BadColor {
        category: Category,
        name: String,
        color: String,
    },
    #[error("{category} variant '{name}' has ring_chance {value} outside [0, 1]")]
    BadRingChance {
        category: Category,
        name: String,
        value: f64,
    },
    #[error("{category} variant '{name}' has inverted {field} range")]
    InvertedRange {
        category: Category,
        name: String,
        field: &'static str,
    },
    #[error("{category} has duplicate variant '{name}'")]
    DuplicateVariant { category: Category, name: String },
    #[error("config {field} = {value} is outside [0, 1]")]
    BadChance { field: &'static str, value: f64 },
    #[error("config {field} range is inverted or negative")]
    BadRange { field: &'static str },
    #[error("config wormhole_cell_size {0} must be in [2, {MAX_WORMHOLE_CELL_SIZE}]")]
    BadCellSize(i32),
    #[error("config edge_margin {0} leaves no room for star-system slots")]
    BadEdgeMargin(f64),
}

fn is_hex_color(color: &str) -> bool {
    color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Validate every type table.
pub fn validate_tables(tables: &TypeTables) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for category in Category::ALL {
        let table = tables.table(category);
        if table.variants.is_empty() {
            errors.push(ValidationError::EmptyTable(category));
            continue;
        }
        if !(table.base_radius.is_finite() && table.base_radius > 0.0) {
            errors.push(ValidationError::BadBaseRadius {
                category,
                value: table.base_radius,
            });
        }

        let sum: f64 = table.variants.iter().map(|v| v.rarity).sum();
        if (sum - 1.0).abs() > RARITY_TOLERANCE {
            errors.push(ValidationError::RaritySum { category, sum });
        }

        let mut seen = HashSet::new();
        for v in &table.variants {
            let name = v.name.clone();
            if !seen.insert(v.name.to_ascii_lowercase()) {
                errors.push(ValidationError::DuplicateVariant {
                    category,
                    name: name.clone(),
                });
            }
            if !(v.rarity.is_finite() && v.rarity >= 0.0) {
                errors.push(ValidationError::BadRarity {
                    category,
                    name: name.clone(),
                    value: v.rarity,
                });
            }
            if !(v.size.is_finite() && v.size > 0.0) {
                errors.push(ValidationError::BadSize {
                    category,
                    name: name.clone(),
                    value: v.size,
                });
            }
            if v.palette.is_empty() {
                errors.push(ValidationError::EmptyPalette {
                    category,
                    name: name.clone(),
                });
            }
            for color in v.palette.iter().filter(|c| !is_hex_color(c)) {
                errors.push(ValidationError::BadColor {
                    category,
                    name: name.clone(),
                    color: color.clone(),
                });
            }
            if !(0.0..=1.0).contains(&v.ring_chance) {
                errors.push(ValidationError::BadRingChance {
                    category,
                    name: name.clone(),
                    value: v.ring_chance,
                });
            }
            if !(v.pulse.0 <= v.pulse.1) {
                errors.push(ValidationError::InvertedRange {
                    category,
                    name: name.clone(),
                    field: "pulse",
                });
            }
            if v.satellites.0 > v.satellites.1 {
                errors.push(ValidationError::InvertedRange {
                    category,
                    name,
                    field: "satellites",
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate generation probabilities and spatial parameters.
pub fn validate_config(config: &GenerationConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let chances = [
        ("star_system_chance", config.star_system_chance),
        ("nebula_chance", config.nebula_chance),
        ("asteroid_garden_chance", config.asteroid_garden_chance),
        ("black_hole_chance", config.black_hole_chance),
        ("comet_chance", config.comet_chance),
        ("protostar_chance", config.protostar_chance),
        ("rogue_planet_chance", config.rogue_planet_chance),
        ("dark_nebula_chance", config.dark_nebula_chance),
        ("crystal_garden_chance", config.crystal_garden_chance),
        ("wormhole_pair_chance", config.wormhole_pair_chance),
    ];
    for (field, value) in chances {
        if !(0.0..=1.0).contains(&value) {
            errors.push(ValidationError::BadChance { field, value });
        }
    }

    let ranges = [
        ("planet_orbit_gap", config.planet_orbit_gap),
        ("moon_orbit_gap", config.moon_orbit_gap),
        ("planet_orbit_speed", config.planet_orbit_speed),
        ("moon_orbit_speed", config.moon_orbit_speed),
        ("comet_path", config.comet_path),
        ("comet_speed", config.comet_speed),
    ];
    for (field, (min, max)) in ranges {
        if !(min >= 0.0 && min <= max && max.is_finite()) {
            errors.push(ValidationError::BadRange { field });
        }
    }
    if config.background_stars.0 > config.background_stars.1 {
        errors.push(ValidationError::BadRange {
            field: "background_stars",
        });
    }
    if !(config.orbit_clearance.is_finite() && config.orbit_clearance >= 0.0) {
        errors.push(ValidationError::BadRange {
            field: "orbit_clearance",
        });
    }

    if !(2..=MAX_WORMHOLE_CELL_SIZE).contains(&config.wormhole_cell_size) {
        errors.push(ValidationError::BadCellSize(config.wormhole_cell_size));
    }

    let band = CHUNK_SIZE / config.star_system_slots.max(1) as f64;
    if !(config.edge_margin >= 0.0 && config.edge_margin * 2.0 < band) {
        errors.push(ValidationError::BadEdgeMargin(config.edge_margin));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

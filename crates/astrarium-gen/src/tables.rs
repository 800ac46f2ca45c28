use astrarium_core::Category;
use serde::{Deserialize, Serialize};

/// One named variant of a celestial category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantDef {
    pub name: String,
    /// Selection weight. Weights within a table sum to 1.
    pub rarity: f64,
    /// Multiplier applied to the table's base radius.
    pub size: f64,
    /// Hex colors; one is drawn per object.
    pub palette: Vec<String>,
    #[serde(default)]
    pub corona: bool,
    /// Probability of rings. The draw is taken even when zero.
    #[serde(default)]
    pub ring_chance: f64,
    /// Pulse speed range.
    #[serde(default)]
    pub pulse: (f64, f64),
    #[serde(default)]
    pub glow: f64,
    /// Inclusive member range (planets, moons, rocks or crystals).
    #[serde(default)]
    pub satellites: (u32, u32),
    /// Cap on siblings sharing this variant under one parent.
    #[serde(default)]
    pub max_per_parent: Option<u32>,
}

/// Weighted variant list for a single category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeTable {
    pub base_radius: f64,
    pub variants: Vec<VariantDef>,
}

impl TypeTable {
    /// Walk the cumulative rarity distribution with `roll` in [0,1).
    ///
    /// The first bucket containing the roll wins; a roll past the final
    /// bucket (float slack) lands on the last variant. If `is_valid` rejects
    /// the pick, the lowest-index valid variant is used instead, and if none
    /// is valid the first variant. Returns `None` only for an empty table.
    pub fn select(
        &self,
        roll: f64,
        is_valid: impl Fn(usize, &VariantDef) -> bool,
    ) -> Option<(usize, &VariantDef)> {
        let last = self.variants.len().checked_sub(1)?;
        let mut cumulative = 0.0;
        let mut chosen = last;
        for (i, variant) in self.variants.iter().enumerate() {
            cumulative += variant.rarity;
            if roll < cumulative {
                chosen = i;
                break;
            }
        }
        if is_valid(chosen, &self.variants[chosen]) {
            return Some((chosen, &self.variants[chosen]));
        }
        self.variants
            .iter()
            .enumerate()
            .find(|(i, v)| is_valid(*i, v))
            .or_else(|| self.variants.first().map(|v| (0, v)))
    }

    /// Look up a variant by name (case-insensitive).
    pub fn find(&self, name: &str) -> Option<(usize, &VariantDef)> {
        self.variants
            .iter()
            .enumerate()
            .find(|(_, v)| v.name.eq_ignore_ascii_case(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.variants.iter().map(|v| v.name.as_str())
    }
}

/// Type tables for every discoverable category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeTables {
    /// Bumped whenever a table change alters generated output.
    pub version: u32,
    pub stars: TypeTable,
    pub planets: TypeTable,
    pub moons: TypeTable,
    pub nebulae: TypeTable,
    pub asteroid_gardens: TypeTable,
    pub wormholes: TypeTable,
    pub black_holes: TypeTable,
    pub comets: TypeTable,
    pub protostars: TypeTable,
    pub rogue_planets: TypeTable,
    pub dark_nebulae: TypeTable,
    pub crystal_gardens: TypeTable,
}

impl TypeTables {
    pub fn table(&self, category: Category) -> &TypeTable {
        match category {
            Category::Star => &self.stars,
            Category::Planet => &self.planets,
            Category::Moon => &self.moons,
            Category::Nebula => &self.nebulae,
            Category::AsteroidGarden => &self.asteroid_gardens,
            Category::Wormhole => &self.wormholes,
            Category::BlackHole => &self.black_holes,
            Category::Comet => &self.comets,
            Category::Protostar => &self.protostars,
            Category::RoguePlanet => &self.rogue_planets,
            Category::DarkNebula => &self.dark_nebulae,
            Category::CrystalGarden => &self.crystal_gardens,
        }
    }
}

/// Chunk generation probabilities and spatial parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Inclusive background star count range.
    pub background_stars: (u32, u32),
    /// Minimum distance of generated positions from chunk edges.
    pub edge_margin: f64,
    pub star_system_slots: u32,
    pub star_system_chance: f64,
    pub nebula_chance: f64,
    pub asteroid_garden_chance: f64,
    pub black_hole_chance: f64,
    pub comet_chance: f64,
    pub protostar_chance: f64,
    pub rogue_planet_chance: f64,
    pub dark_nebula_chance: f64,
    pub crystal_garden_chance: f64,
    /// Side length, in chunks, of a wormhole pairing cell.
    pub wormhole_cell_size: i32,
    pub wormhole_pair_chance: f64,
    pub orbit_clearance: f64,
    pub planet_orbit_gap: (f64, f64),
    pub moon_orbit_gap: (f64, f64),
    pub planet_orbit_speed: (f64, f64),
    pub moon_orbit_speed: (f64, f64),
    /// Semi-major axis range of comet paths.
    pub comet_path: (f64, f64),
    pub comet_speed: (f64, f64),
}

impl GenerationConfig {
    /// Presence probability of a single-object category.
    /// Star systems and wormholes use their own draws and return 0.
    pub fn presence_chance(&self, category: Category) -> f64 {
        match category {
            Category::Nebula => self.nebula_chance,
            Category::AsteroidGarden => self.asteroid_garden_chance,
            Category::BlackHole => self.black_hole_chance,
            Category::Comet => self.comet_chance,
            Category::Protostar => self.protostar_chance,
            Category::RoguePlanet => self.rogue_planet_chance,
            Category::DarkNebula => self.dark_nebula_chance,
            Category::CrystalGarden => self.crystal_garden_chance,
            Category::Star | Category::Planet | Category::Moon | Category::Wormhole => 0.0,
        }
    }
}

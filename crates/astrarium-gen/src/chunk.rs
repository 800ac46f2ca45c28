use astrarium_core::constants::{BACKGROUND_STAR_BASE_SIZE, BACKGROUND_STAR_PALETTE, CHUNK_SIZE};
use astrarium_core::math::chunk_origin;
use astrarium_core::rng::{chunk_seed, derive_seed, CATEGORY_SALT, STAR_SYSTEM_SALT};
use astrarium_core::types::ChunkCoord;
use astrarium_core::{Category, GenerationContext, GenerationError, ObjectId, SeededRng};
use glam::DVec2;

use crate::generators::phenomena::{generate_phenomenon, PHENOMENA};
use crate::generators::stellar::{generate_star_system, StarSystem};
use crate::generators::{draw_count, draw_local_position, draw_slot_position, Pick, Scope};
use crate::loader::{builtin_generation_config, builtin_type_tables};
use crate::object::{BackgroundStar, CelestialObject};
use crate::tables::{GenerationConfig, TypeTables};
use crate::validator::{validate_config, validate_tables};
use crate::wormhole::wormholes_for_chunk;

/// Generated objects of one chunk, one collection per category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectCollections {
    pub stars: Vec<CelestialObject>,
    pub planets: Vec<CelestialObject>,
    pub moons: Vec<CelestialObject>,
    pub nebulae: Vec<CelestialObject>,
    pub asteroid_gardens: Vec<CelestialObject>,
    pub wormholes: Vec<CelestialObject>,
    pub black_holes: Vec<CelestialObject>,
    pub comets: Vec<CelestialObject>,
    pub protostars: Vec<CelestialObject>,
    pub rogue_planets: Vec<CelestialObject>,
    pub dark_nebulae: Vec<CelestialObject>,
    pub crystal_gardens: Vec<CelestialObject>,
}

impl ObjectCollections {
    pub fn get(&self, category: Category) -> &[CelestialObject] {
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

    pub fn get_mut(&mut self, category: Category) -> &mut Vec<CelestialObject> {
        match category {
            Category::Star => &mut self.stars,
            Category::Planet => &mut self.planets,
            Category::Moon => &mut self.moons,
            Category::Nebula => &mut self.nebulae,
            Category::AsteroidGarden => &mut self.asteroid_gardens,
            Category::Wormhole => &mut self.wormholes,
            Category::BlackHole => &mut self.black_holes,
            Category::Comet => &mut self.comets,
            Category::Protostar => &mut self.protostars,
            Category::RoguePlanet => &mut self.rogue_planets,
            Category::DarkNebula => &mut self.dark_nebulae,
            Category::CrystalGarden => &mut self.crystal_gardens,
        }
    }

    /// Append an object to its category's collection.
    pub fn push(&mut self, object: CelestialObject) {
        self.get_mut(object.category).push(object);
    }

    pub fn push_system(&mut self, system: StarSystem) {
        self.stars.push(system.star);
        self.planets.extend(system.planets);
        self.moons.extend(system.moons);
    }

    /// All objects in category order.
    pub fn iter(&self) -> impl Iterator<Item = &CelestialObject> {
        Category::ALL.into_iter().flat_map(move |c| self.get(c).iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut CelestialObject> {
        [
            &mut self.stars,
            &mut self.planets,
            &mut self.moons,
            &mut self.nebulae,
            &mut self.asteroid_gardens,
            &mut self.wormholes,
            &mut self.black_holes,
            &mut self.comets,
            &mut self.protostars,
            &mut self.rogue_planets,
            &mut self.dark_nebulae,
            &mut self.crystal_gardens,
        ]
        .into_iter()
        .flat_map(|v| v.iter_mut())
    }

    pub fn len(&self) -> usize {
        Category::ALL.iter().map(|&c| self.get(c).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn find(&self, id: &ObjectId) -> Option<&CelestialObject> {
        self.get(id.category).iter().find(|o| &o.id == id)
    }

    pub fn find_mut(&mut self, id: &ObjectId) -> Option<&mut CelestialObject> {
        self.get_mut(id.category).iter_mut().find(|o| &o.id == id)
    }
}

/// A generated square region of world space.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub coord: ChunkCoord,
    /// Decorative background stars.
    pub background_stars: Vec<BackgroundStar>,
    pub objects: ObjectCollections,
}

impl Chunk {
    pub fn empty(coord: ChunkCoord) -> Self {
        Self {
            coord,
            background_stars: Vec::new(),
            objects: ObjectCollections::default(),
        }
    }
}

/// Deterministic chunk generator over a validated set of tables.
#[derive(Debug, Clone)]
pub struct ChunkGenerator {
    tables: TypeTables,
    config: GenerationConfig,
}

impl ChunkGenerator {
    /// Validate and wrap tables and config.
    pub fn new(tables: TypeTables, config: GenerationConfig) -> Result<Self, GenerationError> {
        let describe = |errors: Vec<crate::validator::ValidationError>| {
            errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ")
        };
        validate_tables(&tables).map_err(|e| GenerationError::InvalidTables(describe(e)))?;
        validate_config(&config).map_err(|e| GenerationError::InvalidTables(describe(e)))?;
        Ok(Self { tables, config })
    }

    /// Generator over the built-in data files.
    pub fn builtin() -> Result<Self, GenerationError> {
        let tables =
            builtin_type_tables().map_err(|e| GenerationError::TableLoad(e.to_string()))?;
        let config =
            builtin_generation_config().map_err(|e| GenerationError::TableLoad(e.to_string()))?;
        Self::new(tables, config)
    }

    pub fn tables(&self) -> &TypeTables {
        &self.tables
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Type-table version baked into generated output.
    pub fn version(&self) -> u32 {
        self.tables.version
    }

    pub fn scope(&self, coord: ChunkCoord) -> Scope<'_> {
        Scope {
            tables: &self.tables,
            config: &self.config,
            coord,
        }
    }

    /// Generate the chunk at `coord`. Pure in `(ctx.seed, coord)` and the tables.
    pub fn generate_chunk(
        &self,
        ctx: &GenerationContext,
        coord: ChunkCoord,
    ) -> Result<Chunk, GenerationError> {
        let scope = self.scope(coord);
        let config = &self.config;
        let root = chunk_seed(ctx.seed, coord);
        let mut rng = SeededRng::new(root);
        let origin = chunk_origin(coord);
        let mut chunk = Chunk::empty(coord);

        let count = draw_count(&mut rng, config.background_stars);
        chunk.background_stars.reserve(count as usize);
        for _ in 0..count {
            let x = rng.next_float(0.0, CHUNK_SIZE);
            let y = rng.next_float(0.0, CHUNK_SIZE);
            let size = BACKGROUND_STAR_BASE_SIZE * rng.next_float(0.5, 2.0);
            let brightness = rng.next_float(0.3, 1.0);
            let color = rng
                .choice(&BACKGROUND_STAR_PALETTE)
                .copied()
                .unwrap_or(BACKGROUND_STAR_PALETTE[0]);
            chunk.background_stars.push(BackgroundStar {
                position: origin + DVec2::new(x, y),
                size,
                brightness,
                color,
            });
        }

        for slot in 0..config.star_system_slots {
            if rng.chance(config.star_system_chance) {
                let seed = derive_seed(root, STAR_SYSTEM_SALT + slot);
                let mut system_rng = SeededRng::new(seed);
                let position = draw_slot_position(
                    &mut system_rng,
                    coord,
                    slot,
                    config.star_system_slots,
                    config.edge_margin,
                );
                let system =
                    generate_star_system(&scope, &mut system_rng, seed, position, Pick::Roll)?;
                chunk.objects.push_system(system);
            }
        }

        for category in PHENOMENA {
            if rng.chance(config.presence_chance(category)) {
                let mut object_rng =
                    SeededRng::new(derive_seed(root, CATEGORY_SALT + category.index()));
                let position = draw_local_position(&mut object_rng, coord, config.edge_margin);
                let object =
                    generate_phenomenon(&scope, category, &mut object_rng, position, Pick::Roll)?;
                chunk.objects.push(object);
            }
        }

        for wormhole in wormholes_for_chunk(&scope, ctx.seed, coord)? {
            chunk.objects.push(wormhole);
        }

        log::debug!(
            "Generated chunk {} (seed {}): {} objects, {} background stars",
            coord,
            ctx.seed,
            chunk.objects.len(),
            chunk.background_stars.len()
        );
        Ok(chunk)
    }
}

use std::time::{SystemTime, UNIX_EPOCH};

use astrarium_core::math::world_to_chunk;
use astrarium_core::types::{ChunkCoord, WorldPos};
use astrarium_core::{Category, GenerationContext, GenerationError, ObjectId};
use astrarium_gen::{CelestialObject, Chunk, ChunkGenerator};
use astrarium_persist::{DiscoveryRecord, DiscoveryStore, KeyValueStore};
use glam::DVec2;

use crate::active::ActiveObjects;
use crate::chunk_map::ChunkMap;
use crate::naming::display_name;
use crate::streaming::StreamingPolicy;
use crate::{gravity, kinematics};

/// Chunks loaded and evicted by one viewpoint update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkDelta {
    pub loaded: Vec<ChunkCoord>,
    pub evicted: Vec<ChunkCoord>,
}

/// A first-time discovery, for audio and UI consumers.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveryEvent {
    pub id: ObjectId,
    pub category: Category,
    pub variant: String,
    pub display_name: String,
    pub position: WorldPos,
}

/// Result of replacing the universe.
#[derive(Debug, Clone)]
pub struct RebirthOutcome {
    pub previous_seed: u32,
    pub new_context: GenerationContext,
    /// Discoveries of the previous universe, oldest first, for the UI to
    /// replay into its logbook.
    pub replay: Vec<DiscoveryRecord>,
}

/// Owns the active chunk set around a moving viewpoint and reattaches
/// discovery state to every chunk it loads.
#[derive(Debug)]
pub struct ChunkManager {
    generator: ChunkGenerator,
    context: GenerationContext,
    chunk_map: ChunkMap,
    streaming: StreamingPolicy,
    discoveries: DiscoveryStore,
    center: Option<ChunkCoord>,
}

impl ChunkManager {
    pub fn new(
        generator: ChunkGenerator,
        context: GenerationContext,
        discoveries: DiscoveryStore,
    ) -> Self {
        Self {
            generator,
            context,
            chunk_map: ChunkMap::new(),
            streaming: StreamingPolicy::default(),
            discoveries,
            center: None,
        }
    }

    /// Built-in tables, default seed, no durable storage.
    pub fn with_defaults() -> Result<Self, GenerationError> {
        Ok(Self::new(
            ChunkGenerator::builtin()?,
            GenerationContext::default(),
            DiscoveryStore::in_memory(),
        ))
    }

    /// Resume from `backing`: the stored seed (or `fallback` on first run)
    /// and that universe's discoveries. Unreadable data is logged and
    /// skipped.
    pub fn open(
        generator: ChunkGenerator,
        backing: Box<dyn KeyValueStore>,
        fallback: GenerationContext,
    ) -> Self {
        let mut discoveries = DiscoveryStore::with_backing(backing);
        let context = discoveries.load_context(fallback);
        discoveries.load(context.seed);
        log::info!(
            "Opened universe {} (reset #{})",
            context.seed,
            context.reset_count
        );
        Self::new(generator, context, discoveries)
    }

    pub fn context(&self) -> &GenerationContext {
        &self.context
    }

    pub fn generator(&self) -> &ChunkGenerator {
        &self.generator
    }

    pub fn chunk_map(&self) -> &ChunkMap {
        &self.chunk_map
    }

    pub fn discoveries(&self) -> &DiscoveryStore {
        &self.discoveries
    }

    pub fn load_radius(&self) -> i32 {
        self.streaming.load_radius()
    }

    /// Takes effect on the next `update_active_chunks`.
    pub fn set_load_radius(&mut self, radius: i32) {
        self.streaming = StreamingPolicy::new(radius);
    }

    /// Chunk containing the last viewpoint, if any.
    pub fn center(&self) -> Option<ChunkCoord> {
        self.center
    }

    /// Load the neighborhood around a world-space viewpoint and evict
    /// everything outside it.
    ///
    /// A generation failure is returned as-is; the failing coordinate stays
    /// unloaded and chunks loaded before it in this call are kept.
    pub fn update_active_chunks(&mut self, x: f64, y: f64) -> Result<ChunkDelta, GenerationError> {
        let center = world_to_chunk(DVec2::new(x, y));
        self.center = Some(center);
        let plan = self.streaming.plan(&self.chunk_map, center);

        for coord in &plan.evict {
            self.chunk_map.remove(coord);
            log::debug!("Evicted chunk {coord}");
        }

        let mut loaded = Vec::with_capacity(plan.load.len());
        for coord in plan.load {
            let chunk = build_chunk(&self.generator, &self.context, &self.discoveries, coord)?;
            self.chunk_map.insert(chunk);
            loaded.push(coord);
        }

        Ok(ChunkDelta {
            loaded,
            evicted: plan.evict,
        })
    }

    /// Every object of every loaded chunk, per category.
    pub fn get_all_active_objects(&self) -> ActiveObjects<'_> {
        ActiveObjects::collect(&self.chunk_map)
    }

    /// Identity used for discovery lookups. Identical at generation and
    /// lookup time because it is fixed when the object is built.
    pub fn object_id(object: &CelestialObject) -> &ObjectId {
        &object.id
    }

    /// Mark `object` discovered under `name`, whether or not it is loaded.
    ///
    /// Returns whether a new record was written. When the identity already
    /// has a record, that record's name is kept and copied onto `object`. A
    /// loaded copy of the object is updated the same way. Persistence
    /// failures are logged by the store.
    pub fn mark_object_discovered(&mut self, object: &mut CelestialObject, name: &str) -> bool {
        self.mark_object_discovered_at(object, name, now_ms())
    }

    /// As `mark_object_discovered` with an explicit timestamp.
    pub fn mark_object_discovered_at(
        &mut self,
        object: &mut CelestialObject,
        name: &str,
        timestamp_ms: u64,
    ) -> bool {
        let written = self.discoveries.put(DiscoveryRecord::new(
            object.id.clone(),
            name,
            timestamp_ms,
            object.position.to_array(),
            self.context.seed,
        ));
        let stored = self
            .discoveries
            .get(&object.id)
            .map_or_else(|| name.to_string(), |r| r.display_name.clone());
        if !written {
            log::debug!("{} already discovered as '{stored}'", object.id);
        }
        object.discovered = true;
        object.display_name = Some(stored.clone());
        if let Some(loaded) = find_loaded_mut(&mut self.chunk_map, &object.id) {
            loaded.discovered = true;
            loaded.display_name = Some(stored);
        }
        written
    }

    /// Mark the loaded object `id` discovered under `name`. Objects that are
    /// not loaded are left alone and nothing is recorded.
    pub fn mark_loaded_discovered(&mut self, id: &ObjectId, name: &str) -> bool {
        self.mark_loaded_discovered_at(id, name, now_ms())
    }

    /// As `mark_loaded_discovered` with an explicit timestamp.
    pub fn mark_loaded_discovered_at(&mut self, id: &ObjectId, name: &str, timestamp_ms: u64) -> bool {
        let Some(mut object) = find_loaded_mut(&mut self.chunk_map, id).cloned() else {
            log::debug!("Ignoring discovery of unloaded object {id}");
            return false;
        };
        self.mark_object_discovered_at(&mut object, name, timestamp_ms)
    }

    /// Reattach stored discovery state to `objects`. Returns how many were
    /// restored. Restoring never produces discovery events.
    pub fn restore_discovery_state<'a>(
        &self,
        objects: impl IntoIterator<Item = &'a mut CelestialObject>,
    ) -> usize {
        restore_objects(&self.discoveries, objects)
    }

    /// Drop every loaded chunk. Discovery state is untouched.
    pub fn clear_all_chunks(&mut self) {
        let count = self.chunk_map.loaded_count();
        self.chunk_map.clear();
        self.center = None;
        log::debug!("Cleared {count} chunks");
    }

    /// Generate a chunk without loading it. Discovery flags are not applied;
    /// see `restore_discovery_state`.
    pub fn generate_chunk(&self, coord: ChunkCoord) -> Result<Chunk, GenerationError> {
        self.generator.generate_chunk(&self.context, coord)
    }

    pub fn get_chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunk_map.get(&coord)
    }

    /// Load `coord` outside the radius-driven path, if it is not loaded yet.
    /// It is evicted by the next update that does not cover it.
    pub fn ensure_chunk_exists(&mut self, coord: ChunkCoord) -> Result<&mut Chunk, GenerationError> {
        let Self {
            ref generator,
            ref context,
            ref mut chunk_map,
            ref discoveries,
            ..
        } = *self;
        chunk_map.get_or_try_insert_with(coord, || {
            log::debug!("Forced load of chunk {coord}");
            build_chunk(generator, context, discoveries, coord)
        })
    }

    /// Place an externally built object into the chunk containing its
    /// position, replacing any object with the same identity.
    pub fn inject_object(&mut self, mut object: CelestialObject) -> Result<ObjectId, GenerationError> {
        restore_objects(&self.discoveries, std::iter::once(&mut object));
        let id = object.id.clone();
        let category = object.category;
        let chunk = self.ensure_chunk_exists(world_to_chunk(object.position))?;
        let objects = chunk.objects.get_mut(category);
        match objects.iter_mut().find(|o| o.id == id) {
            Some(existing) => *existing = object,
            None => objects.push(object),
        }
        log::debug!("Injected {id}");
        Ok(id)
    }

    /// Current-universe records of `category`, oldest first.
    pub fn get_discovered(&self, category: Category) -> Vec<&DiscoveryRecord> {
        self.discoveries.records_for(category)
    }

    pub fn get_discovered_stars(&self) -> Vec<&DiscoveryRecord> {
        self.get_discovered(Category::Star)
    }

    pub fn get_discovered_planets(&self) -> Vec<&DiscoveryRecord> {
        self.get_discovered(Category::Planet)
    }

    pub fn get_discovered_nebulae(&self) -> Vec<&DiscoveryRecord> {
        self.get_discovered(Category::Nebula)
    }

    pub fn get_discovered_wormholes(&self) -> Vec<&DiscoveryRecord> {
        self.get_discovered(Category::Wormhole)
    }

    pub fn get_discovered_asteroid_gardens(&self) -> Vec<&DiscoveryRecord> {
        self.get_discovered(Category::AsteroidGarden)
    }

    /// Discoveries across every universe this store has seen.
    pub fn lifetime_discoveries(&self) -> &[DiscoveryRecord] {
        self.discoveries.lifetime_records()
    }

    /// Discover every loaded object within range of `viewer`.
    pub fn scan_discoveries(&mut self, viewer: WorldPos) -> Vec<DiscoveryEvent> {
        self.scan_discoveries_at(viewer, now_ms())
    }

    /// As `scan_discoveries` with an explicit timestamp.
    pub fn scan_discoveries_at(&mut self, viewer: WorldPos, timestamp_ms: u64) -> Vec<DiscoveryEvent> {
        let seed = self.context.seed;
        let mut events = Vec::new();
        for coord in self.chunk_map.sorted_coords() {
            let Some(chunk) = self.chunk_map.get_mut(&coord) else {
                continue;
            };
            for object in chunk.objects.iter_mut() {
                if !object.check_discovery(viewer) {
                    continue;
                }
                if let Some(record) = self.discoveries.get(&object.id) {
                    object.discovered = true;
                    object.display_name = Some(record.display_name.clone());
                    continue;
                }
                let name = display_name(&object.id, seed);
                object.discovered = true;
                object.display_name = Some(name.clone());
                self.discoveries.put(DiscoveryRecord::new(
                    object.id.clone(),
                    name.clone(),
                    timestamp_ms,
                    object.position.to_array(),
                    seed,
                ));
                log::debug!("Discovered {} '{}'", object.id, name);
                events.push(DiscoveryEvent {
                    id: object.id.clone(),
                    category: object.category,
                    variant: object.variant.clone(),
                    display_name: name,
                    position: object.position,
                });
            }
        }
        events
    }

    /// Advance orbits and comet paths of the loaded set.
    pub fn advance(&mut self, dt: f64) {
        kinematics::advance(&mut self.chunk_map, dt);
    }

    /// Pull acceleration at `pos` from every loaded black hole.
    pub fn gravity_at(&self, pos: WorldPos) -> DVec2 {
        gravity::pull_at(self.black_holes(), pos)
    }

    /// The loaded black hole whose event horizon contains `pos`.
    pub fn black_hole_collision(&self, pos: WorldPos) -> Option<&CelestialObject> {
        gravity::collision(self.black_holes(), pos)
    }

    fn black_holes(&self) -> impl Iterator<Item = &CelestialObject> {
        self.chunk_map
            .iter()
            .flat_map(|(_, chunk)| chunk.objects.get(Category::BlackHole).iter())
    }

    /// Replace the universe with `new_seed`.
    pub fn reset(&mut self, new_seed: u32) -> RebirthOutcome {
        let next = self.context.reset(new_seed);
        self.begin_universe(next)
    }

    /// Replace the universe with the deterministic successor of the current one.
    pub fn rebirth(&mut self) -> RebirthOutcome {
        let next = self.context.reborn();
        self.begin_universe(next)
    }

    fn begin_universe(&mut self, next: GenerationContext) -> RebirthOutcome {
        let replay: Vec<DiscoveryRecord> =
            self.discoveries.all_records().into_iter().cloned().collect();
        let previous_seed = self.context.seed;
        self.clear_all_chunks();
        self.discoveries.clear();
        self.context = next;
        self.discoveries.save_context(&next);
        log::info!(
            "Universe {} replaced by {} (reset #{}), {} discoveries to replay",
            previous_seed,
            next.seed,
            next.reset_count,
            replay.len()
        );
        RebirthOutcome {
            previous_seed,
            new_context: next,
            replay,
        }
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn build_chunk(
    generator: &ChunkGenerator,
    context: &GenerationContext,
    discoveries: &DiscoveryStore,
    coord: ChunkCoord,
) -> Result<Chunk, GenerationError> {
    let mut chunk = generator.generate_chunk(context, coord)?;
    let restored = restore_objects(discoveries, chunk.objects.iter_mut());
    log::debug!(
        "Loaded chunk {coord}: {} objects, {restored} previously discovered",
        chunk.objects.len()
    );
    Ok(chunk)
}

fn restore_objects<'a>(
    discoveries: &DiscoveryStore,
    objects: impl IntoIterator<Item = &'a mut CelestialObject>,
) -> usize {
    let mut restored = 0;
    for object in objects {
        if let Some(record) = discoveries.get(&object.id).filter(|r| r.discovered) {
            object.discovered = true;
            object.display_name = Some(record.display_name.clone());
            restored += 1;
        }
    }
    restored
}

fn find_loaded_mut<'a>(chunk_map: &'a mut ChunkMap, id: &ObjectId) -> Option<&'a mut CelestialObject> {
    chunk_map
        .iter_mut()
        .find_map(|(_, chunk)| chunk.objects.find_mut(id))
}

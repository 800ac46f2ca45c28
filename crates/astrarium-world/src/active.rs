use astrarium_core::Category;
use astrarium_gen::{BackgroundStar, CelestialObject};

use crate::chunk_map::ChunkMap;

/// Flat per-category view of every loaded object.
///
/// Borrowed from the chunk map, so it always reflects the current active set
/// and cannot outlive the next mutation.
#[derive(Debug, Default)]
pub struct ActiveObjects<'a> {
    pub background_stars: Vec<&'a BackgroundStar>,
    pub stars: Vec<&'a CelestialObject>,
    pub planets: Vec<&'a CelestialObject>,
    pub moons: Vec<&'a CelestialObject>,
    pub nebulae: Vec<&'a CelestialObject>,
    pub asteroid_gardens: Vec<&'a CelestialObject>,
    pub wormholes: Vec<&'a CelestialObject>,
    pub black_holes: Vec<&'a CelestialObject>,
    pub comets: Vec<&'a CelestialObject>,
    pub protostars: Vec<&'a CelestialObject>,
    pub rogue_planets: Vec<&'a CelestialObject>,
    pub dark_nebulae: Vec<&'a CelestialObject>,
    pub crystal_gardens: Vec<&'a CelestialObject>,
}

impl<'a> ActiveObjects<'a> {
    /// Flatten loaded chunks in row-major coordinate order.
    pub fn collect(chunk_map: &'a ChunkMap) -> Self {
        let mut active = Self::default();
        for chunk in chunk_map.sorted_chunks() {
            active.background_stars.extend(chunk.background_stars.iter());
            for category in Category::ALL {
                active
                    .get_mut(category)
                    .extend(chunk.objects.get(category).iter());
            }
        }
        active
    }

    pub fn get(&self, category: Category) -> &[&'a CelestialObject] {
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

    fn get_mut(&mut self, category: Category) -> &mut Vec<&'a CelestialObject> {
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

    /// Every discoverable object, in category order.
    pub fn iter(&self) -> impl Iterator<Item = &'a CelestialObject> + '_ {
        Category::ALL
            .into_iter()
            .flat_map(move |c| self.get(c).iter().copied())
    }

    /// Number of discoverable objects.
    pub fn total(&self) -> usize {
        Category::ALL.iter().map(|&c| self.get(c).len()).sum()
    }
}

//! Simplified orbital motion over the loaded set.

use std::collections::HashMap;

use astrarium_core::types::WorldPos;
use astrarium_core::{Category, ObjectId};

use crate::chunk_map::ChunkMap;

/// Advance every loaded object by `dt`.
///
/// Angles and comet phases move first, then orbit centres are refreshed top
/// down: planets from their star, moons from their (already moved) planet.
/// A parent that is not loaded leaves the last known centre in place.
pub fn advance(chunk_map: &mut ChunkMap, dt: f64) {
    for (_, chunk) in chunk_map.iter_mut() {
        for object in chunk.objects.iter_mut() {
            object.update_position(dt);
        }
    }
    follow_parents(chunk_map, Category::Star, Category::Planet);
    follow_parents(chunk_map, Category::Planet, Category::Moon);
}

fn follow_parents(chunk_map: &mut ChunkMap, parent: Category, child: Category) {
    let positions: HashMap<ObjectId, WorldPos> = chunk_map
        .iter()
        .flat_map(|(_, chunk)| chunk.objects.get(parent).iter())
        .map(|o| (o.id.clone(), o.position))
        .collect();
    for (_, chunk) in chunk_map.iter_mut() {
        for object in chunk.objects.get_mut(child).iter_mut() {
            let center = object.parent().and_then(|p| positions.get(p)).copied();
            if let Some(center) = center {
                object.follow_parent(center);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use astrarium_core::GenerationContext;
    use astrarium_gen::ChunkGenerator;
    use glam::IVec2;

    fn loaded_map() -> ChunkMap {
        let gen = ChunkGenerator::builtin().expect("generator");
        let ctx = GenerationContext::new(42);
        let mut map = ChunkMap::new();
        for coord in ChunkMap::neighborhood(IVec2::ZERO, 3) {
            map.insert(gen.generate_chunk(&ctx, coord).expect("chunk"));
        }
        map
    }

    #[test]
    fn test_orbits_keep_distance_after_advance() {
        let mut map = loaded_map();
        for _ in 0..20 {
            advance(&mut map, 0.5);
        }
        let mut checked = 0;
        for (_, chunk) in map.iter() {
            for category in [Category::Planet, Category::Moon] {
                for object in chunk.objects.get(category) {
                    let orbit = object.orbit().expect("orbiting body");
                    let d = object.position.distance(orbit.center);
                    assert!((d - orbit.distance).abs() < 1e-6, "{} drifted", object.id);
                    checked += 1;
                }
            }
        }
        assert!(checked > 0, "no orbiting bodies in a 7x7 region");
    }

    #[test]
    fn test_moons_follow_moved_planets() {
        let mut map = loaded_map();
        advance(&mut map, 3.0);
        let planets: HashMap<ObjectId, WorldPos> = map
            .iter()
            .flat_map(|(_, c)| c.objects.get(Category::Planet).iter())
            .map(|p| (p.id.clone(), p.position))
            .collect();
        for (_, chunk) in map.iter() {
            for moon in chunk.objects.get(Category::Moon) {
                let center = moon.orbit().map(|o| o.center);
                let parent = moon.parent().and_then(|p| planets.get(p)).copied();
                assert_eq!(center, parent, "moon {} not centred on its planet", moon.id);
            }
        }
    }

    #[test]
    fn test_identity_unchanged_by_motion() {
        let mut map = loaded_map();
        let before: Vec<ObjectId> = map
            .sorted_chunks()
            .flat_map(|c| c.objects.iter().map(|o| o.id.clone()))
            .collect();
        advance(&mut map, 10.0);
        let after: Vec<ObjectId> = map
            .sorted_chunks()
            .flat_map(|c| c.objects.iter().map(|o| o.id.clone()))
            .collect();
        assert_eq!(before, after);
    }
}

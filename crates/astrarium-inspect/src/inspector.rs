//! Region statistics straight from the generator. Nothing is loaded into a
//! manager, so inspecting never disturbs a running session.

use std::collections::{BTreeMap, HashMap};

use astrarium_core::types::ChunkCoord;
use astrarium_core::{Category, GenerationContext, GenerationError};
use astrarium_gen::{Body, ChunkGenerator};
use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Counts for one category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub total: usize,
    /// Per-variant counts, by variant name.
    pub variants: BTreeMap<String, usize>,
}

/// Summary of an inclusive rectangle of chunks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionReport {
    pub seed: u32,
    pub table_version: u32,
    pub min: [i32; 2],
    pub max: [i32; 2],
    pub chunk_count: usize,
    pub background_stars: usize,
    pub categories: Vec<CategoryCount>,
    /// Wormhole endpoints found in the region.
    pub wormhole_endpoints: usize,
    /// Pairs with both endpoints inside the region.
    pub wormhole_pairs: usize,
    /// Discoverable objects per chunk.
    pub density: f64,
}

impl RegionReport {
    pub fn total_objects(&self) -> usize {
        self.categories.iter().map(|c| c.total).sum()
    }

    pub fn count(&self, category: Category) -> usize {
        self.categories
            .iter()
            .find(|c| c.category == category.tag())
            .map_or(0, |c| c.total)
    }
}

/// Largest radius `region_around` accepts.
pub const MAX_INSPECT_RADIUS: i32 = 256;

/// Corners of the square of `radius` chunks around `center`. The radius is
/// clamped to `0..=MAX_INSPECT_RADIUS` and corners saturate at the `i32` edge.
pub fn region_around(center: ChunkCoord, radius: i32) -> (ChunkCoord, ChunkCoord) {
    let r = radius.clamp(0, MAX_INSPECT_RADIUS);
    (
        IVec2::new(center.x.saturating_sub(r), center.y.saturating_sub(r)),
        IVec2::new(center.x.saturating_add(r), center.y.saturating_add(r)),
    )
}

/// Generate every chunk in the rectangle spanned by `a` and `b` (inclusive,
/// either corner order) and tally what it contains.
pub fn inspect_region(
    generator: &ChunkGenerator,
    ctx: &GenerationContext,
    a: ChunkCoord,
    b: ChunkCoord,
) -> Result<RegionReport, GenerationError> {
    let min = a.min(b);
    let max = a.max(b);
    let mut counts: Vec<CategoryCount> = Category::ALL
        .iter()
        .map(|c| CategoryCount {
            category: c.tag().to_string(),
            ..CategoryCount::default()
        })
        .collect();
    let mut background_stars = 0;
    let mut chunk_count = 0;
    let mut pair_ends: HashMap<u32, usize> = HashMap::new();

    for y in min.y..=max.y {
        for x in min.x..=max.x {
            let chunk = generator.generate_chunk(ctx, IVec2::new(x, y))?;
            chunk_count += 1;
            background_stars += chunk.background_stars.len();
            for object in chunk.objects.iter() {
                let entry = &mut counts[object.category.index() as usize];
                entry.total += 1;
                *entry.variants.entry(object.variant.clone()).or_default() += 1;
                if let Body::Wormhole { pair_id, .. } = object.body {
                    *pair_ends.entry(pair_id).or_default() += 1;
                }
            }
        }
    }

    let total: usize = counts.iter().map(|c| c.total).sum();
    let report = RegionReport {
        seed: ctx.seed,
        table_version: generator.version(),
        min: min.to_array(),
        max: max.to_array(),
        chunk_count,
        background_stars,
        wormhole_endpoints: pair_ends.values().sum(),
        wormhole_pairs: pair_ends.values().filter(|&&n| n >= 2).count(),
        density: total as f64 / chunk_count.max(1) as f64,
        categories: counts,
    };
    log::debug!(
        "Inspected {} chunks of universe {}: {} objects",
        report.chunk_count,
        report.seed,
        total
    );
    Ok(report)
}

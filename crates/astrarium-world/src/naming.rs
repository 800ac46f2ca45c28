//! Deterministic display names for discovered objects.
//!
//! Names are a pure function of the universe seed and the object identity,
//! so a rediscovered object (or a replayed logbook) always reads the same.

use astrarium_core::rng::{derive_seed, hash_coords, NAME_SALT};
use astrarium_core::{Category, ObjectId, SeededRng};

static PREFIXES: &[&str] = &[
    "Al", "Be", "Cor", "Dra", "El", "Fen", "Gal", "Hy", "Ix", "Ka", "Lyr", "Mir", "Nox", "Or",
    "Pha", "Qua", "Rho", "Sel", "Tau", "Ul", "Vel", "Xan", "Yr", "Zan",
];

static MIDDLES: &[&str] = &[
    "a", "e", "i", "o", "u", "ae", "ar", "en", "ir", "on", "ul", "yr",
];

static SUFFIXES: &[&str] = &[
    "ris", "nus", "tha", "lon", "mir", "dex", "phi", "tis", "rax", "wen", "dor", "vis", "ka",
    "lia", "ron", "sar",
];

static CLOUD_NOUNS: &[&str] = &["Veil", "Cloud", "Shroud", "Mist", "Drift"];
static DARK_NOUNS: &[&str] = &["Void", "Shadow", "Rift", "Hollow"];
static FIELD_NOUNS: &[&str] = &["Belt", "Reach", "Garden", "Expanse"];
static CRYSTAL_NOUNS: &[&str] = &["Spires", "Lattice", "Prism", "Grove"];
static GATE_NOUNS: &[&str] = &["Gate", "Passage", "Conduit"];

const PLANET_LETTERS: &[char] = &['b', 'c', 'd', 'e', 'f', 'g', 'h', 'i'];
const ROMAN: &[&str] = &["I", "II", "III", "IV", "V", "VI", "VII", "VIII"];

fn pick<'a>(rng: &mut SeededRng, items: &[&'a str]) -> &'a str {
    rng.choice(items).copied().unwrap_or("")
}

fn anchor_stream(universe_seed: u32, anchor: (i64, i64), category: Category) -> SeededRng {
    let base = hash_coords(universe_seed, anchor.0 as i32, anchor.1 as i32);
    SeededRng::new(derive_seed(base, NAME_SALT + category.index()))
}

/// A two- or three-syllable proper name.
fn proper(rng: &mut SeededRng) -> String {
    let mut name = String::from(pick(rng, PREFIXES));
    if rng.chance(0.5) {
        name.push_str(pick(rng, MIDDLES));
    }
    name.push_str(pick(rng, SUFFIXES));
    name
}

fn star_name(universe_seed: u32, anchor: (i64, i64)) -> String {
    let mut rng = anchor_stream(universe_seed, anchor, Category::Star);
    proper(&mut rng)
}

/// Display name of the object with identity `id` in universe `universe_seed`.
pub fn display_name(id: &ObjectId, universe_seed: u32) -> String {
    match id.category {
        Category::Star => star_name(universe_seed, id.anchor),
        Category::Planet | Category::Moon => {
            let mut name = star_name(universe_seed, id.anchor);
            let root = anchor_stream(universe_seed, id.anchor, Category::Planet).next_u32();
            for (depth, distance) in id.orbits.iter().enumerate() {
                let mut rng = SeededRng::new(derive_seed(root ^ depth as u32, *distance));
                if depth == 0 {
                    let letter = rng.choice(PLANET_LETTERS).copied().unwrap_or('b');
                    name.push(' ');
                    name.push(letter);
                } else {
                    name.push(' ');
                    name.push_str(pick(&mut rng, ROMAN));
                }
            }
            name
        }
        category => {
            let mut rng = anchor_stream(universe_seed, id.anchor, category);
            let base = proper(&mut rng);
            match category {
                Category::Nebula => format!("{base} {}", pick(&mut rng, CLOUD_NOUNS)),
                Category::DarkNebula => format!("{base} {}", pick(&mut rng, DARK_NOUNS)),
                Category::AsteroidGarden => format!("{base} {}", pick(&mut rng, FIELD_NOUNS)),
                Category::CrystalGarden => format!("{base} {}", pick(&mut rng, CRYSTAL_NOUNS)),
                Category::Wormhole => format!("{base} {}", pick(&mut rng, GATE_NOUNS)),
                Category::BlackHole => format!("{base}-{}", rng.next_int(100, 1000)),
                Category::Comet => format!("Comet {base}"),
                Category::Protostar => format!("Proto-{base}"),
                Category::RoguePlanet => format!("{base} Wanderer"),
                Category::Star | Category::Planet | Category::Moon => base,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_deterministic() {
        for category in Category::ALL {
            let id = ObjectId::anchored(category, (1234, -987));
            assert_eq!(display_name(&id, 42), display_name(&id, 42));
            assert!(!display_name(&id, 42).is_empty(), "{category} produced empty name");
        }
    }

    #[test]
    fn test_planet_and_moon_extend_star_name() {
        let star = ObjectId::anchored(Category::Star, (500, 500));
        let planet = ObjectId::orbiting(Category::Planet, &star, 240.0);
        let moon = ObjectId::orbiting(Category::Moon, &planet, 30.0);
        let star_name = display_name(&star, 7);
        let planet_name = display_name(&planet, 7);
        let moon_name = display_name(&moon, 7);
        assert!(planet_name.starts_with(&star_name), "{planet_name} vs {star_name}");
        assert!(moon_name.starts_with(&planet_name), "{moon_name} vs {planet_name}");
        assert_eq!(moon_name.split(' ').count(), 3);
    }

    #[test]
    fn test_seed_changes_names() {
        let differing = (0..50)
            .filter(|i| {
                let id = ObjectId::anchored(Category::Star, (i * 997, i * 13));
                display_name(&id, 1) != display_name(&id, 2)
            })
            .count();
        assert!(differing > 40, "only {differing}/50 names changed with the seed");
    }
}

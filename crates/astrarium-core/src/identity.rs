use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Discoverable object categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Star,
    Planet,
    Moon,
    Nebula,
    AsteroidGarden,
    Wormhole,
    BlackHole,
    Comet,
    Protostar,
    RoguePlanet,
    DarkNebula,
    CrystalGarden,
}

impl Category {
    /// All categories in table order.
    pub const ALL: [Category; 12] = [
        Category::Star,
        Category::Planet,
        Category::Moon,
        Category::Nebula,
        Category::AsteroidGarden,
        Category::Wormhole,
        Category::BlackHole,
        Category::Comet,
        Category::Protostar,
        Category::RoguePlanet,
        Category::DarkNebula,
        Category::CrystalGarden,
    ];

    /// Stable lowercase tag used in identity strings and reports.
    pub fn tag(self) -> &'static str {
        match self {
            Category::Star => "star",
            Category::Planet => "planet",
            Category::Moon => "moon",
            Category::Nebula => "nebula",
            Category::AsteroidGarden => "asteroid_garden",
            Category::Wormhole => "wormhole",
            Category::BlackHole => "black_hole",
            Category::Comet => "comet",
            Category::Protostar => "protostar",
            Category::RoguePlanet => "rogue_planet",
            Category::DarkNebula => "dark_nebula",
            Category::CrystalGarden => "crystal_garden",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.tag() == tag)
    }

    /// Distance at which a viewer discovers an object of this category.
    pub fn discovery_distance(self) -> f64 {
        match self {
            Category::Star => STAR_DISCOVERY_DISTANCE,
            Category::Planet => PLANET_DISCOVERY_DISTANCE,
            Category::Moon => MOON_DISCOVERY_DISTANCE,
            Category::Nebula => NEBULA_DISCOVERY_DISTANCE,
            Category::AsteroidGarden => ASTEROID_GARDEN_DISCOVERY_DISTANCE,
            Category::Wormhole => WORMHOLE_DISCOVERY_DISTANCE,
            Category::BlackHole => BLACK_HOLE_DISCOVERY_DISTANCE,
            Category::Comet => COMET_DISCOVERY_DISTANCE,
            Category::Protostar => PROTOSTAR_DISCOVERY_DISTANCE,
            Category::RoguePlanet => ROGUE_PLANET_DISCOVERY_DISTANCE,
            Category::DarkNebula => DARK_NEBULA_DISCOVERY_DISTANCE,
            Category::CrystalGarden => CRYSTAL_GARDEN_DISCOVERY_DISTANCE,
        }
    }

    /// Position in `ALL`. Used to salt per-category streams.
    pub fn index(self) -> u32 {
        self as u32
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Stable identity of a generated object, derived only from immutable
/// generation inputs so a regenerated chunk yields the same keys.
///
/// String form: `category@x,y[/d1[/d2]]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectId {
    pub category: Category,
    /// Floored world position of the anchor (the object itself, or its root star).
    pub anchor: (i64, i64),
    /// Floored orbital distances from the root star down to this object.
    pub orbits: Vec<u32>,
}

impl ObjectId {
    /// Identity of a non-orbiting object.
    pub fn anchored(category: Category, anchor: (i64, i64)) -> Self {
        Self {
            category,
            anchor,
            orbits: Vec::new(),
        }
    }

    /// Identity of a body orbiting `parent`, at the given orbital distance.
    pub fn orbiting(category: Category, parent: &ObjectId, orbital_distance: f64) -> Self {
        let mut orbits = parent.orbits.clone();
        orbits.push(orbital_distance.floor().max(0.0) as u32);
        Self {
            category,
            anchor: parent.anchor,
            orbits,
        }
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{},{}", self.category, self.anchor.0, self.anchor.1)?;
        for d in &self.orbits {
            write!(f, "/{d}")?;
        }
        Ok(())
    }
}

/// Error parsing an identity string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed object identity '{0}'")]
pub struct ParseObjectIdError(pub String);

impl FromStr for ObjectId {
    type Err = ParseObjectIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseObjectIdError(s.to_string());
        let (tag, rest) = s.split_once('@').ok_or_else(err)?;
        let category = Category::from_tag(tag).ok_or_else(err)?;
        let mut parts = rest.split('/');
        let anchor = parts.next().ok_or_else(err)?;
        let (x, y) = anchor.split_once(',').ok_or_else(err)?;
        let anchor = (
            x.parse::<i64>().map_err(|_| err())?,
            y.parse::<i64>().map_err(|_| err())?,
        );
        let orbits = parts
            .map(|d| d.parse::<u32>().map_err(|_| err()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            category,
            anchor,
            orbits,
        })
    }
}

impl TryFrom<String> for ObjectId {
    type Error = ParseObjectIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ObjectId> for String {
    fn from(id: ObjectId) -> Self {
        id.to_string()
    }
}

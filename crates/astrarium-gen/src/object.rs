use astrarium_core::math::{ellipse_point, orbit_point};
use astrarium_core::types::{ChunkCoord, WorldPos};
use astrarium_core::{Category, ObjectId};
use serde::{Deserialize, Serialize};

/// Decorative background star. Not individually discoverable.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundStar {
    pub position: WorldPos,
    pub size: f64,
    pub brightness: f64,
    pub color: &'static str,
}

/// Visual effect parameters shared by every category.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Effects {
    pub corona: bool,
    pub rings: bool,
    pub pulse_speed: f64,
    pub glow: f64,
}

/// Circular orbit around a parent body.
///
/// `parent` is a lookup key only. The parent may live in another chunk or be
/// evicted; `center` holds its last known position.
#[derive(Debug, Clone, PartialEq)]
pub struct Orbit {
    pub parent: ObjectId,
    pub center: WorldPos,
    pub distance: f64,
    pub angle: f64,
    pub speed: f64,
}

impl Orbit {
    pub fn position(&self) -> WorldPos {
        orbit_point(self.center, self.distance, self.angle)
    }

    pub fn advance(&mut self, dt: f64) {
        self.angle = (self.angle + self.speed * dt).rem_euclid(std::f64::consts::TAU);
    }
}

/// Closed elliptical path followed by a comet.
#[derive(Debug, Clone, PartialEq)]
pub struct CometPath {
    pub center: WorldPos,
    pub semi_major: f64,
    pub semi_minor: f64,
    pub rotation: f64,
    pub phase: f64,
    pub speed: f64,
}

impl CometPath {
    pub fn position(&self) -> WorldPos {
        ellipse_point(
            self.center,
            self.semi_major,
            self.semi_minor,
            self.rotation,
            self.phase,
        )
    }

    pub fn advance(&mut self, dt: f64) {
        self.phase = (self.phase + self.speed * dt).rem_euclid(std::f64::consts::TAU);
    }
}

/// Wormhole pairing designation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WormholeEnd {
    Alpha,
    Beta,
}

impl WormholeEnd {
    pub fn other(self) -> Self {
        match self {
            WormholeEnd::Alpha => WormholeEnd::Beta,
            WormholeEnd::Beta => WormholeEnd::Alpha,
        }
    }
}

/// Category-specific payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Star {
        planet_count: u32,
    },
    Planet {
        orbit: Orbit,
        moon_count: u32,
    },
    Moon {
        orbit: Orbit,
    },
    Nebula {
        extent: f64,
        cloud_count: u32,
        secondary_color: String,
    },
    AsteroidGarden {
        rock_count: u32,
        spread: f64,
    },
    Wormhole {
        designation: WormholeEnd,
        twin: WorldPos,
        twin_chunk: ChunkCoord,
        pair_id: u32,
    },
    BlackHole {
        event_horizon: f64,
        pull_radius: f64,
        pull_strength: f64,
        spin: f64,
    },
    Comet {
        path: CometPath,
        tail_length: f64,
    },
    Protostar {
        disk_radius: f64,
        accretion_rate: f64,
    },
    RoguePlanet {
        tumble_speed: f64,
    },
    DarkNebula {
        extent: f64,
        opacity: f64,
    },
    CrystalGarden {
        crystal_count: u32,
        spread: f64,
    },
}

/// A discoverable generated object.
#[derive(Debug, Clone, PartialEq)]
pub struct CelestialObject {
    pub id: ObjectId,
    pub category: Category,
    pub variant: String,
    pub position: WorldPos,
    pub radius: f64,
    pub color: String,
    /// Rarity weight of the selected variant.
    pub rarity: f64,
    pub effects: Effects,
    pub discovered: bool,
    pub display_name: Option<String>,
    pub discovery_distance: f64,
    pub body: Body,
}

impl CelestialObject {
    pub fn orbit(&self) -> Option<&Orbit> {
        match &self.body {
            Body::Planet { orbit, .. } | Body::Moon { orbit } => Some(orbit),
            _ => None,
        }
    }

    pub fn orbit_mut(&mut self) -> Option<&mut Orbit> {
        match &mut self.body {
            Body::Planet { orbit, .. } | Body::Moon { orbit } => Some(orbit),
            _ => None,
        }
    }

    /// Identity of the parent body, for orbiting objects.
    pub fn parent(&self) -> Option<&ObjectId> {
        self.orbit().map(|o| &o.parent)
    }

    /// Twin position and designation, for wormholes.
    pub fn wormhole_twin(&self) -> Option<(WorldPos, WormholeEnd)> {
        match &self.body {
            Body::Wormhole {
                twin, designation, ..
            } => Some((*twin, *designation)),
            _ => None,
        }
    }

    /// Advance along the object's own path. Orbiting bodies move around
    /// their stored centre; callers refresh the centre from the parent.
    pub fn update_position(&mut self, dt: f64) {
        match &mut self.body {
            Body::Planet { orbit, .. } | Body::Moon { orbit } => {
                orbit.advance(dt);
                self.position = orbit.position();
            }
            Body::Comet { path, .. } => {
                path.advance(dt);
                self.position = path.position();
            }
            _ => {}
        }
    }

    /// Move an orbiting body's centre to its parent's current position.
    pub fn follow_parent(&mut self, parent_position: WorldPos) {
        if let Some(orbit) = self.orbit_mut() {
            orbit.center = parent_position;
            let position = orbit.position();
            self.position = position;
        }
    }

    /// True when undiscovered and within discovery range of `viewer`.
    pub fn check_discovery(&self, viewer: WorldPos) -> bool {
        !self.discovered && self.position.distance(viewer) <= self.discovery_distance
    }
}

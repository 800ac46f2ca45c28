//! Scripted black-hole pull. Not an N-body simulation: each black hole
//! contributes a falloff toward its centre inside its pull radius.

use astrarium_core::types::WorldPos;
use astrarium_gen::{Body, CelestialObject};
use glam::DVec2;

/// Summed pull acceleration at `pos` from `black_holes`.
pub fn pull_at<'a>(black_holes: impl IntoIterator<Item = &'a CelestialObject>, pos: WorldPos) -> DVec2 {
    black_holes
        .into_iter()
        .filter_map(|hole| match hole.body {
            Body::BlackHole {
                pull_radius,
                pull_strength,
                ..
            } => {
                let offset = hole.position - pos;
                let d = offset.length();
                if d >= pull_radius || d <= f64::EPSILON {
                    return None;
                }
                let falloff = 1.0 - d / pull_radius;
                Some(offset / d * pull_strength * falloff * falloff)
            }
            _ => None,
        })
        .fold(DVec2::ZERO, |acc, pull| acc + pull)
}

/// The first black hole whose event horizon contains `pos`.
pub fn collision<'a>(
    black_holes: impl IntoIterator<Item = &'a CelestialObject>,
    pos: WorldPos,
) -> Option<&'a CelestialObject> {
    black_holes.into_iter().find(|hole| match hole.body {
        Body::BlackHole { event_horizon, .. } => hole.position.distance(pos) <= event_horizon,
        _ => false,
    })
}

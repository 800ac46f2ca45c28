use astrarium_core::constants::STORE_FORMAT_VERSION;

use crate::error::PersistError;
use crate::format::RecordEnvelope;
use crate::record::DiscoveryRecord;

/// Reject envelopes written by an unknown format version.
pub fn validate_envelope(envelope: &RecordEnvelope) -> Result<(), PersistError> {
    if envelope.version != STORE_FORMAT_VERSION {
        return Err(PersistError::UnsupportedVersion(envelope.version));
    }
    Ok(())
}

/// Split loaded current-universe records into those belonging to
/// `universe_seed` and compatibility warnings for the rest.
///
/// Records from another universe can appear when the seed key was lost or
/// rewritten without the discovery key; they are dropped, not reattached.
pub fn retain_universe(
    records: Vec<DiscoveryRecord>,
    universe_seed: u32,
) -> (Vec<DiscoveryRecord>, Vec<String>) {
    let mut warnings = Vec::new();
    let total = records.len();
    let kept: Vec<DiscoveryRecord> = records
        .into_iter()
        .filter(|r| r.universe_seed == universe_seed)
        .collect();
    let dropped = total - kept.len();
    if dropped > 0 {
        warnings.push(format!(
            "Dropped {dropped} discovery record(s) from a different universe \
             (current seed {universe_seed})."
        ));
    }
    (kept, warnings)
}

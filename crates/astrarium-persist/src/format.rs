use astrarium_core::constants::STORE_FORMAT_VERSION;
use serde::{Deserialize, Serialize};

use crate::compat::validate_envelope;
use crate::error::PersistError;
use crate::record::DiscoveryRecord;

/// Key of the current universe seed (decimal string).
pub const UNIVERSE_SEED_KEY: &str = "astrarium.universe_seed";
/// Key of the reset counter (decimal string).
pub const RESET_COUNT_KEY: &str = "astrarium.reset_count";
/// Key of the current universe's discovery records.
pub const DISCOVERIES_KEY: &str = "astrarium.discoveries";
/// Key of the append-only log of discoveries across every universe.
pub const LIFETIME_KEY: &str = "astrarium.lifetime_discoveries";

/// Versioned JSON wrapper around a record list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordEnvelope {
    pub version: u32,
    pub records: Vec<DiscoveryRecord>,
}

/// Serialize records into a current-version envelope.
pub fn encode_records(records: &[DiscoveryRecord]) -> Result<String, PersistError> {
    let envelope = RecordEnvelope {
        version: STORE_FORMAT_VERSION,
        records: records.to_vec(),
    };
    serde_json::to_string(&envelope).map_err(|e| PersistError::Encode(e.to_string()))
}

/// Parse an envelope stored under `key` and check its version.
pub fn decode_records(key: &str, text: &str) -> Result<Vec<DiscoveryRecord>, PersistError> {
    let envelope: RecordEnvelope =
        serde_json::from_str(text).map_err(|e| PersistError::Malformed {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
    validate_envelope(&envelope)?;
    Ok(envelope.records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use astrarium_core::{Category, ObjectId};

    fn record(x: i64) -> DiscoveryRecord {
        DiscoveryRecord::new(
            ObjectId::anchored(Category::Star, (x, 0)),
            format!("Star {x}"),
            x as u64,
            [x as f64, 0.0],
            42,
        )
    }

    #[test]
    fn test_envelope_shape() {
        let text = encode_records(&[record(1)]).expect("encode");
        let value: serde_json::Value = serde_json::from_str(&text).expect("json");
        assert_eq!(value["version"], 1);
        assert_eq!(value["records"][0]["id"], "star@1,0");
    }

    #[test]
    fn test_decode_encoded() {
        let records = vec![record(1), record(2)];
        let text = encode_records(&records).expect("encode");
        assert_eq!(decode_records(DISCOVERIES_KEY, &text).expect("decode"), records);
    }

    #[test]
    fn test_decode_malformed_json() {
        let result = decode_records(DISCOVERIES_KEY, "{not json");
        assert!(matches!(result, Err(PersistError::Malformed { .. })));
    }

    #[test]
    fn test_decode_bad_identity_is_malformed() {
        let text = r#"{"version":1,"records":[{"id":"quasar@1,2","category":"Star","discovered":true,"display_name":"x","timestamp_ms":0,"position":[0.0,0.0],"universe_seed":1}]}"#;
        let result = decode_records(DISCOVERIES_KEY, text);
        assert!(matches!(result, Err(PersistError::Malformed { .. })));
    }

    #[test]
    fn test_decode_future_version_rejected() {
        let text = r#"{"version":9,"records":[]}"#;
        let result = decode_records(LIFETIME_KEY, text);
        assert!(matches!(result, Err(PersistError::UnsupportedVersion(9))));
    }
}

//! Universe seed and reset counter persistence.

use astrarium_core::GenerationContext;

use crate::error::PersistError;
use crate::format::{RESET_COUNT_KEY, UNIVERSE_SEED_KEY};
use crate::kv::KeyValueStore;

fn read_u32(store: &dyn KeyValueStore, key: &str) -> Result<Option<u32>, PersistError> {
    match store.get(key)? {
        None => Ok(None),
        Some(text) => text
            .trim()
            .parse::<u32>()
            .map(Some)
            .map_err(|e| PersistError::Malformed {
                key: key.to_string(),
                reason: e.to_string(),
            }),
    }
}

/// Load the stored generation context.
///
/// Absent keys (first run) fall back to `fallback`. Unreadable or malformed
/// values fall back the same way and are reported as warnings.
pub fn load_context(
    store: &dyn KeyValueStore,
    fallback: GenerationContext,
) -> (GenerationContext, Vec<String>) {
    let mut warnings = Vec::new();
    let mut read = |key: &str, default: u32| match read_u32(store, key) {
        Ok(Some(value)) => value,
        Ok(None) => default,
        Err(e) => {
            warnings.push(format!("Ignoring stored {key}: {e}"));
            default
        }
    };
    let seed = read(UNIVERSE_SEED_KEY, fallback.seed);
    let reset_count = read(RESET_COUNT_KEY, fallback.reset_count);
    (GenerationContext { seed, reset_count }, warnings)
}

/// Store the generation context.
pub fn save_context(
    store: &mut dyn KeyValueStore,
    context: &GenerationContext,
) -> Result<(), PersistError> {
    store.set(UNIVERSE_SEED_KEY, &context.seed.to_string())?;
    store.set(RESET_COUNT_KEY, &context.reset_count.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::{MemoryStore, UnavailableStore};

    #[test]
    fn test_first_run_uses_fallback() {
        let store = MemoryStore::new();
        let (ctx, warnings) = load_context(&store, GenerationContext::new(42));
        assert_eq!(ctx, GenerationContext::new(42));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        let ctx = GenerationContext::new(42).reborn();
        save_context(&mut store, &ctx).expect("save");
        let (loaded, warnings) = load_context(&store, GenerationContext::default());
        assert_eq!(loaded, ctx);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_malformed_values_ignored() {
        let mut store = MemoryStore::new();
        store.set(UNIVERSE_SEED_KEY, "not-a-number").expect("set");
        store.set(RESET_COUNT_KEY, "3").expect("set");
        let (ctx, warnings) = load_context(&store, GenerationContext::new(42));
        assert_eq!(ctx.seed, 42);
        assert_eq!(ctx.reset_count, 3);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_unavailable_store_falls_back() {
        let store = UnavailableStore;
        let (ctx, warnings) = load_context(&store, GenerationContext::new(9));
        assert_eq!(ctx, GenerationContext::new(9));
        assert_eq!(warnings.len(), 2);
        let mut store = UnavailableStore;
        assert!(save_context(&mut store, &ctx).is_err());
    }
}

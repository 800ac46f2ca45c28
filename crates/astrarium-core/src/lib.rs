pub mod constants;
pub mod error;
pub mod identity;
pub mod math;
pub mod rng;
pub mod seed;
pub mod types;

pub use error::GenerationError;
pub use identity::{Category, ObjectId};
pub use rng::SeededRng;
pub use seed::GenerationContext;

pub mod backoff;
pub mod commands;
pub mod engine;
pub mod ids;
pub mod model;
pub mod outcomes;
pub mod select;
pub mod snapshot;
pub mod types;

pub use backoff::*;
pub use commands::*;
pub use engine::*;
pub use ids::*;
pub use model::*;
pub use outcomes::*;
pub use select::*;
pub use snapshot::*;
pub use types::*;

pub mod batch;
pub mod config;
pub mod coverage;
pub mod error;
pub mod filters;
pub mod frequency;
pub mod game;
pub mod sampler;
pub mod scoring;
pub mod seed;
pub mod selector;

pub use batch::{generate_batch, generate_batch_with_key, generate_games, generate_next_batch, Batch};
pub use config::{EngineConfig, SelectionConfig};
pub use error::{EngineError, Result};
pub use filters::{is_valid, FilterConfig, Rejection};
pub use game::{Game, BATCH_SIZE};
pub use scoring::{best_game, score_batch, GameScore, Prize};
pub use seed::{derive_seed, SeedKey};

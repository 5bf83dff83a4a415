//! MongoDB connection, health and small helpers shared by the repositories.

mod config;
mod connector;
mod errors;
mod health;
mod sequence;
pub mod uuid_string;

pub use config::MongoConfig;
pub use connector::{connect_from_config, connect_from_config_with_retry};
pub use errors::{DUPLICATE_KEY_CODE, duplicate_key_field, is_duplicate_key};
pub use health::{HealthStatus, check_health, check_health_detailed};
pub use sequence::{COUNTERS_COLLECTION, next_sequence};

pub use mongodb::{Client, Collection, Database};

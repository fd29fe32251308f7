//! Durable storage: PostgreSQL pool, migrations and backend selection

mod factory;
pub mod migrations;
mod postgres;

pub use factory::{ObjectStorageConfig, Registries, StorageConfig, StorageFactory, StorageType};
pub use migrations::{run_migrations, Migration, PostgresMigrator};
pub use postgres::{connect, PostgresConfig};

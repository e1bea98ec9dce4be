//! Built-in management commands.

pub mod migrate;
pub mod migratedown;
pub mod seed;
pub mod showmigrations;

pub use migrate::MigrateCommand;
pub use migratedown::MigratedownCommand;
pub use seed::SeedCommand;
pub use showmigrations::ShowmigrationsCommand;

use crate::command::CommandRegistry;

/// Registers all built-in commands on `registry`.
pub fn register_builtin_commands(registry: &mut CommandRegistry) {
    registry.register(Box::new(MigrateCommand));
    registry.register(Box::new(MigratedownCommand));
    registry.register(Box::new(ShowmigrationsCommand));
    registry.register(Box::new(SeedCommand));
}

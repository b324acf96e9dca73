//! Configuration types and loading for the handle updater.
//!
//! Configuration is assembled once at startup from built-in defaults, optional
//! files under `configuration/`, the `DB_*` connection variables and finally
//! `APP_`-prefixed overrides. See [`load_config`].

mod environment;
mod load;
pub mod shared;

pub use environment::Environment;
pub use load::{Config, LoadConfigError, load_config, load_config_from};

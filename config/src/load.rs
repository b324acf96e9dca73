use std::{
    borrow::Cow,
    collections::HashMap,
    fmt, io,
    path::{Path, PathBuf},
};

use rust_cli_config::builder::{ConfigBuilder, DefaultState};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::environment::{APP_ENVIRONMENT_ENV_NAME, Environment};

/// Directory containing configuration files relative to the working directory.
const CONFIGURATION_DIR: &str = "configuration";

/// Supported extensions for base and environment configuration files.
const CONFIG_FILE_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

/// Prefix for environment variable configuration overrides.
const ENV_PREFIX: &str = "APP";

/// Separator between environment variable prefix and key segments.
const ENV_PREFIX_SEPARATOR: &str = "_";

/// Separator for nested configuration keys in environment variables.
const ENV_SEPARATOR: &str = "__";

/// Trait implemented by configuration structures loadable through [`load_config`].
pub trait Config {
    /// Built-in `(key, value)` defaults applied before any other source.
    const DEFAULTS: &'static [(&'static str, &'static str)] = &[];

    /// Plain environment variables mapped onto dotted configuration keys.
    ///
    /// These are layered above the configuration files and below the `APP_` overrides.
    const ENV_ALIASES: &'static [(&'static str, &'static str)] = &[];
}

/// Identifies which configuration file is currently being loaded.
#[derive(Debug, Clone, Copy)]
enum ConfigFileKind {
    /// Base configuration shared by every environment.
    Base,
    /// Environment-specific overrides (dev/prod).
    Environment(Environment),
}

impl ConfigFileKind {
    fn stem(&self) -> Cow<'static, str> {
        match self {
            ConfigFileKind::Base => Cow::Borrowed("base"),
            ConfigFileKind::Environment(env) => Cow::Owned(env.to_string()),
        }
    }
}

impl fmt::Display for ConfigFileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigFileKind::Base => f.write_str("base configuration"),
            ConfigFileKind::Environment(env) => write!(f, "{env} environment configuration"),
        }
    }
}

/// Errors that can occur while loading configuration files and overrides.
#[derive(Debug, Error)]
pub enum LoadConfigError {
    /// Failed to determine the current working directory.
    #[error("failed to determine the current directory: {0}")]
    CurrentDir(#[source] io::Error),

    /// A configuration file existed but could not be parsed.
    #[error("failed to load {kind_description} from `{path}`: {source}")]
    ConfigurationFileLoad {
        kind_description: String,
        path: PathBuf,
        source: rust_cli_config::ConfigError,
    },

    /// A built-in default could not be registered.
    #[error("failed to register default for `{key}`: {source}")]
    Default {
        key: &'static str,
        source: rust_cli_config::ConfigError,
    },

    /// The configuration sources were merged but deserialization failed.
    #[error("failed to deserialize configuration: {0}")]
    Deserialization(#[source] rust_cli_config::ConfigError),

    /// Failed to determine the runtime environment (`APP_ENVIRONMENT`).
    #[error("failed to determine runtime environment: {0}")]
    Environment(#[from] io::Error),

    /// Failed to build the merged configuration.
    #[error("failed to initialize configuration builder: {0}")]
    Builder(#[source] rust_cli_config::ConfigError),
}

/// Loads layered configuration for `T` from the process environment.
///
/// Reads optional files from `configuration/base.(yaml|yml|json)` and
/// `configuration/{environment}.(yaml|yml|json)` in the current directory, then applies
/// `T::ENV_ALIASES` and finally `APP_`-prefixed overrides. Nested keys use double
/// underscores (`APP_DATABASE__HOST`).
pub fn load_config<T>() -> Result<T, LoadConfigError>
where
    T: Config + DeserializeOwned,
{
    let base_path = std::env::current_dir().map_err(LoadConfigError::CurrentDir)?;
    let variables: HashMap<String, String> = std::env::vars().collect();

    load_config_from(&base_path.join(CONFIGURATION_DIR), &variables)
}

/// Loads layered configuration for `T` from an explicit directory and variable set.
///
/// Missing configuration files are skipped; a file that exists but fails to parse is an error.
pub fn load_config_from<T>(
    configuration_directory: &Path,
    variables: &HashMap<String, String>,
) -> Result<T, LoadConfigError>
where
    T: Config + DeserializeOwned,
{
    let environment =
        Environment::from_value(variables.get(APP_ENVIRONMENT_ENV_NAME).cloned())?;

    let mut builder = rust_cli_config::Config::builder();
    for (key, value) in T::DEFAULTS {
        builder = builder
            .set_default(*key, *value)
            .map_err(|source| LoadConfigError::Default { key: *key, source })?;
    }

    for kind in [ConfigFileKind::Base, ConfigFileKind::Environment(environment)] {
        if let Some(path) = find_configuration_file(configuration_directory, kind) {
            builder = builder.add_source(rust_cli_config::File::from(path.clone()));
            validate_configuration_source(&builder, kind, &path)?;
        }
    }

    // Aliases are rewritten into `SECTION__KEY` form so a plain environment source
    // can split them into nested keys.
    let aliased: HashMap<String, String> = T::ENV_ALIASES
        .iter()
        .filter_map(|(variable, key)| {
            variables
                .get(*variable)
                .map(|value| (key.replace('.', ENV_SEPARATOR), value.clone()))
        })
        .collect();
    builder = builder.add_source(
        rust_cli_config::Environment::default()
            .separator(ENV_SEPARATOR)
            .source(Some(aliased)),
    );

    let override_source = rust_cli_config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator(ENV_PREFIX_SEPARATOR)
        .separator(ENV_SEPARATOR)
        .source(Some(variables.clone()));

    let settings = builder
        .add_source(override_source)
        .build()
        .map_err(LoadConfigError::Builder)?;

    settings
        .try_deserialize::<T>()
        .map_err(LoadConfigError::Deserialization)
}

/// Finds the configuration file that matches the requested kind, if any.
fn find_configuration_file(directory: &Path, kind: ConfigFileKind) -> Option<PathBuf> {
    let stem = kind.stem();

    CONFIG_FILE_EXTENSIONS
        .iter()
        .map(|extension| directory.join(format!("{stem}.{extension}")))
        .find(|path| path.is_file())
}

fn validate_configuration_source(
    builder: &ConfigBuilder<DefaultState>,
    kind: ConfigFileKind,
    path: &Path,
) -> Result<(), LoadConfigError> {
    builder
        .clone()
        .build()
        .map_err(|source| LoadConfigError::ConfigurationFileLoad {
            kind_description: kind.to_string(),
            path: path.to_path_buf(),
            source,
        })
        .map(|_| ())
}

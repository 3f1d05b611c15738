//! Configuration loading with environment detection and overrides.

use config::{Config, Environment, File};
use tracing::info;

use super::AppConfig;
use crate::error::Result;
use crate::logging::get_environment;

/// Load configuration for the current environment.
///
/// Sources, later entries overriding earlier ones:
/// 1. built-in defaults ([`AppConfig::default`])
/// 2. `config/famfund.toml` (optional)
/// 3. `config/famfund.<environment>.toml` (optional)
/// 4. `FAMFUND_`-prefixed environment variables (`FAMFUND_DATABASE__URL`, ...)
pub fn load() -> Result<AppConfig> {
    let environment = get_environment();

    let config: AppConfig = Config::builder()
        .add_source(File::with_name("config/famfund").required(false))
        .add_source(File::with_name(&format!("config/famfund.{environment}")).required(false))
        .add_source(Environment::with_prefix("FAMFUND").separator("__"))
        .build()?
        .try_deserialize()?;

    info!(
        environment = %environment,
        bind_address = %config.server.bind_address,
        "configuration loaded"
    );

    Ok(config)
}

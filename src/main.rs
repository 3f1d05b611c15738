//! Famfund API server entry point.

use famfund::config::AppConfig;
use famfund::{database, logging, web};

#[tokio::main]
async fn main() -> famfund::Result<()> {
    logging::init_structured_logging();

    let config = AppConfig::load()?;
    let pool = database::connect(&config.database).await?;

    web::serve(config, pool).await
}

use anyhow::Context;

use crate::config::AppConfig;
use crate::database::PgStore;

pub async fn handle(config: AppConfig) -> anyhow::Result<()> {
    let store = PgStore::connect(&config.database)
        .await
        .context("failed to connect to database")?;

    store
        .bootstrap()
        .await
        .context("failed to create schema")?;

    println!("All tables are set up and predefined categories are in place.");
    store.close().await;
    Ok(())
}

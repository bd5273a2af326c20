use anyhow::Result;

use crate::core::AppConfig;
use crate::core::db::{async_db, initialize_db};

pub async fn run() -> Result<()> {
    let config = AppConfig::default();
    let db = async_db(&config.db_path).await?;
    db.call(|conn| {
        initialize_db(conn).expect("Failed to initialize db schema");
        Ok(())
    })
    .await?;
    println!("Database initialized at {}", config.db_path);
    Ok(())
}

use anyhow::Result;
use std::io::{self, Write};

use crate::api::routes::oauth::router::consent_url;
use crate::core::AppConfig;
use crate::core::db::async_db;
use crate::credentials::register_doctor;

/// Operator-assisted registration: print the consent URL, paste the
/// code Google shows after authorization, store the credential.
pub async fn run(doctor_id: &str) -> Result<()> {
    let config = AppConfig::default();

    let auth_url = consent_url(&config, doctor_id);
    println!(
        "\nPlease open the following URL in your browser and authorize access:\n\n{}\n",
        auth_url
    );
    print!("Paste the authorization code shown by Google here: ");
    io::stdout().flush().unwrap();
    let mut code = String::new();
    io::stdin()
        .read_line(&mut code)
        .expect("Failed to read code");
    let code = code.trim();

    let db = async_db(&config.db_path)
        .await
        .expect("Failed to connect to db");
    let credential = register_doctor(&db, &config, code, doctor_id).await?;
    println!(
        "Doctor {} registered with calendar {}.",
        doctor_id, credential.email
    );

    Ok(())
}

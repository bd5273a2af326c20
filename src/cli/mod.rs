use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod auth;
pub mod init;
pub mod serve;

#[derive(Subcommand)]
enum Command {
    /// Create the database schema
    Init {},
    /// Run the API server
    Serve {
        /// Set the server host address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Set the server port
        #[arg(long, default_value = "8080")]
        port: String,
    },
    /// Register a doctor's calendar by completing the OAuth flow on
    /// the command line
    Auth {
        /// Identifier for the doctor being registered
        #[arg(long)]
        doctor_id: String,
    },
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();

    // Handle each sub command
    match args.command {
        Some(Command::Init {}) => {
            init::run().await?;
        }
        Some(Command::Serve { host, port }) => {
            serve::run(host, port).await;
        }
        Some(Command::Auth { doctor_id }) => {
            auth::run(&doctor_id).await?;
        }
        None => {}
    }

    Ok(())
}

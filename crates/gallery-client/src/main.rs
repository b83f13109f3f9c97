//! Command-line driver for the gallery.
//!
//! ```text
//! gallery [--user <ID>] list
//! gallery add <uri> [caption...]
//! gallery remove <id>
//! gallery clear
//! ```

use anyhow::Context;
use clap::Parser;
use tracing::info;

use gallery_client::cli::{self, Cli, Command};
use gallery_client::{init_tracing, AppState, ClientConfig};
use gallery_shared::constants::APP_NAME;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing();
    info!("Starting {} v{}", APP_NAME, env!("CARGO_PKG_VERSION"));

    let mut config = ClientConfig::from_env();
    cli.apply(&mut config);
    info!(
        auth_mode = %config.auth_mode,
        db_path = ?config.db_path,
        migrate_on_start = config.migrate_on_start,
        "Loaded configuration"
    );

    let state = AppState::bootstrap(config).context("Failed to open gallery")?;
    let items = cli::run(&state, cli.command.unwrap_or(Command::List)).await?;

    for item in items {
        println!("{}\t{}\t{}", item.id, item.caption, item.uri);
    }

    Ok(())
}

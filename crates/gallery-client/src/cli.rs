//! The `gallery` command line.
//!
//! Each invocation signs in, performs one command against the gallery and
//! signs out again.  With the mock provider the demo user keeps a fixed id,
//! so items added by one run are listed by the next.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::info;

use gallery_shared::GalleryItem;

use crate::config::ClientConfig;
use crate::state::AppState;

/// Owner id used by the mock provider when neither `--user` nor
/// `GALLERY_USER_ID` is given.
pub const DEFAULT_CLI_USER_ID: &str = "demo-user";

#[derive(Debug, Parser)]
#[command(name = "gallery")]
#[command(about = "Manage the local photo gallery")]
#[command(version)]
pub struct Cli {
    /// Demo user to sign in as (mock provider only)
    #[arg(short, long)]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Show the signed-in user's images, newest first
    List,
    /// Save an image reference with an optional caption
    Add { uri: String, caption: Vec<String> },
    /// Delete one image by id
    Remove { id: String },
    /// Delete every stored image
    Clear,
}

impl Cli {
    /// Fold command-line overrides into `config`.
    pub fn apply(&self, config: &mut ClientConfig) {
        if let Some(user) = &self.user {
            config.mock_user_id = Some(user.clone());
        } else if config.mock_user_id.is_none() {
            config.mock_user_id = Some(DEFAULT_CLI_USER_ID.to_string());
        }
    }
}

/// Run one command and return the signed-in user's items afterwards.
pub async fn run(state: &AppState, command: Command) -> anyhow::Result<Vec<GalleryItem>> {
    let user = state.session.sign_in().await.context("Sign-in failed")?;
    info!(user_id = %user.id, name = %user.name, "Signed in");

    let gallery = state.gallery_for(Some(&user));
    gallery.load().await;

    match command {
        Command::List => {}
        Command::Add { uri, caption } => {
            if !gallery.add(&uri, &caption.join(" ")).await {
                bail!("{}", gallery.error().unwrap_or_default());
            }
        }
        Command::Remove { id } => {
            if !gallery.remove(&id).await {
                bail!("{}", gallery.error().unwrap_or_default());
            }
        }
        Command::Clear => {
            state.store.clear_all()?;
            gallery.load().await;
            info!("Gallery cleared");
        }
    }

    let items = gallery.items();
    state.session.sign_out().await?;
    Ok(items)
}

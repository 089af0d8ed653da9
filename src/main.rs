use std::sync::Arc;

use clap::{
    ArgAction, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use spomixcli::{cli, config, error, types::PkceToken};
use tokio::sync::Mutex;

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth,

    /// List your playlists and their auto-update status
    Playlists,

    /// Create a playlist filled with random tracks from the given artists
    Create(CreateOptions),

    /// Fill a playlist with random tracks from the given artists
    Fill(FillOptions),

    /// Refresh all auto-update playlists
    Update(UpdateOptions),

    /// Manage the local response cache
    Cache(CacheOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct CreateOptions {
    /// Name of the new playlist
    name: String,

    /// Artist ID to sample from; can be repeated
    #[clap(
        long = "artist",
        action = ArgAction::Append,
        num_args = 1,
        required = true
    )]
    artists: Vec<String>,

    /// Number of tracks to select
    #[clap(long, default_value_t = 30)]
    count: usize,

    /// Playlist description
    #[clap(long)]
    description: Option<String>,

    /// Embed the artist list as an auto-update marker in the description
    #[clap(long)]
    auto_update: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct FillOptions {
    /// Target playlist ID
    playlist_id: String,

    /// Artist ID to sample from; can be repeated
    #[clap(
        long = "artist",
        action = ArgAction::Append,
        num_args = 1,
        required = true
    )]
    artists: Vec<String>,

    /// Number of tracks to select
    #[clap(long, default_value_t = 30)]
    count: usize,

    /// Replace current playlist contents instead of appending
    #[clap(long)]
    replace: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct UpdateOptions {
    /// Only update the playlist with this ID
    #[clap(long)]
    playlist: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct CacheOptions {
    #[command(subcommand)]
    command: CacheSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CacheSubcommand {
    /// Remove all cached API responses
    Clear,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth => {
            let oauth_result: Arc<Mutex<Option<PkceToken>>> = Arc::new(Mutex::new(None));
            cli::auth(Arc::clone(&oauth_result)).await;
        }
        Command::Playlists => cli::list_playlists().await,
        Command::Create(opt) => {
            cli::create(
                opt.name,
                opt.description,
                opt.artists,
                opt.count,
                opt.auto_update,
            )
            .await
        }
        Command::Fill(opt) => {
            cli::fill(opt.playlist_id, opt.artists, opt.count, opt.replace).await
        }
        Command::Update(opt) => cli::update(opt.playlist).await,
        Command::Cache(opt) => match opt.command {
            CacheSubcommand::Clear => cli::clear_cache().await,
        },
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}

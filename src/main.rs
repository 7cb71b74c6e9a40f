use clap::{
    Args, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use tidalcli::{
    cli::{self, TrackFilter},
    config, error,
    tidal::Pagination,
};

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
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with the TIDAL API using the configured client credentials
    Auth,

    /// Fetch a single track
    Track(TrackOptions),

    /// List tracks by ids, artist, ISRC or similarity
    Tracks(TracksOptions),

    /// Show version and configured endpoints
    Info,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct TrackOptions {
    /// Track id
    pub id: String,

    /// Country code (defaults to TIDAL_COUNTRY_CODE or US)
    #[clap(long)]
    pub country: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct TracksOptions {
    #[command(flatten)]
    pub filter: TrackFilterArgs,

    /// Country code (defaults to TIDAL_COUNTRY_CODE or US)
    #[clap(long)]
    pub country: Option<String>,

    /// Number of items to skip
    #[clap(long)]
    pub offset: Option<u32>,

    /// Maximum number of items to return
    #[clap(long)]
    pub limit: Option<u32>,
}

#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct TrackFilterArgs {
    /// Comma separated track ids
    #[clap(long, value_delimiter = ',', num_args = 1..)]
    pub ids: Option<Vec<String>>,

    /// Tracks of an artist
    #[clap(long)]
    pub artist: Option<String>,

    /// Tracks with an ISRC
    #[clap(long)]
    pub isrc: Option<String>,

    /// Tracks similar to a track
    #[clap(long)]
    pub similar: Option<String>,
}

impl From<TrackFilterArgs> for TrackFilter {
    fn from(args: TrackFilterArgs) -> Self {
        match args {
            TrackFilterArgs { ids: Some(ids), .. } => TrackFilter::Ids(ids),
            TrackFilterArgs {
                artist: Some(artist),
                ..
            } => TrackFilter::Artist(artist),
            TrackFilterArgs { isrc: Some(isrc), .. } => TrackFilter::Isrc(isrc),
            TrackFilterArgs {
                similar: Some(track_id),
                ..
            } => TrackFilter::Similar(track_id),
            // clap enforces exactly one filter
            _ => TrackFilter::Ids(Vec::new()),
        }
    }
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tidalcli=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Auth => cli::auth().await,
        Command::Track(opt) => cli::track(opt.id, opt.country).await,
        Command::Tracks(opt) => {
            let page = Pagination::new(opt.offset, opt.limit);
            cli::tracks(opt.filter.into(), opt.country, page).await
        }
        Command::Info => {
            cli::info();
            Ok(())
        }
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        error!("{}", e);
    }
}

//! moviedeck - terminal movie catalog browser backed by TMDB.

/// Application configuration (TOML).
mod config;

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::config::{AppConfig, open_log_file, resolve_config_dir, resolve_config_path};
use moviedeck_api::tmdb::{
    LocalTmdbApi, MAX_PAGE, MovieAggregate, MovieList, MoviePage, SearchMovieParams, TmdbClient,
};
use moviedeck_tui::detail::{CAST_DISPLAY_LIMIT, TRAILER_DISPLAY_LIMIT, summary_fields};
use moviedeck_tui::format::{fmt_rating, release_year};
use moviedeck_tui::route::Route;

/// CLI argument parser.
#[derive(Parser)]
#[command(name = "moviedeck", about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// TMDB v3 API key (overrides `TMDB_API_KEY` and the config file).
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Response language (e.g. "pt-BR", "en-US").
    #[arg(long, global = true)]
    language: Option<String>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Browse the catalog interactively.
    Browse(BrowseArgs),
    /// Print one page of a category list.
    List(ListArgs),
    /// Search movies by title.
    Search(SearchArgs),
    /// Show one movie with its cast and trailers.
    Show(ShowArgs),
    /// Config file operations.
    Config(ConfigCommand),
    /// Print a shell completion script.
    Completions(CompletionsArgs),
}

/// Arguments for the `browse` subcommand.
#[derive(clap::Args)]
struct BrowseArgs {
    /// Start route ("/" or "/movie/{id}").
    #[arg(long, default_value_t = Route::Catalog)]
    route: Route,
}

/// Arguments for the `list` subcommand.
#[derive(clap::Args)]
struct ListArgs {
    /// Category: now-playing, popular, top-rated.
    #[arg(long, default_value_t = MovieList::NowPlaying)]
    filter: MovieList,

    /// Page number (1-500).
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_PAGE)))]
    page: u32,
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search query (e.g. "batman").
    #[arg(long, required = true)]
    query: String,

    /// Page number (1-500).
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_PAGE)))]
    page: u32,

    /// Filter by release year.
    #[arg(long)]
    year: Option<u32>,
}

/// Arguments for the `show` subcommand.
#[derive(clap::Args)]
struct ShowArgs {
    /// TMDB movie ID (e.g. 27205).
    #[arg(long, required = true)]
    id: u64,

    /// Print the merged raw record as JSON.
    #[arg(long)]
    json: bool,
}

/// Arguments for the `config` subcommand.
#[derive(clap::Args)]
struct ConfigCommand {
    /// Config subcommand to run.
    #[command(subcommand)]
    command: ConfigSubcommands,
}

/// Available config subcommands.
#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Print the resolved config file path.
    Path,
    /// Write a starter config file.
    Init,
}

/// Arguments for the `completions` subcommand.
#[derive(clap::Args)]
struct CompletionsArgs {
    /// Target shell.
    shell: Shell,
}

/// Builds a `TmdbClient` from flags, `TMDB_API_KEY`, and the config file.
///
/// # Errors
///
/// Returns an error if no API key is configured, the base URL is invalid,
/// or the client fails to build.
#[instrument(skip_all)]
fn build_tmdb_client(cli: &Cli, config: &AppConfig) -> Result<TmdbClient> {
    let env_key = std::env::var("TMDB_API_KEY").ok();
    let api_key = config
        .tmdb
        .resolve_api_key(cli.api_key.as_deref(), env_key.as_deref())
        .context(
            "TMDB API key is required: pass --api-key, set TMDB_API_KEY, or add api_key under [tmdb] in the config file",
        )?;
    let language = config.tmdb.resolve_language(cli.language.as_deref());

    let mut builder = TmdbClient::builder()
        .api_key(api_key)
        .language(language)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
    if let Some(base_url) = config.tmdb.base_url.as_deref() {
        let url = Url::parse(base_url)
            .with_context(|| format!("invalid [tmdb] base_url: {base_url}"))?;
        builder = builder.base_url(url);
    }
    builder.build().context("failed to build TMDB client")
}

/// Loads the config file for the current invocation.
fn load_config(cli: &Cli) -> Result<AppConfig> {
    let path = resolve_config_path(cli.dir.as_ref())?;
    AppConfig::load(&path)
}

/// Logs one page of movies as a table.
fn log_movie_page(page: &MoviePage) {
    tracing::info!(
        "Page {} of {} ({} results)",
        page.page,
        page.total_pages.min(MAX_PAGE),
        page.total_results
    );
    tracing::info!("ID\tYear\tRating\tTitle");
    for movie in &page.results {
        tracing::info!(
            "{}\t{}\t{}\t{}",
            movie.id,
            release_year(movie.release_date.as_deref())
                .map_or_else(|| String::from("----"), |y| y.to_string()),
            fmt_rating(movie.vote_average),
            movie.title,
        );
    }
}

/// Runs the `browse` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the terminal fails.
#[instrument(skip_all, fields(route = %args.route))]
async fn run_browse(cli: &Cli, args: &BrowseArgs) -> Result<()> {
    let config = load_config(cli)?;
    let client = build_tmdb_client(cli, &config)?;
    let language = String::from(client.language());

    tracing::info!(language = %language, "starting browser");
    moviedeck_tui::run_browser(Arc::new(client), language, args.route).await
}

/// Runs the `list` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the API request fails.
#[instrument(skip_all, fields(filter = %args.filter, page = args.page))]
async fn run_list(cli: &Cli, args: &ListArgs) -> Result<()> {
    let config = load_config(cli)?;
    let client = build_tmdb_client(cli, &config)?;

    let page = client
        .movie_list(args.filter, args.page)
        .await
        .with_context(|| format!("TMDB {} request failed", args.filter.label()))?;

    tracing::info!("{}", args.filter.label());
    log_movie_page(&page);
    Ok(())
}

/// Runs the `search` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the API request fails.
#[instrument(skip_all, fields(page = args.page))]
async fn run_search(cli: &Cli, args: &SearchArgs) -> Result<()> {
    let query = args.query.trim();
    if query.is_empty() {
        bail!("--query must not be empty");
    }

    let config = load_config(cli)?;
    let client = build_tmdb_client(cli, &config)?;

    let mut params = SearchMovieParams::new(query).page(args.page);
    if let Some(year) = args.year {
        params = params.year(year);
    }

    let page = client
        .search_movie(&params)
        .await
        .context("TMDB search/movie request failed")?;

    log_movie_page(&page);
    Ok(())
}

/// Runs the `show` subcommand.
///
/// The three requests run concurrently. Only the core record is required;
/// a failed cast or trailer request leaves that list empty.
///
/// # Errors
///
/// Returns an error if the client fails to build or the core request fails.
#[instrument(skip_all, fields(movie_id = args.id))]
async fn run_show(cli: &Cli, args: &ShowArgs) -> Result<()> {
    let config = load_config(cli)?;
    let client = build_tmdb_client(cli, &config)?;

    let (details, credits, videos) = futures::join!(
        client.movie_details(args.id),
        client.movie_credits(args.id),
        client.movie_videos(args.id),
    );
    let details = details.with_context(|| format!("TMDB movie/{} request failed", args.id))?;
    let cast = credits.map(|c| c.cast).unwrap_or_else(|err| {
        tracing::warn!(error = %format!("{err:#}"), "failed to load cast");
        Vec::new()
    });
    let trailers = videos.map(|v| v.results).unwrap_or_else(|err| {
        tracing::warn!(error = %format!("{err:#}"), "failed to load trailers");
        Vec::new()
    });
    let aggregate = MovieAggregate::new(details)
        .with_cast(cast)
        .with_trailers(trailers);

    if args.json {
        let json = aggregate.to_pretty_json()?;
        writeln!(io::stdout().lock(), "{json}").context("failed to write to stdout")?;
        return Ok(());
    }

    log_aggregate(&aggregate, client.language());
    Ok(())
}

/// Logs the rendered detail view of an aggregate.
fn log_aggregate(aggregate: &MovieAggregate, language: &str) {
    for (label, value) in summary_fields(&aggregate.details, language) {
        tracing::info!("{label}: {value}");
    }
    tracing::info!(
        "Overview: {}",
        aggregate.details.overview.as_deref().unwrap_or("-")
    );
    tracing::info!("---");
    tracing::info!("Cast:");
    for member in aggregate.cast.iter().take(CAST_DISPLAY_LIMIT) {
        tracing::info!("  {}", member.credit_line());
    }
    tracing::info!("Trailers:");
    for video in aggregate.trailers.iter().take(TRAILER_DISPLAY_LIMIT) {
        tracing::info!("  {}  {}", video.name, video.embed_url());
    }
}

/// Runs the `config path` subcommand.
fn run_config_path(dir: Option<&PathBuf>) -> Result<()> {
    let path = resolve_config_path(dir)?;
    writeln!(io::stdout().lock(), "{}", path.display()).context("failed to write to stdout")
}

/// Runs the `config init` subcommand.
///
/// # Errors
///
/// Returns an error if the config file already exists or cannot be written.
fn run_config_init(dir: Option<&PathBuf>) -> Result<()> {
    let path = resolve_config_path(dir)?;
    if path.exists() {
        bail!("config file already exists: {}", path.display());
    }
    AppConfig::starter().save(&path)?;
    tracing::info!("Wrote {}", path.display());
    Ok(())
}

/// Runs the `completions` subcommand.
fn run_completions(shell: Shell) {
    let mut command = Cli::command();
    clap_complete::generate(shell, &mut command, "moviedeck", &mut io::stdout());
}

impl Commands {
    /// Returns `true` when stdout carries machine-readable output that log
    /// lines must stay out of.
    const fn writes_raw_stdout(&self) -> bool {
        match self {
            Self::Show(args) => args.json,
            Self::Config(cmd) => matches!(cmd.command, ConfigSubcommands::Path),
            Self::Completions(_) => true,
            Self::Browse(_) | Self::List(_) | Self::Search(_) => false,
        }
    }
}

/// Installs the tracing subscriber writing to `writer`.
fn init_tracing(writer: BoxMakeWriter, ansi: bool) {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(writer)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(writer);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The browser owns the terminal, so its logs go to a file.
    if matches!(cli.command, Commands::Browse(_)) {
        let file = open_log_file(&resolve_config_dir(cli.dir.as_ref())?)?;
        init_tracing(BoxMakeWriter::new(Mutex::new(file)), false);
    } else if cli.command.writes_raw_stdout() {
        init_tracing(BoxMakeWriter::new(io::stderr), true);
    } else {
        init_tracing(BoxMakeWriter::new(io::stdout), true);
    }

    match &cli.command {
        Commands::Browse(args) => run_browse(&cli, args).await,
        Commands::List(args) => run_list(&cli, args).await,
        Commands::Search(args) => run_search(&cli, args).await,
        Commands::Show(args) => run_show(&cli, args).await,
        Commands::Config(cmd) => match cmd.command {
            ConfigSubcommands::Path => run_config_path(cli.dir.as_ref()),
            ConfigSubcommands::Init => run_config_init(cli.dir.as_ref()),
        },
        Commands::Completions(args) => {
            run_completions(args.shell);
            Ok(())
        }
    }
}

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use http::Request;
use tours_collection::{Environment, TOP_RATED_BUDGET, TOURS_PATH, ToursConfig, ToursHttp};
use tours_db::{MemoryCollection, seed};
use tracing_subscriber::EnvFilter;
use url::{Url, form_urlencoded};

/// Run one tours API request against a JSON dump and print the response body.
#[derive(Debug, Parser)]
#[command(name = "tours", version)]
struct Cli {
    /// JSON file holding an array of tours
    #[arg(short, long, env = "TOURS_DATA")]
    data: PathBuf,

    /// JSON configuration file; without it configuration comes from TOURS_* variables
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Error detail level (development or production)
    #[arg(long)]
    env: Option<Environment>,

    /// Use the top-rated budget tours alias
    #[arg(long, conflicts_with = "id")]
    top: bool,

    /// Fetch a single tour by id instead of listing
    #[arg(long)]
    id: Option<String>,

    /// Query string, e.g. `price[gte]=500&sort=-price&limit=3`
    query: Option<String>,
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str::<ToursConfig>(&raw)
                .with_context(|| format!("failed to parse {}", path.display()))?
        }
        None => ToursConfig::from_env(),
    };
    if let Some(environment) = cli.env {
        config.environment = environment;
    }

    let mut docs = seed::load_json(&cli.data)
        .with_context(|| format!("failed to load {}", cli.data.display()))?;
    seed::stamp_defaults(&mut docs);

    let tours = MemoryCollection::new("tours");
    tours.insert_many(docs)?;
    tracing::info!(
        collection = tours.name(),
        tours = tours.len(),
        environment = %config.environment,
        "collection ready"
    );

    let handler = ToursHttp::new(tours, config);
    let req = Request::get(request_uri(&cli)?)
        .body(Vec::new())
        .context("failed to build request")?;
    let resp = handler.handle(req);

    let body: serde_json::Value =
        serde_json::from_slice(resp.body()).context("response is not JSON")?;
    println!("{}", serde_json::to_string_pretty(&body)?);

    if resp.status().is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Origin-form request target (`/api/v1/tours?...`). The query is
/// re-serialized so brackets and spaces arrive percent-encoded.
fn request_uri(cli: &Cli) -> anyhow::Result<String> {
    let mut url = Url::parse("http://localhost")?;
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|()| anyhow::anyhow!("base url cannot carry a path"))?;
        segments.clear().extend(TOURS_PATH.split('/').filter(|s| !s.is_empty()));
        match (&cli.id, cli.top) {
            (Some(id), _) => {
                segments.push(id);
            }
            (None, true) => {
                segments.push(TOP_RATED_BUDGET);
            }
            (None, false) => {}
        }
    }

    if let Some(query) = cli.query.as_deref() {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs: Vec<_> = form_urlencoded::parse(query.as_bytes()).collect();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
    }

    Ok(match url.query() {
        Some(query) => format!("{}?{query}", url.path()),
        None => url.path().to_string(),
    })
}

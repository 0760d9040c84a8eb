use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use orko::credentials::{resolve_credentials, CredentialArgs};
use orko::github::{
    clear_cache, get_cache_path, DiskCacheClient, FetchError, GitHubApi, HttpClient,
    DEFAULT_API_URL,
};
use orko::grouping::GroupMode;
use orko::output::{render, OutputFormat};
use orko::pulls::NormalizeOptions;
use orko::report::{build_report, fetch_all, resolve_repos, ReportRow};

const EXIT_SUCCESS: i32 = 0;
const EXIT_AUTH: i32 = 1;
const EXIT_NETWORK: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Parser, Debug)]
#[command(name = "orko")]
#[command(about = "Time-to-merge statistics for GitHub pull requests", long_about = None)]
#[command(version)]
struct Cli {
    /// Full repository names to query, in the format <user|org>/<repo>
    repos: Vec<String>,

    /// GitHub auth in the format <user>:<password>
    #[arg(short, long, conflicts_with_all = ["token", "anonymous"])]
    auth: Option<String>,

    /// GitHub personal access token (or set ORKO_GH_TOKEN)
    #[arg(long, conflicts_with = "anonymous")]
    token: Option<String>,

    /// Send unauthenticated requests (public repositories only)
    #[arg(long)]
    anonymous: bool,

    /// Grouping mode (defaults to user)
    #[arg(short, long, value_enum)]
    group: Option<GroupMode>,

    /// Output format (defaults to table)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Also query every repository of this organization
    #[arg(short, long)]
    org: Option<String>,

    /// Path to config file (defaults to ~/.config/orko/config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for cached API responses
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Always hit the GitHub API; neither read nor write the cache
    #[arg(long)]
    no_cache: bool,

    /// Delete cached API responses before running
    #[arg(long)]
    clear_cache: bool,

    /// Only count PRs opened on weekdays between 07:00 and 17:59 local time
    #[arg(long)]
    working_hours: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "orko=debug" } else { "orko=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn fetch_exit_code(err: &FetchError) -> i32 {
    match err {
        FetchError::AuthenticationOrNotFound { .. } => EXIT_AUTH,
        FetchError::MalformedResponse { .. } | FetchError::Request { .. } => EXIT_NETWORK,
    }
}

/// Fetch every repository, then turn the combined list into report rows
async fn collect<A: GitHubApi>(
    api: &A,
    repos: &[String],
    org: Option<&str>,
    options: NormalizeOptions,
    mode: GroupMode,
) -> Result<Vec<ReportRow>, FetchError> {
    let repos = resolve_repos(api, repos, org).await?;
    let raw = fetch_all(api, &repos).await?;
    Ok(build_report(&raw, options, mode))
}

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for rustls 0.23+)
    let _ = rustls::crypto::ring::default_provider().install_default();

    let cli = Cli::parse();
    init_logging(cli.verbose);
    let start_time = Instant::now();

    let config = match orko::config::load_config(cli.config.clone()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let timeout = match config.request_timeout() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let mode = cli.group.or(config.group).unwrap_or_default();
    let format = cli.format.or(config.format).unwrap_or_default();
    let options = NormalizeOptions {
        working_hours_only: cli.working_hours || config.working_hours_only.unwrap_or(false),
    };

    let repos = if cli.repos.is_empty() {
        config.repos.clone()
    } else {
        cli.repos.clone()
    };

    if repos.is_empty() && cli.org.is_none() {
        eprintln!("No repositories given.");
        eprintln!("Pass one or more <owner>/<repo> names, use --org <org>,");
        eprintln!("or list repos in ~/.config/orko/config.yaml:");
        eprintln!("  repos:");
        eprintln!("    - owner/repo");
        std::process::exit(EXIT_CONFIG);
    }

    let credential_args = CredentialArgs {
        auth: cli.auth.clone(),
        token: cli.token.clone(),
        anonymous: cli.anonymous,
    };
    let credentials = match resolve_credentials(&credential_args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Credential error: {:#}", e);
            std::process::exit(EXIT_AUTH);
        }
    };

    let api_url = config.api_url.as_deref().unwrap_or(DEFAULT_API_URL);
    let client = match HttpClient::new(api_url, credentials, timeout) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create GitHub client: {:#}", e);
            std::process::exit(EXIT_NETWORK);
        }
    };

    let cache_dir = cli
        .cache_dir
        .clone()
        .or_else(|| config.cache_dir.clone())
        .unwrap_or_else(get_cache_path);

    if cli.clear_cache {
        if let Err(e) = clear_cache(&cache_dir) {
            eprintln!("Failed to clear cache: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        tracing::info!(dir = %cache_dir.display(), "cache cleared");
    }

    let org = cli.org.as_deref();
    let result = if cli.no_cache {
        tracing::debug!("cache disabled");
        collect(&client, &repos, org, options, mode).await
    } else {
        tracing::debug!(dir = %cache_dir.display(), "cache enabled");
        let cached = DiskCacheClient::new(client, cache_dir);
        collect(&cached, &repos, org, options, mode).await
    };

    let rows = match result {
        Ok(rows) => rows,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(fetch_exit_code(&e));
        }
    };

    match render(format, mode, &rows) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Failed to render output: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    }

    tracing::debug!(groups = rows.len(), elapsed = ?start_time.elapsed(), "done");
    std::process::exit(EXIT_SUCCESS);
}

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use papervista::api;
use papervista::client::ServiceClient;
use papervista::config::{
    default_config_path, find_config_file, load_config, write_default_config, Config, LogFormat,
};
use papervista::mcp::McpServer;
use papervista::models::{SearchQuery, DEFAULT_MAX_RESULTS};
use papervista::sources::ArxivSource;
use papervista::ui::{self, Spinner, Status};
use papervista::utils::{api_retry_config, HttpClient};
use papervista::{eprint_status, print_status, CitationService, SessionStore};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Papervista - search papers and cite them by short id
#[derive(Parser, Debug)]
#[command(name = "papervista")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Search academic papers and format citations by short session id", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (-v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Service URL (overrides client.server_url)
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Automatic based on terminal (table if TTY, JSON otherwise)
    Auto,
    /// Table format (human-readable)
    Table,
    /// JSON format (machine-readable)
    Json,
    /// Plain text format
    Plain,
}

impl OutputFormat {
    fn resolve(self) -> Self {
        match self {
            OutputFormat::Auto if std::io::stdout().is_terminal() => OutputFormat::Table,
            OutputFormat::Auto => OutputFormat::Json,
            other => other,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the search and citation service
    Serve {
        /// Address to bind (overrides server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (overrides server.port)
        #[arg(long, short)]
        port: Option<u16>,

        /// Serve MCP tools over stdio instead of HTTP
        #[arg(long)]
        stdio: bool,
    },

    /// Search for papers
    Search {
        /// Search query
        query: String,

        /// Maximum number of results
        #[arg(long, short, default_value_t = DEFAULT_MAX_RESULTS)]
        max_results: usize,
    },

    /// Format a citation for a paper id from an earlier search
    Cite {
        /// Short paper id, e.g. p1
        id: String,

        /// Citation style (apa, mla, ieee, bibtex)
        #[arg(long, short, default_value = "apa")]
        style: String,
    },

    /// Show stored metadata for a paper id
    Show {
        /// Short paper id, e.g. p1
        id: String,
    },

    /// Check whether the service is up
    Status {
        /// Keep polling for up to this many seconds
        #[arg(long, value_name = "SECS")]
        wait: Option<u64>,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Write a default configuration file
    Init {
        /// Destination (defaults to the user config directory)
        path: Option<PathBuf>,
    },

    /// Print the effective configuration
    Show,
}

fn init_logging(cli: &Cli, config: &Config) {
    let level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 if matches!(cli.command, Commands::Serve { .. }) => config.logging.level.as_str(),
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("papervista={}", level)),
    );

    // stdout is reserved for command output and MCP stdio
    let registry = tracing_subscriber::registry().with(filter);
    match config.logging.format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

fn load(cli: &Cli) -> Result<Config> {
    if matches!(
        cli.command,
        Commands::Config {
            action: ConfigAction::Init { .. }
        }
    ) {
        return Ok(Config::default());
    }

    let path = cli.config.clone().or_else(find_config_file);
    load_config(path.as_deref()).with_context(|| match &path {
        Some(path) => format!("Failed to load config from {}", path.display()),
        None => "Failed to load config".to_string(),
    })
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprint_status!(Status::Error, "{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = load(&cli)?;
    init_logging(&cli, &config);

    let output = cli.output.resolve();
    let server_url = cli
        .server
        .clone()
        .unwrap_or_else(|| config.client.server_url.clone());

    match cli.command {
        Commands::Serve { host, port, stdio } => serve(&config, host, port, stdio).await,
        Commands::Search { query, max_results } => {
            let client = ServiceClient::new(&server_url, config.client.timeout())?;
            search(&client, &query, max_results, output, cli.quiet).await
        }
        Commands::Cite { id, style } => {
            let client = ServiceClient::new(&server_url, config.client.timeout())?;
            let citation = client.cite(&id, Some(&style)).await?;
            match output {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&citation)?),
                OutputFormat::Plain => println!("{}", citation.citation),
                _ => ui::print_citation(&citation),
            }
            Ok(())
        }
        Commands::Show { id } => {
            let client = ServiceClient::new(&server_url, config.client.timeout())?;
            let record = client.paper(&id).await?;
            match output {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&record)?),
                OutputFormat::Plain => {
                    println!("{}", record.title);
                    println!("{}", record.authors.join("; "));
                    if let Some(date) = record.published {
                        println!("{}", date);
                    }
                    println!("{}", record.external_id);
                }
                _ => ui::print_paper(&id, &record),
            }
            Ok(())
        }
        Commands::Status { wait } => {
            let client = ServiceClient::new(&server_url, config.client.timeout())?;
            let health = match wait {
                Some(secs) => client.wait_ready(Duration::from_secs(secs)).await?,
                None => client.health().await?,
            };
            match output {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&health)?),
                _ => print_status!(
                    Status::Success,
                    "Service {} at {} (v{}, {} papers in session)",
                    health.status,
                    client.base_url(),
                    health.version,
                    health.entries
                ),
            }
            Ok(())
        }
        Commands::Config { action } => match action {
            ConfigAction::Init { path } => {
                let path = path
                    .or_else(default_config_path)
                    .context("Could not determine a config directory; pass a path")?;
                write_default_config(&path)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                if !cli.quiet {
                    print_status!(Status::Success, "Wrote default config to {}", path.display());
                }
                Ok(())
            }
            ConfigAction::Show => {
                print!("{}", config.to_toml()?);
                Ok(())
            }
        },
    }
}

async fn serve(
    config: &Config,
    host: Option<String>,
    port: Option<u16>,
    stdio: bool,
) -> Result<()> {
    let source = ArxivSource::with_client(HttpClient::with_timeout(config.arxiv.timeout())?)
        .base_url(config.arxiv.base_url.clone())
        .retry(api_retry_config().max_attempts(config.arxiv.max_attempts));
    let store = Arc::new(SessionStore::with_strategy(config.session.id_strategy));
    let service = CitationService::new(Arc::new(source), store);

    if stdio {
        let server =
            McpServer::new(service).map_err(|e| anyhow::anyhow!("MCP setup failed: {}", e))?;
        return server
            .run()
            .await
            .map_err(|e| anyhow::anyhow!("MCP server error: {}", e));
    }

    let mut server = config.server.clone();
    if let Some(host) = host {
        server.host = host;
    }
    if let Some(port) = port {
        server.port = port;
    }
    let addr = server.bind_addr();
    let listener = api::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    api::serve(listener, service).await.context("Server error")
}

async fn search(
    client: &ServiceClient,
    query: &str,
    max_results: usize,
    output: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let request = SearchQuery::new(query).max_results(max_results);

    let spinner = if output == OutputFormat::Table && !quiet {
        Spinner::new(&format!("Searching for \"{}\"", query))
    } else {
        Spinner::hidden()
    };
    let started = Instant::now();
    let response = match client.search(&request).await {
        Ok(response) => {
            spinner.clear();
            response
        }
        Err(e) => {
            spinner.finish_with_error("Search failed");
            return Err(e.into());
        }
    };

    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&response)?),
        OutputFormat::Plain => {
            for hit in &response.results {
                let year = hit.year.map(|y| y.to_string()).unwrap_or_default();
                println!(
                    "{}\t{}\t{}\t{}",
                    hit.id,
                    year,
                    hit.title,
                    hit.authors.join("; ")
                );
            }
        }
        _ => {
            ui::print_search_header(query, response.count, started.elapsed());
            if response.results.is_empty() {
                print_status!(Status::Info, "No papers found");
            } else {
                ui::print_hits_table(&response.results);
                if !quiet {
                    println!();
                    print_status!(
                        Status::Info,
                        "Cite with: papervista cite {} --style apa",
                        response.results[0].id
                    );
                }
            }
        }
    }
    Ok(())
}

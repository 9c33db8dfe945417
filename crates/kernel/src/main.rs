//! Charadex server and command line.

use std::net::SocketAddr;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use charadex_kernel::config::Config;
use charadex_kernel::dex::{PageHooks, PageParameters};
use charadex_kernel::routes;
use charadex_kernel::state::AppState;

#[derive(Parser)]
#[command(name = "charadex", version, about = "Spreadsheet-driven dex pages")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve dex pages over HTTP (default).
    Serve {
        /// Override the PORT environment variable.
        #[arg(long)]
        port: Option<u16>,
    },
    /// Render one page to stdout.
    Render {
        /// Page id, e.g. `masterlist`.
        page: String,
        /// Query string, e.g. `profile=FAE-001` or `species=Fae&page=2`.
        #[arg(long, default_value = "")]
        query: String,
        /// Print the JSON summary instead of HTML.
        #[arg(long)]
        json: bool,
    },
    /// List the registered pages.
    Pages,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    let cli = Cli::parse();
    let mut config = Config::from_env().context("failed to load configuration")?;

    match cli.command.unwrap_or(Command::Serve { port: None }) {
        Command::Serve { port } => {
            if let Some(port) = port {
                config.port = port;
            }
            serve(config).await
        }
        Command::Render { page, query, json } => render(config, &page, &query, json).await,
        Command::Pages => {
            let state = AppState::new(&config).await?;
            for page in state.dex().list_pages() {
                println!("{}\t{}", page.site_page, page.dex_selector);
            }
            Ok(())
        }
    }
}

async fn serve(config: Config) -> Result<()> {
    info!("Starting charadex");
    info!(port = config.port, site_dir = %config.site_dir.display(), "Configuration loaded");

    let state = AppState::new(&config)
        .await
        .context("failed to initialize application state")?;

    info!(pages = state.dex().list_pages().len(), "Pages registered");

    let app = routes::app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind to address")?;

    info!(%addr, "Server listening");

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

async fn render(config: Config, page: &str, query: &str, json: bool) -> Result<()> {
    let state = AppState::new(&config)
        .await
        .context("failed to initialize application state")?;

    let page = page.strip_suffix(".html").unwrap_or(page);
    if state.dex().get_page(page).is_none() {
        bail!("unknown page: {page}");
    }

    let params = PageParameters::parse(query.trim_start_matches('?'));
    let render = state
        .dex()
        .render_page(page, &params, &PageHooks::default())
        .await
        .with_context(|| format!("failed to render {page}"))?;

    if json {
        let summary = serde_json::to_string_pretty(&render.summary())?;
        println!("{summary}");
    } else {
        println!("{}", render.list().html);
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    // Logs go to stderr so `render` output stays clean
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

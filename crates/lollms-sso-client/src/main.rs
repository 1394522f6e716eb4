//! LoLLMs SSO command-line client - Entry Point
//!
//! Runs the SSO flow from a terminal: open the login page, paste the redirect
//! URL back, then inspect or verify the stored token.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

use lollms_sso_client::config::api;
use lollms_sso_client::{
    Config, FileStorage, IntrospectionResponse, MemoryNavigator, Navigator, SsoClient,
    SystemNavigator,
};

#[derive(Parser, Debug)]
#[command(name = "lollms-sso")]
#[command(about = "Single-sign-on client for LoLLMs instances")]
#[command(version)]
struct Cli {
    /// Base URL of the LoLLMs instance (e.g., https://lollms.example.com)
    #[arg(long, env = "LOLLMS_URL")]
    lollms_url: String,

    /// Client ID of the application, as configured in LoLLMs
    #[arg(long, env = "LOLLMS_CLIENT_ID")]
    client_id: String,

    /// Storage key for the token
    #[arg(long, env = "LOLLMS_SSO_TOKEN_KEY", default_value = api::DEFAULT_TOKEN_STORAGE_KEY)]
    token_key: String,

    /// Token store file (defaults to <data dir>/lollms-sso/tokens.json)
    #[arg(long, env = "LOLLMS_SSO_STORE")]
    store: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the LoLLMs login page for this application
    Login {
        /// Only print the URL
        #[arg(long)]
        no_browser: bool,
    },
    /// Capture the token from the URL LoLLMs redirected back to
    Redirect {
        /// Full redirect URL, including `?token=...`
        url: Url,
    },
    /// Store a token directly
    SetToken { token: String },
    /// Print the stored token
    Token,
    /// Report whether a token is stored
    Status,
    /// Verify the stored token with the backend and print its claims
    Introspect,
    /// Forget the stored token
    Logout,
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    let config = Config::new(cli.lollms_url, cli.client_id)?.with_token_storage_key(cli.token_key);
    let store_path = match cli.store {
        Some(path) => path,
        None => FileStorage::default_path()?,
    };
    tracing::debug!(store = %store_path.display(), "using token store");
    let storage = Arc::new(FileStorage::new(store_path));

    let navigator: Arc<dyn Navigator> = match &cli.command {
        Command::Login { no_browser: false } => Arc::new(SystemNavigator::new()),
        Command::Redirect { url } => Arc::new(MemoryNavigator::new(url.clone())),
        _ => Arc::new(MemoryNavigator::default()),
    };

    let client = SsoClient::new(config, navigator, storage)?;

    match cli.command {
        Command::Login { no_browser } => {
            println!("{}", client.login_url());
            if !no_browser {
                client.login();
            }
        }
        Command::Redirect { .. } => match client.handle_redirect()? {
            Some(_) => println!("Token stored."),
            None => anyhow::bail!("no `token` parameter in redirect URL"),
        },
        Command::SetToken { token } => {
            client.set_token(&token)?;
            println!("Token stored.");
        }
        Command::Token => {
            let token = client.get_token().context("no SSO token stored")?;
            println!("{token}");
        }
        Command::Status => {
            if client.is_authenticated() {
                println!("authenticated (token stored)");
            } else {
                println!("not authenticated");
            }
        }
        Command::Introspect => {
            let body = client.introspect().await?;
            let response = IntrospectionResponse::from_value(&body);
            if let Some(subject) = response.subject() {
                tracing::info!(subject, "token active");
            }
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Command::Logout => {
            client.logout()?;
            println!("Logged out.");
        }
    }

    Ok(())
}

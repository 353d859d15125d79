//! Example console front-end for the BADA operations API.
//!
//! Run with: cargo run -p console-example -- login <email> <password>
//!
//! Configure with `BADA_API_URL`, `BADA_TRANSPORT` and `BADA_STORAGE_PATH`.

use std::sync::Arc;

use anyhow::{Context, bail};
use bada_client::{ApiClient, ChannelNavigator, LoginOutcome};
use bada_core::{ApiConfig, ApiResult, Session};
use bada_session::{SessionStore, storage::FileStore};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "console-example")]
#[command(about = "Console front-end for the BADA operations API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and store the session
    Login { email: String, password: String },
    /// Re-validate the stored session and show the user
    Whoami,
    /// List announcements
    Announcements,
    /// Check in at the given coordinates
    Checkin {
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        #[arg(allow_negative_numbers = true)]
        lng: f64,
    },
    /// Check out
    Checkout,
    /// Log out and clear the stored session
    Logout,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = ApiConfig::from_env()?;
    let path = config
        .storage_path()
        .context("no data directory; set BADA_STORAGE_PATH")?;
    let storage = FileStore::open(&path).await?;
    let session = Arc::new(SessionStore::from_config(storage, &config));

    let (navigator, mut redirects) = ChannelNavigator::new();
    let client = ApiClient::from_config(&config, session)?.with_navigator(Arc::new(navigator));

    match cli.command {
        Command::Login { email, password } => match client.sign_in(&email, &password).await? {
            LoginOutcome::LoggedIn(session) => print_user(&session),
            LoginOutcome::Rejected(message) => bail!(message),
        },
        Command::Whoami => {
            if let Some(session) = client.restore_session().await {
                print_user(&session);
            }
        }
        Command::Announcements => {
            if let Some(result) = client.announcements().await? {
                print_result(&result);
            }
        }
        Command::Checkin { lat, lng } => {
            let Some(session) = client.require_session().await else {
                bail!("not logged in");
            };
            if let Some(result) = client.check_in(&session.user.id, lat, lng).await? {
                print_result(&result);
            }
        }
        Command::Checkout => {
            let Some(session) = client.require_session().await else {
                bail!("not logged in");
            };
            if let Some(result) = client.check_out(&session.user.id).await? {
                print_result(&result);
            }
        }
        Command::Logout => client.sign_out().await?,
    }

    while let Ok(page) = redirects.try_recv() {
        tracing::info!("-> {page}");
    }

    Ok(())
}

fn print_user(session: &Session) {
    let user = &session.user;
    println!("{} ({})", user.name, user.role.as_str().to_uppercase());
    if let Some(branch) = user.branch_label() {
        println!("{branch}");
    }
    if !user.role.can_access_sales() {
        println!("Sales module: access denied");
    }
}

fn print_result(result: &ApiResult) {
    match result {
        ApiResult::Ok { data } => println!("{data:#}"),
        ApiResult::Fail { message, .. } => println!("Error: {message}"),
    }
}

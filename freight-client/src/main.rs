//! `loadboard` - command-line access to the load-board API

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use shared::ListQuery;
use shared::models::{DashboardKind, LoadStatus, UserRole};

use freight_client::resource::{Loads, Users};
use freight_client::{
    ApiEnvelope, ClientConfig, DataAccess, FileCredentialStore, HttpClient, Session,
};

#[derive(Debug, Parser)]
#[command(name = "loadboard", about = "Load-board API client", version)]
struct Cli {
    /// Server origin; overrides LOADBOARD_SERVER_URL
    #[arg(long, global = true, value_name = "url")]
    server: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Log in and store the session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "LOADBOARD_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// End the session
    Logout,
    /// List loads
    Loads {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        limit: u32,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        status: Option<LoadStatus>,
    },
    /// Show one load
    Load { id: String },
    /// Board stats for a role
    Dashboard { kind: DashboardKind },
    /// List users of a role
    Users {
        #[arg(long)]
        role: UserRole,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "freight_client=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env();
    if let Some(server) = cli.server {
        config.server_origin = server;
    }

    let session = Session::new(FileCredentialStore::new(&config.credential_path))
        .with_on_auth_failure(|| {
            tracing::warn!("Session expired, run `loadboard login` again");
        });
    let http = HttpClient::new(&config, session).context("failed to build HTTP client")?;
    let access = DataAccess::new(http);

    let success = match cli.command {
        Command::Login { email, password } => print(access.auth().login(&email, &password).await)?,
        Command::Logout => print(access.auth().logout().await)?,
        Command::Loads {
            page,
            limit,
            search,
            status,
        } => {
            let mut query = ListQuery::new().page(page).limit(limit);
            if let Some(search) = search {
                query = query.search(search);
            }
            if let Some(status) = status {
                query = query.filter("status", status);
            }
            print(access.get::<Loads>(&query).await)?
        }
        Command::Load { id } => print(access.get_by_id::<Loads>(&id).await)?,
        Command::Dashboard { kind } => print(access.dashboard().stats(kind).await)?,
        Command::Users { role, page, limit } => {
            let query = ListQuery::new().page(page).limit(limit).filter("role", role);
            print(access.get::<Users>(&query).await)?
        }
    };

    if !success {
        bail!("request failed");
    }
    Ok(())
}

/// Pretty-print the envelope; returns its `success` flag
fn print<T: Serialize>(envelope: ApiEnvelope<T>) -> Result<bool> {
    let json = serde_json::to_string_pretty(&envelope).context("failed to encode response")?;
    println!("{json}");
    Ok(envelope.success)
}

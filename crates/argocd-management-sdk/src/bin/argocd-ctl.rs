// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Argo CD control CLI
//!
//! Thin command-line front end over [`ArgoCdClient`]. Connection settings
//! come from the `ARGOCD_*` environment variables (a `.env` file is loaded
//! when present) and can be overridden with flags. Results are printed as
//! pretty JSON.
//!
//! ```text
//! argocd-ctl --server argocd.example.com app list --project default
//! argocd-ctl app logs guestbook --tail 50 --container ui
//! argocd-ctl app sync guestbook --prune
//! ```

use std::process::ExitCode;
use std::time::Duration;

use argocd_management_sdk::{
    ArgoCdApi, ArgoCdClient, ConnectionConfig, DeleteApplicationOptions, ListApplicationsOptions,
    PodLogsOptions, RefreshKind, ResourceEventsOptions, Result, RollbackApplicationOptions,
    SyncApplicationOptions,
};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::debug;

/// Manage applications, clusters, projects and repositories on an Argo CD server
#[derive(Parser, Debug)]
#[command(name = "argocd-ctl")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct ConnectionArgs {
    /// API server address (host:port)
    #[arg(long, global = true)]
    server: Option<String>,

    /// Bearer token
    #[arg(long, global = true)]
    auth_token: Option<String>,

    /// Skip server certificate verification
    #[arg(long, global = true)]
    insecure: bool,

    /// Disable TLS
    #[arg(long, global = true)]
    plaintext: bool,

    /// Tunnel calls over HTTP/1.1 (gRPC-Web)
    #[arg(long, global = true)]
    grpc_web: bool,

    /// Path prefix for the gRPC-Web tunnel
    #[arg(long, global = true)]
    grpc_web_root_path: Option<String>,

    /// Per-call timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,
}

impl ConnectionArgs {
    fn apply(self, mut config: ConnectionConfig) -> ConnectionConfig {
        if let Some(server) = self.server {
            config.server_addr = server;
        }
        if let Some(token) = self.auth_token {
            config.auth_token = token;
        }
        if self.insecure {
            config = config.with_insecure(true);
        }
        if self.plaintext {
            config = config.with_plaintext(true);
        }
        if self.grpc_web || self.grpc_web_root_path.is_some() {
            config = config.with_grpc_web(self.grpc_web_root_path);
        }
        if let Some(secs) = self.timeout {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        config
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the identity the token resolves to
    Whoami,
    /// Application commands
    #[command(subcommand)]
    App(AppCommand),
    /// Cluster commands
    #[command(subcommand)]
    Cluster(NamedCommand),
    /// Project commands
    #[command(subcommand)]
    Project(NamedCommand),
    /// Repository commands
    #[command(subcommand)]
    Repo(NamedCommand),
}

#[derive(Subcommand, Debug)]
enum AppCommand {
    List {
        #[arg(long)]
        project: Vec<String>,
        #[arg(long)]
        selector: Option<String>,
    },
    Get {
        name: String,
    },
    Sync {
        name: String,
        #[arg(long)]
        revision: Option<String>,
        #[arg(long)]
        prune: bool,
        #[arg(long)]
        dry_run: bool,
    },
    Rollback {
        name: String,
        id: i64,
        #[arg(long)]
        prune: bool,
    },
    Delete {
        name: String,
        /// Keep the application's resources
        #[arg(long)]
        no_cascade: bool,
    },
    Manifests {
        name: String,
        #[arg(long)]
        revision: Option<String>,
    },
    Events {
        name: String,
    },
    Logs {
        name: String,
        #[arg(long)]
        pod: Option<String>,
        #[arg(long)]
        container: Option<String>,
        #[arg(long, default_value_t = 100)]
        tail: i64,
        #[arg(long)]
        filter: Option<String>,
    },
    Tree {
        name: String,
    },
    Refresh {
        name: String,
        #[arg(long)]
        hard: bool,
    },
    Terminate {
        name: String,
    },
}

/// Commands shared by clusters (keyed by server URL), projects and
/// repositories (keyed by URL).
#[derive(Subcommand, Debug)]
enum NamedCommand {
    List,
    Get { key: String },
    Delete { key: String },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "argocd_management_sdk=info".into()),
        )
        .init();

    if let Err(e) = dotenvy::dotenv() {
        debug!("No .env file loaded: {}", e);
    }

    let cli = Cli::parse();

    let config = match ConnectionConfig::from_env() {
        Ok(c) => cli.connection.apply(c),
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let command = cli.command;
    match ArgoCdClient::scoped(config, async move |client| execute_command(client, command).await)
        .await
    {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn execute_command(client: &ArgoCdClient, command: Commands) -> Result<()> {
    match command {
        Commands::Whoami => {
            let info = client.get_user_info().await?;
            print_json(&info)
        }
        Commands::App(cmd) => execute_app(client, cmd).await,
        Commands::Cluster(cmd) => match cmd {
            NamedCommand::List => print_json(&client.list_clusters().await?),
            NamedCommand::Get { key } => print_json(&client.get_cluster(&key).await?),
            NamedCommand::Delete { key } => {
                client.delete_cluster(&key).await?;
                println!("deleted cluster {key}");
                Ok(())
            }
        },
        Commands::Project(cmd) => match cmd {
            NamedCommand::List => print_json(&client.list_projects().await?),
            NamedCommand::Get { key } => print_json(&client.get_project(&key).await?),
            NamedCommand::Delete { key } => {
                client.delete_project(&key).await?;
                println!("deleted project {key}");
                Ok(())
            }
        },
        Commands::Repo(cmd) => match cmd {
            NamedCommand::List => print_json(&client.list_repositories().await?),
            NamedCommand::Get { key } => print_json(&client.get_repository(&key).await?),
            NamedCommand::Delete { key } => {
                client.delete_repository(&key).await?;
                println!("deleted repository {key}");
                Ok(())
            }
        },
    }
}

async fn execute_app(client: &ArgoCdClient, command: AppCommand) -> Result<()> {
    match command {
        AppCommand::List { project, selector } => {
            let mut options = ListApplicationsOptions::new();
            for p in project {
                options = options.with_project(p);
            }
            if let Some(selector) = selector {
                options = options.with_selector(selector);
            }
            let apps = client.list_applications(options).await?;
            print_json(&apps)
        }

        AppCommand::Get { name } => {
            let app = client.get_application(&name, None).await?;
            print_json(&app)
        }

        AppCommand::Sync {
            name,
            revision,
            prune,
            dry_run,
        } => {
            let mut options = SyncApplicationOptions::new(name)
                .with_prune(prune)
                .with_dry_run(dry_run);
            if let Some(revision) = revision {
                options = options.with_revision(revision);
            }
            let app = client.sync_application(options).await?;
            print_json(&app)
        }

        AppCommand::Rollback { name, id, prune } => {
            let options = RollbackApplicationOptions::new(name, id).with_prune(prune);
            let app = client.rollback_application(options).await?;
            print_json(&app)
        }

        AppCommand::Delete { name, no_cascade } => {
            let options = DeleteApplicationOptions::new(&name).with_cascade(!no_cascade);
            client.delete_application(options).await?;
            println!("deleted application {name}");
            Ok(())
        }

        AppCommand::Manifests { name, revision } => {
            let manifests = client.get_application_manifests(&name, revision, None).await?;
            for manifest in manifests.manifests {
                println!("---\n{manifest}");
            }
            Ok(())
        }

        AppCommand::Events { name } => {
            let events = client.get_application_events(ResourceEventsOptions::new(name)).await?;
            print_json(&events)
        }

        AppCommand::Logs {
            name,
            pod,
            container,
            tail,
            filter,
        } => {
            let mut options = PodLogsOptions::new(name).with_tail_lines(tail);
            if let Some(pod) = pod {
                options = options.with_pod(pod);
            }
            if let Some(container) = container {
                options = options.with_container(container);
            }
            if let Some(filter) = filter {
                options = options.with_filter(filter);
            }
            let logs = client.get_application_logs(options).await?;
            for entry in logs.logs {
                match entry.timestamp {
                    Some(ts) => println!("{ts} {}", entry.content),
                    None => println!("{}", entry.content),
                }
            }
            Ok(())
        }

        AppCommand::Tree { name } => {
            let tree = client.get_resource_tree(&name, None).await?;
            print_json(&tree)
        }

        AppCommand::Refresh { name, hard } => {
            let kind = if hard {
                RefreshKind::Hard
            } else {
                RefreshKind::Normal
            };
            let app = client.refresh_application(&name, kind, None).await?;
            print_json(&app)
        }

        AppCommand::Terminate { name } => {
            client.terminate_operation(&name, None).await?;
            println!("terminated operation on {name}");
            Ok(())
        }
    }
}

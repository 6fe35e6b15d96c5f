use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::bail;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use spades::auth::AdminGate;
use spades::config::{ADMIN_PASSWORD_ENV, FileConfig, ServerConfig};
use spades::membership::{invites, requests};
use spades::server::{AppState, create_router};
use spades::store::{SqliteStore, Store};

#[derive(Parser)]
#[command(name = "spades")]
#[command(about = "Membership server for the Spades car club", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Administrative commands
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },

    /// Start the server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(long, short, default_value = "8080")]
        port: u16,

        /// Data directory for the database and config file
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Public base URL for external access (e.g., "https://spades.example.com").
        /// Used for invite links. Defaults to the bind address.
        #[arg(long)]
        public_base_url: Option<String>,

        /// Admin console password; overrides the config file
        #[arg(long, env = ADMIN_PASSWORD_ENV, hide_env_values = true)]
        admin_password: Option<String>,

        /// Mark cookies Secure (serve behind HTTPS)
        #[arg(long)]
        secure_cookies: bool,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Initialize the server (create database and config file)
    Init {
        /// Data directory for the database and config file
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Skip interactive prompts
        #[arg(long)]
        non_interactive: bool,

        /// Admin console password to store in the config file
        #[arg(long, env = ADMIN_PASSWORD_ENV, hide_env_values = true)]
        admin_password: Option<String>,

        /// Public base URL to store in the config file
        #[arg(long)]
        public_base_url: Option<String>,
    },

    /// Generate invite codes and print their links
    Invite {
        /// Data directory for the database and config file
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Number of codes to generate
        #[arg(long, short, default_value = "1")]
        count: u32,
    },

    /// Print the join-request queue as JSON
    Requests {
        /// Data directory for the database and config file
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Only show requests with this status (pending, approved, rejected)
        #[arg(long)]
        status: Option<String>,
    },
}

fn load_config(data_dir: String) -> anyhow::Result<ServerConfig> {
    let mut config = ServerConfig {
        data_dir: data_dir.into(),
        ..Default::default()
    };
    config.merge_file()?;
    Ok(config)
}

fn open_store(config: &ServerConfig) -> anyhow::Result<SqliteStore> {
    if !config.db_path().exists() {
        bail!("Server not initialized. Run 'spades admin init' first to create the database.");
    }
    let store = SqliteStore::new(config.db_path())?;
    store.initialize()?;
    Ok(store)
}

fn prompt_admin_password() -> anyhow::Result<String> {
    let password = inquire::Password::new("Admin password:")
        .with_validator(|input: &str| {
            if input.trim().is_empty() {
                Ok(inquire::validator::Validation::Invalid(
                    "Password cannot be empty".into(),
                ))
            } else {
                Ok(inquire::validator::Validation::Valid)
            }
        })
        .prompt()?;
    Ok(password)
}

fn run_init(
    data_dir: String,
    non_interactive: bool,
    admin_password: Option<String>,
    public_base_url: Option<String>,
) -> anyhow::Result<()> {
    let data_path: PathBuf = data_dir.into();
    fs::create_dir_all(&data_path)?;

    let config = ServerConfig {
        data_dir: data_path,
        ..Default::default()
    };

    let config_path = config.config_path();
    if config_path.exists() {
        bail!(
            "Server already initialized. Config exists at: {}",
            config_path.display()
        );
    }

    let admin_password = match admin_password.filter(|p| !p.is_empty()) {
        Some(password) => password,
        None if non_interactive => {
            bail!("An admin password is required. Pass --admin-password or set {ADMIN_PASSWORD_ENV}.")
        }
        None => prompt_admin_password()?,
    };

    let store = SqliteStore::new(config.db_path())?;
    store.initialize()?;

    FileConfig {
        admin_password: Some(admin_password),
        public_base_url,
        secure_cookies: None,
    }
    .save(&config_path)?;

    println!("Database created at: {}", config.db_path().display());
    println!("Config written to: {}", config_path.display());

    Ok(())
}

fn run_invite(data_dir: String, count: u32) -> anyhow::Result<()> {
    let config = load_config(data_dir)?;
    let store = open_store(&config)?;
    let base_url = config.base_url();

    for _ in 0..count {
        let invite = invites::generate(&store)?;
        println!("{}  {}", invite.code, invites::invite_link(&base_url, &invite.code));
    }

    Ok(())
}

fn run_requests(data_dir: String, status: Option<String>) -> anyhow::Result<()> {
    let config = load_config(data_dir)?;
    let store = open_store(&config)?;

    let requests = requests::list(&store, status.as_deref())?;
    println!("{}", serde_json::to_string_pretty(&requests)?);

    Ok(())
}

async fn run_serve(mut config: ServerConfig) -> anyhow::Result<()> {
    config.merge_file()?;

    let admin = AdminGate::new(config.require_admin_password()?)?;

    fs::create_dir_all(&config.data_dir)?;
    let store = SqliteStore::new(config.db_path())?;
    store.initialize()?;

    let state = Arc::new(AppState::new(
        Arc::new(store),
        admin,
        config.base_url(),
        config.secure_cookies,
    ));

    let app = create_router(state);
    let addr = config.socket_addr()?;

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("spades=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Admin { command } => match command {
            AdminCommands::Init {
                data_dir,
                non_interactive,
                admin_password,
                public_base_url,
            } => {
                run_init(data_dir, non_interactive, admin_password, public_base_url)?;
            }
            AdminCommands::Invite { data_dir, count } => {
                run_invite(data_dir, count)?;
            }
            AdminCommands::Requests { data_dir, status } => {
                run_requests(data_dir, status)?;
            }
        },
        Commands::Serve {
            host,
            port,
            data_dir,
            public_base_url,
            admin_password,
            secure_cookies,
        } => {
            let config = ServerConfig {
                host,
                port,
                data_dir: data_dir.into(),
                public_base_url,
                admin_password,
                secure_cookies,
            };
            run_serve(config).await?;
        }
    }

    Ok(())
}

//! NexusShop Accounts CLI - account, profile and address management.
//!
//! # Usage
//!
//! ```bash
//! # Create an account
//! nx-accounts register -e maria@example.com --full-name "María García"
//!
//! # Show the profile of the signed-in account
//! NX_ACCOUNTS_PASSWORD=... nx-accounts profile get -e maria@example.com
//!
//! # Add an address and list them
//! nx-accounts address add -e maria@example.com --label Casa --city Bogotá --default
//! nx-accounts address list -e maria@example.com
//!
//! # Offline checks
//! nx-accounts validate password Password123
//! nx-accounts error-message invalid_credentials
//! ```
//!
//! # Commands
//!
//! - `register`, `login`, `logout`, `session`, `password` - Authentication
//! - `profile get|update`, `preferences get|update` - Per-account records
//! - `address add|list|delete` - Addresses
//! - `validate email|password`, `error-message` - Local helpers
//!
//! Commands that need a session sign in first with `--email` and `--password`
//! (or `NX_ACCOUNTS_PASSWORD`). Results are printed as JSON on stdout; logs go
//! to stderr.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "nx-accounts")]
#[command(author, version, about = "NexusShop account tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Email and password used to sign in before a command runs.
#[derive(Args)]
struct Credentials {
    /// Account email address
    #[arg(short, long)]
    email: String,

    /// Account password
    #[arg(short, long, env = "NX_ACCOUNTS_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and seed its profile and preferences
    Register {
        #[command(flatten)]
        credentials: Credentials,

        /// Full name stored on the account and profile
        #[arg(long)]
        full_name: Option<String>,

        /// Phone number stored on the account and profile
        #[arg(long)]
        phone: Option<String>,
    },
    /// Sign in and print the session
    Login {
        #[command(flatten)]
        credentials: Credentials,
    },
    /// Sign in, then sign out again (revokes the refresh token)
    Logout {
        #[command(flatten)]
        credentials: Credentials,
    },
    /// Sign in and print the current session
    Session {
        #[command(flatten)]
        credentials: Credentials,
    },
    /// Change the account password
    Password {
        #[command(flatten)]
        credentials: Credentials,

        /// New password
        #[arg(long, env = "NX_ACCOUNTS_NEW_PASSWORD", hide_env_values = true)]
        new_password: String,
    },
    /// Read or update the profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Read or update the preferences
    Preferences {
        #[command(subcommand)]
        action: PreferencesAction,
    },
    /// Manage addresses
    Address {
        #[command(subcommand)]
        action: AddressAction,
    },
    /// Check input without contacting the service
    Validate {
        #[command(subcommand)]
        target: ValidateTarget,
    },
    /// Print the user-facing message for an error code
    ErrorMessage {
        /// Error code, e.g. `invalid_credentials`
        code: String,
    },
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Show the profile
    Get {
        #[command(flatten)]
        credentials: Credentials,
    },
    /// Change profile fields (only the given ones)
    Update {
        #[command(flatten)]
        credentials: Credentials,

        #[command(flatten)]
        fields: commands::profile::ProfileArgs,
    },
}

#[derive(Subcommand)]
enum PreferencesAction {
    /// Show the preferences
    Get {
        #[command(flatten)]
        credentials: Credentials,
    },
    /// Change preference fields (only the given ones)
    Update {
        #[command(flatten)]
        credentials: Credentials,

        #[command(flatten)]
        fields: commands::profile::PreferencesArgs,
    },
}

#[derive(Subcommand)]
enum AddressAction {
    /// Add an address
    Add {
        #[command(flatten)]
        credentials: Credentials,

        #[command(flatten)]
        fields: commands::address::AddressArgs,
    },
    /// List addresses, default first
    List {
        #[command(flatten)]
        credentials: Credentials,
    },
    /// Delete an address by id
    Delete {
        #[command(flatten)]
        credentials: Credentials,

        /// Address id
        #[arg(long)]
        id: i64,
    },
}

#[derive(Subcommand)]
enum ValidateTarget {
    /// Check the shape of an email address
    Email { value: String },
    /// Check password strength
    Password { value: String },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("nexus_accounts=info,nx_accounts=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Validate { target } => match target {
            ValidateTarget::Email { value } => commands::validate::email(&value)?,
            ValidateTarget::Password { value } => commands::validate::password(&value)?,
        },
        Commands::ErrorMessage { code } => commands::validate::error_message(&code)?,
        Commands::Register {
            credentials,
            full_name,
            phone,
        } => {
            let client = commands::connect()?;
            commands::auth::register(&client, &credentials.into(), full_name, phone).await?;
        }
        Commands::Login { credentials } => {
            let client = commands::connect()?;
            commands::auth::login(&client, &credentials.into()).await?;
        }
        Commands::Logout { credentials } => {
            let client = commands::connect()?;
            commands::auth::logout(&client, &credentials.into()).await?;
        }
        Commands::Session { credentials } => {
            let client = commands::connect()?;
            commands::auth::session(&client, &credentials.into()).await?;
        }
        Commands::Password {
            credentials,
            new_password,
        } => {
            let client = commands::connect()?;
            commands::auth::change_password(&client, &credentials.into(), new_password.into())
                .await?;
        }
        Commands::Profile { action } => {
            let client = commands::connect()?;
            match action {
                ProfileAction::Get { credentials } => {
                    commands::profile::show_profile(&client, &credentials.into()).await?;
                }
                ProfileAction::Update {
                    credentials,
                    fields,
                } => {
                    commands::profile::update_profile(&client, &credentials.into(), fields)
                        .await?;
                }
            }
        }
        Commands::Preferences { action } => {
            let client = commands::connect()?;
            match action {
                PreferencesAction::Get { credentials } => {
                    commands::profile::show_preferences(&client, &credentials.into()).await?;
                }
                PreferencesAction::Update {
                    credentials,
                    fields,
                } => {
                    commands::profile::update_preferences(&client, &credentials.into(), fields)
                        .await?;
                }
            }
        }
        Commands::Address { action } => {
            let client = commands::connect()?;
            match action {
                AddressAction::Add {
                    credentials,
                    fields,
                } => commands::address::add(&client, &credentials.into(), fields).await?,
                AddressAction::List { credentials } => {
                    commands::address::list(&client, &credentials.into()).await?;
                }
                AddressAction::Delete { credentials, id } => {
                    commands::address::delete(&client, &credentials.into(), id).await?;
                }
            }
        }
    }
    Ok(())
}

impl From<Credentials> for commands::SignIn {
    fn from(credentials: Credentials) -> Self {
        Self {
            email: credentials.email,
            password: credentials.password.into(),
        }
    }
}

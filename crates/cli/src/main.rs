//! KeyZone CLI - session migrations and marketplace administration.
//!
//! # Usage
//!
//! ```bash
//! # Create the session table in the storefront database
//! kz-cli migrate
//!
//! # Obtain a bearer token (password read from KZ_PASSWORD)
//! KZ_PASSWORD=secret kz-cli login -e admin@keyzone.lk
//!
//! # Admin operations (token read from KEYZONE_API_TOKEN)
//! kz-cli products list --category Games
//! kz-cli products delete 65f0c0ffee1234567890abcd
//! kz-cli orders list --page 2
//! kz-cli orders stats
//! kz-cli users list
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "kz-cli")]
#[command(author, version, about = "KeyZone CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the session table in the storefront database
    Migrate,
    /// Log in to the marketplace and print a bearer token
    Login {
        /// Account email address
        #[arg(short, long)]
        email: String,
    },
    /// Manage products
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Inspect orders
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Inspect users
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// List products, newest first
    List {
        /// Only this category (`Games` or `Softwares`)
        #[arg(short, long)]
        category: Option<String>,

        /// Free-text search
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Delete a product by id
    Delete {
        /// Product id
        id: String,
    },
}

#[derive(Subcommand)]
enum OrderAction {
    /// List every customer's orders
    List {
        /// Page number
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Print the marketplace's order statistics
    Stats,
}

#[derive(Subcommand)]
enum UserAction {
    /// List user accounts
    List {
        /// Page number
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Login { email } => commands::session::login(&email).await?,
        Commands::Products { action } => match action {
            ProductAction::List { category, search } => {
                commands::products::list(category.as_deref(), search).await?;
            }
            ProductAction::Delete { id } => commands::products::delete(&id).await?,
        },
        Commands::Orders { action } => match action {
            OrderAction::List { page } => commands::orders::list(page).await?,
            OrderAction::Stats => commands::orders::stats().await?,
        },
        Commands::Users { action } => match action {
            UserAction::List { page } => commands::users::list(page).await?,
        },
    }
    Ok(())
}

//! Vitrine CLI - Command-line storefront.
//!
//! # Usage
//!
//! ```bash
//! # Log in (the session persists in the configured session file)
//! vitrine login alice --password secret
//!
//! # Browse the catalog
//! vitrine categories
//! vitrine products --category 2
//! vitrine product 7
//!
//! # Manage the cart
//! vitrine cart show
//! vitrine cart add 7 --quantity 2
//! vitrine cart remove 3
//!
//! # Place an order and review history
//! vitrine checkout --address "Rua A, 123" --payment pix
//! vitrine orders
//! ```
//!
//! # Environment Variables
//!
//! - `VITRINE_API_URL` - Base URL of the storefront backend
//! - `VITRINE_SESSION_FILE` - Session file path (optional)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

use vitrine_client::{ClientConfig, Storefront};

mod commands;

#[derive(Parser)]
#[command(name = "vitrine")]
#[command(author, version, about = "Vitrine command-line storefront")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in to the store
    Login {
        /// Username
        username: String,

        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// Log out and clear the stored session
    Logout,
    /// Register a new account (does not log in)
    Register {
        /// Username
        #[arg(short, long)]
        username: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(short, long)]
        password: String,

        /// Full display name
        #[arg(short, long, default_value = "")]
        full_name: String,
    },
    /// List product categories
    Categories,
    /// List products, optionally filtered by category
    Products {
        /// Category id to filter by
        #[arg(long)]
        category: Option<i32>,
    },
    /// Show one product
    Product {
        /// Product id
        id: i32,
    },
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place an order for the current cart
    Checkout {
        /// Shipping address
        #[arg(long)]
        address: String,

        /// Payment method (`credit_card`, `debit_card`, `pix`, `boleto`)
        #[arg(long, default_value = "credit_card")]
        payment: String,
    },
    /// List past orders
    Orders,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart lines and totals
    Show,
    /// Add a product to the cart
    Add {
        /// Product id
        product_id: i32,

        /// Quantity to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a line from the cart by its line id
    Remove {
        /// Cart line id
        item_id: i32,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env()?;
    let storefront = Storefront::new(config).await?;

    match cli.command {
        Commands::Login { username, password } => {
            commands::session::login(&storefront, &username, &password).await?;
        }
        Commands::Logout => commands::session::logout(&storefront),
        Commands::Register {
            username,
            email,
            password,
            full_name,
        } => {
            commands::session::register(&storefront, &username, &email, &password, &full_name)
                .await?;
        }
        Commands::Categories => commands::catalog::categories(&storefront).await?,
        Commands::Products { category } => {
            commands::catalog::products(&storefront, category).await?;
        }
        Commands::Product { id } => commands::catalog::product(&storefront, id).await?,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&storefront),
            CartAction::Add {
                product_id,
                quantity,
            } => commands::cart::add(&storefront, product_id, quantity).await?,
            CartAction::Remove { item_id } => {
                commands::cart::remove(&storefront, item_id).await?;
            }
        },
        Commands::Checkout { address, payment } => {
            commands::orders::checkout(&storefront, &address, &payment).await?;
        }
        Commands::Orders => commands::orders::list(&storefront).await?,
    }
    Ok(())
}

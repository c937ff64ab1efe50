//! Vintage CLI - drive the storefront state layer from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Load products into the local document store
//! vintage seed products.yaml
//!
//! # Browse
//! vintage products --popular
//! vintage product corduroy-jacket
//!
//! # Cart and checkout (cart survives between runs)
//! vintage cart add corduroy-jacket
//! vintage --user u1 checkout --detail address="Jl. Braga 12"
//!
//! # Signed-in actions
//! vintage --user u1 wishlist toggle corduroy-jacket
//! vintage --user u1 --name Ana review corduroy-jacket 5 "Fits perfectly"
//! ```
//!
//! Configuration is read from the environment (see
//! [`vintage_storefront::config`]).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use serde_json::Value;
use tracing_subscriber::{Layer, layer::SubscriberExt, util::SubscriberInitExt};

use vintage_core::UserId;
use vintage_storefront::config::{LogFormat, StorefrontConfig};
use vintage_storefront::identity::{Identity, MemoryIdentityProvider};
use vintage_storefront::remote::{Fields, JsonFileStore};
use vintage_storefront::slot::FileSlot;
use vintage_storefront::{Collaborators, Storefront};

mod commands;

use commands::catalog::View;

#[derive(Parser)]
#[command(name = "vintage")]
#[command(author, version, about = "Vintage storefront CLI")]
struct Cli {
    /// Act as this signed-in user id (anonymous otherwise)
    #[arg(long, global = true)]
    user: Option<String>,

    /// Display name of the signed-in user
    #[arg(long, global = true, requires = "user")]
    name: Option<String>,

    /// Email of the signed-in user
    #[arg(long, global = true, requires = "user")]
    email: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load products from a YAML file into the document store
    Seed {
        /// Path to the YAML file
        file: String,
    },
    /// List products, newest first
    Products {
        /// Show the most wishlisted products
        #[arg(long, conflicts_with = "newest")]
        popular: bool,

        /// Show only the four newest products
        #[arg(long)]
        newest: bool,
    },
    /// Show one product
    Product {
        /// Product id
        id: String,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Review a product
    Review {
        /// Product id
        id: String,

        /// Stars, 1 to 5
        rating: i64,

        /// Review text
        comment: Option<String>,
    },
    /// List a product's reviews
    Reviews {
        /// Product id
        id: String,
    },
    /// Check whether the current user has bought a product
    Purchased {
        /// Product id
        id: String,
    },
    /// Submit the cart as an order
    Checkout {
        /// Extra order field, as `key=value` (repeatable)
        #[arg(long = "detail", value_parser = parse_detail)]
        details: Vec<(String, String)>,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart
    Show,
    /// Add one unit of a product
    Add { id: String },
    /// Take one unit off a line
    Dec { id: String },
    /// Remove a line
    Remove { id: String },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Add or remove a product
    Toggle { id: String },
    /// Show the wishlist size
    Count,
}

/// Parse a `key=value` checkout detail.
fn parse_detail(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .filter(|(key, _)| !key.trim().is_empty())
        .map(|(key, value)| (key.trim().to_string(), value.to_string()))
        .ok_or_else(|| format!("expected key=value, got `{raw}`"))
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Initialize tracing with EnvFilter and Sentry integration.
fn init_tracing(format: LogFormat) {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "vintage_storefront=info,vintage_cli=info".into());

    let fmt_layer = match format {
        LogFormat::Pretty => tracing_subscriber::fmt::layer().boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer().json().boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
#[allow(clippy::print_stderr)] // Tracing isn't initialized before the config loads
async fn main() {
    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(2);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);
    init_tracing(config.log_format);

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, &config).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &StorefrontConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(JsonFileStore::open(&config.store_path).await?);

    if let Commands::Seed { file } = &cli.command {
        return Ok(commands::seed::products(store.as_ref(), file).await?);
    }

    let identity = match cli.user {
        Some(uid) => MemoryIdentityProvider::signed_in(Identity {
            uid: UserId::new(uid),
            email: cli.email.unwrap_or_default(),
            display_name: cli.name,
        }),
        None => MemoryIdentityProvider::new(),
    };

    let mut storefront = Storefront::new(Collaborators {
        store,
        identity: Arc::new(identity),
        cart_slot: Box::new(FileSlot::new(&config.cart_path)),
    })?;
    storefront.session_mut().fetch_user();

    match cli.command {
        Commands::Seed { .. } => {}
        Commands::Products { popular, newest } => {
            let view = if popular {
                View::Popular
            } else if newest {
                View::Newest
            } else {
                View::All
            };
            commands::catalog::list(&mut storefront, view).await;
        }
        Commands::Product { id } => commands::catalog::show(&mut storefront, &id).await?,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&storefront),
            CartAction::Add { id } => commands::cart::add(&mut storefront, &id).await?,
            CartAction::Dec { id } => commands::cart::decrement(&mut storefront, &id)?,
            CartAction::Remove { id } => commands::cart::remove(&mut storefront, &id)?,
            CartAction::Clear => commands::cart::clear(&mut storefront)?,
        },
        Commands::Wishlist { action } => match action {
            WishlistAction::Toggle { id } => {
                commands::wishlist::toggle(&mut storefront, &id).await?;
            }
            WishlistAction::Count => commands::wishlist::count(&mut storefront).await,
        },
        Commands::Review {
            id,
            rating,
            comment,
        } => commands::catalog::review(&mut storefront, &id, rating, comment).await?,
        Commands::Reviews { id } => commands::catalog::reviews(&mut storefront, &id).await,
        Commands::Purchased { id } => commands::catalog::purchased(&storefront, &id).await,
        Commands::Checkout { details } => {
            let details: Fields = details
                .into_iter()
                .map(|(key, value)| (key, Value::String(value)))
                .collect();
            commands::cart::checkout(&mut storefront, details).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_detail() {
        assert_eq!(
            parse_detail("address=Jl. Braga 12").unwrap(),
            ("address".to_string(), "Jl. Braga 12".to_string())
        );
        assert_eq!(
            parse_detail("note=a=b").unwrap(),
            ("note".to_string(), "a=b".to_string())
        );
        assert!(parse_detail("missing").is_err());
        assert!(parse_detail("=value").is_err());
    }

    #[test]
    fn test_global_user_flag() {
        let cli = Cli::try_parse_from(["vintage", "wishlist", "count", "--user", "u1"]).unwrap();
        assert_eq!(cli.user.as_deref(), Some("u1"));
        assert!(matches!(
            cli.command,
            Commands::Wishlist {
                action: WishlistAction::Count
            }
        ));
    }
}

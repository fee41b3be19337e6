//! # bluesnap
//!
//! Read-only lookups and token creation against a BlueSnap account.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables (or put them in .env)
//! export BLUESNAP_ENV=sandbox
//! export BLUESNAP_USERNAME=API_...
//! export BLUESNAP_PASSWORD=...
//! export BLUESNAP_STORE_ID=...
//! export BLUESNAP_SELLER_ID=...
//! export BLUESNAP_CURRENCY=GBP
//!
//! bluesnap shopper get 19549012
//! bluesnap payment-fields-token create --shopper-id 19549012
//! ```

use anyhow::{Context, Result};
use bluesnap_client::BlueSnapClient;
use bluesnap_core::ClientConfig;
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::{debug, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "bluesnap")]
#[command(author, version, about = "BlueSnap gateway CLI", long_about = None)]
struct Cli {
    /// Override the gateway base URL (e.g. a local mock)
    #[arg(long, env = "BLUESNAP_API_URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Shopper lookups (XML API)
    Shopper {
        #[command(subcommand)]
        action: ShopperCommands,
    },
    /// Vaulted shopper lookups (JSON API)
    VaultedShopper {
        #[command(subcommand)]
        action: VaultedShopperCommands,
    },
    /// Transaction lookups
    Transaction {
        #[command(subcommand)]
        action: TransactionCommands,
    },
    /// Hosted payment fields tokens
    PaymentFieldsToken {
        #[command(subcommand)]
        action: TokenCommands,
    },
}

#[derive(Subcommand)]
enum ShopperCommands {
    /// Get a shopper by BlueSnap id
    Get { id: String },
    /// Get a shopper by seller shopper id
    GetBySellerId { id: String },
}

#[derive(Subcommand)]
enum VaultedShopperCommands {
    /// Get a vaulted shopper by id
    Get { id: String },
}

#[derive(Subcommand)]
enum TransactionCommands {
    /// Get a transaction by id
    Get { id: String },
}

#[derive(Subcommand)]
enum TokenCommands {
    /// Create a new token
    Create {
        /// Tie the token to an existing vaulted shopper
        #[arg(long)]
        shopper_id: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env().context("Failed to load BlueSnap configuration")?;
    if let Some(url) = cli.api_url {
        config = config.with_api_base_url(url);
    }
    debug!(
        "Using BlueSnap endpoint {} (sandbox={})",
        config.endpoint_url(),
        config.is_sandbox()
    );

    let client = BlueSnapClient::new(config)?;

    let output = match cli.command {
        Commands::Shopper { action } => match action {
            ShopperCommands::Get { id } => client.shoppers().find_by_shopper_id(&id).await?,
            ShopperCommands::GetBySellerId { id } => {
                client.shoppers().find_by_seller_shopper_id(&id).await?
            }
        },
        Commands::VaultedShopper { action } => match action {
            VaultedShopperCommands::Get { id } => client.vaulted_shoppers().retrieve(&id).await?,
        },
        Commands::Transaction { action } => match action {
            TransactionCommands::Get { id } => client.transactions().retrieve(&id).await?,
        },
        Commands::PaymentFieldsToken { action } => match action {
            TokenCommands::Create { shopper_id } => {
                let token = client
                    .payment_fields_tokens()
                    .create(shopper_id.as_deref())
                    .await?;
                Value::String(token)
            }
        },
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_token_create() {
        let cli = Cli::try_parse_from([
            "bluesnap",
            "payment-fields-token",
            "create",
            "--shopper-id",
            "42",
        ])
        .unwrap();

        match cli.command {
            Commands::PaymentFieldsToken {
                action: TokenCommands::Create { shopper_id },
            } => assert_eq!(shopper_id.as_deref(), Some("42")),
            _ => panic!("expected token create"),
        }
    }

    #[test]
    fn test_parse_seller_lookup() {
        let cli = Cli::try_parse_from(["bluesnap", "shopper", "get-by-seller-id", "merchant-7"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Shopper {
                action: ShopperCommands::GetBySellerId { .. }
            }
        ));
    }
}

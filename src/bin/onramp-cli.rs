use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::path::PathBuf;

use onramp_gateway::config::load_config;
use onramp_gateway::onramp::OnrampClient;

#[derive(Parser)]
#[command(name = "onramp-cli")]
#[command(about = "Talk to the Onramp provider with the gateway's credentials", long_about = None)]
struct Cli {
    /// Optional TOML configuration file. Environment variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the signed envelope for a JSON body without sending it
    Sign {
        /// Endpoint path, e.g. whiteLabel/kyc/status
        #[arg(short, long, default_value = "whiteLabel/kyc/status")]
        path: String,
        /// JSON request body
        body: String,
    },
    /// List supported payment methods per fiat type
    PaymentMethods,
    /// Show a customer's KYC status
    KycStatus { customer_id: String },
    /// Look up an offramp transaction
    Offramp {
        customer_id: String,
        transaction_id: String,
    },
    /// Look up an onramp transaction
    Onramp {
        customer_id: String,
        transaction_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let client = OnrampClient::new(&config.provider)?;

    let output = match cli.command {
        Commands::Sign { path, body } => {
            let body: Value = serde_json::from_str(&body)?;
            let request = client.sign_request(&path, body);
            json!({
                "url": request.url(),
                "timestamp": request.timestamp(),
                "payload": request.payload(),
                "signature": request.signature(),
            })
        }
        Commands::PaymentMethods => client.payment_method_types().await,
        Commands::KycStatus { customer_id } => client.kyc_status(&customer_id).await?,
        Commands::Offramp {
            customer_id,
            transaction_id,
        } => {
            client
                .offramp_transaction(&customer_id, &transaction_id)
                .await?
        }
        Commands::Onramp {
            customer_id,
            transaction_id,
        } => {
            client
                .onramp_transaction(&customer_id, &transaction_id)
                .await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

use alloy::primitives::{Address, U256};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use mint_notifier::blockchain::MintEvent;
use mint_notifier::config::validation::MAX_DECIMALS;
use mint_notifier::config::{load_config, TelegramConfig, TokenConfig};
use mint_notifier::notify::{MessageTemplate, TelegramNotifier};

#[derive(Parser)]
#[command(name = "mint-cli")]
#[command(about = "Operator tools for the mint notifier", long_about = None)]
struct Cli {
    /// Optional TOML file with tunables; environment variables override it.
    #[arg(short, long, env = "MINT_BOT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the caption for a synthetic Mint event
    Preview {
        /// Minted amount in base units
        #[arg(long)]
        amount: String,
        /// Recipient address
        #[arg(long, default_value = "0x0000000000000000000000000000000000000000")]
        minter: String,
        /// Transaction hash for the explorer link
        #[arg(long)]
        tx: Option<String>,
        /// Paired deposit amount in base units
        #[arg(long)]
        deposit: Option<String>,
        /// Token decimals
        #[arg(
            long,
            default_value_t = 18,
            value_parser = clap::value_parser!(u8).range(0..=i64::from(MAX_DECIMALS))
        )]
        decimals: u8,
    },
    /// Send a synthetic Mint notification with the configured bot
    TestNotify {
        /// Minted amount in base units
        #[arg(long, default_value = "1000000000000000000")]
        amount: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    match cli.command {
        Commands::Preview {
            amount,
            minter,
            tx,
            deposit,
            decimals,
        } => {
            let token = TokenConfig {
                decimals,
                ..TokenConfig::default()
            };
            let template = MessageTemplate::new(&token, &TelegramConfig::default());
            let event = MintEvent {
                minter: minter.parse::<Address>()?,
                amount: amount.parse::<U256>()?,
                deposit: deposit.map(|d| d.parse::<U256>()).transpose()?,
                tx_hash: tx,
                block_number: None,
            };
            println!("{}", template.caption(&event));
        }
        Commands::TestNotify { amount } => {
            let config = load_config(cli.config.as_deref())?;
            let template = MessageTemplate::new(&config.token, &config.telegram);
            let notifier = TelegramNotifier::new(&config.telegram, template)?;
            let event = MintEvent {
                minter: Address::ZERO,
                amount: amount.parse::<U256>()?,
                deposit: None,
                tx_hash: None,
                block_number: None,
            };

            let payload = notifier.payload(&event);
            match notifier.send(&payload).await {
                Ok(()) => println!("Test notification sent via {}", payload.method()),
                Err(e) => {
                    eprintln!("Error: test notification failed: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

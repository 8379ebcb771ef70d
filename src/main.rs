use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use bsclens::logger::{self, LogTag};
use bsclens::tools::ToolRegistry;
use bsclens::{holders, portfolio, tokens, Config, LensContext, LensResult};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bsclens", version, about = "BNB Smart Chain wallet and token lens")]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Aggregate a wallet's full portfolio
    Portfolio {
        /// Wallet address (0x-prefixed)
        address: String,
        /// Minimum balance * price for a token to be shown
        #[arg(long)]
        dust_threshold: Option<f64>,
    },
    /// Classify the top holders of a token
    Holders {
        /// Token contract address (0x-prefixed)
        address: String,
        /// How many top holders to return
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Search listed tokens by name, symbol, or address
    Search {
        query: String,
    },
    /// Show a wallet's native BNB balance
    Balance {
        address: String,
    },
    /// Resolve a .bnb domain to an address
    Resolve {
        domain: String,
    },
    /// List the available agent tools as JSON
    Tools,
}

#[tokio::main]
async fn main() -> ExitCode {
    logger::init();

    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            logger::error(LogTag::Config, &format!("failed to load config: {}", e));
            return ExitCode::FAILURE;
        }
    };

    match run(cli.command, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            logger::error(LogTag::System, &e.to_string());
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command, config: Config) -> LensResult<()> {
    let context = LensContext::new(config)?;

    match command {
        Command::Portfolio {
            address,
            dust_threshold,
        } => {
            let threshold = dust_threshold.unwrap_or(context.config.dust_threshold);
            let portfolio = portfolio::get_portfolio(
                &context.scan,
                &context.rpc,
                &context.prices,
                &context.token_list,
                &address,
                threshold,
            )
            .await?;
            print_json(&portfolio)?;
        }
        Command::Holders { address, limit } => {
            let classification =
                holders::get_holders_classification(&context.scan, &context.rpc, &address, limit)
                    .await?;
            print_json(&classification)?;
        }
        Command::Search { query } => {
            let matches = tokens::search_tokens(&context.token_list, &query).await?;
            print_json(&matches)?;
        }
        Command::Balance { address } => {
            let address = bsclens::validation::normalize_address(&address)?;
            let balance = context.rpc.get_native_balance(&address).await?;
            print_json(&serde_json::json!({
                "address": address,
                "balance": balance,
            }))?;
        }
        Command::Resolve { domain } => {
            bsclens::validation::require_domain(&domain)?;
            match context.bns.resolve(&domain).await? {
                Some(address) => print_json(&serde_json::json!({
                    "domain": domain,
                    "address": address,
                }))?,
                None => print_json(&serde_json::json!({
                    "domain": domain,
                    "address": serde_json::Value::Null,
                }))?,
            }
        }
        Command::Tools => {
            let registry = ToolRegistry::with_builtin_tools(Arc::new(context));
            print_json(&registry.definitions())?;
        }
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> LensResult<()> {
    let text = serde_json::to_string_pretty(value)?;
    println!("{}", text);
    Ok(())
}

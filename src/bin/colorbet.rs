use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colorbet_rs::{
    checkout, Cart, CartSummary, CheckoutError, Config, FileStore, GameType, NewSelection,
    TradingApiClient, Wallet,
};
use rust_decimal::Decimal;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "colorbet")]
#[command(about = "Colour/number trading CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and remember the session
    Login,
    /// Forget the stored session
    Logout,
    /// Show the wallet balance
    Wallet,
    /// List rounds
    Rounds {
        /// Only rounds of this game type (color or number)
        #[arg(short, long)]
        game_type: Option<GameType>,
    },
    /// Show one round
    Round { round_id: String },
    /// List my orders
    Orders,
    /// Manage the bet slip
    #[command(subcommand)]
    Cart(CartCommand),
    /// Submit the bet slip as one batch order
    Checkout,
}

#[derive(Subcommand)]
enum CartCommand {
    /// Add a selection
    Add(AddArgs),
    /// Show the cart and its totals
    List,
    /// Remove a selection by id
    Remove { id: String },
    /// Remove everything
    Clear,
}

#[derive(Args)]
struct AddArgs {
    /// Round to bet on
    #[arg(short, long)]
    round: String,
    /// color or number
    #[arg(short, long)]
    game_type: GameType,
    /// Comma separated options, e.g. red,green or 7,8
    #[arg(short, long, value_delimiter = ',', required = true)]
    options: Vec<String>,
    /// Total stake for the selection
    #[arg(short, long)]
    amount: Decimal,
}

fn print_summary(summary: &CartSummary) {
    if summary.is_empty() {
        println!("Cart is empty");
        return;
    }
    for item in &summary.items {
        println!(
            "{:<24} {:<8} {:<6} {:<16} ₹{:.2}",
            item.id,
            item.round_id,
            item.game_type,
            item.options.join(","),
            item.amount
        );
    }
    println!("Items:          {}", summary.total_items);
    println!("Total:          ₹{:.2}", summary.total_amount);
    println!("Service charge: ₹{:.2}", summary.service_charge);
    println!("Payable:        ₹{:.2}", summary.final_amount);
}

async fn logged_in_client(config: &Config, store: &FileStore) -> Result<TradingApiClient> {
    let mut client = TradingApiClient::new(config.clone())?;
    if !client.restore_session(store)? {
        info!("No stored session, logging in...");
        client.login().await?;
        client.persist_session(store)?;
    }
    Ok(client)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::new()?;
    let store = FileStore::new(&config.cart.storage_dir);
    let settings = config.cart.settings()?;

    match cli.command {
        Commands::Login => {
            let mut client = TradingApiClient::new(config.clone())?;
            let response = client.login().await?;
            client.persist_session(&store)?;
            match response.user.and_then(|u| u.name) {
                Some(name) => println!("Logged in as {name}"),
                None => println!("Logged in"),
            }
        }
        Commands::Logout => {
            let mut client = TradingApiClient::new(config.clone())?;
            client.logout(&store)?;
            println!("Logged out");
        }
        Commands::Wallet => {
            let client = logged_in_client(&config, &store).await?;
            let balance = client.get_wallet_balance().await?;
            println!("Balance: ₹{:.2}", balance.balance);
        }
        Commands::Rounds { game_type } => {
            let client = logged_in_client(&config, &store).await?;
            for round in client.list_rounds(game_type).await? {
                println!(
                    "{:<12} {:<7} {:<9} {}",
                    round.id,
                    round.game_type,
                    format!("{:?}", round.status).to_lowercase(),
                    round.result.as_deref().unwrap_or("-")
                );
            }
        }
        Commands::Round { round_id } => {
            let client = logged_in_client(&config, &store).await?;
            let round = client.get_round(&round_id).await?;
            println!("{}", serde_json::to_string_pretty(&round)?);
        }
        Commands::Orders => {
            let client = logged_in_client(&config, &store).await?;
            for order in client.my_orders().await? {
                println!(
                    "{:<12} {:<12} {:<7} {:<8} ₹{:.2} {:?}",
                    order.id,
                    order.round_id,
                    format!("{:?}", order.trade_type).to_lowercase(),
                    order.selection,
                    order.amount,
                    order.status
                );
            }
        }
        Commands::Cart(command) => {
            let mut cart = Cart::load(store.clone(), settings);
            match command {
                CartCommand::Add(args) => {
                    let candidate =
                        NewSelection::new(args.round, args.game_type, args.options, args.amount);
                    match cart.add_item(candidate) {
                        Ok(added) => println!("{} ({})", added.message, added.item.id),
                        Err(err) => println!("{err}"),
                    }
                }
                CartCommand::List => {}
                CartCommand::Remove { id } => {
                    cart.remove_item(&id);
                }
                CartCommand::Clear => cart.clear_cart(),
            }
            print_summary(&cart.summary());
        }
        Commands::Checkout => {
            let client = logged_in_client(&config, &store).await?;
            let mut cart = Cart::load(store.clone(), settings);
            let mut wallet = Wallet::new();
            wallet
                .refresh(&client)
                .await
                .context("fetching wallet balance")?;

            match checkout(&mut cart, &mut wallet, &client).await {
                Ok(receipt) => {
                    println!(
                        "Placed {} orders for ₹{:.2}",
                        receipt.orders.len(),
                        receipt.submitted.final_amount
                    );
                    if let Some(balance) = receipt.wallet_balance {
                        println!("Balance: ₹{:.2}", balance);
                    }
                }
                Err(CheckoutError::Cart(err)) => println!("{err}"),
                Err(err) => {
                    println!("{err}. Your cart has been kept, try again.");
                    return Err(err.into());
                }
            }
        }
    }

    Ok(())
}

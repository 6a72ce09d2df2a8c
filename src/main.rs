use anyhow::Result;
use clap::{Parser, Subcommand};
use shopchat::api::SearchFilters;
use shopchat::core::{
    Author, CatalogController, ConversationController, CredentialController, MonotonicTurnIds,
    SessionBootstrap,
};
use shopchat::{Config, FileCredentialStore, HttpApi, ShopApi};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "shopchat")]
#[command(author, version, about = "Shopchat - terminal shopping assistant", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Backend base URL (overrides config)
    #[arg(long, global = true)]
    backend: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat with the shopping assistant
    Chat {
        /// Initial message to send
        message: Option<String>,

        /// Resume a stored conversation by id
        #[arg(long)]
        session: Option<String>,
    },

    /// Log in and persist the credential
    Login {
        username: String,

        /// Password (prompted via stdin when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Create an account and log in
    Register {
        username: String,
        email: String,

        /// Password (prompted via stdin when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Drop the persisted credential
    Logout,

    /// Show the currently authenticated user
    Whoami,

    /// Search the product catalog
    Search {
        query: String,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        brand: Option<String>,

        #[arg(long)]
        min_price: Option<f64>,

        #[arg(long)]
        max_price: Option<f64>,
    },

    /// List catalog categories with aggregates
    Categories,

    /// List catalog brands
    Brands,

    /// Show featured products
    Featured,

    /// Show trending products
    Trending,

    /// List stored conversations
    Sessions,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "shopchat=debug"
    } else {
        "shopchat=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = Config::load()?;
    if let Some(backend) = cli.backend {
        config.backend.base_url = backend;
    }

    let store = Arc::new(FileCredentialStore::open_default()?);
    let api: Arc<dyn ShopApi> = Arc::new(HttpApi::new(
        &config.backend.base_url,
        config.backend.timeout_secs,
        store.clone(),
    ));
    let auth = Arc::new(CredentialController::new(api.clone(), store));

    match cli.command {
        Commands::Chat { message, session } => {
            run_chat(api, auth, message, session).await?;
        }
        Commands::Login { username, password } => {
            let password = match password {
                Some(p) => p,
                None => read_line_from_stdin("Password: ").await?,
            };
            if auth.login(&username, &password).await {
                let name = auth.display_name().unwrap_or(username);
                println!("Logged in as {}", name);
            } else {
                anyhow::bail!("Login failed ({:?})", auth.last_error());
            }
        }
        Commands::Register {
            username,
            email,
            password,
        } => {
            let password = match password {
                Some(p) => p,
                None => read_line_from_stdin("Password: ").await?,
            };
            if auth.register(&username, &email, &password).await {
                println!("Registered and logged in as {}", username);
            } else {
                anyhow::bail!("Registration failed ({:?})", auth.last_error());
            }
        }
        Commands::Logout => {
            auth.logout();
            println!("Logged out");
        }
        Commands::Whoami => {
            auth.restore_session().await;
            match auth.user() {
                Some(user) => println!("{} <{}>", user.username, user.email),
                None => println!("Not logged in"),
            }
        }
        Commands::Search {
            query,
            category,
            brand,
            min_price,
            max_price,
        } => {
            let catalog = CatalogController::new(api);
            let filters = SearchFilters {
                category,
                brand,
                min_price,
                max_price,
            };
            catalog.search(&query, &filters).await;
            if let Some(kind) = catalog.last_error() {
                anyhow::bail!("Search failed ({:?})", kind);
            }
            print_products(&catalog.products());
        }
        Commands::Categories => {
            let catalog = CatalogController::new(api);
            catalog.get_categories().await;
            if let Some(kind) = catalog.last_error() {
                anyhow::bail!("Category fetch failed ({:?})", kind);
            }
            for stat in catalog.categories() {
                println!(
                    "{:<16} {:>4} products  avg {:.1}★  avg ${:.2}",
                    stat.category, stat.count, stat.avg_rating, stat.avg_price
                );
            }
        }
        Commands::Brands => {
            let catalog = CatalogController::new(api);
            catalog.get_brands().await;
            if let Some(kind) = catalog.last_error() {
                anyhow::bail!("Brand fetch failed ({:?})", kind);
            }
            for brand in catalog.brands() {
                println!("{}", brand);
            }
        }
        Commands::Featured => {
            let catalog = CatalogController::new(api);
            catalog.get_featured().await;
            if let Some(kind) = catalog.last_error() {
                anyhow::bail!("Featured fetch failed ({:?})", kind);
            }
            print_products(&catalog.featured());
        }
        Commands::Trending => {
            let catalog = CatalogController::new(api);
            catalog.get_trending().await;
            if let Some(kind) = catalog.last_error() {
                anyhow::bail!("Trending fetch failed ({:?})", kind);
            }
            print_products(&catalog.trending());
        }
        Commands::Sessions => {
            match api.list_chat_sessions().await {
                Ok(sessions) => {
                    for s in sessions {
                        println!("{}  updated {}", s.id, s.updated_at.format("%Y-%m-%d %H:%M"));
                    }
                }
                Err(err) => anyhow::bail!("Session listing failed: {}", err),
            }
        }
    }

    Ok(())
}

async fn run_chat(
    api: Arc<dyn ShopApi>,
    auth: Arc<CredentialController>,
    initial_message: Option<String>,
    resume_session: Option<String>,
) -> Result<()> {
    let conversation = Arc::new(ConversationController::new(
        api,
        Arc::new(MonotonicTurnIds::new()),
    ));
    let bootstrap = SessionBootstrap::new(auth, conversation.clone());
    bootstrap.start().await;

    if let Some(session_id) = resume_session {
        if let Err(err) = conversation.load_session(&session_id).await {
            anyhow::bail!("Could not resume session {}: {}", session_id, err);
        }
    }

    print_new_turns(&conversation, 0);
    let mut printed = conversation.turns().len();

    if let Some(message) = initial_message {
        println!("you> {}", message);
        conversation.submit(&message).await;
        print_new_turns(&conversation, printed);
        printed = conversation.turns().len();
    }

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    print_prompt().await?;
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "/quit" | "/exit" => break,
            "/reset" => {
                bootstrap.reset_conversation();
                printed = 0;
            }
            _ => {
                // The user turn is already echoed on their terminal; count it
                // as printed so only the assistant reply is shown.
                if conversation.submit(&line).await {
                    printed += 1;
                }
            }
        }
        print_new_turns(&conversation, printed);
        printed = conversation.turns().len();
        print_prompt().await?;
    }

    Ok(())
}

fn print_new_turns(conversation: &ConversationController, from: usize) {
    for turn in conversation.turns().iter().skip(from) {
        let who = match turn.author {
            Author::User => "you",
            Author::Assistant => "assistant",
        };
        println!("{}> {}", who, turn.text);
        for product in &turn.products {
            println!(
                "    - {} ({}) ${:.2}  {:.1}★  {} in stock",
                product.name, product.brand, product.price, product.rating, product.stock
            );
        }
    }
}

async fn print_prompt() -> Result<()> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(b"you> ").await?;
    stdout.flush().await?;
    Ok(())
}

async fn read_line_from_stdin(prompt: &str) -> Result<String> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(prompt.as_bytes()).await?;
    stdout.flush().await?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await?;
    Ok(line.trim_end().to_string())
}

fn print_products(products: &[shopchat::api::Product]) {
    if products.is_empty() {
        println!("No products found");
        return;
    }
    for product in products {
        println!(
            "{:>6}  {:<40} {:<12} ${:>8.2}  {:.1}★  {} in stock",
            product.id, product.name, product.brand, product.price, product.rating, product.stock
        );
    }
}

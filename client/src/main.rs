use std::path::PathBuf;

use anyhow::{Context, Result};
use bookworm_client::{read_image, App, Config};
use bookworm_shared::auth::{self, LoginForm, SignupForm};
use bookworm_shared::delete::{delete_recommendation, PendingDeletes};
use bookworm_shared::draft::{self, Draft};
use bookworm_shared::feed::{FeedPaginator, LoadMode};
use bookworm_shared::format::{format_publish_date, format_short_date, star_bar};
use bookworm_shared::session::SessionCheck;
use bookworm_shared::shelf::Recommendations;
use bookworm_shared::{ClientError, Recommendation};
use clap::{Parser, Subcommand};
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "bookworm", about = "Share your favourite reads", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Request a login code by email or phone number
    Login {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Create an account and request a code
    Signup {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
    },
    /// Enter the code from login or signup
    Verify { code: String },
    Logout,
    /// Show the stored account
    Whoami,
    /// Browse community recommendations
    Feed {
        /// Pages to fetch, stopping early at the last one
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// List your own recommendations
    Mine,
    /// Post a new recommendation
    Post {
        #[arg(long)]
        title: String,
        #[arg(long)]
        caption: String,
        #[arg(long)]
        rating: u8,
        #[arg(long)]
        image: PathBuf,
    },
    /// Delete one of your recommendations
    Delete { id: String },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        error!("{e:#}");
        eprintln!("Error: {}", user_message(&e));
        std::process::exit(1);
    }
}

fn user_message(e: &anyhow::Error) -> String {
    match e.downcast_ref::<ClientError>() {
        Some(client) => client.user_message(),
        None => format!("{e:#}"),
    }
}

async fn run() -> Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing()?;

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    info!(api_url = %config.api_url, "configuration loaded");

    let mut app = App::new(config)?;
    debug!(
        api_url = %app.api.base_url(),
        session_file = %app.session.store().path().display(),
        policy = ?app.session.policy(),
        "client ready"
    );

    let result = dispatch(&mut app, cli.command).await;
    if let Some(client) = result.as_ref().err().and_then(|e| e.downcast_ref::<ClientError>()) {
        if app.session.handle_error(client)? {
            println!("Session expired; please login again.");
        } else if client.is_auth_failure() {
            println!("Run `bookworm login` to sign in.");
        }
    }
    result
}

async fn dispatch(app: &mut App, command: Command) -> Result<()> {
    match command {
        Command::Login { email, phone } => {
            let form = LoginForm {
                email: email.unwrap_or_default(),
                phonenumber: phone.unwrap_or_default(),
            };
            let challenge = auth::login(&app.api, &mut app.session, &form).await?;
            println!("Code- {}", challenge.otp);
            println!("Run `bookworm verify <code>` to finish logging in.");
        }
        Command::Signup {
            username,
            email,
            phone,
        } => {
            let form = SignupForm {
                username,
                email,
                phonenumber: phone,
            };
            let challenge = auth::signup(&app.api, &mut app.session, &form).await?;
            println!("{}", challenge.otp);
            println!("Run `bookworm verify <code>` to finish signing up.");
        }
        Command::Verify { code } => {
            let session = auth::verify(&app.api, &mut app.session, &code).await?;
            println!(
                "Welcome, {}!",
                session.username.as_deref().unwrap_or("reader")
            );
        }
        Command::Logout => {
            auth::logout(&app.api, &mut app.session).await?;
            println!("Logged out.");
        }
        Command::Whoami => match app.session.check()? {
            SessionCheck::Authenticated(s) => {
                println!("{}", s.username.as_deref().unwrap_or("Guest"));
                println!("{}", s.email.as_deref().unwrap_or("No email provided"));
            }
            SessionCheck::Unauthenticated => println!("Not logged in"),
        },
        Command::Feed { pages } => {
            let token = app.session.require_token()?;
            let mut feed = FeedPaginator::new(app.config.page_limit);
            feed.load(&app.api, &token, LoadMode::Initial).await?;
            for _ in 1..pages {
                if !feed.has_more() {
                    break;
                }
                feed.load(&app.api, &token, LoadMode::Append).await?;
            }
            if feed.items().is_empty() {
                println!("No recommendations yet");
            }
            for rec in feed.items().iter() {
                print_feed_item(rec);
            }
            if feed.has_more() {
                println!("More available: --pages {}", feed.current_page() + 1);
            }
        }
        Command::Mine => {
            let token = app.session.require_token()?;
            let books = auth::user_books(&app.api, &token).await?;
            if books.is_empty() {
                println!("No recommendations yet. Add your first book with `bookworm post`.");
            }
            for rec in &books {
                print_shelf_item(rec);
            }
        }
        Command::Post {
            title,
            caption,
            rating,
            image,
        } => {
            let token = app.session.require_token()?;
            let attachment = read_image(&image).await?;
            let mut draft = Draft {
                title,
                caption,
                rating,
                image: Some(attachment),
            };
            let created = draft::submit(&app.api, &token, &mut draft).await?;
            println!("Your Book recommendation has been posted ({})", created.id);
        }
        Command::Delete { id } => {
            let token = app.session.require_token()?;
            let mut shelf: Recommendations =
                auth::user_books(&app.api, &token).await?.into_iter().collect();
            if !shelf.contains(&id) {
                return Err(ClientError::Server {
                    status: 404,
                    message: format!("No recommendation {id} on your shelf"),
                }
                .into());
            }
            let mut pending = PendingDeletes::new();
            delete_recommendation(&app.api, &token, &mut shelf, &mut pending, &id).await?;
            println!("Recommendation deleted successfully");
        }
    }
    Ok(())
}

fn print_feed_item(rec: &Recommendation) {
    println!("{} · {}", rec.username, rec.name);
    println!("  {}", star_bar(rec.ratings));
    println!("  {}", rec.caption);
    println!("  Shared on {}", format_publish_date(&rec.created_at));
    println!();
}

fn print_shelf_item(rec: &Recommendation) {
    println!("[{}] {}  {}", rec.id, rec.name, star_bar(rec.ratings));
    println!("  {}", rec.caption);
    println!("  {}", format_short_date(&rec.created_at));
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,bookworm_client=info,bookworm_shared=info"));

    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| matches!(v.to_lowercase().as_str(), "json" | "structured"))
        .unwrap_or(false);

    if use_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    }

    Ok(())
}

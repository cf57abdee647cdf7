use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use shelf_core::book::{BookStatus, NewBook};
use shelf_infrastructure::ShelfPaths;
use std::path::PathBuf;

mod app;
mod commands;
mod logging;
mod prompt;

#[derive(Parser)]
#[command(name = "shelf")]
#[command(about = "Reading Shelf - your bookshelf, with an AI reading companion", long_about = None)]
struct Cli {
    /// Directory holding config.toml, secret.json and identity.json
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Log level for the log file (RUST_LOG takes precedence)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in
    Login { user_id: Option<String> },
    /// Create an account
    Signup {
        user_id: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Reset a forgotten password with an e-mailed code
    ResetPassword {
        #[arg(long)]
        email: Option<String>,
    },
    /// Bind an e-mail address to the signed-in account
    BindEmail { email: String },
    /// Sign out
    Logout,
    /// Show who is signed in
    Whoami,
    /// Manage the shelves
    Books {
        #[command(subcommand)]
        action: BooksAction,
    },
    /// Talk about a book (by id or exact title)
    Chat { book: String },
}

#[derive(Subcommand)]
enum BooksAction {
    /// List a shelf
    List {
        /// Show the "read" shelf instead of "want to read"
        #[arg(long)]
        read: bool,
        #[arg(long)]
        category: Option<String>,
    },
    /// Add a book
    Add(AddArgs),
    /// Move a book to the other shelf
    Toggle { book: String },
    /// Delete a book and its conversation
    Delete {
        book: String,
        /// Skip the confirmation question
        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(Args)]
struct AddArgs {
    title: String,
    #[arg(long)]
    author: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    cover: Option<String>,
    /// Put it on the "read" shelf
    #[arg(long)]
    read: bool,
}

fn shelf_for(read: bool) -> BookStatus {
    if read {
        BookStatus::Read
    } else {
        BookStatus::WantToRead
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = ShelfPaths::new(cli.config_dir.as_deref());
    let _log_guard = logging::init(&paths.logs_dir()?, &cli.log_level)?;
    tracing::info!("[Startup] shelf {}", env!("CARGO_PKG_VERSION"));

    let app = app::App::bootstrap(paths)?;

    match cli.command {
        Commands::Login { user_id } => commands::account::login(&app, user_id).await?,
        Commands::Signup { user_id, email } => {
            commands::account::sign_up(&app, user_id, email).await?
        }
        Commands::ResetPassword { email } => {
            commands::account::reset_password(&app, email).await?
        }
        Commands::BindEmail { email } => commands::account::bind_email(&app, &email).await?,
        Commands::Logout => commands::account::logout(&app).await?,
        Commands::Whoami => commands::account::whoami(&app).await?,
        Commands::Books { action } => match action {
            BooksAction::List { read, category } => {
                commands::books::list(&app, shelf_for(read), category.as_deref()).await?
            }
            BooksAction::Add(args) => {
                let new_book = NewBook {
                    title: args.title,
                    author: args.author.unwrap_or_default(),
                    category: args.category.unwrap_or_default(),
                    cover_url: args.cover.unwrap_or_default(),
                };
                commands::books::add(&app, new_book, shelf_for(args.read)).await?
            }
            BooksAction::Toggle { book } => commands::books::toggle(&app, &book).await?,
            BooksAction::Delete { book, yes } => {
                commands::books::delete(&app, &book, yes).await?
            }
        },
        Commands::Chat { book } => commands::chat::run(&app, &book).await?,
    }

    Ok(())
}

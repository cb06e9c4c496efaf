mod cli;

use actix_web::{App, HttpServer};
use clap::{Parser, Subcommand};
use facefinder::{Config, FaceFinder, SqliteStore};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Stores face descriptors and finds the most similar ones.
#[derive(Parser, Debug)]
#[command(name = "facefinder", version, about)]
struct Args {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// SQLite database file, overrides the config file
    #[arg(short, long)]
    database: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive session (default).
    Repl,
    /// Resolve one face and print the most similar ones.
    Resolve {
        #[arg(allow_negative_numbers = true)]
        race: i64,
        #[arg(allow_negative_numbers = true)]
        emotion: i64,
        #[arg(allow_negative_numbers = true)]
        oldness: i64,
        /// Id of an already stored face; omit to store a new one.
        #[arg(long, default_value_t = 0)]
        id: u64,
    },
    /// Remove every stored face and restart ids at 1.
    Flush,
    /// Serve the JSON API.
    Serve {
        #[arg(short, long)]
        bind: Option<String>,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &Args) -> facefinder::Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(database) = &args.database {
        config.database = database.clone();
    }

    Ok(config)
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&args)?;

    let store = SqliteStore::open(&config.database)?;
    let mut finder = FaceFinder::with_limits(store, config.faces_limit, config.similar_limit);

    match args.command.unwrap_or(Commands::Repl) {
        Commands::Repl => cli::run_repl(&mut finder),
        Commands::Resolve { race, emotion, oldness, id } => {
            cli::execute_command(&mut finder, cli::Command::Resolve { race, emotion, oldness, id })?;
        }
        Commands::Flush => cli::execute_command(&mut finder, cli::Command::Flush)?,
        Commands::Serve { bind } => {
            let bind = bind.unwrap_or(config.bind);
            let finder = facefinder::server::shared(finder);

            tracing::info!(%bind, database = %config.database.display(), "starting facefinder server");
            HttpServer::new(move || App::new().app_data(finder.clone()).configure(facefinder::server::config))
                .bind(bind)?
                .run()
                .await?;
        }
    }

    Ok(())
}

#[actix_web::main]
async fn main() {
    init_tracing();

    if let Err(error) = run(Args::parse()).await {
        eprintln!("Error: {}", error);
        std::process::exit(1);
    }
}

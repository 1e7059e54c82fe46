use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    controller::EMPTY_LIST_TEXT, load_settings, ControllerSettings, ControllerSnapshot,
    HttpMovieStore, MovieController, MovieStore, ViewState,
};
use shared::domain::{Movie, MovieId, NewMovie};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Browse and edit the remote movie collection")]
struct Cli {
    /// Base URL of the remote store; overrides movies.toml and the environment.
    #[arg(long)]
    store_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every movie in the collection.
    List,
    /// Create a movie and print the id the store assigned.
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        opening_text: String,
        #[arg(long)]
        release_date: String,
    },
    /// Delete a movie by id.
    Delete { id: String },
    /// Keep the list loaded, retrying on failure, and print every change until Ctrl-C.
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings();
    if let Some(store_url) = cli.store_url {
        settings.store_base_url = store_url;
    }
    let store = HttpMovieStore::from_settings(&settings)?;
    tracing::info!(store = %store.base_url(), "using movie store");

    match cli.command {
        Command::List => {
            let movies = store.list_movies().await?;
            print_movies(&movies);
        }
        Command::Add {
            title,
            opening_text,
            release_date,
        } => {
            let movie = NewMovie::new(title, opening_text, release_date);
            if !movie.is_complete() {
                anyhow::bail!("title, opening text and release date are all required");
            }
            let created = store.add_movie(&movie).await?;
            println!("Added movie id={}", created.id);
        }
        Command::Delete { id } => {
            store.delete_movie(&MovieId(id.clone())).await?;
            println!("Deleted movie id={id}");
        }
        Command::Watch => {
            let controller =
                MovieController::new(Arc::new(store), ControllerSettings::from(&settings));
            watch(controller).await?;
        }
    }

    Ok(())
}

async fn watch(controller: Arc<MovieController>) -> Result<()> {
    let mut snapshots = controller.subscribe();
    {
        let controller = controller.clone();
        tokio::spawn(async move { controller.start().await });
    }

    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                changed.context("movie controller stopped publishing")?;
                let snapshot = snapshots.borrow_and_update().clone();
                print_snapshot(&snapshot);
                if snapshot.view.offers_retry() {
                    let controller = controller.clone();
                    tokio::spawn(async move { controller.retry().await });
                }
            }
            signal = tokio::signal::ctrl_c() => {
                signal.context("failed to listen for ctrl-c")?;
                controller.shutdown().await;
                return Ok(());
            }
        }
    }
}

fn print_snapshot(snapshot: &ControllerSnapshot) {
    match &snapshot.view {
        ViewState::Failed(message) => println!("{message} (retrying)"),
        ViewState::Retrying(attempt) => println!("Retrying... attempt {attempt}"),
        ViewState::Loaded(movies) => print_movies(movies),
        view => {
            if let Some(text) = view.placeholder_text() {
                println!("{text}");
            }
        }
    }
}

fn print_movies(movies: &[Movie]) {
    if movies.is_empty() {
        println!("{EMPTY_LIST_TEXT}");
        return;
    }
    for movie in movies {
        println!(
            "{}\t{}\t{}\t{}",
            movie.id, movie.title, movie.release_date, movie.opening_text
        );
    }
}

use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use anyhow::{Context, Result};

mod app;
mod bible;
mod codegen;
mod config;
mod handler;
mod panel;
mod selector;
mod tui;
mod ui;

use app::App;
use bible::{BookNames, Versification};
use codegen::GenerateManifest;
use config::Config;

#[derive(Parser)]
#[command(name = "bible-reader")]
#[command(about = "Terminal Bible reader with multi-passage columns and a chapter picker")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the reader (default)
    Read {
        /// Directory with per-version chapter content and versification
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },
    /// Generate the bundled-content source file from hashed JSON fixtures
    Generate {
        /// Directory holding the content-hashed JSON fixtures
        #[arg(short, long)]
        public: PathBuf,
        /// Generation manifest (bibles, hashes, initial passage)
        #[arg(short, long)]
        manifest: PathBuf,
        /// Path of the source file to write
        #[arg(short, long)]
        out: PathBuf,
    },
    /// List available books and chapter counts
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Read { data_dir: None }) {
        Commands::Read { data_dir } => run_reader(data_dir).await?,
        Commands::Generate { public, manifest, out } => generate(&public, &manifest, &out)?,
        Commands::List => list_books()?,
    }

    Ok(())
}

async fn run_reader(data_dir: Option<PathBuf>) -> Result<()> {
    let config = Config::load().unwrap_or_else(|_| Config::new());
    let mut app = App::new(&config, data_dir, Config::default_path().ok())?;

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new();

    let result = run_loop(&mut app, &mut terminal, &mut events).await;

    // Restore the terminal before surfacing any error
    tui::restore()?;
    result
}

async fn run_loop(
    app: &mut App,
    terminal: &mut tui::Tui,
    events: &mut tui::EventHandler,
) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;
        match events.next().await {
            Some(event) => handler::handle_event(app, event)?,
            None => break,
        }
    }
    Ok(())
}

fn generate(public: &PathBuf, manifest_path: &PathBuf, out: &PathBuf) -> Result<()> {
    let manifest = GenerateManifest::load(manifest_path)?;

    println!("{}", "Generating bundled content".bold().blue());
    for bible in &manifest.bibles {
        println!(
            "  • {} {} {}",
            bible.id.bold().green(),
            bible.name,
            format!("({})", bible.lang).dimmed()
        );
    }

    let code = codegen::generate_code(public, &manifest)?;
    std::fs::write(out, code)
        .with_context(|| format!("writing generated source to {}", out.display()))?;

    println!(
        "{} {}",
        "Wrote".bold().green(),
        out.display().to_string().bold()
    );
    Ok(())
}

fn list_books() -> Result<()> {
    let v11n = Versification::kjv();
    let names = BookNames::english();

    println!("\n{}", "📖 Available Books".bold().blue());
    println!("{}", "=".repeat(40).dimmed());

    for book_id in v11n.books() {
        let chapters = v11n.chapter_count(book_id);
        println!(
            "  • {} {}",
            names.display(book_id).bold(),
            format!("({} chapters)", chapters).dimmed()
        );
    }

    Ok(())
}

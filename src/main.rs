mod server;
mod store;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

use store::TaskStore;

#[derive(Parser)]
#[command(name = "ticklist")]
#[command(about = "Ticklist - a tiny task list with a web UI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(long, global = true)]
    debug: bool,
    /// Task file location.
    #[arg(long, global = true, default_value = "tasks.json")]
    file: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web UI.
    Serve {
        #[arg(long, default_value_t = 8686)]
        port: u16,
    },
    Add { title: String },
    List,
    Done { id: u64 },
    Delete { id: u64 },
    Edit { id: u64, title: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.debug { env::set_var("RUST_LOG", "debug"); } else { env::set_var("RUST_LOG", "info"); }
    env_logger::init();

    let mut store = TaskStore::new(cli.file);
    store.load();

    match cli.command {
        Commands::Serve { port } => {
            let store = Arc::new(Mutex::new(store));
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(server::start_server(store, port))?;
        }
        Commands::Add { title } => match store.add(&title) {
            Ok(task) => println!("✅ Task [{}] added.", task.id),
            Err(e) => println!("❌ {}", e),
        },
        Commands::List => {
            println!("TICKLIST:");
            for t in store.all() {
                let marker = if t.done { "x" } else { " " };
                println!("- [{}] {} {} ({})", marker, t.id, t.title, t.created_at);
            }
        }
        Commands::Done { id } => {
            if store.mark_done(id) {
                println!("✅ Task {} marked as done.", id);
            } else {
                println!("❌ Task {} not found or already done.", id);
            }
        }
        Commands::Delete { id } => {
            if store.delete(id) {
                println!("✅ Task {} deleted.", id);
            } else {
                println!("❌ Task {} not found.", id);
            }
        }
        Commands::Edit { id, title } => {
            if store.edit(id, &title) {
                println!("✅ Task {} updated.", id);
            } else {
                println!("❌ Invalid title or task {} not found.", id);
            }
        }
    }
    Ok(())
}

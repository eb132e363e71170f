use anyhow::{bail, Context, Result};
use item_store::{Item, ItemStatus, ItemStore, ItemStoreError, StatusCounts, StoreConfig};
use state_store::FileStore;
use std::env;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

type Store = ItemStore<FileStore>;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();

    if let Err(e) = run(&args).await {
        error!("Command failed: {:#}", e);
        eprintln!("Error: {:#}", e);
        if is_storage_fault(&e) {
            eprintln!("The shopping list storage could not be accessed; try again.");
        }
        std::process::exit(1);
    }
}

async fn run(args: &[String]) -> Result<()> {
    let Some(command) = args.first() else {
        print_help();
        return Ok(());
    };

    let config = StoreConfig::from_env();
    let backing = FileStore::new(&config.data_dir);
    info!("Using data directory {}", backing.root().display());
    let store = ItemStore::from_config(Arc::new(backing), &config);

    match command.as_str() {
        "add" => {
            let description = args[1..].join(" ");
            if description.trim().is_empty() {
                bail!("Usage: comprar add <description>");
            }
            let item = Item::new(description.trim())?;
            store.add(item).await.context("Could not add the item")?;
            show(&store, ItemStatus::Pending).await?;
        }
        "list" | "ls" => {
            let filter = match args.get(1) {
                Some(status) => status.parse::<ItemStatus>()?,
                None => ItemStatus::Pending,
            };
            show(&store, filter).await?;
        }
        "toggle" | "done" => {
            let id = required_id(args, "toggle")?;
            let filter = filter_of(&store, id).await?;
            store
                .toggle_status(id)
                .await
                .context("Could not update the item status")?;
            show(&store, filter).await?;
        }
        "remove" | "rm" => {
            let id = required_id(args, "remove")?;
            let filter = filter_of(&store, id).await?;
            store.remove(id).await.context("Could not remove the item")?;
            show(&store, filter).await?;
        }
        "clear" => {
            store.clear().await.context("Could not clear the list")?;
            println!("All items removed.");
        }
        "help" | "--help" | "-h" => print_help(),
        other => {
            print_help();
            bail!("Unknown command: {}", other);
        }
    }

    Ok(())
}

/// Filter the item with `id` currently shows under; pending when unknown
async fn filter_of(store: &Store, id: &str) -> Result<ItemStatus> {
    let item = store
        .find(id)
        .await
        .context("Could not load the items")?;
    Ok(item.map(|i| i.status).unwrap_or_default())
}

/// True when the root cause is a backing-store fault rather than bad input
fn is_storage_fault(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<ItemStoreError>())
        .any(ItemStoreError::is_storage_fault)
}

fn required_id<'a>(args: &'a [String], command: &str) -> Result<&'a str> {
    match args.get(1) {
        Some(id) => Ok(id.as_str()),
        None => bail!("Usage: comprar {} <id>", command),
    }
}

async fn show(store: &Store, filter: ItemStatus) -> Result<()> {
    let counts = store
        .count_by_status()
        .await
        .context("Could not load the items")?;
    let items = store
        .get_by_status(filter)
        .await
        .context("Could not load the items")?;

    println!("{}  - {} total", filter_header(filter, &counts), counts.total());
    if items.is_empty() {
        println!("  No items here");
    }
    for item in &items {
        println!("  {}", render_item(item));
    }
    Ok(())
}

fn filter_header(active: ItemStatus, counts: &StatusCounts) -> String {
    ItemStatus::ALL
        .iter()
        .map(|status| {
            let chip = format!("{} ({})", status, counts.get(*status));
            if *status == active {
                format!("[{}]", chip)
            } else {
                format!(" {} ", chip)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_item(item: &Item) -> String {
    let mark = if item.is_done() { "x" } else { " " };
    format!("[{}] {}  ({})", mark, item.description, item.id)
}

fn print_help() {
    println!("comprar - shopping list");
    println!();
    println!("USAGE:");
    println!("    comprar <COMMAND> [ARGS]");
    println!();
    println!("COMMANDS:");
    println!("    add <description>       Add a pending item");
    println!("    list [pending|done]     Show items with a status (default: pending)");
    println!("    toggle <id>             Switch an item between pending and done");
    println!("    remove <id>             Remove an item");
    println!("    clear                   Remove every item");
    println!("    help                    Show this help message");
    println!();
    println!("ENVIRONMENT:");
    println!("    COMPRAR_DATA_DIR        Where the list is stored (default: ~/.comprar)");
    println!("    COMPRAR_STORAGE_KEY     Storage key (default: @comprar:items)");
    println!("    RUST_LOG                Log filter, e.g. debug");
}

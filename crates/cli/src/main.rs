use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use slotkeeper_core::config::slot_id_from_file_name;
use slotkeeper_core::{CoreConfig, FileService, SlotService};
use slotkeeper_types::{PlayerId, SlotId};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "slotkeeper")]
#[command(about = "Manage game-server player and slot save files")]
struct Cli {
    /// Directory of active player saves (overrides PLAYERS_DIR)
    #[arg(long, global = true)]
    players_dir: Option<PathBuf>,
    /// Root of per-player slot directories (overrides SLOTS_DIR)
    #[arg(long, global = true)]
    slots_dir: Option<PathBuf>,
    /// Backup destination for deletes (overrides BACKUP_DIR)
    #[arg(long, global = true)]
    backup_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether a player has an active save
    Check {
        /// Player identifier (steamid)
        steamid: String,
    },
    /// Move the active save into a slot
    Transfer {
        steamid: String,
        /// Target slot identifier
        slot_id: String,
    },
    /// Restore a slot as the active save
    Restore { steamid: String, slot_id: String },
    /// Write an empty slot, replacing any content
    EmptySlot { steamid: String, slot_id: String },
    /// Write data to a slot file
    WriteSlot {
        steamid: String,
        /// Slot file name, with or without `.json`
        file_name: String,
        /// JSON document to store (default: empty slot)
        #[arg(long)]
        data: Option<String>,
    },
    /// Delete the active save
    DeletePlayer {
        steamid: String,
        /// Copy the file to the backup directory first
        #[arg(long)]
        backup: bool,
    },
    /// Delete one slot file
    DeleteSlot {
        steamid: String,
        slot_id: String,
        #[arg(long)]
        backup: bool,
    },
    /// Show metadata of any path
    Info { path: PathBuf },
}

fn print<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // stdout carries the JSON result; logs go to stderr.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("slotkeeper_core=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Use 'slotkeeper --help' for commands");
        return Ok(());
    };

    let env = CoreConfig::from_env()?;
    let cfg = Arc::new(CoreConfig::new(
        cli.players_dir.unwrap_or_else(|| env.players_dir().to_path_buf()),
        cli.slots_dir.unwrap_or_else(|| env.slots_dir().to_path_buf()),
        cli.backup_dir.unwrap_or_else(|| env.backup_dir().to_path_buf()),
        env.max_read_bytes(),
        env.slot_id_policy(),
    )?);
    let slots = SlotService::new(cfg.clone());

    match command {
        Commands::Check { steamid } => print(&slots.check(&PlayerId::parse(steamid)?)),
        Commands::Transfer { steamid, slot_id } => print(
            &slots.transfer(&PlayerId::parse(steamid)?, &SlotId::parse(slot_id)?),
        ),
        Commands::Restore { steamid, slot_id } => print(
            &slots.restore(&PlayerId::parse(steamid)?, &SlotId::parse(slot_id)?),
        ),
        Commands::EmptySlot { steamid, slot_id } => print(
            &slots.empty_slot(&PlayerId::parse(steamid)?, &SlotId::parse(slot_id)?),
        ),
        Commands::WriteSlot {
            steamid,
            file_name,
            data,
        } => {
            let data = data.as_deref().map(serde_json::from_str::<Value>).transpose()?;
            print(&slots.write_slot(
                &PlayerId::parse(steamid)?,
                &slot_id_from_file_name(&file_name)?,
                data.as_ref(),
            ))
        }
        Commands::DeletePlayer { steamid, backup } => {
            print(&slots.delete_player_file(&PlayerId::parse(steamid)?, backup))
        }
        Commands::DeleteSlot {
            steamid,
            slot_id,
            backup,
        } => print(&slots.delete_slot_file(
            &PlayerId::parse(steamid)?,
            &SlotId::parse(slot_id)?,
            backup,
        )),
        Commands::Info { path } => print(&FileService::new(cfg).info(&path)),
    }
}

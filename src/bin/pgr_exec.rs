use clap::Parser;
use comfy_table::{Cell, Table as ComfyTable, presets::UTF8_FULL};
use postgrust_adapter::{MemStore, Plan, RecordSet, Session, SessionConfig};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// PostgrustSQL statement runner
#[derive(Parser, Debug)]
#[command(name = "pgr_exec")]
#[command(about = "Runs a JSON script of compiled plans against an in-memory store", long_about = None)]
struct Args {
    /// JSON file with a list of {"text": ..., "plan": ...} statements
    #[arg(short, long)]
    script: PathBuf,

    /// Current database
    #[arg(short, long)]
    db: Option<String>,

    /// Pin reads to a historical snapshot
    #[arg(long)]
    snapshot_ts: Option<u64>,

    /// Config file (defaults to ./pgr_exec.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// One scripted statement
#[derive(Debug, Deserialize)]
struct ScriptEntry {
    text: String,
    plan: Plan,
}

fn load_config(args: &Args) -> Result<SessionConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => SessionConfig::load_from(path)?,
        None => SessionConfig::load()?,
    };

    // CLI args override everything
    if let Some(db) = &args.db {
        config.default_db = Some(db.clone());
    }
    if let Some(ts) = args.snapshot_ts {
        config.snapshot_ts = ts;
    }
    Ok(config)
}

fn init_logging(config: &SessionConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn format_record_set(rs: &mut RecordSet) -> Result<String, Box<dyn std::error::Error>> {
    let mut table = ComfyTable::new();
    table.load_preset(UTF8_FULL);
    table.set_header(rs.fields()?.iter().map(|f| Cell::new(&f.column_as_name)));

    let mut count = 0_usize;
    while let Some(row) = rs.next()? {
        table.add_row(row.data.iter().map(Cell::new));
        count += 1;
    }
    rs.close()?;

    if count == 0 {
        return Ok("(0 rows)\n".to_string());
    }
    Ok(format!("{table}\n({count} rows)\n"))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(&args)?;
    init_logging(&config);

    let script: Vec<ScriptEntry> = serde_json::from_str(&std::fs::read_to_string(&args.script)?)?;
    tracing::info!(statements = script.len(), path = %args.script.display(), "loaded script");

    let store = Arc::new(MemStore::new());
    if let Some(db) = &config.default_db {
        store.create_database(db, true)?;
    }
    let session = Session::with_config(store, &config);

    for entry in script {
        println!("> {}", entry.text);
        match session.execute(entry.plan, &entry.text) {
            Ok(Some(mut rs)) => print!("{}", format_record_set(&mut rs)?),
            Ok(None) => println!("OK"),
            Err(e) => eprintln!("ERROR: {e}"),
        }
    }

    Ok(())
}

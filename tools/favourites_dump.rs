use casthour::app::favourites::FAVOURITES_KEY;
use casthour::app::kv::{KvStore, SqliteKv};
use casthour::config::load_config;
use std::env;
use std::fs;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    let out_file: Option<String> = args
        .iter()
        .position(|a| a == "--out")
        .and_then(|i| args.get(i + 1).cloned());
    let pretty = args.iter().any(|a| a == "--pretty");

    let db_path = load_config().local_db_path();
    eprintln!("Opening favourites store: {}", db_path.display());

    let kv = match SqliteKv::open(&db_path) {
        Ok(kv) => kv,
        Err(e) => {
            eprintln!("Failed to open {}: {e}", db_path.display());
            return ExitCode::FAILURE;
        }
    };

    let raw = match kv.get(FAVOURITES_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => "[]".to_string(),
        Err(e) => {
            eprintln!("Failed to read '{FAVOURITES_KEY}': {e}");
            return ExitCode::FAILURE;
        }
    };

    // Re-indent when asked; a value that is not JSON is dumped as stored.
    let output = if pretty {
        serde_json::from_str::<serde_json::Value>(&raw)
            .and_then(|v| serde_json::to_string_pretty(&v))
            .unwrap_or(raw)
    } else {
        raw
    };

    if let Some(path) = out_file {
        if let Err(e) = fs::write(&path, format!("{output}\n")) {
            eprintln!("Failed to write {path}: {e}");
            return ExitCode::FAILURE;
        }
        println!("Exported favourites to {path}");
    } else {
        println!("{output}");
    }

    ExitCode::SUCCESS
}

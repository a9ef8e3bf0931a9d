//! CLI smoke entry point.
//!
//! # Responsibility
//! - Open (or create) a store, bootstrap a session, print a summary.
//! - Keep output deterministic for quick local sanity checks.
//!
//! Usage: `wren_cli [DB_PATH] [ABSOLUTE_LOG_DIR]`

use clap::Parser;
use log::error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use wren_core::{
    core_version, default_log_level, init_logging, open_db, GridConfig, RecordStore,
    SqliteRecordStore, Session,
};

#[derive(Parser, Debug)]
#[command(name = "wren_cli")]
#[command(about = "Open a Wren store and print a summary of its main grid")]
struct Args {
    /// SQLite store to open or create.
    #[arg(default_value = "wren.sqlite3")]
    db_path: PathBuf,

    /// Absolute directory for rotating log files; logging is off without it.
    log_dir: Option<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Some(log_dir) = &args.log_dir {
        if let Err(err) = init_logging(default_log_level(), log_dir) {
            eprintln!("wren logging disabled: {err}");
        }
    }

    match run(&args.db_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_run module=cli status=error error={err}");
            eprintln!("wren error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(db_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let conn = open_db(db_path)?;
    let session = Session::open(SqliteRecordStore::new(&conn), GridConfig::default())?;
    let grid = session.grid();
    let (x_offset, y_offset) = grid.offset();

    println!("wren_core version={}", core_version());
    println!("db={}", db_path.display());
    println!("grids={}", session.application().grids.len());
    println!("current_grid={}", grid.key());
    println!("clips={}", grid.plane().len());
    println!("active_datums={}", grid.active_datums().len());
    println!("offset=({x_offset}, {y_offset})");
    match (grid.bounds().min_x(), grid.bounds().max_x()) {
        (Some(min_x), Some(max_x)) => println!("columns={min_x}..={max_x}"),
        _ => println!("columns=none"),
    }
    let named = session
        .store()
        .list_kind(wren_core::RecordKind::Datum)?
        .len();
    println!("datums={named}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::Args;
    use clap::Parser;
    use std::path::Path;

    #[test]
    fn no_arguments_uses_default_store_without_logging() {
        let args = Args::try_parse_from(["wren_cli"]).unwrap();
        assert_eq!(args.db_path, Path::new("wren.sqlite3"));
        assert_eq!(args.log_dir, None);
    }

    #[test]
    fn positionals_fill_store_then_log_dir() {
        let args = Args::try_parse_from(["wren_cli", "notes.db", "/tmp/wren-logs"]).unwrap();
        assert_eq!(args.db_path, Path::new("notes.db"));
        assert_eq!(args.log_dir.as_deref(), Some("/tmp/wren-logs"));
    }

    #[test]
    fn extra_positional_is_rejected() {
        assert!(Args::try_parse_from(["wren_cli", "a.db", "/logs", "extra"]).is_err());
    }
}

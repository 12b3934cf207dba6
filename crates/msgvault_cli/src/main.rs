//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `msgvault_core` linkage and schema bootstrap without a host app.
//! - Keep output deterministic for quick local sanity checks.
//!
//! Usage: `msgvault_cli [ABSOLUTE_LOG_DIR]`

use msgvault_core::db::migrations::{latest_version, registered_schemas};
use msgvault_core::db::open_db_in_memory;
use std::process::ExitCode;

fn main() -> ExitCode {
    if let Some(log_dir) = std::env::args().nth(1) {
        if let Err(err) = msgvault_core::init_logging(msgvault_core::default_log_level(), &log_dir)
        {
            eprintln!("msgvault logging init failed: {err}");
            return ExitCode::FAILURE;
        }
    }

    println!("msgvault_core version={}", msgvault_core::core_version());

    if let Err(err) = open_db_in_memory() {
        log::error!("event=cli_probe module=cli status=error error={err}");
        eprintln!("msgvault store bootstrap failed: {err}");
        return ExitCode::FAILURE;
    }

    println!("msgvault_core schema_version={}", latest_version());
    for schema in registered_schemas() {
        println!(
            "table={} columns={}",
            schema.table_name(),
            schema.column_names().collect::<Vec<_>>().join(",")
        );
    }

    ExitCode::SUCCESS
}

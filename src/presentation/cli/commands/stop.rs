use colored::Colorize;

use crate::application::services::engine::MonitorEngine;

/// Disarm monitoring. Idempotent: stopping an already stopped monitor is
/// not an error.
///
/// # Errors
///
/// Returns an error when the updated state cannot be persisted.
pub fn run_stop(engine: &MonitorEngine<'_>) -> anyhow::Result<()> {
    engine.stop_monitoring()?;
    println!("{}", "✔ Surveillance arrêtée".green());
    Ok(())
}

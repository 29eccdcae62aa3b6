use colored::Colorize;

use crate::application::services::engine::MonitorEngine;

/// Capture the reference snapshot of the target page.
///
/// # Errors
///
/// Returns an error when no target is resolvable, the capture fails,
/// or the snapshot cannot be persisted.
pub async fn run_capture(engine: &MonitorEngine<'_>) -> anyhow::Result<()> {
    let snapshot = engine.capture_reference().await?;

    println!(
        "{} {}",
        "✔ Référence capturée :".green().bold(),
        snapshot.target_url
    );
    println!(
        "  {}x{} pixels, {} mot(s)-clé(s) gelé(s)",
        snapshot.frame.width,
        snapshot.frame.height,
        snapshot.key_phrases.len()
    );
    Ok(())
}

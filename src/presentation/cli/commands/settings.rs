use colored::Colorize;

use crate::application::services::engine::MonitorEngine;
use crate::domain::entities::notification::NotificationTarget;
use crate::domain::ports::store::SettingsStore;

/// Save operator settings: Telegram credentials and the keyword list.
///
/// Omitted credentials keep their stored value; a non-empty keyword list
/// replaces the stored one. Values are stored verbatim, without validation
/// beyond what monitoring start enforces.
///
/// # Errors
///
/// Returns an error when the current settings cannot be read or the new
/// ones cannot be persisted.
pub fn run_settings(
    engine: &MonitorEngine<'_>,
    settings: &dyn SettingsStore,
    bot_token: Option<String>,
    chat_id: Option<String>,
    keywords: Vec<String>,
) -> anyhow::Result<()> {
    let current = settings.load_notification_target()?.unwrap_or_default();
    let target = NotificationTarget::new(
        bot_token.unwrap_or(current.bot_token),
        chat_id.unwrap_or(current.chat_id),
    );
    let phrases = if keywords.is_empty() {
        settings.load_key_phrases()?
    } else {
        keywords
    };

    engine.save_settings(&target, &phrases)?;

    println!("{}", "✔ Réglages enregistrés".green());
    println!(
        "  Telegram  : {}",
        if target.is_configured() {
            "configuré".green()
        } else {
            "incomplet".yellow()
        }
    );
    println!("  Mots-clés : {}", phrases.len());
    Ok(())
}

use colored::Colorize;

use crate::application::services::engine::MonitorEngine;
use crate::domain::value_objects::MonitorState;

/// Print the current monitoring status.
///
/// # Errors
///
/// Returns an error if the status cannot be read or JSON serialization fails.
pub fn run_status(engine: &MonitorEngine<'_>, json: bool) -> anyhow::Result<()> {
    let report = engine.status()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", "guet — Statut de surveillance".bold().cyan());
    println!("{}", "━".repeat(40));

    let state_label = match report.state {
        MonitorState::Idle => "idle (aucune référence)".yellow(),
        MonitorState::Armed => "armed (prêt à démarrer)".blue(),
        MonitorState::Active => "active".green().bold(),
    };
    println!("  État          : {state_label}");

    match report.reference_captured_at {
        Some(at) => println!("  Référence     : capturée le {}", at.to_rfc3339()),
        None => println!("  Référence     : {}", "aucune".yellow()),
    }

    println!(
        "  Intervalle    : {}–{}s (jitter)",
        report.monitoring.interval_min_secs, report.monitoring.interval_max_secs
    );
    println!(
        "  Auto-refresh  : {} (pause {}ms)",
        if report.monitoring.auto_refresh {
            "oui"
        } else {
            "non"
        },
        report.monitoring.refresh_settle_delay_ms
    );

    match report.monitoring.last_check_at {
        Some(at) => println!("  Dernier check : {}", at.to_rfc3339()),
        None => println!("  Dernier check : jamais"),
    }

    println!(
        "  Telegram      : {}",
        if report.notification_configured {
            "configuré".green()
        } else {
            "non configuré".red()
        }
    );

    Ok(())
}

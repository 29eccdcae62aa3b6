use colored::Colorize;

use crate::application::services::engine::{CycleOutcome, MonitorEngine};

/// Run a single check cycle and report how far it got.
///
/// A one-shot probe: it honors the same liveness rules as the scheduled
/// cycle, so it skips when monitoring is inactive.
///
/// # Errors
///
/// Currently never returns an error; cycle failures are reported through
/// the printed outcome.
pub async fn run_check(engine: &MonitorEngine<'_>) -> anyhow::Result<()> {
    let outcome = engine.check_cycle().await;

    match outcome {
        CycleOutcome::Inactive => {
            println!("{}", "Surveillance inactive — contrôle ignoré".yellow());
        }
        CycleOutcome::TargetUnresolved => {
            println!("{}", "Aucune cible résolvable".red());
        }
        CycleOutcome::NoReference => {
            println!("{}", "Aucune référence capturée".red());
        }
        CycleOutcome::CaptureFailed => {
            println!("{}", "Échec de la capture".red());
        }
        CycleOutcome::ComparisonFailed => {
            println!("{}", "Échec de la comparaison".red());
        }
        CycleOutcome::Completed(result) => {
            if result.changed {
                println!(
                    "{} {:.2}%",
                    "⚠ Changement détecté —".red().bold(),
                    result.change_magnitude
                );
                for signal in &result.missing_signals {
                    println!("  • {signal}");
                }
            } else {
                println!(
                    "{} {:.2}%",
                    "✔ Pas de changement —".green(),
                    result.change_magnitude
                );
            }
        }
    }
    Ok(())
}

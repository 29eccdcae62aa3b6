use crate::application::services::engine::{CycleOutcome, MonitorEngine};

/// Arm monitoring and drive the check loop until interrupted.
///
/// One timer is armed at a time, so check cycles never overlap. The delay
/// is redrawn from the configured interval range before every check —
/// deliberate jitter, so repeated checks are not perfectly periodic. The
/// loop runs until it receives SIGINT (Ctrl+C) via
/// [`tokio::signal::ctrl_c()`], at which point monitoring is disarmed and
/// the loop exits; a stop issued from elsewhere is noticed when the next
/// cycle reports itself inactive.
///
/// Errors during individual check cycles are logged but do not stop the loop.
///
/// # Errors
///
/// Returns an error when monitoring cannot be armed (no reference, missing
/// Telegram credentials) or the final disarm cannot be persisted.
pub async fn run_watch(engine: &MonitorEngine<'_>) -> anyhow::Result<()> {
    let mut delay = engine.start_monitoring()?;
    tracing::info!(
        "Surveillance démarrée (premier contrôle dans {}s)",
        delay.as_secs()
    );

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            () = tokio::time::sleep(delay) => {
                let outcome = engine.check_cycle().await;
                match &outcome {
                    CycleOutcome::Inactive => {
                        tracing::info!("Surveillance désarmée, fin de la boucle");
                        break;
                    }
                    CycleOutcome::Completed(result) if result.changed => {
                        tracing::info!("Changement détecté ({:.2}%)", result.change_magnitude);
                    }
                    CycleOutcome::Completed(result) => {
                        tracing::info!("Pas de changement ({:.2}%)", result.change_magnitude);
                    }
                    other => {
                        tracing::warn!("Cycle incomplet : {other:?}");
                    }
                }

                let monitoring = engine.status()?.monitoring;
                delay = engine.draw_check_interval(&monitoring);
                tracing::debug!("Prochain contrôle dans {}s", delay.as_secs());
            }
            _ = &mut shutdown => {
                tracing::info!("Signal d'arrêt reçu, fermeture propre...");
                println!("\nArrêt de guet...");
                engine.stop_monitoring()?;
                break;
            }
        }
    }
    Ok(())
}

use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::models::connection::ConnectionStatus;
use crate::services::whatsapp::WhatsAppClient;

pub const CONNECTED_NOTICE: &str = "WhatsApp connected successfully";

/// Periodically probes the WhatsApp bridge until it reports a connection.
pub struct StatusPoller {
    whatsapp: WhatsAppClient,
    interval: Duration,
}

/// Owns the running poll task. Dropping the handle stops polling; a probe
/// that is in flight at that moment is abandoned.
pub struct PollerHandle {
    status: watch::Receiver<ConnectionStatus>,
    task: JoinHandle<()>,
}

impl StatusPoller {
    pub fn new(whatsapp: WhatsAppClient, interval: Duration) -> Self {
        Self { whatsapp, interval }
    }

    pub fn spawn(self) -> PollerHandle {
        let (tx, rx) = watch::channel(ConnectionStatus::Loading);
        let task = tokio::spawn(self.run(tx));
        PollerHandle { status: rx, task }
    }

    async fn run(self, tx: watch::Sender<ConnectionStatus>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!("Polling WhatsApp status every {:?}", self.interval);
        loop {
            // the first tick completes immediately
            ticker.tick().await;

            let outcome = self.whatsapp.probe().await;
            let previous = *tx.borrow();
            let next = previous.advance(outcome);
            if next != previous {
                tracing::info!("WhatsApp status {:?} -> {:?}", previous, next);
            }
            tx.send_replace(next);

            if next.is_terminal() {
                tracing::info!("✅ {}", CONNECTED_NOTICE);
                break;
            }
        }
    }
}

impl PollerHandle {
    pub fn status(&self) -> ConnectionStatus {
        *self.status.borrow()
    }

    #[cfg(test)]
    pub fn subscribe(&self) -> watch::Receiver<ConnectionStatus> {
        self.status.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub fn stop(&self) {
        self.task.abort();
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

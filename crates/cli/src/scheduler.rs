//! Tokio-backed reset scheduler.
//!
//! Each scheduled ticket gets a sleeping task that sends the ticket back over
//! an unbounded channel when its delay elapses. The task that owns the form
//! flow receives from the channel and applies the reset itself, so the flow
//! never crosses a task boundary.

use std::collections::HashMap;
use std::time::Duration;

use himsols_core::{ResetScheduler, ResetTicket};
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

/// Schedules resets on the current tokio runtime.
///
/// Use one scheduler per flow: tickets are only unique within a flow.
#[derive(Debug)]
pub struct TokioResetScheduler {
    tx: mpsc::UnboundedSender<ResetTicket>,
    tasks: HashMap<ResetTicket, AbortHandle>,
}

impl TokioResetScheduler {
    /// Create a scheduler and the receiver on which due tickets arrive.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ResetTicket>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                tx,
                tasks: HashMap::new(),
            },
            rx,
        )
    }

    /// Number of timers that have not yet fired or been cancelled.
    #[must_use]
    pub fn active(&self) -> usize {
        self.tasks.values().filter(|task| !task.is_finished()).count()
    }
}

impl ResetScheduler for TokioResetScheduler {
    fn schedule(&mut self, ticket: ResetTicket, delay: Duration) {
        self.tasks.retain(|_, task| !task.is_finished());

        let tx = self.tx.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver gone means the page was closed; nothing to reset.
            let _ = tx.send(ticket);
        });
        if let Some(previous) = self.tasks.insert(ticket, task.abort_handle()) {
            previous.abort();
        }
        tracing::debug!(%ticket, ?delay, "reset timer started");
    }

    fn cancel(&mut self, ticket: ResetTicket) {
        if let Some(task) = self.tasks.remove(&ticket) {
            task.abort();
            tracing::debug!(%ticket, "reset timer aborted");
        }
    }
}

impl Drop for TokioResetScheduler {
    fn drop(&mut self) {
        for task in self.tasks.values() {
            task.abort();
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use himsols_core::{FormFlow, FormKind, SequentialRequestIds};

    use super::*;

    fn contact_flow(delay: Duration) -> FormFlow {
        let mut flow = FormFlow::new(FormKind::Contact).with_reset_delay(delay);
        flow.update_field("name", "Asha").unwrap();
        flow.update_field("mobile", "9876543210").unwrap();
        flow.update_field("message", "Hello").unwrap();
        flow
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticket_delivered_after_delay() {
        let (mut scheduler, mut rx) = TokioResetScheduler::new();
        let mut flow = contact_flow(Duration::from_secs(3));
        flow.submit(&SequentialRequestIds::new(), &mut scheduler)
            .unwrap();

        tokio::time::sleep(Duration::from_millis(2_900)).await;
        assert!(rx.try_recv().is_err());
        assert!(flow.is_submitted());

        let ticket = rx.recv().await.unwrap();
        assert!(flow.fire_reset(ticket));
        assert!(flow.form().is_blank());
        assert!(!flow.is_submitted());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_aborts_timer() {
        let (mut scheduler, mut rx) = TokioResetScheduler::new();
        let mut flow = contact_flow(Duration::from_secs(3));
        flow.submit(&SequentialRequestIds::new(), &mut scheduler)
            .unwrap();
        assert_eq!(scheduler.active(), 1);

        flow.cancel_pending_reset(&mut scheduler).unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(rx.try_recv().is_err());
        assert!(flow.is_submitted());
    }
}

//! The validate-then-submit state machine shared by every request form.
//!
//! ```text
//! idle --submit(valid)--> submitted --reset ticket fires (contact)--> idle
//! idle --submit(invalid)--> idle            (error reported, nothing changes)
//! submitted --submit--> submitted           (AlreadySubmitted)
//! any --reset()--> idle                     (pending reset cancelled first)
//! ```
//!
//! Timers live outside the core. A flow that needs to revert later asks the
//! injected [`ResetScheduler`] to deliver a [`ResetTicket`] after a delay; the
//! host hands the ticket back through [`FormFlow::fire_reset`] when it
//! elapses. Only the most recently issued ticket is honoured.

use core::fmt;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::form::{FormError, FormKind, RequestForm};
use crate::request_id::{RequestIdGenerator, SubmissionResult};

/// How long the contact page shows its "message sent" state.
pub const CONTACT_RESET_DELAY: Duration = Duration::from_secs(3);

/// Identifies one scheduled reset of one flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ResetTicket(u64);

impl ResetTicket {
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ResetTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "reset#{}", self.0)
    }
}

/// Delayed-task capability used for the contact auto-reset.
pub trait ResetScheduler {
    /// Arrange for `ticket` to be handed back after `delay`.
    fn schedule(&mut self, ticket: ResetTicket, delay: Duration);

    /// Drop a previously scheduled ticket. Unknown tickets are ignored.
    fn cancel(&mut self, ticket: ResetTicket);
}

/// Scheduler that only records requests; the caller decides when time passes.
///
/// Useful for hosts without a runtime and for tests.
#[derive(Debug, Default)]
pub struct ManualResetScheduler {
    pending: Vec<(ResetTicket, Duration)>,
    cancelled: Vec<ResetTicket>,
}

impl ManualResetScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tickets scheduled and not yet cancelled or taken.
    #[must_use]
    pub fn pending(&self) -> &[(ResetTicket, Duration)] {
        &self.pending
    }

    #[must_use]
    pub fn cancelled(&self) -> &[ResetTicket] {
        &self.cancelled
    }

    /// Remove and return every pending ticket, as if all delays elapsed.
    pub fn take_due(&mut self) -> Vec<ResetTicket> {
        self.pending.drain(..).map(|(ticket, _)| ticket).collect()
    }
}

impl ResetScheduler for ManualResetScheduler {
    fn schedule(&mut self, ticket: ResetTicket, delay: Duration) {
        self.pending.push((ticket, delay));
    }

    fn cancel(&mut self, ticket: ResetTicket) {
        let before = self.pending.len();
        self.pending.retain(|(pending, _)| *pending != ticket);
        if self.pending.len() != before {
            self.cancelled.push(ticket);
        }
    }
}

/// What the page is currently showing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FlowState {
    Idle,
    Submitted { result: SubmissionResult },
}

/// One page's form together with its submission state.
#[derive(Debug, Clone)]
pub struct FormFlow {
    form: RequestForm,
    state: FlowState,
    reset_delay: Duration,
    generation: u64,
    pending_reset: Option<ResetTicket>,
}

impl FormFlow {
    #[must_use]
    pub fn new(kind: FormKind) -> Self {
        Self::with_form(RequestForm::new(kind))
    }

    /// Start from an already populated (e.g. route-prefilled) form.
    #[must_use]
    pub const fn with_form(form: RequestForm) -> Self {
        Self {
            form,
            state: FlowState::Idle,
            reset_delay: CONTACT_RESET_DELAY,
            generation: 0,
            pending_reset: None,
        }
    }

    /// Override the auto-reset delay.
    #[must_use]
    pub fn with_reset_delay(mut self, delay: Duration) -> Self {
        self.reset_delay = delay;
        self
    }

    #[must_use]
    pub const fn kind(&self) -> FormKind {
        self.form.kind()
    }

    #[must_use]
    pub const fn form(&self) -> &RequestForm {
        &self.form
    }

    #[must_use]
    pub const fn state(&self) -> &FlowState {
        &self.state
    }

    #[must_use]
    pub const fn reset_delay(&self) -> Duration {
        self.reset_delay
    }

    #[must_use]
    pub const fn is_submitted(&self) -> bool {
        matches!(self.state, FlowState::Submitted { .. })
    }

    /// Result currently on display, if submitted.
    #[must_use]
    pub const fn submission(&self) -> Option<&SubmissionResult> {
        match &self.state {
            FlowState::Submitted { result } => Some(result),
            FlowState::Idle => None,
        }
    }

    #[must_use]
    pub const fn pending_reset(&self) -> Option<ResetTicket> {
        self.pending_reset
    }

    /// Replace one field's value.
    ///
    /// # Errors
    ///
    /// [`FormError::UnknownField`] if the form has no such field.
    pub fn update_field(&mut self, name: &str, value: impl Into<String>) -> Result<(), FormError> {
        self.form.set(name, value)
    }

    /// Validate and, if everything is present, move to `submitted`.
    ///
    /// Contact forms also schedule their automatic return to idle.
    ///
    /// # Errors
    ///
    /// - [`FormError::AlreadySubmitted`] while a result is on display.
    /// - Any validation failure from [`RequestForm::validate`].
    ///
    /// The form and state are unchanged on error.
    #[instrument(skip_all, fields(kind = %self.kind()))]
    pub fn submit(
        &mut self,
        ids: &dyn RequestIdGenerator,
        scheduler: &mut dyn ResetScheduler,
    ) -> Result<SubmissionResult, FormError> {
        if self.is_submitted() {
            return Err(FormError::AlreadySubmitted);
        }
        if let Err(err) = self.form.validate() {
            debug!(error = %err, "submission rejected");
            return Err(err);
        }

        let kind = self.kind();
        let result = ids.generate(kind.request_prefix());
        self.state = FlowState::Submitted {
            result: result.clone(),
        };

        if kind.auto_resets() {
            let ticket = self.issue_ticket();
            scheduler.schedule(ticket, self.reset_delay);
            self.pending_reset = Some(ticket);
            debug!(%ticket, delay = ?self.reset_delay, "reset scheduled");
        }

        info!(request_id = %result.request_id, "form submitted");
        Ok(result)
    }

    /// Apply a reset whose delay has elapsed.
    ///
    /// Returns `false` without changing anything if `ticket` is not the
    /// currently pending one (cancelled, superseded, or already applied).
    pub fn fire_reset(&mut self, ticket: ResetTicket) -> bool {
        if self.pending_reset != Some(ticket) {
            debug!(%ticket, "ignoring stale reset");
            return false;
        }
        self.pending_reset = None;
        self.return_to_idle();
        debug!(%ticket, kind = %self.kind(), "form reset");
        true
    }

    /// Cancel the pending automatic reset, keeping the submitted state.
    pub fn cancel_pending_reset(
        &mut self,
        scheduler: &mut dyn ResetScheduler,
    ) -> Option<ResetTicket> {
        let ticket = self.pending_reset.take()?;
        scheduler.cancel(ticket);
        debug!(%ticket, "reset cancelled");
        Some(ticket)
    }

    /// Leave the page: cancel any pending reset, clear the form, go idle.
    pub fn reset(&mut self, scheduler: &mut dyn ResetScheduler) {
        self.cancel_pending_reset(scheduler);
        self.return_to_idle();
    }

    fn return_to_idle(&mut self) {
        self.form.clear();
        self.state = FlowState::Idle;
    }

    fn issue_ticket(&mut self) -> ResetTicket {
        self.generation += 1;
        ResetTicket(self.generation)
    }
}

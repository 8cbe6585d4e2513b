//! In-flight bookkeeping shared by every form.
//!
//! A [`Submission`] holds at most one outstanding request, identified by a
//! [`Ticket`].  Completions carrying any other ticket are dropped, so a form
//! that was reset while a call was pending never shows the stale answer.

use std::fmt;

/// Identifier of one request issued by a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Submission<T> {
    issued: u64,
    in_flight: Option<Ticket>,
    result: Option<T>,
    error: Option<String>,
}

impl<T> Default for Submission<T> {
    fn default() -> Self {
        Self {
            issued: 0,
            in_flight: None,
            result: None,
            error: None,
        }
    }
}

impl<T> Submission<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request: clears the previous result and error.
    ///
    /// Returns `None` while another request is still outstanding.
    pub fn begin(&mut self) -> Option<Ticket> {
        if self.in_flight.is_some() {
            return None;
        }
        self.issued += 1;
        let ticket = Ticket(self.issued);
        self.in_flight = Some(ticket);
        self.result = None;
        self.error = None;
        Some(ticket)
    }

    /// Record the outcome of `ticket`.
    ///
    /// Exactly one of result / error is set and the in-flight flag is
    /// cleared.  Returns `false` (and changes nothing) for a stale ticket.
    pub fn complete(&mut self, ticket: Ticket, outcome: Result<T, String>) -> bool {
        if self.in_flight != Some(ticket) {
            log::debug!("submission: dropping stale completion {ticket}");
            return false;
        }
        self.in_flight = None;
        match outcome {
            Ok(value) => {
                self.result = Some(value);
                self.error = None;
            }
            Err(message) => {
                self.result = None;
                self.error = Some(message);
            }
        }
        true
    }

    /// Show an input problem without issuing a request.
    pub fn fail_validation(&mut self, message: impl Into<String>) {
        self.result = None;
        self.error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Drop the shown result and error, keeping any outstanding request.
    pub fn clear_outcome(&mut self) {
        self.result = None;
        self.error = None;
    }

    /// Forget `ticket` if it is the outstanding request; a later completion
    /// for it will be ignored.
    pub fn abandon(&mut self, ticket: Ticket) -> bool {
        if self.in_flight != Some(ticket) {
            return false;
        }
        self.in_flight = None;
        true
    }

    /// Back to the pristine state.  Outstanding tickets become stale.
    pub fn reset(&mut self) {
        self.in_flight = None;
        self.result = None;
        self.error = None;
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn result(&self) -> Option<&T> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

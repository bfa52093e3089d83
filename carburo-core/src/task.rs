//! "Latest request wins" slots for background fetches.
//!
//! Starting a new request through a [`LatestRequest`] cancels the one before it, and
//! every response is tagged with a generation so the caller can drop stale answers.

use std::future::Future;

use tokio_util::sync::CancellationToken;

#[derive(Debug, Default)]
/// Tracks the single in-flight request of one kind.
pub struct LatestRequest {
    generation: u64,
    token: Option<CancellationToken>,
}

#[derive(Debug, Clone)]
/// Handle given to the task performing one request.
pub struct RequestTicket {
    generation: u64,
    token: CancellationToken,
}

impl LatestRequest {
    /// Create an idle slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel whatever is in flight and hand out a ticket for a new request.
    pub fn begin(&mut self) -> RequestTicket {
        self.cancel();
        self.generation = self.generation.wrapping_add(1);
        let token = CancellationToken::new();
        self.token = Some(token.clone());
        RequestTicket {
            generation: self.generation,
            token,
        }
    }

    /// Cancel the in-flight request, if any, and invalidate its generation.
    pub fn cancel(&mut self) {
        if let Some(token) = self.token.take() {
            token.cancel();
            self.generation = self.generation.wrapping_add(1);
        }
    }

    /// Whether a response tagged with `generation` is still wanted.
    #[must_use]
    pub fn is_current(&self, generation: u64) -> bool {
        self.token.is_some() && self.generation == generation
    }

    /// Mark the request with `generation` as done if it is the current one.
    ///
    /// Returns `false` for stale responses, which the caller should discard.
    pub fn finish(&mut self, generation: u64) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.token = None;
        true
    }

    /// Whether a request is in flight.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.token.is_some()
    }
}

impl RequestTicket {
    /// Generation to report back with the response.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[cfg(test)]
    fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Drive `future` to completion unless the request is cancelled first.
    ///
    /// Returns `None` when cancelled.
    pub async fn run<F>(self, future: F) -> Option<F::Output>
    where
        F: Future,
    {
        tokio::select! {
            biased;
            () = self.token.cancelled() => None,
            output = future => Some(output),
        }
    }
}

//! Completion plumbing between worker tasks and the UI thread
//!
//! Workers running on the tokio runtime post their results here; the owning
//! surface drains them once per frame. Every completion carries the
//! [`Ticket`] of the request that produced it.

use crate::session::Ticket;
use crate::{ParleyError, Result};
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;
use tracing::debug;

pub struct CompletionChannel<T> {
    tx: Sender<(Ticket, T)>,
    rx: Receiver<(Ticket, T)>,
}

impl<T> CompletionChannel<T> {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn sender(&self) -> CompletionSender<T> {
        CompletionSender {
            tx: self.tx.clone(),
        }
    }

    /// Take the next completion if one is ready
    pub fn try_recv(&self) -> Option<(Ticket, T)> {
        self.rx.try_recv().ok()
    }

    /// Block until a completion arrives or the timeout passes
    pub fn recv_timeout(&self, timeout: Duration) -> Option<(Ticket, T)> {
        match self.rx.recv_timeout(timeout) {
            Ok(completion) => Some(completion),
            Err(RecvTimeoutError::Timeout) => None,
            // Unreachable while we hold `tx` ourselves
            Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

impl<T> Default for CompletionChannel<T> {
    fn default() -> Self {
        Self::new()
    }
}

pub struct CompletionSender<T> {
    tx: Sender<(Ticket, T)>,
}

impl<T> Clone for CompletionSender<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> CompletionSender<T> {
    pub fn send(&self, ticket: Ticket, value: T) -> Result<()> {
        self.tx.send((ticket, value)).map_err(|_| {
            debug!("Completion dropped: surface is gone");
            ParleyError::ChannelError("Completion receiver dropped".to_string())
        })
    }
}

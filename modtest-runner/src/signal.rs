// Copyright (c) The modtest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shutdown signals observed while outcomes are being collected.
//!
//! A run that receives one of these signals ends without a report: the orchestrator turns the
//! event into [`CancelReason::Signal`](crate::orchestrator::CancelReason::Signal).

use crate::errors::SignalHandlerSetupError;
use std::{
    fmt,
    task::{Context, Poll},
};

/// Which shutdown signals cancel collection.
///
/// Passed to [`RunOrchestrator::run`](crate::orchestrator::RunOrchestrator::run).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum SignalHandlerKind {
    /// Listen for the platform's shutdown signals: SIGINT, SIGTERM and SIGHUP on Unix, Ctrl-C on
    /// Windows.
    Standard,

    /// Listen for nothing. Collection only ends once senders are done or cancel.
    Noop,
}

impl SignalHandlerKind {
    pub(crate) fn build(self) -> Result<SignalHandler, SignalHandlerSetupError> {
        let listeners = match self {
            Self::Standard => imp::listeners()?,
            Self::Noop => Vec::new(),
        };
        Ok(SignalHandler { listeners })
    }
}

/// The set of shutdown signals a run is listening for.
#[derive(Debug)]
pub(crate) struct SignalHandler {
    listeners: Vec<Listener>,
}

impl SignalHandler {
    /// Waits for the next shutdown signal.
    ///
    /// Returns `None` once no listener can produce further events, which is immediate for
    /// [`SignalHandlerKind::Noop`].
    pub(crate) async fn recv(&mut self) -> Option<ShutdownEvent> {
        std::future::poll_fn(|cx| self.poll_recv(cx)).await
    }

    fn poll_recv(&mut self, cx: &mut Context<'_>) -> Poll<Option<ShutdownEvent>> {
        let mut any_open = false;
        for listener in self.listeners.iter_mut().filter(|listener| !listener.closed) {
            match listener.source.poll_recv(cx) {
                Poll::Ready(Some(())) => return Poll::Ready(Some(listener.event)),
                Poll::Ready(None) => listener.closed = true,
                Poll::Pending => any_open = true,
            }
        }

        if any_open {
            Poll::Pending
        } else {
            Poll::Ready(None)
        }
    }
}

#[derive(Debug)]
struct Listener {
    source: imp::Source,
    event: ShutdownEvent,
    closed: bool,
}

impl Listener {
    fn new(source: imp::Source, event: ShutdownEvent) -> Self {
        Self {
            source,
            event,
            closed: false,
        }
    }
}

#[cfg(unix)]
mod imp {
    use super::{Listener, ShutdownEvent};
    use tokio::signal::unix::{SignalKind, signal};

    pub(super) type Source = tokio::signal::unix::Signal;

    pub(super) fn listeners() -> std::io::Result<Vec<Listener>> {
        [
            (SignalKind::interrupt(), ShutdownEvent::Interrupt),
            (SignalKind::hangup(), ShutdownEvent::Hangup),
            (SignalKind::terminate(), ShutdownEvent::Term),
        ]
        .into_iter()
        .map(|(kind, event)| signal(kind).map(|source| Listener::new(source, event)))
        .collect()
    }
}

#[cfg(windows)]
mod imp {
    use super::{Listener, ShutdownEvent};

    pub(super) type Source = tokio::signal::windows::CtrlC;

    pub(super) fn listeners() -> std::io::Result<Vec<Listener>> {
        let ctrl_c = tokio::signal::windows::ctrl_c()?;
        Ok(vec![Listener::new(ctrl_c, ShutdownEvent::Interrupt)])
    }
}

/// A signal that cancels outcome collection.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ShutdownEvent {
    /// SIGHUP: the controlling terminal went away.
    #[cfg(unix)]
    Hangup,

    /// SIGTERM.
    #[cfg(unix)]
    Term,

    /// SIGINT, or Ctrl-C on Windows.
    Interrupt,
}

impl fmt::Display for ShutdownEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            #[cfg(unix)]
            Self::Hangup => write!(f, "SIGHUP"),
            #[cfg(unix)]
            Self::Term => write!(f, "SIGTERM"),
            Self::Interrupt => write!(f, "interrupt"),
        }
    }
}

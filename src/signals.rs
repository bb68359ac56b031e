//! Signal handling for sunphase.
//!
//! SIGINT, SIGTERM and SIGHUP request a graceful shutdown. A background thread
//! turns each signal into a [`SignalMessage`] on a channel, which the main loop
//! also uses as an interruptible sleep between phase checks.

use anyhow::{Context, Result};
use signal_hook::{
    consts::signal::{SIGHUP, SIGINT, SIGTERM},
    iterator::Signals,
};
use std::{
    sync::Arc,
    sync::atomic::{AtomicBool, Ordering},
    sync::mpsc::{self, Receiver, RecvTimeoutError, Sender},
    thread,
    time::Duration,
};

/// Messages delivered to the main loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalMessage {
    /// Shutdown signal (SIGTERM, SIGINT, SIGHUP)
    Shutdown,
}

/// Signal handling state shared between threads
pub struct SignalState {
    /// Atomic flag indicating if the application should keep running
    pub running: Arc<AtomicBool>,
    /// Channel receiver for signal messages
    pub signal_receiver: Receiver<SignalMessage>,
    /// Channel sender, kept so the channel never disconnects while we wait
    pub signal_sender: Sender<SignalMessage>,
}

/// How a wait between phase checks ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The full interval elapsed.
    Elapsed,
    /// A shutdown was requested during the wait.
    Shutdown,
}

impl SignalState {
    /// A signal state with no OS handlers attached.
    ///
    /// Used by `simulate` and by tests, where only [`SignalState::request_shutdown`]
    /// can stop the loop.
    pub fn detached() -> Self {
        let (signal_sender, signal_receiver) = mpsc::channel();
        Self {
            running: Arc::new(AtomicBool::new(true)),
            signal_receiver,
            signal_sender,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Ask the main loop to stop, waking it if it is waiting.
    pub fn request_shutdown(&self) {
        self.running.store(false, Ordering::SeqCst);
        let _ = self.signal_sender.send(SignalMessage::Shutdown);
    }

    /// Block for up to `interval`, returning early if a shutdown arrives.
    pub fn wait(&self, interval: Duration) -> WaitOutcome {
        if !self.is_running() {
            return WaitOutcome::Shutdown;
        }

        match self.signal_receiver.recv_timeout(interval) {
            Ok(SignalMessage::Shutdown) => {
                self.running.store(false, Ordering::SeqCst);
                WaitOutcome::Shutdown
            }
            Err(RecvTimeoutError::Timeout) => WaitOutcome::Elapsed,
            // Unreachable while we hold a sender, but never spin on it
            Err(RecvTimeoutError::Disconnected) => {
                self.running.store(false, Ordering::SeqCst);
                WaitOutcome::Shutdown
            }
        }
    }
}

/// Set up signal handling for the application.
///
/// Spawns a background thread that waits for shutdown signals, clears the
/// running flag and sends [`SignalMessage::Shutdown`] to wake the main loop.
pub fn setup_signal_handler() -> Result<SignalState> {
    let state = SignalState::detached();

    let mut signals =
        Signals::new([SIGINT, SIGTERM, SIGHUP]).context("failed to register signal handlers")?;

    let running = state.running.clone();
    let sender = state.signal_sender.clone();

    thread::spawn(move || {
        for sig in signals.forever() {
            let user_message = match sig {
                SIGINT => "Received interrupt signal, shutting down...",
                SIGTERM => "Received termination request, shutting down...",
                SIGHUP => "Received hangup signal, shutting down...",
                _ => "Received shutdown signal, shutting down...",
            };

            log_pipe!();
            log_info!("{}", user_message);
            log_debug!("Signal number {sig}");

            running.store(false, Ordering::SeqCst);
            if sender.send(SignalMessage::Shutdown).is_err() {
                // Main loop is gone
                break;
            }
        }
    });

    Ok(state)
}

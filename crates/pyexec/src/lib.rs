//! Script execution for PyEditor.
//!
//! A [`ScriptRunner`] takes a complete source listing and starts executing it in the
//! background. Everything the script prints comes back through the returned
//! [`RunHandle`] as a stream of [`RunEvent`]s, which the editor drains from its UI loop.

use anyhow::Result;
use tokio::sync::{mpsc, oneshot};

mod python;

pub use python::PythonRunner;

/// Events produced by a running script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    /// Text to append to the output pane.
    Output(String),
    /// The run is over. No further events follow.
    Finished { success: bool },
}

/// Starts the execution of source listings.
pub trait ScriptRunner: Send + Sync {
    fn run(&self, source: &str) -> Result<RunHandle>;
}

/// Receiving side of a run.
///
/// Dropping the handle cancels the run.
#[derive(Debug)]
pub struct RunHandle {
    events: mpsc::UnboundedReceiver<RunEvent>,
    cancel: Option<oneshot::Sender<()>>,
    finished: bool,
}

/// Producing side of a run, held by the runner's task.
#[derive(Debug)]
pub struct RunSender {
    events: mpsc::UnboundedSender<RunEvent>,
    cancel: oneshot::Receiver<()>,
    cancel_seen: bool,
}

/// Create a connected sender/handle pair.
pub fn channel() -> (RunSender, RunHandle) {
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let (cancel_tx, cancel_rx) = oneshot::channel();
    (
        RunSender {
            events: event_tx,
            cancel: cancel_rx,
            cancel_seen: false,
        },
        RunHandle {
            events: event_rx,
            cancel: Some(cancel_tx),
            finished: false,
        },
    )
}

impl RunHandle {
    /// Next pending event, without waiting.
    ///
    /// If the producer went away without reporting, a single failed
    /// `Finished` is synthesized so the caller always sees the end of the run.
    pub fn try_next(&mut self) -> Option<RunEvent> {
        if self.finished {
            return None;
        }
        match self.events.try_recv() {
            Ok(event) => {
                if matches!(event, RunEvent::Finished { .. }) {
                    self.finished = true;
                }
                Some(event)
            }
            Err(mpsc::error::TryRecvError::Empty) => None,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                self.finished = true;
                Some(RunEvent::Finished { success: false })
            }
        }
    }

    /// Ask the runner to stop the script.
    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl RunSender {
    pub fn output(&self, text: impl Into<String>) {
        let _ = self.events.send(RunEvent::Output(text.into()));
    }

    pub fn finish(self, success: bool) {
        let _ = self.events.send(RunEvent::Finished { success });
    }

    /// Resolves once the handle asked for cancellation or was dropped.
    pub async fn cancelled(&mut self) {
        if !self.cancel_seen {
            let _ = (&mut self.cancel).await;
            self.cancel_seen = true;
        }
    }
}

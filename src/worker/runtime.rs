//! Worker thread runtime.
//!
//! [`WorkerHandle`] spawns a dedicated thread that owns a [`MarketWorker`] and
//! processes messages in order. Responses come back on a second channel and
//! are fed into the event loop as `Event::WorkerResponse`.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};

use crate::domain::error::{MarketError, Result};
use crate::storage::backend::Store;
use crate::worker::handler::MarketWorker;
use crate::worker::{WorkerMessage, WorkerResponse};

const THREAD_NAME: &str = "listagain-worker";

enum Command {
    Handle(WorkerMessage),
    Shutdown,
}

/// Owner side of the worker thread.
pub struct WorkerHandle {
    tx: Sender<Command>,
    rx: Receiver<WorkerResponse>,
    in_flight: usize,
    handle: Option<JoinHandle<()>>,
}

impl WorkerHandle {
    /// Moves `store` onto a new worker thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub fn spawn(store: Box<dyn Store>) -> Result<Self> {
        let (tx, cmd_rx) = unbounded();
        let (resp_tx, rx) = unbounded();

        let handle = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || worker_loop(MarketWorker::new(store), &cmd_rx, &resp_tx))?;

        Ok(Self {
            tx,
            rx,
            in_flight: 0,
            handle: Some(handle),
        })
    }

    /// Queues a message for the worker.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Worker`] if the worker thread has exited.
    pub fn post(&mut self, message: WorkerMessage) -> Result<()> {
        tracing::debug!(message_type = message.kind(), "posting to worker");
        self.tx
            .send(Command::Handle(message))
            .map_err(|_| MarketError::Worker("worker channel disconnected".to_string()))?;
        self.in_flight += 1;
        Ok(())
    }

    /// Number of posted messages not yet answered.
    #[must_use]
    pub const fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Waits up to `timeout` for the next response.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Worker`] if the worker thread has exited.
    pub fn recv_timeout(&mut self, timeout: Duration) -> Result<Option<WorkerResponse>> {
        match self.rx.recv_timeout(timeout) {
            Ok(response) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                Ok(Some(response))
            }
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => {
                Err(MarketError::Worker("worker thread exited".to_string()))
            }
        }
    }

    /// Stops the worker after it finishes queued messages and waits for it.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Worker`] if the worker thread panicked.
    pub fn shutdown(mut self) -> Result<()> {
        let _ = self.tx.send(Command::Shutdown);
        match self.handle.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| MarketError::Worker("worker thread panicked".to_string())),
            None => Ok(()),
        }
    }
}

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        let _ = self.tx.send(Command::Shutdown);
    }
}

fn worker_loop(mut worker: MarketWorker, rx: &Receiver<Command>, tx: &Sender<WorkerResponse>) {
    tracing::debug!("worker thread started");
    for command in rx {
        match command {
            Command::Handle(message) => {
                let response = worker.handle_message(message);
                if tx.send(response).is_err() {
                    tracing::debug!("response channel closed");
                    break;
                }
            }
            Command::Shutdown => break,
        }
    }
    tracing::debug!("worker thread stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::JsonStore;

    #[test]
    fn answers_in_order_and_shuts_down() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path().join("catalog.json")).unwrap();
        let mut worker = WorkerHandle::spawn(Box::new(store)).unwrap();

        worker.post(WorkerMessage::load_categories()).unwrap();
        worker.post(WorkerMessage::load_requests()).unwrap();
        assert_eq!(worker.in_flight(), 2);

        let first = worker.recv_timeout(Duration::from_secs(5)).unwrap();
        let second = worker.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(first, Some(WorkerResponse::CategoriesLoaded { categories: vec![] }));
        assert_eq!(second, Some(WorkerResponse::RequestsLoaded { entries: vec![] }));
        assert_eq!(worker.in_flight(), 0);

        worker.shutdown().unwrap();
    }
}

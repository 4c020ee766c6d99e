//! Dedicated render-command thread.
//!
//! The logic side never touches device resources directly. It posts closures into a FIFO queue
//! consumed by one named thread that owns the state `S`. Two submission disciplines exist:
//! [`RenderWorker::post_task`] returns immediately, while [`RenderWorker::wait_synchronize`] and
//! [`RenderWorker::post_and_wait`] block until the queue has drained up to that point.
//!
//! There is no timeout and no cancellation. A queued task always runs.

use std::sync::mpsc;
use std::thread::JoinHandle;

use crate::foundation::error::{FramepaceError, FramepaceResult};

type Task<S> = Box<dyn FnOnce(&mut S) + Send + 'static>;

enum Message<S> {
    Run(Task<S>),
    Fence(mpsc::SyncSender<()>),
}

/// Owner of a render thread and the state it exclusively holds.
pub struct RenderWorker<S: 'static> {
    name: String,
    tx: Option<mpsc::Sender<Message<S>>>,
    handle: Option<JoinHandle<()>>,
}

impl<S: 'static> RenderWorker<S> {
    /// Spawn the thread and build its state there.
    ///
    /// Blocks until `init` has finished. An `init` error is returned to the caller and the
    /// thread is joined.
    pub fn spawn<F>(name: impl Into<String>, init: F) -> FramepaceResult<Self>
    where
        F: FnOnce() -> FramepaceResult<S> + Send + 'static,
    {
        let name = name.into();
        let (tx, rx) = mpsc::channel::<Message<S>>();
        let (ready_tx, ready_rx) = mpsc::sync_channel::<FramepaceResult<()>>(1);

        let handle = std::thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                let mut state = match init() {
                    Ok(state) => {
                        let _ = ready_tx.send(Ok(()));
                        state
                    }
                    Err(err) => {
                        let _ = ready_tx.send(Err(err));
                        return;
                    }
                };
                drop(ready_tx);
                run_queue(&mut state, rx);
            })
            .map_err(|e| FramepaceError::worker(format!("spawn '{name}': {e}")))?;

        match ready_rx.recv() {
            Ok(Ok(())) => {
                tracing::debug!(thread = %name, "render worker started");
                Ok(Self {
                    name,
                    tx: Some(tx),
                    handle: Some(handle),
                })
            }
            Ok(Err(err)) => {
                let _ = handle.join();
                Err(err)
            }
            Err(_) => {
                let _ = handle.join();
                Err(FramepaceError::worker(format!(
                    "'{name}' exited before finishing startup"
                )))
            }
        }
    }

    /// Queue `task` behind everything already posted. Does not wait.
    pub fn post_task<F>(&self, task: F) -> FramepaceResult<()>
    where
        F: FnOnce(&mut S) + Send + 'static,
    {
        self.send(Message::Run(Box::new(task)))
    }

    /// Block until every task posted so far has run.
    pub fn wait_synchronize(&self) -> FramepaceResult<()> {
        let (done_tx, done_rx) = mpsc::sync_channel(1);
        self.send(Message::Fence(done_tx))?;
        done_rx.recv().map_err(|_| {
            FramepaceError::worker(format!("'{}' stopped before reaching the fence", self.name))
        })
    }

    /// Queue `task` and block until it has run, returning its value.
    pub fn post_and_wait<R, F>(&self, task: F) -> FramepaceResult<R>
    where
        R: Send + 'static,
        F: FnOnce(&mut S) -> R + Send + 'static,
    {
        let (out_tx, out_rx) = mpsc::sync_channel(1);
        self.post_task(move |state| {
            let _ = out_tx.send(task(state));
        })?;
        out_rx.recv().map_err(|_| {
            FramepaceError::worker(format!("'{}' dropped a task result", self.name))
        })
    }

    /// Thread name.
    pub fn name(&self) -> &str {
        &self.name
    }

    fn send(&self, msg: Message<S>) -> FramepaceResult<()> {
        let tx = self
            .tx
            .as_ref()
            .ok_or_else(|| FramepaceError::worker(format!("'{}' is shut down", self.name)))?;
        tx.send(msg).map_err(|_| {
            tracing::error!(thread = %self.name, "render thread is gone");
            FramepaceError::worker(format!("'{}' is not accepting tasks", self.name))
        })
    }
}

impl<S: 'static> Drop for RenderWorker<S> {
    fn drop(&mut self) {
        // Closing the channel lets the queue drain and the thread exit.
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!(thread = %self.name, "render thread panicked");
            }
        }
    }
}

impl<S: 'static> std::fmt::Debug for RenderWorker<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderWorker")
            .field("name", &self.name)
            .field("running", &self.tx.is_some())
            .finish()
    }
}

fn run_queue<S>(state: &mut S, rx: mpsc::Receiver<Message<S>>) {
    while let Ok(msg) = rx.recv() {
        match msg {
            Message::Run(task) => task(state),
            Message::Fence(done) => {
                let _ = done.send(());
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/worker.rs"]
mod tests;

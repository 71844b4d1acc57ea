//! A single serial execution context for result delivery.
//!
//! Work posted from any thread is queued and executed one job at a time by
//! whoever drives the [`MainLoop`], so callbacks never run concurrently with
//! each other and run in the order they were posted.

use tokio::sync::mpsc;

type Job = Box<dyn FnOnce() + Send>;

/// Posting side of the main context. Cheap to clone.
#[derive(Clone)]
pub struct MainContext {
    tx: mpsc::UnboundedSender<Job>,
}

impl MainContext {
    /// Queues `job` for execution. Returns `false` if the loop is gone.
    pub fn post(&self, job: impl FnOnce() + Send + 'static) -> bool {
        self.tx.send(Box::new(job)).is_ok()
    }
}

/// Executing side of the main context.
pub struct MainLoop {
    rx: mpsc::UnboundedReceiver<Job>,
}

impl MainLoop {
    /// Runs jobs until every [`MainContext`] has been dropped.
    pub async fn run(&mut self) {
        while self.run_next().await {}
    }

    /// Waits for the next job and runs it. Returns `false` once the context is closed.
    pub async fn run_next(&mut self) -> bool {
        match self.rx.recv().await {
            Some(job) => {
                job();
                true
            }
            None => false,
        }
    }

    /// Runs every job that is already queued without waiting. Returns how many ran.
    pub fn run_until_idle(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(job) = self.rx.try_recv() {
            job();
            ran += 1;
        }
        ran
    }
}

pub fn main_context() -> (MainContext, MainLoop) {
    let (tx, rx) = mpsc::unbounded_channel();
    (MainContext { tx }, MainLoop { rx })
}

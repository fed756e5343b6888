use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Instant;

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::error::AppError;

/// A unit of deferred work. The label only shows up in logs.
pub struct Task {
    label: String,
    work: BoxFuture<'static, Result<(), AppError>>,
}

/// Handle used by request handlers to hand work to the [`Worker`].
#[derive(Clone)]
pub struct TaskQueue {
    sender: mpsc::UnboundedSender<Task>,
}

impl TaskQueue {
    /// Queues `work` and returns immediately. Tasks start in the order they
    /// were scheduled.
    pub fn schedule<F>(&self, label: impl Into<String>, work: F)
    where
        F: Future<Output = Result<(), AppError>> + Send + 'static,
    {
        let task = Task {
            label: label.into(),
            work: work.boxed(),
        };
        if let Err(mpsc::error::SendError(task)) = self.sender.send(task) {
            warn!(task = %task.label, "Worker is gone, dropping task");
        }
    }
}

/// Runs queued tasks, at most `concurrency` at a time.
pub struct Worker {
    receiver: mpsc::UnboundedReceiver<Task>,
    concurrency: usize,
}

pub fn channel(concurrency: usize) -> (TaskQueue, Worker) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (
        TaskQueue { sender },
        Worker {
            receiver,
            concurrency: concurrency.max(1),
        },
    )
}

impl Worker {
    /// Processes tasks until every [`TaskQueue`] handle is dropped, then waits
    /// for the ones still running.
    pub async fn run(mut self) {
        info!(concurrency = self.concurrency, "Worker started");
        let mut running = JoinSet::new();

        loop {
            tokio::select! {
                Some(joined) = running.join_next(), if !running.is_empty() => {
                    if let Err(e) = joined {
                        error!(error = %e, "Task could not be joined");
                    }
                }
                next = self.receiver.recv(), if running.len() < self.concurrency => {
                    match next {
                        Some(task) => {
                            running.spawn(execute(task));
                        }
                        None => break,
                    }
                }
            }
        }

        while let Some(joined) = running.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "Task could not be joined");
            }
        }
        info!("Worker stopped");
    }
}

async fn execute(task: Task) {
    let Task { label, work } = task;
    let started = Instant::now();

    match AssertUnwindSafe(work).catch_unwind().await {
        Ok(Ok(())) => info!(task = %label, took = ?started.elapsed(), "Task completed"),
        Ok(Err(e)) => error!(task = %label, error = %e, "Task failed"),
        Err(_) => error!(task = %label, "Task panicked"),
    }
}

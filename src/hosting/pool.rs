use crate::actions::*;
use crate::*;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::sync::mpsc::Receiver;
use tokio::sync::mpsc::Sender;

/// One inbound intent waiting for a worker.
pub type Job = (ChatId, Inbound);

/// Fixed set of workers draining one bounded queue of inbound intents.
/// When the queue is full, producers wait.
pub struct Pool;

impl Pool {
    /// Spawns `workers` tasks and returns the queue that feeds them.
    /// Workers exit once every sender is dropped and the queue drains.
    pub fn spawn(handler: Arc<Handler>, workers: usize, capacity: usize) -> Sender<Job> {
        let (tx, rx) = tokio::sync::mpsc::channel::<Job>(capacity.max(1));
        let rx = Arc::new(Mutex::new(rx));
        for id in 0..workers.max(1) {
            tokio::spawn(Self::work(id, handler.clone(), rx.clone()));
        }
        log::info!("[pool] {} workers, queue of {}", workers.max(1), capacity.max(1));
        tx
    }
    async fn work(id: usize, handler: Arc<Handler>, rx: Arc<Mutex<Receiver<Job>>>) {
        loop {
            let job = rx.lock().await.recv().await;
            match job {
                Some((chat, inbound)) => handler.handle(chat, inbound).await,
                None => break,
            }
        }
        log::debug!("[pool] worker {} done", id);
    }
}

use super::*;
use crate::actions::*;
use crate::engine::*;
use crate::notify::*;
use crate::state::*;
use std::sync::Arc;
use tokio::sync::mpsc::Sender;

/// Owns the game context and wires the engine, the handler and the
/// courier to one notifier.
pub struct Casino {
    context: Context,
    courier: Courier,
    config: Config,
    seed: Option<u64>,
}

impl Casino {
    pub fn new(notifier: Arc<dyn Notifier>, config: Config, seed: Option<u64>) -> Self {
        let context = Context::default();
        let courier = Courier::new(notifier, context.clone(), &config);
        Self {
            context,
            courier,
            config,
            seed,
        }
    }
    pub fn context(&self) -> &Context {
        &self.context
    }
    pub fn handler(&self) -> Handler {
        Handler::new(self.context.clone(), self.courier.clone(), self.config)
    }
    pub fn engine(&self) -> Engine {
        Engine::new(
            self.context.clone(),
            self.courier.clone(),
            self.config,
            self.seed,
        )
    }
    /// Spawns the round engine and the worker pool.
    /// Returns the queue inbound intents are submitted to.
    pub fn open(&self, workers: usize, capacity: usize) -> Sender<Job> {
        tokio::spawn(self.engine().run());
        log::info!("[casino] round engine started");
        Pool::spawn(Arc::new(self.handler()), workers, capacity)
    }
}

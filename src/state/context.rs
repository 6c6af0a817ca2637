use super::*;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::sync::RwLockReadGuard;
use tokio::sync::RwLockWriteGuard;

/// Sessions and the round, always locked together.
#[derive(Debug, Default)]
pub struct State {
    pub sessions: Sessions,
    pub round: Round,
}

/// Shared handle to the game state.
///
/// Built once per process (or per test) and cloned into the engine, the
/// action handler and the courier. Mutations take the write lock;
/// read-only reporting may take the read lock. Never hold either guard
/// across a delivery.
#[derive(Debug, Clone, Default)]
pub struct Context(Arc<RwLock<State>>);

impl Context {
    pub fn new(state: State) -> Self {
        Self(Arc::new(RwLock::new(state)))
    }
    pub async fn read(&self) -> RwLockReadGuard<'_, State> {
        self.0.read().await
    }
    pub async fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.0.write().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[tokio::test]
    async fn clones_share_state() {
        let context = Context::default();
        let clone = context.clone();
        clone.write().await.sessions.entry(5).stake(10);
        assert_eq!(context.read().await.sessions.staked(), 10);
    }
}

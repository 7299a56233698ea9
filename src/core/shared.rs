//! State shared between the [`Client`](crate::Client) handle and its
//! connection actor.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::codec::Codec;
use crate::core::registry::Registry;
use crate::core::state::StateCell;
use crate::error::ClientError;
use crate::events::Bus;
use crate::transport::{LinkId, Transport};

pub(crate) struct Shared {
    pub(crate) state: StateCell,
    pub(crate) bus: Bus,
    pub(crate) registry: Arc<Registry>,
    pub(crate) codec: Arc<dyn Codec>,
    pub(crate) transport: Arc<dyn Transport>,
    link: Mutex<Option<LinkId>>,
    terminal: Mutex<Option<ClientError>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Shared {
    pub(crate) fn new(bus: Bus, codec: Arc<dyn Codec>, transport: Arc<dyn Transport>) -> Self {
        Self {
            state: StateCell::new(bus.clone()),
            bus,
            registry: Arc::new(Registry::new()),
            codec,
            transport,
            link: Mutex::new(None),
            terminal: Mutex::new(None),
        }
    }

    pub(crate) fn set_link(&self, id: LinkId) {
        *lock(&self.link) = Some(id);
    }

    pub(crate) fn current_link(&self) -> Option<LinkId> {
        *lock(&self.link)
    }

    /// Closes the current link, if any. Safe to call repeatedly.
    pub(crate) async fn release_link(&self) {
        let id = lock(&self.link).take();
        if let Some(id) = id {
            tracing::debug!(link = %id, "releasing link");
            self.transport.close(id).await;
        }
    }

    pub(crate) fn set_terminal(&self, err: ClientError) {
        *lock(&self.terminal) = Some(err);
    }

    pub(crate) fn take_terminal(&self) -> Option<ClientError> {
        lock(&self.terminal).take()
    }
}

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use dashmap::{mapref::entry::Entry, DashMap};
use log::trace;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::bus::{Address, Bus, BusError, BusHandler};

/// an in-process bus. every [`LoopbackEndpoint`] created from the same bus can reach the others,
/// and handlers run on the thread of whichever endpoint addressed them.
#[derive(Clone)]
pub struct LoopbackBus {
    listeners: Arc<DashMap<Address, Listener>>,
    next_endpoint_id: Arc<AtomicUsize>,
    loss_rate: f64,
}

struct Listener {
    owner: usize,
    handler: Arc<dyn BusHandler>,
}

impl LoopbackBus {
    pub fn new() -> Self {
        Self::with_loss_rate(0.0)
    }

    /// cuts each transfer short with probability `loss_rate`, silently dropping its tail.
    /// rates outside `0.0..=1.0` are clamped and NaN means no loss.
    pub fn with_loss_rate(loss_rate: f64) -> Self {
        let loss_rate = if loss_rate.is_nan() {
            0.0
        } else {
            loss_rate.clamp(0.0, 1.0)
        };
        Self {
            listeners: Arc::new(DashMap::new()),
            next_endpoint_id: Arc::new(AtomicUsize::new(0)),
            loss_rate,
        }
    }

    pub fn endpoint(&self) -> LoopbackEndpoint {
        self.endpoint_with_rng(StdRng::from_entropy())
    }

    pub fn seeded_endpoint(&self, seed: u64) -> LoopbackEndpoint {
        self.endpoint_with_rng(StdRng::seed_from_u64(seed))
    }

    fn endpoint_with_rng(&self, rng: StdRng) -> LoopbackEndpoint {
        LoopbackEndpoint {
            id: self.next_endpoint_id.fetch_add(1, Ordering::Relaxed),
            bus: self.clone(),
            listening: None,
            rng,
        }
    }

    fn handler_at(&self, address: Address) -> Option<Arc<dyn BusHandler>> {
        // the map guard is released before the handler runs, handlers may use the bus themselves.
        self.listeners
            .get(&address)
            .map(|listener| Arc::clone(&listener.handler))
    }
}

impl Default for LoopbackBus {
    fn default() -> Self {
        Self::new()
    }
}

pub struct LoopbackEndpoint {
    id: usize,
    bus: LoopbackBus,
    listening: Option<Address>,
    rng: StdRng,
}

impl LoopbackEndpoint {
    fn lose_tail(&mut self, bytes: &mut Vec<u8>) {
        if bytes.is_empty() || !self.rng.gen_bool(self.bus.loss_rate) {
            return;
        }
        let kept = self.rng.gen_range(0..bytes.len());
        trace!("loopback dropped {} of {} bytes", bytes.len() - kept, bytes.len());
        bytes.truncate(kept);
    }
}

impl Bus for LoopbackEndpoint {
    fn request_from(&mut self, address: Address, len: usize) -> Vec<u8> {
        let Some(handler) = self.bus.handler_at(address) else {
            return Vec::new();
        };
        let mut reply = handler.on_request(len);
        reply.truncate(len);
        self.lose_tail(&mut reply);
        reply
    }

    fn transmit(&mut self, address: Address, bytes: &[u8]) -> Result<(), BusError> {
        let handler = self
            .bus
            .handler_at(address)
            .ok_or(BusError::NoListener(address))?;
        let mut bytes = bytes.to_vec();
        self.lose_tail(&mut bytes);
        handler.on_receive(&bytes);
        Ok(())
    }

    fn listen(&mut self, address: Address, handler: Arc<dyn BusHandler>) -> Result<(), BusError> {
        if self.listening.is_some_and(|current| current != address) {
            self.release();
        }
        match self.bus.listeners.entry(address) {
            Entry::Occupied(mut entry) => {
                if entry.get().owner != self.id {
                    return Err(BusError::AddressInUse(address));
                }
                entry.get_mut().handler = handler;
            }
            Entry::Vacant(entry) => {
                entry.insert(Listener {
                    owner: self.id,
                    handler,
                });
            }
        }
        self.listening = Some(address);
        Ok(())
    }

    fn release(&mut self) {
        if let Some(address) = self.listening.take() {
            self.bus
                .listeners
                .remove_if(&address, |_, listener| listener.owner == self.id);
        }
    }
}

impl Drop for LoopbackEndpoint {
    fn drop(&mut self) {
        self.release();
    }
}

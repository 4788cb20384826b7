//! Per-item decode state.
//!
//! Each item key owns one slot. Requesting a new source for a key bumps the
//! slot's generation and forgets whatever was decoded before; completions
//! carrying an older generation are dropped.
//!
//! ```text
//! request(k, a) ──► Pending(g1) ──complete(g1)──► Ready
//!                        │
//! request(k, b) ──► Pending(g2)      complete(g1) ──► ignored
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use image::DynamicImage;
use tracing::debug;

use crate::error::LabelError;

#[derive(Debug, Clone)]
pub enum SlotState {
    Pending,
    Ready(Arc<DynamicImage>),
    Failed(String),
}

/// A decode that must be run and handed back to [`ImageSlots::complete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub key: String,
    pub source: String,
    pub generation: u64,
}

#[derive(Debug, Clone)]
struct Slot {
    source: String,
    generation: u64,
    state: SlotState,
}

#[derive(Debug, Clone, Default)]
pub struct ImageSlots {
    slots: HashMap<String, Slot>,
    /// Shared across keys so a removed and re-added key never reuses one
    last_generation: u64,
}

impl ImageSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for `source` to be decoded for item `key`.
    ///
    /// Returns a ticket when a decode has to be started. Returns `None` when
    /// the slot already holds this source, decoded, failed or in flight.
    pub fn request(&mut self, key: &str, source: &str) -> Option<Ticket> {
        if let Some(slot) = self.slots.get(key) {
            if slot.source == source {
                return None;
            }
        }

        self.last_generation += 1;
        let generation = self.last_generation;
        self.slots.insert(
            key.to_string(),
            Slot {
                source: source.to_string(),
                generation,
                state: SlotState::Pending,
            },
        );
        Some(Ticket {
            key: key.to_string(),
            source: source.to_string(),
            generation,
        })
    }

    /// Store the result of a decode.
    ///
    /// Returns `false` and drops the result when the slot has moved on to
    /// another generation or is no longer pending.
    pub fn complete(&mut self, ticket: &Ticket, result: Result<DynamicImage, LabelError>) -> bool {
        let Some(slot) = self.slots.get_mut(&ticket.key) else {
            debug!(key = %ticket.key, "Dropping decode for removed item");
            return false;
        };
        if slot.generation != ticket.generation || !matches!(slot.state, SlotState::Pending) {
            debug!(
                key = %ticket.key,
                stale = ticket.generation,
                current = slot.generation,
                "Dropping stale decode"
            );
            return false;
        }

        slot.state = match result {
            Ok(image) => SlotState::Ready(Arc::new(image)),
            Err(e) => SlotState::Failed(e.to_string()),
        };
        true
    }

    /// State of `key`'s slot, provided it is for `source`.
    pub fn state_for(&self, key: &str, source: &str) -> Option<&SlotState> {
        self.slots
            .get(key)
            .filter(|slot| slot.source == source)
            .map(|slot| &slot.state)
    }

    pub fn generation(&self, key: &str) -> Option<u64> {
        self.slots.get(key).map(|slot| slot.generation)
    }

    /// Forget `key`. In-flight decodes for it will be dropped.
    pub fn forget(&mut self, key: &str) -> bool {
        self.slots.remove(key).is_some()
    }

    /// Keep only the slots whose key passes `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.slots.retain(|key, _| keep(key));
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

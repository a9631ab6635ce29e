//! # Emberfell Event System
//!
//! One-way notifications from the simulation to its collaborators.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐      ┌─────────────┐      ┌──────────────┐
//! │ Simulation  │─────>│   Event     │─────>│ Render/Audio │
//! │  (tick)     │      │   Channel   │      └──────────────┘
//! └─────────────┘      └─────┬───────┘      ┌──────────────┐
//!                            └─────────────>│  Game State  │
//!                                           │ (quest, inv) │
//!                                           └──────────────┘
//! ```
//!
//! The simulation never waits on a consumer. A full channel drops the event
//! and logs a warning.

use crate::content::{ItemId, ParticlesId, PrefabId, SoundId, VillagerId};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use emberfell_core::Entity;

/// Quest progress signal kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuestSignal {
    /// A regular enemy was defeated.
    Defeat,
    /// A boss was defeated.
    DefeatBoss,
}

/// Events emitted by the simulation.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    // =========================================================================
    // Presentation
    // =========================================================================
    /// Play a sound once.
    PlaySound {
        /// Sound asset.
        sound: SoundId,
    },

    /// Spawn a particle effect.
    SpawnParticles {
        /// Particle asset.
        particles: ParticlesId,
        /// World x.
        x: i32,
        /// World y.
        y: i32,
    },

    /// Freeze the presentation for a number of frames.
    Hitstop {
        /// Frames to freeze.
        frames: i32,
    },

    /// The proximity hint near the player changed.
    HintChanged {
        /// New hint text, `None` when no hint is in range.
        text: Option<String>,
    },

    // =========================================================================
    // Interactions
    // =========================================================================
    /// The player talked to an entity.
    Dialog {
        /// Entity talked to.
        entity: Entity,
        /// Villager record, if the entity is a villager.
        villager: Option<VillagerId>,
    },

    /// The player opened a crafting station.
    CraftingOpened {
        /// Station entity.
        entity: Entity,
    },

    /// The player opened a chest.
    ChestOpened {
        /// Chest entity.
        entity: Entity,
    },

    /// The player opened a shop.
    ShopOpened {
        /// Shopkeeper entity.
        entity: Entity,
    },

    // =========================================================================
    // Game state
    // =========================================================================
    /// Quest progress.
    Quest {
        /// Signal kind.
        kind: QuestSignal,
        /// Entity involved.
        entity: Entity,
        /// Prefab of the entity, if known.
        prefab: Option<PrefabId>,
    },

    /// The player's hp reached zero.
    PlayerDefeated,

    /// Gold was picked up.
    GoldCollected {
        /// Amount.
        amount: i32,
    },

    /// An item was picked up.
    ItemCollected {
        /// Item.
        item: ItemId,
        /// Quantity.
        quantity: i32,
    },

    /// An actor gained a level.
    LevelUp {
        /// Actor.
        entity: Entity,
        /// New level.
        level: i32,
    },
}

/// Event bus carrying [`GameEvent`]s out of the simulation.
///
/// Pre-allocates the channel with bounded capacity so a stalled consumer
/// can't grow memory.
pub struct EventBus {
    sender: Sender<GameEvent>,
    receiver: Receiver<GameEvent>,
}

impl EventBus {
    /// Creates a new event bus.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum events in flight before new ones are dropped.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self { sender, receiver }
    }

    /// Creates a sender handle.
    #[must_use]
    pub fn sender(&self) -> EventSender {
        EventSender {
            sender: self.sender.clone(),
        }
    }

    /// Creates a receiver handle.
    #[must_use]
    pub fn receiver(&self) -> EventReceiver {
        EventReceiver {
            receiver: self.receiver.clone(),
        }
    }

    /// Creates a connected sender and receiver.
    #[must_use]
    pub fn create_pair(capacity: usize) -> (EventSender, EventReceiver) {
        let bus = Self::new(capacity);
        (bus.sender(), bus.receiver())
    }
}

/// Handle for sending events.
#[derive(Clone)]
pub struct EventSender {
    sender: Sender<GameEvent>,
}

impl EventSender {
    /// Sends an event without blocking.
    ///
    /// Returns `false` if the event was dropped.
    #[inline]
    pub fn send(&self, event: GameEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                tracing::warn!("event channel full, dropping {event:?}");
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Handle for receiving events.
#[derive(Clone)]
pub struct EventReceiver {
    receiver: Receiver<GameEvent>,
}

impl EventReceiver {
    /// Receives all pending events without blocking.
    #[inline]
    pub fn drain(&self) -> Vec<GameEvent> {
        self.receiver.try_iter().collect()
    }

    /// Receives one event without blocking.
    #[inline]
    pub fn try_recv(&self) -> Option<GameEvent> {
        self.receiver.try_recv().ok()
    }

    /// Returns the number of pending events.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Checks if there are pending events.
    #[inline]
    #[must_use]
    pub fn has_events(&self) -> bool {
        !self.receiver.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_send_receive() {
        let bus = EventBus::new(100);
        let sender = bus.sender();
        let receiver = bus.receiver();

        assert!(sender.send(GameEvent::GoldCollected { amount: 3 }));
        assert!(receiver.has_events());

        let received = receiver.try_recv().unwrap();
        assert_eq!(received, GameEvent::GoldCollected { amount: 3 });
        assert!(receiver.try_recv().is_none());
    }

    #[test]
    fn test_event_drain() {
        let (sender, receiver) = EventBus::create_pair(100);

        for frames in 0..10 {
            let _ = sender.send(GameEvent::Hitstop { frames });
        }

        assert_eq!(receiver.pending_count(), 10);
        let events = receiver.drain();
        assert_eq!(events.len(), 10);
        assert_eq!(events[9], GameEvent::Hitstop { frames: 9 });
        assert!(!receiver.has_events());
    }

    #[test]
    fn test_full_channel_drops() {
        let (sender, receiver) = EventBus::create_pair(2);
        assert!(sender.send(GameEvent::PlayerDefeated));
        assert!(sender.send(GameEvent::PlayerDefeated));
        assert!(!sender.send(GameEvent::Hitstop { frames: 1 }));
        assert_eq!(receiver.drain().len(), 2);
    }
}

//! Mutually exclusive entity states.
//!
//! ```text
//!            ┌──────── attack intent ───────┐
//!            v                              │
//!   Ready ──────> Attack ── duration ──> Ready
//!     │  ^          │ roll intent
//!     │  │          v
//!     │  └────── Rolling
//!     │  ^
//!     └──┼──────> Hurt   (hit, non-lethal)
//!        └─────── Alert  (enemy spots the player)
//! ```
//!
//! Each non-ready state is its own component. An entity holds at most one;
//! [`Simulation::change_state`] is the only place that attaches them.

use super::components::{
    AlertState, AnimState, AttackState, HurtState, Location, RollingState, StateParams,
};
use super::Simulation;
use emberfell_core::Entity;

/// Current state of an entity, derived from which state component it holds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EntityState {
    /// Free to act on intents
    #[default]
    Ready,
    /// Swinging an attack
    Attack,
    /// Reeling from a hit
    Hurt,
    /// Dodge rolling
    Rolling,
    /// Reacting to the player
    Alert,
}

impl Simulation {
    /// State of an entity. Entities without a state component are ready.
    #[must_use]
    pub fn state(&self, e: Entity) -> EntityState {
        let world = &self.world;
        if world.has::<AttackState>(e) {
            EntityState::Attack
        } else if world.has::<HurtState>(e) {
            EntityState::Hurt
        } else if world.has::<RollingState>(e) {
            EntityState::Rolling
        } else if world.has::<AlertState>(e) {
            EntityState::Alert
        } else {
            EntityState::Ready
        }
    }

    /// Leaves the current state and enters `state`.
    ///
    /// The new state component starts at time 0. Hurt and rolling copy
    /// their tuning from [`StateParams`] when the entity has it.
    pub fn change_state(&mut self, e: Entity, state: EntityState) {
        let world = &mut self.world;
        world.detach::<AttackState>(e);
        world.detach::<HurtState>(e);
        world.detach::<RollingState>(e);
        world.detach::<AlertState>(e);

        let params = world.get::<StateParams>(e).copied();
        match state {
            EntityState::Ready => self.set_anim_state(e, AnimState::Idle),
            EntityState::Attack => {
                self.set_anim_state(e, AnimState::Attack);
                self.world.insert(e, AttackState::default());
            }
            EntityState::Hurt => {
                self.set_anim_state(e, AnimState::Hurt);
                self.world.insert(
                    e,
                    HurtState {
                        time: 0,
                        duration: params.map_or(0, |p| p.hurt_duration),
                    },
                );
            }
            EntityState::Rolling => {
                self.set_anim_state(e, AnimState::Roll);
                self.world.insert(
                    e,
                    RollingState {
                        duration: params.map_or(0, |p| p.roll_duration),
                        speed: params.map_or(0, |p| p.roll_speed),
                        ..RollingState::default()
                    },
                );
                if let Some(at) = self.world.get::<Location>(e).map(Location::point) {
                    self.spawn_particles(self.builtins.particles_roll, at);
                }
            }
            EntityState::Alert => {
                self.set_anim_state(e, AnimState::Alert);
                self.world.insert(e, AlertState::default());
            }
        }
    }
}

//! Player input for one tick.
//!
//! Key binding is the host's job. The host maps devices onto
//! [`InputButton`]s and a move axis, then hands the state to
//! [`Simulation::tick`](crate::sim::Simulation::tick).

use emberfell_shared::Vec2;

/// Logical gameplay button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputButton {
    /// Basic attack.
    Attack,
    /// Weapon skill 1.
    Skill1,
    /// Weapon skill 2.
    Skill2,
    /// Weapon skill 3.
    Skill3,
    /// Interact with the nearby partner.
    Interact,
    /// Dodge roll.
    Roll,
}

/// Input state for the current tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputState {
    /// Move axis, each component in `[-1, 1]`. +y is down.
    pub axis: Vec2,
    /// Buttons pressed this tick.
    buttons_pressed: u8,
    /// Buttons currently held.
    buttons_down: u8,
}

impl InputState {
    /// Creates a new empty input state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Begins a new tick, clearing per-tick presses.
    pub fn begin_frame(&mut self) {
        self.buttons_pressed = 0;
    }

    /// Sets the move axis.
    pub fn set_axis(&mut self, x: f32, y: f32) {
        self.axis = Vec2::new(x, y);
    }

    /// Records a button press.
    pub fn button_down(&mut self, button: InputButton) {
        let mask = Self::button_mask(button);
        if self.buttons_down & mask == 0 {
            self.buttons_pressed |= mask;
        }
        self.buttons_down |= mask;
    }

    /// Records a button release.
    pub fn button_up(&mut self, button: InputButton) {
        self.buttons_down &= !Self::button_mask(button);
    }

    /// Returns true if the button was pressed this tick.
    #[must_use]
    pub fn pressed(&self, button: InputButton) -> bool {
        (self.buttons_pressed & Self::button_mask(button)) != 0
    }

    /// Returns true if the button is currently held.
    #[must_use]
    pub fn held(&self, button: InputButton) -> bool {
        (self.buttons_down & Self::button_mask(button)) != 0
    }

    /// Convenience for scripted input: a single fresh press.
    #[must_use]
    pub fn with_press(button: InputButton) -> Self {
        let mut input = Self::new();
        input.button_down(button);
        input
    }

    const fn button_mask(button: InputButton) -> u8 {
        match button {
            InputButton::Attack => 1,
            InputButton::Skill1 => 2,
            InputButton::Skill2 => 4,
            InputButton::Skill3 => 8,
            InputButton::Interact => 16,
            InputButton::Roll => 32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_lasts_one_frame() {
        let mut input = InputState::new();

        input.button_down(InputButton::Attack);
        assert!(input.pressed(InputButton::Attack));
        assert!(input.held(InputButton::Attack));

        input.begin_frame();
        assert!(!input.pressed(InputButton::Attack));
        assert!(input.held(InputButton::Attack));

        input.button_down(InputButton::Attack);
        assert!(!input.pressed(InputButton::Attack));

        input.button_up(InputButton::Attack);
        assert!(!input.held(InputButton::Attack));
    }

    #[test]
    fn test_with_press() {
        let input = InputState::with_press(InputButton::Roll);
        assert!(input.pressed(InputButton::Roll));
        assert!(!input.pressed(InputButton::Attack));
        assert!(input.axis.is_zero());
    }
}

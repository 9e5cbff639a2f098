//! Normalized flight input.
//!
//! Front ends translate their raw key/button events into [`Intent`]s and feed
//! them to [`InputState`]; once per tick the simulation consumes an
//! [`InputSnapshot`]. Key capture itself never reaches the simulation core.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One thing the pilot can ask the ship to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    PitchUp,
    PitchDown,
    YawLeft,
    YawRight,
    ThrottleUp,
    ThrottleDown,
    Fire,
    EnterSanctum,
    ExitSanctum,
}

/// Whether an intent event is a press or a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementState {
    Pressed,
    Released,
}

/// Boolean intents for a single tick.
///
/// Flight intents are level-triggered (held); fire and sanctum intents are
/// edge-triggered (true only on the tick they were pressed).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSnapshot {
    pub pitch_up: bool,
    pub pitch_down: bool,
    pub yaw_left: bool,
    pub yaw_right: bool,
    pub throttle_up: bool,
    pub throttle_down: bool,
    pub fire: bool,
    pub enter_sanctum: bool,
    pub exit_sanctum: bool,
}

impl InputSnapshot {
    /// Bank direction: +1 left, -1 right. Right wins when both are held.
    pub fn bank_axis(&self) -> f32 {
        if self.yaw_right {
            -1.0
        } else if self.yaw_left {
            1.0
        } else {
            0.0
        }
    }
}

/// Manages held/pressed intent state between ticks.
#[derive(Debug, Default)]
pub struct InputState {
    /// Intents currently held down.
    held: HashSet<Intent>,
    /// Intents pressed since the last `begin_frame`.
    pressed: HashSet<Intent>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-frame state. Call after the snapshot for a tick was taken.
    pub fn begin_frame(&mut self) {
        self.pressed.clear();
    }

    /// Process a press/release event.
    pub fn process(&mut self, intent: Intent, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.held.contains(&intent) {
                    self.pressed.insert(intent);
                }
                self.held.insert(intent);
            }
            ElementState::Released => {
                self.held.remove(&intent);
            }
        }
    }

    pub fn is_held(&self, intent: Intent) -> bool {
        self.held.contains(&intent)
    }

    pub fn is_pressed(&self, intent: Intent) -> bool {
        self.pressed.contains(&intent)
    }

    /// Build this tick's snapshot.
    pub fn snapshot(&self) -> InputSnapshot {
        InputSnapshot {
            pitch_up: self.is_held(Intent::PitchUp),
            pitch_down: self.is_held(Intent::PitchDown),
            yaw_left: self.is_held(Intent::YawLeft),
            yaw_right: self.is_held(Intent::YawRight),
            throttle_up: self.is_held(Intent::ThrottleUp),
            throttle_down: self.is_held(Intent::ThrottleDown),
            fire: self.is_pressed(Intent::Fire),
            enter_sanctum: self.is_pressed(Intent::EnterSanctum),
            exit_sanctum: self.is_pressed(Intent::ExitSanctum),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_intents_persist_across_frames() {
        let mut input = InputState::new();
        input.process(Intent::ThrottleUp, ElementState::Pressed);
        input.begin_frame();
        assert!(input.snapshot().throttle_up);
        input.process(Intent::ThrottleUp, ElementState::Released);
        assert!(!input.snapshot().throttle_up);
    }

    #[test]
    fn sanctum_intents_fire_once_per_press() {
        let mut input = InputState::new();
        input.process(Intent::EnterSanctum, ElementState::Pressed);
        assert!(input.snapshot().enter_sanctum);
        input.begin_frame();
        // Key repeat while held must not re-trigger.
        input.process(Intent::EnterSanctum, ElementState::Pressed);
        assert!(!input.snapshot().enter_sanctum);
    }

    #[test]
    fn opposing_yaw_banks_right() {
        let snap = InputSnapshot {
            yaw_left: true,
            yaw_right: true,
            ..Default::default()
        };
        assert_eq!(snap.bank_axis(), -1.0);
    }

    #[test]
    fn fire_is_reported_once_per_press() {
        let mut input = InputState::new();
        input.process(Intent::Fire, ElementState::Pressed);
        assert!(input.snapshot().fire);
        input.begin_frame();
        assert!(input.is_held(Intent::Fire));
        assert!(!input.snapshot().fire);
        input.process(Intent::Fire, ElementState::Released);
        input.process(Intent::Fire, ElementState::Pressed);
        assert!(input.snapshot().fire);
    }
}

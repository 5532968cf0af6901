//! Normalized input handling
//!
//! The host converts raw pointer and key events into `InputEvent`s with
//! pointer positions already in normalized device coordinates.

use crate::renderer::{OffsetSink, sync};
use crate::sim::{GameState, TickInput};

/// Host-independent input events
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Primary button pressed at horizontal position `x`
    Press { x: f32 },
    /// Pointer moved to `x` while the primary button is held
    Drag { x: f32 },
    /// Primary button released
    Release,
    /// Fire key pressed
    Fire,
}

/// What an event changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEffect {
    None,
    /// Turret offset changed; the turret slice should be synced now
    TurretMoved,
    /// A shot will be attempted on the next tick
    FireQueued,
}

/// Where a drag started
#[derive(Debug, Clone, Copy, PartialEq)]
struct DragAnchor {
    pointer_x: f32,
    turret_x: f32,
}

/// Input state carried between ticks
#[derive(Debug, Clone, Default)]
pub struct Controls {
    drag: Option<DragAnchor>,
    fire_pending: bool,
}

impl Controls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Apply one event. Turret moves take effect immediately.
    pub fn handle(&mut self, state: &mut GameState, event: InputEvent) -> InputEffect {
        match event {
            InputEvent::Press { x } => {
                self.drag = Some(DragAnchor {
                    pointer_x: x,
                    turret_x: state.turret_x(),
                });
                InputEffect::None
            }
            InputEvent::Drag { x } => match self.drag {
                Some(anchor) => {
                    state.set_turret_x(anchor.turret_x + (x - anchor.pointer_x));
                    InputEffect::TurretMoved
                }
                None => InputEffect::None,
            },
            InputEvent::Release => {
                self.drag = None;
                InputEffect::None
            }
            InputEvent::Fire => {
                self.fire_pending = true;
                InputEffect::FireQueued
            }
        }
    }

    /// Apply one event and push a moved turret to `sink` straight away,
    /// without waiting for the next tick's sync
    pub fn apply(
        &mut self,
        state: &mut GameState,
        event: InputEvent,
        sink: &mut impl OffsetSink,
    ) -> InputEffect {
        let effect = self.handle(state, event);
        if effect == InputEffect::TurretMoved {
            sync(&mut state.turret, sink);
        }
        effect
    }

    /// Input for the next tick; consumes the pending fire trigger
    pub fn take_tick_input(&mut self) -> TickInput {
        TickInput {
            fire: std::mem::take(&mut self.fire_pending),
        }
    }
}

/// Map a client-space pointer x into [-1, 1] across an element
pub fn client_to_ndc_x(client_x: f32, left: f32, width: f32) -> f32 {
    if width <= 0.0 {
        return 0.0;
    }
    (client_x - left) / width * 2.0 - 1.0
}

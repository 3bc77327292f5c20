use crate::world::grid::CELL_SIZE;

/// World units the leaf slides per second.  Matches the classic feel of
/// 8 units per 35 Hz tic.
pub const SLIDE_SPEED: f32 = 280.0;

/// Seconds a fully open, unobstructed door stays open before the frame
/// driver commands it shut.
pub const AUTO_CLOSE_AFTER: f32 = 4.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DoorState {
    Closed,
    Opening,
    Open,
    Closing,
}

/// One sliding door leaf.
///
/// The slide offset runs from `0.0` (fully closed) to [`CELL_SIZE`] (fully
/// open) and is clamped to that range.  State only ever advances around the
/// cycle closed → opening → open → closing → closed; there is no direct
/// closed ↔ open jump.  Changing state and offset is the *only* externally
/// observable effect; sound and rendering belong to collaborators watching
/// the transitions.
#[derive(Clone, Copy, Debug)]
pub struct Door {
    state: DoorState,
    slide: f32,
    /// Seconds spent in `Open` since the leaf last reached full travel.
    hold: f32,
}

impl Default for Door {
    fn default() -> Self {
        Self::new()
    }
}

impl Door {
    pub fn new() -> Self {
        Self {
            state: DoorState::Closed,
            slide: 0.0,
            hold: 0.0,
        }
    }

    #[inline]
    pub fn state(&self) -> DoorState {
        self.state
    }

    /// Current slide offset in world units, `0.0 ..= CELL_SIZE`.
    #[inline]
    pub fn slide(&self) -> f32 {
        self.slide
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.slide >= CELL_SIZE
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.slide <= 0.0
    }

    /// Seconds the door has been fully open.
    #[inline]
    pub fn hold_time(&self) -> f32 {
        self.hold
    }

    /// Start opening a closed door.  Ignored in any other state.
    pub fn request_open(&mut self) {
        if self.state == DoorState::Closed {
            self.state = DoorState::Opening;
        }
    }

    /// Start closing a fully open door.  Ignored in any other state.
    pub fn request_close(&mut self) {
        if self.state == DoorState::Open {
            self.state = DoorState::Closing;
            self.hold = 0.0;
        }
    }

    /// Advance the leaf by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        match self.state {
            DoorState::Opening => {
                self.slide += SLIDE_SPEED * dt;
                if self.slide >= CELL_SIZE {
                    self.slide = CELL_SIZE;
                    self.state = DoorState::Open;
                    self.hold = 0.0;
                }
            }
            DoorState::Closing => {
                self.slide -= SLIDE_SPEED * dt;
                if self.slide <= 0.0 {
                    self.slide = 0.0;
                    self.state = DoorState::Closed;
                }
            }
            DoorState::Open => self.hold += dt,
            DoorState::Closed => {}
        }
    }
}

//! Edge-triggered flap queue between input devices and the fixed step

#[derive(Debug, Clone, Default)]
pub struct InputSystem {
    flap_queued: bool,
}

impl InputSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a flap. Repeated requests before consumption collapse to one.
    pub fn request_flap(&mut self) {
        self.flap_queued = true;
    }

    /// Read and clear the queued flap
    pub fn consume_flap(&mut self) -> bool {
        std::mem::take(&mut self.flap_queued)
    }

    pub fn has_pending_flap(&self) -> bool {
        self.flap_queued
    }

    pub fn clear(&mut self) {
        self.flap_queued = false;
    }
}

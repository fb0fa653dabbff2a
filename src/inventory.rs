use tracing::{debug, info};

/// What the player is carrying. Only one solid block at a time.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InventoryTracker {
    holding_solid: bool,
}

impl InventoryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_holding_solid(&self) -> bool {
        self.holding_solid
    }

    /// Pick a block up. Refused while one is already in hand.
    pub fn take_solid(&mut self) -> bool {
        if self.holding_solid {
            debug!("already holding a solid block");
            return false;
        }
        self.holding_solid = true;
        info!("player took a solid block");
        true
    }

    /// Put the held block down. Refused when the hand is empty.
    pub fn place_solid(&mut self) -> bool {
        if !self.holding_solid {
            debug!("nothing in hand to place");
            return false;
        }
        self.holding_solid = false;
        info!("player placed the solid block");
        true
    }
}

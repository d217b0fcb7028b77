//! In-memory save slots.
use std::cell::RefCell;
use std::collections::HashMap;
use std::convert::Infallible;
use std::rc::Rc;

use crate::GameStorage;
use crate::state::PlayerState;

/// Shared map of slot name to snapshot. Clones see the same slots.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    saves: Rc<RefCell<HashMap<String, PlayerState>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn slots(&self) -> Vec<String> {
        let mut slots: Vec<String> = self.saves.borrow().keys().cloned().collect();
        slots.sort();
        slots
    }
}

impl GameStorage for MemoryStorage {
    type Error = Infallible;

    fn save_game(&self, slot: &str, state: &PlayerState) -> Result<(), Self::Error> {
        self.saves
            .borrow_mut()
            .insert(slot.to_string(), state.clone());
        Ok(())
    }

    fn load_game(&self, slot: &str) -> Result<Option<PlayerState>, Self::Error> {
        Ok(self.saves.borrow().get(slot).cloned())
    }

    fn delete_save(&self, slot: &str) -> Result<(), Self::Error> {
        self.saves.borrow_mut().remove(slot);
        Ok(())
    }
}

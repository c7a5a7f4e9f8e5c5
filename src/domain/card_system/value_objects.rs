use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// ============================================================================
// Card System Value Objects
// ============================================================================

/// A UiTPAS card system (a regional pass scheme)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CardSystem {
    pub id: String,
    pub name: String,
}

impl CardSystem {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// All card systems an event is linked to, keyed by card system number
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct CardSystems(IndexMap<u32, CardSystem>);

impl CardSystems {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of these card systems with `card_system` stored under `key`
    pub fn with_key(&self, key: u32, card_system: CardSystem) -> Self {
        let mut card_systems = self.0.clone();
        card_systems.insert(key, card_system);
        Self(card_systems)
    }

    pub fn get(&self, key: u32) -> Option<&CardSystem> {
        self.0.get(&key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

use serde::{Deserialize, Serialize};

// ============================================================================
// Offer Value Objects - shared by events and places
// ============================================================================

/// Amount in cents
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    pub fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub fn from_float(amount: f64) -> Self {
        Self((amount * 100.0).round() as i64)
    }

    pub fn cents(&self) -> i64 {
        self.0
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct BasePrice {
    pub price: Price,
    pub currency: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PriceInfo {
    pub base_price: BasePrice,
}

impl PriceInfo {
    pub fn new(base_price: BasePrice) -> Self {
        Self { base_price }
    }
}

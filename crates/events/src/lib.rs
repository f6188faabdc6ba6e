//! Deckswap event bus.
//!
//! Fire-and-forget notification/statistics hooks ride this in-process
//! publish/subscribe hub. Settlement never waits on a subscriber and a
//! subscriber failure never rolls a trade back.

pub mod bus;

pub use bus::{EventBus, TradeEvent};

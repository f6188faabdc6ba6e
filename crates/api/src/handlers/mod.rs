//! HTTP handlers. Thin transport wrappers: extract, delegate to a service
//! or repository, envelope the result.

pub mod auth;
pub mod cards;
pub mod health;
pub mod offers;
pub mod publications;
pub mod stats;

//! Row models and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - Safe `Serialize` response structs where the row carries secrets

pub mod card;
pub mod offer;
pub mod publication;
pub mod stats;
pub mod user;

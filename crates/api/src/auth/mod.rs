//! Authentication building blocks: JWT issuance/validation and Argon2id
//! password hashing.

pub mod jwt;
pub mod password;

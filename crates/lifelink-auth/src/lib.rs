//! Authentication primitives for LifeLink: JWT access tokens and Argon2id
//! password hashing.

pub mod jwt;
pub mod password;

//! Wire types shared by the tracker client crates.

pub mod domain;
pub mod error;
pub mod protocol;
pub mod timestamp;

//! Filename-length scanner: containment-checked walk plus violation records.

pub mod violation;
pub mod walker;

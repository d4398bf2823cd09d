//! Modelos de datos
//!
//! Structs que mapean directamente al esquema de SQLite.

pub mod vehicle;

pub use vehicle::*;

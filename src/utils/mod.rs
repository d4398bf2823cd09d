//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación
//! y renderizado HTML.

pub mod errors;
pub mod html;
pub mod validation;

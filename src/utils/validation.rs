//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! de entrada: campos obligatorios, nombres de archivo y patentes.

use validator::ValidationError;

/// Validar que un string no esté vacío (ignorando espacios)
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

/// Extraer la extensión de un nombre de archivo (texto tras el último punto)
pub fn file_extension(filename: &str) -> Option<&str> {
    filename.rsplit_once('.').map(|(_, ext)| ext)
}

/// Verificar que el archivo tenga una extensión de la lista permitida
pub fn allowed_file(filename: &str, allowed_extensions: &[String]) -> bool {
    match file_extension(filename) {
        Some(ext) => {
            let ext = ext.to_lowercase();
            allowed_extensions.iter().any(|allowed| *allowed == ext)
        }
        None => false,
    }
}

/// Normalizar una patente: mayúsculas y solo caracteres A-Z / 0-9
pub fn normalize_plate(value: &str) -> String {
    value
        .to_uppercase()
        .chars()
        .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        .collect()
}

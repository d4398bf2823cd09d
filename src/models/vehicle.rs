//! Modelo de Vehicle
//!
//! Este módulo contiene el struct de un vehículo ingresado al taller y la
//! variante usada para crearlo. Mapea exactamente a la tabla `vehiculos`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::utils::validation::validate_not_empty;

/// Estado asignado a todo vehículo recién ingresado
pub const DEFAULT_STATUS: &str = "En taller";

/// Vehículo registrado - una fila de la tabla `vehiculos`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct VehicleRecord {
    pub id: i64,
    pub patente: String,
    pub duenio: String,
    pub vehiculo: String,
    pub falla: String,
    pub email: String,
    pub fecha_ingreso: DateTime<Utc>,
    pub estado: String,
}

/// Datos para registrar un vehículo nuevo
#[derive(Debug, Clone, Validate)]
pub struct NewVehicleRecord {
    #[validate(custom = "validate_not_empty")]
    pub patente: String,

    #[validate(custom = "validate_not_empty")]
    pub duenio: String,

    #[validate(custom = "validate_not_empty")]
    pub vehiculo: String,

    pub falla: String,

    #[validate(custom = "validate_not_empty")]
    pub email: String,

    pub fecha_ingreso: DateTime<Utc>,
    pub estado: String,
}

impl NewVehicleRecord {
    /// Crear un ingreso con la fecha actual y el estado por defecto
    pub fn new(patente: String, duenio: String, vehiculo: String, falla: String, email: String) -> Self {
        Self {
            patente,
            duenio,
            vehiculo,
            falla,
            email,
            fecha_ingreso: Utc::now(),
            estado: DEFAULT_STATUS.to_string(),
        }
    }

    /// Fijar la fecha de ingreso (importaciones y tests)
    pub fn with_fecha_ingreso(mut self, fecha_ingreso: DateTime<Utc>) -> Self {
        self.fecha_ingreso = fecha_ingreso;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NewVehicleRecord {
        NewVehicleRecord::new(
            "AB123CD".into(),
            "Juan Pérez".into(),
            "Fiat Uno".into(),
            "".into(),
            "juan@example.com".into(),
        )
    }

    #[test]
    fn test_new_defaults_status() {
        assert_eq!(sample().estado, DEFAULT_STATUS);
    }

    #[test]
    fn test_optional_falla_passes_validation() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_required_fields_fail_validation() {
        let mut record = sample();
        record.duenio = "  ".into();
        record.email = String::new();
        let errors = record.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("duenio"));
        assert!(fields.contains_key("email"));
        assert!(!fields.contains_key("patente"));
    }
}

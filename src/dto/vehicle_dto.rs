use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::vehicle::VehicleRecord;

// Request para guardar un vehículo; los campos ausentes llegan vacíos
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SaveVehicleRequest {
    pub patente: String,
    pub duenio: String,
    pub vehiculo: String,
    pub falla: String,
    pub email: String,
}

// Response de vehículo para `/api/vehiculos`
#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    pub id: i64,
    pub patente: String,
    pub duenio: String,
    pub vehiculo: String,
    pub falla: String,
    pub email: String,
    pub fecha_ingreso: DateTime<Utc>,
    pub estado: String,
}

impl From<VehicleRecord> for VehicleResponse {
    fn from(v: VehicleRecord) -> Self {
        Self {
            id: v.id,
            patente: v.patente,
            duenio: v.duenio,
            vehiculo: v.vehiculo,
            falla: v.falla,
            email: v.email,
            fecha_ingreso: v.fecha_ingreso,
            estado: v.estado,
        }
    }
}

// Datos de un vehículo ya registrado, devueltos al escanear su patente
#[derive(Debug, Serialize)]
pub struct VehicleSummary {
    pub duenio: String,
    pub vehiculo: String,
    pub falla: String,
    pub email: String,
    pub estado: String,
}

impl From<VehicleRecord> for VehicleSummary {
    fn from(v: VehicleRecord) -> Self {
        Self {
            duenio: v.duenio,
            vehiculo: v.vehiculo,
            falla: v.falla,
            email: v.email,
            estado: v.estado,
        }
    }
}

// Response de `/api/upload_image`
#[derive(Debug, Serialize)]
pub struct UploadImageResponse {
    pub success: bool,
    pub patente: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existe: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehiculo: Option<VehicleSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mensaje: Option<String>,
}

impl UploadImageResponse {
    pub fn registered(patente: String, vehicle: VehicleRecord) -> Self {
        Self {
            success: true,
            patente: Some(patente),
            existe: Some(true),
            vehiculo: Some(vehicle.into()),
            mensaje: None,
        }
    }

    pub fn new_vehicle(patente: String) -> Self {
        Self {
            success: true,
            patente: Some(patente),
            existe: Some(false),
            vehiculo: None,
            mensaje: None,
        }
    }

    pub fn no_plate(mensaje: &str) -> Self {
        Self {
            success: true,
            patente: None,
            existe: None,
            vehiculo: None,
            mensaje: Some(mensaje.to_string()),
        }
    }
}

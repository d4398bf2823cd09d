//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas. Todas las respuestas de
//! error comparten la forma `{ "success": false, "error": ..., "code": ... }`.

use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{error, warn};

/// Mensaje para requests a los que les falta un campo obligatorio
pub const MISSING_FIELDS_MESSAGE: &str = "Faltan campos obligatorios";

/// Mensaje para patentes ya registradas
pub const DUPLICATE_PLATE_MESSAGE: &str = "La patente ya existe";

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Upload error: {0}")]
    Upload(String),

    #[error("Duplicate plate: {0}")]
    DuplicatePlate(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub code: &'static str,
}

impl AppError {
    /// Código HTTP, código de error estable y mensaje visible para el cliente
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "DB_ERROR",
                "Error al acceder a la base de datos".to_string(),
            ),
            AppError::Validation(_) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                MISSING_FIELDS_MESSAGE.to_string(),
            ),
            AppError::Upload(msg) => (StatusCode::BAD_REQUEST, "UPLOAD_ERROR", msg.clone()),
            AppError::DuplicatePlate(_) => (
                StatusCode::CONFLICT,
                "DUPLICATE_PLATE",
                DUPLICATE_PLATE_MESSAGE.to_string(),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", msg.clone())
            }
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                msg.clone(),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Database(_) | AppError::Internal(_) => error!("❌ {}", self),
            _ => warn!("⚠️  {}", self),
        }

        let (status, code, message) = self.parts();
        let body = ErrorResponse {
            success: false,
            error: message,
            code,
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge("El cuerpo supera el tamaño máximo permitido".to_string())
        } else {
            AppError::BadRequest(format!("JSON inválido: {}", rejection.body_text()))
        }
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::Upload(format!("Formulario inválido: {}", rejection.body_text()))
    }
}

impl From<MultipartError> for AppError {
    fn from(e: MultipartError) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge("La imagen supera el tamaño máximo permitido".to_string())
        } else {
            AppError::Upload(format!("Formulario inválido: {}", e.body_text()))
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(e: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("Tarea de procesamiento interrumpida: {}", e))
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de subida
pub fn upload_error(message: &str) -> AppError {
    AppError::Upload(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(error: AppError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_duplicate_plate_response() {
        let (status, body) = body_json(AppError::DuplicatePlate("AB123CD".into())).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], DUPLICATE_PLATE_MESSAGE);
        assert_eq!(body["code"], "DUPLICATE_PLATE");
    }

    #[tokio::test]
    async fn test_validation_response() {
        let mut errors = validator::ValidationErrors::new();
        errors.add("duenio", validator::ValidationError::new("required"));
        let (status, body) = body_json(AppError::Validation(errors)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], MISSING_FIELDS_MESSAGE);
    }

    #[tokio::test]
    async fn test_upload_response_keeps_message() {
        let (status, body) = body_json(upload_error("Tipo de archivo no permitido")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Tipo de archivo no permitido");
        assert_eq!(body["code"], "UPLOAD_ERROR");
    }

    #[tokio::test]
    async fn test_database_error_hides_details() {
        let (status, body) = body_json(AppError::Database(sqlx::Error::RowNotFound)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "DB_ERROR");
    }
}

use crate::dto::vehicle_dto::UploadImageResponse;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::plate_detection_service::{PlateDetection, PlateDetectionService};
use crate::utils::errors::{upload_error, AppError, AppResult};
use crate::utils::validation::allowed_file;
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{error, info, warn};

pub const NO_IMAGE_MESSAGE: &str = "No se seleccionó ninguna imagen";
pub const NO_FILE_MESSAGE: &str = "No se seleccionó ningún archivo";
pub const FILE_TYPE_MESSAGE: &str = "Tipo de archivo no permitido";
pub const DECODE_ERROR_MESSAGE: &str = "Error al procesar la imagen";
pub const NO_PLATE_MESSAGE: &str = "No se detectó ninguna patente en la imagen";
pub const OCR_FAILURE_MESSAGE: &str = "No se pudo ejecutar el motor OCR";

/// Archivo recibido en el campo `image` del formulario
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub filename: String,
    pub bytes: Vec<u8>,
}

pub struct UploadController {
    repository: VehicleRepository,
    detector: Arc<PlateDetectionService>,
    allowed_extensions: Vec<String>,
}

impl UploadController {
    pub fn new(
        pool: SqlitePool,
        detector: Arc<PlateDetectionService>,
        allowed_extensions: Vec<String>,
    ) -> Self {
        Self {
            repository: VehicleRepository::new(pool),
            detector,
            allowed_extensions,
        }
    }

    /// Validar el archivo, reconocer la patente y buscarla en la base
    pub async fn process(&self, upload: Option<UploadedImage>) -> AppResult<UploadImageResponse> {
        let upload = upload.ok_or_else(|| upload_error(NO_IMAGE_MESSAGE))?;

        if upload.filename.is_empty() {
            return Err(upload_error(NO_FILE_MESSAGE));
        }

        if !allowed_file(&upload.filename, &self.allowed_extensions) {
            return Err(upload_error(FILE_TYPE_MESSAGE));
        }

        info!("📷 Imagen recibida: {} ({} bytes)", upload.filename, upload.bytes.len());

        let detector = self.detector.clone();
        let bytes = upload.bytes;
        let outcome = tokio::task::spawn_blocking(move || {
            let image = image::load_from_memory(&bytes).map_err(|e| {
                warn!("⚠️  Imagen no decodificable: {}", e);
                upload_error(DECODE_ERROR_MESSAGE)
            })?;
            Ok::<_, AppError>(detector.detect(&image))
        })
        .await??;

        match outcome {
            Ok(PlateDetection::Found { plate, .. }) => match self.repository.find_by_plate(&plate).await? {
                Some(vehicle) => Ok(UploadImageResponse::registered(plate, vehicle)),
                None => Ok(UploadImageResponse::new_vehicle(plate)),
            },
            Ok(PlateDetection::NotFound) => Ok(UploadImageResponse::no_plate(NO_PLATE_MESSAGE)),
            Err(e) => {
                error!("❌ Error en OCR: {}", e);
                Ok(UploadImageResponse::no_plate(OCR_FAILURE_MESSAGE))
            }
        }
    }
}

//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use sqlx::SqlitePool;
use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::services::ocr_service::{OcrEngine, TesseractCli};
use crate::services::plate_detection_service::PlateDetectionService;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<EnvironmentConfig>,
    pub detector: Arc<PlateDetectionService>,
}

impl AppState {
    /// Estado de producción: OCR con el ejecutable de Tesseract configurado
    pub fn new(pool: SqlitePool, config: EnvironmentConfig) -> Self {
        let engine = Arc::new(TesseractCli::new(config.tesseract_cmd.clone()));
        Self::with_engine(pool, config, engine)
    }

    /// Estado con un motor OCR arbitrario
    pub fn with_engine(pool: SqlitePool, config: EnvironmentConfig, engine: Arc<dyn OcrEngine>) -> Self {
        Self {
            pool,
            config: Arc::new(config),
            detector: Arc::new(PlateDetectionService::new(engine)),
        }
    }
}

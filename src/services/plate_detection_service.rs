//! Detección de patentes
//!
//! Preprocesa la imagen una vez y prueba las configuraciones de OCR en orden;
//! para cada texto obtenido prueba los formatos de patente en orden. La
//! primera coincidencia válida corta la búsqueda: no hay puntajes ni votación
//! entre configuraciones, así que una lectura temprana incorrecta no se
//! reconsidera.

use image::DynamicImage;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::services::image_preprocessing_service::ImagePreprocessor;
use crate::services::ocr_service::{OcrConfig, OcrEngine, OcrError, PageSegMode};
use crate::services::plate_matcher::{clean_ocr_text, find_plate};

/// Pasadas de OCR en orden de prioridad: palabra, línea, texto disperso
pub const OCR_ATTEMPTS: [OcrConfig; 3] = [
    OcrConfig::plate(PageSegMode::SingleWord),
    OcrConfig::plate(PageSegMode::SingleLine),
    OcrConfig::plate(PageSegMode::SparseText),
];

/// Resultado del reconocimiento
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlateDetection {
    Found {
        plate: String,
        shape: &'static str,
        psm: PageSegMode,
    },
    NotFound,
}

impl PlateDetection {
    pub fn plate(&self) -> Option<&str> {
        match self {
            PlateDetection::Found { plate, .. } => Some(plate),
            PlateDetection::NotFound => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum PlateDetectionError {
    #[error("OCR engine failed in every configuration: {0}")]
    Engine(#[source] OcrError),
}

pub struct PlateDetectionService {
    preprocessor: ImagePreprocessor,
    engine: Arc<dyn OcrEngine>,
}

impl PlateDetectionService {
    pub fn new(engine: Arc<dyn OcrEngine>) -> Self {
        Self {
            preprocessor: ImagePreprocessor::default(),
            engine,
        }
    }

    /// Detectar una patente en la imagen.
    ///
    /// Un fallo del motor en una pasada se registra y se sigue con la
    /// siguiente. Solo si todas las pasadas fallan se devuelve
    /// `PlateDetectionError::Engine` con el último error.
    pub fn detect(&self, image: &DynamicImage) -> Result<PlateDetection, PlateDetectionError> {
        let processed = self.preprocessor.preprocess(image);
        let mut last_error = None;
        let mut any_success = false;

        for config in OCR_ATTEMPTS.iter() {
            let raw = match self.engine.recognize(&processed, config) {
                Ok(raw) => raw,
                Err(e) => {
                    warn!("⚠️  OCR psm {} falló: {}", config.psm.as_number(), e);
                    last_error = Some(e);
                    continue;
                }
            };
            any_success = true;

            let clean = clean_ocr_text(&raw);
            debug!("🔍 psm {} texto limpio: '{}'", config.psm.as_number(), clean);

            if let Some(found) = find_plate(&clean) {
                info!(
                    "✅ Patente detectada: {} (formato {}, psm {})",
                    found.plate,
                    found.shape,
                    config.psm.as_number()
                );
                return Ok(PlateDetection::Found {
                    plate: found.plate,
                    shape: found.shape,
                    psm: config.psm,
                });
            }
        }

        match last_error {
            Some(e) if !any_success => Err(PlateDetectionError::Engine(e)),
            _ => {
                info!("🔍 No se detectó ninguna patente");
                Ok(PlateDetection::NotFound)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Rgb, RgbImage};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Motor OCR de prueba: responde según el psm y registra las llamadas
    struct ScriptedOcr {
        responses: HashMap<u8, Result<String, String>>,
        calls: Mutex<Vec<u8>>,
    }

    impl ScriptedOcr {
        fn new(responses: &[(u8, Result<&str, &str>)]) -> Self {
            Self {
                responses: responses
                    .iter()
                    .map(|(psm, r)| (*psm, r.map(str::to_string).map_err(str::to_string)))
                    .collect(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<u8> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl OcrEngine for ScriptedOcr {
        fn recognize(&self, _image: &GrayImage, config: &OcrConfig) -> Result<String, OcrError> {
            let psm = config.psm.as_number();
            self.calls.lock().unwrap().push(psm);
            match self.responses.get(&psm) {
                Some(Ok(text)) => Ok(text.clone()),
                Some(Err(stderr)) => Err(OcrError::EngineFailed {
                    status: "exit status: 1".into(),
                    stderr: stderr.clone(),
                }),
                None => Ok(String::new()),
            }
        }
    }

    fn image() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(24, 12, Rgb([200, 200, 200])))
    }

    fn detect_with(engine: &Arc<ScriptedOcr>) -> Result<PlateDetection, PlateDetectionError> {
        PlateDetectionService::new(engine.clone()).detect(&image())
    }

    #[test]
    fn test_attempt_order() {
        let modes: Vec<u8> = OCR_ATTEMPTS.iter().map(|c| c.psm.as_number()).collect();
        assert_eq!(modes, vec![8, 7, 11]);
    }

    #[test]
    fn test_first_config_hit_stops_search() {
        let engine = Arc::new(ScriptedOcr::new(&[
            (8, Ok("ab 123 cd")),
            (7, Ok("ZZ999ZZ")),
        ]));
        let result = detect_with(&engine).unwrap();
        assert_eq!(
            result,
            PlateDetection::Found {
                plate: "AB123CD".into(),
                shape: "AA123BB",
                psm: PageSegMode::SingleWord,
            }
        );
        assert_eq!(engine.calls(), vec![8]);
    }

    #[test]
    fn test_falls_through_to_later_config() {
        let engine = Arc::new(ScriptedOcr::new(&[
            (8, Ok("XYZ")),
            (7, Ok("")),
            (11, Ok("ruido\nABC 123\n")),
        ]));
        let result = detect_with(&engine).unwrap();
        assert_eq!(result.plate(), Some("ABC123"));
        assert_eq!(engine.calls(), vec![8, 7, 11]);
    }

    #[test]
    fn test_not_found_after_all_configs() {
        let engine = Arc::new(ScriptedOcr::new(&[(8, Ok("XYZ")), (7, Ok("12")), (11, Ok("A"))]));
        assert_eq!(detect_with(&engine).unwrap(), PlateDetection::NotFound);
        assert_eq!(engine.calls(), vec![8, 7, 11]);
    }

    #[test]
    fn test_engine_failure_in_one_config_continues() {
        let engine = Arc::new(ScriptedOcr::new(&[
            (8, Err("segfault")),
            (7, Ok("AB123C")),
        ]));
        let result = detect_with(&engine).unwrap();
        assert_eq!(result.plate(), Some("AB123C"));
    }

    #[test]
    fn test_partial_failure_without_match_is_not_found() {
        let engine = Arc::new(ScriptedOcr::new(&[
            (8, Err("boom")),
            (7, Ok("XYZ")),
            (11, Err("boom")),
        ]));
        assert_eq!(detect_with(&engine).unwrap(), PlateDetection::NotFound);
    }

    #[test]
    fn test_engine_failure_everywhere_is_an_error() {
        let engine = Arc::new(ScriptedOcr::new(&[
            (8, Err("no tessdata")),
            (7, Err("no tessdata")),
            (11, Err("no tessdata")),
        ]));
        let err = detect_with(&engine).unwrap_err();
        assert!(err.to_string().contains("no tessdata"));
    }
}

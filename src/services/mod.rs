//! Services module
//!
//! Este módulo contiene la lógica de reconocimiento de patentes:
//! preprocesamiento de imagen, invocación del OCR y búsqueda de formatos.

pub mod image_preprocessing_service;
pub mod ocr_service;
pub mod plate_detection_service;
pub mod plate_matcher;

pub use image_preprocessing_service::{ImagePreprocessor, PreprocessingConfig};
pub use ocr_service::{OcrConfig, OcrEngine, OcrError, PageSegMode, TesseractCli};
pub use plate_detection_service::{PlateDetection, PlateDetectionError, PlateDetectionService};

//! Invocación del motor OCR
//!
//! El reconocimiento de texto lo hace Tesseract como proceso externo. El
//! trait `OcrEngine` aísla esa dependencia para poder reemplazarla en tests.

use image::{GrayImage, ImageFormat};
use std::path::PathBuf;
use std::process::Command;
use tempfile::Builder;
use thiserror::Error;
use tracing::debug;

/// Caracteres que Tesseract puede devolver al leer patentes
pub const PLATE_CHAR_WHITELIST: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Modo de segmentación de página de Tesseract (`--psm`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageSegMode {
    /// Una sola palabra
    SingleWord,
    /// Una sola línea de texto
    SingleLine,
    /// Texto disperso
    SparseText,
}

impl PageSegMode {
    pub fn as_number(&self) -> u8 {
        match self {
            PageSegMode::SingleWord => 8,
            PageSegMode::SingleLine => 7,
            PageSegMode::SparseText => 11,
        }
    }
}

/// Configuración de una pasada de OCR
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OcrConfig {
    pub psm: PageSegMode,
    pub whitelist: &'static str,
}

impl OcrConfig {
    pub const fn plate(psm: PageSegMode) -> Self {
        Self {
            psm,
            whitelist: PLATE_CHAR_WHITELIST,
        }
    }

    /// Argumentos de línea de comandos de Tesseract para esta pasada
    pub fn tesseract_args(&self) -> Vec<String> {
        vec![
            "--psm".to_string(),
            self.psm.as_number().to_string(),
            "-c".to_string(),
            format!("tessedit_char_whitelist={}", self.whitelist),
        ]
    }
}

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("I/O error running OCR: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write OCR input image: {0}")]
    Image(#[from] image::ImageError),

    #[error("Tesseract exited with {status}: {stderr}")]
    EngineFailed { status: String, stderr: String },
}

/// Motor OCR: recibe una imagen ya preprocesada y devuelve el texto crudo
pub trait OcrEngine: Send + Sync {
    fn recognize(&self, image: &GrayImage, config: &OcrConfig) -> Result<String, OcrError>;
}

/// Tesseract ejecutado como proceso externo
#[derive(Debug, Clone)]
pub struct TesseractCli {
    command: PathBuf,
}

impl TesseractCli {
    pub fn new(command: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl OcrEngine for TesseractCli {
    fn recognize(&self, image: &GrayImage, config: &OcrConfig) -> Result<String, OcrError> {
        // Tesseract reads from a file; it lives only for this call.
        let input = Builder::new().prefix("patente-").suffix(".png").tempfile()?;
        image.save_with_format(input.path(), ImageFormat::Png)?;

        let output = Command::new(&self.command)
            .arg(input.path())
            .arg("stdout")
            .args(config.tesseract_args())
            .output()?;

        if !output.status.success() {
            return Err(OcrError::EngineFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let text = String::from_utf8_lossy(&output.stdout).to_string();
        debug!("🔤 OCR psm {} -> {:?}", config.psm.as_number(), text.trim());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_page_seg_mode_numbers() {
        assert_eq!(PageSegMode::SingleWord.as_number(), 8);
        assert_eq!(PageSegMode::SingleLine.as_number(), 7);
        assert_eq!(PageSegMode::SparseText.as_number(), 11);
    }

    #[test]
    fn test_tesseract_args() {
        let args = OcrConfig::plate(PageSegMode::SparseText).tesseract_args();
        assert_eq!(
            args,
            vec![
                "--psm",
                "11",
                "-c",
                "tessedit_char_whitelist=ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789",
            ]
        );
    }

    #[test]
    fn test_missing_executable_is_an_error() {
        let engine = TesseractCli::new("/nonexistent/tesseract-binary");
        let image = GrayImage::from_pixel(4, 4, Luma([255]));
        let result = engine.recognize(&image, &OcrConfig::plate(PageSegMode::SingleWord));
        assert!(matches!(result, Err(OcrError::Io(_))));
    }
}

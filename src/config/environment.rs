//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del servidor. Los valores por defecto
//! son las constantes fijas del taller; cualquier variable de entorno presente
//! (o definida en `.env`) las sobrescribe.

use std::env;
use std::str::FromStr;

use crate::config::database::DatabaseConfig;

/// Extensiones de imagen aceptadas por `/api/upload_image`
pub const DEFAULT_ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

/// Ruta por defecto del ejecutable de Tesseract
pub const DEFAULT_TESSERACT_CMD: &str = "/usr/bin/tesseract";

/// Tamaño máximo de subida por defecto (16 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub host: String,
    pub port: u16,
    pub debug: bool,
    pub allowed_extensions: Vec<String>,
    pub max_upload_bytes: usize,
    pub tesseract_cmd: String,
    pub database: DatabaseConfig,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            debug: true,
            allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            tesseract_cmd: DEFAULT_TESSERACT_CMD.to_string(),
            database: DatabaseConfig::default(),
        }
    }
}

impl EnvironmentConfig {
    /// Construir la configuración a partir de los valores por defecto y las
    /// variables de entorno `HOST`, `PORT`, `DEBUG`, `DATABASE_URL`,
    /// `TESSERACT_CMD` y `MAX_UPLOAD_BYTES`.
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Ok(host) = env::var("HOST") {
            config.host = host;
        }
        if let Some(port) = parse_var::<u16>("PORT")? {
            config.port = port;
        }
        if let Some(debug) = parse_var::<bool>("DEBUG")? {
            config.debug = debug;
        }
        if let Ok(url) = env::var("DATABASE_URL") {
            config.database.url = url;
        }
        if let Ok(cmd) = env::var("TESSERACT_CMD") {
            config.tesseract_cmd = cmd;
        }
        if let Some(max) = parse_var::<usize>("MAX_UPLOAD_BYTES")? {
            config.max_upload_bytes = max;
        }

        Ok(config)
    }

    /// Obtener la dirección de escucha del servidor (`host:port`, sin resolver)
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T>(name: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("{} inválido ('{}'): {}", name, raw, e)),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_shop_constants() {
        let config = EnvironmentConfig::default();
        assert_eq!(config.server_url(), "0.0.0.0:5000");
        assert!(config.debug);
        assert_eq!(config.tesseract_cmd, "/usr/bin/tesseract");
        assert_eq!(config.allowed_extensions.len(), 4);
    }

    #[tokio::test]
    async fn test_server_url_accepts_hostnames() {
        let config = EnvironmentConfig {
            host: "localhost".to_string(),
            port: 0,
            ..EnvironmentConfig::default()
        };
        assert_eq!(config.server_url(), "localhost:0");
        let listener = tokio::net::TcpListener::bind(config.server_url()).await;
        assert!(listener.is_ok());
    }
}

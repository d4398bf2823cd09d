//! Conexión a SQLite
//!
//! Este módulo abre el pool de la base de datos del taller y garantiza que
//! el esquema exista antes de aceptar requests.

use anyhow::Result;
use sqlx::SqlitePool;
use tracing::info;

use crate::config::database::DatabaseConfig;
use crate::repositories::vehicle_repository::VehicleRepository;

/// Pool de conexiones con el esquema inicializado
#[derive(Clone)]
pub struct DatabaseConnection {
    pool: SqlitePool,
}

impl DatabaseConnection {
    /// Crear el pool a partir de la configuración e inicializar las tablas
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        info!("🗄️  Abriendo base de datos: {}", mask_database_url(&config.url));
        let pool = config.create_pool().await?;
        Self::from_pool(pool).await
    }

    /// Envolver un pool existente (por ejemplo, uno en memoria para tests)
    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        VehicleRepository::new(pool.clone()).initialize().await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Ocultar parámetros de query de la URL en los logs
fn mask_database_url(url: &str) -> String {
    match url.find('?') {
        Some(pos) => format!("{}?***", &url[..pos]),
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_database_url() {
        assert_eq!(mask_database_url("sqlite://taller.db"), "sqlite://taller.db");
        assert_eq!(
            mask_database_url("sqlite://taller.db?mode=rwc"),
            "sqlite://taller.db?***"
        );
    }

    #[tokio::test]
    async fn test_from_pool_is_idempotent() {
        let pool = DatabaseConfig::create_test_pool().await.unwrap();
        let first = DatabaseConnection::from_pool(pool.clone()).await;
        assert!(first.is_ok());
        let second = DatabaseConnection::from_pool(pool).await;
        assert!(second.is_ok());
    }
}

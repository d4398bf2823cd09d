use crate::models::vehicle::{NewVehicleRecord, VehicleRecord, DEFAULT_STATUS};
use crate::utils::errors::AppError;
use sqlx::SqlitePool;
use validator::Validate;

pub struct VehicleRepository {
    pool: SqlitePool,
}

impl VehicleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn initialize(&self) -> Result<(), AppError> {
        let schema = format!(
            r#"
            CREATE TABLE IF NOT EXISTS vehiculos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                patente TEXT NOT NULL UNIQUE,
                duenio TEXT NOT NULL,
                vehiculo TEXT NOT NULL,
                falla TEXT NOT NULL DEFAULT '',
                email TEXT NOT NULL,
                fecha_ingreso TEXT NOT NULL,
                estado TEXT NOT NULL DEFAULT '{}'
            )
            "#,
            DEFAULT_STATUS
        );

        sqlx::query(&schema).execute(&self.pool).await?;
        Ok(())
    }

    pub async fn find_by_plate(&self, patente: &str) -> Result<Option<VehicleRecord>, AppError> {
        let vehicle = sqlx::query_as::<_, VehicleRecord>("SELECT * FROM vehiculos WHERE patente = ?")
            .bind(patente)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    pub async fn plate_exists(&self, patente: &str) -> Result<bool, AppError> {
        let result: (i64,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM vehiculos WHERE patente = ?)")
                .bind(patente)
                .fetch_one(&self.pool)
                .await?;

        Ok(result.0 != 0)
    }

    pub async fn create(&self, record: &NewVehicleRecord) -> Result<VehicleRecord, AppError> {
        record.validate()?;

        if self.plate_exists(&record.patente).await? {
            return Err(AppError::DuplicatePlate(record.patente.clone()));
        }

        // Two concurrent requests can both pass the pre-check; the UNIQUE
        // constraint decides.
        let vehicle = sqlx::query_as::<_, VehicleRecord>(
            r#"
            INSERT INTO vehiculos (patente, duenio, vehiculo, falla, email, fecha_ingreso, estado)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&record.patente)
        .bind(&record.duenio)
        .bind(&record.vehiculo)
        .bind(&record.falla)
        .bind(&record.email)
        .bind(record.fecha_ingreso)
        .bind(&record.estado)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::DuplicatePlate(record.patente.clone())
            }
            other => AppError::Database(other),
        })?;

        Ok(vehicle)
    }

    pub async fn list_all(&self) -> Result<Vec<VehicleRecord>, AppError> {
        let vehicles = sqlx::query_as::<_, VehicleRecord>(
            "SELECT * FROM vehiculos ORDER BY fecha_ingreso DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }
}

use crate::dto::api_dto::ApiResponse;
use crate::dto::vehicle_dto::{SaveVehicleRequest, VehicleResponse};
use crate::models::vehicle::{NewVehicleRecord, VehicleRecord};
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::AppResult;
use crate::utils::validation::normalize_plate;
use sqlx::SqlitePool;
use tracing::info;

pub const SAVED_MESSAGE: &str = "Vehículo guardado correctamente";

pub struct VehicleController {
    repository: VehicleRepository,
}

impl VehicleController {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            repository: VehicleRepository::new(pool),
        }
    }

    pub async fn save(&self, request: SaveVehicleRequest) -> AppResult<ApiResponse<VehicleResponse>> {
        let record = NewVehicleRecord::new(
            normalize_plate(&request.patente),
            request.duenio.trim().to_string(),
            request.vehiculo.trim().to_string(),
            request.falla.trim().to_string(),
            request.email.trim().to_string(),
        );

        let vehicle = self.repository.create(&record).await?;
        info!("🚗 Vehículo registrado: {} ({})", vehicle.patente, vehicle.vehiculo);

        Ok(ApiResponse::success_with_message(
            VehicleResponse::from(vehicle),
            SAVED_MESSAGE.to_string(),
        ))
    }

    pub async fn list_records(&self) -> AppResult<Vec<VehicleRecord>> {
        self.repository.list_all().await
    }

    pub async fn list(&self) -> AppResult<Vec<VehicleResponse>> {
        let vehicles = self.repository.list_all().await?;
        Ok(vehicles.into_iter().map(VehicleResponse::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::database::DatabaseConfig;
    use crate::database::DatabaseConnection;
    use crate::utils::errors::AppError;

    async fn controller() -> VehicleController {
        let pool = DatabaseConfig::create_test_pool().await.unwrap();
        let db = DatabaseConnection::from_pool(pool).await.unwrap();
        VehicleController::new(db.pool().clone())
    }

    fn request(patente: &str) -> SaveVehicleRequest {
        SaveVehicleRequest {
            patente: patente.into(),
            duenio: " Ana Ruiz ".into(),
            vehiculo: "VW Gol".into(),
            falla: String::new(),
            email: "ana@example.com".into(),
        }
    }

    #[tokio::test]
    async fn test_save_normalizes_fields() {
        let controller = controller().await;
        let response = controller.save(request("ab-123-cd")).await.unwrap();
        assert!(response.success);
        assert_eq!(response.message.as_deref(), Some(SAVED_MESSAGE));

        let saved = response.data.unwrap();
        assert_eq!(saved.patente, "AB123CD");
        assert_eq!(saved.duenio, "Ana Ruiz");
        assert_eq!(saved.estado, "En taller");
    }

    #[tokio::test]
    async fn test_plate_of_only_symbols_is_a_validation_error() {
        let controller = controller().await;
        let result = controller.save(request("--")).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(controller.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_after_normalization() {
        let controller = controller().await;
        controller.save(request("AB123CD")).await.unwrap();
        let result = controller.save(request("ab 123 cd")).await;
        assert!(matches!(result, Err(AppError::DuplicatePlate(_))));
    }
}

use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::JsonRejection,
        Multipart, State,
    },
    routing::{get, post},
    Json, Router,
};
use crate::controllers::upload_controller::{UploadController, UploadedImage};
use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::api_dto::ApiResponse;
use crate::dto::vehicle_dto::{SaveVehicleRequest, UploadImageResponse, VehicleResponse};
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/upload_image", post(upload_image))
        .route("/guardar_vehiculo", post(save_vehicle))
        .route("/vehiculos", get(list_vehicles))
}

async fn upload_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<UploadImageResponse>> {
    let mut multipart = multipart?;

    // Only the first `image` field counts.
    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if upload.is_some() || field.name() != Some("image") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await?.to_vec();
        upload = Some(UploadedImage { filename, bytes });
    }

    let controller = UploadController::new(
        state.pool.clone(),
        state.detector.clone(),
        state.config.allowed_extensions.clone(),
    );
    let response = controller.process(upload).await?;
    Ok(Json(response))
}

async fn save_vehicle(
    State(state): State<AppState>,
    payload: Result<Json<SaveVehicleRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<VehicleResponse>>> {
    let Json(request) = payload?;
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.save(request).await?;
    Ok(Json(response))
}

async fn list_vehicles(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<VehicleResponse>>> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.list().await?;
    Ok(Json(response))
}

pub mod upload_controller;
pub mod vehicle_controller;

pub use upload_controller::UploadController;
pub use vehicle_controller::VehicleController;

//! Middleware de CORS
//!
//! Este módulo maneja la configuración de CORS para permitir
//! requests desde diferentes orígenes.

use tower_http::cors::CorsLayer;

/// Crear middleware de CORS permisivo: el servidor corre en la red local del taller
pub fn cors_middleware() -> CorsLayer {
    CorsLayer::very_permissive()
}

use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info};

use taller_patentes::config::environment::EnvironmentConfig;
use taller_patentes::database::DatabaseConnection;
use taller_patentes::{create_app, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();
    let config = EnvironmentConfig::from_env()?;

    // Configurar logging
    let level = if config.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    info!("🚀 Taller Mecánico - Sistema de Carga de Imágenes");
    info!("================================================");

    // Inicializar base de datos
    let db_connection = match DatabaseConnection::new(&config.database).await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    info!("🔤 Tesseract: {}", config.tesseract_cmd);
    let addr = config.server_url();
    let app = create_app(AppState::new(db_connection.pool().clone(), config));

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Estado del servidor");
    info!("📄 Páginas:");
    info!("   GET  / - Página principal");
    info!("   GET  /scan - Escanear patente");
    info!("   GET  /vehiculos - Listado de vehículos");
    info!("🚗 API:");
    info!("   POST /api/upload_image - Reconocer patente en imagen");
    info!("   POST /api/guardar_vehiculo - Registrar vehículo");
    info!("   GET  /api/vehiculos - Listar vehículos");

    // HOST may be a name like `localhost`; bind resolves it.
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}

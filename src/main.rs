use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use machine_rental::config::EnvironmentConfig;
use machine_rental::create_app;
use machine_rental::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚜 Machine Rental - Lookup y estado de alquiler");
    info!("================================================");

    let config = EnvironmentConfig::from_env()?;
    if config.is_development() {
        info!("🧪 Modo desarrollo, backend: {}", config.backend_name());
    }
    let addr: SocketAddr = config.server_url().parse()?;

    let app_state = match AppState::connect(config).await {
        Ok(state) => state,
        Err(e) => {
            error!("❌ Error inicializando el gateway de datos: {}", e);
            return Err(e);
        }
    };

    let app = create_app(app_state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("   GET  /api/machine?machine_id=<id> - Ver máquina");
    info!("   POST /api/machine/:machine_id/checkout - Checkout");
    info!("   POST /api/machine/:machine_id/checkin - Check-in");
    info!("   POST /api/machine/:machine_id/maintenance - Mantenimiento");
    info!("   GET  /api/customers - Clientes");
    info!("   GET  /api/operators - Operadores");

    let listener = tokio::net::TcpListener::bind(addr).await?;
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
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
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

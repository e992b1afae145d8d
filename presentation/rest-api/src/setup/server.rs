use std::time::Duration;

use poem::{EndpointExt, Route, Server as PoemServer, listener::TcpListener, middleware::Tracing};
use poem_openapi::OpenApiService;

use crate::api::cart::routes::CartApi;
use crate::api::health::routes::Api as HealthApi;
use crate::api::session::routes::SessionApi;
use crate::{config::app_config::AppConfig, setup::dependency_injection::DependencyContainer};

pub struct Server;

impl Server {
    /// Routes, Swagger UI and the OpenAPI document, without middleware.
    pub fn routes(
        health_api: HealthApi,
        cart_api: CartApi,
        session_api: SessionApi,
        server_url: &str,
    ) -> Route {
        let api_service = OpenApiService::new(
            (health_api, cart_api, session_api),
            "Cart Sync API",
            env!("CARGO_PKG_VERSION"),
        )
        .server(server_url);
        let ui = api_service.swagger_ui();
        let spec = api_service.spec_endpoint();
        Route::new()
            .nest("/", api_service)
            .nest("/docs", ui)
            .nest("/openapi.json", spec)
    }

    pub async fn run(config: AppConfig, container: DependencyContainer) -> anyhow::Result<()> {
        let addr = config.server.bind_address();
        let DependencyContainer {
            health_api,
            cart_api,
            session_api,
            cart,
            scheduler,
        } = container;

        let app = Self::routes(health_api, cart_api, session_api, &format!("http://{}", addr))
            .with(config.cors)
            .with(Tracing);

        let scheduler_task = scheduler.spawn();

        tracing::info!("Server running at http://{}", addr);
        tracing::info!("Swagger UI at http://{}/docs", addr);
        tracing::info!("OpenAPI JSON at http://{}/openapi.json", addr);
        let served = PoemServer::new(TcpListener::bind(&addr))
            .run_with_graceful_shutdown(
                app,
                async {
                    let _ = tokio::signal::ctrl_c().await;
                    tracing::info!("Shutdown requested");
                },
                Some(Duration::from_secs(5)),
            )
            .await;

        cart.dispose();
        if let Err(e) = scheduler_task.await {
            tracing::error!("Sync scheduler task ended abnormally: {}", e);
        }
        served?;
        Ok(())
    }
}

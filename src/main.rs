// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use migration::{Migrator, MigratorTrait};
use photoprint::config::settings::Settings;
use photoprint::domain::services::callback_service::CallbackService;
use photoprint::domain::services::photo_service::PhotoService;
use photoprint::domain::services::webhook_service::{
    AiProcessingService, DatabaseWebhookService,
};
use photoprint::infrastructure::database::connection;
use photoprint::infrastructure::repositories::photo_repo_impl::PhotoRepositoryImpl;
use photoprint::infrastructure::services::ai_processing_service_impl::AiProcessingServiceImpl;
use photoprint::infrastructure::services::database_webhook_service_impl::DatabaseWebhookServiceImpl;
use photoprint::presentation::middleware::rate_limit_middleware::RateLimiter;
use photoprint::presentation::routes::{self, AppState};
use photoprint::utils::telemetry;
use photoprint::workers::webhook_worker::WebhookWorker;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting photoprint...");

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    info!("Configuration loaded");

    if settings.metrics.enabled {
        photoprint::infrastructure::metrics::init_metrics(&settings.metrics.listen);
    }

    // 3. Connect to database
    let db = connection::create_pool(&settings.database).await?;
    let db = Arc::new(db);
    info!("Database connection established");

    // Run database migrations
    info!("Running database migrations...");
    Migrator::up(db.as_ref(), None).await?;
    info!("Database migrations applied");

    // 4. Initialize services
    let database_webhook: Arc<dyn DatabaseWebhookService> =
        Arc::new(DatabaseWebhookServiceImpl::new(&settings.webhooks.database)?);
    if database_webhook.config_status().configured {
        info!("Database webhook configured");
    } else {
        info!("Database webhook URL not set, events will not be delivered");
    }

    let webhook_worker = Arc::new(WebhookWorker::new(database_webhook.clone()));
    let photo_repo = Arc::new(PhotoRepositoryImpl::new(db.clone()));
    let photos = Arc::new(PhotoService::new(photo_repo, webhook_worker));
    let callbacks = Arc::new(CallbackService::new(photos.clone()));
    let ai_processing: Arc<dyn AiProcessingService> = Arc::new(AiProcessingServiceImpl::new(
        settings.webhooks.clone(),
        photos.clone(),
    )?);

    // 5. Initialize Rate Limiter
    let rate_limiter = Arc::new(RateLimiter::from_settings(&settings.rate_limiting));
    let purge_limiter = rate_limiter.clone();
    let purge_every = Duration::from_secs(settings.rate_limiting.window_secs.max(1));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(purge_every);
        loop {
            interval.tick().await;
            purge_limiter.purge_expired();
        }
    });
    info!("Rate limiter initialized");

    // 6. Start HTTP server
    let app = routes::routes(AppState {
        settings: settings.clone(),
        photos,
        callbacks,
        database_webhook,
        ai_processing,
        rate_limiter,
    });

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

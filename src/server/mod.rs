//! Server initialization and routing

use crate::api;
use crate::config::Config;
use crate::jwt::JwtManager;
use crate::middleware::{ObservabilityLayer, SanitizedMakeSpan};
use crate::openapi::ApiDoc;
use crate::repository::{
    admin::AdminRepositoryImpl, funding_application::FundingApplicationRepositoryImpl,
    funding_program::FundingProgramRepositoryImpl, land_inquiry::LandInquiryRepositoryImpl,
    land_listing::LandListingRepositoryImpl, order::OrderRepositoryImpl,
    product::ProductRepositoryImpl, user::UserRepositoryImpl,
};
use crate::service::{
    AdminRepositories, AdminService, FundingService, IdentityService, LandService, OrderService,
    ProductService,
};
use crate::state::HasServices;
use anyhow::Result;
use axum::{
    http::HeaderValue,
    routing::{get, patch, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::{mysql::MySqlPoolOptions, MySqlPool};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db_pool: MySqlPool,
    pub jwt_manager: JwtManager,
    pub identity_service: Arc<IdentityService<UserRepositoryImpl, AdminRepositoryImpl>>,
    pub product_service: Arc<ProductService<ProductRepositoryImpl>>,
    pub land_service: Arc<LandService<LandListingRepositoryImpl, LandInquiryRepositoryImpl>>,
    pub funding_service:
        Arc<FundingService<FundingProgramRepositoryImpl, FundingApplicationRepositoryImpl>>,
    pub order_service: Arc<OrderService<OrderRepositoryImpl, ProductRepositoryImpl>>,
    pub admin_service: Arc<
        AdminService<
            UserRepositoryImpl,
            AdminRepositoryImpl,
            ProductRepositoryImpl,
            LandListingRepositoryImpl,
            FundingProgramRepositoryImpl,
            OrderRepositoryImpl,
        >,
    >,
}

impl AppState {
    /// Wire repositories and services over an existing pool.
    pub fn new(config: Config, db_pool: MySqlPool) -> Result<Self> {
        let user_repo = Arc::new(UserRepositoryImpl::new(db_pool.clone()));
        let admin_repo = Arc::new(AdminRepositoryImpl::new(db_pool.clone()));
        let product_repo = Arc::new(ProductRepositoryImpl::new(db_pool.clone()));
        let land_listing_repo = Arc::new(LandListingRepositoryImpl::new(db_pool.clone()));
        let land_inquiry_repo = Arc::new(LandInquiryRepositoryImpl::new(db_pool.clone()));
        let program_repo = Arc::new(FundingProgramRepositoryImpl::new(db_pool.clone()));
        let application_repo = Arc::new(FundingApplicationRepositoryImpl::new(db_pool.clone()));
        let order_repo = Arc::new(OrderRepositoryImpl::new(db_pool.clone()));

        let jwt_manager = JwtManager::new(config.jwt.clone())?;
        if jwt_manager.uses_rsa() {
            info!("Signing session tokens with RS256");
        }

        let identity_service = Arc::new(IdentityService::new(
            user_repo.clone(),
            admin_repo.clone(),
            jwt_manager.clone(),
        ));
        let product_service = Arc::new(ProductService::new(product_repo.clone()));
        let land_service = Arc::new(LandService::new(
            land_listing_repo.clone(),
            land_inquiry_repo,
        ));
        let funding_service = Arc::new(FundingService::new(
            program_repo.clone(),
            application_repo,
        ));
        let order_service = Arc::new(OrderService::new(order_repo.clone(), product_repo.clone()));
        let admin_service = Arc::new(AdminService::new(AdminRepositories {
            users: user_repo,
            admins: admin_repo,
            products: product_repo,
            land_listings: land_listing_repo,
            programs: program_repo,
            orders: order_repo,
        }));

        Ok(Self {
            config: Arc::new(config),
            db_pool,
            jwt_manager,
            identity_service,
            product_service,
            land_service,
            funding_service,
            order_service,
            admin_service,
        })
    }
}

impl HasServices for AppState {
    type UserRepo = UserRepositoryImpl;
    type AdminRepo = AdminRepositoryImpl;
    type ProductRepo = ProductRepositoryImpl;
    type LandListingRepo = LandListingRepositoryImpl;
    type LandInquiryRepo = LandInquiryRepositoryImpl;
    type FundingProgramRepo = FundingProgramRepositoryImpl;
    type FundingApplicationRepo = FundingApplicationRepositoryImpl;
    type OrderRepo = OrderRepositoryImpl;

    fn config(&self) -> &Config {
        &self.config
    }

    fn jwt_manager(&self) -> &JwtManager {
        &self.jwt_manager
    }

    fn identity_service(&self) -> &IdentityService<Self::UserRepo, Self::AdminRepo> {
        &self.identity_service
    }

    fn product_service(&self) -> &ProductService<Self::ProductRepo> {
        &self.product_service
    }

    fn land_service(&self) -> &LandService<Self::LandListingRepo, Self::LandInquiryRepo> {
        &self.land_service
    }

    fn funding_service(
        &self,
    ) -> &FundingService<Self::FundingProgramRepo, Self::FundingApplicationRepo> {
        &self.funding_service
    }

    fn order_service(&self) -> &OrderService<Self::OrderRepo, Self::ProductRepo> {
        &self.order_service
    }

    fn admin_service(
        &self,
    ) -> &AdminService<
        Self::UserRepo,
        Self::AdminRepo,
        Self::ProductRepo,
        Self::LandListingRepo,
        Self::FundingProgramRepo,
        Self::OrderRepo,
    > {
        &self.admin_service
    }

    async fn check_ready(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(&self.db_pool)
            .await
            .is_ok()
    }
}

/// Open the MySQL pool described by the config.
pub async fn connect_pool(config: &Config) -> Result<MySqlPool> {
    let pool = MySqlPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await?;
    info!("Connected to database");
    Ok(pool)
}

/// Run the HTTP server until ctrl-c.
pub async fn run(config: Config, metrics_handle: Option<PrometheusHandle>) -> Result<()> {
    let db_pool = connect_pool(&config).await?;
    let http_addr = config.http_addr();
    let state = AppState::new(config, db_pool)?;

    let app = build_router(state).merge(
        Router::new()
            .route("/metrics", get(api::metrics::metrics_handler))
            .with_state(Arc::new(metrics_handle)),
    );

    let listener = TcpListener::bind(&http_addr).await?;
    info!("HTTP server started on {}", http_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

/// Build the HTTP router with generic state type
///
/// Works with both the production `AppState` and test states that implement
/// `HasServices`.
pub fn build_router<S: HasServices>(state: S) -> Router {
    let config = state.config();
    let cors = cors_layer(&config.cors_allowed_origins);
    let timeout = Duration::from_secs(config.request_timeout_secs);
    let swagger = !config.is_production();

    let mut router = Router::new()
        // Health endpoints
        .route("/health", get(api::health::health))
        .route("/ready", get(api::health::ready::<S>))
        // Identity
        .route("/api/auth/register", post(api::auth::register::<S>))
        .route("/api/auth/login", post(api::auth::login::<S>))
        .route("/api/auth/me", get(api::auth::me::<S>))
        .route("/api/admin/login", post(api::auth::admin_login::<S>))
        .route("/api/auth/admin/login", post(api::auth::admin_login::<S>))
        // Products
        .route(
            "/api/products",
            get(api::product::list::<S>).post(api::product::create::<S>),
        )
        .route(
            "/api/products/{id}",
            get(api::product::get::<S>)
                .put(api::product::update::<S>)
                .delete(api::product::delete::<S>),
        )
        // Land
        .route(
            "/api/land-listings",
            get(api::land_listing::list::<S>).post(api::land_listing::create::<S>),
        )
        .route(
            "/api/land-listings/{id}",
            get(api::land_listing::get::<S>)
                .put(api::land_listing::update::<S>)
                .delete(api::land_listing::delete::<S>),
        )
        .route("/api/land-inquiries", post(api::land_inquiry::create::<S>))
        .route(
            "/api/land-inquiries/my",
            get(api::land_inquiry::my_inquiries::<S>),
        )
        .route(
            "/api/land-inquiries/owner",
            get(api::land_inquiry::owner_inquiries::<S>),
        )
        .route("/api/land-inquiries/{id}", get(api::land_inquiry::get::<S>))
        .route(
            "/api/land-inquiries/{id}/status",
            patch(api::land_inquiry::update_status::<S>),
        )
        // Funding applications
        .route(
            "/api/funding-applications",
            post(api::funding_application::create::<S>),
        )
        .route(
            "/api/funding-applications/my-applications",
            get(api::funding_application::my_applications::<S>),
        )
        .route(
            "/api/funding-applications/provider-applications",
            get(api::funding_application::provider_applications::<S>),
        )
        .route(
            "/api/funding-applications/program/{program_id}",
            get(api::funding_application::program_applications::<S>),
        )
        .route(
            "/api/funding-applications/{id}",
            get(api::funding_application::get::<S>),
        )
        .route(
            "/api/funding-applications/{id}/status",
            put(api::funding_application::update_status::<S>),
        )
        // Orders
        .route("/api/orders", post(api::order::create::<S>))
        .route("/api/orders/myorders", get(api::order::my_orders::<S>))
        // Admin console
        .route("/api/admin/stats", get(api::admin::stats::<S>))
        .route("/api/admin/users", get(api::admin::list_users::<S>))
        .route(
            "/api/admin/users/{id}",
            put(api::admin::update_user_status::<S>),
        )
        .route("/api/admin/invite", post(api::admin::invite::<S>));

    // Funding programs are served under both prefixes
    for prefix in ["/api/funding-programs", "/api/funding"] {
        router = router
            .route(
                prefix,
                get(api::funding_program::list::<S>).post(api::funding_program::create::<S>),
            )
            .route(
                &format!("{prefix}/{{id}}"),
                get(api::funding_program::get::<S>)
                    .put(api::funding_program::update::<S>)
                    .delete(api::funding_program::delete::<S>),
            );
    }

    let mut app = router
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http().make_span_with(SanitizedMakeSpan))
        .layer(ObservabilityLayer)
        .layer(cors)
        .with_state(state);

    if swagger {
        app = app.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::build()));
    }

    app
}

/// CORS for the configured browser origins. `*` allows any origin.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}

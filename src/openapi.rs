//! OpenAPI 3.0 documentation assembly
//!
//! Swagger UI serves this document outside production.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Voss Core API",
        version = "0.4.0",
        description = "Agricultural marketplace: produce, land, funding and the admin console"
    ),
    tags(
        (name = "System", description = "Health checks"),
        (name = "Identity", description = "Registration, login for both pools, current principal"),
        (name = "Marketplace", description = "Products and orders"),
        (name = "Land", description = "Land listings and inquiries"),
        (name = "Funding", description = "Funding programs and applications"),
        (name = "Admin", description = "Admin console"),
    ),
    components(
        schemas(
            // ── Shared ─────────────────────────────────────────────────
            crate::api::PaginationQuery,
            crate::api::PaginationMeta,
            crate::domain::StringUuid,

            // ── Identity ───────────────────────────────────────────────
            crate::domain::Role,
            crate::domain::SessionKind,
            crate::domain::Principal,
            crate::domain::User,
            crate::domain::Contact,
            crate::domain::RegisterInput,
            crate::domain::LoginInput,
            crate::domain::AuthResponse,

            // ── Marketplace ────────────────────────────────────────────
            crate::domain::Product,
            crate::domain::CreateProductInput,
            crate::domain::UpdateProductInput,
            crate::domain::Order,
            crate::domain::OrderStatus,
            crate::domain::OrderItem,
            crate::domain::ProductSummary,
            crate::domain::OrderLine,
            crate::domain::OrderWithItems,
            crate::domain::OrderItemInput,
            crate::domain::CreateOrderInput,

            // ── Land ───────────────────────────────────────────────────
            crate::domain::LandType,
            crate::domain::LandListing,
            crate::domain::CreateLandListingInput,
            crate::domain::UpdateLandListingInput,
            crate::domain::InquiryStatus,
            crate::domain::LandInquiry,
            crate::domain::InquiryLand,
            crate::domain::LandInquiryView,
            crate::domain::CreateInquiryInput,
            crate::domain::UpdateInquiryStatusInput,

            // ── Funding ────────────────────────────────────────────────
            crate::domain::FundingType,
            crate::domain::FundingProgram,
            crate::domain::CreateFundingProgramInput,
            crate::domain::UpdateFundingProgramInput,
            crate::domain::ApplicationStatus,
            crate::domain::FundingApplication,
            crate::domain::ProgramSummary,
            crate::domain::FundingApplicationView,
            crate::domain::CreateApplicationInput,
            crate::domain::UpdateApplicationStatusInput,

            // ── Admin ──────────────────────────────────────────────────
            crate::domain::Admin,
            crate::domain::InviteAdminInput,
            crate::domain::InvitedAdmin,
            crate::domain::UpdateUserStatusInput,
            crate::domain::UserStats,
            crate::domain::ContentStats,
            crate::domain::FinancialStats,
            crate::domain::SystemStats,

            crate::api::health::HealthResponse,
        ),
    ),
    paths(
        crate::api::health::health,
        crate::api::health::ready,

        crate::api::auth::register,
        crate::api::auth::login,
        crate::api::auth::admin_login,
        crate::api::auth::me,

        crate::api::product::list,
        crate::api::product::get,
        crate::api::product::create,
        crate::api::product::update,
        crate::api::product::delete,

        crate::api::land_listing::list,
        crate::api::land_listing::get,
        crate::api::land_listing::create,
        crate::api::land_listing::update,
        crate::api::land_listing::delete,

        crate::api::land_inquiry::create,
        crate::api::land_inquiry::my_inquiries,
        crate::api::land_inquiry::owner_inquiries,
        crate::api::land_inquiry::get,
        crate::api::land_inquiry::update_status,

        crate::api::funding_program::list,
        crate::api::funding_program::get,
        crate::api::funding_program::create,
        crate::api::funding_program::update,
        crate::api::funding_program::delete,

        crate::api::funding_application::create,
        crate::api::funding_application::my_applications,
        crate::api::funding_application::provider_applications,
        crate::api::funding_application::program_applications,
        crate::api::funding_application::get,
        crate::api::funding_application::update_status,

        crate::api::order::create,
        crate::api::order::my_orders,

        crate::api::admin::stats,
        crate::api::admin::list_users,
        crate::api::admin::update_user_status,
        crate::api::admin::invite,
    ),
)]
pub struct ApiDoc;

impl ApiDoc {
    /// The generated document plus the `bearer_jwt` security scheme.
    pub fn build() -> utoipa::openapi::OpenApi {
        let mut doc = Self::openapi();
        if let Some(c) = doc.components.as_mut() {
            c.security_schemes.insert(
                "bearer_jwt".to_string(),
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::Http::new(
                        utoipa::openapi::security::HttpAuthScheme::Bearer,
                    ),
                ),
            );
        }
        doc
    }
}

//! Application state traits for dependency injection
//!
//! Handlers are generic over `HasServices`, so the same router runs against
//! the production `AppState` or an in-memory test state.

use crate::config::Config;
use crate::jwt::JwtManager;
use crate::repository::{
    AdminRepository, FundingApplicationRepository, FundingProgramRepository,
    LandInquiryRepository, LandListingRepository, OrderRepository, ProductRepository,
    UserRepository,
};
use crate::service::{
    AdminService, FundingService, IdentityService, LandService, OrderService, ProductService,
};

/// Trait for application state that provides access to all services.
pub trait HasServices: Clone + Send + Sync + 'static {
    /// User pool repository
    type UserRepo: UserRepository;
    /// Admin pool repository
    type AdminRepo: AdminRepository;
    type ProductRepo: ProductRepository;
    type LandListingRepo: LandListingRepository;
    type LandInquiryRepo: LandInquiryRepository;
    type FundingProgramRepo: FundingProgramRepository;
    type FundingApplicationRepo: FundingApplicationRepository;
    type OrderRepo: OrderRepository;

    /// Get the application configuration
    fn config(&self) -> &Config;

    /// Get the JWT manager
    fn jwt_manager(&self) -> &JwtManager;

    /// Session resolver and login flows for both pools
    fn identity_service(&self) -> &IdentityService<Self::UserRepo, Self::AdminRepo>;

    fn product_service(&self) -> &ProductService<Self::ProductRepo>;

    fn land_service(&self) -> &LandService<Self::LandListingRepo, Self::LandInquiryRepo>;

    fn funding_service(
        &self,
    ) -> &FundingService<Self::FundingProgramRepo, Self::FundingApplicationRepo>;

    fn order_service(&self) -> &OrderService<Self::OrderRepo, Self::ProductRepo>;

    fn admin_service(
        &self,
    ) -> &AdminService<
        Self::UserRepo,
        Self::AdminRepo,
        Self::ProductRepo,
        Self::LandListingRepo,
        Self::FundingProgramRepo,
        Self::OrderRepo,
    >;

    /// Check if the database is reachable
    fn check_ready(&self) -> impl std::future::Future<Output = bool> + Send;
}

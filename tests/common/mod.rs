//! Shared test infrastructure
//!
//! In-memory repositories and a `TestAppState` that implements `HasServices`,
//! so HTTP tests drive the production router without a database.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceExt;
use voss_core::config::{Config, DatabaseConfig, JwtConfig, TelemetryConfig};
use voss_core::domain::{
    Admin, ApplicationStatus, Contact, FundingApplication, FundingApplicationView,
    FundingProgram, FundingProgramQuery, InquiryLand, InquiryStatus, LandInquiry,
    LandInquiryView, LandListing, LandListingQuery, NewAdmin, NewUser, Order, OrderItem,
    OrderLine, OrderWithItems, Principal, Product, ProductQuery, ProductSummary, Role,
    StringUuid, User,
};
use voss_core::error::{AppError, Result};
use voss_core::jwt::JwtManager;
use voss_core::repository::funding_application::DUPLICATE_APPLICATION;
use voss_core::repository::{
    AdminRepository, FundingApplicationRepository, FundingProgramRepository,
    LandInquiryRepository, LandListingRepository, OrderRepository, ProductRepository,
    UserRepository,
};
use voss_core::server::build_router;
use voss_core::service::identity::hash_password;
use voss_core::service::{
    AdminRepositories, AdminService, FundingService, IdentityService, LandService, OrderService,
    ProductService,
};
use voss_core::state::HasServices;

pub const TEST_PASSWORD: &str = "correct-horse";

pub fn test_config() -> Config {
    Config {
        http_host: "127.0.0.1".to_string(),
        http_port: 0,
        environment: "test".to_string(),
        database: DatabaseConfig {
            url: "mysql://localhost/voss_test".to_string(),
            max_connections: 1,
            min_connections: 1,
        },
        jwt: JwtConfig {
            secret: "test-secret-key-for-api-testing-purposes".to_string(),
            issuer: "https://voss.test".to_string(),
            token_ttl_secs: 3600,
            private_key_pem: None,
            public_key_pem: None,
        },
        cors_allowed_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        telemetry: TelemetryConfig::default(),
    }
}

fn not_found(what: &str) -> AppError {
    AppError::NotFound(format!("{} not found", what))
}

// ============================================================================
// In-memory repositories
// ============================================================================

#[derive(Default)]
pub struct TestUserRepository {
    users: RwLock<Vec<User>>,
}

impl TestUserRepository {
    pub async fn add_user(&self, user: User) {
        self.users.write().await.push(user);
    }

    async fn contact(&self, id: StringUuid) -> Option<Contact> {
        self.users
            .read()
            .await
            .iter()
            .find(|u| u.id == id)
            .map(Contact::from)
    }
}

#[async_trait]
impl UserRepository for TestUserRepository {
    async fn create(&self, input: &NewUser) -> Result<User> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == input.email) {
            return Err(AppError::Conflict("User already exists".to_string()));
        }
        let user = User {
            name: input.name.clone(),
            email: input.email.clone(),
            password_hash: input.password_hash.clone(),
            role: input.role,
            region: input.region.clone(),
            phone: input.phone.clone(),
            ..Default::default()
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<User>> {
        Ok(self.users.read().await.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<User>> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .rev()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.users.read().await.len() as i64)
    }

    async fn count_by_role(&self, role: Role) -> Result<i64> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .filter(|u| u.role == role)
            .count() as i64)
    }

    async fn update_verified(&self, id: StringUuid, is_verified: bool) -> Result<User> {
        let mut users = self.users.write().await;
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| not_found("User"))?;
        user.is_verified = is_verified;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }
}

#[derive(Default)]
pub struct TestAdminRepository {
    admins: RwLock<Vec<Admin>>,
}

impl TestAdminRepository {
    pub async fn add_admin(&self, admin: Admin) {
        self.admins.write().await.push(admin);
    }

    pub async fn find(&self, id: StringUuid) -> Option<Admin> {
        self.admins.read().await.iter().find(|a| a.id == id).cloned()
    }
}

#[async_trait]
impl AdminRepository for TestAdminRepository {
    async fn create(&self, input: &NewAdmin) -> Result<Admin> {
        let mut admins = self.admins.write().await;
        if admins.iter().any(|a| a.email == input.email) {
            return Err(AppError::Conflict(
                "An admin with this email already exists.".to_string(),
            ));
        }
        let admin = Admin {
            name: input.name.clone(),
            email: input.email.clone(),
            password_hash: input.password_hash.clone(),
            role: input.role,
            permissions: input.permissions.clone(),
            ..Default::default()
        };
        admins.push(admin.clone());
        Ok(admin)
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Admin>> {
        Ok(self.find(id).await)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Admin>> {
        Ok(self
            .admins
            .read()
            .await
            .iter()
            .find(|a| a.email == email)
            .cloned())
    }

    async fn touch_last_login(&self, id: StringUuid) -> Result<()> {
        if let Some(admin) = self.admins.write().await.iter_mut().find(|a| a.id == id) {
            admin.last_login = Some(Utc::now());
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct TestProductRepository {
    products: RwLock<Vec<Product>>,
}

impl TestProductRepository {
    pub async fn add_product(&self, product: Product) {
        self.products.write().await.push(product);
    }

    pub async fn find(&self, id: StringUuid) -> Option<Product> {
        self.products.read().await.iter().find(|p| p.id == id).cloned()
    }
}

#[async_trait]
impl ProductRepository for TestProductRepository {
    async fn create(&self, product: &Product) -> Result<Product> {
        self.products.write().await.push(product.clone());
        Ok(product.clone())
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Product>> {
        Ok(self.find(id).await)
    }

    async fn list(&self, query: &ProductQuery) -> Result<Vec<Product>> {
        Ok(self
            .products
            .read()
            .await
            .iter()
            .rev()
            .filter(|p| query.matches(p))
            .cloned()
            .collect())
    }

    async fn update(&self, product: &Product) -> Result<Product> {
        let mut products = self.products.write().await;
        let slot = products
            .iter_mut()
            .find(|p| p.id == product.id)
            .ok_or_else(|| not_found("Product"))?;
        *slot = product.clone();
        Ok(product.clone())
    }

    async fn delete(&self, id: StringUuid) -> Result<()> {
        self.products.write().await.retain(|p| p.id != id);
        Ok(())
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.products.read().await.len() as i64)
    }
}

#[derive(Default)]
pub struct TestLandListingRepository {
    listings: RwLock<Vec<LandListing>>,
}

impl TestLandListingRepository {
    pub async fn add_listing(&self, listing: LandListing) {
        self.listings.write().await.push(listing);
    }

    async fn find(&self, land_id: StringUuid) -> Option<LandListing> {
        self.listings
            .read()
            .await
            .iter()
            .find(|l| l.id == land_id)
            .cloned()
    }
}

#[async_trait]
impl LandListingRepository for TestLandListingRepository {
    async fn create(&self, listing: &LandListing) -> Result<LandListing> {
        self.listings.write().await.push(listing.clone());
        Ok(listing.clone())
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<LandListing>> {
        Ok(self
            .listings
            .read()
            .await
            .iter()
            .find(|l| l.id == id)
            .cloned())
    }

    async fn list(&self, query: &LandListingQuery) -> Result<Vec<LandListing>> {
        Ok(self
            .listings
            .read()
            .await
            .iter()
            .rev()
            .filter(|l| query.matches(l))
            .cloned()
            .collect())
    }

    async fn update(&self, listing: &LandListing) -> Result<LandListing> {
        let mut listings = self.listings.write().await;
        let slot = listings
            .iter_mut()
            .find(|l| l.id == listing.id)
            .ok_or_else(|| not_found("Listing"))?;
        *slot = listing.clone();
        Ok(listing.clone())
    }

    async fn delete(&self, id: StringUuid) -> Result<()> {
        self.listings.write().await.retain(|l| l.id != id);
        Ok(())
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.listings.read().await.len() as i64)
    }
}

pub struct TestLandInquiryRepository {
    inquiries: RwLock<Vec<LandInquiry>>,
    listings: Arc<TestLandListingRepository>,
    users: Arc<TestUserRepository>,
}

impl TestLandInquiryRepository {
    pub fn new(listings: Arc<TestLandListingRepository>, users: Arc<TestUserRepository>) -> Self {
        Self {
            inquiries: RwLock::new(vec![]),
            listings,
            users,
        }
    }

    async fn view(&self, inquiry: LandInquiry) -> LandInquiryView {
        let land = match self.listings.find(inquiry.land_id).await {
            Some(listing) => {
                let owner = self.users.contact(listing.owner_id).await;
                Some(InquiryLand::new(&listing, owner))
            }
            None => None,
        };
        let buyer = self.users.contact(inquiry.buyer_id).await;
        LandInquiryView {
            inquiry,
            land,
            buyer,
        }
    }
}

#[async_trait]
impl LandInquiryRepository for TestLandInquiryRepository {
    async fn create(&self, inquiry: &LandInquiry) -> Result<LandInquiry> {
        self.inquiries.write().await.push(inquiry.clone());
        Ok(inquiry.clone())
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<LandInquiry>> {
        Ok(self
            .inquiries
            .read()
            .await
            .iter()
            .find(|i| i.id == id)
            .cloned())
    }

    async fn list_by_buyer(&self, buyer_id: StringUuid) -> Result<Vec<LandInquiryView>> {
        let inquiries = self.inquiries.read().await.clone();
        let mut views = Vec::new();
        for inquiry in inquiries.into_iter().rev() {
            if inquiry.buyer_id == buyer_id {
                views.push(self.view(inquiry).await);
            }
        }
        Ok(views)
    }

    async fn list_by_land_owner(&self, owner_id: StringUuid) -> Result<Vec<LandInquiryView>> {
        let inquiries = self.inquiries.read().await.clone();
        let mut views = Vec::new();
        for inquiry in inquiries.into_iter().rev() {
            let owner = self.listings.find(inquiry.land_id).await.map(|l| l.owner_id);
            if owner == Some(owner_id) {
                views.push(self.view(inquiry).await);
            }
        }
        Ok(views)
    }

    async fn update_status(&self, id: StringUuid, status: InquiryStatus) -> Result<LandInquiry> {
        let mut inquiries = self.inquiries.write().await;
        let inquiry = inquiries
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| not_found("Inquiry"))?;
        inquiry.status = status;
        inquiry.updated_at = Utc::now();
        Ok(inquiry.clone())
    }
}

#[derive(Default)]
pub struct TestFundingProgramRepository {
    programs: RwLock<Vec<FundingProgram>>,
}

impl TestFundingProgramRepository {
    pub async fn add_program(&self, program: FundingProgram) {
        self.programs.write().await.push(program);
    }

    async fn find(&self, program_id: StringUuid) -> Option<FundingProgram> {
        self.programs
            .read()
            .await
            .iter()
            .find(|p| p.id == program_id)
            .cloned()
    }
}

#[async_trait]
impl FundingProgramRepository for TestFundingProgramRepository {
    async fn create(&self, program: &FundingProgram) -> Result<FundingProgram> {
        self.programs.write().await.push(program.clone());
        Ok(program.clone())
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<FundingProgram>> {
        Ok(self
            .programs
            .read()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn list(&self, query: &FundingProgramQuery) -> Result<Vec<FundingProgram>> {
        Ok(self
            .programs
            .read()
            .await
            .iter()
            .rev()
            .filter(|p| query.matches(p))
            .cloned()
            .collect())
    }

    async fn update(&self, program: &FundingProgram) -> Result<FundingProgram> {
        let mut programs = self.programs.write().await;
        let slot = programs
            .iter_mut()
            .find(|p| p.id == program.id)
            .ok_or_else(|| not_found("Program"))?;
        *slot = program.clone();
        Ok(program.clone())
    }

    async fn delete(&self, id: StringUuid) -> Result<()> {
        self.programs.write().await.retain(|p| p.id != id);
        Ok(())
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.programs.read().await.len() as i64)
    }
}

pub struct TestFundingApplicationRepository {
    applications: RwLock<Vec<FundingApplication>>,
    programs: Arc<TestFundingProgramRepository>,
    users: Arc<TestUserRepository>,
}

impl TestFundingApplicationRepository {
    pub fn new(programs: Arc<TestFundingProgramRepository>, users: Arc<TestUserRepository>) -> Self {
        Self {
            applications: RwLock::new(vec![]),
            programs,
            users,
        }
    }

    pub async fn len(&self) -> usize {
        self.applications.read().await.len()
    }

    /// Newest first, joined with program and applicant.
    async fn views_where<F>(&self, keep: F) -> Vec<FundingApplicationView>
    where
        F: Fn(&FundingApplication, Option<&FundingProgram>) -> bool,
    {
        let applications = self.applications.read().await.clone();
        let mut views = Vec::new();
        for application in applications.into_iter().rev() {
            let program = self.programs.find(application.program_id).await;
            if !keep(&application, program.as_ref()) {
                continue;
            }
            let applicant = self.users.contact(application.applicant_id).await;
            views.push(FundingApplicationView {
                program: program.as_ref().map(Into::into),
                applicant,
                application,
            });
        }
        views
    }
}

#[async_trait]
impl FundingApplicationRepository for TestFundingApplicationRepository {
    async fn create(&self, application: &FundingApplication) -> Result<FundingApplication> {
        let mut applications = self.applications.write().await;
        if applications.iter().any(|a| {
            a.program_id == application.program_id && a.applicant_id == application.applicant_id
        }) {
            return Err(AppError::Conflict(DUPLICATE_APPLICATION.to_string()));
        }
        applications.push(application.clone());
        Ok(application.clone())
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<FundingApplication>> {
        Ok(self
            .applications
            .read()
            .await
            .iter()
            .find(|a| a.id == id)
            .cloned())
    }

    async fn find_by_program_and_applicant(
        &self,
        program_id: StringUuid,
        applicant_id: StringUuid,
    ) -> Result<Option<FundingApplication>> {
        Ok(self
            .applications
            .read()
            .await
            .iter()
            .find(|a| a.program_id == program_id && a.applicant_id == applicant_id)
            .cloned())
    }

    async fn list_by_applicant(
        &self,
        applicant_id: StringUuid,
    ) -> Result<Vec<FundingApplicationView>> {
        Ok(self
            .views_where(|a, _| a.applicant_id == applicant_id)
            .await)
    }

    async fn list_by_program(&self, program_id: StringUuid) -> Result<Vec<FundingApplicationView>> {
        Ok(self.views_where(|a, _| a.program_id == program_id).await)
    }

    async fn list_by_provider(
        &self,
        provider_id: StringUuid,
    ) -> Result<Vec<FundingApplicationView>> {
        Ok(self
            .views_where(|_, p| p.is_some_and(|p| p.provider_id == provider_id))
            .await)
    }

    async fn update_status(
        &self,
        id: StringUuid,
        status: ApplicationStatus,
        reviewed_at: DateTime<Utc>,
    ) -> Result<FundingApplication> {
        let mut applications = self.applications.write().await;
        let application = applications
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| not_found("Application"))?;
        application.status = status;
        application.reviewed_at = Some(reviewed_at);
        application.updated_at = Utc::now();
        Ok(application.clone())
    }
}

pub struct TestOrderRepository {
    orders: RwLock<Vec<(Order, Vec<OrderItem>)>>,
    products: Arc<TestProductRepository>,
}

impl TestOrderRepository {
    pub fn new(products: Arc<TestProductRepository>) -> Self {
        Self {
            orders: RwLock::new(vec![]),
            products,
        }
    }

    pub async fn len(&self) -> usize {
        self.orders.read().await.len()
    }

    async fn with_lines(&self, order: Order, items: Vec<OrderItem>) -> OrderWithItems {
        let mut lines = Vec::with_capacity(items.len());
        for item in items {
            let product = self.products.find(item.product_id).await.map(|p| ProductSummary {
                name: p.name,
                images: p.images,
            });
            lines.push(OrderLine { item, product });
        }
        OrderWithItems {
            order,
            items: lines,
        }
    }
}

#[async_trait]
impl OrderRepository for TestOrderRepository {
    async fn create(&self, order: &Order, items: &[OrderItem]) -> Result<OrderWithItems> {
        self.orders
            .write()
            .await
            .push((order.clone(), items.to_vec()));
        Ok(self.with_lines(order.clone(), items.to_vec()).await)
    }

    async fn list_by_buyer(&self, buyer_id: StringUuid) -> Result<Vec<OrderWithItems>> {
        let orders = self.orders.read().await.clone();
        let mut result = Vec::new();
        for (order, items) in orders.into_iter().rev() {
            if order.buyer_id == buyer_id {
                result.push(self.with_lines(order, items).await);
            }
        }
        Ok(result)
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.orders.read().await.len() as i64)
    }

    async fn total_revenue(&self) -> Result<f64> {
        Ok(self
            .orders
            .read()
            .await
            .iter()
            .map(|(order, _)| order.total_amount)
            .sum())
    }
}

// ============================================================================
// Test application state
// ============================================================================

#[derive(Clone)]
pub struct TestAppState {
    pub config: Arc<Config>,
    pub jwt_manager: JwtManager,
    pub identity_service: Arc<IdentityService<TestUserRepository, TestAdminRepository>>,
    pub product_service: Arc<ProductService<TestProductRepository>>,
    pub land_service: Arc<LandService<TestLandListingRepository, TestLandInquiryRepository>>,
    pub funding_service:
        Arc<FundingService<TestFundingProgramRepository, TestFundingApplicationRepository>>,
    pub order_service: Arc<OrderService<TestOrderRepository, TestProductRepository>>,
    pub admin_service: Arc<
        AdminService<
            TestUserRepository,
            TestAdminRepository,
            TestProductRepository,
            TestLandListingRepository,
            TestFundingProgramRepository,
            TestOrderRepository,
        >,
    >,
    // Raw repositories for test setup
    pub user_repo: Arc<TestUserRepository>,
    pub admin_repo: Arc<TestAdminRepository>,
    pub product_repo: Arc<TestProductRepository>,
    pub land_listing_repo: Arc<TestLandListingRepository>,
    pub land_inquiry_repo: Arc<TestLandInquiryRepository>,
    pub program_repo: Arc<TestFundingProgramRepository>,
    pub application_repo: Arc<TestFundingApplicationRepository>,
    pub order_repo: Arc<TestOrderRepository>,
}

impl TestAppState {
    pub fn new() -> Self {
        let config = test_config();
        let jwt_manager = JwtManager::new(config.jwt.clone()).unwrap();

        let user_repo = Arc::new(TestUserRepository::default());
        let admin_repo = Arc::new(TestAdminRepository::default());
        let product_repo = Arc::new(TestProductRepository::default());
        let land_listing_repo = Arc::new(TestLandListingRepository::default());
        let land_inquiry_repo = Arc::new(TestLandInquiryRepository::new(
            land_listing_repo.clone(),
            user_repo.clone(),
        ));
        let program_repo = Arc::new(TestFundingProgramRepository::default());
        let application_repo = Arc::new(TestFundingApplicationRepository::new(
            program_repo.clone(),
            user_repo.clone(),
        ));
        let order_repo = Arc::new(TestOrderRepository::new(product_repo.clone()));

        Self {
            config: Arc::new(config),
            identity_service: Arc::new(IdentityService::new(
                user_repo.clone(),
                admin_repo.clone(),
                jwt_manager.clone(),
            )),
            product_service: Arc::new(ProductService::new(product_repo.clone())),
            land_service: Arc::new(LandService::new(
                land_listing_repo.clone(),
                land_inquiry_repo.clone(),
            )),
            funding_service: Arc::new(FundingService::new(
                program_repo.clone(),
                application_repo.clone(),
            )),
            order_service: Arc::new(OrderService::new(
                order_repo.clone(),
                product_repo.clone(),
            )),
            admin_service: Arc::new(AdminService::new(AdminRepositories {
                users: user_repo.clone(),
                admins: admin_repo.clone(),
                products: product_repo.clone(),
                land_listings: land_listing_repo.clone(),
                programs: program_repo.clone(),
                orders: order_repo.clone(),
            })),
            jwt_manager,
            user_repo,
            admin_repo,
            product_repo,
            land_listing_repo,
            land_inquiry_repo,
            program_repo,
            application_repo,
            order_repo,
        }
    }

    pub fn router(&self) -> Router {
        build_router(self.clone())
    }

    /// Seed a User-pool principal and return a valid session token for it.
    pub async fn seed_user(&self, role: Role) -> (User, String) {
        let id = StringUuid::new_v4();
        let user = User {
            id,
            name: format!("{} {}", role, &id.to_string()[..8]),
            email: format!("{}-{}@example.com", role, id),
            password_hash: hash_password(TEST_PASSWORD).unwrap(),
            role,
            region: Some("Ashanti".to_string()),
            is_verified: true,
            ..Default::default()
        };
        self.user_repo.add_user(user.clone()).await;
        let token = self.token_for(&user.clone().into());
        (user, token)
    }

    /// Seed an Admin-pool principal and return a valid session token for it.
    pub async fn seed_admin(&self, role: Role) -> (Admin, String) {
        let id = StringUuid::new_v4();
        let admin = Admin {
            id,
            name: format!("{} {}", role, &id.to_string()[..8]),
            email: format!("{}-{}@voss.test", role, id),
            password_hash: hash_password(TEST_PASSWORD).unwrap(),
            role,
            permissions: role.default_permissions(),
            ..Default::default()
        };
        self.admin_repo.add_admin(admin.clone()).await;
        let token = self.token_for(&admin.clone().into());
        (admin, token)
    }

    pub fn token_for(&self, principal: &Principal) -> String {
        self.jwt_manager.create_session_token(principal).unwrap()
    }
}

impl HasServices for TestAppState {
    type UserRepo = TestUserRepository;
    type AdminRepo = TestAdminRepository;
    type ProductRepo = TestProductRepository;
    type LandListingRepo = TestLandListingRepository;
    type LandInquiryRepo = TestLandInquiryRepository;
    type FundingProgramRepo = TestFundingProgramRepository;
    type FundingApplicationRepo = TestFundingApplicationRepository;
    type OrderRepo = TestOrderRepository;

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
        true
    }
}

// ============================================================================
// HTTP helpers
// ============================================================================

/// Send a request through the router and parse the JSON body, if any.
pub async fn send(
    app: &Router,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap_or_default();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

pub async fn get(app: &Router, path: &str, token: Option<&str>) -> (StatusCode, Value) {
    send(app, Method::GET, path, token, None).await
}

pub async fn post<T: Serialize>(
    app: &Router,
    path: &str,
    token: Option<&str>,
    body: &T,
) -> (StatusCode, Value) {
    send(app, Method::POST, path, token, Some(serde_json::to_value(body).unwrap())).await
}

pub async fn put<T: Serialize>(
    app: &Router,
    path: &str,
    token: Option<&str>,
    body: &T,
) -> (StatusCode, Value) {
    send(app, Method::PUT, path, token, Some(serde_json::to_value(body).unwrap())).await
}

pub async fn patch<T: Serialize>(
    app: &Router,
    path: &str,
    token: Option<&str>,
    body: &T,
) -> (StatusCode, Value) {
    send(app, Method::PATCH, path, token, Some(serde_json::to_value(body).unwrap())).await
}

pub async fn delete(app: &Router, path: &str, token: Option<&str>) -> (StatusCode, Value) {
    send(app, Method::DELETE, path, token, None).await
}

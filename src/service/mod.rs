//! Business logic layer

pub mod admin;
pub mod funding;
pub mod identity;
pub mod land;
pub mod order;
pub mod product;

pub use admin::{AdminRepositories, AdminService};
pub use funding::FundingService;
pub use identity::IdentityService;
pub use land::LandService;
pub use order::OrderService;
pub use product::ProductService;

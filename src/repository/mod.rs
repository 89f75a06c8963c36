//! Data access layer (Repository pattern)

pub mod admin;
pub mod funding_application;
pub mod funding_program;
pub mod land_inquiry;
pub mod land_listing;
pub mod order;
pub mod product;
pub mod user;

pub use admin::AdminRepository;
pub use funding_application::FundingApplicationRepository;
pub use funding_program::FundingProgramRepository;
pub use land_inquiry::LandInquiryRepository;
pub use land_listing::LandListingRepository;
pub use order::OrderRepository;
pub use product::ProductRepository;
pub use user::UserRepository;

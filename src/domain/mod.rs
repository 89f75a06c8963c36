//! Domain models for Voss Core

pub mod admin;
pub mod common;
pub mod funding;
pub mod land;
pub mod order;
pub mod principal;
pub mod product;
pub mod session;
pub mod user;

pub use admin::*;
pub use common::*;
pub use funding::*;
pub use land::*;
pub use order::*;
pub use principal::*;
pub use product::*;
pub use session::*;
pub use user::*;

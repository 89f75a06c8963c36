//! HTTP middleware: bearer authentication, request observability and
//! log-safe trace spans

pub mod auth;
pub mod metrics;
pub mod trace;

pub use auth::AuthPrincipal;
pub use metrics::ObservabilityLayer;
pub use trace::SanitizedMakeSpan;

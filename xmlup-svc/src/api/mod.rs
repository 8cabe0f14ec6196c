//! HTTP API handlers for xmlup-svc

pub mod buildinfo;
pub mod correct;
pub mod health;

pub use buildinfo::{buildinfo_routes, get_build_info};
pub use correct::{correct_routes, correct_upload};
pub use health::{health_check, health_routes};

//! Endpoint families beyond plain CRUD

mod auth;
mod dashboard;
mod loads;

pub use auth::AuthService;
pub use dashboard::DashboardService;
pub use loads::LoadActions;

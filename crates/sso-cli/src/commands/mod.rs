pub mod check_config;
pub mod dispatch;
pub mod resolve;
pub mod schema;

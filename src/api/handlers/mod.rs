//! HTTP request handlers.

pub mod auth_handler;
pub mod job_handler;
pub mod order_handler;
pub mod pricing_handler;
pub mod template_handler;
pub mod upload_handler;
pub mod user_handler;
pub mod voucher_handler;

pub use auth_handler::auth_routes;
pub use job_handler::job_routes;
pub use order_handler::order_routes;
pub use pricing_handler::{pricing_admin_routes, pricing_public_routes};
pub use template_handler::template_routes;
pub use upload_handler::upload_routes;
pub use user_handler::user_routes;
pub use voucher_handler::{voucher_admin_routes, voucher_public_routes};

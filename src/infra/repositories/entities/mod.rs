//! SeaORM entity definitions.
//!
//! One module per table. Each module also provides the conversion from
//! its `Model` into the corresponding domain type.

pub mod design_package_order;
pub mod email_template;
pub mod file_upload;
pub mod job;
pub mod message;
pub mod payment;
pub mod pricing_tier;
pub mod product_pricing;
pub mod user;
pub mod voucher_code;

//! Domain layer - Core business entities and logic
//!
//! Business concepts of the design-studio portal, independent of
//! infrastructure concerns. Contains entities, value objects, and the
//! pure calculations (quotes, discounts, lifecycle rules) shared by
//! services and tests.

pub mod email_template;
pub mod job;
pub mod message;
pub mod order;
pub mod password;
pub mod payment;
pub mod pricing;
pub mod upload;
pub mod user;
pub mod voucher;

pub use email_template::{EmailTemplate, RenderedEmail, TemplateResponse};
pub use job::{Job, JobResponse, JobStatus};
pub use message::{Message, MessageResponse as JobMessageResponse};
pub use order::{DesignPackageOrder, OrderResponse, OrderStatus};
pub use password::Password;
pub use payment::{Payment, PaymentResponse, PaymentStatus};
pub use pricing::{compute_quote, PricingTier, ProductPricing, ProductResponse, Quote, TierResponse};
pub use upload::{draft_file_key, job_file_key, sanitize_file_name, FileUpload, UploadResponse};
pub use user::{Actor, User, UserResponse, UserRole};
pub use voucher::{DiscountKind, Voucher, VoucherResponse};

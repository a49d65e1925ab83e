//! Background jobs.
//!
//! Queued email delivery (apalis Postgres storage) and the scheduled
//! draft cleanup sweep.

mod draft_cleanup;
mod email_job;
mod queue;

pub use draft_cleanup::{draft_cleanup_handler, CleanupContext, CleanupTick, SweepOutcome};
pub use email_job::{email_job_handler, EmailJob};
pub use queue::{EmailQueue, PostgresEmailQueue};

#[cfg(any(test, feature = "test-utils"))]
pub use queue::MockEmailQueue;

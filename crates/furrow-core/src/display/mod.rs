//! Display formatting for plans, tasks and operation results.
//!
//! Domain models implement [`std::fmt::Display`] directly (see [`models`]);
//! this module adds newtype wrappers for collections and operation results
//! so the same data can be rendered differently per context. All output is
//! markdown, which the CLI renders for the terminal.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │ Wrappers        │    │   Markdown      │
//! │  (Plan, Task)   │───▶│ & Result Types  │───▶│    Output       │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`collections`]: PlanSummaries, TaskList, Notifications and the agenda
//! - [`results`]: CreateResult, UpdateResult, DeleteResult
//! - [`status`]: One-line confirmations (OperationStatus)
//! - [`datetime`]: Timestamp formatting in a chosen time zone
//! - [`models`]: Display implementations for domain models
//!
//! ```rust
//! use furrow_core::display::OperationStatus;
//!
//! let status = OperationStatus::swept(2);
//! assert_eq!(status.to_string(), "Success: Removed 2 expired plans.\n");
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;
pub mod status;

pub use collections::{Notifications, PlanSummaries, TaskList};
pub use datetime::LocalDateTime;
pub use models::PlanDetails;
pub use results::{CreateResult, DeleteResult, UpdateResult};
pub use status::OperationStatus;

//! # lifelink-service
//!
//! Business logic service layer for LifeLink. Each service orchestrates
//! repositories, the matching engine, and notification dispatch to
//! implement application-level use cases.
//!
//! Services follow constructor injection — all dependencies are provided
//! at construction time via `Arc` references.

pub mod context;
pub mod matching;
pub mod notification;
pub mod request;
pub mod user;

pub use context::RequestContext;
pub use matching::DonorMatcher;
pub use notification::{DispatchReport, NotificationDispatcher, NotificationService};
pub use request::RequestService;
pub use user::UserService;

//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;


pub use handlers::{AuthAppState, AuthStore};
pub use middleware::{AuthenticatedUser, require_bearer_token};
pub use router::{users_router, users_router_generic};

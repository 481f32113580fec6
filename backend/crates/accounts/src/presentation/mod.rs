//! Presentation Layer
//!
//! HTTP handlers, DTOs and router. This is the thin inbound surface the
//! HTTP collaborator consumes; token verification is not done here.

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::AccountsAppState;
pub use router::{accounts_router, accounts_router_generic};

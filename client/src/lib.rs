//! Client library for the market ledger service.
//!
//! Vendors log daily revenue and clock-in/clock-out attendance against a
//! remote ledger. This crate provides the remote boundary ([`api`]), a
//! durable TTL cache for reference data ([`cache`]), an explicit session
//! context ([`session`]), and the pure business-rule computations
//! ([`domain`]): rent resolution, attendance hours, and revenue summaries.

pub mod api;
pub mod cache;
pub mod domain;
pub mod reference;
pub mod session;
pub mod store;

pub use api::{LedgerClient, LedgerError};
pub use cache::TtlCache;
pub use reference::{ReferenceData, ReferenceError};
pub use session::{Session, SessionState};

//! # Domain Models
//!
//! Plain records shaped like the backend's JSON payloads. The client adds no
//! invariants of its own; uniqueness and referential integrity belong to the server.

pub mod contact;
pub mod export;
pub mod field;
pub mod group;
pub mod sort;
pub mod user;

pub use contact::Contact;
pub use export::ExportFormat;
pub use field::ContactField;
pub use group::{Group, NewGroup};
pub use sort::SortOrder;
pub use user::{Credentials, Session, User};

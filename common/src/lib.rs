//! # contactbook-common
//!
//! Shared vocabulary for the contactbook workspace.
//!
//! * **[`models`]**: Records mirrored from the backend (contacts, groups, users) and
//!   the small value types built around them.
//! * **[`ports`]**: Traits the application services depend on. Adapters in
//!   `contactbook-core` implement them.
//! * **[`error`]**: Typed errors surfaced across the port boundary.
//! * **[`config`]**: Runtime configuration (API location, batching, session file).

pub mod config;
pub mod error;
pub mod models;
pub mod ports;

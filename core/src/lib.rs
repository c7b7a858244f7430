//! # contactbook-core
//!
//! Application services and outbound adapters.
//!
//! ## Services
//! * [`auth::AuthService`]: login, logout and profile lookup.
//! * [`contacts::ContactsService`]: listing (search + sort), single-record CRUD.
//! * [`groups::GroupsService`]: group CRUD, membership listing, lookup by name.
//! * [`import`]: file → table → mapping → contacts → batched submission.
//! * [`merge`]: field-by-field reconciliation of two contacts.
//! * [`duplicates`]: candidate pairs for merging.
//! * [`bulk::BulkService`]: group assignment, removal and deletion over a selection.
//! * [`export::ExportService`]: server-side export written to disk.
//!
//! ## Adapters
//! * [`api::HttpContactsApi`]: reqwest implementation of the `ContactsApi` port.
//! * [`session::FileSessionStore`]: JSON file implementation of the `SessionStore` port.

pub mod api;
pub mod auth;
pub mod bulk;
pub mod contacts;
pub mod duplicates;
pub mod export;
pub mod groups;
pub mod import;
pub mod merge;
pub mod search;
pub mod session;

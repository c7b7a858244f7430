//! End-to-end flows across `contactbook-core` services, run against an
//! in-memory backend ([`support::FakeBackend`]) or a local HTTP listener.

pub mod support;

mod auth;
mod bulk;
mod import;
mod merge;

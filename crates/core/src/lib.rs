//! Domain core for the Waypost delivery pipeline.
//!
//! Everything in this crate is pure: the stage catalog, the project
//! aggregate, and the workflow engine operate on in-memory data and return
//! typed errors. Persistence and HTTP live in `waypost-db` and
//! `waypost-api`.

pub mod catalog;
pub mod engine;
pub mod error;
pub mod feedback;
pub mod meeting;
pub mod project;
pub mod roles;
pub mod types;

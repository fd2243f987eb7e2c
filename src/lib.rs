//! GCIS Business Registry Lookup Library
//!
//! Looks up Taiwanese companies, branch offices and registered businesses by
//! unified business number in the GCIS open-data API, picks the current
//! registration among historical rows, and normalizes the result into one
//! flat [`GcisRecord`] regardless of category.
//!
//! # Modules
//!
//! - `core`: Category resolution, record selection and normalization.
//! - `integrations`: GCIS endpoints and HTTP client.
//! - `category`: Category resolver.
//! - `config`: Configuration management.
//! - `endpoints`: Registry of GCIS resources and their filter fields.
//! - `errors`: Error handling types.
//! - `gcis_client`: HTTP transport for GCIS queries.
//! - `lookup`: Lookup facade and per-category pipelines.
//! - `models`: Core data models.
//! - `normalize`: Record merging and canonical projection.
//! - `selection`: Current-record selection among historical rows.

pub mod core;
pub mod integrations;

pub mod category;
pub mod config;
pub mod endpoints;
pub mod errors;
pub mod gcis_client;
pub mod lookup;
pub mod models;
pub mod normalize;
pub mod selection;

pub use errors::GcisError;
pub use lookup::{get_gcis_information, GcisLookup};
pub use models::{Category, GcisRecord};

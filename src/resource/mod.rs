//! Resource abstraction layer
//!
//! One trait-based contract drives wildly different REST shapes through a
//! single listing/sync engine.
//!
//! # Architecture
//!
//! - [`contract`] - The [`ResourceType`] trait every category implements
//! - [`standard`] - Conventional REST paths + optional pagination
//! - [`reference_table`] - Display-name specialization for reference tables
//! - [`pagination`] - Limit/offset page walks
//! - [`registry`] - The explicit catalog of known types
//! - [`listing`] - Concurrency-bounded listing with id-only fallback

pub mod contract;
pub mod id;
pub mod listing;
pub mod pagination;
pub mod reference_table;
pub mod registry;
pub mod standard;

pub use contract::{Collection, ResourceType};
pub use id::ResourceId;
pub use listing::{list_all, list_one, Listed, TypeReport};
pub use pagination::{LimitOffsetPagination, Page};
pub use reference_table::ReferenceTableResourceType;
pub use registry::Registry;
pub use standard::{Listing, StandardResourceType};

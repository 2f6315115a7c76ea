//! Value types shared by templates, resolution and instances.
//!
//! # Responsibility
//! - Define the boundary vocabulary (durations, anchors, policies).
//! - Define the materialized `TaskInstance` shape.
//!
//! # Invariants
//! - Every type here is an immutable value once constructed.
//! - Anchors are a sum type; there is no "both set" or "both unset" state.

pub mod anchor;
pub mod duration;
pub mod instance;
pub mod policy;
pub mod priority;

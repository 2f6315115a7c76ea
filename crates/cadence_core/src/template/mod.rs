//! Task templates: copy-on-write builder and compiled resolution form.
//!
//! # Responsibility
//! - `builder`: accumulate template fields as pure values.
//! - `resolved`: host the create/due/deletion resolution algorithm.
//!
//! # See also
//! - `crate::registry` for batch queries over many templates.

pub mod builder;
pub mod resolved;

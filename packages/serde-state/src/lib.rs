//! Serde Integration for framestate
//!
//! This layer provides typed access to shared state via serde. It adds:
//! - `TypedBinding`: attach and read as a Rust type
//! - `TypedSetter`: write and transform as a Rust type
//! - Value <-> serde conversions
//!
//! Typed and untyped bindings can observe the same key: the namespace always
//! holds a [`Value`].

mod convert;
mod typed;

pub use convert::{from_value, json_to_value, to_value, value_to_json};
pub use typed::{TypedBinding, TypedSetter};

// Re-export core types for convenience
pub use framestate_core::{AttachOptions, Error, HostContext, StateKey, Value};

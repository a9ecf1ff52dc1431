//! framestate: shared state across nested document contexts, without a central store.
//!
//! A value lives in exactly one namespace, hosted by a document context (by
//! default the top window, or the subscriber's own context when the top is
//! cross-origin). Bindings in any frame of the tree
//! subscribe to a key, keep a cached copy, and receive every change
//! synchronously and in registration order.
//!
//! The building blocks live in `framestate-core`; `framestate-serde` adds
//! typed bindings on top.

pub use framestate_core::{
    AttachOptions, Binding, BindingConfig, Error, HostContext, Origin, Scope, Setter, StateKey,
    Target, Update, Value,
};
pub use framestate_serde::{TypedBinding, TypedSetter};

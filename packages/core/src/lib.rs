//! Core framestate: shared state across nested document contexts
//!
//! Subscribers in different frames of one document tree observe and mutate a
//! value identified by a string key. There is no central store:
//! - `HostContext`: a document (window, frame) with an origin and a parent
//! - `Namespace`: the `key -> Value` mapping a context hosts, created lazily
//! - `Notifier`: synchronous publish/subscribe on one channel per key
//! - `Binding`: a subscriber's cached view of one key, plus its `Setter`
//!
//! Everything is single-threaded. Handles are `Rc`-based and `!Send`.
//!
//! # Example
//!
//! ```rust
//! use framestate_core::{AttachOptions, Binding, HostContext, Value};
//!
//! let window = HostContext::new("https://app.example");
//! let frame = window.child("https://app.example");
//!
//! // Both resolve to the top window's namespace
//! let header = Binding::attach("user", "guest", AttachOptions::new(), Some(&window));
//! let widget = Binding::attach("user", "guest", AttachOptions::new(), Some(&frame));
//!
//! widget.setter().replace("alice");
//! assert_eq!(header.value(), Value::from("alice"));
//! ```

mod binding;
mod config;
mod error;
mod host;
mod key;
mod namespace;
mod notifier;
pub mod resolver;
mod value;

pub use binding::{Binding, Setter, Update};
pub use config::{AttachOptions, BindingConfig, Scope, Target};
pub use error::{AccessDenied, Error, Result};
pub use host::{ContextId, HostContext, Origin};
pub use key::{StateKey, CHANNEL_PREFIX};
pub use namespace::Namespace;
pub use notifier::{ChangeEvent, Handler, ListenerId, Notifier};
pub use value::Value;

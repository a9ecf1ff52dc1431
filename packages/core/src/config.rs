//! Attach options and their serializable form.
//!
//! `BindingConfig` is what an adapter loads from its own configuration:
//!
//! ```json
//! {"scope": "top", "force_new_state": false}
//! {"scope": "local"}
//! {"scope": "same_origin_root", "force_new_state": true}
//! ```
//!
//! `AttachOptions` is what [`Binding::attach`](crate::Binding::attach) takes.
//! It can also carry an explicit target context, which has no config form.

use serde::{Deserialize, Serialize};

use crate::HostContext;

/// Where a binding looks for its namespace when no context is given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// The subscriber's own context.
    Local,
    /// The top-most context, or the local one if the top is cross-origin.
    #[default]
    Top,
    /// The highest ancestor reachable through same-origin parents.
    SameOriginRoot,
}

/// Serializable binding defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingConfig {
    pub force_new_state: bool,
    pub scope: Scope,
}

/// Which context hosts the namespace.
#[derive(Debug, Clone)]
pub enum Target {
    /// Resolve relative to the subscriber's context.
    Scope(Scope),
    /// Use this context, whatever the subscriber's context is.
    Explicit(HostContext),
}

impl Default for Target {
    fn default() -> Self {
        Target::Scope(Scope::default())
    }
}

/// Options for [`Binding::attach`](crate::Binding::attach).
#[derive(Debug, Clone, Default)]
pub struct AttachOptions {
    /// Overwrite the shared value with the initial value on attach.
    pub force_new_state: bool,
    pub target: Target,
}

impl AttachOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn force_new_state(mut self, force: bool) -> Self {
        self.force_new_state = force;
        self
    }

    #[must_use]
    pub fn scope(mut self, scope: Scope) -> Self {
        self.target = Target::Scope(scope);
        self
    }

    /// Host the namespace on `ctx` regardless of the subscriber's context.
    #[must_use]
    pub fn target_context(mut self, ctx: HostContext) -> Self {
        self.target = Target::Explicit(ctx);
        self
    }
}

impl From<BindingConfig> for AttachOptions {
    fn from(config: BindingConfig) -> Self {
        AttachOptions {
            force_new_state: config.force_new_state,
            target: Target::Scope(config.scope),
        }
    }
}

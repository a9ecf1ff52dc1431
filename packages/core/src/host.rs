//! Host contexts: the documents (windows, frames) that host a namespace.
//!
//! Contexts form a tree. A nested frame holds a reference to its parent, and
//! reaching an ancestor is only allowed when both share an origin.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::AccessDenied;
use crate::namespace::Namespace;
use crate::notifier::Notifier;

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identifier of a host context, assigned at creation.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ContextId(u64);

impl ContextId {
    pub fn from_raw(raw: u64) -> Self {
        ContextId(raw)
    }

    pub fn as_raw(&self) -> u64 {
        self.0
    }

    fn next() -> Self {
        ContextId(NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Security origin of a context, e.g. `https://app.example`.
///
/// Origins are compared as plain strings.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct Origin(String);

impl Origin {
    pub fn new(origin: impl Into<String>) -> Self {
        Origin(origin.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Origin {
    fn from(s: &str) -> Self {
        Origin(s.to_string())
    }
}

impl From<String> for Origin {
    fn from(s: String) -> Self {
        Origin(s)
    }
}

struct Inner {
    id: ContextId,
    origin: Origin,
    parent: Option<HostContext>,
    namespace: RefCell<Option<Namespace>>,
    notifier: Notifier,
}

/// One document context.
///
/// A context owns at most one [`Namespace`], created on first access and kept
/// for as long as the context lives, plus one [`Notifier`]. Cloning a
/// `HostContext` clones a handle, not the document.
///
/// # Example
///
/// ```rust
/// use framestate_core::HostContext;
///
/// let window = HostContext::new("https://app.example");
/// let frame = window.child("https://app.example");
///
/// assert!(frame.top().unwrap().same_context(&window));
/// ```
#[derive(Clone)]
pub struct HostContext(Rc<Inner>);

impl HostContext {
    /// Create a top-level context.
    pub fn new(origin: impl Into<Origin>) -> Self {
        Self::with_parent(origin.into(), None)
    }

    /// Create a frame nested in this context.
    pub fn child(&self, origin: impl Into<Origin>) -> Self {
        Self::with_parent(origin.into(), Some(self.clone()))
    }

    fn with_parent(origin: Origin, parent: Option<HostContext>) -> Self {
        let ctx = HostContext(Rc::new(Inner {
            id: ContextId::next(),
            origin,
            parent,
            namespace: RefCell::new(None),
            notifier: Notifier::new(),
        }));
        log::debug!("created context {} ({})", ctx.id(), ctx.origin());
        ctx
    }

    pub fn id(&self) -> ContextId {
        self.0.id
    }

    pub fn origin(&self) -> &Origin {
        &self.0.origin
    }

    /// Whether this context has no parent.
    pub fn is_top(&self) -> bool {
        self.0.parent.is_none()
    }

    /// Whether `other` is a handle to the same context.
    pub fn same_context(&self, other: &HostContext) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Check whether this context may touch `target`.
    pub fn check_access(&self, target: &HostContext) -> Result<(), AccessDenied> {
        if self.origin() == target.origin() {
            Ok(())
        } else {
            Err(AccessDenied {
                from: self.id(),
                from_origin: self.origin().clone(),
                to: target.id(),
                to_origin: target.origin().clone(),
            })
        }
    }

    /// The parent context, if this is a nested frame.
    pub fn parent(&self) -> Result<Option<HostContext>, AccessDenied> {
        match &self.0.parent {
            Some(parent) => {
                self.check_access(parent)?;
                Ok(Some(parent.clone()))
            }
            None => Ok(None),
        }
    }

    /// The top-most context of the tree.
    ///
    /// Intermediate frames are not checked, only the top itself, the same way
    /// a document reaches its top window directly.
    pub fn top(&self) -> Result<HostContext, AccessDenied> {
        let mut current = self.clone();
        while let Some(parent) = current.0.parent.clone() {
            current = parent;
        }
        self.check_access(&current)?;
        Ok(current)
    }

    /// The top-most ancestor reachable through same-origin parents only.
    ///
    /// Returns `self` when the parent is cross-origin or absent.
    pub fn same_origin_root(&self) -> HostContext {
        let mut current = self.clone();
        while let Ok(Some(parent)) = current.parent() {
            current = parent;
        }
        current
    }

    /// The namespace hosted by this context, created on first access.
    pub fn namespace(&self) -> Namespace {
        self.0
            .namespace
            .borrow_mut()
            .get_or_insert_with(|| {
                log::debug!("created namespace on context {}", self.0.id);
                Namespace::new()
            })
            .clone()
    }

    /// Whether the namespace has been created yet.
    pub fn has_namespace(&self) -> bool {
        self.0.namespace.borrow().is_some()
    }

    pub fn notifier(&self) -> &Notifier {
        &self.0.notifier
    }
}

impl fmt::Debug for HostContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostContext")
            .field("id", &self.0.id)
            .field("origin", &self.0.origin)
            .field("parent", &self.0.parent.as_ref().map(HostContext::id))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let a = HostContext::new("https://a.example");
        let b = HostContext::new("https://a.example");
        assert_ne!(a.id(), b.id());
        assert!(!a.same_context(&b));
        assert!(a.same_context(&a.clone()));
    }

    #[test]
    fn namespace_is_lazy_and_unique() {
        let ctx = HostContext::new("https://a.example");
        assert!(!ctx.has_namespace());

        let first = ctx.namespace();
        assert!(ctx.has_namespace());
        assert!(first.ptr_eq(&ctx.namespace()));
    }

    #[test]
    fn same_origin_parent_is_reachable() {
        let top = HostContext::new("https://a.example");
        let frame = top.child("https://a.example");

        let parent = frame.parent().unwrap().unwrap();
        assert!(parent.same_context(&top));
        assert!(top.parent().unwrap().is_none());
        assert!(top.is_top());
        assert!(!frame.is_top());
    }

    #[test]
    fn cross_origin_parent_is_denied() {
        let top = HostContext::new("https://a.example");
        let frame = top.child("https://b.example");

        let err = frame.parent().unwrap_err();
        assert_eq!(err.from, frame.id());
        assert_eq!(err.to, top.id());
        assert!(frame.top().is_err());
    }

    #[test]
    fn top_skips_intermediate_origin() {
        let top = HostContext::new("https://a.example");
        let middle = top.child("https://b.example");
        let inner = middle.child("https://a.example");

        assert!(inner.top().unwrap().same_context(&top));
        assert!(inner.parent().is_err());
    }

    #[test]
    fn same_origin_root_stops_at_origin_boundary() {
        let top = HostContext::new("https://a.example");
        let middle = top.child("https://b.example");
        let inner = middle.child("https://b.example");

        assert!(inner.same_origin_root().same_context(&middle));
        assert!(top.same_origin_root().same_context(&top));
    }
}

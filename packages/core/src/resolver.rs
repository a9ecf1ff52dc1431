//! Context resolution: which context hosts a binding's namespace.

use crate::config::{Scope, Target};
use crate::error::AccessDenied;
use crate::HostContext;

/// Probe the top-most context on behalf of `local`.
pub fn probe_top(local: &HostContext) -> Result<HostContext, AccessDenied> {
    local.top()
}

/// Pick the context that hosts the namespace.
///
/// An explicit target always wins. Otherwise the scope is applied to `local`;
/// a blocked top context degrades to `local`. Returns `None` only when there
/// is no local context and no explicit target.
pub fn resolve(local: Option<&HostContext>, target: &Target) -> Option<HostContext> {
    match target {
        Target::Explicit(ctx) => Some(ctx.clone()),
        Target::Scope(scope) => {
            let local = local?;
            Some(match scope {
                Scope::Local => local.clone(),
                Scope::Top => match probe_top(local) {
                    Ok(top) => top,
                    Err(denied) => {
                        log::debug!("{}; falling back to local context", denied);
                        local.clone()
                    }
                },
                Scope::SameOriginRoot => local.same_origin_root(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_target_wins() {
        let top = HostContext::new("https://a.example");
        let frame = top.child("https://b.example");
        let other = HostContext::new("https://c.example");

        let resolved = resolve(Some(&frame), &Target::Explicit(other.clone())).unwrap();
        assert!(resolved.same_context(&other));

        let resolved = resolve(None, &Target::Explicit(other.clone())).unwrap();
        assert!(resolved.same_context(&other));
    }

    #[test]
    fn top_scope_reaches_same_origin_top() {
        let top = HostContext::new("https://a.example");
        let frame = top.child("https://a.example").child("https://a.example");

        let resolved = resolve(Some(&frame), &Target::Scope(Scope::Top)).unwrap();
        assert!(resolved.same_context(&top));
    }

    #[test]
    fn top_scope_falls_back_when_denied() {
        let top = HostContext::new("https://a.example");
        let frame = top.child("https://b.example");

        assert!(probe_top(&frame).is_err());
        let resolved = resolve(Some(&frame), &Target::Scope(Scope::Top)).unwrap();
        assert!(resolved.same_context(&frame));
    }

    #[test]
    fn local_scope_stays_local() {
        let top = HostContext::new("https://a.example");
        let frame = top.child("https://a.example");

        let resolved = resolve(Some(&frame), &Target::Scope(Scope::Local)).unwrap();
        assert!(resolved.same_context(&frame));
    }

    #[test]
    fn same_origin_root_scope() {
        let top = HostContext::new("https://a.example");
        let widget = top.child("https://b.example");
        let inner = widget.child("https://b.example");

        let resolved = resolve(Some(&inner), &Target::Scope(Scope::SameOriginRoot)).unwrap();
        assert!(resolved.same_context(&widget));
    }

    #[test]
    fn no_context_without_host() {
        assert!(resolve(None, &Target::default()).is_none());
        assert!(resolve(None, &Target::Scope(Scope::Local)).is_none());
    }

    #[test]
    fn resolution_is_idempotent() {
        let top = HostContext::new("https://a.example");
        let frame = top.child("https://a.example");

        let first = resolve(Some(&frame), &Target::default()).unwrap();
        let second = resolve(Some(&frame), &Target::default()).unwrap();
        assert!(first.same_context(&second));
        assert!(!top.has_namespace());
    }
}

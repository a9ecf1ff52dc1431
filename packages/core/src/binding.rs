//! Bindings: a subscriber's live view of one key.
//!
//! A binding caches the value of its key locally. The cache is only ever
//! written by the binding's change handler, so the cache and the namespace
//! cannot drift apart: even the initial value arrives through a broadcast.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::config::{AttachOptions, Target};
use crate::notifier::{ChangeEvent, Handler, ListenerId};
use crate::{resolver, Error, HostContext, StateKey, Value};

/// A write to a key.
pub enum Update {
    /// Store this value.
    Replace(Value),
    /// Compute the new value from the value currently stored.
    Transform(Box<dyn FnOnce(&Value) -> Value>),
    /// Remove the entry. Every binding falls back to its own initial value.
    Unset,
}

impl Update {
    pub fn transform(f: impl FnOnce(&Value) -> Value + 'static) -> Self {
        Update::Transform(Box::new(f))
    }
}

impl From<Value> for Update {
    fn from(value: Value) -> Self {
        Update::Replace(value)
    }
}

impl fmt::Debug for Update {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Update::Replace(value) => f.debug_tuple("Replace").field(value).finish(),
            Update::Transform(_) => f.write_str("Transform(..)"),
            Update::Unset => f.write_str("Unset"),
        }
    }
}

type ChangeCallback = Box<dyn FnMut(&Value)>;

/// State reachable from the change handler.
struct Shared {
    key: StateKey,
    initial: Rc<Value>,
    cache: RefCell<Option<Rc<Value>>>,
    revision: Cell<u64>,
    on_change: RefCell<Option<ChangeCallback>>,
}

impl Shared {
    fn handle(&self, event: &ChangeEvent) {
        let next = event
            .value
            .clone()
            .unwrap_or_else(|| Rc::clone(&self.initial));

        {
            let mut cache = self.cache.borrow_mut();
            if cache.as_deref() == Some(&*next) {
                return;
            }
            *cache = Some(Rc::clone(&next));
        }
        self.revision.set(self.revision.get() + 1);

        // Taken out of the slot while it runs so the callback can read the
        // binding. A change made from inside the callback updates the cache
        // without re-entering it; the callback runs again afterwards until
        // the cache settles.
        let callback = self.on_change.borrow_mut().take();
        if let Some(mut callback) = callback {
            let mut delivered = next;
            loop {
                callback(&delivered);
                let current = match self.cache.borrow().as_ref() {
                    Some(current) => Rc::clone(current),
                    None => break,
                };
                if *current == *delivered {
                    break;
                }
                delivered = current;
            }
            let mut slot = self.on_change.borrow_mut();
            if slot.is_none() {
                *slot = Some(callback);
            }
        }
    }
}

/// The write accessor of a binding.
///
/// A `Setter` stays usable after its binding is detached; it writes to the
/// namespace, not to the binding.
#[derive(Clone)]
pub struct Setter {
    key: StateKey,
    initial: Rc<Value>,
    context: Option<HostContext>,
}

impl Setter {
    pub fn key(&self) -> &StateKey {
        &self.key
    }

    /// Apply an update and broadcast the result.
    ///
    /// Without a host context the write is dropped.
    pub fn set(&self, update: impl Into<Update>) {
        match update.into() {
            Update::Replace(value) => self.replace(value),
            Update::Transform(f) => self.update(f),
            Update::Unset => self.unset(),
        }
    }

    pub fn replace(&self, value: impl Into<Value>) {
        if let Some(ctx) = self.host() {
            self.store(ctx, Rc::new(value.into()));
        }
    }

    /// Apply `f` to the value stored right now, never to a binding's cache.
    pub fn update<F: FnOnce(&Value) -> Value>(&self, f: F) {
        if let Some(ctx) = self.host() {
            let current = ctx
                .namespace()
                .get(&self.key)
                .unwrap_or_else(|| Rc::clone(&self.initial));
            self.store(ctx, Rc::new(f(&*current)));
        }
    }

    pub fn unset(&self) {
        if let Some(ctx) = self.host() {
            ctx.namespace().remove(&self.key);
            ctx.notifier().publish(&self.key, None);
        }
    }

    /// The value stored right now, or the initial value when unset or when
    /// there is no host context.
    pub fn stored(&self) -> Value {
        self.context
            .as_ref()
            .and_then(|ctx| ctx.namespace().get(&self.key))
            .map_or_else(|| (*self.initial).clone(), |v| (*v).clone())
    }

    fn host(&self) -> Option<&HostContext> {
        if self.context.is_none() {
            log::trace!("dropping write to '{}': no host context", self.key);
        }
        self.context.as_ref()
    }

    fn store(&self, ctx: &HostContext, value: Rc<Value>) {
        ctx.namespace().set(self.key.clone(), Rc::clone(&value));
        ctx.notifier().publish(&self.key, Some(value));
    }
}

impl fmt::Debug for Setter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Setter")
            .field("key", &self.key)
            .field("context", &self.context.as_ref().map(HostContext::id))
            .finish()
    }
}

/// A subscriber's subscription to one key.
///
/// Dropping a binding detaches it. The namespace entry is left in place for
/// the other bindings.
///
/// # Example
///
/// ```rust
/// use framestate_core::{AttachOptions, Binding, HostContext, Value};
///
/// let window = HostContext::new("https://app.example");
/// let a = Binding::attach("counter", 0, AttachOptions::new(), Some(&window));
/// let b = Binding::attach("counter", 10, AttachOptions::new(), Some(&window));
///
/// // b adopted the value a seeded
/// assert_eq!(b.value(), Value::from(0));
///
/// a.setter().update(|v| Value::from(v.as_i64().unwrap_or(0) + 1));
/// assert_eq!(b.value(), Value::from(1));
/// ```
pub struct Binding {
    shared: Rc<Shared>,
    context: Option<HostContext>,
    listener: Option<ListenerId>,
}

impl Binding {
    /// Attach a binding for `key`.
    ///
    /// Resolves the hosting context from `local` and `options.target`,
    /// subscribes to the key, then seeds the namespace (or re-broadcasts the
    /// stored value) so that the cache is filled by the broadcast.
    pub fn attach(
        key: impl Into<StateKey>,
        initial: impl Into<Value>,
        options: AttachOptions,
        local: Option<&HostContext>,
    ) -> Binding {
        let key = key.into();
        let initial = Rc::new(initial.into());
        let context = resolver::resolve(local, &options.target);

        let mut binding = Binding {
            shared: Rc::new(Shared {
                key: key.clone(),
                initial: Rc::clone(&initial),
                cache: RefCell::new(None),
                revision: Cell::new(0),
                on_change: RefCell::new(None),
            }),
            context,
            listener: None,
        };

        let Some(ctx) = binding.context.clone() else {
            log::debug!("no host context for '{}'; binding is inert", key);
            return binding;
        };

        let weak: Weak<Shared> = Rc::downgrade(&binding.shared);
        let handler: Handler = Rc::new(move |event: &ChangeEvent| {
            if let Some(shared) = weak.upgrade() {
                shared.handle(event);
            }
        });
        binding.listener = Some(ctx.notifier().subscribe(&key, handler));

        let namespace = ctx.namespace();
        let seed = if options.force_new_state {
            initial
        } else {
            namespace.get(&key).unwrap_or(initial)
        };
        log::debug!(
            "attached '{}' on context {} (force_new_state={})",
            key,
            ctx.id(),
            options.force_new_state
        );

        namespace.set(key.clone(), Rc::clone(&seed));
        ctx.notifier().publish(&key, Some(seed));

        binding
    }

    /// Attach with untyped arguments, as handed over by a dynamic adapter.
    ///
    /// `key` must be a string. `force_new_state`, when present and not null,
    /// must be a boolean. Both are checked before any context is resolved.
    pub fn attach_dynamic(
        key: &Value,
        initial: Value,
        force_new_state: Option<&Value>,
        target: Target,
        local: Option<&HostContext>,
    ) -> Result<Binding, Error> {
        let key = StateKey::try_from(key)?;
        let force_new_state = match force_new_state {
            None | Some(Value::Null) => false,
            Some(Value::Bool(force)) => *force,
            Some(other) => {
                return Err(Error::invalid_argument(
                    "force_new_state",
                    "boolean",
                    other.kind(),
                ))
            }
        };

        let options = AttachOptions {
            force_new_state,
            target,
        };
        Ok(Binding::attach(key, initial, options, local))
    }

    pub fn key(&self) -> &StateKey {
        &self.shared.key
    }

    /// The current value: the cached value, or the initial value if nothing
    /// has been received.
    pub fn value(&self) -> Value {
        match self.shared.cache.borrow().as_deref() {
            Some(value) => value.clone(),
            None => (*self.shared.initial).clone(),
        }
    }

    /// The cached value as shared with the namespace.
    pub fn cached(&self) -> Option<Rc<Value>> {
        self.shared.cache.borrow().clone()
    }

    /// Number of times the cache has changed.
    pub fn revision(&self) -> u64 {
        self.shared.revision.get()
    }

    /// The context hosting this binding's namespace.
    pub fn context(&self) -> Option<&HostContext> {
        self.context.as_ref()
    }

    /// Whether the binding still receives changes.
    pub fn is_attached(&self) -> bool {
        self.listener.is_some()
    }

    pub fn setter(&self) -> Setter {
        Setter {
            key: self.shared.key.clone(),
            initial: Rc::clone(&self.shared.initial),
            context: self.context.clone(),
        }
    }

    /// The `(current value, write accessor)` pair.
    pub fn split(&self) -> (Value, Setter) {
        (self.value(), self.setter())
    }

    /// Run `f` with the new value every time the cache changes.
    ///
    /// This is the hook a UI adapter uses to schedule a re-render. It
    /// replaces any previous callback.
    pub fn on_change(&self, f: impl FnMut(&Value) + 'static) {
        *self.shared.on_change.borrow_mut() = Some(Box::new(f));
    }

    /// Stop receiving changes. The namespace entry is kept.
    pub fn detach(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let (Some(ctx), Some(id)) = (&self.context, self.listener.take()) {
            ctx.notifier().unsubscribe(&self.shared.key, id);
            log::debug!("detached '{}' from context {}", self.shared.key, ctx.id());
        }
    }
}

impl Drop for Binding {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("key", &self.shared.key)
            .field("value", &self.value())
            .field("revision", &self.revision())
            .field("context", &self.context.as_ref().map(HostContext::id))
            .field("attached", &self.is_attached())
            .finish()
    }
}

//! Typed bindings: Rust types in, Rust types out.

use std::fmt;
use std::marker::PhantomData;

use framestate_core::{AttachOptions, Binding, Error, HostContext, Setter, StateKey, Value};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::convert::{from_value, to_value};

fn decode<T: DeserializeOwned>(key: &StateKey, value: Value) -> Result<T, Error> {
    from_value(value).map_err(|e| Error::convert(key.as_str(), e.to_string()))
}

fn encode<T: Serialize>(key: &StateKey, data: &T) -> Result<Value, Error> {
    to_value(data).map_err(|e| Error::convert(key.as_str(), e.to_string()))
}

/// A [`Binding`] whose value is read and written as `T`.
///
/// The namespace still holds a [`Value`]; `T` is converted on every access, so
/// a typed binding and an untyped one can share a key.
///
/// # Example
///
/// ```rust
/// use framestate_core::{AttachOptions, HostContext};
/// use framestate_serde::TypedBinding;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, PartialEq, Serialize, Deserialize)]
/// struct Cart {
///     items: Vec<String>,
/// }
///
/// let window = HostContext::new("https://shop.example");
/// let empty = Cart { items: vec![] };
/// let cart = TypedBinding::attach("cart", &empty, AttachOptions::new(), Some(&window)).unwrap();
///
/// cart.setter()
///     .update(|mut cart: Cart| {
///         cart.items.push("book".to_string());
///         cart
///     })
///     .unwrap();
///
/// assert_eq!(cart.value().unwrap().items, vec!["book"]);
/// ```
pub struct TypedBinding<T> {
    inner: Binding,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Serialize + DeserializeOwned> TypedBinding<T> {
    pub fn attach(
        key: impl Into<StateKey>,
        initial: &T,
        options: AttachOptions,
        local: Option<&HostContext>,
    ) -> Result<Self, Error> {
        let key = key.into();
        let initial = encode(&key, initial)?;
        Ok(TypedBinding {
            inner: Binding::attach(key, initial, options, local),
            _marker: PhantomData,
        })
    }

    /// The current value, converted to `T`.
    ///
    /// Fails if another binding stored something `T` cannot represent.
    pub fn value(&self) -> Result<T, Error> {
        decode(self.inner.key(), self.inner.value())
    }

    pub fn setter(&self) -> TypedSetter<T> {
        TypedSetter {
            inner: self.inner.setter(),
            _marker: PhantomData,
        }
    }

    /// Run `f` with the converted value every time the cache changes.
    pub fn on_change(&self, mut f: impl FnMut(Result<T, Error>) + 'static)
    where
        T: 'static,
    {
        let key = self.inner.key().clone();
        self.inner.on_change(move |value| f(decode(&key, value.clone())));
    }

    /// The untyped binding underneath.
    pub fn binding(&self) -> &Binding {
        &self.inner
    }

    pub fn detach(self) {
        self.inner.detach();
    }
}

impl<T> fmt::Debug for TypedBinding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypedBinding").field(&self.inner).finish()
    }
}

/// The write accessor of a [`TypedBinding`].
pub struct TypedSetter<T> {
    inner: Setter,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Serialize + DeserializeOwned> TypedSetter<T> {
    pub fn set(&self, data: &T) -> Result<(), Error> {
        let value = encode(self.inner.key(), data)?;
        self.inner.replace(value);
        Ok(())
    }

    /// Apply `f` to the value stored right now.
    ///
    /// Nothing is written if the stored value does not convert to `T`.
    pub fn update(&self, f: impl FnOnce(T) -> T) -> Result<(), Error> {
        let current = decode(self.inner.key(), self.inner.stored())?;
        let next = encode(self.inner.key(), &f(current))?;
        self.inner.replace(next);
        Ok(())
    }

    pub fn unset(&self) {
        self.inner.unset();
    }
}

impl<T> Clone for TypedSetter<T> {
    fn clone(&self) -> Self {
        TypedSetter {
            inner: self.inner.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for TypedSetter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypedSetter").field(&self.inner).finish()
    }
}

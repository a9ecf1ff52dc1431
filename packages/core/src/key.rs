//! State keys and the channel names derived from them.

use std::fmt;

use crate::{Error, Value};

/// Prefix of every key-qualified notification channel.
pub const CHANNEL_PREFIX: &str = "setglobalstate-";

/// Identifies one entry of a shared namespace.
///
/// Any string is a valid key, the empty string included. Bindings that want
/// to observe the same state must use the same key.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct StateKey(String);

impl StateKey {
    pub fn new(key: impl Into<String>) -> Self {
        StateKey(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the notification channel for this key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use framestate_core::StateKey;
    ///
    /// assert_eq!(StateKey::new("counter").channel(), "setglobalstate-counter");
    /// ```
    pub fn channel(&self) -> String {
        format!("{}{}", CHANNEL_PREFIX, self.0)
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StateKey {
    fn from(s: &str) -> Self {
        StateKey(s.to_string())
    }
}

impl From<String> for StateKey {
    fn from(s: String) -> Self {
        StateKey(s)
    }
}

impl From<&String> for StateKey {
    fn from(s: &String) -> Self {
        StateKey(s.clone())
    }
}

impl TryFrom<&Value> for StateKey {
    type Error = Error;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(StateKey(s.clone())),
            other => Err(Error::invalid_argument("key", "string", other.kind())),
        }
    }
}

//! Field declarations and codecs.
//!
//! A [`Field`] names one state field, knows how to read and write it on the
//! state type, and carries the [`Codec`] used to turn its value into a
//! storable string. Fields are collected into a [`crate::FieldMap`] and
//! resolved once when a [`crate::SyncPlugin`] is built.

use crate::error::{BoxError, SyncError, SyncResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// How a field's value is converted to and from a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecKind {
    /// `serde_json` in both directions.
    Default,
    /// Host-supplied serialize and deserialize functions.
    Custom,
}

type SerializeFn<T> = Arc<dyn Fn(&T) -> Result<String, BoxError> + Send + Sync>;
type DeserializeFn<T> = Arc<dyn Fn(&str) -> Result<T, BoxError> + Send + Sync>;

enum CodecImpl<T> {
    Json {
        encode: fn(&T) -> serde_json::Result<String>,
        decode: fn(&str) -> serde_json::Result<T>,
    },
    Custom {
        serialize: SerializeFn<T>,
        deserialize: DeserializeFn<T>,
    },
}

/// Paired serialize/deserialize functions for one field.
///
/// The default codec is `serde_json`; a custom codec never falls back to it.
pub struct Codec<T> {
    inner: CodecImpl<T>,
}

fn json_encode<T: Serialize>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string(value)
}

fn json_decode<T: DeserializeOwned>(raw: &str) -> serde_json::Result<T> {
    serde_json::from_str(raw)
}

impl<T: Serialize + DeserializeOwned> Codec<T> {
    /// The default structured-text codec.
    #[must_use]
    pub fn json() -> Self {
        Self {
            inner: CodecImpl::Json {
                encode: json_encode::<T>,
                decode: json_decode::<T>,
            },
        }
    }
}

impl<T> Codec<T> {
    /// A codec built from host functions.
    pub fn custom<F, G>(serialize: F, deserialize: G) -> Self
    where
        F: Fn(&T) -> Result<String, BoxError> + Send + Sync + 'static,
        G: Fn(&str) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        Self {
            inner: CodecImpl::Custom {
                serialize: Arc::new(serialize),
                deserialize: Arc::new(deserialize),
            },
        }
    }

    /// Returns which kind of codec this is.
    #[must_use]
    pub fn kind(&self) -> CodecKind {
        match self.inner {
            CodecImpl::Json { .. } => CodecKind::Default,
            CodecImpl::Custom { .. } => CodecKind::Custom,
        }
    }

    /// Encodes `value`. `key` only labels errors.
    ///
    /// # Errors
    ///
    /// Returns `Encode` for JSON failures and `Codec` for custom failures.
    pub fn encode(&self, value: &T, key: &str) -> SyncResult<String> {
        match &self.inner {
            CodecImpl::Json { encode, .. } => encode(value).map_err(|source| SyncError::Encode {
                key: key.to_string(),
                source,
            }),
            CodecImpl::Custom { serialize, .. } => {
                serialize(value).map_err(|source| SyncError::Codec {
                    key: key.to_string(),
                    source,
                })
            }
        }
    }

    /// Decodes a stored string. `key` only labels errors.
    ///
    /// # Errors
    ///
    /// Returns `Decode` for JSON failures and `Codec` for custom failures.
    pub fn decode(&self, raw: &str, key: &str) -> SyncResult<T> {
        match &self.inner {
            CodecImpl::Json { decode, .. } => decode(raw).map_err(|source| SyncError::Decode {
                key: key.to_string(),
                source,
            }),
            CodecImpl::Custom { deserialize, .. } => {
                deserialize(raw).map_err(|source| SyncError::Codec {
                    key: key.to_string(),
                    source,
                })
            }
        }
    }
}

impl<T> Clone for Codec<T> {
    fn clone(&self) -> Self {
        let inner = match &self.inner {
            CodecImpl::Json { encode, decode } => CodecImpl::Json {
                encode: *encode,
                decode: *decode,
            },
            CodecImpl::Custom {
                serialize,
                deserialize,
            } => CodecImpl::Custom {
                serialize: serialize.clone(),
                deserialize: deserialize.clone(),
            },
        };
        Self { inner }
    }
}

impl<T> fmt::Debug for Codec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Codec").field("kind", &self.kind()).finish()
    }
}

pub(crate) type Getter<S, T> = Arc<dyn Fn(&S) -> &T + Send + Sync>;
pub(crate) type Setter<S, T> = Arc<dyn Fn(&mut S, T) + Send + Sync>;

/// Declaration of one tracked state field.
///
/// # Example
///
/// ```rust
/// use fieldsync_core::{field, Field};
///
/// struct Counter {
///     count: u64,
/// }
///
/// // Default codec, via the macro.
/// let count = field!(Counter, count);
/// assert_eq!(count.name(), "count");
///
/// // Custom codec: plain decimal instead of JSON.
/// let count = Field::custom(
///     "count",
///     |s: &Counter| &s.count,
///     |s: &mut Counter, v| s.count = v,
///     |n: &u64| Ok(n.to_string()),
///     |raw: &str| Ok(raw.parse()?),
/// );
/// ```
pub struct Field<S, T> {
    pub(crate) name: String,
    pub(crate) get: Getter<S, T>,
    pub(crate) set: Setter<S, T>,
    pub(crate) codec: Codec<T>,
    pub(crate) trigger: Option<String>,
}

impl<S, T: Serialize + DeserializeOwned> Field<S, T> {
    /// Declares a field using the default codec.
    pub fn new<G, P>(name: impl Into<String>, get: G, set: P) -> Self
    where
        G: Fn(&S) -> &T + Send + Sync + 'static,
        P: Fn(&mut S, T) + Send + Sync + 'static,
    {
        Self::with_codec(name, get, set, Codec::json())
    }
}

impl<S, T> Field<S, T> {
    /// Declares a field using host-supplied serialize and deserialize functions.
    pub fn custom<G, P, F, D>(name: impl Into<String>, get: G, set: P, serialize: F, deserialize: D) -> Self
    where
        G: Fn(&S) -> &T + Send + Sync + 'static,
        P: Fn(&mut S, T) + Send + Sync + 'static,
        F: Fn(&T) -> Result<String, BoxError> + Send + Sync + 'static,
        D: Fn(&str) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        Self::with_codec(name, get, set, Codec::custom(serialize, deserialize))
    }

    /// Declares a field with an explicit codec.
    pub fn with_codec<G, P>(name: impl Into<String>, get: G, set: P, codec: Codec<T>) -> Self
    where
        G: Fn(&S) -> &T + Send + Sync + 'static,
        P: Fn(&mut S, T) + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            get: Arc::new(get),
            set: Arc::new(set),
            codec,
            trigger: None,
        }
    }

    /// Persists this field when a transition with `name` is committed.
    ///
    /// Only consulted by [`crate::TriggerStrategy::NamedTransition`]; by
    /// default the trigger is the field name.
    #[must_use]
    pub fn on_transition(mut self, name: impl Into<String>) -> Self {
        self.trigger = Some(name.into());
        self
    }

    /// Returns the field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the codec kind.
    #[must_use]
    pub fn codec_kind(&self) -> CodecKind {
        self.codec.kind()
    }
}

impl<S, T> fmt::Debug for Field<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("codec", &self.codec)
            .field("trigger", &self.trigger)
            .finish_non_exhaustive()
    }
}

/// Declares a default-codec [`Field`] for a named struct field.
///
/// `field!(State, count)` expands to a field named `"count"` that reads
/// `state.count` and assigns it on hydration.
#[macro_export]
macro_rules! field {
    ($state:ty, $name:ident) => {
        $crate::Field::new(
            stringify!($name),
            |s: &$state| &s.$name,
            |s: &mut $state, value| s.$name = value,
        )
    };
}

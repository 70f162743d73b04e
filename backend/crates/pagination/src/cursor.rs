//! Cursor codec.
//!
//! Tokens are `base64url` (no padding) encodings of a small JSON envelope:
//! `{"shape": "<tag>", "key": { ... }}`. The shape tag ties a token to the
//! key type that minted it, so a token issued for one collection is
//! rejected when presented to another.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key shape that can be carried inside a [`Cursor`].
///
/// Implementors should derive `Serialize`/`Deserialize` with
/// `#[serde(deny_unknown_fields)]` so that keys of other shapes fail to
/// decode.
pub trait CursorKey: Serialize + DeserializeOwned {
    /// Stable tag written into every token for this key shape.
    const SHAPE: &'static str;

    /// Check structural invariants that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason when the key is not acceptable.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Errors raised by [`Cursor::encode`] and [`Cursor::decode`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CursorError {
    /// The key could not be serialised.
    #[error("cursor key could not be serialised: {message}")]
    Encode {
        /// Serialiser failure description.
        message: String,
    },
    /// The token is not valid unpadded base64url.
    #[error("cursor is not valid base64url: {message}")]
    Base64 {
        /// Decoder failure description.
        message: String,
    },
    /// The decoded payload is not a well-formed envelope or key.
    #[error("cursor payload is malformed: {message}")]
    Json {
        /// Parser failure description.
        message: String,
    },
    /// The token was minted for a different key shape.
    #[error("cursor was issued for `{found}`, expected `{expected}`")]
    ShapeMismatch {
        /// Shape the caller asked for.
        expected: &'static str,
        /// Shape recorded in the token.
        found: String,
    },
    /// The key decoded but failed [`CursorKey::validate`].
    #[error("cursor key is invalid: {message}")]
    InvalidKey {
        /// Validation failure description.
        message: String,
    },
}

#[derive(Serialize)]
struct EnvelopeRef<'a, K> {
    shape: &'static str,
    key: &'a K,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawEnvelope {
    shape: String,
    key: Value,
}

pub(crate) fn encode_key<K: CursorKey>(key: &K) -> Result<String, CursorError> {
    key.validate()
        .map_err(|message| CursorError::InvalidKey { message })?;
    let envelope = EnvelopeRef {
        shape: K::SHAPE,
        key,
    };
    let json = serde_json::to_vec(&envelope).map_err(|err| CursorError::Encode {
        message: err.to_string(),
    })?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

/// Continuation point for a ranged query.
///
/// # Examples
///
/// ```
/// use pagination::{Cursor, CursorKey};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, PartialEq, Serialize, Deserialize)]
/// #[serde(deny_unknown_fields)]
/// struct Key {
///     id: u32,
/// }
///
/// impl CursorKey for Key {
///     const SHAPE: &'static str = "doc-key";
/// }
///
/// let token = Cursor::new(Key { id: 7 }).encode()?;
/// let decoded = Cursor::<Key>::decode(&token)?;
/// assert_eq!(decoded.key(), &Key { id: 7 });
/// # Ok::<(), pagination::CursorError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor<K> {
    key: K,
}

impl<K> Cursor<K> {
    /// Wrap a key.
    pub const fn new(key: K) -> Self {
        Self { key }
    }

    /// Borrow the wrapped key.
    pub const fn key(&self) -> &K {
        &self.key
    }

    /// Consume the cursor and return its key.
    pub fn into_key(self) -> K {
        self.key
    }
}

impl<K: CursorKey> Cursor<K> {
    /// Encode the key into an opaque, URL-safe token.
    ///
    /// Encoding is deterministic: equal keys always produce equal tokens.
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::InvalidKey`] when the key fails validation and
    /// [`CursorError::Encode`] when it cannot be serialised.
    pub fn encode(&self) -> Result<String, CursorError> {
        encode_key(&self.key)
    }

    /// Decode a token produced by [`Cursor::encode`] for the same key shape.
    ///
    /// # Errors
    ///
    /// Returns a [`CursorError`] when the token is not base64url, is not a
    /// cursor envelope, carries another shape tag, or holds a key that
    /// fails validation.
    pub fn decode(token: &str) -> Result<Self, CursorError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(token.as_bytes())
            .map_err(|err| CursorError::Base64 {
                message: err.to_string(),
            })?;
        let envelope: RawEnvelope =
            serde_json::from_slice(&bytes).map_err(|err| CursorError::Json {
                message: err.to_string(),
            })?;
        if envelope.shape != K::SHAPE {
            return Err(CursorError::ShapeMismatch {
                expected: K::SHAPE,
                found: envelope.shape,
            });
        }
        let key: K = serde_json::from_value(envelope.key).map_err(|err| CursorError::Json {
            message: err.to_string(),
        })?;
        key.validate()
            .map_err(|message| CursorError::InvalidKey { message })?;
        Ok(Self { key })
    }
}

//! Remote server identity and its stable identity key.
//!
//! A `ServerIdentity` names the remote endpoint a mirror session belongs
//! to. Its identity key is the directory name under which all snapshots
//! for that endpoint are kept, so the derivation has to be deterministic
//! and collision-free across distinct identities.

use serde::{Deserialize, Serialize};

/// Separator joining the identity fields into the identity key.
const KEY_SEPARATOR: char = '_';

/// Identity of a remote editing endpoint.
///
/// The three fields are opaque to Tether; they are only combined into
/// the identity key that names the per-endpoint snapshot root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerIdentity {
    /// Display name of the server configuration
    pub name: String,
    /// Remote host
    pub host: String,
    /// Remote user
    pub user: String,
}

impl ServerIdentity {
    /// Creates a new identity from its three components.
    pub fn new(
        name: impl Into<String>,
        host: impl Into<String>,
        user: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            user: user.into(),
        }
    }

    /// Derives the stable identity key naming this endpoint's snapshot root.
    ///
    /// The key is `name_host_user` with each field escaped so that the
    /// join is injective: identical triples always produce the same key
    /// and no two distinct triples can collide, even when a field itself
    /// contains the separator.
    pub fn identity_key(&self) -> String {
        format!(
            "{}{sep}{}{sep}{}",
            escape_field(&self.name),
            escape_field(&self.host),
            escape_field(&self.user),
            sep = KEY_SEPARATOR,
        )
    }
}

impl std::fmt::Display for ServerIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{} ({})", self.user, self.host, self.name)
    }
}

/// Percent-escapes the characters that would break key injectivity or
/// leak path components into the directory name.
///
/// `%` must be escaped first so escaped output never re-escapes itself.
fn escape_field(field: &str) -> String {
    let mut escaped = String::with_capacity(field.len());
    for c in field.chars() {
        match c {
            '%' => escaped.push_str("%25"),
            '_' => escaped.push_str("%5F"),
            '/' => escaped.push_str("%2F"),
            '\\' => escaped.push_str("%5C"),
            other => escaped.push(other),
        }
    }
    escaped
}

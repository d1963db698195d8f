//! Serializable Registry
//!
//! An explicit map from a type tag to the pair of functions that encode and
//! decode values of one Rust type. Registered values are exported wrapped in
//! an [`Envelope`]:
//!
//! ```json
//! { "type": "group_chat", "version": "0.1.0", "data": { ... } }
//! ```
//!
//! Registration rejects a tag that is already taken and a type that is
//! already registered under another tag, so every tag names exactly one type
//! and every type has exactly one tag.
//!
//! # Usage
//!
//! ```
//! use roundtable_domain::Message;
//! use roundtable_infrastructure::persistence::SerializableRegistry;
//!
//! let registry = SerializableRegistry::with_builtin_types().unwrap();
//! let envelope = registry.to_envelope(&Message::user("hi")).unwrap();
//! assert_eq!(envelope.type_name, "message");
//!
//! let message: Message = registry.from_envelope(envelope).unwrap();
//! assert_eq!(message.text(), "hi");
//! ```

use roundtable_domain::{GroupChatSnapshot, Message};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// Version stamped on every envelope
pub const SCHEMA_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Errors raised by the registry
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Type name '{0}' is already registered")]
    DuplicateTag(String),

    #[error("Type '{type_name}' is already registered as '{tag}'")]
    DuplicateType { type_name: &'static str, tag: String },

    #[error("Type '{0}' is not registered")]
    UnregisteredType(&'static str),

    #[error("Unknown type name '{0}'")]
    UnknownTag(String),

    #[error("Envelope type '{found}' does not match the expected type '{expected}'")]
    TagMismatch { expected: String, found: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Tagged, versioned wrapper around a serialized value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub type_name: String,
    pub version: String,
    pub data: Value,
}

type EncodeFn = fn(&dyn Any) -> Option<serde_json::Result<Value>>;
type DecodeFn = fn(Value) -> serde_json::Result<Box<dyn Any>>;

struct Entry {
    type_id: TypeId,
    type_name: &'static str,
    encode: EncodeFn,
    decode: DecodeFn,
}

fn encode<T: Serialize + 'static>(value: &dyn Any) -> Option<serde_json::Result<Value>> {
    value.downcast_ref::<T>().map(serde_json::to_value)
}

fn decode<T: DeserializeOwned + 'static>(data: Value) -> serde_json::Result<Box<dyn Any>> {
    Ok(Box::new(serde_json::from_value::<T>(data)?))
}

/// Registry of serializable types, keyed by tag
#[derive(Default)]
pub struct SerializableRegistry {
    entries: HashMap<String, Entry>,
}

impl SerializableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the conversation entities: `message` ([`Message`]) and
    /// `group_chat` ([`GroupChatSnapshot`]).
    pub fn with_builtin_types() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        registry.register::<Message>("message")?;
        registry.register::<GroupChatSnapshot>("group_chat")?;
        Ok(registry)
    }

    /// Register `T` under `tag`.
    pub fn register<T>(&mut self, tag: impl Into<String>) -> Result<(), RegistryError>
    where
        T: Serialize + DeserializeOwned + 'static,
    {
        let tag = tag.into();
        let type_id = TypeId::of::<T>();

        if let Some(existing) = self.tag_for(type_id) {
            return Err(RegistryError::DuplicateType {
                type_name: std::any::type_name::<T>(),
                tag: existing.to_string(),
            });
        }
        if self.entries.contains_key(&tag) {
            return Err(RegistryError::DuplicateTag(tag));
        }

        debug!(tag = %tag, type_name = std::any::type_name::<T>(), "Registered serializable type");
        self.entries.insert(
            tag,
            Entry {
                type_id,
                type_name: std::any::type_name::<T>(),
                encode: encode::<T>,
                decode: decode::<T>,
            },
        );
        Ok(())
    }

    /// Register `T` under its fully qualified Rust type name.
    pub fn register_default<T>(&mut self) -> Result<(), RegistryError>
    where
        T: Serialize + DeserializeOwned + 'static,
    {
        self.register::<T>(std::any::type_name::<T>())
    }

    /// Tag under which `T` is registered
    pub fn tag_of<T: 'static>(&self) -> Option<&str> {
        self.tag_for(TypeId::of::<T>())
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.entries.contains_key(tag)
    }

    /// Registered tags, sorted
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    fn tag_for(&self, type_id: TypeId) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, entry)| entry.type_id == type_id)
            .map(|(tag, _)| tag.as_str())
    }

    /// Wrap `value` in an envelope tagged with its registered type name.
    pub fn to_envelope<T: 'static>(&self, value: &T) -> Result<Envelope, RegistryError> {
        let (tag, entry) = self
            .entries
            .iter()
            .find(|(_, entry)| entry.type_id == TypeId::of::<T>())
            .ok_or(RegistryError::UnregisteredType(std::any::type_name::<T>()))?;

        let data = (entry.encode)(value)
            .ok_or(RegistryError::UnregisteredType(std::any::type_name::<T>()))??;

        Ok(Envelope {
            type_name: tag.clone(),
            version: SCHEMA_VERSION.to_string(),
            data,
        })
    }

    /// Decode an envelope whose payload type is known only at run time.
    pub fn decode(&self, envelope: Envelope) -> Result<Box<dyn Any>, RegistryError> {
        let entry = self
            .entries
            .get(&envelope.type_name)
            .ok_or_else(|| RegistryError::UnknownTag(envelope.type_name.clone()))?;

        if envelope.version != SCHEMA_VERSION {
            warn!(
                tag = %envelope.type_name,
                found = %envelope.version,
                current = SCHEMA_VERSION,
                "Decoding envelope written by another version"
            );
        }

        Ok((entry.decode)(envelope.data)?)
    }

    /// Decode an envelope into `T`, checking its tag first.
    pub fn from_envelope<T: 'static>(&self, envelope: Envelope) -> Result<T, RegistryError> {
        let entry = self
            .entries
            .get(&envelope.type_name)
            .ok_or_else(|| RegistryError::UnknownTag(envelope.type_name.clone()))?;

        if entry.type_id != TypeId::of::<T>() {
            return Err(RegistryError::TagMismatch {
                expected: self
                    .tag_of::<T>()
                    .unwrap_or(std::any::type_name::<T>())
                    .to_string(),
                found: format!("{} ({})", envelope.type_name, entry.type_name),
            });
        }

        self.decode(envelope)?
            .downcast::<T>()
            .map(|value| *value)
            .map_err(|_| RegistryError::UnregisteredType(std::any::type_name::<T>()))
    }

    /// Write `value` as a pretty-printed envelope to `path`.
    pub fn save<T: 'static>(&self, path: &Path, value: &T) -> Result<(), RegistryError> {
        let envelope = self.to_envelope(value)?;
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, &envelope)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Read an envelope from `path` and decode it into `T`.
    pub fn load<T: 'static>(&self, path: &Path) -> Result<T, RegistryError> {
        let envelope: Envelope = serde_json::from_reader(BufReader::new(File::open(path)?))?;
        self.from_envelope(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roundtable_domain::{GroupChatConfig, Role};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Note {
        text: String,
    }

    #[test]
    fn test_duplicate_tag_is_rejected() {
        let mut registry = SerializableRegistry::with_builtin_types().unwrap();
        let err = registry.register::<Note>("message").unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateTag(ref tag) if tag == "message"));
    }

    #[test]
    fn test_duplicate_type_is_rejected() {
        let mut registry = SerializableRegistry::new();
        registry.register::<Note>("note").unwrap();
        let err = registry.register::<Note>("memo").unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateType { ref tag, .. } if tag == "note"));
        assert_eq!(registry.tags(), vec!["note"]);
    }

    #[test]
    fn test_default_tag_is_type_path() {
        let mut registry = SerializableRegistry::new();
        registry.register_default::<Note>().unwrap();
        assert!(registry.tag_of::<Note>().unwrap().ends_with("Note"));
    }

    #[test]
    fn test_envelope_shape() {
        let registry = SerializableRegistry::with_builtin_types().unwrap();
        let envelope = registry
            .to_envelope(&Message::assistant("done").with_name("Coder"))
            .unwrap();

        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["type"], "message");
        assert_eq!(json["version"], SCHEMA_VERSION);
        assert_eq!(json["data"]["name"], "Coder");
        assert_eq!(json["data"]["role"], "assistant");
    }

    #[test]
    fn test_unregistered_type() {
        let registry = SerializableRegistry::with_builtin_types().unwrap();
        let err = registry
            .to_envelope(&Note {
                text: "x".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, RegistryError::UnregisteredType(_)));
    }

    #[test]
    fn test_unknown_tag_and_mismatch() {
        let registry = SerializableRegistry::with_builtin_types().unwrap();

        let unknown = Envelope {
            type_name: "ledger".to_string(),
            version: SCHEMA_VERSION.to_string(),
            data: Value::Null,
        };
        assert!(matches!(
            registry.from_envelope::<Message>(unknown),
            Err(RegistryError::UnknownTag(_))
        ));

        let envelope = registry.to_envelope(&Message::user("hi")).unwrap();
        let err = registry
            .from_envelope::<GroupChatSnapshot>(envelope)
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::TagMismatch { ref expected, .. } if expected == "group_chat"
        ));
    }

    #[test]
    fn test_dynamic_decode() {
        let registry = SerializableRegistry::with_builtin_types().unwrap();
        let envelope = registry.to_envelope(&Message::user("hi")).unwrap();
        let decoded = registry.decode(envelope).unwrap();
        assert_eq!(decoded.downcast_ref::<Message>().unwrap().role, Role::User);
    }

    #[test]
    fn test_snapshot_file_round_trip() {
        let registry = SerializableRegistry::with_builtin_types().unwrap();
        let snapshot = GroupChatSnapshot {
            roster: vec!["Admin".to_string(), "Coder".to_string()],
            config: GroupChatConfig::default().with_selection_method("round_robin"),
            messages: vec![
                Message::user("Write a parser").with_name("Admin"),
                Message::user("Here it is").with_name("Coder"),
            ],
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transcript.json");
        registry.save(&path, &snapshot).unwrap();

        let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["type"], "group_chat");

        let loaded: GroupChatSnapshot = registry.load(&path).unwrap();
        assert_eq!(loaded, snapshot);
    }
}

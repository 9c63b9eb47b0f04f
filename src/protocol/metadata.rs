//! Metadata propagation between request and response objects

use serde_json::Value;
use uuid::Uuid;

use super::{
    message::{Message, Metadata},
    task::{Task, TaskSendParams},
};

/// Metadata key holding the current message identity
pub const MESSAGE_ID_KEY: &str = "message_id";

/// Metadata key holding the previous message identity
pub const LAST_MESSAGE_ID_KEY: &str = "last_message_id";

/// Types that carry an optional metadata map
pub trait HasMetadata {
    fn metadata(&self) -> Option<&Metadata>;

    fn metadata_mut(&mut self) -> &mut Option<Metadata>;
}

impl HasMetadata for Task {
    fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    fn metadata_mut(&mut self) -> &mut Option<Metadata> {
        &mut self.metadata
    }
}

impl HasMetadata for Message {
    fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    fn metadata_mut(&mut self) -> &mut Option<Metadata> {
        &mut self.metadata
    }
}

impl HasMetadata for TaskSendParams {
    fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    fn metadata_mut(&mut self) -> &mut Option<Metadata> {
        &mut self.metadata
    }
}

/// Merge `source` metadata into `target`
///
/// Source keys win on collision. An empty or absent source leaves `target` untouched;
/// a target with no (or empty) metadata adopts a copy of the source map.
pub fn merge_metadata<T, S>(target: &mut T, source: &S)
where
    T: HasMetadata + ?Sized,
    S: HasMetadata + ?Sized,
{
    let Some(source) = source.metadata().filter(|m| !m.is_empty()) else {
        return;
    };

    let slot = target.metadata_mut();
    match slot {
        Some(existing) if !existing.is_empty() => {
            existing.extend(source.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        _ => *slot = Some(source.clone()),
    }
}

/// Merge metadata into a status message and rotate its identity
///
/// An existing `message_id` moves to `last_message_id` and a fresh `message_id`
/// is assigned, so consecutive turns stay linkable.
pub fn merge_message_metadata(target: &mut Message, source: &Message) {
    merge_metadata(target, source);

    let metadata = target.metadata.get_or_insert_with(Metadata::new);
    if let Some(previous) = metadata.remove(MESSAGE_ID_KEY) {
        metadata.insert(LAST_MESSAGE_ID_KEY.to_string(), previous);
    }
    metadata.insert(
        MESSAGE_ID_KEY.to_string(),
        Value::String(Uuid::new_v4().to_string()),
    );
}

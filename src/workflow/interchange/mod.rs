//! JSON interchange: export, tolerant import, and boundary normalization.
//!
//! Persisted and exchanged task payloads arrive in several historical
//! spellings (camelCase exports, snake_case stores, missing fields). All of
//! that tolerance lives here: records are decoded leniently, normalized
//! once into canonical domain tasks, and the rest of the crate only ever
//! sees the canonical form.

mod codec;
mod record;

pub use codec::{InterchangeError, export_tasks, import_tasks};
pub use record::{HistoryRecord, HourRevisionRecord, RecordError, TaskRecord};

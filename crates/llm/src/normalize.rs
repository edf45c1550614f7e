//! Interpretation normalizer.
//!
//! Model output is untrusted input. Whatever comes back — clean JSON,
//! fenced JSON, prose, or nothing — this module repairs it into a
//! complete [`InterpretationRecord`] in two tiers: a whole-object
//! fallback when no JSON object can be parsed, then a per-field
//! backfill so a partially valid object is repaired key by key.

use serde_json::{Map, Value};

use oneiro_core::constants::{FALLBACK_EXCERPT_CHARS, TAGS_MAX};
use oneiro_core::{InterpretationRecord, extract_object_span, strip_code_fence};

/// Tags used when the model supplied none (or not a list).
pub const DEFAULT_TAGS: [&str; 3] = ["dream", "interpretation", "insight"];

const FALLBACK_CORE_PREFIX: &str = "Thank you for sharing this meaningful dream with me.";

const DEFAULT_CORE: &str = "Thank you for sharing this profound dream with me. \
     Your subconscious is speaking to you in powerful ways.";
const DEFAULT_SYMBOLS: &str =
    "The symbols in your dream are rich with meaning and deserve careful consideration.";
const DEFAULT_EMOTIONAL: &str =
    "The emotional landscape of your dream reveals important insights about your inner world.";
const DEFAULT_GUIDANCE: &str = "Take time to sit with this interpretation. A reflection for you: \
     'My dreams guide me toward greater understanding and peace.'";
const DEFAULT_REFLECTION: &str = "Consider: What aspect of this dream feels most significant to \
     you? How does it relate to your current life path?";

/// Repair raw model output into a complete record.
///
/// Total: every input, including the empty string, yields all six
/// fields populated and 1–5 tags.
#[must_use]
pub fn normalize(raw: &str) -> InterpretationRecord {
    let cleaned = strip_code_fence(raw);
    let parsed = extract_object_span(cleaned)
        .and_then(|span| serde_json::from_str::<Value>(span).ok())
        .and_then(|value| match value {
            Value::Object(fields) => Some(fields),
            _ => None,
        });

    match parsed {
        Some(fields) => backfill(&fields),
        None => fallback_record(raw),
    }
}

/// Per-field repair: every empty, missing, or mistyped field is replaced
/// by its own stock default, independently of its siblings.
fn backfill(fields: &Map<String, Value>) -> InterpretationRecord {
    InterpretationRecord {
        core_interpretation: text_field(fields, "core_interpretation", DEFAULT_CORE),
        key_symbols: text_field(fields, "key_symbols", DEFAULT_SYMBOLS),
        emotional_significance: text_field(fields, "emotional_significance", DEFAULT_EMOTIONAL),
        guidance_actions: text_field(fields, "guidance_actions", DEFAULT_GUIDANCE),
        personal_reflection: text_field(fields, "personal_reflection", DEFAULT_REFLECTION),
        tags: tags_field(fields),
    }
}

fn text_field(fields: &Map<String, Value>, key: &str, default: &str) -> String {
    fields
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map_or_else(|| default.to_owned(), ToOwned::to_owned)
}

fn tags_field(fields: &Map<String, Value>) -> Vec<String> {
    let Some(Value::Array(items)) = fields.get("tags") else {
        return default_tags();
    };
    let tags: Vec<String> = items
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .take(TAGS_MAX)
        .collect();
    if tags.is_empty() { default_tags() } else { tags }
}

fn default_tags() -> Vec<String> {
    DEFAULT_TAGS.iter().map(|&t| t.to_owned()).collect()
}

/// Whole-object fallback when no JSON object could be parsed: the raw
/// text is kept as an excerpt inside an empathetic core interpretation,
/// the other fields take stock values.
fn fallback_record(raw: &str) -> InterpretationRecord {
    let quoted = excerpt(raw);
    let core_interpretation = if quoted.is_empty() {
        FALLBACK_CORE_PREFIX.to_owned()
    } else {
        format!("{FALLBACK_CORE_PREFIX} {quoted}")
    };
    InterpretationRecord {
        core_interpretation,
        key_symbols: DEFAULT_SYMBOLS.to_owned(),
        emotional_significance: DEFAULT_EMOTIONAL.to_owned(),
        guidance_actions: DEFAULT_GUIDANCE.to_owned(),
        personal_reflection: DEFAULT_REFLECTION.to_owned(),
        tags: default_tags(),
    }
}

fn excerpt(raw: &str) -> String {
    let trimmed = raw.trim();
    let taken: String = trimmed.chars().take(FALLBACK_EXCERPT_CHARS).collect();
    if trimmed.chars().count() > FALLBACK_EXCERPT_CHARS {
        format!("{taken}...")
    } else {
        taken
    }
}

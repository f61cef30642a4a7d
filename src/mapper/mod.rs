use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Metadata for a TikTok video
///
/// Every field is optional: the Supadata response shape varies between
/// metadata variants and absence is not an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub audio_url: Option<String>,
    pub author: Option<String>,
    pub likes: Option<u64>,
    pub views: Option<u64>,
    pub shares: Option<u64>,
    pub comments: Option<u64>,
}

/// Native captions for a TikTok video
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    /// Transcript text, always non-empty
    pub text: String,

    /// Language code reported by the provider, if any
    pub language: Option<String>,
}

/// Ordered candidate locations for one canonical field
///
/// The provider does not guarantee a stable top-level schema, so each field is
/// looked up through a fixed fallback chain: the flat canonical key first,
/// then a nested provider-specific alias. Earlier entries win; if none match
/// the field is absent. Shape changes are absorbed here as data edits.
type FieldChain = &'static [&'static [&'static str]];

const TITLE: FieldChain = &[&["title"], &["desc"]];
const DESCRIPTION: FieldChain = &[&["description"], &["desc"]];
const AUDIO_URL: FieldChain = &[&["audio_url"], &["music", "playUrl"]];
const AUTHOR: FieldChain = &[&["author"], &["author", "uniqueId"]];
const LIKES: FieldChain = &[&["likes"], &["stats", "diggCount"]];
const VIEWS: FieldChain = &[&["views"], &["stats", "playCount"]];
const SHARES: FieldChain = &[&["shares"], &["stats", "shareCount"]];
const COMMENTS: FieldChain = &[&["comments"], &["stats", "commentCount"]];
const TRANSCRIPT_TEXT: FieldChain = &[&["text"], &["transcript"]];
const TRANSCRIPT_LANGUAGE: FieldChain = &[&["language"], &["lang"]];

/// Map a raw metadata response body onto the canonical metadata fields
///
/// Never fails: absent or type-mismatched values degrade to `None`.
pub fn metadata_from_response(data: &Value) -> VideoMetadata {
    VideoMetadata {
        title: string_field(data, TITLE),
        description: string_field(data, DESCRIPTION),
        audio_url: string_field(data, AUDIO_URL),
        author: string_field(data, AUTHOR),
        likes: count_field(data, LIKES),
        views: count_field(data, VIEWS),
        shares: count_field(data, SHARES),
        comments: count_field(data, COMMENTS),
    }
}

/// Map a raw transcript response body onto a [`Transcript`]
///
/// Returns `None` when the body carries no transcript text; an empty string
/// counts as no transcript.
pub fn transcript_from_response(data: &Value) -> Option<Transcript> {
    let text = string_field(data, TRANSCRIPT_TEXT)?;

    Some(Transcript {
        text,
        language: string_field(data, TRANSCRIPT_LANGUAGE),
    })
}

/// Walk a nested key path through a JSON value
fn value_at<'a>(data: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(data, |value, key| value.get(key))
}

/// First non-empty string found along a fallback chain
///
/// A value of the wrong type (e.g. a flat `author` key holding an object)
/// falls through to the next chain entry.
fn string_field(data: &Value, chain: FieldChain) -> Option<String> {
    chain
        .iter()
        .find_map(|path| {
            value_at(data, path)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
        })
        .map(str::to_string)
}

/// First unsigned count found along a fallback chain
fn count_field(data: &Value, chain: FieldChain) -> Option<u64> {
    chain
        .iter()
        .find_map(|path| value_at(data, path).and_then(Value::as_u64))
}

//! Reply extraction from provider response envelopes.
//!
//! Each provider nests the reply text differently
//! (`choices[0].message.content`, `content[0].text`,
//! `candidates[0].content.parts[0].text`). A path is walked one step at a
//! time; any missing key, wrong JSON type, empty or short array, or non-JSON
//! body yields [`ClientError::Format`].

use serde_json::Value;

use crate::traits::ClientError;

/// One step into a JSON document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Object field.
    Key(&'static str),
    /// Array element.
    Index(usize),
}

/// Walk `path` from `root` and return the terminal string, if every step resolves.
pub fn text_at<'a>(root: &'a Value, path: &[Step]) -> Option<&'a str> {
    let mut current = root;
    for step in path {
        current = match step {
            Step::Key(key) => current.as_object()?.get(*key)?,
            Step::Index(index) => current.as_array()?.get(*index)?,
        };
    }
    current.as_str()
}

/// Parse `body` as JSON and extract the reply string at `path`.
pub fn extract_reply(provider: &str, body: &str, path: &[Step]) -> Result<String, ClientError> {
    let root: Value = serde_json::from_str(body).map_err(|_| ClientError::format(provider))?;
    text_at(&root, path)
        .map(str::to_string)
        .ok_or_else(|| ClientError::format(provider))
}

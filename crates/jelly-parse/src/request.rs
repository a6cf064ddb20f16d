use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::error::ParseError;

/// A single playback intent decoded from the payload.
///
/// Field names on the wire follow the userscript that produces them
/// (`mode`, `sub`). Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PlaybackRequest {
    /// Player backend identifier (e.g., "mpv", "potplayer").
    #[serde(rename = "mode", default, deserialize_with = "null_as_empty")]
    pub target: String,
    /// Media source address.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub url: String,
    /// mpv profile name.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub profile: Option<String>,
    /// Window placement, `WxH+X+Y` in pixels or percentages (e.g., "50%x50%+0+0").
    #[serde(default, deserialize_with = "empty_as_none")]
    pub geometry: Option<String>,
    /// Window/media title override.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub title: Option<String>,
    /// External subtitle address.
    #[serde(rename = "sub", default, deserialize_with = "empty_as_none")]
    pub subtitle_url: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.is_empty()))
}

/// Only JSON objects count as requests; serde would otherwise accept a
/// positional array for a struct.
fn request_from_object(object: Map<String, Value>) -> Result<PlaybackRequest, serde_json::Error> {
    PlaybackRequest::deserialize(Value::Object(object))
}

/// Interpret decoded text as an array of requests, or failing that, as a
/// single request.
///
/// On failure the error carries the text and the single-object parse error.
pub fn parse_requests(text: &str) -> Result<Vec<PlaybackRequest>, ParseError> {
    let batch = serde_json::from_str::<Vec<Map<String, Value>>>(text).and_then(|objects| {
        objects
            .into_iter()
            .map(request_from_object)
            .collect::<Result<Vec<_>, _>>()
    });
    if let Ok(batch) = batch {
        return Ok(batch);
    }

    serde_json::from_str::<Map<String, Value>>(text)
        .and_then(request_from_object)
        .map(|request| vec![request])
        .map_err(|source| ParseError::RequestFormat {
            data: text.to_string(),
            source,
        })
}

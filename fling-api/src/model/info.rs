use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{decode_string, field};
use crate::error::Result;

/// Descriptive information about the media loaded on a renderer.
///
/// All three fields are opaque: their structure is defined by whatever
/// content the renderer is playing, not by the client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaPlayerInfo {
    /// The media/content source
    pub source: String,
    /// Metadata associated with the media
    pub metadata: String,
    /// Extra data associated with the player
    pub extra: String,
}

impl MediaPlayerInfo {
    /// Decode the object a renderer returns from `getMediaInfo`.
    ///
    /// A null field decodes as an empty string; a missing field or a
    /// non-string value is a protocol error.
    pub fn from_value(value: &Value) -> Result<Self> {
        const WHAT: &str = "media info";
        Ok(Self {
            source: decode_string(field(value, "source", WHAT)?, "media info.source")?,
            metadata: decode_string(field(value, "metadata", WHAT)?, "media info.metadata")?,
            extra: decode_string(field(value, "extra", WHAT)?, "media info.extra")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ApiError;
    use serde_json::json;

    #[test]
    fn test_from_value() {
        let value = json!({
            "source": "http://media.local/clip.mp4",
            "metadata": "{\"title\":\"Clip\"}",
            "extra": null,
        });
        let info = MediaPlayerInfo::from_value(&value).unwrap();
        assert_eq!(info.source, "http://media.local/clip.mp4");
        assert_eq!(info.metadata, "{\"title\":\"Clip\"}");
        assert_eq!(info.extra, "");
    }

    #[test]
    fn test_not_an_object() {
        assert!(matches!(
            MediaPlayerInfo::from_value(&json!("clip.mp4")),
            Err(ApiError::ProtocolError(_))
        ));
    }
}

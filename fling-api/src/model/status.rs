//! Player status snapshot and its enums

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{decode_bool, decode_f64, field};
use crate::error::{ApiError, Result};

/// Enum whose variants travel as the renderer's own token (`"Playing"`, ...).
macro_rules! remote_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$vmeta:meta])* $variant:ident),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)*
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant,)*];

            /// The renderer's token for this variant.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant),)*
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ApiError;

            fn from_str(s: &str) -> Result<Self> {
                let token = s.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == token)
                    .ok_or_else(|| ApiError::protocol(format!(
                        "unknown {} '{}'", stringify!($name), token
                    )))
            }
        }
    };
}

remote_enum! {
    /// Lifecycle state of the remote player. Only the renderer moves it.
    MediaState {
        /// No source has been set
        NoSource,
        /// The renderer is loading the media
        PreparingMedia,
        ReadyToPlay,
        Playing,
        Paused,
        Seeking,
        Finished,
        /// The renderer hit an error
        Error,
    }
}

remote_enum! {
    /// Health of the link and content, orthogonal to [`MediaState`].
    MediaCondition {
        Good,
        WarningContent,
        /// Playback is constrained by bandwidth
        WarningBandwidth,
        ErrorContent,
        ErrorChannel,
        ErrorUnknown,
    }
}

/// Immutable snapshot of a renderer's status.
///
/// `mute` and `volume` are only meaningful when the matching `*_set` flag is
/// true; some renderers never report them. Prefer [`MediaPlayerStatus::volume`]
/// and [`MediaPlayerStatus::mute`], which return `None` in that case.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaPlayerStatus {
    media_state: MediaState,
    media_condition: MediaCondition,
    mute: bool,
    volume: f64,
    mute_set: bool,
    volume_set: bool,
}

impl MediaPlayerStatus {
    /// A status with neither mute nor volume reported.
    pub fn new(media_state: MediaState, media_condition: MediaCondition) -> Self {
        Self {
            media_state,
            media_condition,
            mute: false,
            volume: 0.0,
            mute_set: false,
            volume_set: false,
        }
    }

    /// Report a volume level, marking it meaningful.
    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = volume;
        self.volume_set = true;
        self
    }

    /// Report a mute state, marking it meaningful.
    pub fn with_mute(mut self, mute: bool) -> Self {
        self.mute = mute;
        self.mute_set = true;
        self
    }

    /// Decode the status object a renderer returns from `getStatus` or passes
    /// to a status listener.
    ///
    /// Expected keys: `state`, `condition`, `mute`, `volume`, `muteSet`,
    /// `volumeSet`. An unknown state or condition token is a protocol error.
    pub fn from_value(value: &Value) -> Result<Self> {
        const WHAT: &str = "status";
        let token = |key: &str| -> Result<String> {
            match field(value, key, WHAT)? {
                Value::String(s) => Ok(s.clone()),
                other => Err(ApiError::protocol(format!("{WHAT}.{key}: expected a token, got {other}"))),
            }
        };

        Ok(Self {
            media_state: token("state")?.parse()?,
            media_condition: token("condition")?.parse()?,
            mute: decode_bool(field(value, "mute", WHAT)?, "status.mute")?,
            volume: decode_f64(field(value, "volume", WHAT)?, "status.volume")?,
            mute_set: decode_bool(field(value, "muteSet", WHAT)?, "status.muteSet")?,
            volume_set: decode_bool(field(value, "volumeSet", WHAT)?, "status.volumeSet")?,
        })
    }

    pub fn media_state(&self) -> MediaState {
        self.media_state
    }

    pub fn media_condition(&self) -> MediaCondition {
        self.media_condition
    }

    /// Volume, if the renderer reports one.
    pub fn volume(&self) -> Option<f64> {
        self.volume_set.then_some(self.volume)
    }

    /// Mute state, if the renderer reports one.
    pub fn mute(&self) -> Option<bool> {
        self.mute_set.then_some(self.mute)
    }

    /// Raw volume field, regardless of `volume_set`.
    pub fn raw_volume(&self) -> f64 {
        self.volume
    }

    /// Raw mute field, regardless of `mute_set`.
    pub fn raw_mute(&self) -> bool {
        self.mute
    }

    pub fn is_volume_set(&self) -> bool {
        self.volume_set
    }

    pub fn is_mute_set(&self) -> bool {
        self.mute_set
    }
}

impl fmt::Display for MediaPlayerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mediaState: {} mediaCondition: {} mute: {} volume: {} muteSet: {} volumeSet: {}",
            self.media_state, self.media_condition, self.mute, self.volume, self.mute_set, self.volume_set
        )
    }
}

impl FromStr for MediaPlayerStatus {
    type Err = ApiError;

    /// Parse the layout produced by `Display`.
    fn from_str(s: &str) -> Result<Self> {
        let mut state = None;
        let mut condition = None;
        let mut mute = None;
        let mut volume = None;
        let mut mute_set = None;
        let mut volume_set = None;

        let mut tokens = s.split_whitespace();
        while let Some(key) = tokens.next() {
            let raw = tokens
                .next()
                .ok_or_else(|| ApiError::protocol(format!("status: '{key}' has no value")))?;
            let value = Value::String(raw.to_string());
            match key {
                "mediaState:" => state = Some(raw.parse::<MediaState>()?),
                "mediaCondition:" => condition = Some(raw.parse::<MediaCondition>()?),
                "mute:" => mute = Some(decode_bool(&value, "status.mute")?),
                "volume:" => volume = Some(decode_f64(&value, "status.volume")?),
                "muteSet:" => mute_set = Some(decode_bool(&value, "status.muteSet")?),
                "volumeSet:" => volume_set = Some(decode_bool(&value, "status.volumeSet")?),
                other => return Err(ApiError::protocol(format!("status: unknown key '{other}'"))),
            }
        }

        let missing = |name: &str| ApiError::protocol(format!("status: missing '{name}'"));
        Ok(Self {
            media_state: state.ok_or_else(|| missing("mediaState"))?,
            media_condition: condition.ok_or_else(|| missing("mediaCondition"))?,
            mute: mute.ok_or_else(|| missing("mute"))?,
            volume: volume.ok_or_else(|| missing("volume"))?,
            mute_set: mute_set.ok_or_else(|| missing("muteSet"))?,
            volume_set: volume_set.ok_or_else(|| missing("volumeSet"))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn playing() -> MediaPlayerStatus {
        MediaPlayerStatus::new(MediaState::Playing, MediaCondition::Good)
            .with_mute(false)
            .with_volume(0.5)
    }

    #[test]
    fn test_display_layout() {
        assert_eq!(
            playing().to_string(),
            "mediaState: Playing mediaCondition: Good mute: false volume: 0.5 muteSet: true volumeSet: true"
        );
    }

    #[test]
    fn test_display_parse_round_trip() {
        let status = playing();
        let parsed: MediaPlayerStatus = status.to_string().parse().unwrap();
        assert_eq!(parsed, status);
        assert_eq!(parsed.media_state(), MediaState::Playing);
        assert_eq!(parsed.media_condition(), MediaCondition::Good);
        assert_eq!(parsed.mute(), Some(false));
        assert_eq!(parsed.volume(), Some(0.5));
    }

    #[test]
    fn test_from_value() {
        let value = json!({
            "state": "Paused",
            "condition": "WarningBandwidth",
            "mute": "true",
            "volume": "0.75",
            "muteSet": true,
            "volumeSet": false,
        });
        let status = MediaPlayerStatus::from_value(&value).unwrap();
        assert_eq!(status.media_state(), MediaState::Paused);
        assert_eq!(status.media_condition(), MediaCondition::WarningBandwidth);
        assert_eq!(status.mute(), Some(true));
        assert_eq!(status.volume(), None);
        assert_eq!(status.raw_volume(), 0.75);
    }

    #[test]
    fn test_unknown_state_is_protocol_error() {
        let value = json!({
            "state": "Buffering",
            "condition": "Good",
            "mute": false,
            "volume": 0.5,
            "muteSet": true,
            "volumeSet": true,
        });
        let err = MediaPlayerStatus::from_value(&value).unwrap_err();
        assert!(matches!(err, ApiError::ProtocolError(ref m) if m.contains("Buffering")));
    }

    #[test]
    fn test_missing_field_is_protocol_error() {
        let value = json!({"state": "Playing", "condition": "Good"});
        assert!(matches!(
            MediaPlayerStatus::from_value(&value),
            Err(ApiError::ProtocolError(_))
        ));
    }

    #[test]
    fn test_parse_rejects_truncated_text() {
        assert!("mediaState: Playing mediaCondition:".parse::<MediaPlayerStatus>().is_err());
        assert!("mediaState: Playing".parse::<MediaPlayerStatus>().is_err());
    }

    #[test]
    fn test_enum_tokens() {
        for state in MediaState::ALL {
            assert_eq!(state.as_str().parse::<MediaState>().unwrap(), *state);
        }
        for condition in MediaCondition::ALL {
            assert_eq!(condition.to_string().parse::<MediaCondition>().unwrap(), *condition);
        }
        assert!("playing".parse::<MediaState>().is_err());
    }

    #[test]
    fn test_serde_uses_renderer_tokens() {
        let json = serde_json::to_value(playing()).unwrap();
        assert_eq!(json["mediaState"], "Playing");
        assert_eq!(json["volumeSet"], true);
        let back: MediaPlayerStatus = serde_json::from_value(json).unwrap();
        assert_eq!(back, playing());
    }

    proptest! {
        #[test]
        fn prop_display_parse_round_trip(
            state in prop::sample::select(MediaState::ALL.to_vec()),
            condition in prop::sample::select(MediaCondition::ALL.to_vec()),
            mute in any::<bool>(),
            volume in 0.0f64..=1.0,
            mute_set in any::<bool>(),
            volume_set in any::<bool>(),
        ) {
            let status = MediaPlayerStatus {
                media_state: state,
                media_condition: condition,
                mute,
                volume,
                mute_set,
                volume_set,
            };
            let parsed: MediaPlayerStatus = status.to_string().parse().unwrap();
            prop_assert_eq!(parsed, status);
        }
    }
}

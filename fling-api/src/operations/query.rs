//! Position, duration, status and media queries

use crate::define_player_operation;
use crate::model::{decode_bool, decode_i64, MediaPlayerInfo, MediaPlayerStatus};
use crate::Arg;

define_player_operation! {
    /// Current playback position in milliseconds
    operation: GetPositionOperation,
    method: "getPosition",
    request: {},
    response: i64,
    args: |_req| Vec::new(),
    parse: |value| decode_i64(&value, "position"),
}

define_player_operation! {
    /// Duration of the loaded media in milliseconds
    operation: GetDurationOperation,
    method: "getDuration",
    request: {},
    response: i64,
    args: |_req| Vec::new(),
    parse: |value| decode_i64(&value, "duration"),
}

define_player_operation! {
    operation: GetStatusOperation,
    method: "getStatus",
    request: {},
    response: MediaPlayerStatus,
    args: |_req| Vec::new(),
    parse: |value| MediaPlayerStatus::from_value(&value),
}

define_player_operation! {
    operation: GetMediaInfoOperation,
    method: "getMediaInfo",
    request: {},
    response: MediaPlayerInfo,
    args: |_req| Vec::new(),
    parse: |value| MediaPlayerInfo::from_value(&value),
}

define_player_operation! {
    operation: IsMimeTypeSupportedOperation,
    method: "isMimeTypeSupported",
    request: {
        mime_type: String,
    },
    response: bool,
    args: |req| vec![Arg::from(req.mime_type.clone())],
    parse: |value| decode_bool(&value, "mime type support"),
}

//! Volume and mute operations
//!
//! Not every renderer implements these; the default Fling receiver does not.
//! Check `MediaPlayerStatus::is_volume_set` / `is_mute_set` before relying on
//! them.

use crate::define_player_operation;
use crate::model::{decode_bool, decode_f64};
use crate::Arg;

define_player_operation! {
    /// Read the renderer's volume
    operation: GetVolumeOperation,
    method: "getVolume",
    request: {},
    response: f64,
    args: |_req| Vec::new(),
    parse: |value| decode_f64(&value, "volume"),
}

define_player_operation! {
    operation: SetVolumeOperation,
    method: "setVolume",
    request: {
        volume: f64,
    },
    response: (),
    args: |req| vec![Arg::from(req.volume)],
    parse: |_value| Ok(()),
}

define_player_operation! {
    /// Read the renderer's mute state
    operation: IsMuteOperation,
    method: "isMute",
    request: {},
    response: bool,
    args: |_req| Vec::new(),
    parse: |value| decode_bool(&value, "mute"),
}

define_player_operation! {
    operation: SetMuteOperation,
    method: "setMute",
    request: {
        mute: bool,
    },
    response: (),
    args: |req| vec![Arg::from(req.mute)],
    parse: |_value| Ok(()),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ApiError, PlayerOperation};
    use serde_json::json;

    #[test]
    fn test_get_volume_parses_string_form() {
        assert_eq!(GetVolumeOperation::parse_response(json!("0.35")).unwrap(), 0.35);
        assert!(matches!(
            GetVolumeOperation::parse_response(json!({})),
            Err(ApiError::ProtocolError(_))
        ));
    }

    #[test]
    fn test_set_volume_args() {
        let args = SetVolumeOperation::build_args(&SetVolumeOperationRequest { volume: 0.8 });
        assert_eq!(args.len(), 1);
        assert_eq!(args[0].as_value(), Some(&json!(0.8)));
        assert_eq!(SetVolumeOperation::METHOD, "setVolume");
    }

    #[test]
    fn test_is_mute_parse() {
        assert!(IsMuteOperation::parse_response(json!("true")).unwrap());
        assert!(!IsMuteOperation::parse_response(json!(false)).unwrap());
    }
}

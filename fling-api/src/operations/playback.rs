//! Transport control and media source operations

use crate::define_player_operation;
use crate::model::SeekMode;
use crate::Arg;

define_player_operation! {
    operation: PlayOperation,
    method: "play",
    request: {},
    response: (),
    args: |_req| Vec::new(),
    parse: |_value| Ok(()),
}

define_player_operation! {
    operation: PauseOperation,
    method: "pause",
    request: {},
    response: (),
    args: |_req| Vec::new(),
    parse: |_value| Ok(()),
}

define_player_operation! {
    operation: StopOperation,
    method: "stop",
    request: {},
    response: (),
    args: |_req| Vec::new(),
    parse: |_value| Ok(()),
}

define_player_operation! {
    /// Seek within the loaded media.
    ///
    /// The delta is sent exactly as given. Range rules (`0 <= delta < duration`
    /// for [`SeekMode::Absolute`]) are enforced by the renderer, not here.
    operation: SeekOperation,
    method: "seek",
    request: {
        mode: SeekMode,
        delta: i64,
    },
    response: (),
    args: |req| vec![Arg::from(req.mode.as_str()), Arg::from(req.delta)],
    parse: |_value| Ok(()),
}

define_player_operation! {
    operation: SetMediaSourceOperation,
    method: "setMediaSource",
    request: {
        url: String,
        title: String,
        auto_play: bool,
        play_in_background: bool,
    },
    response: (),
    args: |req| vec![
        Arg::from(req.url.clone()),
        Arg::from(req.title.clone()),
        Arg::from(req.auto_play),
        Arg::from(req.play_in_background),
    ],
    parse: |_value| Ok(()),
}

define_player_operation! {
    operation: SetPlayerStyleOperation,
    method: "setPlayerStyle",
    request: {
        style: String,
    },
    response: (),
    args: |req| vec![Arg::from(req.style.clone())],
    parse: |_value| Ok(()),
}

define_player_operation! {
    /// Interval in ms at which the renderer reports position changes
    operation: SetPositionUpdateIntervalOperation,
    method: "setPositionUpdateInterval",
    request: {
        interval_ms: i64,
    },
    response: (),
    args: |req| vec![Arg::from(req.interval_ms)],
    parse: |_value| Ok(()),
}

define_player_operation! {
    operation: SendCommandOperation,
    method: "sendCommand",
    request: {
        command: String,
    },
    response: (),
    args: |req| vec![Arg::from(req.command.clone())],
    parse: |_value| Ok(()),
}

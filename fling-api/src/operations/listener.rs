//! Status listener registration

use crate::define_player_operation;
use crate::{Arg, StatusCallback};

define_player_operation! {
    /// Register a status callback with the renderer
    operation: AddStatusListenerOperation,
    method: "addStatusListener",
    request: {
        callback: StatusCallback,
    },
    response: (),
    args: |req| vec![Arg::from(req.callback.clone())],
    parse: |_value| Ok(()),
}

define_player_operation! {
    /// Unregister a previously added status callback
    operation: RemoveStatusListenerOperation,
    method: "removeStatusListener",
    request: {
        callback: StatusCallback,
    },
    response: (),
    args: |req| vec![Arg::from(req.callback.clone())],
    parse: |_value| Ok(()),
}

//! Scripted in-memory renderer for tests.
//!
//! [`SimulatedBridge`] hosts any number of [`SimulatedPlayer`]s addressed by
//! [`ObjectRef`]. Each player keeps a small media state machine, answers the
//! Fling player methods, records every call it receives, and reports status
//! changes to registered [`StatusCallback`]s. Pending handles complete after
//! a configurable number of `is_done` polls so resolver behaviour can be
//! observed exactly.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{json, Value};

use crate::{Arg, Bridge, BridgeError, ObjectRef, PendingHandle, Reply, Result, StatusCallback};

/// A call as seen by a simulated player.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: String,
    /// Arguments rendered as JSON; callbacks appear as `{"callback": id}`
    pub args: Vec<Value>,
}

#[derive(Debug, Clone)]
struct MediaModel {
    state: &'static str,
    condition: &'static str,
    mute: bool,
    volume: f64,
    mute_supported: bool,
    volume_supported: bool,
    position: i64,
    duration: i64,
    source: String,
    title: String,
    auto_play: bool,
    style: Option<String>,
    position_update_interval: Option<i64>,
    commands: Vec<String>,
    mime_types: Vec<String>,
    prepare_polls_left: u32,
}

impl Default for MediaModel {
    fn default() -> Self {
        Self {
            state: "NoSource",
            condition: "Good",
            mute: false,
            volume: 0.5,
            mute_supported: true,
            volume_supported: true,
            position: 0,
            duration: 0,
            source: String::new(),
            title: String::new(),
            auto_play: false,
            style: None,
            position_update_interval: None,
            commands: Vec::new(),
            mime_types: vec!["video/mp4".to_string(), "audio/mpeg".to_string()],
            prepare_polls_left: 0,
        }
    }
}

impl MediaModel {
    fn status_value(&self) -> Value {
        json!({
            "state": self.state,
            "condition": self.condition,
            "mute": self.mute,
            "volume": self.volume,
            "muteSet": self.mute_supported,
            "volumeSet": self.volume_supported,
        })
    }
}

/// Shared state of one simulated renderer.
pub struct SimulatedPlayer {
    object: ObjectRef,
    name: String,
    unique_id: String,
    model: Mutex<MediaModel>,
    listeners: Mutex<Vec<StatusCallback>>,
    calls: Mutex<Vec<RecordedCall>>,
    connected: AtomicBool,
    latency_polls: AtomicU32,
    is_done_calls: AtomicU32,
    get_calls: AtomicU32,
    status_override: Mutex<Option<Value>>,
}

impl SimulatedPlayer {
    fn new(object: ObjectRef, name: &str, unique_id: &str) -> Self {
        Self {
            object,
            name: name.to_string(),
            unique_id: unique_id.to_string(),
            model: Mutex::new(MediaModel::default()),
            listeners: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            connected: AtomicBool::new(true),
            latency_polls: AtomicU32::new(0),
            is_done_calls: AtomicU32::new(0),
            get_calls: AtomicU32::new(0),
            status_override: Mutex::new(None),
        }
    }

    pub fn object(&self) -> &ObjectRef {
        &self.object
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    /// Number of `is_done() == false` answers each pending handle gives
    /// before completing.
    pub fn set_latency_polls(&self, polls: u32) {
        self.latency_polls.store(polls, Ordering::SeqCst);
    }

    /// Declare whether volume/mute are meaningful on this renderer.
    pub fn set_capabilities(&self, volume_supported: bool, mute_supported: bool) {
        let mut model = self.model.lock();
        model.volume_supported = volume_supported;
        model.mute_supported = mute_supported;
    }

    /// Number of `getStatus` calls the renderer spends preparing a new source.
    pub fn set_prepare_polls(&self, polls: u32) {
        self.model.lock().prepare_polls_left = polls;
    }

    pub fn set_duration(&self, duration_ms: i64) {
        self.model.lock().duration = duration_ms;
    }

    /// Replace the status object returned by `getStatus` verbatim.
    pub fn override_status(&self, status: Value) {
        *self.status_override.lock() = Some(status);
    }

    /// Drop the connection: every later call and poll fails with `Disconnected`.
    pub fn disconnect(&self) {
        tracing::debug!("simulated renderer {} disconnected", self.object);
        self.connected.store(false, Ordering::SeqCst);
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Calls of one method, in arrival order.
    pub fn calls_to(&self, method: &str) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.method == method)
            .cloned()
            .collect()
    }

    pub fn is_done_calls(&self) -> u32 {
        self.is_done_calls.load(Ordering::SeqCst)
    }

    pub fn get_calls(&self) -> u32 {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    pub fn position(&self) -> i64 {
        self.model.lock().position
    }

    pub fn state(&self) -> &'static str {
        self.model.lock().state
    }

    pub fn sent_commands(&self) -> Vec<String> {
        self.model.lock().commands.clone()
    }

    /// Push the current status to every registered listener, as the renderer
    /// does on its own schedule. Safe to call from any thread.
    pub fn emit_status(&self) {
        let (status, position) = {
            let model = self.model.lock();
            (model.status_value(), model.position)
        };
        let listeners = self.listeners.lock().clone();
        for listener in listeners {
            listener.on_status_change(status.clone(), position);
        }
    }

    fn set_state(&self, state: &'static str) {
        let changed = {
            let mut model = self.model.lock();
            let changed = model.state != state;
            model.state = state;
            changed
        };
        if changed {
            self.emit_status();
        }
    }

    fn record(&self, method: &str, args: &[Arg]) {
        let args = args
            .iter()
            .map(|arg| match arg {
                Arg::Value(v) => v.clone(),
                Arg::Callback(cb) => json!({ "callback": cb.id().value() }),
            })
            .collect();
        self.calls.lock().push(RecordedCall {
            method: method.to_string(),
            args,
        });
    }

    fn value_arg(args: &[Arg], index: usize, method: &str) -> Result<Value> {
        args.get(index)
            .and_then(Arg::as_value)
            .cloned()
            .ok_or_else(|| BridgeError::InvocationFailed(format!("{method}: missing argument {index}")))
    }

    fn callback_arg(args: &[Arg], method: &str) -> Result<StatusCallback> {
        args.first()
            .and_then(Arg::as_callback)
            .cloned()
            .ok_or_else(|| BridgeError::InvocationFailed(format!("{method}: expected a listener")))
    }

    fn handle(&self, method: &str, args: &[Arg]) -> Result<Value> {
        match method {
            "getVolume" => {
                let model = self.model.lock();
                if !model.volume_supported {
                    return Err(BridgeError::InvocationFailed("volume not supported".into()));
                }
                // The renderer hands numbers back through their string form.
                Ok(Value::String(model.volume.to_string()))
            }
            "setVolume" => {
                let volume = Self::value_arg(args, 0, method)?
                    .as_f64()
                    .ok_or_else(|| BridgeError::InvocationFailed("setVolume: not a number".into()))?;
                self.model.lock().volume = volume;
                self.emit_status();
                Ok(Value::Null)
            }
            "isMute" => Ok(Value::String(self.model.lock().mute.to_string())),
            "setMute" => {
                let mute = Self::value_arg(args, 0, method)?
                    .as_bool()
                    .ok_or_else(|| BridgeError::InvocationFailed("setMute: not a bool".into()))?;
                self.model.lock().mute = mute;
                self.emit_status();
                Ok(Value::Null)
            }
            "getPosition" => Ok(json!(self.model.lock().position)),
            "getDuration" => Ok(Value::String(self.model.lock().duration.to_string())),
            "getStatus" => {
                if let Some(status) = self.status_override.lock().clone() {
                    return Ok(status);
                }
                let ready = {
                    let mut model = self.model.lock();
                    if model.state == "PreparingMedia" {
                        if model.prepare_polls_left == 0 {
                            Some(if model.auto_play { "Playing" } else { "ReadyToPlay" })
                        } else {
                            model.prepare_polls_left -= 1;
                            None
                        }
                    } else {
                        None
                    }
                };
                if let Some(state) = ready {
                    self.set_state(state);
                }
                Ok(self.model.lock().status_value())
            }
            "getMediaInfo" => {
                let model = self.model.lock();
                Ok(json!({
                    "source": model.source,
                    "metadata": json!({ "title": model.title }).to_string(),
                    "extra": "",
                }))
            }
            "isMimeTypeSupported" => {
                let mime = Self::value_arg(args, 0, method)?;
                let supported = mime
                    .as_str()
                    .map(|m| self.model.lock().mime_types.iter().any(|t| t == m))
                    .unwrap_or(false);
                Ok(Value::String(supported.to_string()))
            }
            "play" => {
                let has_source = !self.model.lock().source.is_empty();
                if has_source {
                    self.set_state("Playing");
                }
                Ok(Value::Null)
            }
            "pause" => {
                self.set_state("Paused");
                Ok(Value::Null)
            }
            "stop" => {
                self.set_state("Finished");
                Ok(Value::Null)
            }
            "seek" => {
                let mode = Self::value_arg(args, 0, method)?;
                let delta = Self::value_arg(args, 1, method)?
                    .as_i64()
                    .ok_or_else(|| BridgeError::InvocationFailed("seek: delta not an integer".into()))?;
                {
                    let mut model = self.model.lock();
                    model.position = match mode.as_str() {
                        Some("Absolute") => delta,
                        Some("Relative") => (model.position + delta).max(0),
                        _ => return Err(BridgeError::InvocationFailed("seek: bad mode".into())),
                    };
                }
                self.emit_status();
                Ok(Value::Null)
            }
            "setMediaSource" => {
                let url = Self::value_arg(args, 0, method)?;
                let title = Self::value_arg(args, 1, method)?;
                let auto_play = Self::value_arg(args, 2, method)?.as_bool().unwrap_or(false);
                {
                    let mut model = self.model.lock();
                    model.source = url.as_str().unwrap_or_default().to_string();
                    model.title = title.as_str().unwrap_or_default().to_string();
                    model.auto_play = auto_play;
                    model.position = 0;
                }
                self.set_state("PreparingMedia");
                Ok(Value::Null)
            }
            "setPlayerStyle" => {
                let style = Self::value_arg(args, 0, method)?;
                self.model.lock().style = style.as_str().map(str::to_string);
                Ok(Value::Null)
            }
            "setPositionUpdateInterval" => {
                let interval = Self::value_arg(args, 0, method)?.as_i64();
                self.model.lock().position_update_interval = interval;
                Ok(Value::Null)
            }
            "sendCommand" => {
                let command = Self::value_arg(args, 0, method)?;
                self.model
                    .lock()
                    .commands
                    .push(command.as_str().unwrap_or_default().to_string());
                Ok(Value::Null)
            }
            "addStatusListener" => {
                let callback = Self::callback_arg(args, method)?;
                let mut listeners = self.listeners.lock();
                if !listeners.contains(&callback) {
                    listeners.push(callback);
                }
                Ok(Value::Null)
            }
            "removeStatusListener" => {
                let callback = Self::callback_arg(args, method)?;
                self.listeners.lock().retain(|l| *l != callback);
                Ok(Value::Null)
            }
            other => Err(BridgeError::NoSuchMethod(other.to_string())),
        }
    }
}

/// Pending result of a simulated call.
struct SimulatedPending {
    player: Arc<SimulatedPlayer>,
    outcome: Result<Value>,
    remaining: AtomicU32,
}

impl PendingHandle for SimulatedPending {
    fn is_done(&self) -> Result<bool> {
        if !self.player.is_connected() {
            return Err(BridgeError::Disconnected);
        }
        self.player.is_done_calls.fetch_add(1, Ordering::SeqCst);
        let remaining = self.remaining.load(Ordering::SeqCst);
        if remaining == 0 {
            Ok(true)
        } else {
            self.remaining.store(remaining - 1, Ordering::SeqCst);
            Ok(false)
        }
    }

    fn get(&self) -> Result<Value> {
        if !self.player.is_connected() {
            return Err(BridgeError::Disconnected);
        }
        self.player.get_calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

/// In-memory bridge routing calls to simulated players.
#[derive(Default)]
pub struct SimulatedBridge {
    players: Mutex<HashMap<ObjectRef, Arc<SimulatedPlayer>>>,
}

impl SimulatedBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a renderer and return its shared state.
    pub fn add_player(&self, object: &str, name: &str, unique_id: &str) -> Arc<SimulatedPlayer> {
        let object = ObjectRef::new(object);
        let player = Arc::new(SimulatedPlayer::new(object.clone(), name, unique_id));
        self.players.lock().insert(object, Arc::clone(&player));
        player
    }

    pub fn player(&self, object: &ObjectRef) -> Option<Arc<SimulatedPlayer>> {
        self.players.lock().get(object).cloned()
    }
}

impl Bridge for SimulatedBridge {
    fn invoke(&self, target: &ObjectRef, method: &str, args: Vec<Arg>) -> Result<Reply> {
        let player = self.player(target).ok_or(BridgeError::Disconnected)?;
        if !player.is_connected() {
            return Err(BridgeError::Disconnected);
        }
        player.record(method, &args);

        match method {
            "getName" => return Ok(Reply::Value(Value::String(player.name.clone()))),
            "getUniqueIdentifier" => return Ok(Reply::Value(Value::String(player.unique_id.clone()))),
            _ => {}
        }

        let outcome = player.handle(method, &args);
        if let Err(BridgeError::NoSuchMethod(_)) = outcome {
            return outcome.map(Reply::Value);
        }
        let latency = player.latency_polls.load(Ordering::SeqCst);
        Ok(Reply::Pending(Box::new(SimulatedPending {
            player,
            outcome,
            remaining: AtomicU32::new(latency),
        })))
    }
}

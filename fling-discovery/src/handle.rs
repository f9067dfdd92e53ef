use std::fmt;

use fling_bridge::ObjectRef;

/// A renderer found by discovery.
///
/// The unique id is only guaranteed stable for the scan that produced the
/// handle; do not persist it across scans.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemotePlayerHandle {
    object: ObjectRef,
    name: String,
    unique_id: String,
}

impl RemotePlayerHandle {
    pub fn new(object: ObjectRef, name: impl Into<String>, unique_id: impl Into<String>) -> Self {
        Self {
            object,
            name: name.into(),
            unique_id: unique_id.into(),
        }
    }

    /// Transport reference used to address the renderer.
    pub fn object(&self) -> &ObjectRef {
        &self.object
    }

    /// Friendly name, e.g. "LivingRoomTV"
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }
}

impl fmt::Display for RemotePlayerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.unique_id)
    }
}

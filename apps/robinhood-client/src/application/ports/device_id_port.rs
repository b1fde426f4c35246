//! Device Identifier Port

use crate::domain::DeviceId;

/// Source of fresh device identifiers.
pub trait DeviceIdSource: Send + Sync {
    /// Produce a new, random device identifier.
    fn next_device_id(&self) -> DeviceId;
}

/// UUID v4 device identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomDeviceIds;

impl DeviceIdSource for RandomDeviceIds {
    fn next_device_id(&self) -> DeviceId {
        DeviceId::new(uuid::Uuid::new_v4().to_string())
    }
}

mod clock;
mod collection;
mod device;
mod links;
mod logs;

pub use clock::{reconcile, ClockReading, ClockSample};
pub use collection::DeviceCollection;
pub use device::{Device, DeviceStatus};
pub use links::DeviceLinks;
pub use logs::LogBuffer;

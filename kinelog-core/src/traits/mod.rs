//! Hardware abstraction traits
//!
//! These traits define the interface between the control plane and
//! hardware-specific implementations.

pub mod display;
pub mod sensor;
pub mod storage;

pub use display::{DisplayBackend, DisplayError};
pub use sensor::{ImuSample, ImuSensor};
pub use storage::{StorageError, StorageMedium};

//! Utility Library
//!
//! Validation, storage, timers, device detection, analytics and DOM feedback
//! helpers shared by every page.

pub mod analytics;
pub mod device;
pub mod dom;
pub mod storage;
pub mod timing;
pub mod toast;
pub mod validation;

pub use device::DeviceClass;
pub use timing::throttle;

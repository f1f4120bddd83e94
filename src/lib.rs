//! # wmbus-json - Bounded JSON serializer for wM-Bus gateway telemetry
//!
//! Turns a borrowed, nested gateway report (gateway -> device readings
//! -> timestamped data points) into a single JSON document with a
//! fixed field layout, writing into a caller-supplied buffer and never
//! past its capacity.
//!
//! ## Key Properties
//!
//! - **Allocation-free**: one pass over borrowed data into a
//!   fixed-capacity buffer, no internal heap use
//! - **Provable capacity**: [`estimate_max_size`] returns a safe upper
//!   bound before any byte is written
//! - **Exact wire contract**: key order and numeric formatting are
//!   byte-for-byte stable across calls and versions
//! - **Two-way failure**: invalid input or insufficient buffer, both
//!   reported through the result channel, never panics
//!
//! ## Quick Start
//!
//! ```rust
//! use wmbus_json::{estimate_max_size, serialize, DataPoint, DeviceReading, GatewayData};
//!
//! let points = [DataPoint::new("1970-01-01 00:00", "1970-01-01 00:00", 107.752, "OK")];
//! let readings = [DeviceReading::new(
//!     "water",
//!     "waterstarm",
//!     "stromleser_50898527",
//!     "m3",
//!     &points,
//! )];
//! let gateway = GatewayData::new("gateway_1234", "1970-01-01", "stromleser", 15, 1, &readings);
//!
//! let mut buf = [0u8; 2048];
//! assert!(estimate_max_size(1, 1) <= buf.len());
//!
//! let written = serialize(&gateway, &mut buf).unwrap();
//! assert!(buf[..written].starts_with(b"[{\"gatewayId\":\"gateway_1234\""));
//! ```
//!
//! ## Modules
//!
//! - [`model`]: borrowed report types and field length limits
//! - [`validate`]: structural validation
//! - [`estimate`]: worst-case output size bound
//! - [`writer`]: bounds-checked JSON emission
//! - [`error`]: error types

#![cfg_attr(not(feature = "std"), no_std)]

// Modules
pub mod error;
pub mod estimate;
pub mod model;
pub mod validate;
pub mod writer;

// Re-exports for convenient access
pub use error::{Result, SerializeError};
pub use estimate::estimate_max_size;
pub use model::{DataPoint, DeviceReading, GatewayData};
pub use validate::validate;
#[cfg(feature = "std")]
pub use writer::to_vec;
pub use writer::serialize;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_basic_serialize() {
        let points = [DataPoint::new("1970-01-01 00:00", "1970-01-01 00:00", 107.752, "OK")];
        let readings = [DeviceReading::new(
            "water",
            "waterstarm",
            "stromleser_50898527",
            "m3",
            &points,
        )];
        let gateway = GatewayData::new("gateway_1234", "1970-01-01", "stromleser", 15, 1, &readings);

        assert!(validate(&gateway));

        let mut buf = [0u8; 2048];
        let written = serialize(&gateway, &mut buf).unwrap();

        assert!(written > 0);
        assert!(written <= estimate_max_size(1, 1));
        assert_eq!(buf[0], b'[');
        assert_eq!(buf[written - 1], b']');
    }
}

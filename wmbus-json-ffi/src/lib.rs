//! C bindings for the wmbus-json serializer
//!
//! This crate exposes the serializer to C firmware with the exact
//! struct layout and integer return contract of the original
//! `wmbus_json.h`: fixed-size `char[N]` fields, raw `data`/`readings`
//! pointers with explicit counts, and `serialize` returning the byte
//! count on success, `-2` for invalid input and `-1` for buffer
//! failures.
//!
//! # Safety
//!
//! All functions in this module accept raw pointers. Callers must
//! ensure:
//! - Pointers are valid for the duration of the call (NULL is handled
//!   and rejected)
//! - `data_count`/`device_count` do not exceed the lengths of the
//!   arrays they describe
//! - Fixed `char[N]` fields are NUL-terminated UTF-8 within their
//!   declared size
//! - Thread safety of the output buffer is managed by the caller

use std::ffi::{c_char, c_int};
use std::slice;

use wmbus_json::{serialize, DataPoint, DeviceReading, GatewayData};

/// Serialization failed because the output buffer is NULL, empty or
/// too small.
pub const WMBUS_JSON_ERROR_BUFFER: c_int = -1;

/// Serialization failed because the input graph is NULL, structurally
/// invalid, or carries unterminated / non-UTF-8 / over-limit fields.
pub const WMBUS_JSON_ERROR_INVALID: c_int = -2;

/// One timestamped measurement, C layout
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WmbusDataPoint {
    /// Gateway-side timestamp, NUL-terminated
    pub timestamp: [c_char; 17],
    /// Meter-side timestamp, NUL-terminated
    pub meter_datetime: [c_char; 17],
    /// Accumulated measurement value
    pub total_value: f32,
    /// Status flag ("OK"/"ERROR"), NUL-terminated
    pub status: [c_char; 8],
}

/// One device's report, C layout
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WmbusDeviceReading {
    /// Measured medium, NUL-terminated
    pub media: [c_char; 16],
    /// Meter model name, NUL-terminated
    pub meter: [c_char; 32],
    /// Unique device identifier, NUL-terminated
    pub device_id: [c_char; 64],
    /// Measurement unit, NUL-terminated
    pub unit: [c_char; 8],
    /// Pointer to `data_count` data points, caller-owned
    pub data: *const WmbusDataPoint,
    /// Number of valid entries behind `data`, must be > 0
    pub data_count: u8,
}

/// Top-level gateway report, C layout
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WmbusGatewayData {
    /// Gateway identifier, NUL-terminated
    pub gateway_id: [c_char; 32],
    /// Report date, NUL-terminated
    pub date: [c_char; 11],
    /// Device type label, NUL-terminated
    pub device_type: [c_char; 32],
    /// Reporting interval in minutes
    pub interval_minutes: u16,
    /// Caller-supplied aggregate data point count (passed through)
    pub total_readings: u32,
    /// Number of valid entries behind `readings`, must be > 0
    pub device_count: u8,
    /// Pointer to `device_count` device readings, caller-owned
    pub readings: *const WmbusDeviceReading,
}

/// Borrow a fixed `char[N]` field as `&str`.
///
/// Requires a NUL within the array (the caller contract) and valid
/// UTF-8 up to it.
fn fixed_str(field: &[c_char]) -> Option<&str> {
    let bytes = unsafe { slice::from_raw_parts(field.as_ptr().cast::<u8>(), field.len()) };
    let end = bytes.iter().position(|&b| b == 0)?;
    std::str::from_utf8(&bytes[..end]).ok()
}

/// Get the library version string
///
/// # Returns
///
/// A NUL-terminated string, valid for the lifetime of the program.
///
/// # Example (C)
///
/// ```c
/// printf("wmbus-json version: %s\n", wmbus_json_version());
/// ```
#[no_mangle]
pub extern "C" fn wmbus_json_version() -> *const c_char {
    static VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "\0");
    VERSION.as_ptr() as *const c_char
}

/// Upper bound in bytes on the JSON output for the given cardinalities
///
/// Pure and infallible; use it to size the buffer passed to
/// `wmbus_json_serialize`. The bound includes room for the NUL
/// terminator.
#[no_mangle]
pub extern "C" fn wmbus_json_max_size(device_count: u8, total_readings: u32) -> usize {
    wmbus_json::estimate_max_size(device_count, total_readings)
}

/// Check that a gateway report is structurally serializable
///
/// Structural checks only: non-NULL references and non-zero counts.
/// Field contents are not inspected.
///
/// # Returns
///
/// `true` if the report passes, `false` on the first violation
/// (including a NULL `data` pointer).
#[no_mangle]
pub extern "C" fn wmbus_json_validate(data: *const WmbusGatewayData) -> bool {
    let Some(data) = (unsafe { data.as_ref() }) else {
        return false;
    };
    if data.readings.is_null() || data.device_count == 0 {
        return false;
    }

    let readings = unsafe { slice::from_raw_parts(data.readings, data.device_count as usize) };
    readings
        .iter()
        .all(|reading| reading.data_count > 0 && !reading.data.is_null())
}

/// Serialize a gateway report to JSON
///
/// # Arguments
///
/// * `data` - Gateway report (may be NULL, rejected)
/// * `buffer` - Output buffer for the JSON text
/// * `buffer_size` - Capacity of `buffer` in bytes
///
/// # Returns
///
/// The number of bytes written (excluding the NUL terminator placed
/// after them) on success; `WMBUS_JSON_ERROR_INVALID` (-2) if the
/// input is NULL or fails validation; `WMBUS_JSON_ERROR_BUFFER` (-1)
/// if the buffer is NULL, empty, or too small. Validation runs before
/// the buffer checks, so invalid input wins when both fail. On any
/// negative return the buffer contents are undefined.
///
/// # Example (C)
///
/// ```c
/// char buf[4096];
/// int written = wmbus_json_serialize(&report, buf, sizeof(buf));
/// if (written < 0) {
///     // -2: bad input, -1: buffer problem
/// }
/// ```
#[no_mangle]
pub extern "C" fn wmbus_json_serialize(
    data: *const WmbusGatewayData,
    buffer: *mut c_char,
    buffer_size: usize,
) -> c_int {
    let Some(data) = (unsafe { data.as_ref() }) else {
        log::debug!("serialize rejected: NULL gateway pointer");
        return WMBUS_JSON_ERROR_INVALID;
    };
    if data.readings.is_null() || data.device_count == 0 {
        log::debug!("serialize rejected: no readings");
        return WMBUS_JSON_ERROR_INVALID;
    }

    let readings_c = unsafe { slice::from_raw_parts(data.readings, data.device_count as usize) };

    // Materialize the borrowed point slices first so the reading
    // structs can reference them.
    let mut point_storage: Vec<Vec<DataPoint<'_>>> = Vec::with_capacity(readings_c.len());
    for reading in readings_c {
        if reading.data.is_null() || reading.data_count == 0 {
            log::debug!("serialize rejected: reading without data points");
            return WMBUS_JSON_ERROR_INVALID;
        }
        let points_c = unsafe { slice::from_raw_parts(reading.data, reading.data_count as usize) };
        let mut points = Vec::with_capacity(points_c.len());
        for point in points_c {
            let (Some(timestamp), Some(meter_datetime), Some(status)) = (
                fixed_str(&point.timestamp),
                fixed_str(&point.meter_datetime),
                fixed_str(&point.status),
            ) else {
                log::debug!("serialize rejected: unterminated or non-UTF-8 data point field");
                return WMBUS_JSON_ERROR_INVALID;
            };
            points.push(DataPoint::new(
                timestamp,
                meter_datetime,
                point.total_value,
                status,
            ));
        }
        point_storage.push(points);
    }

    let mut readings = Vec::with_capacity(readings_c.len());
    for (reading, points) in readings_c.iter().zip(&point_storage) {
        let (Some(media), Some(meter), Some(device_id), Some(unit)) = (
            fixed_str(&reading.media),
            fixed_str(&reading.meter),
            fixed_str(&reading.device_id),
            fixed_str(&reading.unit),
        ) else {
            log::debug!("serialize rejected: unterminated or non-UTF-8 reading field");
            return WMBUS_JSON_ERROR_INVALID;
        };
        readings.push(DeviceReading::new(media, meter, device_id, unit, points));
    }

    let (Some(gateway_id), Some(date), Some(device_type)) = (
        fixed_str(&data.gateway_id),
        fixed_str(&data.date),
        fixed_str(&data.device_type),
    ) else {
        log::debug!("serialize rejected: unterminated or non-UTF-8 gateway field");
        return WMBUS_JSON_ERROR_INVALID;
    };
    let gateway = GatewayData::new(
        gateway_id,
        date,
        device_type,
        data.interval_minutes,
        data.total_readings,
        &readings,
    );

    // Buffer checks come after input validation: -2 wins over -1.
    if buffer.is_null() || buffer_size == 0 {
        return WMBUS_JSON_ERROR_BUFFER;
    }
    let out = unsafe { slice::from_raw_parts_mut(buffer.cast::<u8>(), buffer_size) };

    match serialize(&gateway, out) {
        Ok(written) => {
            if written >= buffer_size {
                // No room left for the NUL terminator.
                return WMBUS_JSON_ERROR_BUFFER;
            }
            out[written] = 0;
            written as c_int
        }
        Err(e) => {
            log::debug!("serialize failed: {}", e);
            e.code()
        }
    }
}

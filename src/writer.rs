//! Bounds-checked JSON emission
//!
//! A single straight-line pass over the gateway graph: gateway fields,
//! then readings in index order, then each reading's data points in
//! index order. Every append checks remaining capacity first, so the
//! writer can never touch memory past the caller's buffer; the first
//! append that would not fit aborts the whole call and the buffer's
//! partial contents are undefined.
//!
//! The key order of the output is part of the wire contract and must
//! not change: downstream consumers compare documents byte-for-byte.

use core::fmt::{self, Write as _};

use crate::error::{Result, SerializeError};
use crate::model::{DataPoint, DeviceReading, GatewayData};
use crate::validate::validate;

/// Incremental writer over a fixed-capacity byte buffer.
struct JsonWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
    // Capacity error captured inside `fmt::Write`, which can only
    // surface the unit `fmt::Error`.
    pending: Option<SerializeError>,
}

impl<'a> JsonWriter<'a> {
    fn new(buf: &'a mut [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            pending: None,
        }
    }

    /// Append raw text, failing without side effects if it does not fit.
    fn append(&mut self, s: &str) -> Result<()> {
        let bytes = s.as_bytes();
        let end = self.pos + bytes.len();
        if end > self.buf.len() {
            return Err(SerializeError::BufferTooSmall {
                needed: end,
                available: self.buf.len(),
            });
        }
        self.buf[self.pos..end].copy_from_slice(bytes);
        self.pos = end;
        Ok(())
    }

    /// Append text wrapped in quotes. No escaping: inputs are
    /// caller-guaranteed safe ASCII identifiers and values.
    fn append_quoted(&mut self, s: &str) -> Result<()> {
        self.append("\"")?;
        self.append(s)?;
        self.append("\"")
    }

    /// Append an unsigned integer as plain decimal text.
    fn append_uint(&mut self, value: u32) -> Result<()> {
        self.append_fmt(format_args!("{}", value))
    }

    /// Append a float in fixed-point notation with exactly three
    /// fractional digits, never exponential.
    fn append_float(&mut self, value: f32) -> Result<()> {
        self.append_fmt(format_args!("{:.3}", value))
    }

    fn append_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<()> {
        match self.write_fmt(args) {
            Ok(()) => Ok(()),
            // Formatting of integers and floats is infallible; the
            // only failure path is a capacity miss in write_str.
            Err(_) => Err(self.pending.take().unwrap_or(SerializeError::BufferTooSmall {
                needed: self.pos + 1,
                available: self.buf.len(),
            })),
        }
    }
}

impl fmt::Write for JsonWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.append(s).map_err(|e| {
            self.pending = Some(e);
            fmt::Error
        })
    }
}

/// Serialize a gateway report into `buf`.
///
/// Validation runs first: a structurally invalid gateway fails with
/// [`SerializeError::InvalidInput`] before the buffer is touched, and
/// an over-limit text field fails with [`SerializeError::FieldTooLong`]
/// (invalid input takes precedence over buffer problems when both
/// hold). An empty or too-small buffer fails with
/// [`SerializeError::BufferTooSmall`]; on that path the buffer may
/// hold a partial document and must not be used.
///
/// On success returns the exact number of bytes written. The output is
/// not NUL-terminated: slices are length-tracked, and C callers get
/// their terminator from the FFI layer.
pub fn serialize(gateway: &GatewayData<'_>, buf: &mut [u8]) -> Result<usize> {
    if !validate(gateway) {
        #[cfg(feature = "logging")]
        log::debug!("serialize rejected: gateway failed structural validation");
        return Err(SerializeError::InvalidInput);
    }
    gateway.check_limits()?;
    if buf.is_empty() {
        return Err(SerializeError::BufferTooSmall {
            needed: 1,
            available: 0,
        });
    }

    let mut w = JsonWriter::new(buf);

    w.append("[{\"gatewayId\":")?;
    w.append_quoted(gateway.gateway_id)?;
    w.append(",\"date\":")?;
    w.append_quoted(gateway.date)?;
    w.append(",\"deviceType\":")?;
    w.append_quoted(gateway.device_type)?;
    w.append(",\"interval_minutes\":")?;
    w.append_uint(u32::from(gateway.interval_minutes))?;
    w.append(",\"total_readings\":")?;
    w.append_uint(gateway.total_readings)?;
    w.append(",\"values\":{\"device_count\":")?;
    w.append_uint(gateway.readings.len() as u32)?;
    w.append(",\"readings\":[")?;

    for (i, reading) in gateway.readings.iter().enumerate() {
        if i > 0 {
            w.append(",")?;
        }
        write_reading(&mut w, reading)?;
    }

    w.append("]}}]")?;

    Ok(w.pos)
}

fn write_reading(w: &mut JsonWriter<'_>, reading: &DeviceReading<'_>) -> Result<()> {
    w.append("{\"media\":")?;
    w.append_quoted(reading.media)?;
    w.append(",\"meter\":")?;
    w.append_quoted(reading.meter)?;
    w.append(",\"deviceId\":")?;
    w.append_quoted(reading.device_id)?;
    w.append(",\"unit\":")?;
    w.append_quoted(reading.unit)?;
    w.append(",\"data\":[")?;

    for (i, point) in reading.data.iter().enumerate() {
        if i > 0 {
            w.append(",")?;
        }
        write_data_point(w, point)?;
    }

    w.append("]}")
}

fn write_data_point(w: &mut JsonWriter<'_>, point: &DataPoint<'_>) -> Result<()> {
    w.append("{\"timestamp\":")?;
    w.append_quoted(point.timestamp)?;
    w.append(",\"meter_datetime\":")?;
    w.append_quoted(point.meter_datetime)?;
    w.append(",\"total_m3\":")?;
    w.append_float(point.total_value)?;
    w.append(",\"status\":")?;
    w.append_quoted(point.status)?;
    w.append("}")
}

/// Serialize into a freshly allocated buffer sized by the estimator.
///
/// Convenience for hosted callers; the fixed-capacity [`serialize`]
/// remains the primary contract.
#[cfg(feature = "std")]
pub fn to_vec(gateway: &GatewayData<'_>) -> Result<Vec<u8>> {
    use crate::estimate::estimate_max_size;

    if !validate(gateway) {
        return Err(SerializeError::InvalidInput);
    }
    // validate() bounds readings.len() and the per-reading point
    // counts, so these casts cannot truncate.
    let capacity = estimate_max_size(
        gateway.readings.len() as u8,
        gateway.data_point_count() as u32,
    );
    let mut buf = vec![0u8; capacity];
    let written = serialize(gateway, &mut buf)?;
    buf.truncate(written);
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_points() -> [DataPoint<'static>; 2] {
        [
            DataPoint::new("1970-01-01 00:00", "1970-01-01 00:00", 107.752, "OK"),
            DataPoint::new("1970-01-01 00:15", "1970-01-01 00:15", 107.9, "ERROR"),
        ]
    }

    #[test]
    fn test_writer_append_exact_fit() {
        let mut buf = [0u8; 4];
        let mut w = JsonWriter::new(&mut buf);
        assert!(w.append("[{}]").is_ok());
        assert_eq!(w.pos, 4);
        assert_eq!(&buf, b"[{}]");
    }

    #[test]
    fn test_writer_append_overflow_reports_sizes() {
        let mut buf = [0u8; 3];
        let mut w = JsonWriter::new(&mut buf);
        let err = w.append("[{}]").unwrap_err();
        assert_eq!(
            err,
            SerializeError::BufferTooSmall {
                needed: 4,
                available: 3
            }
        );
        // Failed append leaves the position untouched.
        assert_eq!(w.pos, 0);
    }

    #[test]
    fn test_float_formatting_three_digits() {
        let mut buf = [0u8; 32];
        let mut w = JsonWriter::new(&mut buf);
        w.append_float(107.752).unwrap();
        w.append(",").unwrap();
        w.append_float(0.1).unwrap();
        w.append(",").unwrap();
        w.append_float(-2.0).unwrap();
        let written = w.pos;
        assert_eq!(&buf[..written], b"107.752,0.100,-2.000");
    }

    #[test]
    fn test_float_formatting_overflow_maps_to_buffer_error() {
        let mut buf = [0u8; 4];
        let mut w = JsonWriter::new(&mut buf);
        let err = w.append_float(107.752).unwrap_err();
        assert!(matches!(err, SerializeError::BufferTooSmall { .. }));
    }

    #[test]
    fn test_uint_formatting() {
        let mut buf = [0u8; 24];
        let mut w = JsonWriter::new(&mut buf);
        w.append_uint(0).unwrap();
        w.append(",").unwrap();
        w.append_uint(65535).unwrap();
        w.append(",").unwrap();
        w.append_uint(u32::MAX).unwrap();
        let written = w.pos;
        assert_eq!(&buf[..written], b"0,65535,4294967295");
    }

    #[test]
    fn test_serialize_two_devices_comma_separated() {
        let points = sample_points();
        let readings = [
            DeviceReading::new("water", "waterstarm", "dev_a", "m3", &points[..1]),
            DeviceReading::new("electricity", "powermax", "dev_b", "kWh", &points[1..]),
        ];
        let gateway = GatewayData::new("gw", "1970-01-01", "stromleser", 15, 2, &readings);

        let mut buf = [0u8; 1024];
        let written = serialize(&gateway, &mut buf).unwrap();
        let out = core::str::from_utf8(&buf[..written]).unwrap();

        // First reading closes its data array and object before the
        // second reading begins.
        assert!(out.contains("\"deviceId\":\"dev_a\""));
        assert!(out.contains("}]},{\"media\":\"electricity\""));
        assert!(out.ends_with("]}}]"));
    }

    #[test]
    fn test_serialize_invalid_before_buffer_check() {
        // Both error conditions hold; invalid input must win.
        let gateway = GatewayData::new("gw", "1970-01-01", "stromleser", 15, 0, &[]);
        let err = serialize(&gateway, &mut []).unwrap_err();
        assert_eq!(err, SerializeError::InvalidInput);
    }

    #[test]
    fn test_serialize_empty_buffer() {
        let points = sample_points();
        let readings = [DeviceReading::new("water", "waterstarm", "dev", "m3", &points)];
        let gateway = GatewayData::new("gw", "1970-01-01", "stromleser", 15, 2, &readings);
        let err = serialize(&gateway, &mut []).unwrap_err();
        assert!(matches!(err, SerializeError::BufferTooSmall { .. }));
    }

    #[test]
    fn test_serialize_rejects_over_limit_field() {
        let points = sample_points();
        let readings = [DeviceReading::new(
            "water",
            "waterstarm",
            "dev",
            "cubic_meters",
            &points,
        )];
        let gateway = GatewayData::new("gw", "1970-01-01", "stromleser", 15, 2, &readings);
        let mut buf = [0u8; 1024];
        let err = serialize(&gateway, &mut buf).unwrap_err();
        assert!(matches!(
            err,
            SerializeError::FieldTooLong { field: "unit", .. }
        ));
        assert_eq!(err.code(), -2);
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_to_vec_matches_fixed_buffer_path() {
        let points = sample_points();
        let readings = [DeviceReading::new("water", "waterstarm", "dev", "m3", &points)];
        let gateway = GatewayData::new("gw", "1970-01-01", "stromleser", 15, 2, &readings);

        let owned = to_vec(&gateway).unwrap();
        let mut buf = [0u8; 2048];
        let written = serialize(&gateway, &mut buf).unwrap();
        assert_eq!(owned, &buf[..written]);
    }
}

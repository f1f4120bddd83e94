//! Telemetry data model
//!
//! The three types mirror the report structure of a wM-Bus gateway:
//! a gateway aggregates device readings, each reading carries an
//! ordered run of timestamped data points. All collections and text
//! fields are borrowed from the caller for the duration of a call;
//! the serializer never allocates or mutates them.

use crate::error::{Result, SerializeError};

/// Maximum length of `gateway_id` in bytes
pub const MAX_GATEWAY_ID_LEN: usize = 31;
/// Maximum length of `date` in bytes
pub const MAX_DATE_LEN: usize = 10;
/// Maximum length of `device_type` in bytes
pub const MAX_DEVICE_TYPE_LEN: usize = 31;
/// Maximum length of `media` in bytes
pub const MAX_MEDIA_LEN: usize = 15;
/// Maximum length of `meter` in bytes
pub const MAX_METER_LEN: usize = 31;
/// Maximum length of `device_id` in bytes
pub const MAX_DEVICE_ID_LEN: usize = 63;
/// Maximum length of `unit` in bytes
pub const MAX_UNIT_LEN: usize = 7;
/// Maximum length of `timestamp` and `meter_datetime` in bytes
pub const MAX_TIMESTAMP_LEN: usize = 16;
/// Maximum length of `status` in bytes
pub const MAX_STATUS_LEN: usize = 7;

/// Maximum number of device readings per gateway (wire format carries
/// the device count as u8)
pub const MAX_DEVICES: usize = 255;
/// Maximum number of data points per device reading (u8 on the wire)
pub const MAX_DATA_POINTS_PER_DEVICE: usize = 255;

/// One timestamped measurement with a status flag
///
/// `timestamp` and `meter_datetime` are independently supplied; they
/// are conventionally equal but nothing requires it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataPoint<'a> {
    /// Gateway-side timestamp, e.g. "1970-01-01 00:00"
    pub timestamp: &'a str,
    /// Meter-side timestamp
    pub meter_datetime: &'a str,
    /// Accumulated measurement value
    pub total_value: f32,
    /// Status flag, e.g. "OK" or "ERROR"
    pub status: &'a str,
}

impl<'a> DataPoint<'a> {
    /// Create a new data point
    pub fn new(
        timestamp: &'a str,
        meter_datetime: &'a str,
        total_value: f32,
        status: &'a str,
    ) -> Self {
        Self {
            timestamp,
            meter_datetime,
            total_value,
            status,
        }
    }

    /// Check every text field against its declared maximum length
    pub fn check_limits(&self) -> Result<()> {
        check_len("timestamp", self.timestamp, MAX_TIMESTAMP_LEN)?;
        check_len("meter_datetime", self.meter_datetime, MAX_TIMESTAMP_LEN)?;
        check_len("status", self.status, MAX_STATUS_LEN)
    }
}

/// One device's report for a period
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceReading<'a> {
    /// Measured medium, e.g. "water" or "electricity"
    pub media: &'a str,
    /// Meter model name
    pub meter: &'a str,
    /// Unique device identifier
    pub device_id: &'a str,
    /// Measurement unit, e.g. "m3" or "kWh"
    pub unit: &'a str,
    /// Data points in report order, owned by the caller
    pub data: &'a [DataPoint<'a>],
}

impl<'a> DeviceReading<'a> {
    /// Create a new device reading over a caller-owned run of points
    pub fn new(
        media: &'a str,
        meter: &'a str,
        device_id: &'a str,
        unit: &'a str,
        data: &'a [DataPoint<'a>],
    ) -> Self {
        Self {
            media,
            meter,
            device_id,
            unit,
            data,
        }
    }

    /// Number of data points in this reading
    pub fn data_count(&self) -> usize {
        self.data.len()
    }

    /// Check this reading's text fields and those of its data points
    pub fn check_limits(&self) -> Result<()> {
        check_len("media", self.media, MAX_MEDIA_LEN)?;
        check_len("meter", self.meter, MAX_METER_LEN)?;
        check_len("device_id", self.device_id, MAX_DEVICE_ID_LEN)?;
        check_len("unit", self.unit, MAX_UNIT_LEN)?;
        for point in self.data {
            point.check_limits()?;
        }
        Ok(())
    }
}

/// The top-level unit of serialization: one gateway's report
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GatewayData<'a> {
    /// Gateway identifier
    pub gateway_id: &'a str,
    /// Report date, e.g. "1970-01-01"
    pub date: &'a str,
    /// Device type label
    pub device_type: &'a str,
    /// Reporting interval in minutes
    pub interval_minutes: u16,
    /// Caller-supplied aggregate data point count. Passed through to
    /// the output verbatim, never cross-checked against `readings`.
    pub total_readings: u32,
    /// Device readings in report order, owned by the caller
    pub readings: &'a [DeviceReading<'a>],
}

impl<'a> GatewayData<'a> {
    /// Create a new gateway report over caller-owned readings
    pub fn new(
        gateway_id: &'a str,
        date: &'a str,
        device_type: &'a str,
        interval_minutes: u16,
        total_readings: u32,
        readings: &'a [DeviceReading<'a>],
    ) -> Self {
        Self {
            gateway_id,
            date,
            device_type,
            interval_minutes,
            total_readings,
            readings,
        }
    }

    /// Number of device readings
    pub fn device_count(&self) -> usize {
        self.readings.len()
    }

    /// Total data points across all readings
    pub fn data_point_count(&self) -> usize {
        self.readings.iter().map(|r| r.data.len()).sum()
    }

    /// Check every text field in the graph against its maximum length
    pub fn check_limits(&self) -> Result<()> {
        check_len("gateway_id", self.gateway_id, MAX_GATEWAY_ID_LEN)?;
        check_len("date", self.date, MAX_DATE_LEN)?;
        check_len("device_type", self.device_type, MAX_DEVICE_TYPE_LEN)?;
        for reading in self.readings {
            reading.check_limits()?;
        }
        Ok(())
    }
}

fn check_len(field: &'static str, value: &str, max: usize) -> Result<()> {
    if value.len() > max {
        return Err(SerializeError::FieldTooLong {
            field,
            len: value.len(),
            max,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_derive_from_slices() {
        let points = [
            DataPoint::new("1970-01-01 00:00", "1970-01-01 00:00", 1.0, "OK"),
            DataPoint::new("1970-01-01 00:15", "1970-01-01 00:15", 1.5, "OK"),
        ];
        let readings = [DeviceReading::new(
            "water",
            "waterstarm",
            "stromleser_50898527",
            "m3",
            &points,
        )];
        let gateway = GatewayData::new("gw", "1970-01-01", "stromleser", 15, 2, &readings);

        assert_eq!(gateway.device_count(), 1);
        assert_eq!(gateway.data_point_count(), 2);
        assert_eq!(readings[0].data_count(), 2);
    }

    #[test]
    fn test_limits_pass_at_maximum() {
        let long = "x".repeat(63);
        let point = DataPoint::new(&long[..16], &long[..16], 0.0, &long[..7]);
        assert!(point.check_limits().is_ok());

        let points = [point];
        let reading =
            DeviceReading::new(&long[..15], &long[..31], &long[..63], &long[..7], &points);
        assert!(reading.check_limits().is_ok());

        let readings = [reading];
        let gateway = GatewayData::new(
            &long[..31],
            &long[..10],
            &long[..31],
            u16::MAX,
            u32::MAX,
            &readings,
        );
        assert!(gateway.check_limits().is_ok());
    }

    #[test]
    fn test_limits_reject_overflow() {
        let points = [DataPoint::new("1970-01-01 00:00", "1970-01-01 00:00", 1.0, "OK")];
        let reading = DeviceReading::new("water", "waterstarm", "dev", "cubic_meters", &points);
        let err = reading.check_limits().unwrap_err();
        assert_eq!(
            err,
            SerializeError::FieldTooLong {
                field: "unit",
                len: 12,
                max: MAX_UNIT_LEN
            }
        );
    }

    #[test]
    fn test_limits_descend_into_points() {
        let points = [DataPoint::new(
            "1970-01-01 00:00:00.000",
            "1970-01-01 00:00",
            1.0,
            "OK",
        )];
        let reading = DeviceReading::new("water", "waterstarm", "dev", "m3", &points);
        assert!(matches!(
            reading.check_limits(),
            Err(SerializeError::FieldTooLong {
                field: "timestamp",
                ..
            })
        ));
    }
}

//! Structural validation
//!
//! Runs before any byte is written. Only the shape of the graph is
//! checked: text contents are the caller's contract and are enforced
//! separately by the length checks in [`crate::model`].

use crate::model::{GatewayData, MAX_DATA_POINTS_PER_DEVICE, MAX_DEVICES};

/// Check that a gateway report is structurally serializable.
///
/// A report is valid when it has at least one device reading, every
/// reading has at least one data point, and both counts fit the u8
/// wire bound. Short-circuits on the first violation and never
/// inspects field contents.
pub fn validate(gateway: &GatewayData<'_>) -> bool {
    if gateway.readings.is_empty() || gateway.readings.len() > MAX_DEVICES {
        return false;
    }

    gateway
        .readings
        .iter()
        .all(|reading| !reading.data.is_empty() && reading.data.len() <= MAX_DATA_POINTS_PER_DEVICE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DataPoint, DeviceReading};

    fn point() -> DataPoint<'static> {
        DataPoint::new("1970-01-01 00:00", "1970-01-01 00:00", 107.752, "OK")
    }

    #[test]
    fn test_valid_single_device() {
        let points = [point()];
        let readings = [DeviceReading::new("water", "waterstarm", "dev", "m3", &points)];
        let gateway = GatewayData::new("gw", "1970-01-01", "stromleser", 15, 1, &readings);
        assert!(validate(&gateway));
    }

    #[test]
    fn test_rejects_no_readings() {
        let gateway = GatewayData::new("gw", "1970-01-01", "stromleser", 15, 0, &[]);
        assert!(!validate(&gateway));
    }

    #[test]
    fn test_rejects_reading_without_data() {
        let points = [point()];
        let readings = [
            DeviceReading::new("water", "waterstarm", "dev_a", "m3", &points),
            DeviceReading::new("water", "waterstarm", "dev_b", "m3", &[]),
        ];
        let gateway = GatewayData::new("gw", "1970-01-01", "stromleser", 15, 1, &readings);
        assert!(!validate(&gateway));
    }

    #[test]
    fn test_rejects_too_many_devices() {
        let points = [point()];
        let readings =
            vec![DeviceReading::new("water", "waterstarm", "dev", "m3", &points); MAX_DEVICES + 1];
        let gateway = GatewayData::new("gw", "1970-01-01", "stromleser", 15, 1, &readings);
        assert!(!validate(&gateway));
    }

    #[test]
    fn test_rejects_too_many_points() {
        let points = vec![point(); MAX_DATA_POINTS_PER_DEVICE + 1];
        let readings = [DeviceReading::new("water", "waterstarm", "dev", "m3", &points)];
        let gateway = GatewayData::new("gw", "1970-01-01", "stromleser", 15, 1, &readings);
        assert!(!validate(&gateway));
    }

    #[test]
    fn test_accepts_bounds_exactly() {
        let points = vec![point(); MAX_DATA_POINTS_PER_DEVICE];
        let readings =
            vec![DeviceReading::new("water", "waterstarm", "dev", "m3", &points); MAX_DEVICES];
        let gateway = GatewayData::new("gw", "1970-01-01", "stromleser", 15, 1, &readings);
        assert!(validate(&gateway));
    }

    #[test]
    fn test_never_reads_text_fields() {
        // Over-limit text is a serialization concern, not a structural one.
        let points = [DataPoint::new("a timestamp far beyond the limit", "x", 0.0, "y")];
        let readings = [DeviceReading::new("m", "m", "d", "unit_too_long", &points)];
        let gateway = GatewayData::new("gw", "1970-01-01", "t", 15, 1, &readings);
        assert!(validate(&gateway));
    }
}

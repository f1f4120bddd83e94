//! Gateway serialization walkthrough
//!
//! Builds a sample two-device report, sizes a buffer with the
//! estimator, validates, serializes and checks the emitted document.
//!
//! Run with: `cargo run --example meter_demo`

use wmbus_json::{estimate_max_size, serialize, validate, DataPoint, DeviceReading, GatewayData};

const BUFFER_SIZE: usize = 4096;

fn main() {
    println!("=== wM-Bus JSON Serializer Demo ===\n");

    println!("1. Creating sample input data...");
    let points = [
        DataPoint::new("1970-01-01 00:00", "1970-01-01 00:00", 107.752, "OK"),
        DataPoint::new("1970-01-01 00:15", "1970-01-01 00:15", 107.900, "OK"),
        DataPoint::new("1970-01-01 00:30", "1970-01-01 00:30", 108.050, "ERROR"),
    ];
    let readings = [
        DeviceReading::new("water", "waterstarm", "stromleser_50898527", "m3", &points[..1]),
        DeviceReading::new(
            "electricity",
            "powermax",
            "stromleser_55123789",
            "kWh",
            &points[1..],
        ),
    ];
    let gateway = GatewayData::new("gateway_1234", "1970-01-01", "stromleser", 15, 3, &readings);

    println!("   Gateway ID: {}", gateway.gateway_id);
    println!("   Date: {}", gateway.date);
    println!("   Device Type: {}", gateway.device_type);
    println!("   Interval: {} minutes", gateway.interval_minutes);
    println!("   Total Readings: {}", gateway.total_readings);
    println!("   Device Count: {}\n", gateway.device_count());

    println!("2. Calculating buffer requirements...");
    let required = estimate_max_size(
        gateway.device_count() as u8,
        gateway.data_point_count() as u32,
    );
    println!("   Required buffer size: {} bytes", required);
    println!("   Available buffer size: {} bytes\n", BUFFER_SIZE);

    if required > BUFFER_SIZE {
        eprintln!("   ERROR: Buffer too small! Increase BUFFER_SIZE.");
        std::process::exit(1);
    }

    println!("3. Validating input data...");
    if !validate(&gateway) {
        eprintln!("   ERROR: Invalid data structure");
        std::process::exit(1);
    }
    println!("   Data validation: PASS\n");

    println!("4. Serializing to JSON...");
    let mut buffer = [0u8; BUFFER_SIZE];
    let written = match serialize(&gateway, &mut buffer) {
        Ok(n) => n,
        Err(e) => {
            eprintln!("   Serialization error: {} (code {})", e, e.code());
            std::process::exit(1);
        }
    };
    println!("   Serialized {} bytes successfully\n", written);

    let json = std::str::from_utf8(&buffer[..written]).expect("output is ASCII");

    println!("5. Outputting JSON:");
    println!("   -------------------------");
    println!("{}\n", json);

    println!("6. Verifying JSON structure...");
    let required_fields = [
        "\"gatewayId\"",
        "\"date\"",
        "\"deviceType\"",
        "\"interval_minutes\"",
        "\"total_readings\"",
        "\"values\"",
        "\"device_count\"",
        "\"readings\"",
        "\"media\"",
        "\"meter\"",
        "\"deviceId\"",
        "\"unit\"",
        "\"data\"",
        "\"timestamp\"",
        "\"meter_datetime\"",
        "\"total_m3\"",
        "\"status\"",
    ];

    let mut all_present = true;
    for field in required_fields {
        if !json.contains(field) {
            println!("   ERROR: Missing field: {}", field);
            all_present = false;
        }
    }
    if all_present {
        println!("   All required fields present: PASS");
    }

    if json.starts_with('[') && json.ends_with(']') {
        println!("   Outer array brackets: PASS");
    } else {
        println!("   ERROR: Missing outer array brackets");
    }

    if !json.contains("\"15\"") && !json.contains("\"107.752\"") {
        println!("   Numbers not quoted: PASS");
    } else {
        println!("   ERROR: Numbers incorrectly serialized as strings");
    }

    println!("\n=== Demo Complete ===");
    println!("Total payload size: {} bytes", written);
}

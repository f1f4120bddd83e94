//! Build script for wmbus-json-ffi
//!
//! Generates the C header file using cbindgen.

fn main() {
    let crate_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap();
    let output_file = format!("{}/include/wmbus_json_generated.h", crate_dir);

    match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("WMBUS_JSON_GENERATED_H")
        .with_cpp_compat(true)
        .generate()
    {
        Ok(bindings) => {
            bindings.write_to_file(&output_file);
            println!("cargo:rerun-if-changed=src/lib.rs");
        }
        Err(e) => {
            // Header generation is a convenience; never fail the build.
            eprintln!("Warning: cbindgen failed: {}", e);
        }
    }
}

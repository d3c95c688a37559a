use spirv_codec_meta as meta;
use std::env;
use std::error::Error;
use std::path::Path;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=spirv-codec.toml");
    println!("cargo:rerun-if-changed=grammar");

    let out_dir = env::var("OUT_DIR").expect("The OUT_DIR environment variable must be set");
    let manifest_dir = env::var("CARGO_MANIFEST_DIR")
        .expect("The CARGO_MANIFEST_DIR environment variable must be set");

    let config = meta::Config::from_file(&Path::new(&manifest_dir).join("spirv-codec.toml"))
        .unwrap_or_else(|e| panic!("{}", report(&e)));
    meta::generate_rust(&config, &out_dir).unwrap_or_else(|e| panic!("{}", report(&e)));
}

// the top-level message only names the file, show the whole chain
fn report(e: &dyn Error) -> String {
    let mut msg = e.to_string();
    let mut source = e.source();
    while let Some(s) = source {
        msg.push_str(&format!(": {s}"));
        source = s.source();
    }
    msg
}

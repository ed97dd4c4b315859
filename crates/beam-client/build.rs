//! Build script for embedding toolchain information in the user agent.

use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Compiler version, e.g. "1.75.0"
    let rustc = std::env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
    let rustc_version = Command::new(rustc)
        .arg("--version")
        .output()
        .ok()
        .and_then(|output| {
            if output.status.success() {
                String::from_utf8(output.stdout).ok()
            } else {
                None
            }
        })
        .and_then(|s| s.split_whitespace().nth(1).map(str::to_string))
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=BEAM_RUSTC_VERSION={}", rustc_version);

    // Target triple
    let target = std::env::var("TARGET").unwrap_or_else(|_| "unknown".to_string());
    println!("cargo:rustc-env=BEAM_BUILD_TARGET={}", target);
}

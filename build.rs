use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Embed the short git hash in the version string when a checkout is
    // available (container builds without .git get an empty suffix).
    let build_version = Command::new("git")
        .args(["rev-parse", "--short=8", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .unwrap_or_default();

    println!("cargo:rustc-env=BUILD_VERSION={}", build_version);
}

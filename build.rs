use chrono::TimeZone;
use std::process::Command;

/// Short commit hash shown in the page header, or "dev" outside a checkout.
fn commit_hash() -> String {
    Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .filter(|hash| !hash.is_empty())
        .unwrap_or_else(|| "dev".to_string())
}

/// Local build time with the zone abbreviation, e.g. "2024-05-01 12:00:00 CEST".
fn build_timestamp() -> String {
    let now = chrono::Utc::now();
    let zone = iana_time_zone::get_timezone()
        .ok()
        .and_then(|name| name.parse::<chrono_tz::Tz>().ok());

    match zone {
        Some(tz) => tz
            .from_utc_datetime(&now.naive_utc())
            .format("%Y-%m-%d %H:%M:%S %Z")
            .to_string(),
        None => now.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    }
}

fn main() {
    println!("cargo:rustc-env=BUILD_HASH={}", commit_hash());
    println!("cargo:rustc-env=BUILD_TIMESTAMP={}", build_timestamp());

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");
}

#[cfg(test)]
#[macro_use]
mod tests;

pub mod boundary;
pub mod config;
pub mod error;
pub mod oracle_drive;
pub mod response;

// JNI bridge for Android
#[cfg(all(feature = "jni-bridge", target_os = "android"))]
pub mod jni_bridge;

/// Version string reported by `OracleDriveNative.getVersion()`.
pub const INTEGRATION_VERSION: &str = "Genesis Oracle Drive Integration v1.0.0";

pub fn version() -> &'static str {
    INTEGRATION_VERSION
}

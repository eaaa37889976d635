//! JNI bridge for Android
//!
//! This module exposes the native boundary to the AuraFrameFX Java classes.
//!
//! ## Architecture
//!
//! - `types`: The module's single `Boundary` instance and panic guard
//! - `lifecycle`: Load/unload hooks and the CascadeAIService init/shutdown
//! - `request`: CascadeAIService request processing
//! - `oracle`: OracleDriveNative surface, independent of the boundary
//!
//! ## Thread Model
//!
//! - JNI calls arrive on whatever thread the app uses
//! - Every transition goes through the boundary mutex
//! - No entry point lets an error or panic cross into the JVM

pub mod lifecycle;
pub mod oracle;
pub mod request;
pub mod types;

// Re-export main entry points
pub use lifecycle::{
    Java_dev_aurakai_auraframefx_ai_services_CascadeAIService_nativeConfigure,
    Java_dev_aurakai_auraframefx_ai_services_CascadeAIService_nativeInitialize,
    Java_dev_aurakai_auraframefx_ai_services_CascadeAIService_nativeIsInitialized,
    Java_dev_aurakai_auraframefx_ai_services_CascadeAIService_nativeShutdown, JNI_OnLoad,
    JNI_OnUnload,
};

pub use oracle::*;

pub use request::Java_dev_aurakai_auraframefx_ai_services_CascadeAIService_nativeProcessRequest;

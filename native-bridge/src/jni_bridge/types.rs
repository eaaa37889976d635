//! Global state for the JNI bridge
//!
//! One `Boundary` per loaded library, created on first use with OnceLock.

use crate::boundary::Boundary;
use crate::error::Result;
use jni::objects::GlobalRef;
use jni::sys::{jboolean, JNI_FALSE, JNI_TRUE};
use jni::JavaVM;
use log::{error, warn};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::OnceLock;

/// Logcat tag for everything logged by the library
pub const LOG_TAG: &str = "AuraNativeBridge";

pub type NativeBoundary = Boundary<JavaVM, GlobalRef>;

/// The boundary shared by every entry point
static BOUNDARY: OnceLock<NativeBoundary> = OnceLock::new();

/// Get the boundary, creating it on first use
pub fn boundary() -> &'static NativeBoundary {
    BOUNDARY.get_or_init(NativeBoundary::new)
}

/// Get the boundary only if some entry point already created it
pub fn existing_boundary() -> Option<&'static NativeBoundary> {
    BOUNDARY.get()
}

/// Run an entry point body, turning a panic into `fallback()`.
pub fn guarded<T, B, F>(entry: &str, body: B, fallback: F) -> T
where
    B: FnOnce() -> T,
    F: FnOnce() -> T,
{
    match panic::catch_unwind(AssertUnwindSafe(body)) {
        Ok(value) => value,
        Err(payload) => {
            error!("JNI panic caught in {}: {}", entry, panic_message(payload.as_ref()));
            fallback()
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Map a lifecycle result onto a Java boolean
pub fn to_jboolean(entry: &str, result: Result<()>) -> jboolean {
    match result {
        Ok(()) => JNI_TRUE,
        Err(e) => {
            warn!("{} failed: {}", entry, e);
            JNI_FALSE
        }
    }
}

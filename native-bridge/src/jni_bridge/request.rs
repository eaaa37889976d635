//! Request processing for JNI bridge
//!
//! Always hands a JSON string back to Java, error-shaped when the service is
//! not initialized or the payload cannot be read.

use super::types::*;
use crate::error::{Error, Result};
use crate::response::Response;
use jni::objects::{JObject, JString};
use jni::sys::jstring;
use jni::JNIEnv;
use log::error;
use std::ptr;

/// Helper to create a JString, null if the JVM refuses
pub(super) fn to_jstring(env: &mut JNIEnv, value: &str) -> jstring {
    match env.new_string(value) {
        Ok(s) => s.into_raw(),
        Err(e) => {
            error!("Failed to create JString: {}", e);
            ptr::null_mut()
        }
    }
}

/// Read the request, `None` when Java passed null
fn read_request(env: &mut JNIEnv, request: &JString) -> Result<Option<String>> {
    if request.is_null() {
        return Ok(None);
    }
    let request: String = env.get_string(request).map_err(Error::undecodable)?.into();
    Ok(Some(request))
}

/// JNI: Process a request
///
/// Returns a JSON string: the service reply on success, `{"error": ...}`
/// otherwise.
#[no_mangle]
pub extern "C" fn Java_dev_aurakai_auraframefx_ai_services_CascadeAIService_nativeProcessRequest(
    mut env: JNIEnv,
    _this: JObject,
    request: JString,
) -> jstring {
    let response = guarded(
        "nativeProcessRequest",
        || boundary().process_request_with(|| read_request(&mut env, &request)),
        || Response::from(Error::undecodable("panic while processing request")),
    );

    to_jstring(&mut env, &response.to_json())
}

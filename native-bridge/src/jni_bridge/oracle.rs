//! OracleDriveNative surface
//!
//! Independent of the CascadeAIService boundary: nothing here reads or
//! changes its state.

use super::request::to_jstring;
use super::types::guarded;
use crate::oracle_drive::OracleDrive;
use jni::objects::JObject;
use jni::sys::{jboolean, jstring, JNI_FALSE, JNI_TRUE};
use jni::JNIEnv;
use std::ptr;

/// JNI: Native integration version
#[no_mangle]
pub extern "C" fn Java_dev_aurakai_auraframefx_oracledriveintegration_OracleDriveNative_getVersion(
    mut env: JNIEnv,
    _this: JObject,
) -> jstring {
    guarded(
        "getVersion",
        || to_jstring(&mut env, OracleDrive.version()),
        ptr::null_mut,
    )
}

/// JNI: Initialize the Oracle Drive integration
#[no_mangle]
pub extern "C" fn Java_dev_aurakai_auraframefx_oracledriveintegration_OracleDriveNative_initialize(
    _env: JNIEnv,
    _this: JObject,
) -> jboolean {
    guarded(
        "initialize",
        || {
            if OracleDrive.initialize() {
                JNI_TRUE
            } else {
                JNI_FALSE
            }
        },
        || JNI_FALSE,
    )
}

/// JNI: Shut down the Oracle Drive integration
#[no_mangle]
pub extern "C" fn Java_dev_aurakai_auraframefx_oracledriveintegration_OracleDriveNative_shutdown(
    _env: JNIEnv,
    _this: JObject,
) {
    guarded("shutdown", || OracleDrive.shutdown(), || ());
}

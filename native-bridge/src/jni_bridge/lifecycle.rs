//! Lifecycle management for JNI bridge
//!
//! Load/unload hooks plus the CascadeAIService initialize/shutdown entry points.

use super::types::*;
use crate::boundary::Acquired;
use crate::config::{BridgeConfig, DEFAULT_LOG_LEVEL};
use crate::error::{Error, Result};
use jni::objects::{GlobalRef, JObject, JString};
use jni::sys::{jboolean, jint, JNI_ERR, JNI_FALSE, JNI_TRUE, JNI_VERSION_1_6};
use jni::{JNIEnv, JavaVM};
use log::{error, info};
use std::ffi::c_void;

/// JNI: Library load hook
///
/// Requires JNI 1.6 or newer. Returning `JNI_ERR` makes `System.loadLibrary`
/// fail.
///
/// The logcat logger accepts every level; `log::max_level` alone decides what
/// gets through, so a `trace` config from nativeConfigure reaches logcat.
#[no_mangle]
pub extern "C" fn JNI_OnLoad(vm: JavaVM, _reserved: *mut c_void) -> jint {
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(log::LevelFilter::Trace)
            .with_tag(LOG_TAG),
    );
    log::set_max_level(DEFAULT_LOG_LEVEL);

    guarded("JNI_OnLoad", || negotiate_version(&vm), || JNI_ERR)
}

fn negotiate_version(vm: &JavaVM) -> jint {
    let env = match vm.get_env() {
        Ok(env) => env,
        Err(e) => {
            error!("Failed to get JNI environment: {}", e);
            return JNI_ERR;
        }
    };

    match env.get_version() {
        Ok(version) if jint::from(version) >= JNI_VERSION_1_6 => {
            info!("Native bridge loaded (JNI {:?})", version);
            JNI_VERSION_1_6
        }
        Ok(version) => {
            error!("Unsupported JNI version: {:?}", version);
            JNI_ERR
        }
        Err(e) => {
            error!("Failed to query JNI version: {}", e);
            JNI_ERR
        }
    }
}

/// JNI: Library unload hook
///
/// Releases whatever the boundary still holds, even if nativeShutdown was
/// never called.
#[no_mangle]
pub extern "C" fn JNI_OnUnload(_vm: JavaVM, _reserved: *mut c_void) {
    guarded(
        "JNI_OnUnload",
        || {
            if let Some(boundary) = existing_boundary() {
                boundary.unload();
            }
        },
        || (),
    );
}

/// Acquire the runtime handle and, if given, a global reference to the context.
///
/// On error nothing is kept: a global reference created before the failure is
/// dropped, which deletes it.
fn acquire(
    env: &mut JNIEnv,
    context: Option<&JObject>,
) -> Result<Acquired<JavaVM, GlobalRef>> {
    let runtime = env
        .get_java_vm()
        .map_err(|e| Error::acquisition(format!("Failed to get JavaVM: {}", e)))?;

    let context = match context {
        Some(context) => Some(env.new_global_ref(context).map_err(|e| {
            Error::acquisition(format!(
                "Failed to create global reference to context: {}",
                e
            ))
        })?),
        None => None,
    };

    Ok(Acquired { runtime, context })
}

/// JNI: Initialize the Cascade AI service
///
/// `context` may be null. Calling this again while initialized returns true
/// without doing anything.
#[no_mangle]
pub extern "C" fn Java_dev_aurakai_auraframefx_ai_services_CascadeAIService_nativeInitialize(
    mut env: JNIEnv,
    _this: JObject,
    context: JObject,
) -> jboolean {
    guarded(
        "nativeInitialize",
        || {
            info!("Initializing Cascade AI Service");
            let context = (!context.is_null()).then_some(&context);
            let result = boundary().initialize(|| acquire(&mut env, context));
            to_jboolean("nativeInitialize", result)
        },
        || JNI_FALSE,
    )
}

/// JNI: Shut down the Cascade AI service
///
/// Deletes the context global reference. Safe to call any number of times.
#[no_mangle]
pub extern "C" fn Java_dev_aurakai_auraframefx_ai_services_CascadeAIService_nativeShutdown(
    _env: JNIEnv,
    _this: JObject,
) {
    guarded(
        "nativeShutdown",
        || {
            info!("Shutting down Cascade AI Service");
            boundary().shutdown();
        },
        || (),
    );
}

/// JNI: Load a TOML config before initialization
///
/// Returns false if the file cannot be read or parsed, or if the service is
/// already initialized.
#[no_mangle]
pub extern "C" fn Java_dev_aurakai_auraframefx_ai_services_CascadeAIService_nativeConfigure(
    mut env: JNIEnv,
    _this: JObject,
    config_path_jstr: JString,
) -> jboolean {
    guarded(
        "nativeConfigure",
        || to_jboolean("nativeConfigure", configure(&mut env, &config_path_jstr)),
        || JNI_FALSE,
    )
}

fn configure(env: &mut JNIEnv, config_path_jstr: &JString) -> Result<()> {
    if config_path_jstr.is_null() {
        return Err(Error::config("config path is null"));
    }
    let config_path: String = env
        .get_string(config_path_jstr)
        .map_err(Error::config)?
        .into();

    info!("Loading config from: {}", config_path);
    let config = BridgeConfig::load(&config_path)?;
    let level = config.level_filter()?;

    boundary().configure(&config)?;
    log::set_max_level(level);

    info!("Config applied (log level: {})", level);
    Ok(())
}

/// JNI: Whether the service is currently initialized
#[no_mangle]
pub extern "C" fn Java_dev_aurakai_auraframefx_ai_services_CascadeAIService_nativeIsInitialized(
    _env: JNIEnv,
    _this: JObject,
) -> jboolean {
    guarded(
        "nativeIsInitialized",
        || {
            if boundary().is_initialized() {
                JNI_TRUE
            } else {
                JNI_FALSE
            }
        },
        || JNI_FALSE,
    )
}

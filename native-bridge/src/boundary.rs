//! Lifecycle of the native boundary
//!
//! A [`Boundary`] owns the runtime handle and the retained context reference
//! handed over by the managed side. It is generic over both so the JNI layer can
//! plug in `JavaVM`/`GlobalRef` while tests use plain values.
//!
//! ## State Machine
//!
//! - `Uninitialized`: no runtime, no context
//! - `Initialized`: runtime stored, context stored if one was supplied
//!
//! A failed `initialize` stays in `Uninitialized`. Releasing the context is
//! dropping it, so every path that clears the state releases the pin exactly
//! once.

use crate::config::BridgeConfig;
use crate::error::{Error, Result};
use crate::response::{Handler, Response, StaticReply};
use log::{debug, error, info, warn};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Everything `initialize` acquires in one go.
pub struct Acquired<H, C> {
    pub runtime: H,
    pub context: Option<C>,
}

struct BoundaryState<H, C> {
    runtime: Option<H>,
    context: Option<C>,
    initialized: bool,
    handler: Box<dyn Handler>,
}

impl<H, C> BoundaryState<H, C> {
    /// Drops the context pin and the runtime handle. Returns whether a context
    /// was held.
    fn clear(&mut self) -> bool {
        let released = self.context.take().is_some();
        self.runtime = None;
        self.initialized = false;
        released
    }
}

pub struct Boundary<H, C> {
    state: Mutex<BoundaryState<H, C>>,
}

impl<H, C> Default for Boundary<H, C> {
    fn default() -> Self {
        Self::with_handler(Box::new(StaticReply::default()))
    }
}

impl<H, C> Boundary<H, C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_handler(handler: Box<dyn Handler>) -> Self {
        Self {
            state: Mutex::new(BoundaryState {
                runtime: None,
                context: None,
                initialized: false,
                handler,
            }),
        }
    }

    // A panic inside a handler must not wedge the boundary; the state itself
    // is always left consistent between field writes.
    fn lock(&self) -> MutexGuard<'_, BoundaryState<H, C>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply a config. Only allowed before `initialize`.
    pub fn configure(&self, config: &BridgeConfig) -> Result<()> {
        self.replace_handler(Box::new(StaticReply::new(&config.reply)))
    }

    /// Swap the request handler. Only allowed before `initialize`.
    pub fn replace_handler(&self, handler: Box<dyn Handler>) -> Result<()> {
        let mut state = self.lock();
        if state.initialized {
            warn!("Refusing to replace handler while initialized");
            return Err(Error::AlreadyInitialized);
        }
        state.handler = handler;
        Ok(())
    }

    /// Initialize the boundary.
    ///
    /// `acquire` is only called when the boundary is not initialized yet. If it
    /// fails, whatever it had acquired is dropped before returning and the
    /// state stays untouched.
    pub fn initialize<F>(&self, acquire: F) -> Result<()>
    where
        F: FnOnce() -> Result<Acquired<H, C>>,
    {
        let mut state = self.lock();
        if state.initialized {
            info!("Service already initialized");
            return Ok(());
        }

        let acquired = acquire().map_err(|e| {
            error!("Failed to initialize service: {}", e);
            e
        })?;

        state.runtime = Some(acquired.runtime);
        state.context = acquired.context;
        state.initialized = true;

        info!(
            "Service initialized successfully (context retained: {})",
            state.context.is_some()
        );
        Ok(())
    }

    /// Process a request whose payload is read lazily.
    ///
    /// The initialization check happens before the payload is touched. Never
    /// mutates the lifecycle state.
    pub fn process_request_with<F>(&self, read_payload: F) -> Response
    where
        F: FnOnce() -> Result<Option<String>>,
    {
        let state = self.lock();
        if !state.initialized {
            error!("Service not initialized");
            return Error::NotInitialized.into();
        }

        let request = match read_payload() {
            Ok(Some(request)) => request,
            Ok(None) => {
                error!("Request string is null");
                return Error::InvalidRequest.into();
            }
            Err(e) => {
                error!("Failed to get request string: {:?}", e);
                return e.into();
            }
        };

        debug!("Processing request: {}", request);
        state.handler.handle(&request)
    }

    pub fn process_request(&self, payload: Option<&str>) -> Response {
        self.process_request_with(|| Ok(payload.map(str::to_owned)))
    }

    /// Release everything acquired by `initialize`. Returns `false` when there
    /// was nothing to shut down.
    pub fn shutdown(&self) -> bool {
        let mut state = self.lock();
        if !state.initialized {
            debug!("Shutdown requested while not initialized");
            return false;
        }

        state.clear();
        info!("Service shutdown complete");
        true
    }

    /// Safety net for module unload. Clears whatever is left, whether or not
    /// `shutdown` already ran.
    pub fn unload(&self) {
        if self.lock().clear() {
            info!("Released retained context on unload");
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.lock().initialized
    }

    #[cfg(test)]
    pub(crate) fn has_runtime(&self) -> bool {
        self.lock().runtime.is_some()
    }

    #[cfg(test)]
    pub(crate) fn has_context(&self) -> bool {
        self.lock().context.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Stand-in for a global reference: counts how often it is released.
    struct Pin(Arc<AtomicUsize>);

    impl Drop for Pin {
        fn drop(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn acquired(releases: &Arc<AtomicUsize>) -> Result<Acquired<u32, Pin>> {
        Ok(Acquired {
            runtime: 7,
            context: Some(Pin(releases.clone())),
        })
    }

    #[test]
    fn test_initialize_retains_context() {
        let releases = Arc::new(AtomicUsize::new(0));
        let boundary: Boundary<u32, Pin> = Boundary::new();

        assert!(boundary.initialize(|| acquired(&releases)).is_ok());
        assert!(boundary.is_initialized());
        assert!(boundary.has_runtime());
        assert!(boundary.has_context());
        assert_eq!(releases.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_second_initialize_skips_acquisition() {
        let releases = Arc::new(AtomicUsize::new(0));
        let boundary: Boundary<u32, Pin> = Boundary::new();
        boundary.initialize(|| acquired(&releases)).unwrap();

        let mut called = false;
        let second = boundary.initialize(|| {
            called = true;
            acquired(&releases)
        });

        assert!(second.is_ok());
        assert!(!called);
        assert!(boundary.has_context());
        assert_eq!(releases.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_failed_acquisition_leaves_no_state() {
        let releases = Arc::new(AtomicUsize::new(0));
        let boundary: Boundary<u32, Pin> = Boundary::new();

        let result = boundary.initialize(|| {
            // Context pinned, then a later step fails: the pin must go away.
            let _pin = Pin(releases.clone());
            Err(Error::acquisition("Failed to get context class"))
        });

        assert_eq!(
            result,
            Err(Error::Acquisition("Failed to get context class".into()))
        );
        assert!(!boundary.is_initialized());
        assert!(!boundary.has_runtime());
        assert!(!boundary.has_context());
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_retry_after_failed_initialize() {
        let releases = Arc::new(AtomicUsize::new(0));
        let boundary: Boundary<u32, Pin> = Boundary::new();

        assert!(boundary
            .initialize(|| Err(Error::acquisition("Failed to get JavaVM")))
            .is_err());
        assert!(boundary.initialize(|| acquired(&releases)).is_ok());
        assert!(boundary.is_initialized());
    }

    #[test]
    fn test_shutdown_releases_once() {
        let releases = Arc::new(AtomicUsize::new(0));
        let boundary: Boundary<u32, Pin> = Boundary::new();
        boundary.initialize(|| acquired(&releases)).unwrap();

        assert!(boundary.shutdown());
        assert!(!boundary.shutdown());
        assert!(!boundary.shutdown());

        assert!(!boundary.is_initialized());
        assert!(!boundary.has_runtime());
        assert!(!boundary.has_context());
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_shutdown_before_initialize_is_noop() {
        let boundary: Boundary<u32, Pin> = Boundary::new();
        assert!(!boundary.shutdown());
        assert!(!boundary.is_initialized());
    }

    #[test]
    fn test_unload_after_shutdown_does_not_release_twice() {
        let releases = Arc::new(AtomicUsize::new(0));
        let boundary: Boundary<u32, Pin> = Boundary::new();
        boundary.initialize(|| acquired(&releases)).unwrap();

        boundary.shutdown();
        boundary.unload();
        boundary.unload();

        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_process_request_checks_initialization_first() {
        let boundary: Boundary<u32, Pin> = Boundary::new();
        let mut read = false;

        let response = boundary.process_request_with(|| {
            read = true;
            Ok(None)
        });

        assert!(!read);
        assert_eq!(response, Response::from(Error::NotInitialized));
    }

    #[test]
    fn test_undecodable_payload() {
        let releases = Arc::new(AtomicUsize::new(0));
        let boundary: Boundary<u32, Pin> = Boundary::new();
        boundary.initialize(|| acquired(&releases)).unwrap();

        let response =
            boundary.process_request_with(|| Err(Error::undecodable("invalid modified UTF-8")));

        assert_eq!(response.to_json(), r#"{"error":"Failed to process request"}"#);
        assert!(boundary.is_initialized());
        assert!(boundary.has_context());
    }

    #[test]
    fn test_configure_only_before_initialize() {
        let releases = Arc::new(AtomicUsize::new(0));
        let boundary: Boundary<u32, Pin> = Boundary::new();
        let mut config = BridgeConfig::default();
        config.reply.agent = "Genesis".to_string();

        assert!(boundary.configure(&config).is_ok());
        boundary.initialize(|| acquired(&releases)).unwrap();
        assert_eq!(
            boundary.configure(&BridgeConfig::default()),
            Err(Error::AlreadyInitialized)
        );

        match boundary.process_request(Some("x")) {
            Response::Success(reply) => assert_eq!(reply.agent, "Genesis"),
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[test]
    fn test_custom_handler_sees_request() {
        struct Echo;
        impl Handler for Echo {
            fn handle(&self, request: &str) -> Response {
                Response::from(Error::config(request))
            }
        }

        let boundary: Boundary<u32, Pin> = Boundary::with_handler(Box::new(Echo));
        boundary
            .initialize(|| Ok(Acquired { runtime: 1, context: None }))
            .unwrap();

        assert_eq!(
            boundary.process_request(Some("ping")).to_json(),
            r#"{"error":"config error: ping"}"#
        );
    }

    #[test]
    fn test_concurrent_shutdown_and_unload_release_once() {
        let releases = Arc::new(AtomicUsize::new(0));
        let boundary: Arc<Boundary<u32, Pin>> = Arc::new(Boundary::new());
        boundary.initialize(|| acquired(&releases)).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let boundary = Arc::clone(&boundary);
                std::thread::spawn(move || {
                    if i % 2 == 0 {
                        boundary.shutdown();
                    } else {
                        boundary.unload();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert!(!boundary.has_context());
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_concurrent_initialize_against_shutdown_and_unload() {
        let acquisitions = Arc::new(AtomicUsize::new(0));
        let releases = Arc::new(AtomicUsize::new(0));
        let boundary: Arc<Boundary<u32, Pin>> = Arc::new(Boundary::new());

        let handles: Vec<_> = (0..12)
            .map(|i| {
                let boundary = Arc::clone(&boundary);
                let acquisitions = Arc::clone(&acquisitions);
                let releases = Arc::clone(&releases);
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        match i % 3 {
                            0 => {
                                boundary
                                    .initialize(|| {
                                        acquisitions.fetch_add(1, Ordering::SeqCst);
                                        acquired(&releases)
                                    })
                                    .unwrap();
                            }
                            1 => {
                                boundary.shutdown();
                            }
                            _ => boundary.unload(),
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        // Every initialize pinned a context, so the two must agree.
        assert_eq!(boundary.is_initialized(), boundary.has_context());
        let held = usize::from(boundary.has_context());
        assert_eq!(
            acquisitions.load(Ordering::SeqCst),
            releases.load(Ordering::SeqCst) + held
        );

        boundary.shutdown();
        assert_eq!(
            acquisitions.load(Ordering::SeqCst),
            releases.load(Ordering::SeqCst)
        );
    }
}

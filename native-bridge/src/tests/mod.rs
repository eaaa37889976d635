use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::boundary::{Acquired, Boundary};
use crate::error::Result;

/// Assert that a response is error-shaped with the given message.
macro_rules! assert_error_response {
    ($response:expr, $message:expr) => {{
        let value: serde_json::Value = serde_json::from_str(&$response.to_json()).unwrap();
        assert_eq!(value, serde_json::json!({ "error": $message }));
    }};
}


pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Fake global reference counting its releases.
pub(crate) struct ContextRef {
    releases: Arc<AtomicUsize>,
}

impl Drop for ContextRef {
    fn drop(&mut self) {
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}

/// Fake runtime handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Runtime(pub u64);

pub(crate) type TestBoundary = Boundary<Runtime, ContextRef>;

/// Hands out context pins and remembers how many were released.
#[derive(Default)]
pub(crate) struct Host {
    releases: Arc<AtomicUsize>,
}

impl Host {
    pub(crate) fn acquire(&self, with_context: bool) -> Result<Acquired<Runtime, ContextRef>> {
        Ok(Acquired {
            runtime: Runtime(0xC0FFEE),
            context: with_context.then(|| ContextRef {
                releases: self.releases.clone(),
            }),
        })
    }

    pub(crate) fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }
}

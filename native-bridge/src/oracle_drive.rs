//! Oracle Drive integration surface
//!
//! Holds no state and never touches the Cascade boundary. `initialize` and
//! `shutdown` only log.

use crate::INTEGRATION_VERSION;
use log::info;

#[derive(Debug, Default, Clone, Copy)]
pub struct OracleDrive;

impl OracleDrive {
    pub fn version(&self) -> &'static str {
        info!("Oracle Drive Integration Native - Genesis Protocol v3.0");
        INTEGRATION_VERSION
    }

    pub fn initialize(&self) -> bool {
        info!("Initializing Oracle Drive Integration...");
        true
    }

    pub fn shutdown(&self) {
        info!("Shutting down Oracle Drive Integration...");
    }
}

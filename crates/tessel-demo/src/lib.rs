//! Single-quad demos.
//!
//! Both binaries go through [`run`]; they differ only in the
//! [`DemoVariant`] they pass.

pub mod app;
pub mod geometry;
pub mod variant;

pub use app::QuadApp;
pub use variant::DemoVariant;

use tessel_engine::device::GpuInit;
use tessel_engine::logging::{init_logging, LoggingConfig};
use tessel_engine::window::{Runtime, RuntimeConfig};

/// Runs `variant` to completion and returns the process exit code.
pub fn run(variant: DemoVariant) -> i32 {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: variant.title().to_string(),
        ..RuntimeConfig::default()
    };

    match Runtime::run(config, GpuInit::default(), QuadApp::new(variant)) {
        Ok(reason) => {
            log::info!("{variant}: exiting ({reason})");
            reason.exit_code()
        }
        Err(e) => {
            log::error!("{variant}: startup failed: {e}");
            e.exit_code()
        }
    }
}


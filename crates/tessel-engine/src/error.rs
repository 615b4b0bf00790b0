//! Startup failures of the runtime.

use std::fmt;

use crate::shader::ShaderError;

/// Process exit status for a clean shutdown.
pub const EXIT_OK: i32 = 0;

/// Process exit status for any fatal startup failure.
pub const EXIT_STARTUP_FAILURE: i32 = -1;

/// Fatal startup failure, in the order the runtime checks them.
///
/// Anything already created when one of these occurs is dropped before the
/// error reaches the caller.
#[derive(Debug)]
pub enum StartupError {
    /// The window system (event loop) could not be initialized.
    WindowSystem(String),
    /// The window could not be created.
    Window(String),
    /// No GPU adapter/device/surface could be brought up for the window.
    Gpu(anyhow::Error),
    /// Stage compilation, program linking, or the vertex layout check failed.
    Shader(ShaderError),
}

impl StartupError {
    pub fn exit_code(&self) -> i32 {
        EXIT_STARTUP_FAILURE
    }
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartupError::WindowSystem(e) => write!(f, "failed to initialize the window system: {e}"),
            StartupError::Window(e) => write!(f, "failed to create the window: {e}"),
            StartupError::Gpu(e) => write!(f, "failed to initialize the GPU context: {e:#}"),
            StartupError::Shader(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for StartupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StartupError::Shader(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ShaderError> for StartupError {
    fn from(e: ShaderError) -> Self {
        StartupError::Shader(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::Diagnostic;

    #[test]
    fn every_startup_failure_exits_with_minus_one() {
        let errors = [
            StartupError::WindowSystem("no display".into()),
            StartupError::Window("denied".into()),
            StartupError::Gpu(anyhow::anyhow!("no adapter")),
            StartupError::Shader(ShaderError::Link { log: Diagnostic::new("bad") }),
        ];
        for e in &errors {
            assert_eq!(e.exit_code(), EXIT_STARTUP_FAILURE);
        }
    }

    #[test]
    fn shader_failure_prints_its_log() {
        let e: StartupError = ShaderError::Link { log: Diagnostic::new("location mismatch") }.into();
        assert_eq!(e.to_string(), "program linking failed:\nlocation mismatch");
    }
}

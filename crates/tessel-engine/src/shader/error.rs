use std::fmt;

use super::{Diagnostic, StageKind};

/// Failure of the shader build step. Both variants are fatal for the program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderError {
    Compile { kind: StageKind, label: String, log: Diagnostic },
    Link { log: Diagnostic },
}

impl ShaderError {
    pub fn log(&self) -> &Diagnostic {
        match self {
            ShaderError::Compile { log, .. } | ShaderError::Link { log } => log,
        }
    }
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::Compile { kind, label, log } => {
                write!(f, "{kind} shader compilation failed ({label}):\n{log}")
            }
            ShaderError::Link { log } => write!(f, "program linking failed:\n{log}"),
        }
    }
}

impl std::error::Error for ShaderError {}

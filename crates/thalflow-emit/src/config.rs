use crate::output::OutputFormat;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmitterConfig {
    pub use_colors: bool,
    /// Report only flows reachable from functions without access control.
    pub only_unprotected: bool,
    pub format: OutputFormat,
    pub verbosity: VerbosityLevel,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            use_colors: true,
            only_unprotected: false,
            format: OutputFormat::Text,
            verbosity: VerbosityLevel::Normal,
        }
    }
}

impl EmitterConfig {
    pub fn plain(format: OutputFormat) -> Self {
        Self {
            use_colors: false,
            format,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerbosityLevel {
    Quiet,
    Normal,
    Verbose,
}

impl VerbosityLevel {
    /// Quiet reports drop variables that depend on nothing.
    pub fn should_print_empty_rows(&self) -> bool {
        !matches!(self, VerbosityLevel::Quiet)
    }

    pub fn should_print_summary(&self) -> bool {
        matches!(self, VerbosityLevel::Verbose)
    }
}

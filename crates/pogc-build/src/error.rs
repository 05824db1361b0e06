use std::path::PathBuf;
use std::process::ExitStatus;

use pogc_embed::TemplateError;

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("file not found: {0}")]
    ScriptNotFound(PathBuf),

    #[error("I/O error: {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("output {0} would overwrite the input script; choose another path with -o")]
    OutputIsScript(PathBuf),

    #[error("unsupported platform '{0}'")]
    UnsupportedPlatform(String),

    #[error("failed to run {compiler}: {source}")]
    Spawn {
        compiler: String,
        source: std::io::Error,
    },

    #[error("{compiler} failed ({status}):\n{stderr}")]
    CompilerFailed {
        compiler: String,
        status: ExitStatus,
        stderr: String,
    },
}

use std::path::PathBuf;

use pogc_embed::{StubTemplate, TemplateError};

use crate::error::BuildError;
use crate::platform::Platform;

pub const DEFAULT_STUB_PATH: &str = "pogc/stub.c";
pub const DEFAULT_LIB_DIR: &str = "lib";
pub const DEFAULT_LIB_NAME: &str = "pogberry";
pub const DEFAULT_COMPILER: &str = "gcc";
pub const DEFAULT_RPATH: &str = ".";

/// Where the stub template comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StubSource {
    /// The stub compiled into the binary.
    Bundled,
    File(PathBuf),
}

/// Everything a build needs besides the script itself.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub stub: StubSource,
    /// Directory passed to the compiler as `-L`.
    pub lib_dir: PathBuf,
    /// Runtime library linked with `-l`.
    pub lib_name: String,
    pub compiler: String,
    /// Target platform name; `None` means the host.
    pub platform: Option<String>,
    /// Executable path; derived from the script name when `None`.
    pub output: Option<PathBuf>,
    /// Directory holding the generated C unit.
    pub work_dir: PathBuf,
    pub include_dirs: Vec<PathBuf>,
    /// Raw arguments appended after the platform flags.
    pub cc_args: Vec<String>,
    pub strip: bool,
    /// Windows only: build a GUI-subsystem executable (`-mwindows`).
    pub windowed: bool,
    /// Linux only: runtime library search path baked into the executable.
    pub rpath: String,
    /// Leave the generated C unit on disk after the build.
    pub keep_temp: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            stub: StubSource::File(PathBuf::from(DEFAULT_STUB_PATH)),
            lib_dir: PathBuf::from(DEFAULT_LIB_DIR),
            lib_name: DEFAULT_LIB_NAME.to_string(),
            compiler: DEFAULT_COMPILER.to_string(),
            platform: None,
            output: None,
            work_dir: PathBuf::from("."),
            include_dirs: Vec::new(),
            cc_args: Vec::new(),
            strip: true,
            windowed: false,
            rpath: DEFAULT_RPATH.to_string(),
            keep_temp: false,
        }
    }
}

impl BuildConfig {
    pub fn load_stub(&self) -> Result<StubTemplate, TemplateError> {
        match &self.stub {
            StubSource::Bundled => Ok(StubTemplate::bundled()),
            StubSource::File(path) => StubTemplate::load(path),
        }
    }

    /// The configured platform, or the host when none is set.
    pub fn resolve_platform(&self) -> Result<Platform, BuildError> {
        match &self.platform {
            Some(name) => name.parse(),
            None => Platform::host(),
        }
    }
}

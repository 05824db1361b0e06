use std::fmt;
use std::str::FromStr;

use crate::config::BuildConfig;
use crate::error::BuildError;

/// Link policy for a target platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// No suffix, no extra flags.
    Generic,
    /// Links libm and bakes in an rpath so the runtime library can sit next
    /// to the executable.
    Linux,
    /// `.exe` suffix, optionally a GUI-subsystem executable.
    Windows,
}

impl Platform {
    /// The platform this process runs on.
    pub fn host() -> Result<Self, BuildError> {
        Self::from_os(std::env::consts::OS)
    }

    fn from_os(os: &str) -> Result<Self, BuildError> {
        match os {
            "linux" => Ok(Platform::Linux),
            "windows" => Ok(Platform::Windows),
            other => Err(BuildError::UnsupportedPlatform(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Platform::Generic => "Generic",
            Platform::Linux => "Linux",
            Platform::Windows => "Windows",
        }
    }

    pub fn executable_suffix(&self) -> &'static str {
        match self {
            Platform::Windows => ".exe",
            Platform::Generic | Platform::Linux => "",
        }
    }

    /// Executable file name for a script stem, e.g. `hello` -> `hello.exe`.
    pub fn output_file_name(&self, stem: &str) -> String {
        format!("{}{}", stem, self.executable_suffix())
    }

    /// Flags added after the runtime library.
    pub fn link_flags(&self, config: &BuildConfig) -> Vec<String> {
        match self {
            Platform::Generic => Vec::new(),
            Platform::Linux => vec!["-lm".to_string(), format!("-Wl,-rpath,{}", config.rpath)],
            Platform::Windows => {
                if config.windowed {
                    vec!["-mwindows".to_string()]
                } else {
                    Vec::new()
                }
            }
        }
    }
}

impl FromStr for Platform {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "generic" => Ok(Platform::Generic),
            "linux" => Ok(Platform::Linux),
            "windows" | "win32" => Ok(Platform::Windows),
            _ => Err(BuildError::UnsupportedPlatform(s.to_string())),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

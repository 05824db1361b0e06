//! C compiler invocation.

use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::process::Command;

use crate::config::{BuildConfig, DEFAULT_COMPILER};
use crate::error::BuildError;
use crate::platform::Platform;

/// One compiler run: program plus ordered arguments.
#[derive(Debug, Clone)]
pub struct CompilerInvocation {
    program: String,
    args: Vec<OsString>,
}

impl CompilerInvocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Assemble the link command for a generated unit:
    ///
    /// ```text
    /// gcc <unit> -o <output> [-I<dir>..] -L<lib_dir> -l<lib> [platform flags] [cc args] [-s]
    /// ```
    ///
    /// The compiler setting is split on whitespace like `$CC` in make, so
    /// `ccache gcc` runs `ccache` with `gcc` as its first argument.
    pub fn for_unit(config: &BuildConfig, platform: Platform, unit: &Path, output: &Path) -> Self {
        let mut words = config.compiler.split_whitespace();
        let mut inv = Self::new(words.next().unwrap_or(DEFAULT_COMPILER));
        for word in words {
            inv.arg(word);
        }
        inv.arg(unit).arg("-o").arg(output);

        for dir in &config.include_dirs {
            inv.arg(prefixed("-I", dir.as_os_str()));
        }
        inv.arg(prefixed("-L", config.lib_dir.as_os_str()))
            .arg(format!("-l{}", config.lib_name));

        for flag in platform.link_flags(config) {
            inv.arg(flag);
        }
        for arg in &config.cc_args {
            inv.arg(arg);
        }
        if config.strip {
            inv.arg("-s");
        }
        inv
    }

    pub fn arg(&mut self, arg: impl AsRef<OsStr>) -> &mut Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Human-readable command line, for logs.
    pub fn command_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        line
    }

    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }

    /// Run the compiler to completion, capturing its output.
    ///
    /// A non-zero exit is reported with the compiler's stderr verbatim.
    pub fn run(&self) -> Result<(), BuildError> {
        log::debug!("running: {}", self.command_line());

        let output = self.to_command().output().map_err(|e| BuildError::Spawn {
            compiler: self.program.clone(),
            source: e,
        })?;

        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if !output.status.success() {
            return Err(BuildError::CompilerFailed {
                compiler: self.program.clone(),
                status: output.status,
                stderr,
            });
        }

        if !stderr.trim().is_empty() {
            log::warn!("{} reported:\n{}", self.program, stderr.trim_end());
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            log::debug!("{} output:\n{}", self.program, stdout.trim_end());
        }
        Ok(())
    }
}

fn prefixed(flag: &str, value: &OsStr) -> OsString {
    let mut out = OsString::from(flag);
    out.push(value);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn arg_strings(inv: &CompilerInvocation) -> Vec<String> {
        inv.args().iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn linux_invocation_order() {
        let config = BuildConfig::default();
        let inv = CompilerInvocation::for_unit(
            &config,
            Platform::Linux,
            Path::new("pogc_1.c"),
            Path::new("hello"),
        );
        assert_eq!(inv.program(), "gcc");
        assert_eq!(
            arg_strings(&inv),
            vec!["pogc_1.c", "-o", "hello", "-Llib", "-lpogberry", "-lm", "-Wl,-rpath,.", "-s"]
        );
    }

    #[test]
    fn compiler_wrapper_words_lead_the_arguments() {
        let config = BuildConfig {
            compiler: "ccache  gcc".into(),
            strip: false,
            ..BuildConfig::default()
        };
        let inv = CompilerInvocation::for_unit(
            &config,
            Platform::Generic,
            Path::new("pogc_1.c"),
            Path::new("hello"),
        );
        assert_eq!(inv.program(), "ccache");
        assert_eq!(
            arg_strings(&inv),
            vec!["gcc", "pogc_1.c", "-o", "hello", "-Llib", "-lpogberry"]
        );
    }

    #[test]
    fn blank_compiler_falls_back_to_default() {
        let config = BuildConfig {
            compiler: "  ".into(),
            ..BuildConfig::default()
        };
        let inv = CompilerInvocation::for_unit(
            &config,
            Platform::Generic,
            Path::new("pogc_1.c"),
            Path::new("hello"),
        );
        assert_eq!(inv.program(), DEFAULT_COMPILER);
        assert_eq!(arg_strings(&inv)[0], "pogc_1.c");
    }

    #[test]
    fn windows_windowed_without_strip() {
        let config = BuildConfig {
            windowed: true,
            strip: false,
            ..BuildConfig::default()
        };
        let inv = CompilerInvocation::for_unit(
            &config,
            Platform::Windows,
            Path::new("pogc_1.c"),
            Path::new("hello.exe"),
        );
        assert_eq!(
            arg_strings(&inv),
            vec!["pogc_1.c", "-o", "hello.exe", "-Llib", "-lpogberry", "-mwindows"]
        );
    }

    #[test]
    fn include_dirs_and_extra_args() {
        let config = BuildConfig {
            compiler: "clang".into(),
            lib_dir: PathBuf::from("/opt/pogberry/lib"),
            include_dirs: vec![PathBuf::from("src/headers")],
            cc_args: vec!["-O2".into()],
            ..BuildConfig::default()
        };
        let inv =
            CompilerInvocation::for_unit(&config, Platform::Generic, Path::new("u.c"), Path::new("app"));
        assert_eq!(inv.program(), "clang");
        assert_eq!(
            arg_strings(&inv),
            vec!["u.c", "-o", "app", "-Isrc/headers", "-L/opt/pogberry/lib", "-lpogberry", "-O2", "-s"]
        );
        assert_eq!(
            inv.command_line(),
            "clang u.c -o app -Isrc/headers -L/opt/pogberry/lib -lpogberry -O2 -s"
        );
    }

    #[test]
    fn missing_compiler_is_a_spawn_error() {
        let inv = CompilerInvocation::new("pogc-no-such-compiler-xyz");
        let err = inv.run().unwrap_err();
        assert!(matches!(err, BuildError::Spawn { ref compiler, .. } if compiler == "pogc-no-such-compiler-xyz"));
    }

    #[cfg(unix)]
    #[test]
    fn failing_compiler_stderr_is_captured() {
        let mut inv = CompilerInvocation::new("sh");
        inv.arg("-c").arg("echo 'stub.c:3: error: boom' >&2; exit 3");
        match inv.run().unwrap_err() {
            BuildError::CompilerFailed { status, stderr, .. } => {
                assert_eq!(status.code(), Some(3));
                assert_eq!(stderr, "stub.c:3: error: boom\n");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn successful_compiler_is_ok() {
        let mut inv = CompilerInvocation::new("sh");
        inv.arg("-c").arg("echo warning: unused >&2");
        assert!(inv.run().is_ok());
    }
}

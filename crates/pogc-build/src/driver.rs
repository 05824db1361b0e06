use std::path::{Path, PathBuf};

use pogc_embed::escape_script;

use crate::config::BuildConfig;
use crate::error::BuildError;
use crate::platform::Platform;
use crate::toolchain::CompilerInvocation;
use crate::unit::GeneratedUnit;

/// Result of a successful build.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub executable: PathBuf,
    pub platform: Platform,
    /// Path of the generated C unit when it was kept.
    pub kept_source: Option<PathBuf>,
}

/// A build with its C unit written and compiler command assembled, ready to
/// run.
#[derive(Debug)]
pub struct PreparedBuild {
    platform: Platform,
    output: PathBuf,
    unit: GeneratedUnit,
    invocation: CompilerInvocation,
    keep_temp: bool,
}

/// Read `script` and splice it into the configured stub, without touching
/// the filesystem otherwise.
pub fn generate_source(script: &Path, config: &BuildConfig) -> Result<String, BuildError> {
    let text = read_script(script)?;
    embed(&text, config)
}

fn read_script(script: &Path) -> Result<String, BuildError> {
    if !script.exists() {
        return Err(BuildError::ScriptNotFound(script.to_path_buf()));
    }
    std::fs::read_to_string(script).map_err(|e| BuildError::Io {
        path: script.to_path_buf(),
        source: e,
    })
}

fn embed(text: &str, config: &BuildConfig) -> Result<String, BuildError> {
    let stub = config.load_stub()?;
    let source = stub.substitute(&escape_script(text))?;
    Ok(source)
}

/// True when `output` names the same file as the existing `script`.
fn is_same_file(script: &Path, output: &Path) -> bool {
    match (std::fs::canonicalize(script), std::fs::canonicalize(output)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Everything up to, but not including, running the compiler.
///
/// Validation (missing script, unsupported platform, bad stub, output that
/// would overwrite the script) happens before the C unit is written, so a
/// failure here leaves no files behind.
pub fn prepare(script: &Path, config: &BuildConfig) -> Result<PreparedBuild, BuildError> {
    let text = read_script(script)?;
    let platform = config.resolve_platform()?;
    log::debug!("target platform: {}", platform);

    let source = embed(&text, config)?;

    let output = match &config.output {
        Some(path) => path.clone(),
        None => {
            let stem = script
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "a".to_string());
            PathBuf::from(platform.output_file_name(&stem))
        }
    };
    if is_same_file(script, &output) {
        return Err(BuildError::OutputIsScript(output));
    }

    let unit = GeneratedUnit::create(&config.work_dir, &source)?;
    let invocation = CompilerInvocation::for_unit(config, platform, unit.path(), &output);

    Ok(PreparedBuild {
        platform,
        output,
        unit,
        invocation,
        keep_temp: config.keep_temp,
    })
}

/// Build `script` into a native executable.
pub fn compile_script(script: &Path, config: &BuildConfig) -> Result<BuildOutcome, BuildError> {
    prepare(script, config)?.run()
}

impl PreparedBuild {
    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn source_path(&self) -> &Path {
        self.unit.path()
    }

    pub fn invocation(&self) -> &CompilerInvocation {
        &self.invocation
    }

    /// Run the compiler. The C unit is removed afterwards whatever the
    /// result, unless it was configured to be kept.
    pub fn run(self) -> Result<BuildOutcome, BuildError> {
        let result = self.invocation.run();
        let kept = self.keep_temp.then(|| self.unit.keep());
        let kept_source = settle(result, kept)?;

        Ok(BuildOutcome {
            executable: self.output,
            platform: self.platform,
            kept_source,
        })
    }
}

/// Combine the compiler result with the outcome of keeping the C unit. A
/// compiler failure always wins, so its stderr is never lost.
fn settle(
    result: Result<(), BuildError>,
    kept: Option<Result<PathBuf, BuildError>>,
) -> Result<Option<PathBuf>, BuildError> {
    match (result, kept) {
        (Err(e), Some(Err(keep_err))) => {
            log::warn!("could not keep generated source: {}", keep_err);
            Err(e)
        }
        (Err(e), Some(Ok(path))) => {
            log::info!("kept generated source {}", path.display());
            Err(e)
        }
        (Err(e), None) => Err(e),
        (Ok(()), Some(kept)) => {
            let path = kept?;
            log::info!("kept generated source {}", path.display());
            Ok(Some(path))
        }
        (Ok(()), None) => Ok(None),
    }
}

use clap::Parser;
use log::LevelFilter;
use pogc_build::config::{DEFAULT_COMPILER, DEFAULT_LIB_DIR, DEFAULT_LIB_NAME, DEFAULT_RPATH, DEFAULT_STUB_PATH};
use pogc_build::{BuildConfig, BuildError, StubSource};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "pogc",
    version,
    about = "Compile a Pogberry script into a native executable"
)]
struct Cli {
    /// Path to the Pogberry script (.pb)
    script: PathBuf,

    /// Output executable (defaults to the script name, plus .exe on Windows)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// C stub template containing the script placeholder
    #[arg(long, env = "POGC_STUB")]
    stub: Option<PathBuf>,

    /// Use the stub template built into pogc (overrides --stub)
    #[arg(long)]
    bundled_stub: bool,

    /// Directory containing the pogberry runtime library
    #[arg(short = 'L', long, env = "POGC_LIB_DIR", default_value = DEFAULT_LIB_DIR)]
    lib_dir: PathBuf,

    /// Name of the runtime library to link
    #[arg(long, default_value = DEFAULT_LIB_NAME)]
    lib_name: String,

    /// C compiler to invoke; extra words become leading arguments (e.g. "ccache gcc")
    #[arg(long = "cc", env = "CC", default_value = DEFAULT_COMPILER)]
    compiler: String,

    /// Target platform: generic, linux or windows (default: host)
    #[arg(long)]
    platform: Option<String>,

    /// Directory for the generated C source
    #[arg(long, default_value = ".")]
    work_dir: PathBuf,

    /// Extra include directory for the C compiler
    #[arg(short = 'I', long = "include")]
    include_dirs: Vec<PathBuf>,

    /// Pass a raw argument to the C compiler (e.g. --cc-arg -O2)
    #[arg(long = "cc-arg", allow_hyphen_values = true)]
    cc_args: Vec<String>,

    /// Keep symbols in the executable (do not pass -s)
    #[arg(long)]
    no_strip: bool,

    /// Windows: build a GUI-subsystem executable without a console
    #[arg(long)]
    windowed: bool,

    /// Linux: runtime library search path baked into the executable
    #[arg(long, default_value = DEFAULT_RPATH)]
    rpath: String,

    /// Keep the generated C source after compiling
    #[arg(long)]
    keep_temp: bool,

    /// Print the generated C source instead of compiling it
    #[arg(long)]
    emit_c: bool,

    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn build_config(&self) -> BuildConfig {
        let stub = match (&self.stub, self.bundled_stub) {
            (_, true) => StubSource::Bundled,
            (Some(path), false) => StubSource::File(path.clone()),
            (None, false) => StubSource::File(PathBuf::from(DEFAULT_STUB_PATH)),
        };

        BuildConfig {
            stub,
            lib_dir: self.lib_dir.clone(),
            lib_name: self.lib_name.clone(),
            compiler: self.compiler.clone(),
            platform: self.platform.clone(),
            output: self.output.clone(),
            work_dir: self.work_dir.clone(),
            include_dirs: self.include_dirs.clone(),
            cc_args: self.cc_args.clone(),
            strip: !self.no_strip,
            windowed: self.windowed,
            rpath: self.rpath.clone(),
            keep_temp: self.keep_temp,
        }
    }
}

fn init_logging(verbose: bool) {
    let mut builder = pretty_env_logger::formatted_builder();
    match std::env::var("RUST_LOG") {
        Ok(filters) => {
            builder.parse_filters(&filters);
        }
        Err(_) => {
            builder.filter_level(if verbose {
                LevelFilter::Debug
            } else {
                LevelFilter::Warn
            });
        }
    }
    builder.init();
}

fn run(cli: &Cli) -> Result<(), BuildError> {
    let config = cli.build_config();

    if cli.emit_c {
        let source = pogc_build::generate_source(&cli.script, &config)?;
        print!("{}", source);
        return Ok(());
    }

    let prepared = pogc_build::prepare(&cli.script, &config)?;
    println!("Platform: {}", prepared.platform());
    println!(
        "Compiling {} into {}...",
        cli.script.display(),
        prepared.output().display()
    );

    let outcome = prepared.run()?;
    if let Some(source) = &outcome.kept_source {
        println!("Kept generated source: {}", source.display());
    }
    println!("Success! Executable created: {}", outcome.executable.display());
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => {}
        Err(BuildError::CompilerFailed {
            compiler,
            status,
            stderr,
        }) => {
            eprintln!("Compilation failed! ({} exited with {})", compiler, status);
            eprintln!("--- {} error output ---", compiler);
            eprint!("{}", stderr);
            if !stderr.ends_with('\n') {
                eprintln!();
            }
            eprintln!("------------------------");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}

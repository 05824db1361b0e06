//! Build driver for `pogc`: embeds a Pogberry script into the C stub and
//! links it against the `pogberry` runtime with the system C compiler.
//!
//! ```text
//! script.pb ──▶ escape ──▶ stub.c ──▶ pogc_XXXX.c ──▶ gcc ──▶ script[.exe]
//!                          (placeholder)  (removed)     -L lib -lpogberry
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod platform;
pub mod toolchain;
pub mod unit;

pub use config::{BuildConfig, StubSource};
pub use driver::{BuildOutcome, PreparedBuild, compile_script, generate_source, prepare};
pub use error::BuildError;
pub use platform::Platform;
pub use toolchain::CompilerInvocation;
pub use unit::GeneratedUnit;

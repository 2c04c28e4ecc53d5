//! The embedded runtime source linked against every compiled program.
//!
//! [`RUNTIME_SOURCE`] is the complete text of the small C entry point that
//! calls the compiler's synthesized `__fax_main` (see
//! `faxc_sem::ENTRY_POINT_NAME`) and reports its result. The driver writes
//! it to a scratch file immediately before invoking the linker, since the
//! linker takes a path rather than a string.

use std::io::Write;
use std::path::{Path, PathBuf};

/// The runtime's C source, embedded at compile time.
pub const RUNTIME_SOURCE: &str = include_str!("runtime.c");

/// Writes [`RUNTIME_SOURCE`] to `runtime.c` inside `dir`, returning its path.
pub fn write_runtime_source(dir: &Path) -> std::io::Result<PathBuf> {
    let path = dir.join("runtime.c");
    let mut file = std::fs::File::create(&path)?;
    file.write_all(RUNTIME_SOURCE.as_bytes())?;
    Ok(path)
}

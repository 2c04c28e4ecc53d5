//! Invokes the system C++ driver to link the compiled object against the
//! runtime source.
//!
//! Handing the driver `output.o` and the runtime's `.c` file together
//! (rather than pre-compiling the runtime to its own object) keeps this
//! step a single external-process call, matching how a small compiler's
//! driver shells out to its toolchain rather than reimplementing a linker.

use std::path::Path;
use std::process::Command;

use crate::error::{CodeGenError, Result};

pub struct Linker {
    pub target: String,
    pub cxx: String,
}

impl Linker {
    pub fn new(target: String) -> Self {
        let cxx = std::env::var("CXX").unwrap_or_else(|_| "c++".to_string());
        Self { target, cxx }
    }

    /// Links `object` and `runtime_source` into an executable at `output`,
    /// passing `libs` as `-l` flags (e.g. `"m"` for the libm `cos` extern).
    pub fn link(&self, object: &Path, runtime_source: &Path, output: &Path, libs: &[String]) -> Result<()> {
        let mut command = Command::new(&self.cxx);
        command.arg(object).arg(runtime_source).arg("-o").arg(output);
        for lib in libs {
            command.arg(format!("-l{lib}"));
        }
        if !self.target.is_empty() {
            command.arg("-target").arg(&self.target);
        }

        let status = command
            .status()
            .map_err(|e| CodeGenError::CompilationError(format!("failed to run '{}': {e}", self.cxx)))?;

        if !status.success() {
            return Err(CodeGenError::CompilationError(format!("{} exited with {status}", self.cxx)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_cxx_as_the_default_driver() {
        let linker = Linker::new("x86_64-unknown-linux-gnu".to_string());
        assert_eq!(linker.cxx, std::env::var("CXX").unwrap_or_else(|_| "c++".to_string()));
    }
}

//! Driver: orchestrates the whole pipeline for a single source file.
//!
//! The core passes never see a whole-file AST up front. Parsing and
//! lowering alternate one top-level form at a time, because a `binary`
//! declaration's precedence only becomes visible to the parser once the
//! lowering pass has installed it — see `faxc_par` and `faxc_sem` for the
//! shared precedence table this depends on.

pub mod config;

use std::cell::RefCell;
use std::io::Write as _;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{bail, Context, Result};
use inkwell::context::Context as LlvmContext;
use inkwell::targets::TargetMachine;
use inkwell::OptimizationLevel;

use faxc_gen::{Linker, LlvmBackend};
use faxc_par::{Parser, ANON_EXPR_NAME};
use faxc_sem::Lowerer;
use faxc_util::diagnostic::{Diagnostic, Handler};
use faxc_util::{PrecedenceTable, SourceLoc};

pub use config::{parse_args, Config, ParsedArgs, USAGE};

const OBJECT_FILE_NAME: &str = "output.o";

/// Installs a `tracing-subscriber` `fmt` subscriber honoring `RUST_LOG`,
/// defaulting to `warn`. Call once, from `main`; tests that invoke [`run`]
/// directly (rather than through the compiled binary) skip this.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn is_anonymous_expr_name(name: &str) -> bool {
    name == ANON_EXPR_NAME || name.strip_prefix(ANON_EXPR_NAME).is_some_and(|rest| rest.starts_with('.'))
}

/// Runs the full pipeline for `config`: parse+lower every top-level form,
/// synthesize the entry point, print accumulated diagnostics, emit an
/// object file, and (unless `-c`) link it with the embedded runtime.
///
/// Diagnostics are printed regardless of outcome (§4.10 point 4); this
/// only returns `Err` once every requested artifact has been attempted,
/// so a compile error and a link error are never hidden from each other.
pub fn run(config: &Config) -> Result<()> {
    let source = std::fs::read_to_string(&config.input)
        .with_context(|| format!("failed to open '{}'", config.input.display()))?;

    let precedence = Rc::new(RefCell::new(PrecedenceTable::new()));
    let mut parse_handler = Handler::new();
    let mut lower_diagnostics: Vec<Diagnostic> = Vec::new();

    let llvm_context = LlvmContext::create();
    let module_name = config.input.file_stem().and_then(|s| s.to_str()).unwrap_or("module");
    let target_triple = TargetMachine::get_default_triple().as_str().to_string_lossy().into_owned();
    let backend = LlvmBackend::new(&llvm_context, module_name, target_triple, OptimizationLevel::None);
    let mut lowerer = Lowerer::new(backend, Rc::clone(&precedence));

    {
        let _parse_span = tracing::debug_span!("parse").entered();
        let mut parser = Parser::new(&source, Rc::clone(&precedence), &mut parse_handler);

        while let Some(function) = parser.next_function() {
            let loc = function.proto.loc;
            let is_extern = function.proto.is_extern;
            let name = function.proto.name.as_str().to_string();

            let lower_result = {
                let _lower_span = tracing::debug_span!("lower", name = %name).entered();
                lowerer.lower_function(&function)
            };

            match lower_result {
                Ok(()) if !is_extern && !is_anonymous_expr_name(&name) => {
                    let _emit_span = tracing::debug_span!("emit", name = %name).entered();
                    eprintln!("{}", lowerer.builder().emit_llvm_ir());
                }
                Ok(()) => {}
                Err(error) => lower_diagnostics.push(Diagnostic { message: error.to_string(), loc }),
            }
        }
    }

    if let Err(error) = lowerer.finish_program() {
        lower_diagnostics.push(Diagnostic { message: error.to_string(), loc: SourceLoc::START });
    }

    let mut diagnostics: Vec<Diagnostic> = parse_handler.diagnostics().to_vec();
    diagnostics.extend(lower_diagnostics);
    diagnostics.sort_by_key(|d| (d.loc.line, d.loc.col));

    {
        let stderr = std::io::stderr();
        let mut out = stderr.lock();
        for diag in &diagnostics {
            writeln!(out, "Error at {}: {}", diag.loc, diag.message)?;
        }
    }

    let object_path = PathBuf::from(OBJECT_FILE_NAME);
    {
        let _emit_span = tracing::debug_span!("emit").entered();
        lowerer.builder().write_object_file(&object_path).context("failed to write object file")?;
    }

    if !config.emit_object_only {
        let _link_span = tracing::debug_span!("link").entered();
        let scratch_dir =
            tempfile::tempdir().context("failed to create a scratch directory for the runtime source")?;
        let runtime_source = faxc_runtime::write_runtime_source(scratch_dir.path())
            .context("failed to write the embedded runtime source")?;

        let linker = Linker::new(lowerer.builder().target_triple.clone());
        linker
            .link(&object_path, &runtime_source, &config.output, &["m".to_string()])
            .context("failed to link the compiled object with the runtime")?;

        std::fs::remove_file(&object_path)
            .with_context(|| format!("failed to remove intermediate object file '{}'", object_path.display()))?;
    }

    if !diagnostics.is_empty() {
        bail!("compilation failed with {} diagnostic(s)", diagnostics.len());
    }
    Ok(())
}

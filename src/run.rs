//! Application run modes: logger init and the `convert` command.

use std::error::Error;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::cli::{Args, ConvertArgs};
use crate::core::charmap::ConversionMap;
use crate::core::document::{self, ConversionResult, ConvertError, HtmlMode};
use crate::core::history;
use crate::core::settings::Settings;
use crate::core::walk;

/// Errors in how `convert` was invoked or what it found.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("--in-place needs file or directory paths, not stdin")]
    InPlaceWithoutFiles,
    #[error("{0} input files would all be printed to stdout; use --in-place or --dry-run")]
    AmbiguousOutput(usize),
    #[error("'-' (stdin) cannot be combined with file paths")]
    StdinMixedWithPaths,
    #[error("No input files found")]
    NoInputs,
    #[error("{0} input file(s) could not be converted")]
    Failed(usize),
    #[error("No elements match selector '{0}'")]
    NoMatch(String),
}

/// Initialize env_logger on stderr. `RUST_LOG` takes precedence over -v/-q.
pub fn init_logger(args: &Args) {
    let log_level = args.log_level();
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .target(env_logger::Target::Stderr)
        .try_init();
}

/// What to convert with, resolved once per invocation.
struct Plan<'a> {
    map: &'a ConversionMap,
    /// `None` in plain-text mode.
    selector: Option<String>,
    mode: HtmlMode,
}

impl Plan<'_> {
    /// Convert one input. Returns the new content (None when unchanged) and the result.
    fn apply(&self, input: &str) -> Result<(Option<String>, ConversionResult), ConvertError> {
        match &self.selector {
            Some(selector) => {
                let conv = document::convert_html(input, selector, self.map, self.mode)?;
                Ok((conv.html, conv.result))
            }
            None => {
                let (out, count) = document::convert_text(input, self.map)?;
                let changed = (count > 0).then(|| out.into_owned());
                Ok((changed, ConversionResult { count, matched: true }))
            }
        }
    }
}

/// Run the `convert` command. Returns the combined result over all inputs.
pub fn run_convert(
    args: &ConvertArgs,
    settings: &Settings,
    quiet: bool,
) -> Result<ConversionResult, Box<dyn Error>> {
    let selector = if args.text {
        None
    } else {
        let sel = args.selector.clone().unwrap_or_else(|| settings.selector.clone());
        // Reject bad syntax before touching any input.
        document::parse_selector(&sel)?;
        Some(sel)
    };
    let plan = Plan {
        map: &settings.map,
        selector,
        mode: if args.fragment {
            HtmlMode::Fragment
        } else {
            HtmlMode::Document
        },
    };
    if plan.map.is_empty() {
        log::warn!("Character map is empty; nothing will be converted");
    }

    let total = if args.reads_stdin() {
        if args.in_place {
            return Err(RunError::InPlaceWithoutFiles.into());
        }
        let input = io::read_to_string(io::stdin())?;
        let (changed, result) = plan.apply(&input)?;
        if !args.dry_run {
            let mut out = io::stdout().lock();
            out.write_all(changed.as_deref().unwrap_or(input.as_str()).as_bytes())?;
            out.flush()?;
        }
        report(history::STDIN_SOURCE, &plan, result, quiet);
        remember(args, settings, &plan, history::STDIN_SOURCE, result);
        result
    } else {
        if args.mixes_stdin() {
            return Err(RunError::StdinMixedWithPaths.into());
        }
        let files = walk::collect_inputs(&args.paths, &args.include)?;
        if files.is_empty() {
            return Err(RunError::NoInputs.into());
        }
        if files.len() > 1 && !args.in_place && !args.dry_run {
            return Err(RunError::AmbiguousOutput(files.len()).into());
        }
        let mut total = ConversionResult::default();
        let mut failed = 0;
        for path in &files {
            // A failed file is logged and skipped; the run fails after the batch.
            let result = match convert_file(path, args, &plan) {
                Ok(result) => result,
                Err(e) => {
                    log::error!("{}", e);
                    failed += 1;
                    continue;
                }
            };
            let label = path.display().to_string();
            report(&label, &plan, result, quiet);
            remember(args, settings, &plan, &label, result);
            total = total.merge(result);
        }
        if failed > 0 {
            return Err(RunError::Failed(failed).into());
        }
        total
    };

    if let Some(sel) = &plan.selector
        && !total.matched
    {
        return Err(RunError::NoMatch(sel.clone()).into());
    }
    Ok(total)
}

fn convert_file(path: &Path, args: &ConvertArgs, plan: &Plan) -> Result<ConversionResult, Box<dyn Error>> {
    let input = fs::read_to_string(path)
        .map_err(|e| io::Error::new(e.kind(), format!("{}: {}", path.display(), e)))?;
    let (changed, result) = plan
        .apply(&input)
        .map_err(|e| format!("{}: {}", path.display(), e))?;
    if args.dry_run {
        return Ok(result);
    }
    if args.in_place {
        // Unchanged files are left untouched.
        if let Some(content) = changed {
            write_atomic(path, &content)
                .map_err(|e| io::Error::new(e.kind(), format!("{}: {}", path.display(), e)))?;
            log::info!("Rewrote {}", path.display());
        }
    } else {
        let mut out = io::stdout().lock();
        out.write_all(changed.as_deref().unwrap_or(input.as_str()).as_bytes())?;
        out.flush()?;
    }
    Ok(result)
}

fn write_atomic(path: &Path, content: &str) -> io::Result<()> {
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".glyphfix.tmp");
    let tmp = path.with_file_name(tmp_name);
    fs::write(&tmp, content)?;
    if let Ok(meta) = fs::metadata(path) {
        let _ = fs::set_permissions(&tmp, meta.permissions());
    }
    fs::rename(tmp, path)
}

/// Print a per-input summary on stderr so stdout carries only converted content.
fn report(label: &str, plan: &Plan, result: ConversionResult, quiet: bool) {
    if !result.matched {
        if let Some(sel) = &plan.selector {
            log::warn!("{}: no elements match selector '{}'", label, sel);
        }
        return;
    }
    if quiet {
        return;
    }
    if result.count == 0 {
        eprintln!("{}: no look-alike characters found", label);
    } else {
        eprintln!(
            "{}: converted {} character{}",
            label,
            result.count,
            if result.count == 1 { "" } else { "s" }
        );
    }
}

/// Record a conversion in history. Failures are logged, not fatal: the output is already written.
fn remember(args: &ConvertArgs, settings: &Settings, plan: &Plan, label: &str, result: ConversionResult) {
    if args.no_history || args.dry_run {
        return;
    }
    if let Err(e) = history::record(
        label,
        plan.selector.as_deref(),
        result.count,
        settings.max_history,
    ) {
        log::warn!("Failed to record history: {}", e);
    }
}

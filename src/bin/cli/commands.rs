//! Command implementations for the CLI tool.

use std::io::Write;
use std::path::{Path, PathBuf};

use ziped::filter::{FilterSpec, PathFilter};
use ziped::pipe::CommandLine;
use ziped::scheduler::{BatchOptions, run_batch};
use ziped::store::{OpenOptions, encoding_from_label};
use ziped::transaction::{OutputTarget, Transaction};
use ziped::transform::{Convert, List, Remove, Rename, Transform};
use ziped::{Error, Result};

use crate::exit_codes::{ExitCode, error_to_exit_code};
use crate::progress::CliProgress;

/// Options shared by every subcommand.
pub struct CommonConfig<'a> {
    pub filter: Option<&'a str>,
    pub regexp: Option<&'a str>,
    pub encoding: &'a str,
    pub quiet: bool,
}

impl CommonConfig<'_> {
    fn path_filter(&self) -> Result<PathFilter> {
        let spec = FilterSpec {
            pattern: self.filter.map(str::to_string),
            regexp: self.regexp.map(str::to_string),
        };
        PathFilter::compile(&spec)
    }

    fn open_options(&self) -> Result<OpenOptions> {
        Ok(OpenOptions {
            path_encoding: encoding_from_label(self.encoding)?,
        })
    }
}

/// Options shared by the editing subcommands.
pub struct EditConfig<'a> {
    pub common: CommonConfig<'a>,
    pub overwrite: bool,
    pub out: Option<&'a Path>,
    pub jobs: usize,
}

/// ls command implementation
pub fn list(common: &CommonConfig<'_>, archives: &[PathBuf]) -> ExitCode {
    let paths = match expand_paths(archives) {
        Ok(paths) => paths,
        Err(code) => return code,
    };

    let (filter, open_options) = match common.path_filter().and_then(|f| {
        let options = common.open_options()?;
        Ok((f, options))
    }) {
        Ok(pair) => pair,
        Err(e) => {
            eprintln!("{}", e);
            return error_to_exit_code(&e);
        }
    };

    if let Err(e) = write_listing(&paths, &filter, open_options, std::io::stdout()) {
        eprintln!("{}", e);
        return error_to_exit_code(&e);
    }
    ExitCode::Success
}

/// Writes the matching entry names of each archive to the given sink.
///
/// With more than one archive, each listing is preceded by a `path:` heading
/// and archives are separated by a blank line.
fn write_listing<W: Write>(
    paths: &[PathBuf],
    filter: &PathFilter,
    open_options: OpenOptions,
    mut out: W,
) -> Result<()> {
    let multi = paths.len() > 1;

    for (i, path) in paths.iter().enumerate() {
        if multi {
            writeln!(out, "{}:", path.display())?;
        }

        // Listing never modifies, so the output target is irrelevant.
        let transform = List::new(filter.clone(), Vec::new());
        Transaction::new(path, &OutputTarget::Overwrite)
            .open_options(open_options)
            .run(&transform)?;
        out.write_all(&transform.into_inner())?;

        if multi && i != paths.len() - 1 {
            writeln!(out)?;
        }
    }

    Ok(())
}

/// rm command implementation
pub fn remove(config: &EditConfig<'_>, archives: &[PathBuf]) -> ExitCode {
    run_edit(config, archives, |common| {
        let filter = common.path_filter()?;
        Ok(Remove::new(filter))
    })
}

/// rename command implementation
pub fn rename(config: &EditConfig<'_>, archives: &[PathBuf], from: &str, to: &str) -> ExitCode {
    let (from, to) = (from.to_string(), to.to_string());
    run_edit(config, archives, move |common| {
        let filter = common.path_filter()?;
        Ok(Rename::new(filter, from.clone(), to.clone()))
    })
}

/// convert command implementation
pub fn convert(config: &EditConfig<'_>, archives: &[PathBuf], cmd: &str) -> ExitCode {
    run_edit(config, archives, |common| {
        if cmd.is_empty() {
            return Err(Error::MissingParameter { name: "cmd" });
        }
        let filter = common.path_filter()?;
        let command = CommandLine::parse(cmd)?;
        Ok(Convert::new(filter, command))
    })
}

/// Shared batch-edit driver: validates the output mode, builds the transform,
/// and runs the scheduler.
fn run_edit<T, F>(config: &EditConfig<'_>, archives: &[PathBuf], build: F) -> ExitCode
where
    T: Transform + Sync,
    F: FnOnce(&CommonConfig<'_>) -> Result<T>,
{
    let paths = match expand_paths(archives) {
        Ok(paths) => paths,
        Err(code) => return code,
    };

    let target = match resolve_target(config, &paths) {
        Ok(target) => target,
        Err(code) => return code,
    };

    // Configuration errors abort before any file is opened.
    let setup = config.common.open_options().and_then(|open_options| {
        let transform = build(&config.common)?;
        Ok((open_options, transform))
    });
    let (open_options, transform) = match setup {
        Ok(pair) => pair,
        Err(e) => {
            eprintln!("{}", e);
            return error_to_exit_code(&e);
        }
    };

    let options = BatchOptions {
        jobs: config.jobs,
        open_options,
    };
    let progress = CliProgress::new(paths.len() as u64, config.common.quiet);

    let batch = run_batch(&paths, &target, &options, &transform, &progress);

    let mut code = ExitCode::Success;
    for (path, error) in batch.errors() {
        eprintln!("{}: {}", path.display(), error);
        if code == ExitCode::Success {
            code = error_to_exit_code(error);
        }
    }
    code
}

/// Validates the output flags against the input list.
fn resolve_target(
    config: &EditConfig<'_>,
    paths: &[PathBuf],
) -> std::result::Result<OutputTarget, ExitCode> {
    if config.overwrite {
        return Ok(OutputTarget::Overwrite);
    }

    let Some(out) = config.out else {
        eprintln!("output file name is required");
        return Err(ExitCode::BadArgs);
    };
    if paths.len() > 1 {
        eprintln!("for multiple files, only overwrite mode is supported");
        return Err(ExitCode::BadArgs);
    }

    Ok(OutputTarget::Path(out.to_path_buf()))
}

/// Expands wildcard arguments against the file system.
fn expand_paths(args: &[PathBuf]) -> std::result::Result<Vec<PathBuf>, ExitCode> {
    let mut paths = Vec::new();

    for arg in args {
        let text = arg.to_string_lossy();
        if text.contains('*') {
            let matches = match glob::glob(&text) {
                Ok(matches) => matches,
                Err(e) => {
                    eprintln!("{}: {}", text, e);
                    return Err(ExitCode::BadArgs);
                }
            };
            for entry in matches {
                match entry {
                    Ok(path) => paths.push(path),
                    Err(e) => {
                        eprintln!("{}", e);
                        return Err(ExitCode::IoError);
                    }
                }
            }
        } else {
            paths.push(arg.clone());
        }
    }

    if paths.is_empty() {
        eprintln!("No file specified");
        return Err(ExitCode::BadArgs);
    }

    Ok(paths)
}

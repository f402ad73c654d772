//! Command implementations for the CLI tool.

use std::path::Path;

use zipsession::safety::is_safe_entry_name;
use zipsession::{
    ArchiveSession, Compression, DiagnosticSink, EntryStat, Error, SessionOptions,
    list_relative_files_with_sink,
};

use crate::exit_codes::{ExitCode, error_to_exit_code};
use crate::file_selector::FileSelector;
use crate::output::{RunSummary, create_formatter};
use crate::password::{get_or_confirm_password, get_password};
use crate::progress::EntryProgress;
use crate::{CompressionMethod, OutputFormat};

/// Configuration for the create command.
pub struct CreateConfig<'a> {
    pub archive_path: &'a Path,
    pub source_dir: &'a Path,
    pub method: CompressionMethod,
    pub level: Option<u32>,
    pub password: Option<String>,
    pub prompt_password: bool,
    pub with_root: bool,
    pub exclude: &'a [String],
    pub format: OutputFormat,
    pub quiet: bool,
}

/// Configuration for the extract command.
pub struct ExtractConfig<'a> {
    pub archive_path: &'a Path,
    pub output_dir: &'a Path,
    pub include: &'a [String],
    pub exclude: &'a [String],
    pub skip_existing: bool,
    pub password: Option<String>,
    pub prompt_password: bool,
    pub format: OutputFormat,
    pub quiet: bool,
}

/// Create command implementation
pub fn create(config: &CreateConfig<'_>, sink: Box<dyn DiagnosticSink>) -> ExitCode {
    let formatter = create_formatter(config.format);

    let Some(compression) = compression_for(config.method) else {
        eprintln!("Error: compression method not enabled in this build");
        return ExitCode::BadArgs;
    };
    let mut options = SessionOptions::new().compression(compression);
    if let Some(level) = config.level {
        options = match options.level(level) {
            Ok(opts) => opts,
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::BadArgs;
            }
        };
    }

    let exclude_selector = match FileSelector::new(&[], config.exclude) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::BadArgs;
        }
    };

    let names = match list_relative_files_with_sink(config.source_dir, !config.with_root, &sink) {
        Ok(names) => names,
        Err(e) => {
            eprintln!("Error: {}", e);
            return error_to_exit_code(&e);
        }
    };
    let names: Vec<String> = names
        .into_iter()
        .filter(|name| exclude_selector.matches(name))
        .collect();

    if names.is_empty() {
        eprintln!("Error: No files to add to archive");
        return ExitCode::BadArgs;
    }

    let password = get_or_confirm_password(config.password.clone(), config.prompt_password);
    if config.prompt_password && password.is_none() {
        return ExitCode::BadArgs;
    }

    let mut session = ArchiveSession::with_sink(sink).options(options);
    let created = match password {
        Some(password) => session.create_write_encrypted(config.archive_path, password),
        None => session.create_write(config.archive_path),
    };
    if let Err(e) = created {
        eprintln!("Error creating archive: {}", e);
        return error_to_exit_code(&e);
    }

    let progress = EntryProgress::new(names.len() as u64, config.quiet);
    let mut summary = RunSummary::default();
    let mut exit_code = ExitCode::Success;

    for name in &names {
        progress.start_entry(name);
        let disk_path = config.source_dir.join(source_relative(name, config.with_root));
        match session.add_entry(name, &disk_path) {
            Ok(()) => {
                summary.entries_done += 1;
                summary.bytes += disk_path.metadata().map(|m| m.len()).unwrap_or(0);
            }
            Err(e) => {
                progress.warn(format!("Failed to add {}: {}", name, e));
                summary.record_failure(name.as_str(), &e);
                exit_code = exit_code.worst(ExitCode::Warning);
            }
        }
        progress.inc();
    }

    if let Err(e) = session.close() {
        progress.finish_with_message("Failed");
        eprintln!("Error finalizing archive: {}", e);
        return error_to_exit_code(&e);
    }
    progress.finish();

    if !config.quiet {
        print!("{}", formatter.format_summary("Added", &summary));
    }
    exit_code
}

/// Extract command implementation
pub fn extract(config: &ExtractConfig<'_>, sink: Box<dyn DiagnosticSink>) -> ExitCode {
    let formatter = create_formatter(config.format);

    let selector = match FileSelector::new(config.include, config.exclude) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::BadArgs;
        }
    };

    let mut session = ArchiveSession::with_sink(sink);
    let password = get_password(config.password.clone(), config.prompt_password);
    let entries = match open_and_list(&mut session, config.archive_path, password) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Error opening archive: {}", e);
            return error_to_exit_code(&e);
        }
    };

    if let Err(e) = std::fs::create_dir_all(config.output_dir) {
        eprintln!("Error creating output directory: {}", e);
        return ExitCode::IoError;
    }

    let selected: Vec<&EntryStat> = entries.iter().filter(|e| selector.matches(&e.name)).collect();
    let progress = EntryProgress::new(selected.len() as u64, config.quiet);
    let mut summary = RunSummary::default();
    let mut exit_code = ExitCode::Success;

    for entry in selected {
        progress.start_entry(&entry.name);
        match extract_one(&mut session, entry, config) {
            Ok(Some(bytes)) => {
                summary.entries_done += 1;
                summary.bytes += bytes;
            }
            Ok(None) => {}
            Err(e) => {
                progress.warn(format!("Failed to extract {}: {}", entry.name, e));
                exit_code = exit_code.worst(match error_to_exit_code(&e) {
                    ExitCode::WrongPassword => ExitCode::WrongPassword,
                    _ => ExitCode::Warning,
                });
                summary.record_failure(entry.name.as_str(), &e);
            }
        }
        progress.inc();
    }
    progress.finish();

    if let Err(e) = session.close() {
        eprintln!("Error closing archive: {}", e);
        return error_to_exit_code(&e);
    }

    if !config.quiet {
        print!("{}", formatter.format_summary("Extracted", &summary));
    }
    exit_code
}

/// List command implementation
pub fn list(
    archive_path: &Path,
    password: Option<String>,
    format: OutputFormat,
    sink: Box<dyn DiagnosticSink>,
) -> ExitCode {
    let formatter = create_formatter(format);
    let mut session = ArchiveSession::with_sink(sink);
    let password = get_password(password, false);

    match open_and_list(&mut session, archive_path, password) {
        Ok(entries) => {
            print!("{}", formatter.format_list(&entries));
            ExitCode::Success
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            error_to_exit_code(&e)
        }
    }
}

fn open_and_list(
    session: &mut ArchiveSession,
    path: &Path,
    password: Option<zipsession::Password>,
) -> Result<Vec<EntryStat>, Error> {
    match password {
        Some(password) => session.open_read_encrypted(path, password)?,
        None => session.open_read(path)?,
    }
    session.entries()
}

/// Extracts one entry, returning the bytes written or `None` when skipped.
fn extract_one(
    session: &mut ArchiveSession,
    entry: &EntryStat,
    config: &ExtractConfig<'_>,
) -> Result<Option<u64>, Error> {
    // Entry names are vetted before any directory is created from them
    let safe = is_safe_entry_name(entry.name.trim_end_matches('/'));
    let target = config.output_dir.join(&entry.name);

    if entry.name.ends_with('/') {
        if safe {
            std::fs::create_dir_all(&target)?;
        }
        return Ok(None);
    }

    if config.skip_existing && target.exists() {
        return Ok(None);
    }

    if safe {
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
    }

    session.extract_entry(entry.index, config.output_dir)?;
    Ok(Some(entry.size))
}

/// Maps an entry name back to its path below the source directory.
fn source_relative(name: &str, with_root: bool) -> &str {
    if with_root {
        name.split_once('/').map_or(name, |(_, rest)| rest)
    } else {
        name
    }
}

fn compression_for(method: CompressionMethod) -> Option<Compression> {
    match method {
        CompressionMethod::Store => Some(Compression::Stored),
        #[cfg(feature = "deflate")]
        CompressionMethod::Deflate => Some(Compression::Deflated),
        #[cfg(feature = "bzip2")]
        CompressionMethod::Bzip2 => Some(Compression::Bzip2),
        #[cfg(feature = "zstd")]
        CompressionMethod::Zstd => Some(Compression::Zstd),
        #[allow(unreachable_patterns)]
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_relative() {
        assert_eq!(source_relative("D/sub/a.txt", true), "sub/a.txt");
        assert_eq!(source_relative("sub/a.txt", false), "sub/a.txt");
    }

    #[test]
    fn test_store_always_available() {
        assert_eq!(
            compression_for(CompressionMethod::Store),
            Some(Compression::Stored)
        );
    }
}

//! The conversion pipeline: collect files, render a page per file, save.
//!
//! One failing image only costs its own page; the batch continues and the
//! document is still written. Only an empty collection result or a save
//! failure aborts the run.

use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use chrono::Local;
use printpdf::{PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg};

use crate::collector::collect_image_files;
use crate::config::Config;
use crate::error::AppError;
use crate::page;

/// Runs one conversion and returns the path the PDF was written to, which
/// may differ from the configured one when the save had to fall back.
pub fn run(config: &Config) -> Result<PathBuf, AppError> {
    let files = collect_image_files(&config.inputs, &config.extensions, config.sort_order);
    if files.is_empty() {
        return Err(AppError::NoFilesFound);
    }

    let title = config
        .output
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("output");
    let mut doc = PdfDocument::new(title);
    let pages = render_pages(&mut doc, &files, config.keep_original_size);

    // The document is written even when some pages failed to decode; the
    // skipped files simply contribute no page.
    doc.with_pages(pages);
    let mut warnings: Vec<PdfWarnMsg> = Vec::new();
    let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);

    save_document(&bytes, &config.output)
}

/// Renders one page per file, reporting progress as it goes.
///
/// A file that fails to decode is reported on stderr and contributes no
/// page, so the returned count can be lower than the file count.
fn render_pages(doc: &mut PdfDocument, files: &[PathBuf], keep_original_size: bool) -> Vec<PdfPage> {
    let total = files.len();
    let mut pages: Vec<PdfPage> = Vec::with_capacity(total);

    for (index, path) in files.iter().enumerate() {
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("<non-utf8 name>");
        print!("\rprocessing {}/{}: {}", index + 1, total, name);
        let _ = std::io::stdout().flush();

        match page::render_page(doc, path, keep_original_size) {
            Ok(page) => pages.push(page),
            Err(err) => eprintln!("\nerror: skipping {}: {}", path.display(), err),
        }
    }
    println!();

    pages
}

/// Writes the PDF bytes, creating parent directories as needed.
///
/// A target that exists but cannot be written (locked or read-only) is
/// retried once under a timestamp-suffixed name; any other write failure is
/// fatal.
fn save_document(bytes: &[u8], output: &Path) -> Result<PathBuf, AppError> {
    save_document_with(bytes, output, |path, data| fs::write(path, data))
}

/// Save with the actual write call factored out, so the unwritable-target
/// branch can be exercised without depending on filesystem permissions
/// (which a privileged process bypasses).
fn save_document_with<W>(bytes: &[u8], output: &Path, mut write: W) -> Result<PathBuf, AppError>
where
    W: FnMut(&Path, &[u8]) -> std::io::Result<()>,
{
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    match write(output, bytes) {
        Ok(()) => Ok(output.to_path_buf()),
        Err(err) if err.kind() == std::io::ErrorKind::PermissionDenied => {
            let fallback = timestamped_path(output);
            write(&fallback, bytes).map_err(|source| AppError::Save {
                path: fallback.clone(),
                source,
            })?;
            eprintln!(
                "warning: {} is not writable, saved to {} instead",
                output.display(),
                fallback.display()
            );
            Ok(fallback)
        }
        Err(source) => Err(AppError::Save {
            path: output.to_path_buf(),
            source,
        }),
    }
}

/// `out/album.pdf` -> `out/album_20260831142501.pdf`.
fn timestamped_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("output");
    let extension = output
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("pdf");
    let stamp = Local::now().format("%Y%m%d%H%M%S");
    output.with_file_name(format!("{stem}_{stamp}.{extension}"))
}

//! PDF export through the Typst CLI
//!
//! The document is written as Typst markup into a scratch directory next
//! to a re-encoded copy of the photo, compiled with `typst compile`, and
//! the result is copied into the output directory.

use std::fmt::{self, Write as _};
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;

use super::{Block, DocumentExporter, ExportDocument, ExportJob, ExportOptions, PHOTO_SIZE};
use crate::core::photo::decode_data_uri;

const SOURCE_FILE: &str = "main.typ";
const PHOTO_FILE: &str = "photo.jpg";

/// Exporter shelling out to a Typst binary
#[derive(Debug, Clone)]
pub struct TypstExporter {
    binary: String,
    output_dir: PathBuf,
    open_after_export: bool,
}

impl TypstExporter {
    pub fn new(binary: impl Into<String>, output_dir: PathBuf, open_after_export: bool) -> Self {
        Self {
            binary: binary.into(),
            output_dir,
            open_after_export,
        }
    }

    fn compile(&self, work_dir: &Path, output: &Path, options: &ExportOptions) -> Result<()> {
        let result = Command::new(&self.binary)
            .arg("compile")
            .arg(SOURCE_FILE)
            .arg(output)
            .current_dir(work_dir)
            .output()
            .with_context(|| format!("Failed to run {}. Is it installed?", self.binary))?;

        let stderr = String::from_utf8_lossy(&result.stderr);
        if !result.status.success() {
            anyhow::bail!("{} exited with {}: {}", self.binary, result.status, stderr.trim());
        }
        if options.rasterize.logging && !stderr.trim().is_empty() {
            tracing::debug!("typst: {}", stderr.trim());
        }
        Ok(())
    }
}

impl DocumentExporter for TypstExporter {
    fn export(&self, job: &ExportJob) -> Result<PathBuf> {
        let work = ScratchDir::create()?;

        let photo = match &job.document.photo {
            Some(uri) => match write_photo(&work.path.join(PHOTO_FILE), uri, &job.options) {
                Ok(()) => Some(PHOTO_FILE),
                Err(e) => {
                    tracing::warn!("Leaving photo out of export: {:#}", e);
                    None
                }
            },
            None => None,
        };

        let source = render_source(&job.document, &job.options, photo)
            .context("Failed to render Typst source")?;
        fs::write(work.path.join(SOURCE_FILE), source).context("Failed to write Typst source")?;

        let compiled = work.path.join(&job.options.filename);
        self.compile(&work.path, &compiled, &job.options)?;

        fs::create_dir_all(&self.output_dir).with_context(|| {
            format!("Failed to create output directory: {}", self.output_dir.display())
        })?;
        let destination = self.output_dir.join(&job.options.filename);
        fs::copy(&compiled, &destination)
            .with_context(|| format!("Failed to write {}", destination.display()))?;

        if self.open_after_export {
            if let Err(e) = open::that(&destination) {
                tracing::warn!("Failed to open {}: {}", destination.display(), e);
            }
        }
        Ok(destination)
    }
}

/// Temporary directory removed on drop
struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    fn create() -> Result<Self> {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        let path = std::env::temp_dir().join(format!(
            "portfolio-export-{}-{nanos}",
            std::process::id()
        ));
        fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create scratch dir: {}", path.display()))?;
        Ok(Self { path })
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_dir_all(&self.path) {
            tracing::debug!("Failed to remove {}: {}", self.path.display(), e);
        }
    }
}

/// Decode the photo, crop it square at the raster scale and store it as JPEG
fn write_photo(path: &Path, data_uri: &str, options: &ExportOptions) -> Result<()> {
    let (_, bytes) = decode_data_uri(data_uri).context("Photo is not a base64 data URI")?;
    let photo = image::load_from_memory(&bytes).context("Failed to decode photo")?;

    let edge = (PHOTO_SIZE as f32 * options.rasterize.scale).round().max(1.0) as u32;
    let rgb = photo.resize_to_fill(edge, edge, FilterType::Lanczos3).to_rgb8();

    let quality = (options.image.quality * 100.0).round().clamp(1.0, 100.0) as u8;
    let file = fs::File::create(path).context("Failed to create photo file")?;
    JpegEncoder::new_with_quality(BufWriter::new(file), quality)
        .encode_image(&rgb)
        .context("Failed to encode photo")?;
    Ok(())
}

/// Quote text as a Typst string literal
pub fn typst_str(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Typst source for a document
///
/// Lengths are expressed in virtual units `u`, sized so the padded
/// virtual page exactly fills the width between the margins.
pub fn render_source(
    document: &ExportDocument,
    options: &ExportOptions,
    photo: Option<&str>,
) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_preamble(&mut out, document, options)?;

    writeln!(out, "#block(width: 100%, inset: {} * u)[", document.padding)?;
    writeln!(
        out,
        "#block(width: {} * u, inset: 14 * u, radius: 8 * u, fill: white)[",
        document.page_width
    )?;
    write_header(&mut out, document, photo)?;

    for section in &document.sections {
        writeln!(out, "#heading3[#{}]", typst_str(&section.title))?;
        for block in &section.blocks {
            write_block(&mut out, block)?;
        }
    }

    out.push_str("]\n]\n");
    Ok(out)
}

fn write_preamble(out: &mut String, document: &ExportDocument, options: &ExportOptions) -> fmt::Result {
    let virtual_width = document.page_width + 2 * document.padding;
    let unit = options.page.unit.as_str();

    writeln!(
        out,
        "#set page(paper: {}, flipped: {}, margin: {}{unit})",
        typst_str(options.page.format.as_str()),
        options.page.orientation.is_landscape(),
        options.margin
    )?;
    writeln!(out, "#let u = {}{unit} / {}", options.content_width(), virtual_width)?;
    writeln!(
        out,
        "#set text(font: (\"Inter\", \"Arial\"), size: 14 * u, fill: rgb(\"#111111\"))"
    )?;
    writeln!(out, "#set par(spacing: 6 * u)")?;
    writeln!(out, "#let heading3(body) = block(above: 14 * u, below: 6 * u, text(size: 17 * u, weight: \"bold\", body))")?;
    writeln!(out)
}

fn write_header(out: &mut String, document: &ExportDocument, photo: Option<&str>) -> fmt::Result {
    let photo_cell = match photo {
        Some(file) => format!(
            "image({}, width: {PHOTO_SIZE} * u, height: {PHOTO_SIZE} * u, fit: \"cover\")",
            typst_str(file)
        ),
        None => format!(
            "rect(width: {PHOTO_SIZE} * u, height: {PHOTO_SIZE} * u, radius: 8 * u, fill: rgb(\"#f3f4f6\"))"
        ),
    };
    writeln!(
        out,
        "#grid(columns: ({PHOTO_SIZE} * u, 1fr), column-gutter: 12 * u, align: horizon,\n  {photo_cell},\n  [#text(size: 28 * u, weight: \"bold\")[#{}] #v(6 * u, weak: true) #text(fill: rgb(\"#666666\"))[#{}]],\n)",
        typst_str(&document.name),
        typst_str(&document.contact)
    )
}

fn write_block(out: &mut String, block: &Block) -> fmt::Result {
    match block {
        Block::Text(text) => writeln!(out, "#text(fill: rgb(\"#222222\"))[#{}]", typst_str(text)),
        Block::Labeled { label, value } => writeln!(
            out,
            "#block[#strong[#{}] #{}]",
            typst_str(&format!("{label}:")),
            typst_str(value)
        ),
        Block::Strong(text) => writeln!(out, "#block(strong[#{}])", typst_str(text)),
        Block::List(items) if !items.is_empty() => {
            let entries: Vec<String> = items
                .iter()
                .map(|item| format!("[#{}]", typst_str(item)))
                .collect();
            writeln!(out, "#list({})", entries.join(", "))
        }
        Block::List(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::profile::Profile;
    use crate::core::store::tests::scratch_dir;
    use crate::export::{prepare, ExportSource};
    use image::{ImageFormat, RgbImage};
    use std::io::Cursor;

    fn sample_job() -> ExportJob {
        let profile = Profile {
            full_name: "Ada \"Countess\" Lovelace".into(),
            contact_info: "ada@example.com".into(),
            bio: "Wrote #1 program\\notes [draft]".into(),
            projects: vec!["Note G".into()],
            ..Default::default()
        };
        prepare(ExportSource::Stored(&profile))
    }

    #[test]
    fn test_typst_str_escapes() {
        assert_eq!(typst_str("plain"), "\"plain\"");
        assert_eq!(typst_str("a\"b\\c\nd"), "\"a\\\"b\\\\c\\nd\"");
    }

    #[test]
    fn test_source_uses_page_options() {
        let job = sample_job();
        let source = render_source(&job.document, &job.options, None).unwrap();
        assert!(source.starts_with("#set page(paper: \"a4\", flipped: false, margin: 10mm)"));
        assert!(source.contains("#let u = 190mm / 840"));
        assert!(source.contains("fill: rgb(\"#f3f4f6\")"));
        assert!(!source.contains("image("));
    }

    #[test]
    fn test_source_escapes_user_text() {
        let job = sample_job();
        let source = render_source(&job.document, &job.options, Some(PHOTO_FILE)).unwrap();
        assert!(source.contains("#\"Ada \\\"Countess\\\" Lovelace\""));
        assert!(source.contains("#\"Wrote #1 program\\\\notes [draft]\""));
        assert!(source.contains("image(\"photo.jpg\""));
        assert!(source.contains("#list([#\"Note G\"])"));
        assert!(source.contains("#heading3[#\"Projects / Publications\"]"));
        assert!(!source.contains("Academics"));
    }

    #[test]
    fn test_write_photo_reencodes_at_scale() {
        let mut png = Vec::new();
        RgbImage::from_pixel(300, 200, image::Rgb([200, 10, 10]))
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();
        let uri = crate::core::photo::encode_data_uri("image/png", &png);

        let dir = scratch_dir("typst-photo");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(PHOTO_FILE);
        write_photo(&path, &uri, &sample_job().options).unwrap();

        let written = fs::read(&path).unwrap();
        assert_eq!(image::guess_format(&written).unwrap(), ImageFormat::Jpeg);
        let decoded = image::load_from_memory(&written).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (240, 240));

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_missing_binary_fails() {
        let dir = scratch_dir("typst-out");
        let exporter = TypstExporter::new("definitely-not-a-typst-binary", dir.clone(), false);
        assert!(exporter.export(&sample_job()).is_err());
        assert!(!dir.join("Ada__Countess__Lovelace.pdf").exists());
    }
}

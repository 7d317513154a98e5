//! Document export
//!
//! An export is prepared as an [`ExportJob`]: a declarative
//! [`ExportDocument`] plus fixed [`ExportOptions`]. Preparation is pure,
//! independent of the on-screen layout, and can be inspected without
//! rendering. The job is then handed to a [`DocumentExporter`] on a
//! background worker; the caller never waits for the result.

pub mod typst;

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use regex_lite::Regex;
use serde::Serialize;
use tokio::runtime::Handle;

use crate::core::form::FormState;
use crate::core::preview::{company_line, derive_preview, Preview, SKILLS_PLACEHOLDER};
use crate::core::profile::{academics_line, Profile};

/// Virtual width the document is laid out in
pub const VIRTUAL_PAGE_WIDTH: u32 = 800;
/// Padding around the card, in virtual units
pub const PAGE_PADDING: u32 = 20;
/// Photo edge length, in virtual units
pub const PHOTO_SIZE: u32 = 120;

const FALLBACK_FILE_STEM: &str = "portfolio";

/// Where an export takes its data from
#[derive(Debug, Clone, Copy)]
pub enum ExportSource<'a> {
    /// The form being edited, rendered as previewed
    Live(&'a FormState),
    /// A saved profile, rendered fresh
    Stored(&'a Profile),
}

/// A content block inside a section
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Text(String),
    /// `label: value` line with a bold label
    Labeled { label: String, value: String },
    /// Bold line
    Strong(String),
    /// Bulleted items
    List(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub blocks: Vec<Block>,
}

impl Section {
    fn new(title: &str, blocks: Vec<Block>) -> Self {
        Self {
            title: title.to_string(),
            blocks,
        }
    }
}

/// View-model of the exported document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    pub page_width: u32,
    pub padding: u32,
    pub name: String,
    pub contact: String,
    /// Photo data URI
    pub photo: Option<String>,
    pub sections: Vec<Section>,
}

impl ExportDocument {
    /// Build the document as the preview shows it, placeholders included
    pub fn from_preview(preview: &Preview) -> Self {
        let mut sections = vec![
            Section::new("About", vec![Block::Text(preview.bio.clone())]),
            skills_section(&preview.soft_skills, &preview.tech_skills),
        ];
        if let Some(academics) = &preview.academics {
            sections.push(Section::new("Academics", vec![Block::Text(academics.clone())]));
        }
        sections.push(Section::new(
            "Work Experience",
            vec![
                Block::Strong(preview.company.clone()),
                Block::List(preview.responsibilities.clone()),
            ],
        ));
        if let Some(projects) = &preview.projects {
            sections.push(Section::new(
                "Projects / Publications",
                vec![Block::List(projects.clone())],
            ));
        }

        Self::with_sections(
            preview.name.clone(),
            preview.contact.clone(),
            preview.photo.clone(),
            sections,
        )
    }

    /// Build the document straight from a saved profile
    pub fn from_profile(profile: &Profile) -> Self {
        let mut sections = vec![
            Section::new("About", vec![Block::Text(profile.bio.clone())]),
            skills_section(
                &skills_or_placeholder(&profile.soft_skills),
                &skills_or_placeholder(&profile.tech_skills),
            ),
        ];
        let academics = academics_line([
            profile.institute.as_str(),
            profile.degree.as_str(),
            profile.year.as_str(),
            profile.grade.as_str(),
        ]);
        if let Some(academics) = academics {
            sections.push(Section::new("Academics", vec![Block::Text(academics)]));
        }

        let mut experience = vec![Block::Strong(company_line(
            &profile.company,
            &profile.duration,
            "",
        ))];
        if !profile.responsibilities.is_empty() {
            experience.push(Block::List(profile.responsibilities.clone()));
        }
        sections.push(Section::new("Work Experience", experience));

        if !profile.projects.is_empty() {
            sections.push(Section::new(
                "Projects / Publications",
                vec![Block::List(profile.projects.clone())],
            ));
        }

        Self::with_sections(
            profile.full_name.clone(),
            profile.contact_info.clone(),
            (!profile.photo.is_empty()).then(|| profile.photo.clone()),
            sections,
        )
    }

    fn with_sections(
        name: String,
        contact: String,
        photo: Option<String>,
        sections: Vec<Section>,
    ) -> Self {
        Self {
            page_width: VIRTUAL_PAGE_WIDTH,
            padding: PAGE_PADDING,
            name,
            contact,
            photo,
            sections,
        }
    }
}

fn skills_section(soft: &str, tech: &str) -> Section {
    Section::new(
        "Skills",
        vec![
            Block::Labeled {
                label: "Soft".to_string(),
                value: soft.to_string(),
            },
            Block::Labeled {
                label: "Technical".to_string(),
                value: tech.to_string(),
            },
        ],
    )
}

fn skills_or_placeholder(skills: &[String]) -> String {
    if skills.is_empty() {
        SKILLS_PLACEHOLDER.to_string()
    } else {
        skills.join(", ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageUnit {
    Mm,
}

impl PageUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            PageUnit::Mm => "mm",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageFormat {
    A4,
}

impl PageFormat {
    /// Paper size in millimetres, portrait
    pub fn size_mm(self) -> (f32, f32) {
        match self {
            PageFormat::A4 => (210.0, 297.0),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PageFormat::A4 => "a4",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
}

impl Orientation {
    pub fn is_landscape(self) -> bool {
        match self {
            Orientation::Portrait => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageType {
    Jpeg,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageOptions {
    #[serde(rename = "type")]
    pub kind: ImageType,
    /// Encoder quality in `0.0..=1.0`
    pub quality: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RasterizeOptions {
    pub scale: f32,
    pub cross_origin_images: bool,
    pub logging: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageOptions {
    pub unit: PageUnit,
    pub format: PageFormat,
    pub orientation: Orientation,
}

/// Configuration handed to the exporter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportOptions {
    /// Page margin in [`PageOptions::unit`]
    pub margin: f32,
    pub filename: String,
    pub image: ImageOptions,
    pub rasterize: RasterizeOptions,
    pub page: PageOptions,
}

impl ExportOptions {
    /// The fixed export configuration for a document about `full_name`
    pub fn for_name(full_name: &str) -> Self {
        Self {
            margin: 10.0,
            filename: export_filename(full_name),
            image: ImageOptions {
                kind: ImageType::Jpeg,
                quality: 0.95,
            },
            rasterize: RasterizeOptions {
                scale: 2.0,
                cross_origin_images: true,
                logging: false,
            },
            page: PageOptions {
                unit: PageUnit::Mm,
                format: PageFormat::A4,
                orientation: Orientation::Portrait,
            },
        }
    }

    /// Width available to content between the margins, in page units
    pub fn content_width(&self) -> f32 {
        let (short, long) = self.page.format.size_mm();
        let width = if self.page.orientation.is_landscape() { long } else { short };
        width - 2.0 * self.margin
    }
}

fn whitespace_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("whitespace pattern is valid"))
}

/// File name for an export
///
/// Whitespace runs collapse to one underscore; path separators and other
/// characters not allowed in file names become underscores too, so the
/// result is always a single path component.
pub fn export_filename(full_name: &str) -> String {
    let name = full_name.trim();
    let stem = if name.is_empty() { FALLBACK_FILE_STEM } else { name };
    let stem: String = whitespace_regex()
        .replace_all(stem, "_")
        .chars()
        .map(|c| if is_file_name_char(c) { c } else { '_' })
        .collect();
    format!("{stem}.pdf")
}

fn is_file_name_char(c: char) -> bool {
    !c.is_control() && !matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|')
}

/// Everything an exporter needs to produce one file
#[derive(Debug, Clone, PartialEq)]
pub struct ExportJob {
    pub document: ExportDocument,
    pub options: ExportOptions,
}

/// Build the export job for a source
pub fn prepare(source: ExportSource<'_>) -> ExportJob {
    match source {
        ExportSource::Live(form) => ExportJob {
            document: ExportDocument::from_preview(&derive_preview(form)),
            options: ExportOptions::for_name(&form.full_name),
        },
        ExportSource::Stored(profile) => ExportJob {
            document: ExportDocument::from_profile(profile),
            options: ExportOptions::for_name(&profile.full_name),
        },
    }
}

/// Whether exporting the live form needs the user to confirm first
pub fn requires_confirmation(form: &FormState) -> bool {
    !form.has_required()
}

/// Produces the document file for a job
pub trait DocumentExporter: Send + Sync {
    /// Write the file and return where it landed
    fn export(&self, job: &ExportJob) -> anyhow::Result<PathBuf>;
}

/// Runs exports on the blocking pool, fire-and-forget
pub struct ExportOrchestrator {
    handle: Handle,
    exporter: Arc<dyn DocumentExporter>,
}

impl ExportOrchestrator {
    pub fn new(handle: Handle, exporter: Arc<dyn DocumentExporter>) -> Self {
        Self { handle, exporter }
    }

    /// Start an export; failures are only logged
    pub fn dispatch(&self, job: ExportJob) {
        let exporter = Arc::clone(&self.exporter);
        tracing::info!("Exporting {}", job.options.filename);

        self.handle.spawn_blocking(move || match exporter.export(&job) {
            Ok(path) => tracing::info!("Exported document to: {}", path.display()),
            Err(e) => tracing::error!("Failed to export {}: {:#}", job.options.filename, e),
        });
    }
}

//! # Calculation Sheet PDF
//!
//! One-page cross-section sheet compiled with Typst.
//!
//! ## Architecture
//!
//! - The Typst template is an embedded string constant
//! - Parameters and derived geometry are injected by placeholder replacement
//! - The section drawing is rendered to SVG and served to Typst as
//!   `section.svg` through the [`World`] file hook
//! - Output is raw PDF bytes (`Vec<u8>`)
//!
//! ## Example
//!
//! ```rust,no_run
//! use girder_core::drawing::{DrawingStyle, ViewMode};
//! use girder_core::export::pdf::{render_section_pdf, SheetInfo};
//! use girder_core::section::SectionParameters;
//!
//! let sheet = SheetInfo {
//!     engineer: "A. Engineer".to_string(),
//!     job_id: "26-014".to_string(),
//!     ..SheetInfo::default()
//! };
//! let pdf = render_section_pdf(
//!     &SectionParameters::default(),
//!     &DrawingStyle::default(),
//!     ViewMode::Orthographic,
//!     &sheet,
//! )
//! .unwrap();
//! std::fs::write("section.pdf", pdf).unwrap();
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use crate::drawing::render::{render, ViewMode};
use crate::drawing::style::DrawingStyle;
use crate::errors::{SectionError, SectionResult};
use crate::export::svg::to_svg;
use crate::section::{compute_layout, Layout, SectionParameters};

/// Path the template loads the drawing from
const DRAWING_PATH: &str = "section.svg";

/// Title block contents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetInfo {
    pub title: String,
    pub engineer: String,
    pub job_id: String,
}

impl Default for SheetInfo {
    fn default() -> Self {
        SheetInfo {
            title: "Steel Box Girder Cross-Section".to_string(),
            engineer: String::new(),
            job_id: String::new(),
        }
    }
}

/// Typst world with a single main source and one SVG image.
struct SheetWorld {
    main: Source,
    drawing: Bytes,
    book: LazyHash<FontBook>,
    fonts: Vec<Font>,
    library: LazyHash<Library>,
}

impl SheetWorld {
    fn new(source: String, drawing_svg: String) -> Self {
        let fonts = Self::load_fonts();
        let book = FontBook::from_fonts(&fonts);

        SheetWorld {
            main: Source::detached(source),
            drawing: Bytes::new(drawing_svg.into_bytes()),
            book: LazyHash::new(book),
            fonts,
            library: LazyHash::new(Library::default()),
        }
    }

    fn load_fonts() -> Vec<Font> {
        typst_assets::fonts()
            .flat_map(|data| Font::iter(Bytes::new(data.to_vec())))
            .collect()
    }
}

impl World for SheetWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.book
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        let path = id.vpath().as_rootless_path();
        if id.package().is_none() && path == std::path::Path::new(DRAWING_PATH) {
            Ok(self.drawing.clone())
        } else {
            Err(FileError::NotFound(path.into()))
        }
    }

    fn font(&self, index: usize) -> Option<Font> {
        self.fonts.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        let now = Utc::now();
        Datetime::from_ymd(
            now.format("%Y").to_string().parse().ok()?,
            now.format("%m").to_string().parse().ok()?,
            now.format("%d").to_string().parse().ok()?,
        )
    }
}

const SHEET_TEMPLATE: &str = r##"
#set page(
  paper: "a3",
  flipped: true,
  margin: (top: 15mm, bottom: 15mm, left: 15mm, right: 15mm),
  footer: [
    #line(length: 100%, stroke: 0.5pt + gray)
    #v(2pt)
    #grid(
      columns: (1fr, 1fr, 1fr),
      align(left)[#text(size: 8pt)[Job: {{JOB_ID}}]],
      align(center)[#text(size: 8pt)[Scale 1:{{SCALE}}]],
      align(right)[#text(size: 8pt)[{{DATE}}]],
    )
  ]
)

#set text(font: "DejaVu Sans Mono", size: 9pt)

#block(width: 100%, fill: rgb("#f0f0f0"), inset: 10pt, radius: 3pt)[
  #grid(
    columns: (1fr, auto),
    text(size: 16pt, weight: "bold")[{{TITLE}}],
    align(right)[Engineer: {{ENGINEER}} \ Job ID: {{JOB_ID}} \ View: {{VIEW}}],
  )
]

#v(8pt)

#grid(
  columns: (95mm, 1fr),
  gutter: 12pt,
  [
    == Input Parameters
    #table(
      columns: (1fr, auto, auto),
      inset: 5pt,
      stroke: 0.5pt,
      align: (left, right, left),
      table.header([*Parameter*], [*Value*], [*Unit*]),
      [Deck width], [{{DECK_WIDTH}}], [m],
      [Box width], [{{BOX_WIDTH}}], [mm],
      [Girder height], [{{HEIGHT}}], [mm],
      [Top flange t], [{{T_TOP}}], [mm],
      [Bottom flange t], [{{T_BOT}}], [mm],
      [Web t], [{{T_WEB}}], [mm],
      [Cells], [{{CELLS}}], [],
      [Top flange overhang], [{{TOP_OVERHANG}}], [mm],
      [Bottom flange overhang], [{{BOTTOM_OVERHANG}}], [mm],
      [Web setback], [{{SETBACK}}], [mm],
    )

    #v(8pt)

    == Derived Geometry
    #table(
      columns: (1fr, auto, auto),
      inset: 5pt,
      stroke: 0.5pt,
      align: (left, right, left),
      table.header([*Quantity*], [*Value*], [*Unit*]),
      [Clear width], [{{CLEAR_WIDTH}}], [mm],
      [Cell width], [{{CELL_WIDTH}}], [mm],
      [Last cell width], [{{LAST_CELL}}], [mm],
      [Deck overhang], [{{OVERHANG}}], [mm],
      [Webs], [{{WEB_COUNT}}], [],
    )

    #v(4pt)
    Web positions (mm): {{WEB_XS}}
  ],
  align(center + horizon)[
    #image("section.svg", width: 100%)
  ],
)
"##;

/// Render a one-page calculation sheet for a section.
///
/// # Errors
///
/// - [`SectionError::GeometryError`] for invalid parameters
/// - [`SectionError::ConfigError`] for an invalid style
/// - [`SectionError::ExportError`] when Typst compilation or PDF output fails
pub fn render_section_pdf(
    params: &SectionParameters,
    style: &DrawingStyle,
    view: ViewMode,
    sheet: &SheetInfo,
) -> SectionResult<Vec<u8>> {
    let layout = compute_layout(params)?;
    let drawing = render(&layout, style, view)?;
    let svg = to_svg(&drawing, style);

    let source = fill_template(params, &layout, style, view, sheet);
    let world = SheetWorld::new(source, svg);

    let warned = typst::compile(&world);
    let document = warned.output.map_err(|errors| {
        let messages: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        SectionError::export("pdf", format!("Typst compilation failed: {}", messages.join("; ")))
    })?;

    let pdf = typst_pdf::pdf(&document, &PdfOptions::default()).map_err(|errors| {
        let messages: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        SectionError::export("pdf", format!("PDF rendering failed: {}", messages.join("; ")))
    })?;

    debug!(bytes = pdf.len(), "compiled calculation sheet");
    Ok(pdf)
}

fn fill_template(
    params: &SectionParameters,
    layout: &Layout,
    style: &DrawingStyle,
    view: ViewMode,
    sheet: &SheetInfo,
) -> String {
    let view_name = match view {
        ViewMode::Orthographic => "orthographic".to_string(),
        ViewMode::Oblique { segment_length } => format!("oblique, L = {:.0} mm", segment_length),
    };
    let web_xs: Vec<String> = layout.web_xs().iter().map(|x| format!("{:.0}", x)).collect();

    SHEET_TEMPLATE
        .replace("{{TITLE}}", &escape_typst(&sheet.title))
        .replace("{{ENGINEER}}", &escape_typst(&sheet.engineer))
        .replace("{{JOB_ID}}", &escape_typst(&sheet.job_id))
        .replace("{{DATE}}", &Utc::now().format("%Y-%m-%d").to_string())
        .replace("{{SCALE}}", &format!("{:.0}", style.paper_scale))
        .replace("{{VIEW}}", &view_name)
        .replace("{{DECK_WIDTH}}", &format!("{:.3}", params.deck_width))
        .replace("{{BOX_WIDTH}}", &format!("{:.0}", params.box_width))
        .replace("{{HEIGHT}}", &format!("{:.0}", params.height))
        .replace("{{T_TOP}}", &format!("{:.0}", params.top_thickness))
        .replace("{{T_BOT}}", &format!("{:.0}", params.bottom_thickness))
        .replace("{{T_WEB}}", &format!("{:.0}", params.web_thickness))
        .replace("{{CELLS}}", &params.cell_count.to_string())
        .replace("{{TOP_OVERHANG}}", &format!("{:.0}", params.top_overhang))
        .replace("{{BOTTOM_OVERHANG}}", &format!("{:.0}", params.bottom_overhang))
        .replace("{{SETBACK}}", &format!("{:.0}", params.web_setback))
        .replace("{{CLEAR_WIDTH}}", &format!("{:.0}", layout.clear_width))
        .replace("{{CELL_WIDTH}}", &format!("{:.0}", layout.cell_width))
        .replace("{{LAST_CELL}}", &format!("{:.0}", layout.last_cell_width()))
        .replace("{{OVERHANG}}", &format!("{:.0}", layout.overhang))
        .replace("{{WEB_COUNT}}", &layout.web_count().to_string())
        .replace("{{WEB_XS}}", &web_xs.join(", "))
}

/// Escape special Typst characters in user-provided text
fn escape_typst(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '*' | '_' | '#' | '$' | '@' | '<' | '>' | '\\' | '`' | '[' | ']' => format!("\\{}", c),
            _ => c.to_string(),
        })
        .collect()
}

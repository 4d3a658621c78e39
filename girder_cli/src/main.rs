//! # Girder CLI
//!
//! Renders a dimensioned steel box-girder cross-section.
//!
//! ```text
//! girder_cli [params.json] [--style style.json] [--view ortho|oblique]
//!            [--length MM] [--out DIR] [--svg] [--pdf]
//!            [--engineer NAME] [--job ID]
//! ```
//!
//! Without a parameter file the main values are prompted for on stdin, with
//! the reference section as defaults. The PNG is always written; the derived
//! layout is printed as JSON. Set `RUST_LOG=debug` to trace the layout and
//! chain construction.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use girder_core::drawing::{render, DrawingStyle, ViewMode, DEFAULT_SEGMENT_LENGTH_MM};
use girder_core::export::{
    render_section_pdf, to_png, to_svg, SheetInfo, PDF_FILE_NAME, PDF_MIME, PNG_FILE_NAME, PNG_MIME,
    SVG_FILE_NAME, SVG_MIME,
};
use girder_core::file_io::{load_parameters, load_style, write_export};
use girder_core::section::{compute_layout, SectionParameters};
use girder_core::{SectionError, SectionResult};
use tracing::info;

/// View drawn by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ViewArg {
    /// Flat engineering cross-section
    #[value(alias = "orthographic")]
    Ortho,
    /// Pseudo-3D beam segment
    #[value(alias = "3d")]
    Oblique,
}

/// Render a dimensioned steel box-girder cross-section
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Section parameter JSON; prompts on stdin when omitted
    #[arg(value_parser)]
    params: Option<PathBuf>,

    /// Drawing style JSON
    #[arg(long)]
    style: Option<PathBuf>,

    /// Presentation mode
    #[arg(long, value_enum, default_value_t = ViewArg::Ortho)]
    view: ViewArg,

    /// Beam segment length of the oblique view (mm)
    #[arg(long)]
    length: Option<f64>,

    /// Output directory
    #[arg(long = "out", default_value = ".")]
    out_dir: PathBuf,

    /// Also write the SVG
    #[arg(long)]
    svg: bool,

    /// Also write the PDF calculation sheet
    #[arg(long)]
    pdf: bool,

    /// Engineer named in the PDF title block
    #[arg(long, default_value = "")]
    engineer: String,

    /// Job ID in the PDF title block
    #[arg(long, default_value = "")]
    job: String,
}

impl CliArgs {
    fn view(&self) -> ViewMode {
        match self.view {
            ViewArg::Ortho => ViewMode::Orthographic,
            ViewArg::Oblique => ViewMode::Oblique {
                segment_length: self.length.unwrap_or(DEFAULT_SEGMENT_LENGTH_MM),
            },
        }
    }

    fn sheet(&self) -> SheetInfo {
        SheetInfo {
            engineer: self.engineer.clone(),
            job_id: self.job.clone(),
            ..SheetInfo::default()
        }
    }
}

fn init_logging() {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let fmt_layer = fmt::layer().with_writer(io::stderr).with_target(false);

    tracing_subscriber::registry().with(env_filter).with(fmt_layer).init();
}

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    print!("{} [{}]: ", prompt, default);
    if io::stdout().flush().is_err() {
        return default;
    }

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return default;
    }

    input.trim().parse().unwrap_or(default)
}

fn prompt_parameters() -> SectionParameters {
    let d = SectionParameters::default();
    SectionParameters {
        deck_width: prompt_f64("Deck width (m)", d.deck_width),
        box_width: prompt_f64("Box width (mm)", d.box_width),
        height: prompt_f64("Girder height (mm)", d.height),
        top_thickness: prompt_f64("Top flange thickness (mm)", d.top_thickness),
        bottom_thickness: prompt_f64("Bottom flange thickness (mm)", d.bottom_thickness),
        web_thickness: prompt_f64("Web thickness (mm)", d.web_thickness),
        cell_count: prompt_f64("Number of cells", f64::from(d.cell_count)).max(0.0) as u32,
        top_overhang: prompt_f64("Top flange overhang (mm)", d.top_overhang),
        bottom_overhang: prompt_f64("Bottom flange overhang (mm)", d.bottom_overhang),
        web_setback: prompt_f64("Web setback from box edge (mm)", d.web_setback),
        dimension_gap: prompt_f64("Dimension gap (mm)", d.dimension_gap),
    }
}

fn run(args: &CliArgs) -> SectionResult<()> {
    let params = match &args.params {
        Some(path) => load_parameters(path)?,
        None => {
            println!("Girder CLI - Steel Box-Girder Cross-Section");
            println!("===========================================");
            println!();
            prompt_parameters()
        }
    };
    let style = match &args.style {
        Some(path) => load_style(path)?,
        None => DrawingStyle::default(),
    };
    let view = args.view();
    let out_dir = args.out_dir.clone();
    if !out_dir.is_dir() {
        std::fs::create_dir_all(&out_dir).map_err(|e| {
            SectionError::file_error("create directory", out_dir.display().to_string(), e.to_string())
        })?;
    }

    let layout = compute_layout(&params)?;
    let drawing = render(&layout, &style, view)?;

    let png_path = out_dir.join(PNG_FILE_NAME);
    write_export(&to_png(&drawing, &style)?, &png_path)?;
    report_written(&png_path, PNG_MIME);

    if args.svg {
        let svg_path = out_dir.join(SVG_FILE_NAME);
        write_export(to_svg(&drawing, &style).as_bytes(), &svg_path)?;
        report_written(&svg_path, SVG_MIME);
    }

    if args.pdf {
        let pdf_path = out_dir.join(PDF_FILE_NAME);
        write_export(&render_section_pdf(&params, &style, view, &args.sheet())?, &pdf_path)?;
        report_written(&pdf_path, PDF_MIME);
    }

    println!();
    println!("Derived layout:");
    println!("  Clear width:  {:.0} mm", layout.clear_width);
    println!("  Cell width:   {:.0} mm (last {:.0} mm)", layout.cell_width, layout.last_cell_width());
    println!("  Overhang:     {:.0} mm", layout.overhang);
    println!("  Webs:         {}", layout.web_count());
    println!();
    println!("JSON Output:");
    if let Ok(json) = serde_json::to_string_pretty(&layout) {
        println!("{}", json);
    }
    Ok(())
}

fn report_written(path: &Path, mime: &str) {
    info!(path = %path.display(), mime, "written");
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_logging();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            ExitCode::FAILURE
        }
    }
}

/// End-point plots — batches of walk end points and the exporters that draw
/// them.
///
/// Batches are plain data; drawing goes through [`ImageExporter`] so the
/// simulation side never depends on a renderer. [`EpsExporter`] writes an
/// Encapsulated PostScript page directly, [`GhostscriptExporter`] rasterizes
/// that page to PNG with an external `gs` process.

use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::io::Write as _;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use thiserror::Error;

use crate::core::registry::CharacterRegistry;
use crate::core::walk::{self, WalkError};
use crate::schema::marker::{Marker, Shape};
use crate::schema::point::Point;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to render page: {0}")]
    Render(#[from] std::fmt::Error),
    #[error("failed to start rasterizer '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("rasterizer '{program}' failed with {status}")]
    Rasterizer { program: String, status: ExitStatus },
}

/// Plot parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// End points drawn per character.
    pub walks_per_character: usize,
    /// Steps in each plotted walk.
    pub steps: u32,
    /// Factor applied to both coordinates before drawing.
    pub scale: i64,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            walks_per_character: 50,
            steps: 100,
            scale: 5,
        }
    }
}

/// One character's scaled end points and how to stamp them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotBatch {
    pub label: String,
    pub marker: Marker,
    pub points: Vec<Point>,
}

/// Build one batch per registered character, in registry order.
pub fn plot_batches<R: Rng + ?Sized>(
    registry: &CharacterRegistry,
    config: &PlotConfig,
    rng: &mut R,
) -> Result<Vec<PlotBatch>, WalkError> {
    let mut batches = Vec::with_capacity(registry.len());
    for character in registry.iter() {
        let points = walk::end_points(
            config.steps,
            config.walks_per_character,
            &character.profile,
            rng,
        )?
        .into_iter()
        .map(|p| p.scaled(config.scale))
        .collect();
        debug!(
            "plotted {} walks of {} steps for {}",
            config.walks_per_character, config.steps, character.name
        );
        batches.push(PlotBatch {
            label: character.name.clone(),
            marker: character.marker,
            points,
        });
    }
    Ok(batches)
}

/// Something that can turn plot batches into an image file.
pub trait ImageExporter {
    fn export(&self, batches: &[PlotBatch], dest: &Path) -> Result<(), ExportError>;
}

/// Pick an exporter from the destination's extension: `.eps` is written
/// directly, anything else is rasterized through Ghostscript.
pub fn exporter_for(dest: &Path) -> Box<dyn ImageExporter> {
    let is_eps = dest
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("eps"));
    if is_eps {
        Box::new(EpsExporter::default())
    } else {
        Box::new(GhostscriptExporter::default())
    }
}

/// Writes batches as an Encapsulated PostScript page.
#[derive(Debug, Clone)]
pub struct EpsExporter {
    /// Half-width of a stamped marker, in points.
    pub marker_size: f64,
    /// Minimum page extent `(width, height)`, centered on the origin.
    pub canvas: (f64, f64),
    /// Blank space kept around the outermost marker.
    pub margin: f64,
}

impl Default for EpsExporter {
    fn default() -> Self {
        Self {
            marker_size: 5.0,
            canvas: (300.0, 400.0),
            margin: 10.0,
        }
    }
}

impl EpsExporter {
    /// `(llx, lly, urx, ury)` covering the canvas and every marker.
    pub fn bounding_box(&self, batches: &[PlotBatch]) -> (i64, i64, i64, i64) {
        let reach = self.marker_size + self.margin;
        let (mut llx, mut lly) = (-self.canvas.0 / 2.0, -self.canvas.1 / 2.0);
        let (mut urx, mut ury) = (self.canvas.0 / 2.0, self.canvas.1 / 2.0);
        for p in batches.iter().flat_map(|b| b.points.iter()) {
            llx = llx.min(p.x as f64 - reach);
            lly = lly.min(p.y as f64 - reach);
            urx = urx.max(p.x as f64 + reach);
            ury = ury.max(p.y as f64 + reach);
        }
        (
            llx.floor() as i64,
            lly.floor() as i64,
            urx.ceil() as i64,
            ury.ceil() as i64,
        )
    }

    /// Render the PostScript document.
    pub fn render(&self, batches: &[PlotBatch]) -> Result<String, std::fmt::Error> {
        let bbox = self.bounding_box(batches);
        let mut out = String::new();
        self.write_document(&mut out, batches, bbox)?;
        Ok(out)
    }

    fn write_document(
        &self,
        out: &mut String,
        batches: &[PlotBatch],
        (llx, lly, urx, ury): (i64, i64, i64, i64),
    ) -> std::fmt::Result {
        writeln!(out, "%!PS-Adobe-3.0 EPSF-3.0")?;
        writeln!(out, "%%Creator: random-walk")?;
        writeln!(out, "%%Title: random walk end points")?;
        writeln!(out, "%%BoundingBox: {} {} {} {}", llx, lly, urx, ury)?;
        writeln!(out, "%%EndComments")?;
        writeln!(out, "1 1 1 setrgbcolor")?;
        writeln!(out, "{} {} {} {} rectfill", llx, lly, urx - llx, ury - lly)?;
        writeln!(out, "/s {} def", self.marker_size)?;
        writeln!(out, "/circle {{ newpath s 0 360 arc closepath fill }} bind def")?;
        writeln!(
            out,
            "/square {{ newpath moveto s neg s neg rmoveto s 2 mul 0 rlineto 0 s 2 mul rlineto s 2 mul neg 0 rlineto closepath fill }} bind def"
        )?;
        writeln!(
            out,
            "/triangle {{ newpath moveto 0 s rmoveto s neg s 2 mul neg rlineto s 2 mul 0 rlineto closepath fill }} bind def"
        )?;

        for batch in batches {
            let (r, g, b) = batch.marker.color.rgb();
            writeln!(out, "% {}", batch.label)?;
            writeln!(out, "{:.2} {:.2} {:.2} setrgbcolor", r, g, b)?;
            let proc_name = shape_proc(batch.marker.shape);
            for p in &batch.points {
                writeln!(out, "{} {} {}", p.x, p.y, proc_name)?;
            }
        }

        writeln!(out, "showpage")?;
        writeln!(out, "%%EOF")
    }
}

fn shape_proc(shape: Shape) -> &'static str {
    match shape {
        Shape::Circle => "circle",
        Shape::Square => "square",
        Shape::Triangle => "triangle",
    }
}

impl ImageExporter for EpsExporter {
    fn export(&self, batches: &[PlotBatch], dest: &Path) -> Result<(), ExportError> {
        std::fs::write(dest, self.render(batches)?)?;
        info!("wrote {}", dest.display());
        Ok(())
    }
}

/// Rasterizes the EPS page to PNG with Ghostscript.
#[derive(Debug, Clone)]
pub struct GhostscriptExporter {
    pub program: String,
    /// Output resolution in dots per inch.
    pub resolution: u32,
    pub page: EpsExporter,
}

impl Default for GhostscriptExporter {
    fn default() -> Self {
        Self {
            program: "gs".to_string(),
            resolution: 200,
            page: EpsExporter::default(),
        }
    }
}

impl GhostscriptExporter {
    fn rasterize(&self, eps: &Path, dest: &Path) -> Result<(), ExportError> {
        let status = Command::new(&self.program)
            .arg("-dSAFER")
            .arg("-o")
            .arg(dest)
            .arg(format!("-r{}", self.resolution))
            .arg("-dEPSCrop")
            .arg("-sDEVICE=png16m")
            .arg(eps)
            .stdout(Stdio::null())
            .status()
            .map_err(|source| ExportError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        if !status.success() {
            return Err(ExportError::Rasterizer {
                program: self.program.clone(),
                status,
            });
        }
        Ok(())
    }
}

impl ImageExporter for GhostscriptExporter {
    fn export(&self, batches: &[PlotBatch], dest: &Path) -> Result<(), ExportError> {
        // removed when dropped, on every return path
        let mut scratch = tempfile::Builder::new()
            .prefix("random_walk")
            .suffix(".eps")
            .tempfile()?;
        scratch.write_all(self.page.render(batches)?.as_bytes())?;
        scratch.flush()?;
        debug!("page written to {}", scratch.path().display());
        self.rasterize(scratch.path(), dest)?;
        info!("rasterized plot to {}", dest.display());
        Ok(())
    }
}

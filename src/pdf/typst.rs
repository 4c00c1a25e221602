use serde::Serialize;
use std::path::PathBuf;
use std::process::Command;

use super::PdfEngine;
use crate::error::{AppError, Result};
use crate::report::layout::{Element, PAGE_HEIGHT, PAGE_WIDTH, REPORT_FONT};
use crate::report::Page;

/// Embedded Typst template for the general report.
/// Layout is already done; the template only places each element at its
/// absolute position, one Typst page per laid-out page.
const REPORT_TEMPLATE: &str = r##"// General Report Template
// Data is loaded from JSON file

#let data = json("DATA_JSON_PATH")

#set page(
  width: data.width * 1mm,
  height: data.height * 1mm,
  margin: 0pt,
)

#set text(
  font: data.font,
  size: 10pt,
  top-edge: "ascender",
  bottom-edge: "descender",
)

#let draw-text(el) = {
  let body = text(
    size: el.size * 1pt,
    weight: if el.bold { "bold" } else { "regular" },
    fill: rgb(el.color),
    el.text,
  )
  let dx = if el.align == "center" { (el.x - el.width / 2) * 1mm } else { el.x * 1mm }
  place(top + left, dx: dx, dy: el.y * 1mm, box(
    width: el.width * 1mm,
    height: el.height * 1mm,
    clip: true,
    if el.align == "center" { align(center, body) } else { body },
  ))
}

#let draw-rect(el) = place(
  top + left,
  dx: el.x * 1mm,
  dy: el.y * 1mm,
  rect(width: el.width * 1mm, height: el.height * 1mm, fill: rgb(el.fill), stroke: none),
)

#for (i, pg) in data.pages.enumerate() {
  if i > 0 { pagebreak() }
  for el in pg.elements {
    if el.kind == "rect" { draw-rect(el) } else { draw-text(el) }
  }
}
"##;

#[derive(Debug, Serialize)]
struct DocumentData<'a> {
    font: &'static str,
    width: f64,
    height: f64,
    pages: Vec<PageData<'a>>,
}

#[derive(Debug, Serialize)]
struct PageData<'a> {
    number: usize,
    elements: &'a [Element],
}

/// Compiles laid-out pages to PDF with the Typst CLI.
#[derive(Debug, Clone)]
pub struct TypstEngine {
    binary: PathBuf,
}

impl TypstEngine {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for TypstEngine {
    fn default() -> Self {
        Self::new("typst")
    }
}

impl PdfEngine for TypstEngine {
    fn compile(&self, pages: &[Page]) -> Result<Vec<u8>> {
        // Check if typst is available
        let typst_check = Command::new(&self.binary).arg("--version").output();

        if typst_check.is_err() {
            return Err(AppError::TypstNotFound);
        }

        // Private directory per run, removed on drop
        let temp_dir = tempfile::Builder::new()
            .prefix("atendimentos-")
            .tempdir()?;

        let data = DocumentData {
            font: REPORT_FONT,
            width: PAGE_WIDTH,
            height: PAGE_HEIGHT,
            pages: pages
                .iter()
                .map(|p| PageData {
                    number: p.number,
                    elements: &p.elements,
                })
                .collect(),
        };
        let json_data =
            serde_json::to_string(&data).map_err(|e| AppError::PdfGeneration(e.to_string()))?;

        let json_path = temp_dir.path().join("data.json");
        std::fs::write(&json_path, &json_data)?;

        let template_content = REPORT_TEMPLATE.replace("DATA_JSON_PATH", "data.json");
        let template_path = temp_dir.path().join("report.typ");
        std::fs::write(&template_path, &template_content)?;

        let output_path = temp_dir.path().join("report.pdf");

        tracing::debug!(
            binary = %self.binary.display(),
            pages = pages.len(),
            "running typst compile"
        );
        let output = Command::new(&self.binary)
            .arg("compile")
            .arg("--root")
            .arg(temp_dir.path())
            .arg(&template_path)
            .arg(&output_path)
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::PdfGeneration(stderr.trim().to_string()));
        }

        let bytes = std::fs::read(&output_path)?;
        if !bytes.starts_with(b"%PDF") {
            return Err(AppError::PdfGeneration(
                "typst produced no PDF output".to_string(),
            ));
        }

        Ok(bytes)
    }
}

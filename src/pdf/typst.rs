use std::path::Path;
use std::process::Command;

use crate::error::{MaziwaError, Result};
use crate::report::ReportData;

/// Embedded Typst template for payment report generation
/// Uses a placeholder that gets replaced with the actual JSON file path
const REPORT_TEMPLATE: &str = r##"// Payment Report Template
// Data is loaded from JSON file

#let data = json("DATA_JSON_PATH")

#set page(
  paper: "a4",
  margin: (top: 1in, bottom: 1in, left: 1in, right: 1in),
)

#set text(font: "Helvetica", size: 10pt)

#let fmt-int(digits) = {
  let len = digits.len()
  let out = ""
  for (i, digit) in digits.clusters().enumerate() {
    if i > 0 and calc.rem(len - i, 3) == 0 {
      out += ","
    }
    out += digit
  }
  out
}

#let fmt-amount(amount) = {
  let parts = str(calc.round(amount, digits: 2)).split(".")
  let whole = fmt-int(parts.at(0))
  let out = data.currency_symbol + whole
  if parts.len() > 1 {
    out += "." + parts.at(1)
  }
  out
}

// Header with cooperative info and report title
#grid(
  columns: (1fr, 1fr),
  align: (left, right),
  [
    #text(size: 18pt, weight: "bold")[#data.cooperative.name]
    #v(0.3em)
    #data.cooperative.location
    #if data.cooperative.phone != none [
      \ #data.cooperative.phone
    ]
    #if data.cooperative.email != none [
      \ #data.cooperative.email
    ]
  ],
  [
    #text(size: 24pt, weight: "bold")[PAYMENT REPORT]
    #v(0.5em)
    #text(size: 10pt, fill: gray)[Generated #data.generated_date]
  ]
)

#v(1em)
#line(length: 100%, stroke: 0.5pt + gray)
#v(1em)

// Scope and filter block
#grid(
  columns: (1fr, 1fr),
  [
    #text(weight: "bold", size: 11pt)[Scope:]
    #v(0.3em)
    #if data.scope == "all" [
      All farmers
    ] else [
      Farmer #data.scope
    ]
  ],
  [
    #if data.filter_from != none or data.filter_to != none [
      #text(weight: "bold", size: 11pt)[Date range:]
      #v(0.3em)
      #if data.filter_from != none [
        From: #data.filter_from \
      ]
      #if data.filter_to != none [
        To: #data.filter_to
      ]
    ]
  ]
)

#v(1.5em)

// Payment entries table
#table(
  columns: (auto, 1fr, auto, auto, auto),
  align: (left, left, center, right, left),
  stroke: (x, y) => if y == 0 { (bottom: 1pt + black) } else if y > 0 { (bottom: 0.5pt + gray) },
  inset: 8pt,
  fill: (x, y) => if y == 0 { luma(240) } else { none },

  // Header
  [*Farmer*], [*Period*], [*Deliveries*], [*Amount*], [*Date Paid*],

  // Rows
  ..data.rows.map(row => (
    [#row.farmer_name #text(size: 8pt, fill: gray)[(#row.farmer_id)]],
    row.period,
    str(row.deliveries),
    [#fmt-amount(row.amount)],
    row.date_paid,
  )).flatten()
)

#v(1.5em)

// Summary (right-aligned)
#align(right)[
  #table(
    columns: (auto, auto),
    stroke: none,
    align: (right, right),
    inset: 6pt,

    [Entries:], [#str(data.rows.len())],

    table.hline(stroke: 1pt),
    [*Total:*], [*#fmt-amount(data.total_amount)*],
  )
]
"##;

/// Generate a payment report PDF using Typst CLI
pub fn generate_report_pdf(report_data: &ReportData, output_path: &Path) -> Result<()> {
    // Check if typst is available
    let typst_check = Command::new("typst").arg("--version").output();

    if typst_check.is_err() {
        return Err(MaziwaError::TypstNotFound);
    }

    // Create temp directory for template
    let temp_dir = std::env::temp_dir().join("maziwa-cli");
    std::fs::create_dir_all(&temp_dir)?;

    // Serialize report data to JSON
    let json_data = serde_json::to_string(report_data)
        .map_err(|e| MaziwaError::PdfGeneration(e.to_string()))?;

    // Write JSON to temp file
    let json_path = temp_dir.join("report_data.json");
    std::fs::write(&json_path, &json_data)?;

    // Write template with relative JSON path (data file is in same directory)
    let template_content = REPORT_TEMPLATE.replace("DATA_JSON_PATH", "report_data.json");
    let template_path = temp_dir.join("report.typ");
    std::fs::write(&template_path, &template_content)?;

    // Run typst compile with root set to temp directory
    let output = Command::new("typst")
        .args([
            "compile",
            "--root",
            temp_dir.to_str().unwrap_or("."),
            template_path.to_str().unwrap_or("report.typ"),
            output_path.to_str().unwrap_or("report.pdf"),
        ])
        .output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(MaziwaError::PdfGeneration(stderr.to_string()));
    }

    // Clean up temp files
    let _ = std::fs::remove_file(&template_path);
    let _ = std::fs::remove_file(&json_path);

    Ok(())
}

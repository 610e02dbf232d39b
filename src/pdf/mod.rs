mod typst;

pub use typst::generate_report_pdf;

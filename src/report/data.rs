use serde::Serialize;

use crate::config::Cooperative;

/// A single row in the payment report table
#[derive(Debug, Serialize)]
pub struct ReportRow {
    pub farmer_id: String,
    pub farmer_name: String,
    pub period: String,
    pub deliveries: usize,
    pub amount: f64,
    pub date_paid: String,
}

/// Complete data for rendering the payment report PDF
#[derive(Debug, Serialize)]
pub struct ReportData {
    pub cooperative: Cooperative,
    /// "all" or a specific farmer id
    pub scope: String,
    pub rows: Vec<ReportRow>,
    pub total_amount: f64,
    pub currency_symbol: String,
    pub generated_date: String,
    pub filter_from: Option<String>,
    pub filter_to: Option<String>,
}

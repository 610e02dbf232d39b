use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub cooperative: Cooperative,
    pub milk: MilkSettings,
    pub pdf: PdfSettings,
    #[serde(default)]
    pub tips: TipsSettings,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Cooperative {
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MilkSettings {
    /// Buying price per liter. Snapshotted when a report is generated;
    /// changing it never rewrites stored payment records.
    pub price_per_liter: f64,
    pub currency: String,
    pub currency_symbol: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PdfSettings {
    pub output_dir: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct TipsSettings {
    #[serde(default = "default_tips_model")]
    pub model: String,
}

impl Default for TipsSettings {
    fn default() -> Self {
        Self {
            model: default_tips_model(),
        }
    }
}

fn default_tips_model() -> String {
    "gemini-1.5-flash".to_string()
}

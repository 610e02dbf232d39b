use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A registered milk supplier. The farmer id is the table key in
/// farmers.toml, not a field here.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Farmer {
    pub name: String,
    pub phone: String,
    pub location: String,
    pub join_date: NaiveDate,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

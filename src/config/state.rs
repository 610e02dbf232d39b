use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{MaziwaError, Result};

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct State {
    #[serde(default)]
    pub counter: Counter,
    #[serde(default)]
    pub deliveries: Vec<MilkDelivery>,
    #[serde(default)]
    pub payments: Vec<Payment>,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Counter {
    #[serde(default)]
    pub last_delivery: u32,
    #[serde(default)]
    pub last_payment: u32,
}

impl Counter {
    /// Next durable delivery id, e.g. "DEL-0005".
    pub fn next_delivery_id(&mut self) -> String {
        self.last_delivery += 1;
        format!("DEL-{:04}", self.last_delivery)
    }

    /// Next durable payment id, e.g. "PAY-0003".
    pub fn next_payment_id(&mut self) -> String {
        self.last_payment += 1;
        format!("PAY-{:04}", self.last_payment)
    }
}

/// One recorded milk drop-off. Deliveries are append-only facts.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct MilkDelivery {
    pub id: String,
    pub farmer_id: String,
    pub date: NaiveDate,
    /// Time of day as "HH:MM".
    pub time: String,
    pub quantity_liters: f64,
    pub quality: Quality,
    #[serde(default)]
    pub recorded_by: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum Quality {
    Good,
    Fair,
    Poor,
}

impl Quality {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "good" => Ok(Quality::Good),
            "fair" => Ok(Quality::Fair),
            "poor" => Ok(Quality::Poor),
            _ => Err(MaziwaError::InvalidQuality(s.to_string())),
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quality::Good => write!(f, "Good"),
            Quality::Fair => write!(f, "Fair"),
            Quality::Poor => write!(f, "Poor"),
        }
    }
}

/// An amount owed to a farmer for a set of deliveries over a period.
/// Both the stored history records and the report engine's output.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Payment {
    pub id: String,
    pub farmer_id: String,
    pub farmer_name: String,
    /// Human-readable label for the covered span, e.g. "15/07/24 - 16/07/24".
    pub period: String,
    pub amount: f64,
    pub date_paid: NaiveDate,
    /// Provenance: ids of the deliveries this amount summarizes.
    #[serde(default)]
    pub delivery_ids: Vec<String>,
}

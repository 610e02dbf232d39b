pub mod config;
pub mod error;
pub mod pdf;
pub mod report;
pub mod tips;

pub use config::{Config, Cooperative, Farmer, MilkDelivery, Payment, Quality, State};
pub use error::{MaziwaError, Result};
pub use report::{generate_report, DateRange, FarmerFilter, Report};

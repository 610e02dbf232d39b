use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::config::{Farmer, MilkDelivery, Payment};
use crate::error::{MaziwaError, Result};

/// Display name used when a delivery references a farmer id that is not
/// in the register.
pub const UNKNOWN_FARMER: &str = "Unknown Farmer";

/// Which farmers a report covers. The CLI maps an absent --farmer flag
/// and the literal "all" to `All`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FarmerFilter {
    All,
    Farmer(String),
}

impl FarmerFilter {
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            None => FarmerFilter::All,
            Some(s) if s.eq_ignore_ascii_case("all") => FarmerFilter::All,
            Some(s) => FarmerFilter::Farmer(s.to_string()),
        }
    }

    fn matches(&self, farmer_id: &str) -> bool {
        match self {
            FarmerFilter::All => true,
            FarmerFilter::Farmer(id) => id == farmer_id,
        }
    }
}

/// Inclusive date window. An absent bound is unbounded on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    fn contains(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |d| date >= d) && self.to.map_or(true, |d| date <= d)
    }

    /// Period label for synthesized entries, e.g. "15/07/24 - 16/07/24".
    /// An open upper bound renders as "Overall".
    fn period_label(&self) -> String {
        let from = self
            .from
            .map(|d| d.format("%d/%m/%y").to_string())
            .unwrap_or_default();
        let to = self
            .to
            .map(|d| d.format("%d/%m/%y").to_string())
            .unwrap_or_else(|| "Overall".to_string());
        format!("{from} - {to}")
    }
}

/// Outcome of a report run. `Generated` carries freshly synthesized
/// entries, `History` the farmer's stored payments when the selected
/// window held no deliveries, `Empty` a legitimate no-data result.
#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    Generated(Vec<Payment>),
    History(Vec<Payment>),
    Empty,
}

impl Report {
    pub fn entries(&self) -> &[Payment] {
        match self {
            Report::Generated(entries) | Report::History(entries) => entries,
            Report::Empty => &[],
        }
    }

    pub fn into_entries(self) -> Vec<Payment> {
        match self {
            Report::Generated(entries) | Report::History(entries) => entries,
            Report::Empty => Vec::new(),
        }
    }
}

struct FarmerGroup<'a> {
    farmer_id: &'a str,
    total_liters: f64,
    delivery_ids: Vec<&'a str>,
}

/// Compute payment report entries for the given criteria.
///
/// Pure function of its inputs: the caller snapshots the price and the
/// current date before invoking. Matching deliveries are grouped by
/// farmer in first-seen order; each group becomes one entry whose amount
/// is the group's liters times `price_per_liter` and whose delivery ids
/// are exactly the contributing set. When the window holds no deliveries
/// for a specific farmer, that farmer's stored payments are returned
/// instead, in their original order.
///
/// The only error is `InvalidCriteria`: an all-farmers request with both
/// range bounds absent. An unregistered farmer id is not an error; at
/// synthesis time it degrades to the `UNKNOWN_FARMER` placeholder name.
pub fn generate_report(
    filter: &FarmerFilter,
    range: &DateRange,
    deliveries: &[MilkDelivery],
    farmers: &BTreeMap<String, Farmer>,
    existing_payments: &[Payment],
    price_per_liter: f64,
    today: NaiveDate,
) -> Result<Report> {
    if matches!(filter, FarmerFilter::All) && range.is_unbounded() {
        return Err(MaziwaError::InvalidCriteria);
    }

    // Group matching deliveries by farmer, preserving first-seen order
    let mut groups: Vec<FarmerGroup> = Vec::new();
    for delivery in deliveries {
        if !filter.matches(&delivery.farmer_id) || !range.contains(delivery.date) {
            continue;
        }
        let idx = match groups
            .iter()
            .position(|g| g.farmer_id == delivery.farmer_id)
        {
            Some(idx) => idx,
            None => {
                groups.push(FarmerGroup {
                    farmer_id: &delivery.farmer_id,
                    total_liters: 0.0,
                    delivery_ids: Vec::new(),
                });
                groups.len() - 1
            }
        };
        groups[idx].total_liters += delivery.quantity_liters;
        groups[idx].delivery_ids.push(&delivery.id);
    }

    if groups.is_empty() {
        return Ok(match filter {
            // No new deliveries in the window: fall back to the farmer's
            // payment history
            FarmerFilter::Farmer(farmer_id) => Report::History(
                existing_payments
                    .iter()
                    .filter(|p| &p.farmer_id == farmer_id)
                    .cloned()
                    .collect(),
            ),
            FarmerFilter::All => Report::Empty,
        });
    }

    let period = range.period_label();
    let stamp = today.format("%Y%m%d").to_string();

    let entries = groups
        .iter()
        .enumerate()
        .map(|(seq, group)| {
            let farmer_name = farmers
                .get(group.farmer_id)
                .map(|f| f.name.clone())
                .unwrap_or_else(|| UNKNOWN_FARMER.to_string());

            Payment {
                id: format!("REP-{}-{}-{:02}", group.farmer_id, stamp, seq + 1),
                farmer_id: group.farmer_id.to_string(),
                farmer_name,
                period: period.clone(),
                amount: group.total_liters * price_per_liter,
                date_paid: today,
                delivery_ids: group.delivery_ids.iter().map(|id| id.to_string()).collect(),
            }
        })
        .collect();

    Ok(Report::Generated(entries))
}

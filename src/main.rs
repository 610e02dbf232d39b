mod config;
mod error;
mod pdf;
mod report;
mod tips;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use tabled::{settings::Style, Table, Tabled};

use crate::config::{
    config_dir, load_config, load_farmers, load_state, resolve_output_dir, save_config,
    save_farmers, save_state, Farmer, MilkDelivery, Payment, Quality, CONFIG_TEMPLATE,
    FARMERS_TEMPLATE,
};
use crate::error::{MaziwaError, Result};
use crate::pdf::generate_report_pdf;
use crate::report::{
    generate_report, DateRange, FarmerFilter, Report, ReportData, ReportRow, UNKNOWN_FARMER,
};
use crate::tips::{generate_tips, TipsRequest};

#[derive(Parser)]
#[command(name = "maziwa")]
#[command(version, about = "Dairy cooperative management CLI", long_about = None)]
struct Cli {
    /// Path to config directory (default: ~/.maziwa or XDG config)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with template files
    Init,

    /// Register a new farmer
    Register {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Contact phone number
        #[arg(short, long)]
        phone: String,

        /// Location label (e.g., Mbarara)
        #[arg(short, long)]
        location: String,

        /// Farmer id (default: next free FARM### id)
        #[arg(long)]
        id: Option<String>,

        /// Join date (YYYY-MM-DD, default: today)
        #[arg(long)]
        join_date: Option<String>,
    },

    /// List registered farmers
    Farmers,

    /// Record a milk delivery
    Record {
        /// Farmer id from farmers.toml
        #[arg(short, long)]
        farmer: String,

        /// Quantity in liters
        #[arg(short, long)]
        quantity: f64,

        /// Quality grade (good, fair, poor)
        #[arg(long)]
        quality: String,

        /// Delivery date (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<String>,

        /// Time of day (HH:MM, default: now)
        #[arg(long)]
        time: Option<String>,

        /// Operator who recorded the delivery
        #[arg(long)]
        recorded_by: Option<String>,
    },

    /// List recorded milk deliveries
    Deliveries {
        /// Filter by farmer id
        #[arg(short, long)]
        farmer: Option<String>,

        /// Filter deliveries from this date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Filter deliveries to this date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },

    /// Generate a payment report from recorded deliveries
    Report {
        /// Farmer id, or 'all' (default: all farmers)
        #[arg(short, long)]
        farmer: Option<String>,

        /// Start of the covered period (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// End of the covered period (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Store generated entries in payment history
        #[arg(long)]
        save: bool,

        /// Export the report as a PDF
        #[arg(long)]
        pdf: bool,

        /// Open the exported PDF with the system default viewer
        #[arg(long)]
        open: bool,
    },

    /// Show payment history and delivery records for a farmer
    Payments {
        /// Farmer id from farmers.toml
        farmer: String,
    },

    /// Set the milk buying price per liter
    SetPrice {
        /// New price per liter
        price: f64,
    },

    /// Show cooperative status and recent activity
    Status,

    /// Generate milk production tips for a farmer
    Tips {
        /// Farmer id from farmers.toml
        #[arg(short, long)]
        farmer: String,

        /// Previous milk test results as JSON (default: summary of recorded deliveries)
        #[arg(long)]
        tests: Option<String>,

        /// Local agricultural data as JSON
        #[arg(long)]
        region: Option<String>,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Determine config directory
    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Register {
            name,
            phone,
            location,
            id,
            join_date,
        } => cmd_register(&cfg_dir, &name, &phone, &location, id, join_date),
        Commands::Farmers => cmd_farmers(&cfg_dir),
        Commands::Record {
            farmer,
            quantity,
            quality,
            date,
            time,
            recorded_by,
        } => cmd_record(&cfg_dir, &farmer, quantity, &quality, date, time, recorded_by),
        Commands::Deliveries { farmer, from, to } => cmd_deliveries(&cfg_dir, farmer, from, to),
        Commands::Report {
            farmer,
            from,
            to,
            save,
            pdf,
            open,
        } => cmd_report(&cfg_dir, farmer, from, to, save, pdf, open),
        Commands::Payments { farmer } => cmd_payments(&cfg_dir, &farmer),
        Commands::SetPrice { price } => cmd_set_price(&cfg_dir, price),
        Commands::Status => cmd_status(&cfg_dir),
        Commands::Tips {
            farmer,
            tests,
            region,
        } => cmd_tips(&cfg_dir, &farmer, tests, region),
    }
}

/// Initialize config directory with template files
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    use std::fs;

    if cfg_dir.exists() {
        return Err(MaziwaError::AlreadyInitialized(cfg_dir.to_path_buf()));
    }

    // Create directories
    fs::create_dir_all(cfg_dir)?;
    fs::create_dir_all(cfg_dir.join("output"))?;

    // Write template files
    fs::write(cfg_dir.join("config.toml"), CONFIG_TEMPLATE)?;
    fs::write(cfg_dir.join("farmers.toml"), FARMERS_TEMPLATE)?;

    println!("Initialized maziwa config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Edit your cooperative details:  $EDITOR {}/config.toml",
        cfg_dir.display()
    );
    println!("  2. Register your farmers:          maziwa register --name <name> --phone <phone> --location <location>");
    println!("  3. Record deliveries:              maziwa record --farmer <id> --quantity <liters> --quality <grade>");
    println!();
    println!("Then generate your first payment report:");
    println!("  maziwa report --from <YYYY-MM-DD> --to <YYYY-MM-DD>");

    Ok(())
}

// Table row structs for tabled
#[derive(Tabled)]
struct FarmerRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "PHONE")]
    phone: String,
    #[tabled(rename = "LOCATION")]
    location: String,
    #[tabled(rename = "JOINED")]
    joined: String,
    #[tabled(rename = "STATUS")]
    status: String,
}

#[derive(Tabled)]
struct DeliveryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "FARMER")]
    farmer: String,
    #[tabled(rename = "DATE")]
    date: String,
    #[tabled(rename = "TIME")]
    time: String,
    #[tabled(rename = "LITERS")]
    liters: String,
    #[tabled(rename = "QUALITY")]
    quality: String,
}

#[derive(Tabled)]
struct PaymentReportRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "FARMER")]
    farmer: String,
    #[tabled(rename = "PERIOD")]
    period: String,
    #[tabled(rename = "DELIVERIES")]
    deliveries: usize,
    #[tabled(rename = "AMOUNT")]
    amount: String,
    #[tabled(rename = "DATE PAID")]
    date_paid: String,
}

#[derive(Tabled)]
struct PaymentHistoryRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "PERIOD")]
    period: String,
    #[tabled(rename = "AMOUNT")]
    amount: String,
    #[tabled(rename = "DATE PAID")]
    date_paid: String,
}

fn format_whole_money(value: f64, currency_symbol: &str) -> String {
    let rounded = value.round() as i64;
    let grouped = format_grouped_int(rounded);
    format!("{}{:>6}", currency_symbol, grouped)
}

fn format_grouped_int(value: i64) -> String {
    let negative = value < 0;
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    let mut grouped: String = out.chars().rev().collect();
    if negative {
        grouped.insert(0, '-');
    }
    grouped
}

/// Append a TOTAL row to the rendered report table by merging the four
/// leading columns into one label cell, keeping AMOUNT, and closing off
/// DATE PAID.
fn add_total_footer(table: &str, total: &str) -> String {
    let lines: Vec<&str> = table.lines().collect();
    if lines.len() < 4 {
        return table.to_string();
    }

    // Parse the top border to discover column widths
    let top = lines[0];
    let Some(inner) = top.strip_prefix('╭').and_then(|s| s.strip_suffix('╮')) else {
        return table.to_string();
    };

    let widths: Vec<usize> = inner.split('┬').map(|p| p.chars().count()).collect();
    if widths.len() < 6 {
        return table.to_string();
    }

    // Merge columns #, FARMER, PERIOD, DELIVERIES into one label cell
    let left_width = widths[0] + widths[1] + widths[2] + widths[3] + 3; // +3 for the three ┴ replaced by spaces
    let amount_width = widths[4];
    let date_width = widths[5];

    // Strip the original bottom border and start building
    let mut out = lines[..lines.len() - 1].join("\n");
    out.push('\n');

    // Separator: merge left 4 columns, keep AMOUNT, close off DATE PAID
    out.push_str(&format!(
        "├{}┴{}┴{}┴{}┼{}┼{}╯\n",
        "─".repeat(widths[0]),
        "─".repeat(widths[1]),
        "─".repeat(widths[2]),
        "─".repeat(widths[3]),
        "─".repeat(amount_width),
        "─".repeat(date_width),
    ));

    // Total row
    out.push_str(&format!(
        "│ {:>left$} │ {:>amount$} │\n",
        "TOTAL",
        total,
        left = left_width - 2,
        amount = amount_width - 2
    ));

    // Bottom border
    out.push_str(&format!(
        "╰{}┴{}╯",
        "─".repeat(left_width),
        "─".repeat(amount_width)
    ));

    out
}

fn parse_date(value: &str, flag: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| MaziwaError::InvalidDate {
        flag: flag.to_string(),
        value: value.to_string(),
    })
}

/// Next free FARM### id based on the highest numeric suffix in use
fn next_farmer_id(farmers: &BTreeMap<String, Farmer>) -> String {
    let highest = farmers
        .keys()
        .filter_map(|id| id.strip_prefix("FARM"))
        .filter_map(|suffix| suffix.parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    format!("FARM{:03}", highest + 1)
}

fn resolve_farmer_name(farmers: &BTreeMap<String, Farmer>, farmer_id: &str) -> String {
    farmers
        .get(farmer_id)
        .map(|f| f.name.clone())
        .unwrap_or_else(|| UNKNOWN_FARMER.to_string())
}

/// Register a new farmer
fn cmd_register(
    cfg_dir: &Path,
    name: &str,
    phone: &str,
    location: &str,
    id: Option<String>,
    join_date: Option<String>,
) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(MaziwaError::ConfigNotFound(cfg_dir.to_path_buf()));
    }

    let mut farmers = load_farmers(cfg_dir)?;

    let farmer_id = match id {
        Some(id) => id,
        None => next_farmer_id(&farmers),
    };

    if farmers.contains_key(&farmer_id) {
        return Err(MaziwaError::FarmerExists(farmer_id));
    }

    let joined = match join_date {
        Some(s) => parse_date(&s, "--join-date")?,
        None => Local::now().date_naive(),
    };

    farmers.insert(
        farmer_id.clone(),
        Farmer {
            name: name.to_string(),
            phone: phone.to_string(),
            location: location.to_string(),
            join_date: joined,
            active: true,
        },
    );

    save_farmers(cfg_dir, &farmers)?;

    println!("Registered {}", farmer_id);
    println!("  Name:     {}", name);
    println!("  Phone:    {}", phone);
    println!("  Location: {}", location);
    println!("  Joined:   {}", joined);

    Ok(())
}

/// List registered farmers
fn cmd_farmers(cfg_dir: &Path) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(MaziwaError::ConfigNotFound(cfg_dir.to_path_buf()));
    }

    let farmers = load_farmers(cfg_dir)?;

    if farmers.is_empty() {
        println!("No farmers registered.");
        println!("Register one with: maziwa register --name <name> --phone <phone> --location <location>");
        return Ok(());
    }

    // BTreeMap iterates in id order
    let rows: Vec<FarmerRow> = farmers
        .iter()
        .map(|(id, farmer)| FarmerRow {
            id: id.to_string(),
            name: farmer.name.clone(),
            phone: farmer.phone.clone(),
            location: farmer.location.clone(),
            joined: farmer.join_date.to_string(),
            status: if farmer.active {
                "Active".to_string()
            } else {
                "Inactive".to_string()
            },
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");

    Ok(())
}

/// Record a milk delivery
fn cmd_record(
    cfg_dir: &Path,
    farmer_id: &str,
    quantity: f64,
    quality: &str,
    date: Option<String>,
    time: Option<String>,
    recorded_by: Option<String>,
) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(MaziwaError::ConfigNotFound(cfg_dir.to_path_buf()));
    }

    let farmers = load_farmers(cfg_dir)?;
    let farmer = farmers
        .get(farmer_id)
        .ok_or_else(|| MaziwaError::FarmerNotFound(farmer_id.to_string()))?;

    if !(quantity.is_finite() && quantity > 0.0) {
        return Err(MaziwaError::InvalidQuantity {
            qty: quantity.to_string(),
            reason: "must be greater than 0".to_string(),
        });
    }

    let quality = Quality::parse(quality)?;

    let delivery_date = match date {
        Some(s) => parse_date(&s, "--date")?,
        None => Local::now().date_naive(),
    };

    let delivery_time = match time {
        Some(s) => {
            NaiveTime::parse_from_str(&s, "%H:%M").map_err(|_| MaziwaError::InvalidTime(s.clone()))?;
            s
        }
        None => Local::now().format("%H:%M").to_string(),
    };

    let mut state = load_state(cfg_dir)?;
    let delivery_id = state.counter.next_delivery_id();

    state.deliveries.push(MilkDelivery {
        id: delivery_id.clone(),
        farmer_id: farmer_id.to_string(),
        date: delivery_date,
        time: delivery_time.clone(),
        quantity_liters: quantity,
        quality,
        recorded_by,
    });

    save_state(cfg_dir, &state)?;

    println!("Recorded {}", delivery_id);
    println!("  Farmer:   {} ({})", farmer.name, farmer_id);
    println!("  Quantity: {:.1} L", quantity);
    println!("  Quality:  {}", quality);
    println!("  When:     {} {}", delivery_date, delivery_time);

    Ok(())
}

/// List recorded milk deliveries
fn cmd_deliveries(
    cfg_dir: &Path,
    farmer: Option<String>,
    from: Option<String>,
    to: Option<String>,
) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(MaziwaError::ConfigNotFound(cfg_dir.to_path_buf()));
    }

    let farmers = load_farmers(cfg_dir)?;
    let state = load_state(cfg_dir)?;

    let from_date = from
        .as_ref()
        .map(|s| parse_date(s, "--from"))
        .transpose()?;
    let to_date = to.as_ref().map(|s| parse_date(s, "--to")).transpose()?;

    let filtered: Vec<&MilkDelivery> = state
        .deliveries
        .iter()
        .filter(|d| farmer.as_ref().map_or(true, |f| &d.farmer_id == f))
        .filter(|d| from_date.map_or(true, |cutoff| d.date >= cutoff))
        .filter(|d| to_date.map_or(true, |cutoff| d.date <= cutoff))
        .collect();

    if filtered.is_empty() {
        println!("No deliveries recorded for the selected criteria.");
        return Ok(());
    }

    let rows: Vec<DeliveryRow> = filtered
        .iter()
        .map(|d| DeliveryRow {
            id: d.id.clone(),
            farmer: format!("{} ({})", resolve_farmer_name(&farmers, &d.farmer_id), d.farmer_id),
            date: d.date.to_string(),
            time: d.time.clone(),
            liters: format!("{:.1}", d.quantity_liters),
            quality: d.quality.to_string(),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");

    let total_liters: f64 = filtered.iter().map(|d| d.quantity_liters).sum();
    println!();
    println!(
        "Total: {} deliveries, {:.1} liters",
        filtered.len(),
        total_liters
    );

    Ok(())
}

/// Generate a payment report from recorded deliveries
fn cmd_report(
    cfg_dir: &Path,
    farmer: Option<String>,
    from: Option<String>,
    to: Option<String>,
    save: bool,
    pdf: bool,
    open: bool,
) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(MaziwaError::ConfigNotFound(cfg_dir.to_path_buf()));
    }

    let config = load_config(cfg_dir)?;
    let farmers = load_farmers(cfg_dir)?;
    let state = load_state(cfg_dir)?;

    // Snapshot the price; the engine itself never validates it
    let price = config.milk.price_per_liter;
    if !(price.is_finite() && price > 0.0) {
        return Err(MaziwaError::InvalidPrice(price));
    }

    let from_date = from
        .as_ref()
        .map(|s| parse_date(s, "--from"))
        .transpose()?;
    let to_date = to.as_ref().map(|s| parse_date(s, "--to")).transpose()?;

    let filter = FarmerFilter::from_arg(farmer.as_deref());
    let range = DateRange::new(from_date, to_date);
    let today = Local::now().date_naive();

    let result = generate_report(
        &filter,
        &range,
        &state.deliveries,
        &farmers,
        &state.payments,
        price,
        today,
    )?;

    match &result {
        Report::Generated(_) => println!("Report Generated"),
        Report::History(entries) => {
            if let FarmerFilter::Farmer(id) = &filter {
                let name = resolve_farmer_name(&farmers, id);
                if entries.is_empty() {
                    println!("No deliveries or past payments found for {name} ({id}).");
                } else {
                    println!(
                        "No new deliveries in the selected range for {name}. Showing past payments."
                    );
                }
            }
        }
        Report::Empty => println!("No deliveries found for the selected criteria."),
    }

    let entries = result.entries();

    if !entries.is_empty() {
        let rows: Vec<PaymentReportRow> = entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| PaymentReportRow {
                index: idx + 1,
                farmer: format!("{} ({})", entry.farmer_name, entry.farmer_id),
                period: entry.period.clone(),
                deliveries: entry.delivery_ids.len(),
                amount: format_whole_money(entry.amount, &config.milk.currency_symbol),
                date_paid: entry.date_paid.to_string(),
            })
            .collect();

        let total: f64 = entries.iter().map(|e| e.amount).sum();
        let table = Table::new(rows).with(Style::rounded()).to_string();
        let table = add_total_footer(
            &table,
            &format_whole_money(total, &config.milk.currency_symbol),
        );
        println!("{table}");
    }

    if save {
        match &result {
            Report::Generated(generated) => {
                let mut state = state;
                let mut saved = Vec::with_capacity(generated.len());
                for entry in generated {
                    // Durable ids come from the state counter, not the
                    // per-invocation REP- scheme
                    let mut record = entry.clone();
                    record.id = state.counter.next_payment_id();
                    saved.push(record.id.clone());
                    state.payments.push(record);
                }
                save_state(cfg_dir, &state)?;
                println!();
                println!("Saved {} payment record(s): {}", saved.len(), saved.join(", "));
            }
            _ => {
                println!();
                println!("Nothing new to save.");
            }
        }
    }

    if pdf {
        if entries.is_empty() {
            println!();
            println!("No data to export.");
            return Ok(());
        }

        let scope = match &filter {
            FarmerFilter::All => "all".to_string(),
            FarmerFilter::Farmer(id) => id.clone(),
        };

        let report_data = ReportData {
            cooperative: config.cooperative.clone(),
            scope: scope.clone(),
            rows: entries
                .iter()
                .map(|entry| ReportRow {
                    farmer_id: entry.farmer_id.clone(),
                    farmer_name: entry.farmer_name.clone(),
                    period: entry.period.clone(),
                    deliveries: entry.delivery_ids.len(),
                    amount: entry.amount,
                    date_paid: entry.date_paid.format("%B %d, %Y").to_string(),
                })
                .collect(),
            total_amount: entries.iter().map(|e| e.amount).sum(),
            currency_symbol: config.milk.currency_symbol.clone(),
            generated_date: today.format("%B %d, %Y").to_string(),
            filter_from: from,
            filter_to: to,
        };

        let output_dir = resolve_output_dir(&config.pdf.output_dir, cfg_dir);
        std::fs::create_dir_all(&output_dir)?;

        let pdf_filename = format!("REPORT-{}-{}.pdf", scope, today.format("%Y-%m-%d"));
        let pdf_path = output_dir.join(&pdf_filename);

        generate_report_pdf(&report_data, &pdf_path)?;

        println!();
        println!("Saved: {}", pdf_path.display());

        if open {
            open_path(&pdf_path)?;
        }
    }

    Ok(())
}

/// Show payment history and delivery records for a farmer
fn cmd_payments(cfg_dir: &Path, farmer_id: &str) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(MaziwaError::ConfigNotFound(cfg_dir.to_path_buf()));
    }

    let config = load_config(cfg_dir)?;
    let farmers = load_farmers(cfg_dir)?;
    let state = load_state(cfg_dir)?;

    let farmer = farmers
        .get(farmer_id)
        .ok_or_else(|| MaziwaError::FarmerNotFound(farmer_id.to_string()))?;

    let payments: Vec<&Payment> = state
        .payments
        .iter()
        .filter(|p| p.farmer_id == farmer_id)
        .collect();

    println!("Payment History for {}", farmer.name);
    if payments.is_empty() {
        println!("  No payment records found.");
    } else {
        let rows: Vec<PaymentHistoryRow> = payments
            .iter()
            .enumerate()
            .map(|(idx, p)| PaymentHistoryRow {
                index: idx + 1,
                period: p.period.clone(),
                amount: format_whole_money(p.amount, &config.milk.currency_symbol),
                date_paid: p.date_paid.to_string(),
            })
            .collect();

        let table = Table::new(rows).with(Style::rounded()).to_string();
        println!("{table}");
    }

    let deliveries: Vec<&MilkDelivery> = state
        .deliveries
        .iter()
        .filter(|d| d.farmer_id == farmer_id)
        .collect();

    println!();
    println!("Delivery Records for {}", farmer.name);
    if deliveries.is_empty() {
        println!("  No delivery records found.");
    } else {
        let rows: Vec<DeliveryRow> = deliveries
            .iter()
            .map(|d| DeliveryRow {
                id: d.id.clone(),
                farmer: format!("{} ({})", farmer.name, farmer_id),
                date: d.date.to_string(),
                time: d.time.clone(),
                liters: format!("{:.1}", d.quantity_liters),
                quality: d.quality.to_string(),
            })
            .collect();

        let table = Table::new(rows).with(Style::rounded()).to_string();
        println!("{table}");
    }

    let total_paid: f64 = payments.iter().map(|p| p.amount).sum();
    let total_liters: f64 = deliveries.iter().map(|d| d.quantity_liters).sum();
    println!();
    println!(
        "Total paid: {}{} across {} payment(s); {:.1} liters delivered",
        config.milk.currency_symbol,
        format_grouped_int(total_paid.round() as i64),
        payments.len(),
        total_liters
    );

    Ok(())
}

/// Set the milk buying price per liter
fn cmd_set_price(cfg_dir: &Path, price: f64) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(MaziwaError::ConfigNotFound(cfg_dir.to_path_buf()));
    }

    if !(price.is_finite() && price > 0.0) {
        return Err(MaziwaError::InvalidPrice(price));
    }

    let mut config = load_config(cfg_dir)?;
    config.milk.price_per_liter = price;
    save_config(cfg_dir, &config)?;

    println!(
        "Milk buying price set to {} {}/liter.",
        config.milk.currency, price
    );
    println!("Stored payment records keep the price in effect when they were generated.");

    Ok(())
}

/// Show cooperative status and recent activity
fn cmd_status(cfg_dir: &Path) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(MaziwaError::ConfigNotFound(cfg_dir.to_path_buf()));
    }

    let config = load_config(cfg_dir)?;
    let farmers = load_farmers(cfg_dir)?;
    let state = load_state(cfg_dir)?;

    let active = farmers.values().filter(|f| f.active).count();
    let total_liters: f64 = state.deliveries.iter().map(|d| d.quantity_liters).sum();
    let total_paid: f64 = state.payments.iter().map(|p| p.amount).sum();

    println!("Cooperative Status");
    println!("{}", "-".repeat(50));
    println!("Config directory: {}", cfg_dir.display());
    println!(
        "Cooperative:      {} ({})",
        config.cooperative.name, config.cooperative.location
    );
    println!("Farmers:          {} ({} active)", farmers.len(), active);
    println!(
        "Deliveries:       {} ({:.1} L)",
        state.deliveries.len(),
        total_liters
    );
    println!(
        "Payments:         {} ({}{})",
        state.payments.len(),
        config.milk.currency_symbol,
        format_grouped_int(total_paid.round() as i64)
    );
    println!(
        "Milk price:       {} {}/liter",
        config.milk.currency, config.milk.price_per_liter
    );

    if !state.deliveries.is_empty() {
        println!();
        println!("Recent deliveries:");
        for delivery in state.deliveries.iter().rev().take(5) {
            println!(
                "  {} - {} - {:.1} L ({})",
                delivery.id,
                resolve_farmer_name(&farmers, &delivery.farmer_id),
                delivery.quantity_liters,
                delivery.quality
            );
        }
    }

    Ok(())
}

/// Summarize a farmer's recorded deliveries as a milk-test stand-in for
/// the tips prompt when no explicit test results are given.
fn milk_test_summary(deliveries: &[MilkDelivery], farmer_id: &str) -> String {
    let records: Vec<&MilkDelivery> = deliveries
        .iter()
        .filter(|d| d.farmer_id == farmer_id)
        .collect();

    let total_liters: f64 = records.iter().map(|d| d.quantity_liters).sum();
    let (mut good, mut fair, mut poor) = (0, 0, 0);
    for delivery in &records {
        match delivery.quality {
            Quality::Good => good += 1,
            Quality::Fair => fair += 1,
            Quality::Poor => poor += 1,
        }
    }

    serde_json::json!({
        "recordedDeliveries": records.len(),
        "totalLiters": total_liters,
        "qualityCounts": { "Good": good, "Fair": fair, "Poor": poor },
    })
    .to_string()
}

/// Generate milk production tips for a farmer
fn cmd_tips(
    cfg_dir: &Path,
    farmer_id: &str,
    tests: Option<String>,
    region: Option<String>,
) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(MaziwaError::ConfigNotFound(cfg_dir.to_path_buf()));
    }

    let config = load_config(cfg_dir)?;
    let farmers = load_farmers(cfg_dir)?;
    let state = load_state(cfg_dir)?;

    let farmer = farmers
        .get(farmer_id)
        .ok_or_else(|| MaziwaError::FarmerNotFound(farmer_id.to_string()))?;

    let api_key = std::env::var("GEMINI_API_KEY").map_err(|_| MaziwaError::TipsApiKeyMissing)?;

    let previous_milk_tests =
        tests.unwrap_or_else(|| milk_test_summary(&state.deliveries, farmer_id));
    let local_agricultural_data = region.unwrap_or_else(|| "{}".to_string());

    println!("Generating milk production tips for {}...", farmer.name);

    let tips = generate_tips(
        &TipsRequest {
            farmer_id,
            previous_milk_tests: &previous_milk_tests,
            local_agricultural_data: &local_agricultural_data,
        },
        &config.tips.model,
        &api_key,
    )?;

    println!();
    println!("{tips}");

    Ok(())
}

fn open_path(pdf_path: &Path) -> Result<()> {
    // Open with system default viewer
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(pdf_path)
            .spawn()
            .map_err(MaziwaError::Io)?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(pdf_path)
            .spawn()
            .map_err(MaziwaError::Io)?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", "", pdf_path.to_str().unwrap_or("")])
            .spawn()
            .map_err(MaziwaError::Io)?;
    }
    Ok(())
}

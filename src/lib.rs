//! econviz
//!
//! Fetch World Bank indicator series for a handful of countries, aggregate them
//! into tidy `Country, Year, Value` rows and present them as charts, tables or
//! CSV/JSON. Pairs with the `econviz` CLI and the `econviz-gui` dashboard.
//!
//! ### Features
//! - Fixed registry of countries (display name to ISO alpha-3 code) and indicators
//! - One request per country; a failing country never aborts the others
//! - Line chart per country (optional log scale) and a latest-year bar chart
//! - CSV export safe to open in spreadsheets, JSON export, text table, summaries
//!
//! ### Example
//! ```no_run
//! use econviz::config::ApiConfig;
//! use econviz::viz::{ChartKind, ChartOptions};
//! use econviz::{Client, Selection, YearRange, dataset};
//!
//! let client = Client::new(&ApiConfig::default())?;
//! let selection = Selection::new(
//!     &["South Africa", "Nigeria"],
//!     "GDP growth (%)",
//!     YearRange::new(2001, 2022)?,
//! )?;
//! let data = dataset::load(&client, &selection);
//! econviz::storage::save_csv(&data.rows, "gdp_growth.csv")?;
//! let opts = ChartOptions {
//!     indicator_label: data.indicator_label.clone(),
//!     ..ChartOptions::default()
//! };
//! econviz::viz::plot_chart(&data.rows, "gdp_growth.svg", ChartKind::Lines, &opts)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod api;
pub mod config;
pub mod dataset;
pub mod error;
pub mod models;
pub mod registry;
pub mod stats;
pub mod storage;
pub mod table;
pub mod viz;

pub use api::Client;
pub use dataset::{Dataset, Selection};
pub use models::{SeriesRow, YearRange};

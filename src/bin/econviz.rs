use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use econviz::config::Config;
use econviz::registry::{self, Region};
use econviz::viz::{ChartKind, ChartOptions, LegendMode};
use econviz::{Client, Dataset, Selection, YearRange};
use econviz::{dataset, stats, storage, table, viz};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "econviz",
    version,
    about = "Compare World Bank indicators across countries: fetch, chart, tabulate, export"
)]
struct Cli {
    /// Configuration file (TOML). Defaults to <config dir>/econviz/config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch one indicator for the selected countries (and optionally save, plot, summarize).
    Fetch(FetchArgs),
    /// List selectable countries, grouped by region.
    Countries,
    /// List selectable indicators.
    Indicators,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LegendArg {
    Bottom,
    Right,
    Top,
    Inside,
}

impl From<LegendArg> for LegendMode {
    fn from(l: LegendArg) -> Self {
        match l {
            LegendArg::Bottom => LegendMode::Bottom,
            LegendArg::Right => LegendMode::Right,
            LegendArg::Top => LegendMode::Top,
            LegendArg::Inside => LegendMode::Inside,
        }
    }
}

#[derive(Args, Debug)]
struct FetchArgs {
    /// Country display names separated by comma or semicolon (e.g. "South Africa,Nigeria")
    #[arg(short, long)]
    countries: Option<String>,
    /// Indicator label (e.g. "GDP growth (%)"); see `econviz indicators`
    #[arg(short, long)]
    indicator: Option<String>,
    /// First year (inclusive)
    #[arg(long)]
    from: Option<i32>,
    /// Last year (inclusive)
    #[arg(long)]
    to: Option<i32>,
    /// Save rows to file (format from --format or the extension).
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output format. If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
    /// Line chart per country (.svg or .png).
    #[arg(long)]
    plot: Option<PathBuf>,
    /// Bar chart of the latest available year (.svg or .png).
    #[arg(long)]
    bar: Option<PathBuf>,
    /// Log-scaled Y axis for the line chart.
    #[arg(long)]
    log_scale: bool,
    /// Point markers on the line chart (`--markers false` to turn off).
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    markers: Option<bool>,
    #[arg(long, value_enum)]
    legend: Option<LegendArg>,
    /// Locale for numbers (en, de, fr, es, it, pt, nl).
    #[arg(long)]
    locale: Option<String>,
    #[arg(long)]
    width: Option<u32>,
    #[arg(long)]
    height: Option<u32>,
    /// Print the data table (default when nothing else is requested).
    #[arg(long)]
    table: bool,
    /// Print per-country summary statistics.
    #[arg(long)]
    stats: bool,
}

fn fmt_num(x: f64) -> String {
    if !x.is_finite() {
        return "NA".to_string();
    }
    let s = format!("{x:.4}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn parse_list(s: &str) -> Vec<String> {
    s.split([',', ';'])
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = Config::resolve(cli.config.as_deref())?;
    match cli.cmd {
        Command::Fetch(args) => cmd_fetch(args, &config),
        Command::Countries => {
            cmd_countries();
            Ok(())
        }
        Command::Indicators => {
            for i in registry::indicators() {
                println!("{:<48} {}", i.label, i.code);
            }
            Ok(())
        }
    }
}

fn cmd_countries() {
    for region in Region::ALL {
        println!("{region}");
        for c in registry::countries_in(region) {
            println!("  {:<32} {}", c.name, c.code);
        }
    }
}

fn cmd_fetch(args: FetchArgs, config: &Config) -> Result<()> {
    let dash = &config.dashboard;
    let countries = match args.countries.as_deref() {
        Some(s) => parse_list(s),
        None => dash.countries.clone(),
    };
    let indicator = args.indicator.as_deref().unwrap_or(&dash.indicator);
    let range = YearRange::new(
        args.from.unwrap_or(dash.start_year),
        args.to.unwrap_or(dash.end_year),
    )?;
    let selection = Selection::new(countries.as_slice(), indicator, range)?;

    let client = Client::new(&config.api)?;
    let data = dataset::load(&client, &selection);

    for f in &data.failures {
        eprintln!("warning: {}: {}", f.country, f.reason);
    }
    for c in data.missing_countries() {
        eprintln!("note: no observations for {c}");
    }
    if data.is_empty() {
        println!("No data available for the selected options.");
        return Ok(());
    }

    let chart = &config.chart;
    let locale = args.locale.clone().unwrap_or_else(|| chart.locale.clone());

    if let Some(path) = args.out.as_ref() {
        save_rows(&data, path, args.format)?;
        eprintln!("Saved {} rows to {}", data.rows.len(), path.display());
    }

    let opts = ChartOptions {
        width: args.width.unwrap_or(chart.width),
        height: args.height.unwrap_or(chart.height),
        indicator_label: data.indicator_label.clone(),
        title: Some(data.title()),
        log_scale: args.log_scale || dash.log_scale,
        markers: args.markers.unwrap_or(chart.markers),
        legend: args.legend.map(LegendMode::from).unwrap_or(chart.legend),
        locale: locale.clone(),
    };
    if let Some(path) = args.plot.as_ref() {
        viz::plot_chart(&data.rows, path, ChartKind::Lines, &opts)?;
        eprintln!("Wrote line chart to {}", path.display());
    }
    if let Some(path) = args.bar.as_ref() {
        let bar_opts = ChartOptions {
            title: None,
            ..opts.clone()
        };
        viz::plot_chart(&data.rows, path, ChartKind::LatestBar, &bar_opts)?;
        eprintln!("Wrote bar chart to {}", path.display());
    }

    if args.stats {
        for s in stats::summarize(&data.rows) {
            println!(
                "{}  count={} years={}-{}  min={} max={} mean={} median={} latest={}",
                s.country,
                s.count,
                s.first_year,
                s.last_year,
                fmt_num(s.min),
                fmt_num(s.max),
                fmt_num(s.mean),
                fmt_num(s.median),
                fmt_num(s.latest)
            );
        }
    }

    let nothing_else =
        args.out.is_none() && args.plot.is_none() && args.bar.is_none() && !args.stats;
    if args.table || nothing_else {
        println!("{}", data.title());
        print!("{}", table::render(&data.rows, &locale));
    }
    Ok(())
}

fn save_rows(data: &Dataset, path: &Path, format: Option<OutFormat>) -> Result<()> {
    let fmt = match format {
        Some(OutFormat::Csv) => "csv".to_string(),
        Some(OutFormat::Json) => "json".to_string(),
        None => path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("csv")
            .to_ascii_lowercase(),
    };
    match fmt.as_str() {
        "csv" => storage::save_csv(&data.rows, path),
        "json" => storage::save_json(&data.rows, path),
        other => bail!("unsupported format: {other}"),
    }
}

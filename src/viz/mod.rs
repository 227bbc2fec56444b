//! Chart rendering: render aggregated rows to **SVG**, **PNG** or an RGB buffer.
//!
//! - One color per country (Microsoft Office palette), in first-seen order
//! - Locale-aware tick labels (`30,000` vs `30.000`)
//! - Y axis scaled to thousands/millions/… unless the unit is a percentage
//! - Optional log-scaled Y axis and point markers for line charts
//! - Legend placement: `Inside`, `Right`, `Top`, `Bottom`
//!
//! Input is validated before any backend is created, so a failed call never
//! leaves a half-written file behind.

pub mod legend;
pub mod text;
pub mod types;
pub mod util;

pub use types::{ChartKind, ChartOptions, DEFAULT_LEGEND_MODE, LegendMode};

use crate::models::{SeriesRow, group_by_country, latest_snapshot};
use anyhow::{Context, Result, anyhow, bail};
use log::{debug, warn};
use std::ops::Range;
use std::path::Path;
use std::sync::Once;

use plotters::coord::Shift;
use plotters::coord::ranged1d::ValueFormatter;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;

use legend::{band_height_px, draw_legend_panel};
use util::{compute_left_label_area_px, format_tick, map_locale, office_color, y_axis_scale};

const MARGIN: i32 = 16;
const Y_TICKS: usize = 10;
const MIN_SIZE: (u32, u32) = (200, 150);

/// `ab_glyph` does not discover OS fonts, so the bitmap path needs one registered.
static INIT_FONTS: Once = Once::new();

fn ensure_fonts_registered() {
    INIT_FONTS.call_once(|| {
        let _ = plotters::style::register_font(
            "sans-serif",
            plotters::style::FontStyle::Normal,
            include_bytes!("../../assets/DejaVuSans.ttf"),
        );
    });
}

enum Plan<'r> {
    Lines {
        series: Vec<(&'r str, Vec<(f64, f64)>)>,
        x: Range<f64>,
        y: Range<f64>,
    },
    Bars {
        bars: Vec<(&'r str, f64)>,
        y: Range<f64>,
    },
}

/// Everything derived from the rows before a backend exists. Values are
/// already divided by the axis scale.
struct Prepared<'r> {
    plan: Plan<'r>,
    title: String,
    y_title: String,
}

/// Render `rows` to `out_path`. `.svg` selects the SVG backend, anything
/// else is written as PNG.
pub fn plot_chart<P: AsRef<Path>>(
    rows: &[SeriesRow],
    out_path: P,
    kind: ChartKind,
    opts: &ChartOptions,
) -> Result<()> {
    let out_path = out_path.as_ref();
    let prep = prepare(rows, kind, opts)?;
    let size = (opts.width, opts.height);

    let is_svg = out_path
        .extension()
        .and_then(|s| s.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"));
    let drawn = if is_svg {
        draw(SVGBackend::new(out_path, size).into_drawing_area(), &prep, opts)
    } else {
        draw(BitMapBackend::new(out_path, size).into_drawing_area(), &prep, opts)
    };
    drawn.with_context(|| format!("render {}", out_path.display()))
}

/// Render into a `width * height * 3` RGB buffer (for on-screen previews).
pub fn render_rgb(rows: &[SeriesRow], kind: ChartKind, opts: &ChartOptions) -> Result<Vec<u8>> {
    let prep = prepare(rows, kind, opts)?;
    let mut buf = vec![0u8; opts.width as usize * opts.height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buf, (opts.width, opts.height))
            .into_drawing_area();
        draw(root, &prep, opts)?;
    }
    Ok(buf)
}

fn prepare<'r>(rows: &'r [SeriesRow], kind: ChartKind, opts: &ChartOptions) -> Result<Prepared<'r>> {
    if rows.is_empty() {
        bail!("no data to plot");
    }
    if opts.width < MIN_SIZE.0 || opts.height < MIN_SIZE.1 {
        bail!(
            "chart size {}x{} is below the {}x{} minimum",
            opts.width,
            opts.height,
            MIN_SIZE.0,
            MIN_SIZE.1
        );
    }
    let label = opts.indicator_label.trim();
    let custom_title = opts
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string);

    match kind {
        ChartKind::Lines => prepare_lines(rows, label, custom_title, opts.log_scale),
        ChartKind::LatestBar => {
            if opts.log_scale {
                debug!("log scale does not apply to the bar chart");
            }
            prepare_bars(rows, label, custom_title)
        }
    }
}

fn prepare_lines<'r>(
    rows: &'r [SeriesRow],
    label: &str,
    custom_title: Option<String>,
    log_scale: bool,
) -> Result<Prepared<'r>> {
    let mut groups = group_by_country(rows);
    if log_scale {
        let before: usize = groups.iter().map(|(_, p)| p.len()).sum();
        for (_, pts) in &mut groups {
            pts.retain(|(_, v)| *v > 0.0);
        }
        groups.retain(|(_, p)| !p.is_empty());
        let kept: usize = groups.iter().map(|(_, p)| p.len()).sum();
        if kept < before {
            warn!("log scale: skipped {} non-positive value(s)", before - kept);
        }
        if groups.is_empty() {
            bail!("no positive values to plot on a log scale");
        }
    } else if groups.is_empty() {
        bail!("no numeric values to plot");
    }

    let points = || groups.iter().flat_map(|(_, p)| p.iter().copied());
    let (mut x0, mut x1) = points().fold((i32::MAX, i32::MIN), |(lo, hi), (y, _)| {
        (lo.min(y), hi.max(y))
    });
    if x0 == x1 {
        x0 -= 1;
        x1 += 1;
    }
    let (lo, hi) = points().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, v)| {
        (lo.min(v), hi.max(v))
    });
    let (scale, y_title) = y_axis_scale(label, lo.abs().max(hi.abs()));
    let (lo, hi) = (lo / scale, hi / scale);
    let y = if log_scale {
        (lo / 1.25)..(hi * 1.25)
    } else {
        padded(lo, hi)
    };

    let series = groups
        .into_iter()
        .map(|(name, pts)| {
            let pts = pts.into_iter().map(|(yr, v)| (yr as f64, v / scale)).collect();
            (name, pts)
        })
        .collect();

    let title = custom_title.unwrap_or_else(|| {
        if label.is_empty() {
            "Indicator values".to_string()
        } else {
            label.to_string()
        }
    });

    Ok(Prepared {
        plan: Plan::Lines {
            series,
            x: x0 as f64..x1 as f64,
            y,
        },
        title,
        y_title,
    })
}

fn prepare_bars<'r>(
    rows: &'r [SeriesRow],
    label: &str,
    custom_title: Option<String>,
) -> Result<Prepared<'r>> {
    let (latest, snap) =
        latest_snapshot(rows).ok_or_else(|| anyhow!("no numeric values to plot"))?;
    let mut bars: Vec<(&str, f64)> = snap
        .into_iter()
        .map(|r| (r.country_name.as_str(), r.value))
        .collect();

    let max_abs = bars.iter().fold(0.0f64, |m, (_, v)| m.max(v.abs()));
    let (scale, y_title) = y_axis_scale(label, max_abs);
    for (_, v) in &mut bars {
        *v /= scale;
    }

    // bars grow from zero, so zero stays inside the range
    let lo = bars.iter().fold(0.0f64, |m, (_, v)| m.min(*v));
    let hi = bars.iter().fold(0.0f64, |m, (_, v)| m.max(*v));
    let y = if hi - lo < f64::EPSILON {
        -1.0..1.0
    } else {
        let pad = (hi - lo) * 0.08;
        let lo = if lo < 0.0 { lo - pad } else { 0.0 };
        let hi = if hi > 0.0 { hi + pad } else { 0.0 };
        lo..hi
    };

    let title = custom_title.unwrap_or_else(|| {
        if label.is_empty() {
            format!("Latest values ({latest})")
        } else {
            format!("{label} ({latest})")
        }
    });

    Ok(Prepared {
        plan: Plan::Bars { bars, y },
        title,
        y_title,
    })
}

fn padded(lo: f64, hi: f64) -> Range<f64> {
    if (hi - lo).abs() < f64::EPSILON {
        return (lo - 1.0)..(hi + 1.0);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad)..(hi + pad)
}

fn draw<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    prep: &Prepared<'_>,
    opts: &ChartOptions,
) -> Result<()> {
    ensure_fonts_registered();
    root.fill(&WHITE).map_err(|e| anyhow!("{e:?}"))?;
    match &prep.plan {
        Plan::Lines { series, x, y } => draw_lines(&root, series, x, y, prep, opts)?,
        Plan::Bars { bars, y } => draw_bars(&root, bars, y, prep, opts)?,
    }
    root.present().map_err(|e| anyhow!("{e:?}"))?;
    Ok(())
}

fn draw_lines<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    series: &[(&str, Vec<(f64, f64)>)],
    x: &Range<f64>,
    y: &Range<f64>,
    prep: &Prepared<'_>,
    opts: &ChartOptions,
) -> Result<()> {
    let (locale, dec_sep) = map_locale(&opts.locale);
    let tick = |v: f64| format_tick(v, locale, dec_sep);
    let left_px = compute_left_label_area_px(y.start, y.end, Y_TICKS, 12, &tick);
    let axis_x_start = MARGIN + left_px as i32;

    let items: Vec<(String, RGBAColor)> = series
        .iter()
        .enumerate()
        .map(|(i, (name, _))| (name.to_string(), office_color(i)))
        .collect();
    let labels: Vec<&str> = series.iter().map(|(n, _)| *n).collect();

    let (w, h) = root.dim_in_pixel();
    let (plot_area, legend_area) = match opts.legend {
        LegendMode::Right => {
            let (plot, legend) = root.split_horizontally(80.percent_width());
            (plot, Some(legend))
        }
        LegendMode::Top => {
            let band = band_height_px(&labels, axis_x_start, w as i32).max(40);
            let (legend, plot) = root.split_vertically(band);
            (plot, Some(legend))
        }
        LegendMode::Bottom => {
            let band = band_height_px(&labels, axis_x_start, w as i32).max(40);
            let (plot, legend) = root.split_vertically((h as i32 - band).max(40));
            (plot, Some(legend))
        }
        LegendMode::Inside => (root.clone(), None),
    };

    let mut builder = ChartBuilder::on(&plot_area);
    builder
        .margin(MARGIN as u32)
        .caption(&prep.title, (FontFamily::SansSerif, 22))
        .set_label_area_size(LabelAreaPosition::Left, left_px)
        .set_label_area_size(LabelAreaPosition::Bottom, 48);

    let x_labels = ((x.end - x.start) as usize + 1).min(12);
    if opts.log_scale {
        let mut chart = builder
            .build_cartesian_2d(x.clone(), y.clone().log_scale())
            .map_err(|e| anyhow!("{e:?}"))?;
        draw_series_lines(&mut chart, series, x_labels, &prep.y_title, &tick, opts)?;
    } else {
        let mut chart = builder
            .build_cartesian_2d(x.clone(), y.clone())
            .map_err(|e| anyhow!("{e:?}"))?;
        draw_series_lines(&mut chart, series, x_labels, &prep.y_title, &tick, opts)?;
    }

    if let Some(area) = legend_area {
        draw_legend_panel(&area, &items, opts.legend, axis_x_start)?;
    }
    Ok(())
}

/// Mesh, one line per country, optional markers and inside legend. Generic
/// over the Y coordinate so linear and log axes share it.
fn draw_series_lines<'a, DB, Y>(
    chart: &mut ChartContext<'a, DB, Cartesian2d<RangedCoordf64, Y>>,
    series: &[(&str, Vec<(f64, f64)>)],
    x_labels: usize,
    y_title: &str,
    tick: &dyn Fn(f64) -> String,
    opts: &ChartOptions,
) -> Result<()>
where
    DB: DrawingBackend + 'a,
    Y: Ranged<ValueType = f64> + ValueFormatter<f64>,
{
    let x_fmt = |x: &f64| (x.round() as i32).to_string();
    let y_fmt = |v: &f64| tick(*v);
    chart
        .configure_mesh()
        .x_desc("Year")
        .y_desc(y_title)
        .x_labels(x_labels)
        .y_labels(Y_TICKS)
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt)
        .label_style((FontFamily::SansSerif, 12))
        .axis_desc_style((FontFamily::SansSerif, 14))
        .draw()
        .map_err(|e| anyhow!("{e:?}"))?;

    let inside = opts.legend == LegendMode::Inside;
    for (idx, (name, pts)) in series.iter().enumerate() {
        let color = office_color(idx);
        let anno = chart
            .draw_series(LineSeries::new(pts.iter().copied(), color.stroke_width(2)))
            .map_err(|e| anyhow!("{e:?}"))?;
        if inside {
            anno.label(*name).legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 18, y)], color.stroke_width(3))
            });
        }
        if opts.markers {
            chart
                .draw_series(pts.iter().map(|&(x, y)| Circle::new((x, y), 3, color.filled())))
                .map_err(|e| anyhow!("{e:?}"))?;
        }
    }

    if inside {
        chart
            .configure_series_labels()
            .border_style(BLACK)
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.85))
            .label_font((FontFamily::SansSerif, 13))
            .draw()
            .map_err(|e| anyhow!("{e:?}"))?;
    }
    Ok(())
}

fn draw_bars<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    bars: &[(&str, f64)],
    y: &Range<f64>,
    prep: &Prepared<'_>,
    opts: &ChartOptions,
) -> Result<()> {
    let (locale, dec_sep) = map_locale(&opts.locale);
    let tick = |v: f64| format_tick(v, locale, dec_sep);
    let left_px = compute_left_label_area_px(y.start, y.end, Y_TICKS, 12, &tick);

    let n = bars.len() as i32;
    let (w, _) = root.dim_in_pixel();
    let slot_px = ((w as i32 - left_px as i32 - 2 * MARGIN) / n.max(1)).max(24) as u32;

    let mut chart = ChartBuilder::on(root)
        .margin(MARGIN as u32)
        .caption(&prep.title, (FontFamily::SansSerif, 22))
        .set_label_area_size(LabelAreaPosition::Left, left_px)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d((0..n).into_segmented(), y.clone())
        .map_err(|e| anyhow!("{e:?}"))?;

    let x_fmt = |v: &SegmentValue<i32>| match v {
        SegmentValue::CenterOf(i) => bars
            .get(*i as usize)
            .map(|(name, _)| text::truncate_to_width(name, 12, slot_px))
            .unwrap_or_default(),
        _ => String::new(),
    };
    let y_fmt = |v: &f64| tick(*v);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(bars.len())
        .y_labels(Y_TICKS)
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt)
        .y_desc(prep.y_title.as_str())
        .label_style((FontFamily::SansSerif, 12))
        .axis_desc_style((FontFamily::SansSerif, 14))
        .draw()
        .map_err(|e| anyhow!("{e:?}"))?;

    chart
        .draw_series(bars.iter().enumerate().map(|(i, (_, v))| {
            let i = i as i32;
            let mut bar = Rectangle::new(
                [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), *v)],
                office_color(i as usize).filled(),
            );
            bar.set_margin(0, 0, 6, 6);
            bar
        }))
        .map_err(|e| anyhow!("{e:?}"))?;

    let value_style =
        TextStyle::from((FontFamily::SansSerif, 12)).pos(Pos::new(HPos::Center, VPos::Bottom));
    chart
        .draw_series(bars.iter().enumerate().map(|(i, (_, v))| {
            Text::new(
                tick(*v),
                (SegmentValue::CenterOf(i as i32), *v),
                value_style.clone(),
            )
        }))
        .map_err(|e| anyhow!("{e:?}"))?;
    Ok(())
}

use econviz::SeriesRow;
use econviz::viz::{self, ChartKind, ChartOptions, LegendMode};
use std::fs;

fn rows() -> Vec<SeriesRow> {
    let mut out = Vec::new();
    for (i, country) in ["South Africa", "Nigeria", "Egypt", "Central African Republic"]
        .into_iter()
        .enumerate()
    {
        for year in 2001..=2022 {
            let v = 1.0e11 * (i as f64 + 1.0) + (year - 2000) as f64 * 7.5e9;
            out.push(SeriesRow::new(country, year, v));
        }
    }
    out
}

fn opts() -> ChartOptions {
    ChartOptions {
        indicator_label: "GDP (current US$)".into(),
        ..ChartOptions::default()
    }
}

#[test]
fn line_chart_in_every_legend_mode() {
    let dir = tempfile::tempdir().unwrap();
    let data = rows();
    for legend in [
        LegendMode::Bottom,
        LegendMode::Top,
        LegendMode::Right,
        LegendMode::Inside,
    ] {
        let out = dir.path().join(format!("lines_{legend:?}.svg"));
        let o = ChartOptions { legend, ..opts() };
        viz::plot_chart(&data, &out, ChartKind::Lines, &o).unwrap();
        let svg = fs::read_to_string(&out).unwrap();
        assert!(svg.contains("<svg"), "{legend:?}");
        assert!(svg.contains("Egypt"), "{legend:?} legend lost a country");
        assert!(svg.contains("current US$ (billions)"));
    }
}

#[test]
fn log_scale_and_markers() {
    let dir = tempfile::tempdir().unwrap();
    let mut data = rows();
    data.push(SeriesRow::new("Egypt", 2023, -5.0));
    let out = dir.path().join("log.svg");
    let o = ChartOptions {
        log_scale: true,
        markers: true,
        ..opts()
    };
    viz::plot_chart(&data, &out, ChartKind::Lines, &o).unwrap();
    assert!(fs::metadata(&out).unwrap().len() > 0);
}

#[test]
fn bar_chart_png() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("latest.png");
    let o = ChartOptions {
        locale: "de".into(),
        ..opts()
    };
    viz::plot_chart(&rows(), &out, ChartKind::LatestBar, &o).unwrap();
    let bytes = fs::read(&out).unwrap();
    assert_eq!(&bytes[1..4], b"PNG");
}

#[test]
fn rgb_buffer_has_one_pixel_per_slot() {
    let o = ChartOptions {
        width: 640,
        height: 360,
        ..opts()
    };
    let buf = viz::render_rgb(&rows(), ChartKind::Lines, &o).unwrap();
    assert_eq!(buf.len(), 640 * 360 * 3);
    // background is white, something was drawn on top
    assert!(buf.iter().any(|b| *b != 255));
}

#[test]
fn failures_leave_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("empty.svg");
    assert!(viz::plot_chart(&[], &out, ChartKind::Lines, &opts()).is_err());

    let negative = vec![SeriesRow::new("Peru", 2020, -11.0)];
    let o = ChartOptions {
        log_scale: true,
        ..opts()
    };
    assert!(viz::plot_chart(&negative, &out, ChartKind::Lines, &o).is_err());
    assert!(!out.exists());
}

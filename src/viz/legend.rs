//! External legend panels (right column, top/bottom band).
//!
//! The band is laid out as a table: every column has the width of the widest
//! label it holds, so entries line up across rows. [`band_height_px`] runs the
//! same layout without drawing, so the caller can reserve space first.

use anyhow::{Result, anyhow};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::text::{estimate_text_width_px, wrap_text_to_width};
use super::types::LegendMode;

const FONT_PX: u32 = 14;
const LINE_H: i32 = FONT_PX as i32 + 2;
const ROW_GAP: i32 = 4;
const PAD: i32 = 8;
/// Short line sample drawn before each label.
const SWATCH_W: i32 = 18;
const SWATCH_GAP: i32 = 6;
const TRAILING_GAP: i32 = 14;
/// No single label may take more than this share of the band.
const MAX_CELL_SHARE: f32 = 0.40;

struct BandLayout {
    /// Left edge of every column.
    col_x: Vec<i32>,
    /// Per row: wrapped label lines per cell, and the row height.
    rows: Vec<(Vec<Vec<String>>, i32)>,
}

fn cell_overhead() -> i32 {
    SWATCH_W + SWATCH_GAP + TRAILING_GAP
}

/// Text width plus a few pixels of slack so estimates never force a wrap.
fn text_w(label: &str) -> i32 {
    estimate_text_width_px(label, FONT_PX) as i32 + 4
}

fn band_layout(labels: &[&str], start_x: i32, total_w: i32) -> BandLayout {
    let avail = (total_w - start_x - PAD).max(60);
    let cap = ((avail as f32 * MAX_CELL_SHARE) as i32).max(120).min(avail);

    let cell_w: Vec<i32> = labels
        .iter()
        .map(|l| (text_w(l) + cell_overhead()).min(cap))
        .collect();

    // Largest column count whose per-column maxima still fit.
    let n = labels.len().max(1);
    let mut cols = n;
    while cols > 1 {
        let fits = (0..cols)
            .map(|c| cell_w.iter().skip(c).step_by(cols).copied().max().unwrap_or(0))
            .sum::<i32>()
            <= avail;
        if fits {
            break;
        }
        cols -= 1;
    }

    let col_w: Vec<i32> = (0..cols)
        .map(|c| cell_w.iter().skip(c).step_by(cols).copied().max().unwrap_or(60))
        .collect();
    let mut col_x = Vec::with_capacity(cols);
    let mut x = start_x;
    for w in &col_w {
        col_x.push(x);
        x += w;
    }

    let rows = labels
        .chunks(cols)
        .map(|chunk| {
            let cells: Vec<Vec<String>> = chunk
                .iter()
                .enumerate()
                .map(|(c, l)| {
                    let text_cap = (col_w[c] - cell_overhead()).max(40) as u32;
                    wrap_text_to_width(l, FONT_PX, text_cap)
                })
                .collect();
            let h = cells.iter().map(|c| c.len().max(1) as i32).max().unwrap_or(1) * LINE_H;
            (cells, h)
        })
        .collect();

    BandLayout { col_x, rows }
}

/// Height in pixels a top/bottom band needs for `labels`.
pub fn band_height_px(labels: &[&str], start_x: i32, total_w: i32) -> i32 {
    let layout = band_layout(labels, start_x, total_w);
    let rows: i32 = layout.rows.iter().map(|(_, h)| *h).sum();
    let gaps = ROW_GAP * (layout.rows.len() as i32 - 1).max(0);
    PAD * 2 + rows + gaps
}

fn draw_entry<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    x: i32,
    top: i32,
    lines: &[String],
    color: RGBAColor,
) -> Result<()> {
    let block_h = lines.len().max(1) as i32 * LINE_H;
    let mid = top + block_h / 2;
    area.draw(&PathElement::new(
        vec![(x, mid), (x + SWATCH_W, mid)],
        color.stroke_width(3),
    ))
    .map_err(|e| anyhow!("{e:?}"))?;

    let style = TextStyle::from((FontFamily::SansSerif, FONT_PX))
        .pos(Pos::new(HPos::Left, VPos::Center));
    let text_x = x + SWATCH_W + SWATCH_GAP;
    for (i, line) in lines.iter().enumerate() {
        let y = top + i as i32 * LINE_H + LINE_H / 2;
        area.draw(&Text::new(line.as_str(), (text_x, y), style.clone()))
            .map_err(|e| anyhow!("{e:?}"))?;
    }
    Ok(())
}

/// Draw `items` into a separate legend area. `axis_x_start_px` aligns the
/// first band column with the plot's Y axis. `Inside` draws nothing.
pub fn draw_legend_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    items: &[(String, RGBAColor)],
    placement: LegendMode,
    axis_x_start_px: i32,
) -> Result<()> {
    area.fill(&WHITE).map_err(|e| anyhow!("{e:?}"))?;
    let (w, _) = area.dim_in_pixel();
    let w = w as i32;

    match placement {
        LegendMode::Right => {
            let text_cap = (w - cell_overhead() - PAD).max(40) as u32;
            let mut y = PAD * 2;
            for (label, color) in items {
                let lines = wrap_text_to_width(label, FONT_PX, text_cap);
                draw_entry(area, PAD, y, &lines, *color)?;
                y += lines.len().max(1) as i32 * LINE_H + ROW_GAP;
            }
        }
        LegendMode::Top | LegendMode::Bottom => {
            let labels: Vec<&str> = items.iter().map(|(l, _)| l.as_str()).collect();
            let layout = band_layout(&labels, axis_x_start_px, w);
            let mut y = PAD;
            let mut item = items.iter();
            for (cells, h) in &layout.rows {
                for (c, lines) in cells.iter().enumerate() {
                    let Some((_, color)) = item.next() else {
                        break;
                    };
                    let block_h = lines.len().max(1) as i32 * LINE_H;
                    draw_entry(area, layout.col_x[c], y + (h - block_h) / 2, lines, *color)?;
                }
                y += h + ROW_GAP;
            }
        }
        LegendMode::Inside => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_labels_share_one_row() {
        let one = band_height_px(&["Kenya", "Ghana", "Peru"], 80, 1000);
        assert_eq!(one, PAD * 2 + LINE_H);
    }

    #[test]
    fn many_labels_need_more_rows() {
        let labels = ["Central African Republic"; 12];
        let narrow = band_height_px(&labels, 80, 500);
        let wide = band_height_px(&labels, 80, 2000);
        assert!(narrow > wide);
    }
}

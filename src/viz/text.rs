//! Text measurement and wrapping for legend layout.
//!
//! Plotters cannot measure text before drawing, so widths are estimated from
//! character count.

/// Estimated pixel width of `text` at `font_px`.
pub fn estimate_text_width_px(text: &str, font_px: u32) -> u32 {
    ((text.chars().count() as f32) * (font_px as f32) * 0.60).ceil() as u32
}

/// How many characters fit into `max_px`, at least one.
fn chars_that_fit(font_px: u32, max_px: u32) -> usize {
    let per_char = (font_px as f32 * 0.60).max(1.0);
    ((max_px as f32 / per_char).floor() as usize).max(1)
}

/// Cut `text` to fit `max_px`, ending with an ellipsis when shortened.
pub fn truncate_to_width(text: &str, font_px: u32, max_px: u32) -> String {
    let fit = chars_that_fit(font_px, max_px);
    if text.chars().count() <= fit {
        return text.to_string();
    }
    let mut out: String = text.chars().take(fit.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Greedy word wrap. Words longer than a whole line are truncated.
pub fn wrap_text_to_width(text: &str, font_px: u32, max_px: u32) -> Vec<String> {
    let fit = chars_that_fit(font_px, max_px);
    let mut lines: Vec<String> = Vec::new();
    let mut cur = String::new();

    for word in text.split_whitespace() {
        let word = if word.chars().count() > fit {
            truncate_to_width(word, font_px, max_px)
        } else {
            word.to_string()
        };
        if cur.is_empty() {
            cur = word;
        } else if cur.chars().count() + 1 + word.chars().count() <= fit {
            cur.push(' ');
            cur.push_str(&word);
        } else {
            lines.push(std::mem::replace(&mut cur, word));
        }
    }
    if !cur.is_empty() {
        lines.push(cur);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_on_words() {
        // 14px font: ~8.4px per char, 100px fits 11 chars
        let lines = wrap_text_to_width("Central African Republic", 14, 100);
        assert_eq!(lines, vec!["Central", "African", "Republic"]);
        assert_eq!(wrap_text_to_width("Chad", 14, 100), vec!["Chad"]);
    }

    #[test]
    fn long_words_are_cut() {
        let t = truncate_to_width("Mauritania", 14, 50);
        assert_eq!(t.chars().count(), 5);
        assert!(t.ends_with('…'));
        assert_eq!(truncate_to_width("Mali", 14, 50), "Mali");
    }
}

// Plain-text line charts for the terminal dashboard
use chrono::NaiveDate;

/// One run of points drawn with the same glyph.
#[derive(Debug, Clone)]
pub struct Segment {
    pub glyph: char,
    pub points: Vec<(NaiveDate, f64)>,
}

impl Segment {
    pub fn new(glyph: char, points: Vec<(NaiveDate, f64)>) -> Self {
        Self { glyph, points }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ChartStyle {
    pub width: usize,
    pub height: usize,
}

/// Draws the segments left to right in the order given. X is the point
/// position, Y is scaled between the overall min and max.
pub fn render_chart(segments: &[Segment], style: ChartStyle) -> String {
    let points: Vec<(char, NaiveDate, f64)> = segments
        .iter()
        .flat_map(|s| s.points.iter().map(move |&(d, v)| (s.glyph, d, v)))
        .collect();

    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return String::new();
    };

    let width = style.width.max(2);
    let height = style.height.max(2);

    let (min, max) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| (lo.min(p.2), hi.max(p.2)));

    let mut grid = vec![vec![' '; width]; height];
    let n = points.len();
    for (i, &(glyph, _, value)) in points.iter().enumerate() {
        let col = if n == 1 { 0 } else { i * (width - 1) / (n - 1) };
        let row = if max > min {
            (((max - value) / (max - min)) * (height - 1) as f64).round() as usize
        } else {
            height / 2
        };
        grid[row.min(height - 1)][col] = glyph;
    }

    let top = format!("{:.2}", max);
    let bottom = format!("{:.2}", min);
    let label_width = top.len().max(bottom.len());

    let mut out = String::new();
    for (r, row) in grid.iter().enumerate() {
        let label = match r {
            0 => top.as_str(),
            r if r == height - 1 => bottom.as_str(),
            _ => "",
        };
        let tick = if label.is_empty() { '|' } else { '+' };
        let line: String = row.iter().collect();
        out.push_str(&format!("{:>w$} {}{}\n", label, tick, line.trim_end(), w = label_width));
    }
    out.push_str(&format!("{:>w$} +{}\n", "", "-".repeat(width), w = label_width));

    let start = first.1.to_string();
    let end = last.1.to_string();
    let gap = width.saturating_sub(start.len() + end.len()).max(1);
    out.push_str(&format!("{:>w$}  {}{}{}\n", "", start, " ".repeat(gap), end, w = label_width));
    out
}

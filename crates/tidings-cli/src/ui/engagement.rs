//! Engagement breakdown pane.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};
use tidings_core::analytics::EngagementBreakdown;

const COLORS: [Color; 3] = [Color::Red, Color::Green, Color::Blue];
const BAR_WIDTH: usize = 20;

pub fn draw(f: &mut Frame, area: Rect, engagement: &EngagementBreakdown) {
  let block = Block::default()
    .title(" Engagement Breakdown ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let mut lines: Vec<Line> = EngagementBreakdown::LABELS
    .iter()
    .zip(engagement.values())
    .zip(engagement.percentages())
    .zip(COLORS)
    .map(|(((label, value), pct), color)| {
      // Negative shares draw as an empty bar.
      let filled = ((pct.max(0.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
      Line::from(vec![
        Span::styled(format!("{label:<21}"), Style::default().fg(color)),
        Span::styled("█".repeat(filled.min(BAR_WIDTH)), Style::default().fg(color)),
        Span::raw(" ".repeat(BAR_WIDTH - filled.min(BAR_WIDTH))),
        Span::raw(format!(" {value:>5}  {pct:>5.1}%")),
      ])
    })
    .collect();

  if !engagement.is_consistent() {
    lines.push(Line::from(Span::styled(
      "some clicks were never marked delivered",
      Style::default().fg(Color::Yellow),
    )));
  }

  f.render_widget(Paragraph::new(lines).block(block), area);
}

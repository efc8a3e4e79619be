//! Summary cards: total, delivered and clicked counts with rates.

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};
use tidings_core::analytics::Summary;

pub fn draw(f: &mut Frame, area: Rect, summary: &Summary) {
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Ratio(1, 3); 3])
    .split(area);

  card(f, cols[0], "Total Notifications", summary.total, None, Color::White);
  card(
    f,
    cols[1],
    "Delivered",
    summary.delivered,
    Some(summary.delivery_rate()),
    Color::Green,
  );
  card(
    f,
    cols[2],
    "Clicked",
    summary.clicked,
    Some(summary.click_rate()),
    Color::Blue,
  );
}

fn card(f: &mut Frame, area: Rect, title: &str, value: u64, rate: Option<f64>, color: Color) {
  let block = Block::default()
    .title(format!(" {title} "))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let mut spans = vec![Span::styled(
    value.to_string(),
    Style::default().fg(color).add_modifier(Modifier::BOLD),
  )];
  if let Some(rate) = rate {
    spans.push(Span::styled(
      format!("  {:.1}%", rate * 100.0),
      Style::default().fg(Color::DarkGray),
    ));
  }

  f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

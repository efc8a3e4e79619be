//! Per-day views: grouped bar chart and counts table.

use ratatui::{
  Frame,
  layout::{Constraint, Rect},
  style::{Color, Modifier, Style},
  text::Line,
  widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table},
};
use tidings_core::analytics::DailyBucket;

const SERIES: [(&str, Color); 3] = [
  ("Total", Color::Gray),
  ("Delivered", Color::Green),
  ("Clicked", Color::Blue),
];

fn pane(title: &str) -> Block<'_> {
  Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray))
}

/// Three bars per day, in bucket order.
pub fn draw_chart(f: &mut Frame, area: Rect, buckets: &[DailyBucket]) {
  let block = pane(" Daily Notifications ");
  if buckets.is_empty() {
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
      Paragraph::new("No notifications in range.").style(Style::default().fg(Color::DarkGray)),
      inner,
    );
    return;
  }

  let bars: Vec<Vec<Bar>> = buckets
    .iter()
    .map(|b| {
      [b.total, b.delivered, b.clicked]
        .into_iter()
        .zip(SERIES)
        .map(|(value, (_, color))| {
          Bar::default()
            .value(value)
            .style(Style::default().fg(color))
            .value_style(Style::default().fg(Color::Black).bg(color))
        })
        .collect()
    })
    .collect();

  let mut chart = BarChart::default()
    .block(block)
    .bar_width(3)
    .bar_gap(0)
    .group_gap(2);
  for (bucket, bars) in buckets.iter().zip(&bars) {
    chart = chart.data(
      BarGroup::default()
        .label(Line::from(bucket.date.as_str()))
        .bars(bars),
    );
  }

  f.render_widget(chart, area);
}

pub fn draw_table(f: &mut Frame, area: Rect, buckets: &[DailyBucket]) {
  let header = Row::new(
    std::iter::once(Cell::from("Date"))
      .chain(SERIES.iter().map(|(name, color)| {
        Cell::from(*name).style(Style::default().fg(*color))
      })),
  )
  .style(Style::default().add_modifier(Modifier::BOLD));

  let rows = buckets.iter().map(|b| {
    Row::new([
      b.date.clone(),
      b.total.to_string(),
      b.delivered.to_string(),
      b.clicked.to_string(),
    ])
  });

  let table = Table::new(rows, [
    Constraint::Length(8),
    Constraint::Length(7),
    Constraint::Length(10),
    Constraint::Length(8),
  ])
  .header(header)
  .block(pane(" By Day "));

  f.render_widget(table, area);
}

//! History screen: finished trips, most recent first.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Padding, Paragraph, Row, Table};

use crate::model::TripRecord;

/// Tabular view over every recorded trip.
pub struct HistoryScreen {
    records: Vec<TripRecord>,
    scroll: usize,
}

impl HistoryScreen {
    pub fn new(records: Vec<TripRecord>) -> Self {
        Self {
            records,
            scroll: 0,
        }
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        if self.scroll + 1 < self.records.len() {
            self.scroll += 1;
        }
    }

    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::vertical([
            Constraint::Length(3), // title
            Constraint::Length(1), // separator
            Constraint::Min(0),    // table
            Constraint::Length(1), // help
        ])
        .split(area);

        let muted = Style::default().fg(Color::DarkGray);
        let normal = Style::default().fg(Color::Gray);
        let highlight = Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);

        // Title.
        let title = Paragraph::new(Line::from(vec![Span::styled("Trip History", highlight)]))
            .block(Block::default().padding(Padding::new(2, 0, 1, 0)));
        frame.render_widget(title, chunks[0]);

        // Thin separator.
        let sep = Paragraph::new(Line::from(vec![Span::styled(
            "─".repeat(area.width.saturating_sub(4) as usize),
            muted,
        )]))
        .block(Block::default().padding(Padding::new(2, 2, 0, 0)));
        frame.render_widget(sep, chunks[1]);

        if self.records.is_empty() {
            let empty = Paragraph::new(Line::from(Span::styled("No trips recorded yet.", muted)))
                .block(Block::default().padding(Padding::new(2, 2, 1, 0)));
            frame.render_widget(empty, chunks[2]);
        } else {
            let header =
                Row::new(["Date & Time", "Stopped (s)", "Moving (s)", "Fare (€)"]).style(highlight);

            let rows = self.records.iter().skip(self.scroll).map(|record| {
                Row::new([
                    record.finished_at.strftime("%Y-%m-%d %H:%M:%S").to_string(),
                    format!("{:.1}", record.stopped_secs),
                    format!("{:.1}", record.moving_secs),
                    format!("{:.2}", record.total_fare),
                ])
                .style(normal)
            });

            let table = Table::new(
                rows,
                [
                    Constraint::Length(19),
                    Constraint::Length(11),
                    Constraint::Length(11),
                    Constraint::Length(9),
                ],
            )
            .header(header)
            .block(Block::default().padding(Padding::new(2, 2, 1, 0)));
            frame.render_widget(table, chunks[2]);
        }

        // Help line.
        let help = Paragraph::new(Line::from(Span::styled(
            " ↑↓ scroll  esc back  q quit",
            muted,
        )));
        frame.render_widget(help, chunks[3]);
    }
}

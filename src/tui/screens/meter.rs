//! Meter screen: live trip status, totals, and fare.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Padding, Paragraph};

use crate::meter::Reading;
use crate::model::Phase;

/// The main screen: phase, live totals, last ticket, notices.
#[derive(Default)]
pub struct MeterScreen {
    notice: Option<String>,
    ticket: Option<String>,
}

impl MeterScreen {
    pub fn new() -> Self {
        Self::default()
    }

    /// A new trip began: the previous ticket and any notice are stale.
    pub fn trip_started(&mut self) {
        self.notice = None;
        self.ticket = None;
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    pub fn show_error(&mut self, message: String) {
        self.notice = Some(message);
    }

    /// Shows the finished trip's ticket until the next trip starts.
    pub fn show_ticket(&mut self, ticket: String) {
        self.notice = None;
        self.ticket = Some(ticket);
    }

    pub fn render(&self, frame: &mut Frame, reading: &Reading) {
        let area = frame.area();

        let chunks = Layout::vertical([
            Constraint::Length(3), // title
            Constraint::Length(1), // separator
            Constraint::Length(5), // status + totals + fare
            Constraint::Min(0),    // ticket
            Constraint::Length(1), // notice
            Constraint::Length(1), // help
        ])
        .split(area);

        let muted = Style::default().fg(Color::DarkGray);
        let normal = Style::default().fg(Color::Gray);
        let highlight = Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);

        // Title.
        let title = Paragraph::new(Line::from(vec![Span::styled("Farebox", highlight)]))
            .block(Block::default().padding(Padding::new(2, 0, 1, 0)));
        frame.render_widget(title, chunks[0]);

        // Thin separator.
        let sep = Paragraph::new(Line::from(vec![Span::styled(
            "─".repeat(area.width.saturating_sub(4) as usize),
            muted,
        )]))
        .block(Block::default().padding(Padding::new(2, 2, 0, 0)));
        frame.render_widget(sep, chunks[1]);

        // Status and live totals. Color carries the phase: red for
        // stopped, green for moving.
        let (status, status_style) = match reading.phase {
            Some(phase) => {
                let color = match phase {
                    Phase::Stopped => Color::Red,
                    Phase::Moving => Color::Green,
                };
                let style = Style::default().fg(color).add_modifier(Modifier::BOLD);
                (phase.label(), style)
            }
            None => ("idle (press s to start)", muted),
        };

        let lines = vec![
            Line::from(vec![
                Span::styled("Status: ", normal),
                Span::styled(status, status_style),
            ]),
            Line::default(),
            Line::from(Span::styled(
                format!("Stopped time: {:.1} s", reading.stopped_secs),
                normal,
            )),
            Line::from(Span::styled(
                format!("Moving time: {:.1} s", reading.moving_secs),
                normal,
            )),
            Line::from(Span::styled(
                format!("Fare: €{:.2}", reading.fare),
                highlight,
            )),
        ];
        let body = Paragraph::new(lines).block(Block::default().padding(Padding::new(2, 2, 0, 0)));
        frame.render_widget(body, chunks[2]);

        // Last finished trip's ticket, until the next trip starts.
        if let Some(ticket) = &self.ticket {
            let panel = Paragraph::new(ticket.as_str())
                .style(normal)
                .block(Block::default().padding(Padding::new(2, 2, 1, 0)));
            frame.render_widget(panel, chunks[3]);
        }

        // Notice line: meter and store errors surface here.
        if let Some(notice) = &self.notice {
            let line = Paragraph::new(Line::from(Span::styled(
                format!(" {notice}"),
                Style::default().fg(Color::Red),
            )));
            frame.render_widget(line, chunks[4]);
        }

        // Help line.
        let help = Paragraph::new(Line::from(Span::styled(
            " s start  t stop  m move  f finish  h history  q quit",
            muted,
        )));
        frame.render_widget(help, chunks[5]);
    }
}

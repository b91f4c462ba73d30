//! Status screen layout, independent of the terminal backend.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use motor_core::logging::{LogEntry, LogLevel};
use motor_mod_stats::format::{format_bytes, format_percent};
use motor_mod_stats::telemetry::MetricsSnapshot;

/// Everything drawn in one frame.
pub struct ScreenView<'a> {
    pub title: &'a str,
    pub organization: &'a str,
    pub frames: u64,
    pub fps: f64,
    pub dt: f32,
    pub metrics: &'a MetricsSnapshot,
    pub logs: &'a [LogEntry],
}

fn level_color(level: LogLevel) -> Color {
    match level {
        LogLevel::Error => Color::Red,
        LogLevel::Warn => Color::Yellow,
        LogLevel::Info => Color::Green,
        LogLevel::Debug | LogLevel::Trace => Color::DarkGray,
    }
}

/// Lines of the stats panel.
pub fn stats_lines(view: &ScreenView<'_>) -> Vec<Line<'static>> {
    let m = view.metrics;
    let rss = m.self_rss.map(format_bytes).unwrap_or_else(|| "--".into());
    vec![
        Line::from(format!(
            "frame {:>8}   fps {:>6.1}   dt {:>6.2} ms",
            view.frames,
            view.fps,
            view.dt * 1000.0
        )),
        Line::from(format!(
            "cpu {:>7}   mem {} / {}   rss {}",
            format_percent(m.cpu_global),
            format_bytes(m.mem_used),
            format_bytes(m.mem_total),
            rss
        )),
        Line::from("q / Esc: quit"),
    ]
}

fn log_lines(logs: &[LogEntry]) -> Vec<Line<'static>> {
    logs.iter()
        .map(|entry| {
            Line::from(vec![
                Span::styled(
                    format!("{:5} ", entry.level.to_string()),
                    Style::default().fg(level_color(entry.level)),
                ),
                Span::raw(entry.message.clone()),
            ])
        })
        .collect()
}

/// Draw the status screen into `area`.
pub fn draw_screen(f: &mut Frame, area: Rect, view: &ScreenView<'_>) {
    let header = if view.organization.is_empty() {
        view.title.to_string()
    } else {
        format!("{} \u{b7} {}", view.title, view.organization)
    };

    let rows = Layout::vertical([Constraint::Length(5), Constraint::Min(0)]).split(area);

    let stats = Paragraph::new(stats_lines(view))
        .block(Block::default().borders(Borders::ALL).title(header));
    f.render_widget(stats, rows[0]);

    let logs = Paragraph::new(log_lines(view.logs))
        .block(Block::default().borders(Borders::ALL).title("LOG"));
    f.render_widget(logs, rows[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn rendered(view: &ScreenView<'_>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(72, 12)).unwrap();
        terminal
            .draw(|f| draw_screen(f, f.area(), view))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn screen_shows_identity_stats_and_logs() {
        let metrics = MetricsSnapshot::default();
        let logs = vec![LogEntry {
            level: LogLevel::Warn,
            message: "module failed to clean up".into(),
        }];
        let view = ScreenView {
            title: "Pathfinding",
            organization: "UPC",
            frames: 42,
            fps: 60.0,
            dt: 0.016,
            metrics: &metrics,
            logs: &logs,
        };

        let screen = rendered(&view);
        assert!(screen.contains("Pathfinding"));
        assert!(screen.contains("UPC"));
        assert!(screen.contains("frame       42"));
        assert!(screen.contains("cpu     --%"));
        assert!(screen.contains("WARN"));
        assert!(screen.contains("module failed to clean up"));
    }

    #[test]
    fn header_without_organization() {
        let metrics = MetricsSnapshot::default();
        let view = ScreenView {
            title: "Motor",
            organization: "",
            frames: 0,
            fps: 0.0,
            dt: 0.0,
            metrics: &metrics,
            logs: &[],
        };
        let screen = rendered(&view);
        assert!(screen.contains("Motor"));
        assert!(!screen.contains('\u{b7}'));
    }

    #[test]
    fn stats_lines_format_frame_timing() {
        let metrics = MetricsSnapshot {
            self_rss: Some(2048),
            ..MetricsSnapshot::default()
        };
        let view = ScreenView {
            title: "",
            organization: "",
            frames: 7,
            fps: 30.0,
            dt: 0.0333,
            metrics: &metrics,
            logs: &[],
        };
        let lines = stats_lines(&view);
        assert_eq!(lines[0].to_string(), "frame        7   fps   30.0   dt  33.30 ms");
        assert!(lines[1].to_string().ends_with("rss 2.0 KiB"));
    }
}

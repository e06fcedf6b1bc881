use std::{io, time::Duration};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    symbols::Marker,
    widgets::{Axis, Block, BorderType, Borders, Chart, Dataset, GraphType, Paragraph},
};
use scurve_core::service::dto::round_to;
use scurve_core::{CumulativePoint, ProgressReport};

// --- THEME ---
struct Theme {
    primary: Color,
    muted: Color,
    text: Color,
    plan: Color,
    actual: Color,
}

const THEME: Theme = Theme {
    primary: Color::Cyan,
    muted: Color::DarkGray,
    text: Color::White,
    plan: Color::Blue,
    actual: Color::Green,
};

/// One selectable curve: the project total or a single activity.
struct View {
    title: String,
    points: Vec<CumulativePoint>,
}

pub struct ChartApp {
    views: Vec<View>,
    pub current: usize,
    places: u32,
}

impl ChartApp {
    pub fn new(report: &ProgressReport, places: u32) -> Self {
        let mut views = vec![View {
            title: report.project.name.clone(),
            points: report.series.clone(),
        }];
        views.extend(report.activities.iter().map(|curve| View {
            title: format!("{} ({}%)", curve.name, round_to(curve.share, 1)),
            points: curve.points.clone(),
        }));
        Self {
            views,
            current: 0,
            places,
        }
    }

    pub fn next(&mut self) {
        if self.current + 1 < self.views.len() {
            self.current += 1;
        }
    }

    pub fn previous(&mut self) {
        if self.current > 0 {
            self.current -= 1;
        }
    }
}

pub fn run(report: &ProgressReport, places: u32) -> Result<()> {
    if !report.has_data() {
        println!("No schedule data for this project.");
        return Ok(());
    }

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = ChartApp::new(report, places);

    loop {
        terminal.draw(|f| ui(f, &app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => break,
                        KeyCode::Left | KeyCode::Char('h') => app.previous(),
                        KeyCode::Right | KeyCode::Char('l') => app.next(),
                        _ => {}
                    }
                }
            }
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}

fn ui(frame: &mut Frame, app: &ChartApp) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // Header
            Constraint::Min(10),   // Chart
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    let view = &app.views[app.current];

    let header = Line::from(vec![
        Span::styled("S-CURVE  ", Style::default().fg(THEME.primary).add_modifier(Modifier::BOLD)),
        Span::styled(if app.current > 0 { " < " } else { "   " }, Style::default().fg(THEME.text)),
        Span::styled(view.title.clone(), Style::default().fg(THEME.text).add_modifier(Modifier::BOLD)),
        Span::styled(if app.current + 1 < app.views.len() { " > " } else { "   " }, Style::default().fg(THEME.text)),
    ]);
    frame.render_widget(Paragraph::new(header), layout[0]);

    draw_chart(frame, view, app.places, layout[1]);

    let help = Line::from(vec![
        Span::styled("CURVE: ", Style::default().fg(THEME.muted)),
        Span::styled("←/→ ", Style::default().fg(THEME.text)),
        Span::raw("  "),
        Span::styled("QUIT: ", Style::default().fg(THEME.muted)),
        Span::styled("q", Style::default().fg(THEME.text)),
    ]);
    frame.render_widget(Paragraph::new(help).alignment(Alignment::Center), layout[2]);
}

fn draw_chart(frame: &mut Frame, view: &View, places: u32, area: Rect) {
    let plan: Vec<(f64, f64)> = view
        .points
        .iter()
        .enumerate()
        .filter_map(|(i, p)| p.cumulative_plan.map(|v| (i as f64, v)))
        .collect();
    let actual: Vec<(f64, f64)> = view
        .points
        .iter()
        .enumerate()
        .filter_map(|(i, p)| p.cumulative_actual.map(|v| (i as f64, v)))
        .collect();

    let last = view.points.len().saturating_sub(1);
    let y_max = plan
        .iter()
        .chain(actual.iter())
        .map(|(_, v)| *v)
        .fold(100.0_f64, f64::max);

    let x_labels: Vec<String> = [0, last / 2, last]
        .iter()
        .filter_map(|&i| view.points.get(i))
        .map(|p| p.slot().to_string())
        .collect();
    let y_labels: Vec<String> = [0.0, y_max / 2.0, y_max]
        .iter()
        .map(|v| format!("{}", round_to(*v, places)))
        .collect();

    let datasets = vec![
        Dataset::default()
            .name("Plan")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(THEME.plan))
            .data(&plan),
        Dataset::default()
            .name("Actual")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(THEME.actual))
            .data(&actual),
    ];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(THEME.muted))
                .title(" Cumulative progress (%) "),
        )
        .x_axis(
            Axis::default()
                .style(Style::default().fg(THEME.muted))
                .bounds([0.0, last.max(1) as f64])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(THEME.muted))
                .bounds([0.0, y_max])
                .labels(y_labels),
        );

    frame.render_widget(chart, area);
}

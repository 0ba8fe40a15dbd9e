//! Ratatui-based terminal UI.
//!
//! The TUI shows the chosen fit over either the observed x range or the
//! extrapolation grid, with a settings panel for the degree, the auto-degree
//! ceiling and the force overlay. Every change refits the already loaded data.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};

use crate::app::pipeline::{RunOutput, load_input, run_fit_with_dataset};
use crate::cli::FitArgs;
use crate::domain::{Dataset, DegreeMode, FitConfig};
use crate::error::AppError;
use crate::io::ingest::RowError;
use crate::plot::{ChartSeries, bounds};

mod plotters_chart;

use plotters_chart::FitPlottersChart;

const FIELD_COUNT: usize = 3;

/// Start the TUI.
pub fn run(args: FitArgs) -> Result<(), AppError> {
    let config = crate::app::fit_config_from_args(&args);
    // Load before touching the terminal so input errors print normally.
    let (dataset, row_errors) = load_input(&config)?;
    let mut app = App::new(config, dataset, row_errors)?;

    let _guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::numerical(format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::numerical(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::numerical(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Which x range the chart shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChartView {
    Observed,
    Grid,
}

impl ChartView {
    fn toggle(self) -> Self {
        match self {
            ChartView::Observed => ChartView::Grid,
            ChartView::Grid => ChartView::Observed,
        }
    }

    fn title(self) -> &'static str {
        match self {
            ChartView::Observed => "Fit (observed range)",
            ChartView::Grid => "Fit (extrapolation grid)",
        }
    }
}

struct App {
    config: FitConfig,
    dataset: Dataset,
    row_errors: Vec<RowError>,
    /// Degree used in fixed mode (kept while auto mode is on).
    degree: usize,
    /// Ceiling used in auto mode (kept while fixed mode is on).
    max_degree: usize,
    selected_field: usize,
    view: ChartView,
    status: String,
    run: RunOutput,
    series: ChartSeries,
}

impl App {
    fn new(config: FitConfig, dataset: Dataset, row_errors: Vec<RowError>) -> Result<Self, AppError> {
        let (degree, max_degree) = match config.degree_mode {
            DegreeMode::Fixed(d) => (d, d.max(1)),
            DegreeMode::Auto { max } => (max.min(crate::data::DEFAULT_DEGREE), max),
        };
        let run = run_fit_with_dataset(&config, dataset.clone(), row_errors.clone())?;
        let series = run.chart_series();
        let status = match row_errors.len() {
            0 => format!("Loaded {} points.", dataset.len()),
            skipped => format!("Loaded {} points ({skipped} rows skipped).", dataset.len()),
        };
        Ok(Self {
            config,
            dataset,
            row_errors,
            degree,
            max_degree,
            selected_field: 0,
            view: ChartView::Observed,
            status,
            run,
            series,
        })
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::numerical(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::numerical(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::numerical(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => self.selected_field = self.selected_field.saturating_sub(1),
            KeyCode::Down => self.selected_field = (self.selected_field + 1).min(FIELD_COUNT - 1),
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Char('+') => self.set_degree(self.degree + 1),
            KeyCode::Char('-') => self.set_degree(self.degree.saturating_sub(1)),
            KeyCode::Char('a') => {
                let mode = match self.config.degree_mode {
                    DegreeMode::Fixed(_) => DegreeMode::Auto { max: self.max_degree },
                    DegreeMode::Auto { .. } => DegreeMode::Fixed(self.degree),
                };
                self.apply_mode(mode);
            }
            KeyCode::Char('f') => self.cycle_force(),
            KeyCode::Char('v') => {
                self.view = self.view.toggle();
                self.status = format!("view: {}", self.view.title());
            }
            _ => {}
        }
        false
    }

    fn adjust_field(&mut self, delta: i32) {
        match self.selected_field {
            0 => {
                let next = if delta >= 0 { self.degree + 1 } else { self.degree.saturating_sub(1) };
                self.set_degree(next);
            }
            1 => {
                let next = if delta >= 0 {
                    self.max_degree + 1
                } else {
                    self.max_degree.saturating_sub(1).max(1)
                };
                self.max_degree = next;
                match self.config.degree_mode {
                    DegreeMode::Auto { .. } => self.apply_mode(DegreeMode::Auto { max: next }),
                    DegreeMode::Fixed(_) => self.status = format!("max degree: {next}"),
                }
            }
            2 => self.cycle_force(),
            _ => {}
        }
    }

    fn set_degree(&mut self, degree: usize) {
        match self.config.degree_mode {
            DegreeMode::Fixed(_) => self.apply_mode(DegreeMode::Fixed(degree)),
            DegreeMode::Auto { .. } => {
                self.status = "Degree is chosen by BIC; press 'a' for a fixed degree.".to_string();
            }
        }
    }

    /// Refit with a new degree mode; keeps the previous fit if the new one fails.
    fn apply_mode(&mut self, mode: DegreeMode) {
        let previous = self.config.degree_mode;
        self.config.degree_mode = mode;
        match self.refit() {
            Ok(()) => {
                if let DegreeMode::Fixed(d) = mode {
                    self.degree = d;
                }
                self.status = format!(
                    "{} -> degree {}",
                    mode_label(mode),
                    self.run.selection.best.model.degree
                );
            }
            Err(err) => {
                self.config.degree_mode = previous;
                self.status = format!("{}: {err}", mode_label(mode));
            }
        }
    }

    fn cycle_force(&mut self) {
        self.config.force = self.config.force.next();
        match self.refit() {
            Ok(()) => {
                self.status = match self.config.force.to_kind() {
                    Some(kind) => format!("force: {}", kind.display_name()),
                    None => "force: off".to_string(),
                };
            }
            Err(err) => self.status = format!("force: {err}"),
        }
    }

    fn refit(&mut self) -> Result<(), AppError> {
        let run = run_fit_with_dataset(&self.config, self.dataset.clone(), self.row_errors.clone())?;
        self.series = run.chart_series();
        self.run = run;
        Ok(())
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let best = &self.run.selection.best;
        let lines = vec![
            Line::from(vec![
                Span::styled("forcefit", Style::default().fg(Color::Cyan)),
                Span::raw(format!(" - {} ({} points)", self.dataset.label, self.dataset.len())),
            ]),
            Line::from(Span::styled(
                format!(
                    "{} | degree {} | sse={:.6} | r2={:.6} | bic={:.3} | max |horner-expanded|={:.2e}",
                    mode_label(self.config.degree_mode),
                    best.model.degree,
                    best.quality.sse,
                    best.quality.r_squared,
                    best.quality.bic,
                    self.run.eval_grid.max_abs_diff,
                ),
                Style::default().fg(Color::Gray),
            )),
            Line::from(Span::styled(
                crate::models::expression(&best.model.coefficients),
                Style::default().fg(Color::Gray),
            )),
        ];

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(34)])
            .split(area);

        self.draw_chart(frame, chunks[0]);
        self.draw_settings(frame, chunks[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title(self.view.title()).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let view = view_data(&self.series, self.view);
        let widget = FitPlottersChart {
            curve: view.curve,
            points: view.points,
            highlighted: view.highlighted,
            overlay: view.overlay,
            x_bounds: view.x_bounds,
            y_bounds: view.y_bounds,
            x_label: "x",
            y_label: "y",
            fmt_x: fmt_axis_x,
            fmt_y: view.fmt_y,
        };
        frame.render_widget(widget, inner);
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let force = match self.config.force.to_kind() {
            Some(kind) => kind.display_name(),
            None => "off",
        };

        let mut items = vec![
            ListItem::new(format!("Degree: {}", self.degree)),
            ListItem::new(format!("Max degree (auto): {}", self.max_degree)),
            ListItem::new(format!("Force: {force}")),
        ];
        items.push(ListItem::new(""));
        items.push(ListItem::new("Largest residuals:"));
        for r in &self.run.largest {
            items.push(ListItem::new(format!("  x={:<8} {:+.4}", r.point.x, r.residual)));
        }

        let list = List::new(items)
            .block(Block::default().title("Settings").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  +/- degree  a auto  f force  v view  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Series and bounds for one chart view.
struct ViewData<'a> {
    curve: &'a [(f64, f64)],
    points: &'a [(f64, f64)],
    highlighted: &'a [(f64, f64)],
    overlay: &'a [(f64, f64)],
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    fmt_y: fn(f64) -> String,
}

fn view_data(series: &ChartSeries, view: ChartView) -> ViewData<'_> {
    match view {
        ChartView::Observed => {
            let (x_bounds, y_bounds) = bounds(&[&series.observed, &series.fit_dense]);
            ViewData {
                curve: &series.fit_dense,
                points: &series.observed,
                highlighted: &series.highlighted,
                overlay: &[],
                x_bounds,
                y_bounds,
                fmt_y: fmt_axis_y,
            }
        }
        ChartView::Grid => {
            let (x_bounds, y_bounds) = bounds(&[&series.fit_grid, &series.force_grid]);
            ViewData {
                curve: &series.fit_grid,
                points: &[],
                highlighted: &[],
                overlay: &series.force_grid,
                x_bounds,
                y_bounds,
                fmt_y: fmt_axis_y_sci,
            }
        }
    }
}

fn mode_label(mode: DegreeMode) -> String {
    match mode {
        DegreeMode::Fixed(d) => format!("fixed degree {d}"),
        DegreeMode::Auto { max } => format!("auto (max {max})"),
    }
}

fn fmt_axis_x(v: f64) -> String {
    format!("{v:.1}")
}

fn fmt_axis_y(v: f64) -> String {
    format!("{v:.2}")
}

fn fmt_axis_y_sci(v: f64) -> String {
    format!("{v:.1e}")
}

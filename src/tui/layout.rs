//! TUI layout and widget rendering.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, Paragraph};

use super::runtime::{App, PARAMS};
use super::style;
use crate::sim::types::{Sample, Simulation};

/// Renders the full TUI frame.
pub fn render(frame: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Min(12),   // sidebar + charts
            Constraint::Length(4), // summary
            Constraint::Length(1), // footer
        ])
        .split(frame.area());

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(32), Constraint::Min(20)])
        .split(rows[1]);

    let charts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(body[1]);

    render_header(frame, app, rows[0]);
    render_sidebar(frame, app, body[0]);
    match &app.simulation {
        Some(sim) => {
            render_power_chart(frame, sim, charts[0]);
            render_irradiance_chart(frame, sim, charts[1]);
        }
        None => {
            let msg = app.error.as_deref().unwrap_or("no results");
            let err = Paragraph::new(Line::from(Span::styled(
                msg,
                Style::default().fg(style::ERROR_FG),
            )))
            .block(Block::default().title(" Error ").borders(Borders::ALL));
            frame.render_widget(err, body[1]);
        }
    }
    render_summary(frame, app, rows[2]);
    render_footer(frame, rows[3]);
}

/// Header bar: preset name, date and derived GCR.
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let header = Line::from(vec![
        Span::styled(
            " AGRIVOLT-SIM ",
            Style::default()
                .fg(style::HEADER_FG)
                .bg(style::HEADER_BG)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            &app.preset_name,
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            " │ {} │ gcr={:.3} │ lat={:.1} lon={:.1} ",
            app.config.site.date,
            app.config.gcr(),
            app.config.site.latitude,
            app.config.site.longitude,
        )),
    ]);
    frame.render_widget(Paragraph::new(header), area);
}

/// Parameter list with the selected row highlighted.
fn render_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let lines: Vec<Line> = PARAMS
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let text = format!(" {:<15}{:>12} ", p.label(), p.display(&app.config));
            if i == app.selected {
                Line::from(Span::styled(
                    text,
                    Style::default()
                        .fg(style::SELECTED_FG)
                        .bg(style::SELECTED_BG)
                        .add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(text)
            }
        })
        .collect();

    let block = Block::default().title(" Parameters ").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn points(sim: &Simulation, value: impl Fn(&Sample) -> f64) -> Vec<(f64, f64)> {
    sim.samples
        .iter()
        .map(|s| (sim.grid.hour_of_day(s.timestep), value(s)))
        .collect()
}

fn hour_axis() -> Axis<'static> {
    Axis::default()
        .title("hour (UTC)")
        .bounds([0.0, 24.0])
        .labels(vec!["0", "6", "12", "18", "24"])
}

fn value_axis(title: &'static str, bounds: [f64; 2]) -> Axis<'static> {
    Axis::default()
        .title(title)
        .bounds(bounds)
        .labels(vec![
            format!("{:.0}", bounds[0]),
            format!("{:.0}", bounds[1] / 2.0),
            format!("{:.0}", bounds[1]),
        ])
}

/// Chart 1: DC power over the day.
fn render_power_chart(frame: &mut Frame, sim: &Simulation, area: Rect) {
    let power = points(sim, |s| s.power_dc_kw());
    let y_bounds = style::auto_bounds_y(&[&power]);

    let datasets = vec![
        Dataset::default()
            .name("DC Power")
            .marker(symbols::Marker::Braille)
            .style(Style::default().fg(style::POWER_COLOR))
            .data(&power),
    ];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(" DC Power (kW) ")
                .borders(Borders::ALL),
        )
        .x_axis(hour_axis())
        .y_axis(value_axis("kW", y_bounds));

    frame.render_widget(chart, area);
}

/// Chart 2: irradiance above the panels against irradiance at crop level.
fn render_irradiance_chart(frame: &mut Frame, sim: &Simulation, area: Rect) {
    let ghi = points(sim, |s| s.ghi);
    let crop = points(sim, |s| s.crop_irradiance);
    let y_bounds = style::auto_bounds_y(&[&ghi, &crop]);

    let datasets = vec![
        Dataset::default()
            .name("Above-panel GHI")
            .marker(symbols::Marker::Braille)
            .style(Style::default().fg(style::GHI_COLOR))
            .data(&ghi),
        Dataset::default()
            .name("Crop-level Irradiance")
            .marker(symbols::Marker::Braille)
            .style(Style::default().fg(style::CROP_COLOR))
            .data(&crop),
    ];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(" Irradiance at Panel vs Crop Level ")
                .borders(Borders::ALL),
        )
        .x_axis(hour_axis())
        .y_axis(value_axis("W/m²", y_bounds))
        .hidden_legend_constraints((Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)));

    frame.render_widget(chart, area);
}

/// Daily totals of the current run.
fn render_summary(frame: &mut Frame, app: &App, area: Rect) {
    let lines = if let Some(sim) = &app.simulation {
        let s = &sim.summary;
        let peak_at = s
            .peak_time
            .map_or_else(|| "--:--".to_string(), |t| t.format("%H:%M").to_string());
        vec![
            Line::from(format!(
                "  energy={:.1} kWh  peak={:.1} kW @ {}  yield={:.2} kWh/kWp",
                s.energy_kwh, s.peak_power_kw, peak_at, s.specific_yield_kwh_per_kwp,
            )),
            Line::from(format!(
                "  GHI={:.2} kWh/m²  crop={:.2} kWh/m²  crop/GHI={:.0}%  sun={} min",
                s.ghi_insolation_kwh_m2,
                s.crop_insolation_kwh_m2,
                s.crop_light_ratio * 100.0,
                s.sunshine_minutes,
            )),
        ]
    } else {
        vec![Line::from("  No results for the current parameters")]
    };

    let block = Block::default().title(" Summary ").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Footer with keybinding hints.
fn render_footer(frame: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(Span::styled(
        " q:Quit  ↑/↓:Select  ←/→ +/-:Adjust  1/2/3:Preset  r:Reset",
        Style::default().fg(style::FOOTER_FG),
    )));
    frame.render_widget(footer, area);
}

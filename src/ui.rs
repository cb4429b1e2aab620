//! Terminal presentation layer.
//!
//! Renders the weather screen: location bar, state/city picker panel,
//! current conditions, stats row, hourly strip, and the forecast list.
//! Key handling drives the resolution flow; fetches happen between frames.

use crate::models::{STATES, WeatherSnapshot};
use crate::resolver::{LocationFlow, ViewState};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    Frame, Terminal,
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph},
};
use std::time::Duration;

const DAY_BACKGROUND: Color = Color::Rgb(30, 144, 255);
const NIGHT_BACKGROUND: Color = Color::Rgb(31, 41, 55);
const HOURS: [&str; 4] = ["15:00", "16:00", "17:00", "18:00"];

/// Which list the picker's keyboard focus is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum PickerFocus {
    #[default]
    States,
    Cities,
}

/// Transient picker navigation state, owned by the event loop.
#[derive(Debug, Default)]
struct PickerState {
    focus: PickerFocus,
    states: ListState,
    cities: ListState,
}

impl PickerState {
    fn opened_at(selected_uf: Option<&str>) -> Self {
        let index = selected_uf
            .and_then(|uf| STATES.iter().position(|(code, _)| *code == uf))
            .unwrap_or(0);
        let mut picker = Self::default();
        picker.states.select(Some(index));
        picker
    }
}

/// Event loop: draw, poll for a key, dispatch to the flow.
pub async fn run<B: Backend>(
    terminal: &mut Terminal<B>,
    flow: &mut LocationFlow,
) -> anyhow::Result<()> {
    let mut picker = PickerState::default();

    loop {
        terminal.draw(|frame| draw(frame, flow.state(), &mut picker))?;

        if !event::poll(Duration::from_millis(150))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match key.code {
            KeyCode::Char('q') => return Ok(()),
            KeyCode::Char('r') => flow.refresh().await,
            KeyCode::Char('l') => {
                flow.toggle_picker();
                if flow.state().picker_open {
                    picker = PickerState::opened_at(flow.state().selected_uf.as_deref());
                }
            }
            KeyCode::Esc if flow.state().picker_open => flow.toggle_picker(),
            KeyCode::Up if flow.state().picker_open => {
                move_selection(&mut picker, flow.state(), -1);
            }
            KeyCode::Down if flow.state().picker_open => {
                move_selection(&mut picker, flow.state(), 1);
            }
            KeyCode::Left if flow.state().picker_open => picker.focus = PickerFocus::States,
            KeyCode::Enter if flow.state().picker_open => match picker.focus {
                PickerFocus::States => {
                    if let Some(index) = picker.states.selected() {
                        let (uf, _) = STATES[index.min(STATES.len() - 1)];
                        flow.on_state_changed(uf).await;
                        picker.focus = PickerFocus::Cities;
                        picker
                            .cities
                            .select(if flow.state().cities.is_empty() {
                                None
                            } else {
                                Some(0)
                            });
                    }
                }
                PickerFocus::Cities => {
                    let city = picker
                        .cities
                        .selected()
                        .and_then(|index| flow.state().cities.get(index))
                        .map(|option| option.value.clone());
                    if let Some(city) = city {
                        flow.on_city_changed(&city).await;
                    }
                }
            },
            _ => {}
        }
    }
}

fn move_selection(picker: &mut PickerState, state: &ViewState, delta: i64) {
    let (list, len) = match picker.focus {
        PickerFocus::States => (&mut picker.states, STATES.len()),
        PickerFocus::Cities => (&mut picker.cities, state.cities.len()),
    };
    if len == 0 {
        return;
    }
    let current = list.selected().unwrap_or(0) as i64;
    let next = (current + delta).rem_euclid(len as i64) as usize;
    list.select(Some(next));
}

fn draw(frame: &mut Frame, state: &ViewState, picker: &mut PickerState) {
    let night = state.snapshot.as_ref().is_some_and(|s| s.is_night);
    let background = if night { NIGHT_BACKGROUND } else { DAY_BACKGROUND };
    let area = frame.area();
    frame.render_widget(Block::default().style(Style::default().bg(background)), area);

    // First load: nothing but the loading indicator.
    if state.loading && state.snapshot.is_none() {
        let spinner = Paragraph::new("Carregando...")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::White));
        let center = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(50),
                Constraint::Length(1),
                Constraint::Percentage(50),
            ])
            .split(area);
        frame.render_widget(spinner, center[1]);
        return;
    }

    let picker_height = if state.picker_open { 14 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(picker_height),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    draw_location_bar(frame, state, chunks[0]);
    if state.picker_open {
        draw_picker(frame, state, picker, chunks[1]);
    }
    if let Some(snapshot) = &state.snapshot {
        draw_weather(frame, snapshot, chunks[2]);
    }
    draw_footer(frame, state, chunks[3]);
}

fn draw_location_bar(frame: &mut Frame, state: &ViewState, area: Rect) {
    let label = state.location_label.as_deref().unwrap_or("Carregando...");
    let loading = if state.loading { " ..." } else { "" };
    let bar = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled("⌖ ", Style::default().fg(Color::Yellow)),
        Span::styled(
            label,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" ▾"),
        Span::raw(loading),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            // the bell is decorative
            .title(Line::from(" ♪ ").alignment(Alignment::Right)),
    );
    frame.render_widget(bar, area);
}

fn draw_picker(frame: &mut Frame, state: &ViewState, picker: &mut PickerState, area: Rect) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let highlight = Style::default()
        .fg(Color::Black)
        .bg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let focused = |wanted: PickerFocus| {
        if picker.focus == wanted {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::White)
        }
    };

    let states: Vec<ListItem> = STATES
        .iter()
        .map(|(code, name)| ListItem::new(format!("{name} ({code})")))
        .collect();
    let state_list = List::new(states)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(focused(PickerFocus::States))
                .title(" Selecione o estado "),
        )
        .highlight_style(highlight)
        .highlight_symbol("▸ ");
    frame.render_stateful_widget(state_list, halves[0], &mut picker.states);

    let cities: Vec<ListItem> = state
        .cities
        .iter()
        .map(|option| ListItem::new(option.label.clone()))
        .collect();
    let city_list = List::new(cities)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(focused(PickerFocus::Cities))
                .title(" Selecione a cidade "),
        )
        .highlight_style(highlight)
        .highlight_symbol("▸ ");
    frame.render_stateful_widget(city_list, halves[1], &mut picker.cities);
}

fn draw_weather(frame: &mut Frame, snapshot: &WeatherSnapshot, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Length(6),
            Constraint::Min(0),
        ])
        .split(area);

    draw_current(frame, snapshot, chunks[0]);
    draw_stats(frame, snapshot, chunks[1]);
    draw_hourly(frame, snapshot, chunks[2]);
    draw_forecast(frame, snapshot, chunks[3]);
}

fn draw_current(frame: &mut Frame, snapshot: &WeatherSnapshot, area: Rect) {
    let glyph = condition_glyph(&snapshot.condition);
    let mut lines = vec![
        Line::from(Span::styled(
            format!("{glyph}  {}°", snapshot.temperature),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            condition_description(&snapshot.condition).to_string(),
            Style::default().fg(Color::White),
        )),
    ];
    if let Some(today) = snapshot.today() {
        lines.push(Line::from(Span::styled(
            format!("Max: {}°  Min: {}°", today.max, today.min),
            Style::default().fg(Color::Gray),
        )));
    }
    lines.push(Line::from(Span::styled(
        format!("atualizado {}", snapshot.fetched_at.format("%H:%M")),
        Style::default().fg(Color::DarkGray),
    )));

    let current = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(current, area);
}

fn draw_stats(frame: &mut Frame, snapshot: &WeatherSnapshot, area: Rect) {
    let rain = snapshot
        .today()
        .map_or_else(|| "--".to_string(), |d| format!("{}%", d.rain_probability));
    let stats = Paragraph::new(Line::from(vec![
        Span::raw(format!("  ≋ {}%", snapshot.humidity_percent)),
        Span::raw("    "),
        Span::raw(format!("≫ {}", snapshot.wind_description)),
        Span::raw("    "),
        Span::raw(format!("☂ {rain}")),
    ]))
    .style(Style::default().fg(Color::White))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded),
    );
    frame.render_widget(stats, area);
}

fn draw_hourly(frame: &mut Frame, snapshot: &WeatherSnapshot, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(Span::styled(" Today ", Style::default().fg(Color::Yellow)));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(today) = snapshot.today() else {
        return;
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(inner);

    // Synthetic hourly strip: today's max stepped down per hour slot.
    for (index, hour) in HOURS.iter().enumerate() {
        let cell = Paragraph::new(vec![
            Line::from(Span::styled(*hour, Style::default().fg(Color::Gray))),
            Line::from(condition_glyph(&snapshot.condition)),
            Line::from(Span::styled(
                format!("{}°", today.max - index as i32),
                Style::default().fg(Color::White),
            )),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(cell, columns[index]);
    }
}

fn draw_forecast(frame: &mut Frame, snapshot: &WeatherSnapshot, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(Span::styled(
            " Next Forecast ",
            Style::default().fg(Color::Yellow),
        ));

    let items: Vec<ListItem> = snapshot
        .forecast
        .iter()
        .map(|day| {
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {:<4}", day.weekday), Style::default().fg(Color::White)),
                Span::raw(format!("{:^4}", condition_glyph(&day.condition))),
                Span::styled(
                    format!("{:>4}°", day.max),
                    Style::default().fg(Color::White),
                ),
                Span::styled(
                    format!("{:>4}°", day.min),
                    Style::default().fg(Color::Gray),
                ),
                Span::styled(
                    format!("   ☂ {:>3}%", day.rain_probability),
                    Style::default().fg(Color::Gray),
                ),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

fn draw_footer(frame: &mut Frame, state: &ViewState, area: Rect) {
    let footer = match &state.notice {
        Some(notice) => Paragraph::new(notice.message.as_str())
            .style(Style::default().fg(Color::LightRed)),
        None => Paragraph::new(" l: localização   r: atualizar   q: sair")
            .style(Style::default().fg(Color::Gray)),
    };
    frame.render_widget(footer, area);
}

/// Map an API condition slug to a display glyph.
fn condition_glyph(condition: &str) -> &'static str {
    match condition {
        "clear_day" => "☀",
        "clear_night" => "☾",
        "rain" | "storm" | "hail" => "☂",
        "snow" => "❄",
        "fog" => "≡",
        "cloud" | "cloudly_day" | "cloudly_night" => "☁",
        _ => "⛅",
    }
}

/// Map an API condition slug to a short description.
fn condition_description(condition: &str) -> &'static str {
    match condition {
        "clear_day" => "Céu limpo",
        "clear_night" => "Noite limpa",
        "rain" => "Chuva",
        "storm" => "Tempestade",
        "hail" => "Granizo",
        "snow" => "Neve",
        "fog" => "Neblina",
        "cloud" => "Nublado",
        "cloudly_day" | "cloudly_night" => "Parcialmente nublado",
        _ => "Precipitations",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_glyphs_cover_known_slugs() {
        assert_eq!(condition_glyph("clear_day"), "☀");
        assert_eq!(condition_glyph("clear_night"), "☾");
        assert_eq!(condition_glyph("rain"), "☂");
        assert_eq!(condition_glyph("cloud"), "☁");
        // unknown slugs fall back to partly cloudy
        assert_eq!(condition_glyph("something_else"), "⛅");
    }

    #[test]
    fn test_picker_opens_at_selected_state() {
        let picker = PickerState::opened_at(Some("RJ"));
        let index = picker.states.selected().unwrap();
        assert_eq!(STATES[index].0, "RJ");
    }

    #[test]
    fn test_picker_opens_at_first_state_without_selection() {
        let picker = PickerState::opened_at(None);
        assert_eq!(picker.states.selected(), Some(0));
    }
}

//! Frame rendering. Pure function of the models; never mutates state.

use chrono::{DateTime, Utc};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use skycast_weather::IconKind;

use crate::icons::{IconSet, Pixmap, LARGE_ICON_PX, SMALL_ICON_PX};
use crate::models::{AppModel, ForecastCard};
use crate::theme::{Rgb, ERROR_FG, FORECAST_CARD_BG, FORECAST_CARD_FG, FORECAST_STRIP_BG};

const SEARCH_PANEL_WIDTH: u16 = 34;
const INPUT_PLACEHOLDER: &str = "Enter a city...";
/// Small icon rows + day name + range + card borders
const FORECAST_CARD_HEIGHT: u16 = (SMALL_ICON_PX / 2) as u16 + 4;

pub fn draw(f: &mut Frame, model: &AppModel, icons: &IconSet, now: DateTime<Utc>) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SEARCH_PANEL_WIDTH), Constraint::Min(0)])
        .split(f.area());

    render_search_panel(f, columns[0], model);
    render_conditions_panel(f, columns[1], model, icons, now);
}

fn render_search_panel(f: &mut Frame, area: Rect, model: &AppModel) {
    let theme = model.theme();
    let fg: Color = theme.foreground().into();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            " 🌍 City Search ",
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(theme.panel_background().into()).fg(fg));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(inner);

    // Input
    let query = model.search.query();
    let input = if query.is_empty() {
        Line::from(vec![
            Span::styled("▏", Style::default().fg(fg)),
            Span::styled(INPUT_PLACEHOLDER, Style::default().fg(Color::DarkGray)),
        ])
    } else {
        Line::from(vec![Span::raw(query.to_string()), Span::raw("▏")])
    };
    f.render_widget(
        Paragraph::new(input).block(Block::default().borders(Borders::ALL)),
        rows[0],
    );

    // Suggestions
    let (normal, selected) = theme.suggestion_colors();
    let width = usize::from(rows[1].width);
    let suggestions: Vec<Line> = model
        .search
        .suggestions()
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let bg = if model.search.selected() == Some(i) {
                selected
            } else {
                normal
            };
            Line::styled(
                format!(" {:<width$}", name, width = width.saturating_sub(1)),
                Style::default().bg(bg.into()).fg(fg),
            )
        })
        .collect();
    f.render_widget(Paragraph::new(suggestions), rows[1]);

    f.render_widget(
        Paragraph::new(vec![
            key_hint("Enter", "🔍 Search"),
            key_hint("↑/↓", "choose suggestion"),
        ]),
        rows[3],
    );
    f.render_widget(
        Paragraph::new(vec![
            key_hint("Ctrl-T", theme.toggle_label()),
            key_hint("Esc", "quit"),
        ]),
        rows[5],
    );
}

fn key_hint(key: &str, action: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(key.to_string(), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!(" {}", action)),
    ])
}

fn render_conditions_panel(
    f: &mut Frame,
    area: Rect,
    model: &AppModel,
    icons: &IconSet,
    now: DateTime<Utc>,
) {
    let background = model.background();
    let fg: Color = model.theme().foreground().into();
    let block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default().bg(background.into()).fg(fg));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let weather = &model.weather;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length((LARGE_ICON_PX / 2) as u16),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(FORECAST_CARD_HEIGHT + 2),
        ])
        .split(inner);

    let (date, time) = weather.clock(now);
    f.render_widget(
        Paragraph::new(vec![Line::from(date), Line::from(time)]).alignment(Alignment::Right),
        rows[0],
    );
    f.render_widget(
        Paragraph::new(key_hint("Ctrl-R", "📍 Refresh location")).alignment(Alignment::Right),
        rows[1],
    );

    let headline_style = if weather.is_error_highlighted() {
        Style::default()
            .fg(ERROR_FG.into())
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    f.render_widget(
        Paragraph::new(Span::styled(weather.headline().to_string(), headline_style))
            .alignment(Alignment::Center),
        rows[3],
    );

    if let Some(kind) = weather.icon() {
        render_icon(f, rows[4], icons.large(kind), kind, background);
    }

    f.render_widget(
        Paragraph::new(Span::styled(
            weather.temperature().to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center),
        rows[5],
    );
    f.render_widget(
        Paragraph::new(weather.description().to_string()).alignment(Alignment::Center),
        rows[6],
    );
    f.render_widget(
        Paragraph::new(
            weather
                .details()
                .iter()
                .filter(|d| !d.is_empty())
                .copied()
                .collect::<Vec<_>>()
                .join("    "),
        )
        .alignment(Alignment::Center),
        rows[7],
    );

    render_forecast(f, rows[9], weather.forecast(), icons);
}

fn render_icon(f: &mut Frame, area: Rect, pixmap: Option<&Pixmap>, kind: IconKind, bg: Rgb) {
    let lines = match pixmap {
        Some(p) => p.to_lines(bg),
        None => vec![Line::from(kind.glyph())],
    };
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn render_forecast(f: &mut Frame, area: Rect, cards: &[ForecastCard], icons: &IconSet) {
    if cards.is_empty() {
        return;
    }

    let strip = Block::default()
        .borders(Borders::ALL)
        .style(Style::default().bg(FORECAST_STRIP_BG.into()));
    let inner = strip.inner(area);
    f.render_widget(strip, area);

    let count = cards.len() as u32;
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(cards.iter().map(|_| Constraint::Ratio(1, count)))
        .split(inner);

    for (card, column) in cards.iter().zip(columns.iter()) {
        let block = Block::default().borders(Borders::ALL).style(
            Style::default()
                .bg(FORECAST_CARD_BG.into())
                .fg(FORECAST_CARD_FG.into()),
        );
        let card_area = block.inner(*column);
        f.render_widget(block, *column);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length((SMALL_ICON_PX / 2) as u16),
                Constraint::Length(1),
            ])
            .split(card_area);

        f.render_widget(
            Paragraph::new(Span::styled(
                card.day.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center),
            rows[0],
        );
        render_icon(f, rows[1], icons.small(card.icon), card.icon, FORECAST_CARD_BG);
        f.render_widget(
            Paragraph::new(card.range.clone()).alignment(Alignment::Center),
            rows[2],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use ratatui::Terminal;
    use skycast_core::UiConfig;
    use skycast_weather::{CurrentConditions, ForecastEntry, WeatherReport};
    use std::time::Instant;

    use crate::services::ServiceMessage;
    use crate::theme::Theme;

    fn buffer_text(buffer: &Buffer) -> String {
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    fn render(model: &AppModel) -> String {
        let mut terminal = Terminal::new(TestBackend::new(110, 40)).unwrap();
        terminal
            .draw(|f| draw(f, model, &IconSet::default(), Utc::now()))
            .unwrap();
        buffer_text(terminal.backend().buffer())
    }

    fn report() -> WeatherReport {
        let now = Utc::now().timestamp();
        WeatherReport {
            current: CurrentConditions {
                city: "Oslo".into(),
                country: "NO".into(),
                temperature: -3.2,
                feels_like: -7.9,
                humidity: 81,
                wind_speed: 5.5,
                description: "light snow".into(),
                icon: "13d".into(),
                utc_offset_secs: 0,
            },
            forecast: (1..=3)
                .map(|d| ForecastEntry {
                    timestamp: now + d * 86_400,
                    temp_min: -6.0,
                    temp_max: -1.0,
                    temp: -3.0,
                    icon: "13n".into(),
                })
                .collect(),
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn test_initial_screen() {
        let mut model = AppModel::new(&UiConfig::default(), Theme::Dark);
        model.begin_locate();

        let text = render(&model);
        assert!(text.contains("City Search"));
        assert!(text.contains(INPUT_PLACEHOLDER));
        assert!(text.contains("Detecting location"));
        assert!(text.contains("Refresh location"));
    }

    #[test]
    fn test_report_screen() {
        let mut model = AppModel::new(&UiConfig::default(), Theme::Dark);
        let message = ServiceMessage::FetchDone {
            generation: 1,
            result: Ok(report()),
        };
        model.apply_message(message, 1, Instant::now());

        let text = render(&model);
        assert!(text.contains("Oslo, NO"));
        assert!(text.contains("-3°C"));
        assert!(text.contains("Light snow"));
        assert!(text.contains("Humidity: 81%"));
        assert!(text.contains("-1° / -6°"));
    }

    #[test]
    fn test_suggestions_are_listed() {
        let mut model = AppModel::new(&UiConfig::default(), Theme::Light);
        let cities = skycast_weather::CityDirectory::from_names(["Oslo", "Osaka", "Lima"]);
        model.search.insert_char('o', &cities);

        let text = render(&model);
        assert!(text.contains("Oslo"));
        assert!(text.contains("Osaka"));
        assert!(!text.contains("Lima"));
    }
}

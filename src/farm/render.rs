//! Royal Farm rendering (read-only from the game).

use ratzilla::ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::input::is_narrow_layout;
use crate::time::Clock;

use super::config::{self, CropKind, PLOT_COUNT};
use super::feedback::{ToastKind, MAX_TOASTS};
use super::growth;
use super::state::{FarmState, Plot, PlotStatus};
use super::storage::SaveStorage;
use super::{FarmGame, Screen};

const GRID_COLS: usize = 3;

pub fn render<S: SaveStorage, C: Clock>(game: &FarmGame<S, C>, f: &mut Frame, area: Rect) {
    let state = game.store().state();
    let now = game.store().now();
    let is_narrow = is_narrow_layout(area.width);
    let borders = if is_narrow {
        Borders::TOP | Borders::BOTTOM
    } else {
        Borders::ALL
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),                     // Header
            Constraint::Min(10),                       // Farm + side panel
            Constraint::Length(MAX_TOASTS as u16 + 2), // Toasts
            Constraint::Length(3),                     // Help
        ])
        .split(area);

    render_header(state, f, chunks[0], borders, is_narrow);

    let body = Layout::default()
        .direction(if is_narrow {
            Direction::Vertical
        } else {
            Direction::Horizontal
        })
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);
    render_plots(state, now, f, body[0], is_narrow);
    render_panel(game.screen(), state, f, body[1], borders);

    render_toasts(game, f, chunks[2], borders);
    render_help(game.screen(), f, chunks[3], borders);
}

// ── Header ─────────────────────────────────────────────────────────────

fn render_header(state: &FarmState, f: &mut Frame, area: Rect, borders: Borders, is_narrow: bool) {
    let player = &state.player;
    let bar_width = if is_narrow { 10 } else { 20 };
    let progress = config::level_progress(player.xp, player.level);

    let lines = vec![
        Line::from(vec![
            Span::styled(
                format!(" {} ", player.name),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("Lv.{} {}", player.level, config::level_title(player.level)),
                Style::default().fg(Color::Cyan),
            ),
            Span::styled("   $", Style::default().fg(Color::Gray)),
            Span::styled(
                player.money.to_string(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled(" XP ", Style::default().fg(Color::Gray)),
            Span::styled(progress_bar(progress, bar_width), Style::default().fg(Color::Magenta)),
            Span::styled(format!(" {}", player.xp), Style::default().fg(Color::White)),
            Span::styled(settings_summary(state), Style::default().fg(Color::DarkGray)),
        ]),
    ];

    let block = Block::default()
        .borders(borders)
        .border_style(Style::default().fg(Color::Green))
        .title(Span::styled(
            " 👑 Royal Farm ",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn settings_summary(state: &FarmState) -> String {
    let flag = |on: bool| if on { "on" } else { "off" };
    format!(
        "   sound:{} music:{} vib:{}",
        flag(state.settings.sound),
        flag(state.settings.music),
        flag(state.settings.vibration)
    )
}

// ── Plot grid ──────────────────────────────────────────────────────────

fn render_plots(state: &FarmState, now: u64, f: &mut Frame, area: Rect, is_narrow: bool) {
    let rows = PLOT_COUNT.div_ceil(GRID_COLS);
    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, rows as u32); rows])
        .split(area);

    for (r, row_area) in row_areas.iter().enumerate() {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, GRID_COLS as u32); GRID_COLS])
            .split(*row_area);
        for (c, cell) in cells.iter().enumerate() {
            if let Some(plot) = state.farm.plot(r * GRID_COLS + c) {
                render_plot(plot, now, f, *cell, is_narrow);
            }
        }
    }
}

fn render_plot(plot: &Plot, now: u64, f: &mut Frame, area: Rect, is_narrow: bool) {
    let bar_width = if is_narrow { 5 } else { 8 };
    let (lines, color) = match (plot.status, plot.crop) {
        (PlotStatus::Growing, Some(crop)) => {
            let remaining = growth::remaining_ms(plot, now).unwrap_or(0);
            (
                vec![
                    Line::from(format!("{} {}", crop.icon(), crop.name())),
                    Line::from(Span::styled(
                        progress_bar(growth::progress(plot, now), bar_width),
                        Style::default().fg(Color::Green),
                    )),
                    Line::from(Span::styled(
                        format_duration(remaining),
                        Style::default().fg(Color::DarkGray),
                    )),
                ],
                Color::Green,
            )
        }
        (PlotStatus::Ready, Some(crop)) => (
            vec![
                Line::from(format!("{} {}", crop.icon(), crop.name())),
                Line::from(Span::styled(
                    "READY!",
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )),
            ],
            Color::Yellow,
        ),
        (PlotStatus::Locked, _) => (vec![Line::from("🔒")], Color::DarkGray),
        _ => (
            vec![Line::from(Span::styled("🌱 empty", Style::default().fg(Color::DarkGray)))],
            Color::Rgb(139, 90, 43),
        ),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(format!(" {} ", plot.id + 1));
    let widget = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center);
    f.render_widget(widget, area);
}

// ── Side panel ─────────────────────────────────────────────────────────

fn render_panel(screen: Screen, state: &FarmState, f: &mut Frame, area: Rect, borders: Borders) {
    let (title, color, lines) = match screen {
        Screen::Farm => (" Farm ".to_string(), Color::Green, farm_lines(state)),
        Screen::Shop => (" Seed Shop ".to_string(), Color::Yellow, shop_lines(state)),
        Screen::Inventory => (" Barn ".to_string(), Color::Cyan, inventory_lines(state)),
        Screen::SeedPicker { plot } => (
            format!(" Plant on #{} ", plot + 1),
            Color::Green,
            seed_lines(state),
        ),
        Screen::ConfirmReset => (" Reset farm? ".to_string(), Color::Red, reset_lines()),
    };

    let block = Block::default()
        .borders(borders)
        .border_style(Style::default().fg(color))
        .title(Span::styled(
            title,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
    let widget = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}

fn key_span(index: usize) -> Span<'static> {
    Span::styled(
        format!(" [{}] ", index + 1),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )
}

fn farm_lines(state: &FarmState) -> Vec<Line<'static>> {
    let farm = &state.farm;
    vec![
        Line::from(format!(
            " Growing: {}  Ready: {}",
            farm.count_with(PlotStatus::Growing),
            farm.count_with(PlotStatus::Ready)
        )),
        Line::from(format!(" Seeds in bag: {}", state.inventory.total_seeds())),
        Line::from(""),
        Line::from(Span::styled(
            " Tap a plot number to plant or harvest.",
            Style::default().fg(Color::Gray),
        )),
    ]
}

fn shop_lines(state: &FarmState) -> Vec<Line<'static>> {
    let player = &state.player;
    CropKind::all()
        .iter()
        .map(|crop| {
            let unlocked = player.level >= crop.level_req();
            let affordable = player.money >= crop.cost();
            let detail = if unlocked {
                format!(
                    "${}  {}  sells ${}",
                    crop.cost(),
                    format_duration(crop.grow_ms()),
                    crop.sell_price()
                )
            } else {
                format!("Lv.{} required", crop.level_req())
            };
            let color = if unlocked && affordable {
                Color::White
            } else {
                Color::DarkGray
            };
            Line::from(vec![
                key_span(crop.index()),
                Span::styled(
                    format!("{} {:<10} ", crop.icon(), crop.name()),
                    Style::default().fg(color),
                ),
                Span::styled(detail, Style::default().fg(Color::Gray)),
            ])
        })
        .collect()
}

fn inventory_lines(state: &FarmState) -> Vec<Line<'static>> {
    CropKind::all()
        .iter()
        .map(|crop| {
            let count = state.inventory.crop_count(*crop);
            let color = if count > 0 { Color::White } else { Color::DarkGray };
            Line::from(vec![
                key_span(crop.index()),
                Span::styled(
                    format!("{} {:<10} x{:<3}", crop.icon(), crop.name(), count),
                    Style::default().fg(color),
                ),
                Span::styled(
                    format!(" sell all ${}", count as u64 * crop.sell_price()),
                    Style::default().fg(Color::Yellow),
                ),
            ])
        })
        .collect()
}

fn seed_lines(state: &FarmState) -> Vec<Line<'static>> {
    CropKind::all()
        .iter()
        .map(|crop| {
            let seeds = state.inventory.seed_count(*crop);
            let color = if seeds > 0 { Color::White } else { Color::DarkGray };
            Line::from(vec![
                key_span(crop.index()),
                Span::styled(
                    format!("{} {:<10} seeds: {}", crop.icon(), crop.name(), seeds),
                    Style::default().fg(color),
                ),
                Span::styled(
                    format!("  {}", crop.description()),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        })
        .collect()
}

fn reset_lines() -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(
            " This deletes your farm, money and progress.",
            Style::default().fg(Color::White),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                " [y] ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::raw("Reset everything   "),
            Span::styled(
                "[n] ",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
            Span::raw("Keep playing"),
        ]),
    ]
}

// ── Toasts & help ──────────────────────────────────────────────────────

fn render_toasts<S: SaveStorage, C: Clock>(
    game: &FarmGame<S, C>,
    f: &mut Frame,
    area: Rect,
    borders: Borders,
) {
    let items: Vec<ListItem> = game
        .toasts()
        .iter()
        .map(|t| {
            let color = match t.kind {
                ToastKind::Info => Color::White,
                ToastKind::Success => Color::Green,
                ToastKind::Error => Color::Red,
            };
            ListItem::new(Line::from(Span::styled(
                format!(" {}", t.text),
                Style::default().fg(color),
            )))
        })
        .collect();

    let block = Block::default()
        .borders(borders)
        .border_style(Style::default().fg(Color::DarkGray));
    f.render_widget(List::new(items).block(block), area);
}

fn help_text(screen: Screen) -> &'static str {
    match screen {
        Screen::Farm => "[1-9] plot  [s] shop  [i] barn  [v/m/a] settings  [r] reset",
        Screen::Shop => "[1-6] buy seed  [i] barn  [Esc] farm",
        Screen::Inventory => "[1-6] sell all  [s] shop  [Esc] farm",
        Screen::SeedPicker { .. } => "[1-6] plant  [s] shop  [Esc] cancel",
        Screen::ConfirmReset => "[y] reset  [n] cancel",
    }
}

fn render_help(screen: Screen, f: &mut Frame, area: Rect, borders: Borders) {
    let widget = Paragraph::new(Line::from(Span::styled(
        help_text(screen),
        Style::default().fg(Color::DarkGray),
    )))
    .block(Block::default().borders(borders))
    .alignment(Alignment::Center);
    f.render_widget(widget, area);
}

// ── Formatting helpers ─────────────────────────────────────────────────

/// `fraction` (0.0..=1.0) as a fixed-width block bar.
pub fn progress_bar(fraction: f64, width: usize) -> String {
    let filled = ((fraction.clamp(0.0, 1.0)) * width as f64).round() as usize;
    "█".repeat(filled) + &"░".repeat(width - filled)
}

/// Remaining grow time: `45s`, `2:05`, `1h 30m`.
pub fn format_duration(ms: u64) -> String {
    let secs = ms.div_ceil(1000);
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}:{:02}", secs / 60, secs % 60)
    } else {
        format!("{}h {:02}m", secs / 3600, (secs % 3600) / 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_bar_fills_proportionally() {
        assert_eq!(progress_bar(0.0, 4), "░░░░");
        assert_eq!(progress_bar(0.5, 4), "██░░");
        assert_eq!(progress_bar(1.0, 4), "████");
    }

    #[test]
    fn progress_bar_clamps_out_of_range() {
        assert_eq!(progress_bar(3.0, 3), "███");
        assert_eq!(progress_bar(-1.0, 3), "░░░");
    }

    #[test]
    fn durations_round_up_to_whole_seconds() {
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(4_001), "5s");
        assert_eq!(format_duration(125_000), "2:05");
        assert_eq!(format_duration(5_400_000), "1h 30m");
    }

    #[test]
    fn every_screen_has_help() {
        for screen in [
            Screen::Farm,
            Screen::Shop,
            Screen::Inventory,
            Screen::SeedPicker { plot: 0 },
            Screen::ConfirmReset,
        ] {
            assert!(!help_text(screen).is_empty());
        }
    }

    #[test]
    fn shop_lists_every_crop() {
        let state = FarmState::new(0);
        assert_eq!(shop_lines(&state).len(), CropKind::all().len());
    }
}

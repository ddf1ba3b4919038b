//! UI rendering functions for the TUI.

use crate::format::duration_to_time_string;
use crate::player::PlayerState;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use super::state::App;
use super::types::{Focus, Screen};
use crate::types::Episode;

/// Draw the UI.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let size = frame.area();
    let player = app.player.state();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(5), // Player bar
            Constraint::Length(3), // Footer
        ])
        .split(size);

    draw_header(frame, chunks[0]);

    match app.screen {
        Screen::Loading => draw_loading(frame, app, chunks[1]),
        Screen::Home => draw_home(frame, app, &player, chunks[1]),
        Screen::Detail => draw_detail(frame, app, chunks[1]),
    }

    draw_player_bar(frame, &player, chunks[2]);
    draw_footer(frame, app, chunks[3]);

    if let Some(error) = &app.error_message {
        draw_error_popup(frame, error);
    }

    if app.show_help {
        draw_help_modal(frame);
    }
}

fn draw_header(frame: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "podcastr",
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            "O melhor para você ouvir, sempre",
            Style::default().fg(Color::DarkGray),
        ),
    ]))
    .block(Block::default().borders(Borders::ALL));

    frame.render_widget(header, area);
}

fn draw_loading(frame: &mut Frame, app: &App, area: Rect) {
    let loading = Paragraph::new(app.loading_message.as_str())
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL).title("Loading"))
        .wrap(Wrap { trim: true });

    frame.render_widget(loading, area);
}

/// Marker for the episode the player has selected.
fn is_current(player: &PlayerState, episode: &Episode) -> bool {
    player
        .current_episode()
        .map(|current| current.url == episode.url)
        .unwrap_or(false)
}

fn episode_list<'a>(
    episodes: &'a [Episode],
    player: &PlayerState,
    title: &'a str,
    focused: bool,
) -> List<'a> {
    let items: Vec<ListItem> = episodes
        .iter()
        .map(|episode| {
            let marker = if is_current(player, episode) { "♪ " } else { "  " };
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(marker, Style::default().fg(Color::Green)),
                    Span::styled(
                        episode.title.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                ]),
                Line::from(Span::styled(
                    format!(
                        "  {}  {}  {}",
                        episode.members, episode.published_at, episode.duration_as_string
                    ),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
        })
        .collect();

    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(border_style),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ")
}

fn render_section(
    frame: &mut Frame,
    list: List,
    area: Rect,
    state: &mut ListState,
    focused: bool,
) {
    if focused {
        frame.render_stateful_widget(list, area, state);
    } else {
        // Keep the position but hide the highlight.
        let mut unfocused = ListState::default().with_offset(state.offset());
        frame.render_stateful_widget(list, area, &mut unfocused);
    }
}

fn draw_home(frame: &mut Frame, app: &mut App, player: &PlayerState, area: Rect) {
    if app.listing.is_empty() {
        let empty = Paragraph::new("No episodes yet.\n\nPress 'r' to reload.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title("Episodes"));
        frame.render_widget(empty, area);
        return;
    }

    // Two lines per episode plus borders, never taller than the content area.
    let latest_height = u16::try_from(app.listing.latest.len())
        .unwrap_or(u16::MAX)
        .saturating_mul(2)
        .saturating_add(2)
        .min(area.height);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(latest_height), Constraint::Min(0)])
        .split(area);

    let latest = episode_list(
        &app.listing.latest,
        player,
        "Últimos episódios",
        app.focus == Focus::Latest,
    );
    render_section(
        frame,
        latest,
        chunks[0],
        &mut app.latest_list_state,
        app.focus == Focus::Latest,
    );

    let all = episode_list(
        &app.listing.all,
        player,
        "Todos episódios",
        app.focus == Focus::All,
    );
    render_section(
        frame,
        all,
        chunks[1],
        &mut app.all_list_state,
        app.focus == Focus::All,
    );
}

fn draw_detail(frame: &mut Frame, app: &App, area: Rect) {
    let Some(episode) = &app.detail else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(0)])
        .split(area);

    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            episode.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(episode.members.clone()),
        Line::from(Span::styled(
            format!("{}  ·  {}", episode.published_at, episode.duration_as_string),
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .block(Block::default().borders(Borders::ALL).title("Episódio"))
    .wrap(Wrap { trim: true });

    frame.render_widget(header, chunks[0]);

    let description = Paragraph::new(episode.plain_description())
        .block(Block::default().borders(Borders::ALL).title("Descrição"))
        .wrap(Wrap { trim: false })
        .scroll((app.detail_scroll, 0));

    frame.render_widget(description, chunks[1]);
}

fn flag(label: &str, on: bool) -> Span<'_> {
    if on {
        Span::styled(
            format!("[{}]", label),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(format!("[{}]", label), Style::default().fg(Color::DarkGray))
    }
}

fn nav(label: &str, enabled: bool) -> Span<'_> {
    if enabled {
        Span::raw(label)
    } else {
        Span::styled(label, Style::default().fg(Color::DarkGray))
    }
}

fn draw_player_bar(frame: &mut Frame, player: &PlayerState, area: Rect) {
    let now_playing = match player.current_episode() {
        Some(episode) => Line::from(vec![
            Span::styled(
                if player.is_playing() { "▶ " } else { "⏸ " },
                Style::default().fg(Color::Green),
            ),
            Span::styled(
                episode.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(episode.members.clone(), Style::default().fg(Color::DarkGray)),
            Span::raw("  "),
            Span::raw(duration_to_time_string(episode.duration)),
        ]),
        None => Line::from(Span::styled(
            "Selecione um podcast para ouvir",
            Style::default().fg(Color::DarkGray),
        )),
    };

    let queue = if player.episode_list().is_empty() {
        String::new()
    } else {
        format!(
            "  {}/{}",
            player.current_episode_index() + 1,
            player.episode_list().len()
        )
    };

    let controls = Line::from(vec![
        nav("⏮ b", player.has_previous()),
        Span::raw("  "),
        nav("n ⏭", player.has_next()),
        Span::raw("  "),
        flag("play", player.is_playing()),
        Span::raw(" "),
        flag("loop", player.is_looping()),
        Span::raw(" "),
        flag("shuffle", player.is_shuffling()),
        Span::styled(queue, Style::default().fg(Color::DarkGray)),
    ]);

    let bar = Paragraph::new(vec![now_playing, Line::raw(""), controls])
        .block(Block::default().borders(Borders::ALL).title("Tocando agora"));

    frame.render_widget(bar, area);
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let hints = match app.screen {
        Screen::Home => "Enter: play queue | p: play one | o: details | Tab: section | r: reload | ?: help | q: quit",
        Screen::Detail => "Enter/p: play | j/k: scroll | Esc: back | ?: help | q: quit",
        Screen::Loading => "q: quit",
    };

    let text = match &app.status_message {
        Some(status) => format!("{} | {}", status, hints),
        None => hints.to_string(),
    };

    let footer = Paragraph::new(text)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(footer, area);
}

fn draw_error_popup(frame: &mut Frame, error: &str) {
    let area = centered_rect(60, 20, frame.area());
    frame.render_widget(Clear, area);

    let popup = Paragraph::new(error)
        .style(Style::default().fg(Color::Red))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Error")
                .border_style(Style::default().fg(Color::Red)),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(popup, area);
}

fn draw_help_modal(frame: &mut Frame) {
    let area = centered_rect(50, 60, frame.area());
    frame.render_widget(Clear, area);

    let help = Paragraph::new(
        "Navigation\n\
        j/k or arrows  Move\n\
        Tab            Switch section\n\
        o              Episode details\n\
        Esc            Back\n\
        r              Reload episodes\n\n\
        Player\n\
        Enter          Play queue from here\n\
        p              Play this episode only\n\
        Space          Play/pause\n\
        n / b          Next / previous\n\
        l              Loop\n\
        s              Shuffle\n\
        c              Clear queue\n\n\
        ?              Close help",
    )
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("Help")
            .border_style(Style::default().fg(Color::Cyan)),
    );

    frame.render_widget(help, area);
}

/// Helper to create a centered rectangle.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

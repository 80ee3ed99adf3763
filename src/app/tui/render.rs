use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, Wrap};

use crate::episode::{Episode, truncate};
use crate::player::{AudioOutput, OutputState, Player};
use crate::session::PlaybackSession;

use super::{DetailState, ListState, ViewState};

pub(super) fn draw_tui<O: AudioOutput>(frame: &mut Frame, view: &mut ViewState, player: &Player<O>) {
    let bg = Block::default().style(Style::default().bg(Color::Black));
    frame.render_widget(bg, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(7),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let episodes = view.list.episodes();
    let selected_text = view
        .table_state
        .selected()
        .map(|idx| (idx + 1).to_string())
        .unwrap_or_else(|| "-".to_string());
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "PODCASTR",
            Style::default()
                .fg(Color::Rgb(145, 100, 250))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("   ", Style::default()),
        Span::styled(
            format!("{} episodes", episodes.len()),
            Style::default().fg(Color::Rgb(185, 195, 210)),
        ),
        Span::styled("   ", Style::default()),
        Span::styled(
            format!("selected {selected_text}"),
            Style::default().fg(Color::Rgb(185, 195, 210)),
        ),
    ]))
    .alignment(Alignment::Center)
    .block(panel_block("Latest releases"));
    frame.render_widget(header, chunks[0]);

    let body_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);

    let playing_id = player.session().current_episode().map(|ep| ep.id.as_str());
    let rows: Vec<Row> = episodes
        .iter()
        .map(|episode| {
            let marker = if Some(episode.id.as_str()) == playing_id {
                "♪"
            } else {
                " "
            };
            Row::new(vec![
                Cell::from(marker),
                Cell::from(episode.title.clone()),
                Cell::from(episode.members.clone()),
                Cell::from(episode.published_display()),
                Cell::from(episode.duration_display()),
            ])
        })
        .collect();
    let list_title = match &view.list {
        ListState::Loading => "Episodes (loading...)",
        ListState::Ready(_) => "Episodes",
        ListState::Failed(_) => "Episodes (unavailable)",
    };
    let table = Table::new(
        rows,
        [
            Constraint::Length(1),
            Constraint::Percentage(45),
            Constraint::Percentage(30),
            Constraint::Length(10),
            Constraint::Length(9),
        ],
    )
    .header(
        Row::new(vec!["", "Title", "Members", "Date", "Duration"]).style(
            Style::default()
                .fg(Color::Rgb(145, 100, 250))
                .add_modifier(Modifier::BOLD),
        ),
    )
    .block(panel_block(list_title))
    .row_highlight_style(
        Style::default()
            .bg(Color::Rgb(145, 100, 250))
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("▸ ");
    frame.render_stateful_widget(table, body_chunks[0], &mut view.table_state);

    let (side_title, side_text) = side_panel(view);
    let side = Paragraph::new(side_text)
        .style(Style::default().fg(Color::Rgb(230, 230, 230)))
        .wrap(Wrap { trim: false })
        .block(panel_block(side_title));
    frame.render_widget(side, body_chunks[1]);

    let now_playing = Paragraph::new(now_playing_text(player.session(), player.output_state()))
        .style(Style::default().fg(Color::Rgb(230, 230, 230)))
        .block(panel_block("Now playing"));
    frame.render_widget(now_playing, chunks[2]);

    let controls = Paragraph::new(controls_line(player.session()))
        .alignment(Alignment::Center)
        .block(panel_block("Controls"));
    frame.render_widget(controls, chunks[3]);

    let status_widget = Paragraph::new(view.status.clone())
        .style(status_style(&view.status))
        .block(panel_block("Status"));
    frame.render_widget(status_widget, chunks[4]);
}

fn side_panel(view: &ViewState) -> (&'static str, String) {
    if let ListState::Failed(err) = &view.list {
        return (
            "Selected",
            format!("Could not load episodes.\n\n{err}\n\nPress r to retry."),
        );
    }
    let Some(episode) = view.selected_episode() else {
        return ("Selected", "No episode selected.".to_string());
    };

    if !view.show_detail {
        return ("Selected", summary_text(episode));
    }
    let text = match view.details.get(&episode.id) {
        Some(DetailState::Ready(detail)) => detail_text(detail),
        Some(DetailState::Failed(err)) => {
            format!(
                "{}\n\nDetails unavailable: {err}\nPress r to retry.",
                summary_text(episode)
            )
        }
        Some(DetailState::Loading) | None => {
            format!("{}\n\nLoading description...", summary_text(episode))
        }
    };
    ("Episode", text)
}

fn summary_text(episode: &Episode) -> String {
    format!(
        "Title\n{}\n\nMembers\n{}\n\nPublished\n{}\n\nDuration\n{}",
        truncate(&episode.title, 60),
        truncate(&episode.members, 60),
        episode.published_display(),
        episode.duration_display(),
    )
}

fn detail_text(episode: &Episode) -> String {
    format!(
        "{}\n\n{}\n\n{}",
        summary_text(episode),
        episode.thumbnail,
        episode.description
    )
}

pub(crate) fn now_playing_text(session: &PlaybackSession, output: &OutputState) -> String {
    let Some(episode) = session.current_episode() else {
        return "Nothing playing right now.\nSelect an episode to listen.".to_string();
    };
    let position = session.current_index().map(|idx| idx + 1).unwrap_or(0);
    let state = match output {
        OutputState::Finished => "Finished".to_string(),
        OutputState::Failed(reason) => format!("Output error: {}", truncate(reason, 60)),
        OutputState::Idle | OutputState::Active if session.is_playing() => "Playing".to_string(),
        OutputState::Idle | OutputState::Active => "Paused".to_string(),
    };
    format!(
        "{}\n{}\n{} | episode {} of {} | {}",
        truncate(&episode.title, 80),
        truncate(&episode.members, 80),
        episode.duration_display(),
        position,
        session.queue().len(),
        state
    )
}

fn panel_block(title: &'static str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(125, 135, 150)))
        .title(title)
}

fn pill(label: &'static str, active: bool) -> Span<'static> {
    let style = if active {
        Style::default()
            .bg(Color::Rgb(4, 211, 97))
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .bg(Color::Rgb(72, 82, 96))
            .fg(Color::Rgb(230, 235, 242))
    };
    Span::styled(label, style)
}

fn controls_line(session: &PlaybackSession) -> Line<'static> {
    let play_label = if session.is_playing() {
        " PAUSE "
    } else {
        " PLAY "
    };
    Line::from(vec![
        pill(" SHUFFLE ", session.is_shuffling()),
        Span::raw(" "),
        pill(" PREV ", false),
        Span::raw(" "),
        pill(play_label, session.is_playing()),
        Span::raw(" "),
        pill(" NEXT ", false),
        Span::raw(" "),
        pill(" LOOP ", session.is_looping()),
        Span::styled(
            "   Enter play list  p play one  space pause  n/b next/prev  s shuffle  l loop  d details  r reload  q quit",
            Style::default().fg(Color::Rgb(185, 195, 210)),
        ),
    ])
}

fn status_style(status: &str) -> Style {
    if status.starts_with("ERROR:") {
        Style::default()
            .fg(Color::Rgb(255, 145, 120))
            .add_modifier(Modifier::BOLD)
    } else if status.starts_with("INFO:") {
        Style::default().fg(Color::Rgb(205, 165, 255))
    } else {
        Style::default().fg(Color::Rgb(230, 235, 242))
    }
}

mod help;

use crate::cli::{self, Cli, PoolSource};
use crate::deck::{self, DeckController};
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

/// UI-side state. Owned by the render loop only; the deck itself lives
/// in the `DeckController`.
struct UiState {
    question: String,
    status: String,
    command: String,
    command_editing: bool,
    show_help: bool,
    deck_scroll: usize,
    /// Current text-source contents: re-read by Start / Reset, emptied
    /// by Clear.
    source_lines: Vec<String>,
}

pub fn run(args: Cli) -> Result<()> {
    let (lines, source) = cli::resolve_lines(&args)?;
    let mut deck = cli::build_controller(&args);

    let mut state = UiState {
        question: "Press Start / Reset to begin.".to_string(),
        status: "Not started".to_string(),
        command: String::new(),
        command_editing: false,
        show_help: false,
        deck_scroll: 0,
        source_lines: lines,
    };
    if source == PoolSource::Saved {
        state.question = "Loaded your saved questions. Press Start / Reset to begin.".to_string();
        state.status = "Loaded".to_string();
    }
    if args.start_on_launch {
        start_reset(&args, &mut deck, &mut state);
    }

    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).ok();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    let res = loop {
        if last_tick.elapsed() >= tick_rate {
            terminal.draw(|f| draw_ui(f.area(), f, &deck, &state)).ok();
            last_tick = Instant::now();
        }

        // Poll input with a short timeout to avoid blocking the render loop.
        if event::poll(Duration::from_millis(10)).unwrap_or(false) {
            if let Ok(Event::Key(k)) = event::read() {
                if k.kind != KeyEventKind::Press {
                    continue;
                }
                if (k.modifiers, k.code) == (KeyModifiers::CONTROL, KeyCode::Char('c')) {
                    break Ok(());
                }
                if state.show_help {
                    state.show_help = false;
                    continue;
                }
                if state.command_editing {
                    match k.code {
                        KeyCode::Esc => {
                            state.command_editing = false;
                            state.command.clear();
                        }
                        KeyCode::Enter => submit_command(&mut deck, &mut state),
                        KeyCode::Backspace => {
                            state.command.pop();
                        }
                        KeyCode::Char(ch) => state.command.push(ch),
                        _ => {}
                    }
                    continue;
                }
                match (k.modifiers, k.code) {
                    (_, KeyCode::Char('q')) => break Ok(()),
                    (_, KeyCode::Char('?')) => state.show_help = true,
                    (_, KeyCode::Char('s')) => start_reset(&args, &mut deck, &mut state),
                    (_, KeyCode::Char('f')) => finish_deck(&mut deck, &mut state),
                    (_, KeyCode::Char('c')) => clear_deck(&args, &mut deck, &mut state),
                    (_, KeyCode::Enter) | (_, KeyCode::Char('d')) | (_, KeyCode::Char(' ')) => {
                        draw_one(&mut deck, &mut state)
                    }
                    (_, KeyCode::Char('i')) | (_, KeyCode::Char('/')) => {
                        state.command_editing = true
                    }
                    (_, KeyCode::Up) => state.deck_scroll = state.deck_scroll.saturating_sub(1),
                    (_, KeyCode::Down) => state.deck_scroll = state.deck_scroll.saturating_add(1),
                    _ => {}
                }
            }
        }
    };

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    res
}

/// Enter in the command box: "finish" stops the deck, anything else is
/// discarded and draws.
fn submit_command(deck: &mut DeckController, state: &mut UiState) {
    let cmd = state.command.trim().to_lowercase();
    state.command.clear();
    if cmd == "finish" {
        finish_deck(deck, state);
    } else {
        draw_one(deck, state);
    }
}

/// Re-read the text source and begin a fresh cycle.
fn start_reset(args: &Cli, deck: &mut DeckController, state: &mut UiState) {
    let outcome = deck.initialize(state.source_lines.clone());
    cli::save_after_init(args, deck.pool());
    state.question = outcome.message().to_string();
    state.status = outcome.status();
    state.deck_scroll = 0;
}

fn draw_one(deck: &mut DeckController, state: &mut UiState) {
    match deck.draw() {
        Ok(out) => {
            state.status = out.status();
            state.question = out.question;
        }
        // Rejected draws change the question box only.
        Err(e) => state.question = e.message().to_string(),
    }
}

fn finish_deck(deck: &mut DeckController, state: &mut UiState) {
    deck.finish();
    state.question = deck::FINISHED_MESSAGE.to_string();
    state.status = "Stopped".to_string();
}

fn clear_deck(args: &Cli, deck: &mut DeckController, state: &mut UiState) {
    deck.clear();
    state.source_lines.clear();
    cli::delete_after_clear(args);
    state.question = deck::CLEARED_MESSAGE.to_string();
    state.status = "Not started".to_string();
    state.deck_scroll = 0;
}

fn draw_ui(area: Rect, f: &mut Frame, deck: &DeckController, state: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(7),
            Constraint::Length(10),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(area);

    let title = Line::from(vec![
        Span::styled(
            "question-deck-cli",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(state.status.as_str(), Style::default().fg(Color::Gray)),
    ]);
    f.render_widget(Paragraph::new(title), chunks[0]);

    let question = Paragraph::new(state.question.as_str())
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Question"));
    f.render_widget(question, chunks[1]);

    render_deck_pane(chunks[2], f, deck, state);
    render_command_box(chunks[3], f, state);

    let footer = Line::from(vec![
        Span::styled("Enter", Style::default().fg(Color::Magenta)),
        Span::raw(" draw  "),
        Span::styled("s", Style::default().fg(Color::Magenta)),
        Span::raw(" start/reset  "),
        Span::styled("f", Style::default().fg(Color::Magenta)),
        Span::raw(" finish  "),
        Span::styled("c", Style::default().fg(Color::Magenta)),
        Span::raw(" clear  "),
        Span::styled("i", Style::default().fg(Color::Magenta)),
        Span::raw(" command  "),
        Span::styled("?", Style::default().fg(Color::Magenta)),
        Span::raw(" help  "),
        Span::styled("q", Style::default().fg(Color::Magenta)),
        Span::raw(" quit"),
    ]);
    f.render_widget(Paragraph::new(footer), chunks[4]);

    if state.show_help {
        let rect = centered_rect(52, 14, area);
        f.render_widget(Clear, rect);
        help::draw_help(rect, f);
    }
}

fn render_deck_pane(area: Rect, f: &mut Frame, deck: &DeckController, state: &UiState) {
    let visible = area.height.saturating_sub(2).max(1) as usize;
    let total = deck.pool().len();
    let scroll = state.deck_scroll.min(total.saturating_sub(visible));

    let lines: Vec<Line> = deck
        .pool()
        .iter()
        .enumerate()
        .skip(scroll)
        .take(visible)
        .map(|(i, q)| {
            Line::from(vec![
                Span::styled(
                    format!("{:>3}. ", i + 1),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(q.as_str()),
            ])
        })
        .collect();

    let title = format!("Deck ({} questions, {} remaining)", total, deck.remaining());
    let pane = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(pane, area);
}

fn render_command_box(area: Rect, f: &mut Frame, state: &UiState) {
    let (text, style, border) = if state.command_editing {
        (
            state.command.as_str(),
            Style::default(),
            Style::default().fg(Color::Yellow),
        )
    } else {
        (
            "press i to type a command; Enter draws, 'finish' stops",
            Style::default().fg(Color::DarkGray),
            Style::default(),
        )
    };
    let pane = Paragraph::new(Span::styled(text, style)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title("Command"),
    );
    f.render_widget(pane, area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

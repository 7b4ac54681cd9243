//! UI rendering for the flashcard study tool.

use crate::app::{App, View};
use crate::config::Theme;
use crate::models::StudyMode;
use crate::similarity::AnswerTier;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Paragraph, Row, Table, Wrap},
    Frame,
};

/// Theme-dependent colors.
struct Palette {
    text: Color,
    dim: Color,
    accent: Color,
    good: Color,
    warn: Color,
    bad: Color,
    highlight: Color,
}

fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Dark => Palette {
            text: Color::White,
            dim: Color::DarkGray,
            accent: Color::Cyan,
            good: Color::Green,
            warn: Color::Yellow,
            bad: Color::Red,
            highlight: Color::DarkGray,
        },
        Theme::Light => Palette {
            text: Color::Black,
            dim: Color::DarkGray,
            accent: Color::Blue,
            good: Color::Green,
            warn: Color::Yellow,
            bad: Color::Red,
            highlight: Color::Gray,
        },
    }
}

pub fn draw(f: &mut Frame, app: &mut App) {
    match app.view {
        View::Load => draw_load(f, app),
        View::ModeSelect => draw_mode_select(f, app),
        View::Study => {
            if app.session.is_complete() {
                draw_complete(f, app);
            } else {
                draw_study(f, app);
            }
        }
    }

    if app.show_help {
        draw_help(f, app);
    }

    if app.editing {
        draw_path_prompt(f, app);
    }

    if let Some(msg) = &app.message {
        draw_message(f, app, msg);
    }
}

fn frame_chunks(f: &Frame) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area())
}

fn draw_load(f: &mut Frame, app: &App) {
    let pal = palette(app.config.theme);
    let chunks = frame_chunks(f);

    let header = Paragraph::new("Flashcard Study")
        .style(Style::default().fg(pal.text).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, chunks[0]);

    if app.store.files().is_empty() {
        let msg = Paragraph::new("No card files loaded.\n\nPress 'a' and enter the path of a two-column CSV file\n(question,answer per line).")
            .alignment(Alignment::Center)
            .style(Style::default().fg(pal.dim))
            .block(Block::default().borders(Borders::ALL).title(" Files "));
        f.render_widget(msg, chunks[1]);
    } else {
        let items: Vec<ListItem> = app
            .store
            .files()
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let style = if i == app.selected_file {
                    Style::default().bg(pal.highlight).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                let spans = vec![
                    Span::styled(entry.name.clone(), style.fg(pal.text)),
                    Span::raw(" - "),
                    Span::styled(
                        format!("{} cards", entry.count),
                        Style::default().fg(pal.accent),
                    ),
                ];
                ListItem::new(Line::from(spans)).style(style)
            })
            .collect();

        let title = format!(" Files ({} cards total) ", app.store.len());
        let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(list, chunks[1]);
    }

    draw_footer(
        f,
        app,
        chunks[2],
        "a:Add file  j/k:Navigate  d:Remove  c:Clear  Enter:Start  t:Theme  ?:Help  q:Quit",
    );
}

fn draw_mode_select(f: &mut Frame, app: &App) {
    let pal = palette(app.config.theme);
    let chunks = frame_chunks(f);

    let header = Paragraph::new(format!("Choose a study mode - {} cards", app.store.len()))
        .style(Style::default().fg(pal.text).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, chunks[0]);

    let items: Vec<ListItem> = StudyMode::ALL
        .iter()
        .enumerate()
        .map(|(i, mode)| {
            let style = if i == app.selected_mode {
                Style::default().bg(pal.highlight).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let spans = vec![
                Span::styled(format!("{}. ", i + 1), Style::default().fg(pal.dim)),
                Span::styled(mode.name(), style.fg(pal.accent)),
                Span::raw("  "),
                Span::styled(mode.description(), Style::default().fg(pal.dim)),
            ];
            ListItem::new(Line::from(spans)).style(style)
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(" Modes "));
    f.render_widget(list, chunks[1]);

    draw_footer(
        f,
        app,
        chunks[2],
        "j/k:Navigate  Enter:Start  1-3:Start mode  Esc:Back  t:Theme  ?:Help  q:Quit",
    );
}

fn draw_study(f: &mut Frame, app: &App) {
    let pal = palette(app.config.theme);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // progress
            Constraint::Min(0),    // card
            Constraint::Length(3), // keys
        ])
        .split(f.area());

    // Progress: learned share of the deck, not position.
    if app.config.display.show_progress {
        let label = format!(
            "Card {} of {} | Learned {} | Remaining {}",
            app.session.index() + 1,
            app.session.total(),
            app.session.learned_count(),
            app.session.total() - app.session.learned_count(),
        );
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL))
            .gauge_style(Style::default().fg(pal.accent))
            .ratio(app.session.progress())
            .label(label);
        f.render_widget(gauge, chunks[0]);
    } else {
        let line = Paragraph::new(format!(
            "Card {} of {}",
            app.session.index() + 1,
            app.session.total()
        ))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(line, chunks[0]);
    }

    let card_area = chunks[1];
    if app.session.flipped() {
        let inner = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(card_area);

        let question = Paragraph::new(app.question_text())
            .alignment(Alignment::Center)
            .style(Style::default().fg(pal.text))
            .block(Block::default().borders(Borders::ALL).title(" Question "))
            .wrap(Wrap { trim: true });
        f.render_widget(question, inner[0]);

        // In quiz mode the answer is colored by how close the typed answer
        // came; otherwise it is simply the "answer" color.
        let (answer_color, answer_title) = match app.last_check {
            Some(check) => {
                let color = match check.tier {
                    AnswerTier::Good => pal.good,
                    AnswerTier::Partial => pal.warn,
                    AnswerTier::Poor => pal.bad,
                };
                (color, format!(" Answer - {} ", check.tier.name()))
            }
            None => (pal.good, " Answer ".to_string()),
        };
        let answer = Paragraph::new(app.answer_text())
            .alignment(Alignment::Center)
            .style(Style::default().fg(answer_color))
            .block(Block::default().borders(Borders::ALL).title(answer_title))
            .wrap(Wrap { trim: true });
        f.render_widget(answer, inner[1]);
    } else if app.session.awaiting_answer() {
        let inner = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(card_area);

        let question = Paragraph::new(app.question_text())
            .alignment(Alignment::Center)
            .style(Style::default().fg(pal.text))
            .block(Block::default().borders(Borders::ALL).title(" Question "))
            .wrap(Wrap { trim: true });
        f.render_widget(question, inner[0]);

        let input = Paragraph::new(app.quiz_input.as_str())
            .style(Style::default().fg(pal.warn))
            .block(Block::default().borders(Borders::ALL).title(" Your answer "));
        f.render_widget(input, inner[1]);
        f.set_cursor_position((
            inner[1].x + 1 + app.quiz_input.len() as u16,
            inner[1].y + 1,
        ));
    } else {
        let question = Paragraph::new(app.question_text())
            .alignment(Alignment::Center)
            .style(Style::default().fg(pal.text))
            .block(Block::default().borders(Borders::ALL).title(" Question "))
            .wrap(Wrap { trim: true });
        f.render_widget(question, card_area);
    }

    let keys = if app.session.awaiting_answer() {
        vec![
            ("Ctrl+Enter", "Check answer", pal.accent),
            ("Esc", "Back", pal.dim),
        ]
    } else if app.session.flipped() {
        vec![
            ("1", "Again", pal.bad),
            ("2", "Hard", pal.warn),
            ("3", "Good", pal.good),
            ("4", "Easy", pal.accent),
            ("→", "Good", pal.good),
        ]
    } else {
        vec![
            ("Space", "Show answer", pal.text),
            ("←/→", "Prev/Next", pal.dim),
            ("s", "Shuffle", pal.dim),
            ("Esc", "Back", pal.dim),
        ]
    };

    let key_spans: Vec<Span> = keys
        .iter()
        .flat_map(|(key, label, color)| {
            vec![
                Span::styled(
                    format!("[{}]", key),
                    Style::default().fg(*color).add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(" {}   ", label)),
            ]
        })
        .collect();
    let key_line = Paragraph::new(Line::from(key_spans))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(key_line, chunks[2]);
}

fn draw_complete(f: &mut Frame, app: &App) {
    let pal = palette(app.config.theme);
    let chunks = frame_chunks(f);

    let header = Paragraph::new("Session complete!")
        .style(Style::default().fg(pal.good).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, chunks[0]);

    // Again is tracked but deliberately not shown in the summary.
    let stats = app.session.stats();
    let rows = vec![
        Row::new(vec!["Easy".to_string(), stats.easy.to_string()])
            .style(Style::default().fg(pal.accent)),
        Row::new(vec!["Good".to_string(), stats.good.to_string()])
            .style(Style::default().fg(pal.good)),
        Row::new(vec!["Hard".to_string(), stats.hard.to_string()])
            .style(Style::default().fg(pal.warn)),
    ];
    let table = Table::new(rows, [Constraint::Percentage(50), Constraint::Percentage(50)])
        .header(
            Row::new(vec!["Rating", "Count"])
                .style(Style::default().fg(pal.text).add_modifier(Modifier::BOLD)),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} cards studied ", app.session.total())),
        );
    f.render_widget(table, chunks[1]);

    draw_footer(f, app, chunks[2], "r:Restart  u:Back to files  q:Quit");
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect, text: &str) {
    if !app.config.display.show_keys {
        f.render_widget(Block::default().borders(Borders::ALL), area);
        return;
    }
    let pal = palette(app.config.theme);
    let footer = Paragraph::new(text)
        .style(Style::default().fg(pal.dim))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, area);
}

fn draw_help(f: &mut Frame, app: &App) {
    let pal = palette(app.config.theme);
    let area = centered_rect(60, 80, f.area());
    f.render_widget(Clear, area);

    let help = r#"
Flashcard Study Keybindings

Files:
  a               Add card file(s) by path
  j/k, Up/Down    Navigate files
  d, x            Remove selected file
  c               Clear all files
  Enter, Space    Continue to mode selection

Study:
  Space, Enter    Flip card
  Left            Previous card
  Right           Rate Good if flipped, else next card
  1/2/3/4         Again / Hard / Good / Easy (when flipped)
  s               Shuffle remaining order
  Esc             Back to mode selection
  Ctrl+Enter      Check answer (quiz mode)

General:
  t               Toggle dark/light theme
  ?               Show this help
  q               Quit

Press any key to close
"#;

    let popup = Paragraph::new(help)
        .style(Style::default().fg(pal.text))
        .block(Block::default().borders(Borders::ALL).title(" Help "))
        .wrap(Wrap { trim: false });
    f.render_widget(popup, area);
}

fn draw_path_prompt(f: &mut Frame, app: &App) {
    let pal = palette(app.config.theme);
    let area = centered_rect(60, 15, f.area());
    f.render_widget(Clear, area);

    let input = Paragraph::new(app.input_buffer.as_str())
        .style(Style::default().fg(pal.warn))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Card file path(s) "),
        );
    f.render_widget(input, area);
    f.set_cursor_position((area.x + 1 + app.input_buffer.len() as u16, area.y + 1));
}

fn draw_message(f: &mut Frame, app: &App, msg: &str) {
    let pal = palette(app.config.theme);
    let area = Rect::new(
        f.area().x + 2,
        f.area().height.saturating_sub(5),
        f.area().width.saturating_sub(4),
        3,
    );
    f.render_widget(Clear, area);

    let message = Paragraph::new(msg)
        .style(Style::default().fg(pal.accent))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(message, area);
}

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

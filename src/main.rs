mod app;
mod event;
mod logging;
mod ui;

use std::io::{self, Read};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};
use tracing::info;

use typen::config::Config;
use typen::engine::metrics::format_duration;
use typen::extract::{self, DocumentExtractor};
use typen::session::SessionStatus;
use typen::store::json_store::JsonStore;
use typen::store::Library;

use app::{App, AppScreen, ImportMode, StatusKind};
use event::{AppEvent, EventHandler};
use ui::components::dashboard::Dashboard;
use ui::components::library_list::LibraryList;
use ui::components::progress_bar::ProgressBar;
use ui::components::selection_list::SelectionList;
use ui::components::stats_sidebar::{StatsSidebar, compact_summary};
use ui::components::typing_area::TypingArea;
use ui::layout::{AppLayout, pack_hint_lines};
use ui::line_input::LineInput;
use ui::theme::ThemeColors;

#[derive(Parser)]
#[command(name = "typen", version, about = "Typing practice on your own documents")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "Minimum characters a text needs to be accepted")]
    min_chars: Option<usize>,

    #[arg(short, long, action = ArgAction::Count, help = "Log verbosity (-v info, -vv debug, -vvv trace)")]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Import a .txt, .md, .pdf, .doc or .docx file into the library
    Add {
        path: PathBuf,
        #[arg(long)]
        title: Option<String>,
    },
    /// Import text read from stdin
    Paste {
        #[arg(long)]
        title: Option<String>,
    },
    /// List library texts, newest first
    List,
    /// Remove a text by id
    Remove { id: String },
    /// Show recent practice results
    History {
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init(&JsonStore::default_dir(), cli.verbose)?;

    let mut config = Config::load().unwrap_or_default();
    if let Some(min_chars) = cli.min_chars {
        config.min_content_chars = min_chars;
        config.validate();
    }

    if let Some(command) = cli.command {
        return run_command(command, &config);
    }

    let mut app = App::new(config);
    if let Some(theme_name) = cli.theme {
        if !app.use_theme(&theme_name) {
            app.set_error(format!("Unknown theme \"{theme_name}\""));
        }
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(app.config.tick_rate_ms));
    info!("terminal session started");

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_command(command: Command, config: &Config) -> Result<()> {
    let store = JsonStore::new(config.keep_results)?;
    let mut library = Library::load(&store);

    match command {
        Command::Add { path, title } => {
            let extractor = DocumentExtractor::from_config(config);
            let mut text = extract::import_document(&extractor, &path, config)?;
            if let Some(title) = title.filter(|t| !t.trim().is_empty()) {
                text.title = title.trim().to_string();
            }
            println!("Added {} \"{}\" ({} words)", text.id, text.title, text.word_count());
            library.append(text);
            library.save(&store)?;
        }
        Command::Paste { title } => {
            let mut raw = String::new();
            io::stdin().read_to_string(&mut raw)?;
            let text = extract::import_pasted(&raw, title.as_deref().unwrap_or(""), config)?;
            println!("Added {} \"{}\" ({} words)", text.id, text.title, text.word_count());
            library.append(text);
            library.save(&store)?;
        }
        Command::List => {
            for text in library.newest_first() {
                println!(
                    "{}  {}  {:>6} words  {}",
                    text.id,
                    text.created_at.format("%Y-%m-%d"),
                    text.word_count(),
                    text.title
                );
            }
        }
        Command::Remove { id } => match library.remove(&id) {
            Some(removed) => {
                library.save(&store)?;
                println!("Removed \"{}\"", removed.title);
            }
            None => bail!("no text with id {id}"),
        },
        Command::History { limit } => {
            let results = store.load_results();
            for result in results.iter().rev().take(limit) {
                let title = library.get(&result.text_id).map_or("(removed)", |t| t.title.as_str());
                println!(
                    "{}  {:>4} wpm  {:>3}%  {:>6}  {}",
                    result.timestamp.format("%Y-%m-%d %H:%M"),
                    result.wpm,
                    result.accuracy,
                    format_duration(result.duration),
                    title
                );
            }
        }
    }
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        // Extraction blocks, so it runs after the "working" frame is on screen.
        if app.pending_import.is_some() {
            app.process_pending_import();
            continue;
        }

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Paste(text) => app.handle_paste(&text),
            AppEvent::Tick => app.tick(Instant::now()),
            AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Library => handle_library_key(app, key),
        AppScreen::Import => handle_import_key(app, key),
        AppScreen::Selection => handle_selection_key(app, key),
        AppScreen::Practice => handle_practice_key(app, key),
        AppScreen::Result => handle_result_key(app, key),
    }
}

fn handle_library_key(app: &mut App, key: KeyEvent) {
    if app.confirm_delete {
        match key.code {
            KeyCode::Char('y') => app.delete_selected(),
            _ => app.confirm_delete = false,
        }
        return;
    }

    let len = app.library.len();
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.library_cursor.prev(len),
        KeyCode::Down | KeyCode::Char('j') => app.library_cursor.next(len),
        KeyCode::Enter => app.open_selected(),
        KeyCode::Char('i') => app.go_to_import(ImportMode::File),
        KeyCode::Char('p') => app.go_to_import(ImportMode::Paste),
        KeyCode::Char('d') | KeyCode::Delete if len > 0 => app.confirm_delete = true,
        KeyCode::Char('t') => app.cycle_theme(),
        _ => {}
    }
}

fn handle_import_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('l') if app.import.mode == ImportMode::Paste => {
                app.clear_pasted();
                return;
            }
            KeyCode::Char('o') => {
                let mode = match app.import.mode {
                    ImportMode::File => ImportMode::Paste,
                    ImportMode::Paste => ImportMode::File,
                };
                app.go_to_import(mode);
                return;
            }
            _ => {}
        }
    }
    app.handle_import_key(key);
}

fn handle_selection_key(app: &mut App, key: KeyEvent) {
    let prompt_open = app
        .selection
        .as_ref()
        .is_some_and(|s| s.range_prompt.is_some());
    if prompt_open {
        app.handle_range_prompt_key(key);
        return;
    }

    let Some(sel) = app.selection.as_mut() else {
        return;
    };
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);
    match key.code {
        KeyCode::Esc => app.go_to_library(),
        KeyCode::Up | KeyCode::Char('k') => sel.move_cursor(false),
        KeyCode::Down | KeyCode::Char('j') => sel.move_cursor(true),
        KeyCode::Char(' ') => sel.model.toggle(sel.cursor, shift),
        KeyCode::Char('v') => sel.model.toggle(sel.cursor, true),
        KeyCode::Char('a') => sel.model.select_all(),
        KeyCode::Char('c') => sel.model.clear(),
        KeyCode::Char('r') => app.open_range_prompt(),
        KeyCode::Enter => app.confirm_selection(),
        _ => {}
    }
}

fn handle_practice_key(app: &mut App, key: KeyEvent) {
    let now = Instant::now();
    match key.code {
        KeyCode::Esc => app.exit_session(),
        KeyCode::Tab => app.toggle_pause(now),
        _ => app.handle_practice_key(&key, now),
    }
}

fn handle_result_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q') => app.go_to_library(),
        _ => {}
    }
}

// --- Rendering ---

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Library => render_library(frame, app),
        AppScreen::Import => render_import(frame, app),
        AppScreen::Selection => render_selection(frame, app),
        AppScreen::Practice => render_practice(frame, app),
        AppScreen::Result => render_result(frame, app),
    }
}

/// Header, body and a two-line footer for the non-practice screens.
fn screen_layout(area: Rect) -> (Rect, Rect, Rect) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(2),
        ])
        .split(area);
    (layout[0], layout[1], layout[2])
}

fn render_header(frame: &mut ratatui::Frame, area: Rect, app: &App, info: &str) {
    let colors = &app.theme.colors;
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " typen ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            info.to_string(),
            Style::default()
                .fg(colors.text_pending())
                .bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

/// Status message on the first line, key hints packed below it.
fn render_footer(frame: &mut ratatui::Frame, area: Rect, app: &App, hints: &[&str]) {
    let colors = &app.theme.colors;
    let mut lines = Vec::new();
    if let Some(status) = &app.status {
        let color = match status.kind {
            StatusKind::Info => colors.success(),
            StatusKind::Error => colors.error(),
        };
        lines.push(Line::from(Span::styled(
            format!("  {}", status.text),
            Style::default().fg(color),
        )));
    }
    let room = (area.height as usize).saturating_sub(lines.len());
    for hint_line in pack_hint_lines(hints, area.width as usize)
        .into_iter()
        .take(room)
    {
        lines.push(Line::from(Span::styled(
            hint_line,
            Style::default().fg(colors.text_pending()),
        )));
    }
    frame.render_widget(Paragraph::new(lines), area);
}

fn input_line<'a>(label: &'a str, input: &'a LineInput, colors: &ThemeColors) -> Line<'a> {
    let (before, cursor_ch, after) = input.render_parts();
    let cursor = cursor_ch.map_or(" ".to_string(), |c| c.to_string());
    Line::from(vec![
        Span::styled(label, Style::default().fg(colors.accent())),
        Span::styled(before, Style::default().fg(colors.fg())),
        Span::styled(
            cursor,
            Style::default()
                .fg(colors.text_cursor_fg())
                .bg(colors.text_cursor_bg()),
        ),
        Span::styled(after, Style::default().fg(colors.fg())),
    ])
}

fn render_library(frame: &mut ratatui::Frame, app: &App) {
    let (header, body, footer) = screen_layout(frame.area());

    let info = format!(
        "| {} texts | {} sessions | theme: {}",
        app.library.len(),
        app.history.len(),
        app.theme.name
    );
    render_header(frame, header, app, &info);

    frame.render_widget(
        LibraryList::new(&app.library, app.library_cursor.selected, &app.theme),
        body,
    );

    if app.confirm_delete {
        let title = app.selected_text().map_or("", |t| t.title.as_str());
        let prompt = format!("Delete \"{title}\"? [y] Yes  [any key] No");
        render_footer(frame, footer, app, &[&prompt]);
    } else {
        render_footer(
            frame,
            footer,
            app,
            &[
                "[Enter] Open",
                "[i] Import file",
                "[p] Paste text",
                "[d] Delete",
                "[t] Theme",
                "[q] Quit",
            ],
        );
    }
}

fn render_import(frame: &mut ratatui::Frame, app: &App) {
    let (header, body, footer) = screen_layout(frame.area());
    let colors = &app.theme.colors;

    let (mode_label, hints): (&str, &[&str]) = match app.import.mode {
        ImportMode::File => (
            "| Import a document",
            &["[Enter] Import", "[Tab] Complete path", "[Ctrl+O] Paste text instead", "[Esc] Cancel"],
        ),
        ImportMode::Paste => (
            "| Paste text",
            &["[Enter] Save", "[Ctrl+L] Clear pasted text", "[Ctrl+O] Import a file instead", "[Esc] Cancel"],
        ),
    };
    render_header(frame, header, app, mode_label);

    let area = ui::layout::centered_rect(70, 60, body);
    let block = Block::bordered()
        .border_style(Style::default().fg(colors.border_focused()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![Line::from("")];
    match app.import.mode {
        ImportMode::File => {
            lines.push(input_line("  Path: ", &app.import.path, colors));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "  Plain text (.txt .md) is read directly. PDF and Word files are",
                Style::default().fg(colors.text_pending()),
            )));
            lines.push(Line::from(Span::styled(
                format!(
                    "  sent to {} for text extraction.",
                    app.config.extraction_model
                ),
                Style::default().fg(colors.text_pending()),
            )));
            if app.import.path.completion_error {
                lines.push(Line::from(Span::styled(
                    "  Cannot read that directory.",
                    Style::default().fg(colors.error()),
                )));
            }
        }
        ImportMode::Paste => {
            lines.push(input_line("  Title: ", &app.import.title, colors));
            lines.push(Line::from(""));
            let pasted = &app.import.pasted;
            if pasted.is_empty() {
                lines.push(Line::from(Span::styled(
                    "  Paste text into the terminal to add it here.",
                    Style::default().fg(colors.text_pending()),
                )));
            } else {
                lines.push(Line::from(Span::styled(
                    format!("  {} characters pasted:", pasted.chars().count()),
                    Style::default().fg(colors.accent()),
                )));
                for preview in pasted.lines().filter(|l| !l.trim().is_empty()).take(
                    (inner.height as usize).saturating_sub(5),
                ) {
                    lines.push(Line::from(Span::styled(
                        format!("  {}", preview.trim()),
                        Style::default().fg(colors.fg()),
                    )));
                }
            }
        }
    }
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);

    render_footer(frame, footer, app, hints);
}

fn render_selection(frame: &mut ratatui::Frame, app: &App) {
    let Some(sel) = app.selection.as_ref() else {
        return;
    };
    let (header, body, footer) = screen_layout(frame.area());

    let selected_words: usize = sel
        .model
        .selected()
        .into_iter()
        .map(|i| sel.model.paragraph_words(i))
        .sum();
    render_header(
        frame,
        header,
        app,
        &format!("| Choose paragraphs | {selected_words} words selected"),
    );

    frame.render_widget(
        SelectionList::new(&sel.model, sel.cursor, &sel.title, &app.theme),
        body,
    );

    if let Some(prompt) = &sel.range_prompt {
        let colors = &app.theme.colors;
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(footer);
        frame.render_widget(
            Paragraph::new(input_line("  Range (from-to): ", prompt, colors)),
            layout[0],
        );
        render_footer(frame, layout[1], app, &["[Enter] Apply", "[Esc] Cancel"]);
        return;
    }

    let confirm_hint = if sel.model.can_confirm() {
        "[Enter] Start"
    } else {
        "[Enter] Start (select a paragraph first)"
    };
    render_footer(
        frame,
        footer,
        app,
        &[
            confirm_hint,
            "[Space] Toggle",
            "[Shift+Space/v] Range",
            "[r] Range by number",
            "[a] All",
            "[c] Clear",
            "[Esc] Back",
        ],
    );
}

fn render_practice(frame: &mut ratatui::Frame, app: &App) {
    let Some(session) = app.session.as_ref() else {
        return;
    };
    let area = frame.area();
    let colors = &app.theme.colors;
    let app_layout = AppLayout::new(area);
    let metrics = session.live_metrics();
    let paused = session.status() == SessionStatus::Paused;

    let mut header_spans = vec![Span::styled(
        format!(" {} ", session.title()),
        Style::default()
            .fg(colors.header_fg())
            .bg(colors.header_bg())
            .add_modifier(Modifier::BOLD),
    )];
    if !app_layout.tier.show_sidebar() {
        header_spans.push(Span::styled(
            compact_summary(&metrics),
            Style::default().fg(colors.accent()).bg(colors.header_bg()),
        ));
    }
    if paused {
        header_spans.push(Span::styled(
            " PAUSED: press Tab to resume ",
            Style::default()
                .fg(colors.bg())
                .bg(colors.accent())
                .add_modifier(Modifier::BOLD),
        ));
    }
    let header = Paragraph::new(Line::from(header_spans))
        .block(Block::bordered().border_style(Style::default().fg(colors.border())))
        .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, app_layout.header);

    frame.render_widget(
        TypingArea::new(session.drill(), &app.theme, paused),
        app_layout.main,
    );

    if let Some(sidebar_area) = app_layout.sidebar {
        frame.render_widget(
            StatsSidebar::new(metrics, session.status(), &app.theme),
            sidebar_area,
        );
    }

    if let Some(progress_area) = app_layout.progress {
        frame.render_widget(
            ProgressBar::new(session.drill(), &app.theme),
            progress_area,
        );
    }

    let pause_hint = if paused { "[Tab] Resume" } else { "[Tab] Pause" };
    render_footer(
        frame,
        app_layout.footer,
        app,
        &[pause_hint, "[Esc] Stop", "[Enter] Line break"],
    );
}

fn render_result(frame: &mut ratatui::Frame, app: &App) {
    let Some(result) = app.last_result.as_ref() else {
        return;
    };
    let (_, body, footer) = screen_layout(frame.area());
    let centered = ui::layout::centered_rect(50, 50, body);
    frame.render_widget(
        Dashboard::new(result, app.active_title(), app.previous_best, &app.theme),
        centered,
    );
    render_footer(frame, footer, app, &["[Enter] Back to library"]);
}

use std::fmt::Display;
use std::path::PathBuf;
use std::time::Instant;

use crossterm::event::KeyEvent;
use tracing::{info, warn};

use typen::config::Config;
use typen::error::PracticeError;
use typen::extract::{self, DocumentExtractor, Extractor};
use typen::session::input::process_key;
use typen::session::selection::parse_range;
use typen::session::{KeyOutcome, PracticeResult, PracticeSession, SelectionModel, SessionStatus};
use typen::store::json_store::JsonStore;
use typen::store::{Library, ResultSink, SourceText};

use crate::ui::components::library_list::LibraryCursor;
use crate::ui::line_input::{Completion, InputResult, LineInput};
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Library,
    Import,
    Selection,
    Practice,
    Result,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImportMode {
    File,
    Paste,
}

pub struct ImportState {
    pub mode: ImportMode,
    pub path: LineInput,
    pub title: LineInput,
    pub pasted: String,
}

impl ImportState {
    fn new(mode: ImportMode) -> Self {
        Self {
            mode,
            path: LineInput::new("", Completion::Documents),
            title: LineInput::new("", Completion::Off),
            pasted: String::new(),
        }
    }
}

/// Paragraph picking for one library text.
pub struct SelectionState {
    pub text_id: String,
    pub title: String,
    pub model: SelectionModel,
    pub cursor: usize,
    pub range_prompt: Option<LineInput>,
}

impl SelectionState {
    pub fn move_cursor(&mut self, down: bool) {
        let len = self.model.len();
        if len == 0 {
            return;
        }
        self.cursor = if down {
            (self.cursor + 1).min(len - 1)
        } else {
            self.cursor.saturating_sub(1)
        };
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

#[derive(Clone, Debug)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

pub struct App {
    pub screen: AppScreen,
    pub config: Config,
    pub theme: Theme,
    pub library: Library,
    pub library_cursor: LibraryCursor,
    pub confirm_delete: bool,
    pub import: ImportState,
    pub selection: Option<SelectionState>,
    pub session: Option<PracticeSession>,
    pub last_result: Option<PracticeResult>,
    /// Best WPM on the same text before `last_result`.
    pub previous_best: Option<u32>,
    pub history: Vec<PracticeResult>,
    pub status: Option<StatusMessage>,
    /// File waiting to be extracted once the "working" frame has been drawn.
    pub pending_import: Option<PathBuf>,
    pub should_quit: bool,
    /// Where a theme change is saved.
    pub config_path: PathBuf,
    store: Option<JsonStore>,
    extractor: Box<dyn Extractor>,
}

impl App {
    pub fn new(config: Config) -> Self {
        let store = JsonStore::new(config.keep_results)
            .map_err(|e| warn!(error = %e, "data directory unavailable, nothing will be saved"))
            .ok();
        let extractor = Box::new(DocumentExtractor::from_config(&config));
        Self::with_parts(config, store, extractor)
    }

    pub fn with_parts(
        config: Config,
        store: Option<JsonStore>,
        extractor: Box<dyn Extractor>,
    ) -> Self {
        let theme = Theme::load(&config.theme).unwrap_or_default();
        let library = store.as_ref().map(|s| Library::load(s)).unwrap_or_default();
        let history = store.as_ref().map(|s| s.load_results()).unwrap_or_default();
        info!(texts = library.len(), results = history.len(), "library loaded");

        Self {
            screen: AppScreen::Library,
            config,
            theme,
            library,
            library_cursor: LibraryCursor::default(),
            confirm_delete: false,
            import: ImportState::new(ImportMode::File),
            selection: None,
            session: None,
            last_result: None,
            previous_best: None,
            history,
            status: None,
            pending_import: None,
            should_quit: false,
            config_path: Config::config_path(),
            store,
            extractor,
        }
    }

    pub fn set_info(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            kind: StatusKind::Info,
            text: text.into(),
        });
    }

    pub fn set_error(&mut self, err: impl Display) {
        self.status = Some(StatusMessage {
            kind: StatusKind::Error,
            text: err.to_string(),
        });
    }

    pub fn go_to_library(&mut self) {
        self.screen = AppScreen::Library;
        self.confirm_delete = false;
        self.selection = None;
        self.session = None;
    }

    pub fn selected_text(&self) -> Option<&SourceText> {
        self.library.nth_newest(self.library_cursor.selected)
    }

    // --- Library ---

    pub fn open_selected(&mut self) {
        let Some(text) = self.selected_text() else {
            return;
        };
        let model = SelectionModel::from_content(&text.content);
        if model.is_empty() {
            self.set_error(PracticeError::EmptyContent);
            return;
        }
        self.selection = Some(SelectionState {
            text_id: text.id.clone(),
            title: text.title.clone(),
            model,
            cursor: 0,
            range_prompt: None,
        });
        self.status = None;
        self.screen = AppScreen::Selection;
    }

    pub fn delete_selected(&mut self) {
        self.confirm_delete = false;
        let Some(id) = self.selected_text().map(|t| t.id.clone()) else {
            return;
        };
        if let Some(removed) = self.library.remove(&id) {
            info!(id = %removed.id, "text removed");
            self.save_library();
            self.set_info(format!("Removed \"{}\"", removed.title));
        }
        self.library_cursor.clamp(self.library.len());
    }

    fn save_library(&mut self) {
        let saved = match &self.store {
            Some(store) => self.library.save(store),
            None => Ok(()),
        };
        if let Err(e) = saved {
            warn!(error = %e, "failed to save library");
            self.set_error(format!("Could not save the library: {e}"));
        }
    }

    fn add_text(&mut self, text: SourceText) {
        let title = text.title.clone();
        self.library.append(text);
        self.save_library();
        self.library_cursor.selected = 0;
        self.screen = AppScreen::Library;
        if self.status.as_ref().is_none_or(|s| s.kind != StatusKind::Error) {
            self.set_info(format!("Added \"{title}\""));
        }
    }

    /// Switch to a theme for this run only. Returns false for unknown names.
    pub fn use_theme(&mut self, name: &str) -> bool {
        match Theme::load(name) {
            Some(theme) => {
                self.theme = theme;
                self.config.theme = name.to_string();
                true
            }
            None => false,
        }
    }

    /// Move to the next theme and remember it in the config file. Other
    /// in-memory settings, such as command line overrides, are not written.
    pub fn cycle_theme(&mut self) {
        let next = Theme::next_name(&self.config.theme);
        if self.use_theme(&next) {
            if let Err(e) = Config::save_theme(&self.config_path, &next) {
                warn!(error = %e, "failed to save config");
            }
        }
    }

    // --- Import ---

    pub fn go_to_import(&mut self, mode: ImportMode) {
        self.import = ImportState::new(mode);
        self.status = None;
        self.screen = AppScreen::Import;
    }

    pub fn handle_import_key(&mut self, key: KeyEvent) {
        let field = match self.import.mode {
            ImportMode::File => &mut self.import.path,
            ImportMode::Paste => &mut self.import.title,
        };
        match field.handle(key) {
            InputResult::Continue => {}
            InputResult::Cancel => self.go_to_library(),
            InputResult::Submit => match self.import.mode {
                ImportMode::File => self.queue_file_import(),
                ImportMode::Paste => self.submit_paste(),
            },
        }
    }

    pub fn clear_pasted(&mut self) {
        self.import.pasted.clear();
    }

    fn queue_file_import(&mut self) {
        let raw = self.import.path.value().trim();
        if raw.is_empty() {
            return;
        }
        let path = match raw.strip_prefix("~/").zip(dirs::home_dir()) {
            Some((rest, home)) => home.join(rest),
            None => PathBuf::from(raw),
        };
        self.set_info(format!("Extracting text from {}\u{2026}", path.display()));
        self.pending_import = Some(path);
    }

    /// Run a queued extraction. Blocks until the extractor returns.
    pub fn process_pending_import(&mut self) {
        let Some(path) = self.pending_import.take() else {
            return;
        };
        self.status = None;
        match extract::import_document(self.extractor.as_ref(), &path, &self.config) {
            Ok(text) => self.add_text(text),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "import failed");
                self.set_error(e);
            }
        }
    }

    fn submit_paste(&mut self) {
        match extract::import_pasted(&self.import.pasted, self.import.title.value(), &self.config) {
            Ok(text) => {
                self.status = None;
                self.add_text(text);
            }
            Err(e) => self.set_error(e),
        }
    }

    /// Bracketed paste goes to whichever field is taking text.
    pub fn handle_paste(&mut self, text: &str) {
        match self.screen {
            AppScreen::Import => match self.import.mode {
                ImportMode::File => self.import.path.insert_str(text.trim()),
                ImportMode::Paste => self.import.pasted.push_str(text),
            },
            AppScreen::Selection => {
                if let Some(prompt) = self.selection.as_mut().and_then(|s| s.range_prompt.as_mut())
                {
                    prompt.insert_str(text.trim());
                }
            }
            _ => {}
        }
    }

    // --- Selection ---

    pub fn open_range_prompt(&mut self) {
        if let Some(sel) = self.selection.as_mut() {
            sel.range_prompt = Some(LineInput::new("", Completion::Off));
        }
    }

    pub fn handle_range_prompt_key(&mut self, key: KeyEvent) {
        let Some(sel) = self.selection.as_mut() else {
            return;
        };
        let Some(prompt) = sel.range_prompt.as_mut() else {
            return;
        };
        match prompt.handle(key) {
            InputResult::Continue => {}
            InputResult::Cancel => sel.range_prompt = None,
            InputResult::Submit => match parse_range(prompt.value()) {
                Some((from, to)) => {
                    sel.model.apply_range(from, to);
                    sel.range_prompt = None;
                    self.status = None;
                }
                None => self.set_error("Enter a range such as 2-5."),
            },
        }
    }

    pub fn confirm_selection(&mut self) {
        let Some(sel) = self.selection.as_ref() else {
            return;
        };
        let started = sel
            .model
            .confirm()
            .and_then(|practice| PracticeSession::start(&sel.text_id, &sel.title, &practice));
        match started {
            Ok(session) => {
                self.session = Some(session);
                self.selection = None;
                self.status = None;
                self.screen = AppScreen::Practice;
            }
            Err(e) => self.set_error(e),
        }
    }

    // --- Practice ---

    pub fn handle_practice_key(&mut self, key: &KeyEvent, now: Instant) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let KeyOutcome::Finished(result) = process_key(session, key, now) {
            self.finish_session(result);
        }
    }

    pub fn toggle_pause(&mut self, now: Instant) {
        if let Some(session) = self.session.as_mut() {
            session.toggle_pause(now);
        }
    }

    pub fn exit_session(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.exit();
        }
        self.go_to_library();
    }

    pub fn tick(&mut self, now: Instant) {
        if let Some(session) = self.session.as_mut() {
            if session.status() == SessionStatus::Running {
                session.tick(now);
            }
        }
    }

    fn finish_session(&mut self, result: PracticeResult) {
        self.previous_best = self
            .history
            .iter()
            .filter(|r| r.text_id == result.text_id)
            .map(|r| r.wpm)
            .max();
        if let Some(store) = &self.store {
            if let Err(e) = store.record(&result) {
                warn!(error = %e, "failed to record result");
                self.set_error(format!("Could not save the result: {e}"));
            }
        }
        self.history.push(result.clone());
        let excess = self.history.len().saturating_sub(self.config.keep_results);
        self.history.drain(..excess);
        self.last_result = Some(result);
        self.screen = AppScreen::Result;
    }

    /// Title of the text behind the current session or last result.
    pub fn active_title(&self) -> &str {
        if let Some(session) = &self.session {
            return session.title();
        }
        self.last_result
            .as_ref()
            .and_then(|r| self.library.get(&r.text_id))
            .map_or("", |t| t.title.as_str())
    }
}

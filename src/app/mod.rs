mod fetch;
mod store;

use crate::domain::Selection;
use crate::infra::FilesApi;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::PathBuf;
use thiserror::Error;

pub use fetch::*;
pub use store::*;

const PAGE_STEP: usize = 10;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Dropdown state. Entry 0 is "All files"; entry `i + 1` is `files[i]`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SelectorOverlay {
    pub highlighted: usize,
}

impl SelectorOverlay {
    pub fn selection(&self, files: &[String]) -> Selection {
        match self.highlighted.checked_sub(1).and_then(|index| files.get(index)) {
            Some(file) => Selection::File(file.clone()),
            None => Selection::All,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppModel {
    pub state: FilesState,
    pub api_url: String,
    pub selector: Option<SelectorOverlay>,
    pub table_selected: usize,
    /// First visible table row; the renderer writes it back each frame.
    pub table_offset: usize,
    pub help_open: bool,
    pub notice: Option<String>,
    pub log_path: Option<PathBuf>,
}

impl AppModel {
    pub fn new(api_url: &str) -> Self {
        Self {
            state: FilesState::default(),
            api_url: api_url.to_string(),
            selector: None,
            table_selected: 0,
            table_offset: 0,
            help_open: false,
            notice: None,
            log_path: None,
        }
    }

    pub fn with_log_path(mut self, log_path: Option<PathBuf>) -> Self {
        self.log_path = log_path;
        self
    }

    pub fn with_notice(mut self, notice: Option<String>) -> Self {
        self.notice = notice;
        self
    }

    fn selector_len(&self) -> usize {
        self.state.files.len() + 1
    }

    fn selection_index(&self) -> usize {
        match self.state.selected.file() {
            Some(file) => self
                .state
                .files
                .iter()
                .position(|known| known == file)
                .map(|index| index + 1)
                .unwrap_or(0),
            None => 0,
        }
    }

    fn clamp(&mut self) {
        self.table_selected = self
            .table_selected
            .min(self.state.rows.len().saturating_sub(1));
        let selector_max = self.selector_len().saturating_sub(1);
        if let Some(selector) = self.selector.as_mut() {
            selector.highlighted = selector.highlighted.min(selector_max);
        }
    }
}

#[derive(Clone, Debug)]
pub enum AppEvent {
    Mounted,
    Key(KeyEvent),
    Fetched(FetchResult),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AppCommand {
    None,
    Quit,
    Fetch(FetchRequest),
}

impl From<Option<FetchRequest>> for AppCommand {
    fn from(request: Option<FetchRequest>) -> Self {
        match request {
            Some(request) => Self::Fetch(request),
            None => Self::None,
        }
    }
}

pub fn update(model: AppModel, event: AppEvent) -> (AppModel, AppCommand) {
    match event {
        AppEvent::Mounted => (model, AppCommand::Fetch(FetchRequest::ListFiles)),
        AppEvent::Key(key) => update_on_key(model, key),
        AppEvent::Fetched(result) => update_on_fetched(model, result),
    }
}

/// Runs one request against the API. Called from worker threads.
pub fn execute(api: &dyn FilesApi, request: FetchRequest) -> FetchResult {
    match request {
        FetchRequest::ListFiles => FetchResult::FilesListed(list_files(api)),
        FetchRequest::FetchAll { generation, files } => FetchResult::AllFetched {
            generation,
            outcome: fetch_all(api, &files),
        },
        FetchRequest::FetchOne { generation, file } => {
            let result = fetch_one(api, &file);
            FetchResult::OneFetched {
                generation,
                file,
                result,
            }
        }
    }
}

fn update_on_fetched(model: AppModel, result: FetchResult) -> (AppModel, AppCommand) {
    let mut model = model;
    let listed = matches!(result, FetchResult::FilesListed(_));
    let follow_up = model.state.apply(result);
    if listed && model.notice.as_deref() == Some(REFRESH_NOTICE) {
        model.notice = None;
    }
    model.clamp();
    (model, follow_up.into())
}

const REFRESH_NOTICE: &str = "Refreshing file list...";

fn update_on_key(model: AppModel, key: KeyEvent) -> (AppModel, AppCommand) {
    let mut model = model;

    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
    {
        return (model, AppCommand::Quit);
    }

    if model.help_open {
        if matches!(
            key.code,
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Enter
        ) {
            model.help_open = false;
        }
        return (model, AppCommand::None);
    }

    if model.selector.is_some() {
        return update_selector_on_key(model, key);
    }

    if matches!(key.code, KeyCode::Char('r') | KeyCode::Char('R')) {
        model.notice = Some(REFRESH_NOTICE.to_string());
        return (model, AppCommand::Fetch(FetchRequest::ListFiles));
    }

    let row_count = model.state.rows.len();
    let last_row = row_count.saturating_sub(1);
    match key.code {
        KeyCode::Char('q') => return (model, AppCommand::Quit),
        KeyCode::F(1) | KeyCode::Char('?') => model.help_open = true,
        KeyCode::Enter | KeyCode::Char('f') => {
            model.selector = Some(SelectorOverlay {
                highlighted: model.selection_index(),
            });
        }
        KeyCode::Up => model.table_selected = model.table_selected.saturating_sub(1),
        KeyCode::Down => model.table_selected = (model.table_selected + 1).min(last_row),
        KeyCode::PageUp => model.table_selected = model.table_selected.saturating_sub(PAGE_STEP),
        KeyCode::PageDown => {
            model.table_selected = (model.table_selected + PAGE_STEP).min(last_row)
        }
        KeyCode::Home => model.table_selected = 0,
        KeyCode::End => model.table_selected = last_row,
        _ => {}
    }
    (model, AppCommand::None)
}

fn update_selector_on_key(model: AppModel, key: KeyEvent) -> (AppModel, AppCommand) {
    let mut model = model;
    let last = model.selector_len().saturating_sub(1);
    let Some(selector) = model.selector.as_mut() else {
        return (model, AppCommand::None);
    };

    match key.code {
        KeyCode::Esc => model.selector = None,
        KeyCode::Up => selector.highlighted = selector.highlighted.saturating_sub(1),
        KeyCode::Down => selector.highlighted = (selector.highlighted + 1).min(last),
        KeyCode::Home => selector.highlighted = 0,
        KeyCode::End => selector.highlighted = last,
        KeyCode::Enter | KeyCode::Char(' ') => {
            let selection = selector.selection(&model.state.files);
            model.selector = None;
            model.table_selected = 0;
            let request = model.state.select(selection);
            return (model, AppCommand::Fetch(request));
        }
        _ => {}
    }
    (model, AppCommand::None)
}

use crate::app::FetchAllOutcome;
use crate::domain::{FileName, Row, Selection};
use time::OffsetDateTime;
use tracing::{debug, warn};

/// A unit of network work for a background worker. Data fetches carry the
/// generation they were issued under.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FetchRequest {
    ListFiles,
    FetchAll {
        generation: u64,
        files: Vec<FileName>,
    },
    FetchOne {
        generation: u64,
        file: FileName,
    },
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FetchResult {
    FilesListed(Result<Vec<FileName>, String>),
    AllFetched {
        generation: u64,
        outcome: FetchAllOutcome,
    },
    OneFetched {
        generation: u64,
        file: FileName,
        result: Result<Vec<Row>, String>,
    },
}

/// File list, selection and table rows, plus the loading/error flags that
/// track the two dependent calls.
///
/// Every data fetch bumps `generation`; a result only commits when it carries
/// the latest generation, so a slow superseded request cannot overwrite the
/// rows of a newer one.
#[derive(Clone, Debug, Default)]
pub struct FilesState {
    pub files: Vec<FileName>,
    pub selected: Selection,
    pub rows: Vec<Row>,
    pub loading: bool,
    pub error: Option<String>,
    pub loaded_at: Option<OffsetDateTime>,
    generation: u64,
}

impl FilesState {
    pub fn begin_fetch_all(&mut self) -> FetchRequest {
        self.loading = true;
        self.error = None;
        self.generation += 1;
        FetchRequest::FetchAll {
            generation: self.generation,
            files: self.files.clone(),
        }
    }

    pub fn begin_fetch_one(&mut self, file: FileName) -> FetchRequest {
        self.loading = true;
        self.generation += 1;
        FetchRequest::FetchOne {
            generation: self.generation,
            file,
        }
    }

    /// Selecting `All` fetches every known file; a file fetches just that one.
    pub fn select(&mut self, selection: Selection) -> FetchRequest {
        self.selected = selection;
        if let Some(request) = self.reconcile_selection() {
            return request;
        }
        match self.selected.file() {
            Some(file) => {
                let file = file.to_string();
                self.begin_fetch_one(file)
            }
            None => self.begin_fetch_all(),
        }
    }

    /// A selected file that is no longer listed falls back to `All`.
    pub fn reconcile_selection(&mut self) -> Option<FetchRequest> {
        let file = self.selected.file()?;
        if self.files.iter().any(|known| known == file) {
            return None;
        }
        debug!(file = %file, "selected file no longer listed; showing all files");
        self.selected = Selection::All;
        Some(self.begin_fetch_all())
    }

    /// Applies a worker result; returns the follow-up request, if any.
    pub fn apply(&mut self, result: FetchResult) -> Option<FetchRequest> {
        match result {
            FetchResult::FilesListed(result) => self.apply_files_listed(result),
            FetchResult::AllFetched {
                generation,
                outcome,
            } => {
                self.apply_all_fetched(generation, outcome);
                None
            }
            FetchResult::OneFetched {
                generation,
                file,
                result,
            } => {
                self.apply_one_fetched(generation, &file, result);
                None
            }
        }
    }

    fn apply_files_listed(&mut self, result: Result<Vec<FileName>, String>) -> Option<FetchRequest> {
        match result {
            Ok(files) => {
                self.files = files;
                self.error = None;
                if self.files.is_empty() {
                    return self.reconcile_selection();
                }
                self.selected = Selection::All;
                Some(self.begin_fetch_all())
            }
            Err(message) => {
                self.error = Some(message);
                None
            }
        }
    }

    fn is_stale(&self, generation: u64) -> bool {
        if generation == self.generation {
            return false;
        }
        debug!(
            generation,
            latest = self.generation,
            "discarding superseded fetch result"
        );
        true
    }

    fn apply_all_fetched(&mut self, generation: u64, outcome: FetchAllOutcome) {
        if self.is_stale(generation) {
            return;
        }
        self.rows = outcome.rows;
        if let Some(error) = outcome.error {
            self.error = Some(error);
        }
        self.loading = false;
        self.loaded_at = Some(OffsetDateTime::now_utc());
    }

    fn apply_one_fetched(&mut self, generation: u64, file: &str, result: Result<Vec<Row>, String>) {
        if self.is_stale(generation) {
            return;
        }
        match result {
            Ok(rows) => {
                self.rows = rows;
                self.loaded_at = Some(OffsetDateTime::now_utc());
            }
            Err(message) => {
                warn!(file = %file, error = %message, "clearing rows after failed fetch");
                self.rows.clear();
            }
        }
        self.loading = false;
    }
}

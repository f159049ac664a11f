use crate::domain::{FileName, Row, flatten_groups};
use crate::infra::FilesApi;
use tracing::{info, warn};

/// Rows gathered by a fetch-all pass. `error` holds the last per-file failure.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FetchAllOutcome {
    pub rows: Vec<Row>,
    pub error: Option<String>,
}

pub fn list_files(api: &dyn FilesApi) -> Result<Vec<FileName>, String> {
    match api.list_files() {
        Ok(files) => {
            info!(count = files.len(), "listed files");
            Ok(files)
        }
        Err(error) => {
            warn!(%error, "failed to list files");
            Err(error.to_string())
        }
    }
}

/// Fetches every file one after another, in list order. A failing file is
/// skipped and the pass carries on.
pub fn fetch_all(api: &dyn FilesApi, files: &[FileName]) -> FetchAllOutcome {
    let mut outcome = FetchAllOutcome::default();
    for file in files {
        match api.file_data(file) {
            Ok(groups) => {
                let rows = flatten_groups(groups);
                info!(file = %file, rows = rows.len(), "fetched file data");
                outcome.rows.extend(rows);
            }
            Err(error) => {
                warn!(file = %file, %error, "failed to fetch file data");
                outcome.error = Some(format!("Error fetching data for {file}: {error}"));
            }
        }
    }
    outcome
}

pub fn fetch_one(api: &dyn FilesApi, file: &str) -> Result<Vec<Row>, String> {
    match api.file_data(file) {
        Ok(groups) => {
            let rows = flatten_groups(groups);
            info!(file = %file, rows = rows.len(), "fetched file data");
            Ok(rows)
        }
        Err(error) => {
            warn!(file = %file, %error, "failed to fetch file data");
            Err(error.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{FakeApi, group};

    fn names(values: &[&str]) -> Vec<FileName> {
        values.iter().map(|value| (*value).to_string()).collect()
    }

    #[test]
    fn list_failure_reduces_to_message() {
        let api = FakeApi::with_list_error("Network error");
        assert_eq!(
            list_files(&api),
            Err("request failed: Network error".to_string())
        );
    }

    #[test]
    fn fetch_all_walks_files_in_list_order() {
        let api = FakeApi::with_files(&["a.csv", "b.csv", "c.csv"])
            .data("a.csv", vec![group("a.csv", &[("x", 1, "1")])])
            .data("c.csv", vec![group("c.csv", &[("y", 2, "2"), ("z", 3, "3")])]);

        let outcome = fetch_all(&api, &names(&["a.csv", "b.csv", "c.csv"]));

        assert_eq!(api.calls(), vec!["data:a.csv", "data:b.csv", "data:c.csv"]);
        assert_eq!(outcome.error, None);
        let texts: Vec<&str> = outcome.rows.iter().map(|row| row.text.as_str()).collect();
        assert_eq!(texts, vec!["x", "y", "z"]);
    }

    #[test]
    fn fetch_all_keeps_going_after_a_failure_and_last_error_wins() {
        let api = FakeApi::with_files(&["a.csv", "b.csv", "c.csv"])
            .data_error("a.csv", "boom")
            .data("b.csv", vec![group("b.csv", &[("ok", 5, "5")])])
            .data_error("c.csv", "timeout");

        let outcome = fetch_all(&api, &names(&["a.csv", "b.csv", "c.csv"]));

        assert_eq!(api.calls().len(), 3);
        assert_eq!(outcome.rows.len(), 1);
        assert_eq!(outcome.rows[0].file_name, "b.csv");
        assert_eq!(
            outcome.error.as_deref(),
            Some("Error fetching data for c.csv: request failed: timeout")
        );
    }

    #[test]
    fn fetch_all_over_no_files_makes_no_requests() {
        let api = FakeApi::default();
        let outcome = fetch_all(&api, &[]);
        assert!(api.calls().is_empty());
        assert_eq!(outcome, FetchAllOutcome::default());
    }

    #[test]
    fn fetch_one_concatenates_every_returned_group() {
        let api = FakeApi::with_files(&["a.csv"]).data(
            "a.csv",
            vec![
                group("a.csv", &[("abc", 123, "0x123")]),
                group("a-part2.csv", &[("xyz", 456, "0x456")]),
            ],
        );

        let rows = fetch_one(&api, "a.csv").expect("rows");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].file_name, "a-part2.csv");
    }
}

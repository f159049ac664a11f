use crate::domain::{FileGroup, FileName, LineRecord};
use crate::infra::{FetchError, FilesApi};
use serde_json::Number;
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory `FilesApi` with canned responses; records every call in order.
#[derive(Default)]
pub struct FakeApi {
    list: Option<Result<Vec<FileName>, FetchError>>,
    data: HashMap<FileName, Result<Vec<FileGroup>, FetchError>>,
    calls: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn with_files(names: &[&str]) -> Self {
        Self {
            list: Some(Ok(names.iter().map(|name| (*name).to_string()).collect())),
            ..Self::default()
        }
    }

    pub fn with_list_error(message: &str) -> Self {
        Self {
            list: Some(Err(FetchError::Request(message.to_string()))),
            ..Self::default()
        }
    }

    pub fn data(mut self, file_name: &str, groups: Vec<FileGroup>) -> Self {
        self.data.insert(file_name.to_string(), Ok(groups));
        self
    }

    pub fn data_error(mut self, file_name: &str, message: &str) -> Self {
        self.data.insert(
            file_name.to_string(),
            Err(FetchError::Request(message.to_string())),
        );
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    fn record(&self, call: String) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl FilesApi for FakeApi {
    fn list_files(&self) -> Result<Vec<FileName>, FetchError> {
        self.record("list".to_string());
        self.list.clone().unwrap_or_else(|| Ok(Vec::new()))
    }

    fn file_data(&self, file_name: &str) -> Result<Vec<FileGroup>, FetchError> {
        self.record(format!("data:{file_name}"));
        self.data
            .get(file_name)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

pub fn group(file: &str, lines: &[(&str, i64, &str)]) -> FileGroup {
    FileGroup {
        file: file.to_string(),
        lines: lines
            .iter()
            .map(|(text, number, hex)| LineRecord {
                text: (*text).to_string(),
                number: Number::from(*number),
                hex: (*hex).to_string(),
            })
            .collect(),
    }
}

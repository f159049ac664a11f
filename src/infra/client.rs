use crate::domain::{FileGroup, FileName, decode_file_groups, normalize_file_list};
use crate::infra::ApiConfig;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

const BIN_NAME: &str = env!("CARGO_PKG_NAME");

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("server responded with status {0}")]
    Status(u16),

    #[error("invalid response body: {0}")]
    Decode(String),
}

impl From<ureq::Error> for FetchError {
    fn from(error: ureq::Error) -> Self {
        match error {
            ureq::Error::StatusCode(code) => Self::Status(code),
            other => Self::Request(other.to_string()),
        }
    }
}

/// The two backend calls the store depends on.
pub trait FilesApi: Send + Sync {
    fn list_files(&self) -> Result<Vec<FileName>, FetchError>;

    /// Groups for one file; an empty name asks the service for every file.
    fn file_data(&self, file_name: &str) -> Result<Vec<FileGroup>, FetchError>;
}

pub struct HttpFilesApi {
    config: ApiConfig,
    agent: ureq::Agent,
}

impl HttpFilesApi {
    pub fn new(config: ApiConfig) -> Self {
        let agent = make_agent(config.timeout);
        Self { config, agent }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn get_json(&self, url: &str, file_name: Option<&str>) -> Result<Value, FetchError> {
        let mut request = self.agent.get(url).header(
            "User-Agent",
            &format!("{BIN_NAME}/{}", env!("CARGO_PKG_VERSION")),
        );
        if let Some(authorization) = self.config.authorization() {
            request = request.header("Authorization", &authorization);
        }
        if let Some(name) = file_name.filter(|name| !name.is_empty()) {
            request = request.query("fileName", name);
        }

        let mut response = request.call()?;
        response
            .body_mut()
            .read_json::<Value>()
            .map_err(|error| FetchError::Decode(error.to_string()))
    }
}

impl FilesApi for HttpFilesApi {
    fn list_files(&self) -> Result<Vec<FileName>, FetchError> {
        let value = self.get_json(&self.config.list_url(), None)?;
        Ok(normalize_file_list(&value))
    }

    fn file_data(&self, file_name: &str) -> Result<Vec<FileGroup>, FetchError> {
        let value = self.get_json(&self.config.data_url(), Some(file_name))?;
        Ok(decode_file_groups(&value))
    }
}

fn make_agent(timeout: Duration) -> ureq::Agent {
    let config = ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .build();
    config.into()
}

use serde::Serialize;
use serde_json::Number;
use std::fmt;

pub type FileName = String;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LineRecord {
    pub text: String,
    pub number: Number,
    pub hex: String,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FileGroup {
    pub file: FileName,
    pub lines: Vec<LineRecord>,
}

/// One table row: a line record tagged with the file it came from.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Row {
    #[serde(rename = "fileName")]
    pub file_name: FileName,
    pub text: String,
    pub number: Number,
    pub hex: String,
}

impl Row {
    pub fn from_line(file_name: &str, line: LineRecord) -> Self {
        Self {
            file_name: file_name.to_string(),
            text: line.text,
            number: line.number,
            hex: line.hex,
        }
    }
}

/// Which files the table shows. `All` is the empty-string sentinel.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum Selection {
    #[default]
    All,
    File(FileName),
}

impl Selection {
    pub fn from_value(value: &str) -> Self {
        if value.is_empty() {
            Self::All
        } else {
            Self::File(value.to_string())
        }
    }

    pub fn as_value(&self) -> &str {
        match self {
            Self::All => "",
            Self::File(name) => name.as_str(),
        }
    }

    pub fn file(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::File(name) => Some(name.as_str()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::All => "All files",
            Self::File(name) => name.as_str(),
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

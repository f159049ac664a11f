use crate::app::{fetch_all, fetch_one, list_files};
use crate::domain::{Row, Selection};
use crate::infra::{ApiOverrides, FilesApi};
use std::io::{self, Write};
use thiserror::Error;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CliInvocation {
    PrintHelp,
    PrintVersion,
    Tui {
        api: ApiOverrides,
    },
    Command {
        api: ApiOverrides,
        command: CliCommand,
    },
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CliCommand {
    Files { json: bool },
    Rows { selection: Selection, json: bool },
}

#[derive(Debug, Error)]
pub enum CliParseError {
    #[error("unknown subcommand: {0}")]
    UnknownSubcommand(String),

    #[error("unknown flag: {0}")]
    UnknownFlag(String),

    #[error("missing value for flag: {0}")]
    MissingFlagValue(String),

    #[error("unexpected argument: {0}")]
    UnexpectedArgument(String),
}

#[derive(Debug, Error)]
pub enum CliRunError {
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),

    #[error("failed to encode json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Fetch(String),
}

pub fn parse_invocation(args: &[String]) -> Result<CliInvocation, CliParseError> {
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        return Ok(CliInvocation::PrintHelp);
    }
    if args.iter().any(|arg| arg == "--version" || arg == "-V") {
        return Ok(CliInvocation::PrintVersion);
    }

    let mut api = ApiOverrides::default();
    let mut subcommand: Option<String> = None;
    let mut positionals: Vec<String> = Vec::new();
    let mut json = false;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--api-url" => api.api_url = Some(flag_value(&mut iter, arg)?),
            "--token" => api.token = Some(flag_value(&mut iter, arg)?),
            "--json" => json = true,
            value if value.starts_with("--api-url=") => {
                api.api_url = Some(value.trim_start_matches("--api-url=").to_string());
            }
            value if value.starts_with("--token=") => {
                api.token = Some(value.trim_start_matches("--token=").to_string());
            }
            value if value.starts_with('-') => {
                return Err(CliParseError::UnknownFlag(value.to_string()));
            }
            value => {
                if subcommand.is_none() {
                    subcommand = Some(value.to_string());
                } else {
                    positionals.push(value.to_string());
                }
            }
        }
    }

    let Some(subcommand) = subcommand else {
        if json {
            return Err(CliParseError::UnexpectedArgument("--json".to_string()));
        }
        return Ok(CliInvocation::Tui { api });
    };

    let command = match subcommand.as_str() {
        "files" => {
            if let Some(extra) = positionals.into_iter().next() {
                return Err(CliParseError::UnexpectedArgument(extra));
            }
            CliCommand::Files { json }
        }
        "rows" => {
            let mut positionals = positionals.into_iter();
            let selection = Selection::from_value(&positionals.next().unwrap_or_default());
            if let Some(extra) = positionals.next() {
                return Err(CliParseError::UnexpectedArgument(extra));
            }
            CliCommand::Rows { selection, json }
        }
        other => return Err(CliParseError::UnknownSubcommand(other.to_string())),
    };

    Ok(CliInvocation::Command { api, command })
}

fn flag_value<'a>(
    iter: &mut impl Iterator<Item = &'a String>,
    flag: &str,
) -> Result<String, CliParseError> {
    match iter.next() {
        Some(value) if !value.starts_with("--") => Ok(value.clone()),
        _ => Err(CliParseError::MissingFlagValue(flag.to_string())),
    }
}

pub fn run(
    command: CliCommand,
    api: &dyn FilesApi,
    out: &mut dyn Write,
) -> Result<(), CliRunError> {
    match command {
        CliCommand::Files { json } => {
            let files = list_files(api).map_err(CliRunError::Fetch)?;
            if json {
                serde_json::to_writer_pretty(&mut *out, &files)?;
                writeln!(out)?;
            } else {
                for file in &files {
                    writeln!(out, "{file}")?;
                }
            }
            Ok(())
        }
        CliCommand::Rows { selection, json } => {
            let (rows, error) = match selection.file() {
                Some(file) => (fetch_one(api, file).map_err(CliRunError::Fetch)?, None),
                None => {
                    let files = list_files(api).map_err(CliRunError::Fetch)?;
                    let outcome = fetch_all(api, &files);
                    (outcome.rows, outcome.error)
                }
            };
            write_rows(out, &rows, json)?;
            match error {
                Some(message) => Err(CliRunError::Fetch(message)),
                None => Ok(()),
            }
        }
    }
}

fn write_rows(out: &mut dyn Write, rows: &[Row], json: bool) -> Result<(), CliRunError> {
    if json {
        serde_json::to_writer_pretty(&mut *out, rows)?;
        writeln!(out)?;
        return Ok(());
    }
    for row in rows {
        writeln!(
            out,
            "{}\t{}\t{}\t{}",
            sanitize_field(&row.file_name),
            sanitize_field(&row.text),
            row.number,
            sanitize_field(&row.hex)
        )?;
    }
    Ok(())
}

fn sanitize_field(value: &str) -> String {
    value.replace(['\t', '\n', '\r'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{FakeApi, group};

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    fn run_to_string(command: CliCommand, api: &FakeApi) -> (String, Result<(), CliRunError>) {
        let mut out: Vec<u8> = Vec::new();
        let result = run(command, api, &mut out);
        (String::from_utf8(out).expect("utf8"), result)
    }

    #[test]
    fn parse_defaults_to_tui_when_no_args() {
        let parsed = parse_invocation(&args(&["filegrid"])).expect("parse");
        assert_eq!(
            parsed,
            CliInvocation::Tui {
                api: ApiOverrides::default()
            }
        );
    }

    #[test]
    fn parse_help_flag_wins() {
        let parsed = parse_invocation(&args(&["filegrid", "rows", "--help"])).expect("parse");
        assert_eq!(parsed, CliInvocation::PrintHelp);
    }

    #[test]
    fn parse_api_flags_apply_to_tui() {
        let parsed = parse_invocation(&args(&[
            "filegrid",
            "--api-url",
            "http://localhost:3000",
            "--token=abc",
        ]))
        .expect("parse");
        assert_eq!(
            parsed,
            CliInvocation::Tui {
                api: ApiOverrides {
                    api_url: Some("http://localhost:3000".to_string()),
                    token: Some("abc".to_string()),
                }
            }
        );
    }

    #[test]
    fn parse_rows_with_file_and_json() {
        let parsed = parse_invocation(&args(&["filegrid", "rows", "a.csv", "--json"])).expect("parse");
        assert_eq!(
            parsed,
            CliInvocation::Command {
                api: ApiOverrides::default(),
                command: CliCommand::Rows {
                    selection: Selection::File("a.csv".to_string()),
                    json: true
                }
            }
        );
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!(matches!(
            parse_invocation(&args(&["filegrid", "delete"])),
            Err(CliParseError::UnknownSubcommand(_))
        ));
        assert!(matches!(
            parse_invocation(&args(&["filegrid", "--verbose"])),
            Err(CliParseError::UnknownFlag(_))
        ));
        assert!(matches!(
            parse_invocation(&args(&["filegrid", "--token"])),
            Err(CliParseError::MissingFlagValue(_))
        ));
        assert!(matches!(
            parse_invocation(&args(&["filegrid", "files", "extra"])),
            Err(CliParseError::UnexpectedArgument(_))
        ));
        assert!(matches!(
            parse_invocation(&args(&["filegrid", "rows", "a.csv", "b.csv"])),
            Err(CliParseError::UnexpectedArgument(_))
        ));
    }

    #[test]
    fn files_prints_one_name_per_line() {
        let api = FakeApi::with_files(&["a.csv", "b.csv"]);
        let (out, result) = run_to_string(CliCommand::Files { json: false }, &api);
        assert!(result.is_ok());
        assert_eq!(out, "a.csv\nb.csv\n");
    }

    #[test]
    fn files_json_is_an_array() {
        let api = FakeApi::with_files(&["a.csv"]);
        let (out, _) = run_to_string(CliCommand::Files { json: true }, &api);
        let parsed: Vec<String> = serde_json::from_str(&out).expect("json");
        assert_eq!(parsed, vec!["a.csv"]);
    }

    #[test]
    fn files_list_failure_is_an_error() {
        let api = FakeApi::with_list_error("Network error");
        let (out, result) = run_to_string(CliCommand::Files { json: false }, &api);
        assert!(out.is_empty());
        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "request failed: Network error");
    }

    #[test]
    fn rows_without_file_fetches_all_as_tsv() {
        let api = FakeApi::with_files(&["a.csv", "b.csv"])
            .data("a.csv", vec![group("a.csv", &[("x", 1, "1")])])
            .data("b.csv", Vec::new());
        let (out, result) = run_to_string(CliCommand::Rows { selection: Selection::All, json: false }, &api);
        assert!(result.is_ok());
        assert_eq!(out, "a.csv\tx\t1\t1\n");
        assert_eq!(api.calls(), vec!["list", "data:a.csv", "data:b.csv"]);
    }

    #[test]
    fn rows_reports_partial_failure_after_printing() {
        let api = FakeApi::with_files(&["a.csv", "b.csv"])
            .data("a.csv", vec![group("a.csv", &[("x", 1, "1")])])
            .data_error("b.csv", "boom");
        let (out, result) = run_to_string(CliCommand::Rows { selection: Selection::All, json: false }, &api);
        assert_eq!(out, "a.csv\tx\t1\t1\n");
        assert_eq!(
            result.unwrap_err().to_string(),
            "Error fetching data for b.csv: request failed: boom"
        );
    }

    #[test]
    fn rows_for_one_file_as_json() {
        let api = FakeApi::with_files(&["a.csv"])
            .data("a.csv", vec![group("a.csv", &[("abc", 123, "0x123")])]);
        let (out, result) = run_to_string(
            CliCommand::Rows {
                selection: Selection::File("a.csv".to_string()),
                json: true,
            },
            &api,
        );
        assert!(result.is_ok());
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json");
        assert_eq!(
            parsed,
            serde_json::json!([
                { "fileName": "a.csv", "text": "abc", "number": 123, "hex": "0x123" }
            ])
        );
        assert_eq!(api.calls(), vec!["data:a.csv"]);
    }

    #[test]
    fn tsv_fields_are_kept_on_one_line() {
        let api = FakeApi::with_files(&["a.csv"])
            .data("a.csv", vec![group("a.csv", &[("two\twords\n", 1, "1")])]);
        let (out, _) = run_to_string(
            CliCommand::Rows {
                selection: Selection::File("a.csv".to_string()),
                json: false,
            },
            &api,
        );
        assert_eq!(out, "a.csv\ttwo words \t1\t1\n");
    }

    #[test]
    fn tsv_file_name_is_kept_on_one_line() {
        let api = FakeApi::with_files(&["a.csv"])
            .data("a.csv", vec![group("odd\tname\n.csv", &[("x", 1, "1")])]);
        let (out, _) = run_to_string(
            CliCommand::Rows {
                selection: Selection::File("a.csv".to_string()),
                json: false,
            },
            &api,
        );
        assert_eq!(out, "odd name .csv\tx\t1\t1\n");
    }
}

//! Request and response envelopes exchanged with the AeroSpace daemon.
//!
//! # Wire format
//!
//! Each message is a single JSON document with no length prefix and no
//! trailing delimiter:
//!
//! ```json
//! {"command":"","args":["list-windows","--all","--json"],"stdin":""}
//! {"serverVersionAndHash":"0.20.0-Beta 1a2b3c","stderr":"","stdout":"[]","exitCode":0}
//! ```
//!
//! `command` is deprecated on the daemon side and always sent empty; the
//! operation name travels as the first element of `args`.

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A command envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Reserved.  Always empty.
    pub command: String,
    /// The operation name followed by its flat argument tokens.
    pub args: Vec<String>,
    pub stdin: String,
}

impl Request {
    /// Build an envelope for `aerospace <command> <args...>`.
    pub fn new(command: &str, args: &[String]) -> Self {
        let mut all = Vec::with_capacity(args.len() + 1);
        all.push(command.to_string());
        all.extend_from_slice(args);
        Self {
            command: String::new(),
            args: all,
            stdin: String::new(),
        }
    }
}

/// A response envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Response {
    /// `"<major>.<minor>.<patch>-<tag> <hash>"`.
    #[serde(rename = "serverVersionAndHash")]
    pub server_version: String,
    pub stderr: String,
    /// Command output.  For `--json` queries this is itself a JSON array.
    pub stdout: String,
    #[serde(rename = "exitCode")]
    pub exit_code: i32,
}

impl Response {
    /// Apply the protocol-failure policy.
    ///
    /// A non-zero exit code wins over stderr; a zero exit code with
    /// non-empty stderr is still a failure.
    pub fn into_result(self) -> Result<Self> {
        if self.exit_code != 0 {
            return Err(Error::ExitCode {
                code: self.exit_code,
                stderr: self.stderr,
            });
        }
        if !self.stderr.is_empty() {
            return Err(Error::Stderr(self.stderr));
        }
        Ok(self)
    }

    /// Decode `stdout` as a JSON array of `T`.
    ///
    /// `what` names the payload in the error message.
    pub fn decode_list<T: DeserializeOwned>(&self, what: &'static str) -> Result<Vec<T>> {
        serde_json::from_str(&self.stdout).map_err(|source| Error::Payload {
            what,
            source,
            stdout: self.stdout.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_puts_operation_first_and_keeps_legacy_fields_empty() {
        let req = Request::new("focus", &["--window-id".into(), "42".into()]);
        let json = serde_json::to_string(&req).unwrap();
        assert_eq!(
            json,
            r#"{"command":"","args":["focus","--window-id","42"],"stdin":""}"#
        );
    }

    #[test]
    fn response_uses_daemon_field_names() {
        let json = r#"{
            "serverVersionAndHash": "0.20.0-Beta abc",
            "stderr": "",
            "stdout": "[]",
            "exitCode": 0
        }"#;
        let res: Response = serde_json::from_str(json).unwrap();
        assert_eq!(res.server_version, "0.20.0-Beta abc");
        assert_eq!(res.stdout, "[]");
        assert_eq!(res.exit_code, 0);
    }

    #[test]
    fn exit_code_is_checked_before_stderr() {
        let res = Response {
            exit_code: 1,
            stderr: "boom".into(),
            ..Default::default()
        };
        match res.into_result() {
            Err(Error::ExitCode { code, stderr }) => {
                assert_eq!(code, 1);
                assert_eq!(stderr, "boom");
            }
            other => panic!("expected exit code error, got {:?}", other),
        }
    }

    #[test]
    fn stderr_alone_is_a_failure() {
        let res = Response {
            stderr: "warning turned error".into(),
            ..Default::default()
        };
        assert!(matches!(res.into_result(), Err(Error::Stderr(s)) if s == "warning turned error"));
    }

    #[test]
    fn clean_response_passes_through_unchanged() {
        let res = Response {
            server_version: "0.20.0-Beta x".into(),
            stdout: "out".into(),
            ..Default::default()
        };
        assert_eq!(res.clone().into_result().unwrap(), res);
    }

    #[test]
    fn decode_list_reports_raw_stdout() {
        let res = Response {
            stdout: "not json".into(),
            ..Default::default()
        };
        let err = res.decode_list::<serde_json::Value>("windows").unwrap_err();
        assert!(err.to_string().contains("failed to unmarshal windows"));
        assert!(err.to_string().contains("not json"));
    }
}

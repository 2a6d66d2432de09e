//! Line-oriented request/response protocol for driving a [`MappingStore`]
//! from another process.
//!
//! One request per line. Every request gets exactly one response line,
//! except `LIST`, which streams `ENTRY` lines terminated by `END`.
//!
//! | Request           | Response                                   |
//! |-------------------|--------------------------------------------|
//! | `ADD <raw>`       | `OK <token> -> <character>` or `ERR <msg>` |
//! | `DELETE_LAST`     | `OK <token> -> <character>` or `ERR <msg>` |
//! | `TO_TOKENS <text>`| `RESULT <unknown> <json string>`           |
//! | `TO_CHARS <text>` | `RESULT <unknown> <json string>`           |
//! | `LIST`            | `ENTRY <token> <character>`* then `END`    |
//! | `RELOAD`          | `OK <entries>` or `ERR <msg>`              |
//! | `EXIT`            | no response, session ends                  |

use crate::core::engine::MappingStore;
use crate::core::types::{Direction, Translation};
use crate::error::StoreError;
use std::fmt;

/// A parsed request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Add(String),
    DeleteLast,
    Translate(Direction, String),
    List,
    Reload,
    Exit,
}

impl Request {
    /// Parses one line. Text arguments keep their inner whitespace.
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim_end_matches(['\r', '\n']);
        let (command, rest) = match line.split_once(' ') {
            Some((command, rest)) => (command, rest),
            None => (line, ""),
        };

        match command {
            "ADD" => Ok(Self::Add(rest.to_string())),
            "DELETE_LAST" => Ok(Self::DeleteLast),
            "TO_TOKENS" => Ok(Self::Translate(Direction::CharToToken, rest.to_string())),
            "TO_CHARS" => Ok(Self::Translate(Direction::TokenToChar, rest.to_string())),
            "LIST" => Ok(Self::List),
            "RELOAD" => Ok(Self::Reload),
            "EXIT" => Ok(Self::Exit),
            "" => Err("empty request".to_string()),
            other => Err(format!("unknown command '{other}'")),
        }
    }
}

/// One response line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Mapping { token: String, character: String },
    Count(usize),
    Result(Translation),
    Entry { token: String, character: String },
    End,
    Error(String),
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mapping { token, character } => write!(f, "OK {token} -> {character}"),
            Self::Count(n) => write!(f, "OK {n}"),
            Self::Result(translation) => {
                let encoded = serde_json::to_string(&translation.output).map_err(|_| fmt::Error)?;
                write!(f, "RESULT {} {encoded}", translation.unknown_count)
            }
            Self::Entry { token, character } => write!(f, "ENTRY {token} {character}"),
            Self::End => f.write_str("END"),
            Self::Error(message) => write!(f, "ERR {message}"),
        }
    }
}

/// Runs one request against `store`.
///
/// Returns `None` for `EXIT`. Store errors come back as `ERR` lines, so a
/// bad request never ends the session.
pub fn handle(store: &MappingStore, request: Request) -> Option<Vec<Response>> {
    let responses = match request {
        Request::Exit => return None,
        Request::Add(raw) => vec![mapping_response(store.add_mapping(&raw))],
        Request::DeleteLast => vec![mapping_response(store.delete_last_mapping())],
        Request::Translate(direction, text) => {
            vec![Response::Result(store.translate(direction, &text))]
        }
        Request::List => {
            let mut lines: Vec<Response> = store
                .snapshot()
                .iter()
                .map(|(token, character)| Response::Entry {
                    token: token.to_string(),
                    character: character.to_string(),
                })
                .collect();
            lines.push(Response::End);
            lines
        }
        Request::Reload => vec![match store.reload() {
            Ok(n) => Response::Count(n),
            Err(e) => Response::Error(e.to_string()),
        }],
    };
    Some(responses)
}

fn mapping_response(result: Result<(String, String), StoreError>) -> Response {
    match result {
        Ok((token, character)) => Response::Mapping { token, character },
        Err(e) => Response::Error(e.to_string()),
    }
}

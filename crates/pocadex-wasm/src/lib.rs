use pocadex_parse::{DecodeError, ParsedFilename};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum Response {
    Ok {
        result: ParsedFilename,
    },
    Error {
        kind: &'static str,
        message: String,
    },
}

impl From<Result<ParsedFilename, DecodeError>> for Response {
    fn from(result: Result<ParsedFilename, DecodeError>) -> Self {
        match result {
            Ok(result) => Self::Ok { result },
            Err(e) => Self::Error {
                kind: e.kind(),
                message: e.to_string(),
            },
        }
    }
}

/// Decode a card file name and return the outcome as JSON.
#[wasm_bindgen]
pub fn decode_filename(input: &str) -> String {
    let response = Response::from(pocadex_parse::decode(input));
    serde_json::to_string(&response).unwrap_or_else(|_| "{}".to_string())
}

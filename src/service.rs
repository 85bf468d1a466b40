use std::io::{self, BufRead, Write};

use serde::{Deserialize, Serialize};

use crate::board::GameResult;
use crate::engine::Engine;
use crate::error::EngineError;

/// One move request. `value` is accepted as an alias for `fen`.
#[derive(Debug, Clone, Deserialize)]
pub struct MoveRequest {
    #[serde(alias = "value")]
    pub fen: String,
    #[serde(default)]
    pub depth: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveResponse {
    pub updated_fen: String,
    pub result: GameResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub detail: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Malformed request: {0}")]
    BadRequest(String),

    #[error("Requested depth {requested} exceeds the limit of {limit}")]
    DepthTooLarge { requested: u32, limit: u32 },

    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl ServiceError {
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) | ServiceError::DepthTooLarge { .. } => 400,
            ServiceError::Engine(e) => e.status_code(),
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse { status: self.status_code(), detail: self.to_string() }
    }
}

/// Request/response front end over an `Engine`, one JSON object per line.
pub struct MoveService {
    engine: Engine,
    max_depth: u32,
}

impl MoveService {
    pub fn new(engine: Engine, max_depth: u32) -> Self { Self { engine, max_depth } }

    pub fn engine(&self) -> &Engine { &self.engine }

    pub fn handle(&self, req: &MoveRequest) -> Result<MoveResponse, ServiceError> {
        let depth = req.depth.unwrap_or(self.engine.params().depth);
        if depth > self.max_depth {
            return Err(ServiceError::DepthTooLarge { requested: depth, limit: self.max_depth });
        }
        let outcome = self.engine.get_best_move(&req.fen, depth)?;
        Ok(MoveResponse { updated_fen: outcome.updated_fen, result: outcome.result })
    }

    /// Parses one request line and renders the reply, success or error, as a
    /// single JSON line (without the trailing newline).
    pub fn handle_line(&self, line: &str) -> String {
        let reply = serde_json::from_str::<MoveRequest>(line)
            .map_err(|e| ServiceError::BadRequest(e.to_string()))
            .and_then(|req| self.handle(&req));
        let rendered = match reply {
            Ok(resp) => serde_json::to_string(&resp),
            Err(e) => {
                if e.status_code() >= 500 {
                    log::error!("request failed: {e}");
                } else {
                    log::debug!("rejected request: {e}");
                }
                serde_json::to_string(&e.to_response())
            }
        };
        rendered.unwrap_or_else(|e| format!(r#"{{"status":500,"detail":"{e}"}}"#))
    }

    /// Answers requests until end of input or a `quit` line. Blank lines are
    /// skipped.
    pub fn run_loop<R: BufRead, W: Write>(&self, input: R, mut output: W) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() { continue; }
            if line == "quit" { break; }
            writeln!(output, "{}", self.handle_line(line))?;
            output.flush()?;
        }
        Ok(())
    }
}

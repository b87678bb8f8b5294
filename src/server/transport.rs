//! Line-delimited stdio transport
//!
//! One JSON-RPC message per line: requests on stdin, responses on stdout.
//! Diagnostics go to stderr so stdout stays a clean protocol channel.

use anyhow::{anyhow, Result};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use super::protocol::{JsonRpcRequest, JsonRpcResponse};

pub struct StdioTransport {
    stdin: BufReader<tokio::io::Stdin>,
    stdout: tokio::io::Stdout,
    line: String,
}

impl StdioTransport {
    pub fn new() -> Self {
        Self {
            stdin: BufReader::new(tokio::io::stdin()),
            stdout: tokio::io::stdout(),
            line: String::new(),
        }
    }

    /// Reads the next request line, skipping blank lines.
    ///
    /// Returns None on EOF.
    pub async fn read_request(&mut self) -> Result<Option<JsonRpcRequest>> {
        loop {
            self.line.clear();
            let read = self
                .stdin
                .read_line(&mut self.line)
                .await
                .map_err(|e| anyhow!("Failed to read line: {}", e))?;
            if read == 0 {
                return Ok(None);
            }

            let trimmed = self.line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let request = serde_json::from_str(trimmed)
                .map_err(|e| anyhow!("Failed to parse JSON: {}", e))?;
            return Ok(Some(request));
        }
    }

    /// Writes one response as a single line and flushes.
    pub async fn write_response(&mut self, response: &JsonRpcResponse) -> Result<()> {
        let mut payload = serde_json::to_string(response)?;
        payload.push('\n');
        self.stdout.write_all(payload.as_bytes()).await?;
        self.stdout.flush().await?;
        Ok(())
    }

    /// Writes an error response.
    pub async fn send_error(&mut self, id: Option<Value>, code: i32, message: String) -> Result<()> {
        self.write_response(&JsonRpcResponse::failure(id, code, message))
            .await
    }
}

impl Default for StdioTransport {
    fn default() -> Self {
        Self::new()
    }
}

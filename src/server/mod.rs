//! JSON-RPC server module
//!
//! Line-delimited JSON-RPC 2.0 over stdio: the read loop takes one request
//! per stdin line, routes it to a command handler, and writes one response
//! line to stdout.

pub mod commands;
pub mod protocol;
pub mod transport;

use anyhow::Result;

pub use commands::CommandContext;
use protocol::{JsonRpcRequest, JsonRpcResponse, INTERNAL_ERROR, INVALID_REQUEST, METHOD_NOT_FOUND};
use transport::StdioTransport;

/// Routes one request to its handler and builds the response.
///
/// Requests without an id are notifications and produce no response.
pub async fn dispatch(context: &CommandContext, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
    if request.id.is_none() {
        tracing::debug!("ignoring notification: {}", request.method);
        return None;
    }

    let result = match request.method.as_str() {
        "initialize" => context.initialize().await,
        "dataset/upload" => context.dataset_upload(request.params).await,
        "dataset/load" => context.dataset_load(request.params).await,
        "dataset/preview" => context.dataset_preview(request.params).await,
        "dataset/stats" => context.dataset_stats().await,
        "dataset/export" => context.dataset_export().await,
        "dataset/clear" => context.dataset_clear().await,
        "query/generate" => context.query_generate(request.params).await,
        "query/help" => context.query_help(request.params).await,
        "query/export" => context.query_export(request.params).await,
        "history/list" => context.history_list(request.params).await,
        "history/export" => context.history_export().await,
        "settings/get" => context.settings_get().await,
        "settings/update" => context.settings_update(request.params).await,
        "state/get" => context.state_get().await,
        "state/clear_error" => context.state_clear_error().await,
        _ => {
            return Some(JsonRpcResponse::failure(
                request.id,
                METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            ));
        }
    };

    Some(match result {
        Ok(value) => JsonRpcResponse::success(request.id, value),
        Err(e) => JsonRpcResponse::failure(request.id, INTERNAL_ERROR, e.to_string()),
    })
}

/// The stdio server: owns the transport and the command context.
pub struct QueryServer {
    transport: StdioTransport,
    context: CommandContext,
}

impl QueryServer {
    pub fn new(context: CommandContext) -> Self {
        QueryServer {
            transport: StdioTransport::new(),
            context,
        }
    }

    /// Reads requests until EOF, answering each one.
    pub async fn run(&mut self) -> Result<()> {
        tracing::info!("ready to receive requests");

        loop {
            match self.transport.read_request().await {
                Ok(Some(request)) => {
                    tracing::debug!("received request: {}", request.method);
                    if let Some(response) = dispatch(&self.context, request).await {
                        if let Err(e) = self.transport.write_response(&response).await {
                            tracing::error!("failed to write response: {}", e);
                        }
                    }
                }
                Ok(None) => {
                    tracing::info!("client disconnected");
                    break;
                }
                Err(e) => {
                    tracing::error!("error reading message: {}", e);
                    if let Err(send_err) = self
                        .transport
                        .send_error(None, INVALID_REQUEST, format!("Invalid request: {}", e))
                        .await
                    {
                        tracing::error!("failed to send error response: {}", send_err);
                    }
                }
            }
        }

        Ok(())
    }
}

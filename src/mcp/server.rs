/// MCP server implementation that handles JSON-RPC communication
///
/// This module implements the actual MCP server that:
/// 1. Reads JSON-RPC requests line by line
/// 2. Processes tool calls against the reading list
/// 3. Writes JSON-RPC responses, one per line

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::mcp::protocol::*;
use crate::tools::{self, sync_snapshot};
use crate::{ReadingTrackerServer, ServerError};

/// MCP server that handles communication with the client
pub struct McpServer {
    /// The underlying reading tracker
    tracker: ReadingTrackerServer,
    /// Whether the client has completed initialization
    initialized: bool,
}

impl McpServer {
    /// Create a new MCP server
    pub fn new(tracker: ReadingTrackerServer) -> Self {
        Self {
            tracker,
            initialized: false,
        }
    }

    /// Run the MCP server, handling JSON-RPC over stdin/stdout
    pub async fn run(&mut self) -> Result<(), ServerError> {
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Serve requests from `reader` until it is closed
    pub async fn serve<R, W>(&mut self, reader: R, mut writer: W) -> Result<(), ServerError>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!("Starting MCP server, waiting for JSON-RPC requests...");

        let mut reader = BufReader::new(reader);
        let mut line = String::new();

        loop {
            line.clear();

            match reader.read_line(&mut line).await {
                Ok(0) => {
                    info!("MCP server shutting down (input closed)");
                    break;
                }
                Ok(_) => {
                    if let Some(response) = self.process_line(&line).await {
                        let response_str = serde_json::to_string(&response)?;

                        writer.write_all(response_str.as_bytes()).await?;
                        writer.write_all(b"\n").await?;
                        writer.flush().await?;

                        debug!("Sent response: {}", response_str);
                    }
                }
                Err(e) => {
                    error!("Failed to read request: {}", e);
                    break;
                }
            }
        }

        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn tracker(&self) -> &ReadingTrackerServer {
        &self.tracker
    }

    /// Process a single line of JSON-RPC input
    async fn process_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        debug!("Processing request: {}", line);

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse JSON-RPC request: {}", e);
                return Some(JsonRpcResponse::error(
                    json!(null),
                    error_codes::PARSE_ERROR,
                    format!("Invalid JSON: {}", e),
                    None,
                ));
            }
        };

        if request.is_notification() {
            self.handle_notification(&request);
            return None;
        }

        Some(self.handle_request(request).await)
    }

    fn handle_notification(&mut self, request: &JsonRpcRequest) {
        match request.method.as_str() {
            "notifications/initialized" => {
                self.initialized = true;
                info!("MCP client initialized");
            }
            other => debug!("Ignoring notification: {}", other),
        }
    }

    /// Handle a JSON-RPC request
    async fn handle_request(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request),
            "initialized" => {
                self.initialized = true;
                JsonRpcResponse::success(request.id, json!(null))
            }
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            "tools/list" => self.handle_tools_list(request),
            "tools/call" => self.handle_tools_call(request).await,
            _ => JsonRpcResponse::error(
                request.id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method '{}' not found", request.method),
                None,
            ),
        }
    }

    /// Handle MCP initialization request
    fn handle_initialize(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        info!("MCP client connected");

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
            },
            server_info: ServerInfo {
                name: "Chronicle Reading Tracker".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        JsonRpcResponse::from_serializable(request.id, &result)
    }

    /// Handle tools/list request
    fn handle_tools_list(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        let tools = vec![
            ToolDefinition::with_params::<tools::AddBookParams>(
                "book_add",
                "Add a book to the end of the reading list (starts as planned)",
            ),
            ToolDefinition::with_params::<tools::ListBooksParams>(
                "book_list",
                "Show the reading list in order, with progress towards the yearly goal",
            ),
            ToolDefinition::with_params::<tools::UpdateBookParams>(
                "book_update",
                "Rename a book or set its status directly (planned, reading, completed)",
            ),
            ToolDefinition::with_params::<tools::AdvanceBookParams>(
                "book_advance",
                "Advance a book to its next status: planned → reading → completed → planned",
            ),
            ToolDefinition::with_params::<tools::RemoveBookParams>(
                "book_remove",
                "Delete a book from the list",
            ),
            ToolDefinition::with_params::<tools::MoveBookParams>(
                "book_move",
                "Move a book to the position of another book",
            ),
            ToolDefinition::without_params("books_clear", "Delete every book on the list"),
            ToolDefinition::without_params("settings_get", "Show the yearly goal and school year"),
            ToolDefinition::with_params::<tools::SaveSettingsParams>(
                "settings_save",
                "Save the yearly goal and school year",
            ),
            ToolDefinition::without_params(
                "reading_progress",
                "Show completed books against the yearly goal",
            ),
        ];

        JsonRpcResponse::success(request.id, json!({ "tools": tools }))
    }

    /// Handle tools/call request
    async fn handle_tools_call(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        let tool_params: ToolCallParams = match request.params {
            Some(params) => match serde_json::from_value(params) {
                Ok(p) => p,
                Err(e) => {
                    return JsonRpcResponse::error(
                        request.id,
                        error_codes::INVALID_PARAMS,
                        format!("Invalid parameters: {}", e),
                        None,
                    );
                }
            },
            None => {
                return JsonRpcResponse::error(
                    request.id,
                    error_codes::INVALID_PARAMS,
                    "Missing parameters".to_string(),
                    None,
                );
            }
        };

        debug!("Calling tool: {}", tool_params.name);
        let args = tool_params.arguments;

        let result = match tool_params.name.as_str() {
            "book_add" => self.call_book_add(args),
            "book_list" => self.call_book_list(args),
            "book_update" => self.call_book_update(args),
            "book_advance" => self.call_book_advance(args),
            "book_remove" => self.call_book_remove(args),
            "book_move" => self.call_book_move(args),
            "books_clear" => self.call_books_clear(),
            "settings_get" => self.call_settings_get(),
            "settings_save" => self.call_settings_save(args),
            "reading_progress" => self.call_reading_progress(),
            _ => ToolCallResult::error(format!("Unknown tool: {}", tool_params.name)),
        };

        JsonRpcResponse::from_serializable(request.id, &result)
    }

    /// Deliver the store's list to the reconciler after a mutation
    fn refresh(&mut self) {
        let (storage, reconciler) = self.tracker.session();
        if let Err(e) = sync_snapshot(storage, reconciler) {
            warn!("Could not refresh the reading list: {}", e);
        }
    }

    fn call_book_add(&mut self, args: HashMap<String, Value>) -> ToolCallResult {
        let params = match parse_args::<tools::AddBookParams>(args) {
            Ok(p) => p,
            Err(e) => return e,
        };

        let result = match tools::add_book(self.tracker.storage(), params) {
            Ok(response) => {
                ToolCallResult::success(format!("{}\nBook ID: {}", response.message, response.book_id))
            }
            Err(e) => e.into(),
        };
        self.refresh();
        result
    }

    fn call_book_list(&mut self, args: HashMap<String, Value>) -> ToolCallResult {
        let params = match parse_args::<tools::ListBooksParams>(args) {
            Ok(p) => p,
            Err(e) => return e,
        };

        let identity = self.tracker.config().identity.clone();
        let (storage, reconciler) = self.tracker.session();
        match tools::list_books(storage, reconciler, &identity, params) {
            Ok(response) => ToolCallResult::success(render_list(&response)),
            Err(e) => e.into(),
        }
    }

    fn call_book_update(&mut self, args: HashMap<String, Value>) -> ToolCallResult {
        let params = match parse_args::<tools::UpdateBookParams>(args) {
            Ok(p) => p,
            Err(e) => return e,
        };

        let result = match tools::update_book(self.tracker.storage(), params) {
            Ok(response) => ToolCallResult::success(response.message),
            Err(e) => e.into(),
        };
        self.refresh();
        result
    }

    fn call_book_advance(&mut self, args: HashMap<String, Value>) -> ToolCallResult {
        let params = match parse_args::<tools::AdvanceBookParams>(args) {
            Ok(p) => p,
            Err(e) => return e,
        };

        let result = match tools::advance_book(self.tracker.storage(), params) {
            Ok(response) => ToolCallResult::success(response.message),
            Err(e) => e.into(),
        };
        self.refresh();
        result
    }

    fn call_book_remove(&mut self, args: HashMap<String, Value>) -> ToolCallResult {
        let params = match parse_args::<tools::RemoveBookParams>(args) {
            Ok(p) => p,
            Err(e) => return e,
        };

        let result = match tools::remove_book(self.tracker.storage(), params) {
            Ok(response) => ToolCallResult::success(response.message),
            Err(e) => e.into(),
        };
        self.refresh();
        result
    }

    fn call_book_move(&mut self, args: HashMap<String, Value>) -> ToolCallResult {
        let params = match parse_args::<tools::MoveBookParams>(args) {
            Ok(p) => p,
            Err(e) => return e,
        };

        let (storage, reconciler) = self.tracker.session();
        match tools::move_book(storage, reconciler, params) {
            Ok(response) => ToolCallResult::success(response.message),
            Err(e) => e.into(),
        }
    }

    fn call_books_clear(&mut self) -> ToolCallResult {
        let result = match tools::clear_books(self.tracker.storage()) {
            Ok(response) => ToolCallResult::success(response.message),
            Err(e) => e.into(),
        };
        self.refresh();
        result
    }

    fn call_settings_get(&self) -> ToolCallResult {
        let identity = &self.tracker.config().identity;
        match tools::get_settings(self.tracker.storage(), identity, tools::today()) {
            Ok(response) => ToolCallResult::success(response.message),
            Err(e) => e.into(),
        }
    }

    fn call_settings_save(&self, args: HashMap<String, Value>) -> ToolCallResult {
        let params = match parse_args::<tools::SaveSettingsParams>(args) {
            Ok(p) => p,
            Err(e) => return e,
        };

        let identity = &self.tracker.config().identity;
        match tools::save_settings(self.tracker.storage(), identity, params, tools::today()) {
            Ok(response) => ToolCallResult::success(response.message),
            Err(e) => e.into(),
        }
    }

    fn call_reading_progress(&mut self) -> ToolCallResult {
        self.refresh();
        let identity = &self.tracker.config().identity;
        let books = self.tracker.reconciler().books();
        match tools::reading_progress(self.tracker.storage(), identity, books) {
            Ok(response) => ToolCallResult::success(response.message),
            Err(e) => e.into(),
        }
    }
}

/// Deserialize tool arguments into a parameter struct
fn parse_args<T: DeserializeOwned>(args: HashMap<String, Value>) -> Result<T, ToolCallResult> {
    let object: serde_json::Map<String, Value> = args.into_iter().collect();
    serde_json::from_value(Value::Object(object))
        .map_err(|e| ToolCallResult::error(format!("Invalid arguments: {}", e)))
}

fn render_list(response: &tools::ListBooksResponse) -> String {
    if response.books.is_empty() {
        return format!(
            "No books on your list yet. Add one to get started!\n\n{}",
            response.progress.message
        );
    }

    let rows = response
        .books
        .iter()
        .map(|b| {
            let mut row = format!(
                "{}. **{}** ({}) - {}",
                b.position,
                b.title,
                b.book_id,
                b.status.display_hint()
            );
            if let Some(started) = &b.started_at {
                row.push_str(&format!("\n   Started: {}", started));
            }
            if let Some(completed) = &b.completed_at {
                row.push_str(&format!("\n   Completed: {}", completed));
            }
            row
        })
        .collect::<Vec<_>>()
        .join("\n");

    let placeholders = response.progress.progress.placeholder_slots;
    let slots = if placeholders > 0 {
        format!("\n\n➕ {} open slots left to reach your goal", placeholders)
    } else {
        String::new()
    };

    format!(
        "📋 **Reading List** ({} books)\n\n{}{}\n\n{}",
        response.books.len(),
        rows,
        slots,
        response.progress.message
    )
}

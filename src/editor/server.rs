use std::collections::HashMap;

use lsp_server::{Connection, Message, Notification, Request, Response};
use lsp_types::{
    Diagnostic, DiagnosticSeverity, DidChangeTextDocumentParams, DidCloseTextDocumentParams,
    DidOpenTextDocumentParams, DidSaveTextDocumentParams, DocumentSymbolParams,
    DocumentSymbolResponse, InitializedParams, Location, Position, PublishDiagnosticsParams,
    Range, SymbolInformation, SymbolKind, Uri, WorkspaceSymbolParams,
};
use mathpad::language::Span;
use mathpad::parsing::{self, ParsingError};
use mathpad::segmenting;
use serde_json::{from_value, to_value, Value};
use tracing::{debug, error, info, warn};

use crate::problem::calculate_line_number;

pub struct MathpadLanguageServer {
    /// Map from URI to document content
    documents: HashMap<Uri, String>,
}

impl MathpadLanguageServer {
    pub fn new() -> Self {
        Self {
            documents: HashMap::new(),
        }
    }

    /// Main server loop that handles incoming LSP messages
    pub fn run(
        mut self,
        connection: Connection,
    ) -> Result<(), Box<dyn std::error::Error + Sync + Send>> {
        info!("Starting Language Server main loop");

        for message in &connection.receiver {
            match message {
                Message::Request(request) => {
                    if let Err(err) = self.handle_request(request, &|msg| {
                        connection
                            .sender
                            .send(msg)
                    }) {
                        error!("Error handling request: {}", err);
                    }
                }
                Message::Notification(notification) => {
                    if notification.method == "exit" {
                        break;
                    }

                    if let Err(error) = self.handle_notification(notification, &|message| {
                        connection
                            .sender
                            .send(message)
                    }) {
                        error!("Error handling notification: {}", error);
                    }
                }
                Message::Response(_resp) => {
                    // We don't expect responses as a server
                    warn!("Received unexpected response message");
                }
            }
        }

        Ok(())
    }

    fn handle_request<E>(
        &mut self,
        req: Request,
        sender: &dyn Fn(Message) -> Result<(), E>,
    ) -> Result<(), Box<dyn std::error::Error + Sync + Send>>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        match req
            .method
            .as_str()
        {
            "textDocument/documentSymbol" => {
                let params: DocumentSymbolParams = from_value(req.params)?;
                let result = self.handle_document_symbol(params);
                let response = Response::new_ok(req.id, result);
                sender(Message::Response(response))?;
            }
            "workspace/symbol" => {
                let params: WorkspaceSymbolParams = from_value(req.params)?;
                let result = self.handle_workspace_symbol(params);
                let response = Response::new_ok(req.id, result);
                sender(Message::Response(response))?;
            }
            "shutdown" => {
                info!("Language Server received shutdown request");
                let response = Response::new_ok(req.id, Value::Null);
                sender(Message::Response(response))?;
            }
            _ => {
                warn!("Unhandled request method: {}", req.method);
                let response = Response::new_err(
                    req.id,
                    lsp_server::ErrorCode::MethodNotFound as i32,
                    format!("Method not found: {}", req.method),
                );
                sender(Message::Response(response))?;
            }
        }
        Ok(())
    }

    fn handle_notification<E>(
        &mut self,
        notification: Notification,
        sender: &dyn Fn(Message) -> Result<(), E>,
    ) -> Result<(), Box<dyn std::error::Error + Sync + Send>>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        match notification
            .method
            .as_str()
        {
            "initialized" => {
                let _params: InitializedParams = from_value(notification.params)?;
                debug!("Client finished initialization");
            }
            "textDocument/didOpen" => {
                let params: DidOpenTextDocumentParams = from_value(notification.params)?;
                self.handle_did_open(params, sender)?;
            }
            "textDocument/didChange" => {
                let params: DidChangeTextDocumentParams = from_value(notification.params)?;
                self.handle_did_change(params, sender)?;
            }
            "textDocument/didSave" => {
                let params: DidSaveTextDocumentParams = from_value(notification.params)?;
                self.handle_did_save(params, sender)?;
            }
            "textDocument/didClose" => {
                let params: DidCloseTextDocumentParams = from_value(notification.params)?;
                self.handle_did_close(params, sender)?;
            }
            _ => {
                debug!("Unhandled notification method: {}", notification.method);
            }
        }
        Ok(())
    }

    fn handle_did_open<E>(
        &mut self,
        params: DidOpenTextDocumentParams,
        sender: &dyn Fn(Message) -> Result<(), E>,
    ) -> Result<(), Box<dyn std::error::Error + Sync + Send>>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let uri = params
            .text_document
            .uri;
        let content = params
            .text_document
            .text;

        debug!("Document opened: {:?}", uri);

        self.segment_and_report(uri.clone(), &content, sender)?;
        self.documents
            .insert(uri, content);
        Ok(())
    }

    fn handle_did_change<E>(
        &mut self,
        params: DidChangeTextDocumentParams,
        sender: &dyn Fn(Message) -> Result<(), E>,
    ) -> Result<(), Box<dyn std::error::Error + Sync + Send>>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let uri = params
            .text_document
            .uri;

        // we asked for full sync, so the last change holds the whole text
        if let Some(change) = params
            .content_changes
            .into_iter()
            .last()
        {
            let content = change.text;

            debug!("Document changed: {:?}", uri);

            self.segment_and_report(uri.clone(), &content, sender)?;
            self.documents
                .insert(uri, content);
        }
        Ok(())
    }

    fn handle_did_save<E>(
        &mut self,
        params: DidSaveTextDocumentParams,
        sender: &dyn Fn(Message) -> Result<(), E>,
    ) -> Result<(), Box<dyn std::error::Error + Sync + Send>>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let uri = params
            .text_document
            .uri;
        debug!("Document saved: {:?}", uri);

        if let Some(content) = self
            .documents
            .get(&uri)
        {
            self.segment_and_report(uri.clone(), content, sender)?;
        }
        Ok(())
    }

    fn handle_did_close<E>(
        &mut self,
        params: DidCloseTextDocumentParams,
        sender: &dyn Fn(Message) -> Result<(), E>,
    ) -> Result<(), Box<dyn std::error::Error + Sync + Send>>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let uri = params
            .text_document
            .uri;
        debug!("Document closed: {:?}", uri);

        self.documents
            .remove(&uri);

        // Clear diagnostics for closed document
        self.publish_diagnostics(uri, vec![], sender)?;
        Ok(())
    }

    fn handle_document_symbol(&self, params: DocumentSymbolParams) -> DocumentSymbolResponse {
        let uri = params
            .text_document
            .uri;

        debug!("Document symbol request: {:?}", uri);

        let symbols = match self
            .documents
            .get(&uri)
        {
            Some(content) => extract_symbols(&uri, content),
            None => vec![],
        };

        DocumentSymbolResponse::Flat(symbols)
    }

    fn handle_workspace_symbol(&self, params: WorkspaceSymbolParams) -> Vec<SymbolInformation> {
        let query = params
            .query
            .to_lowercase();
        debug!("Workspace symbol request: query={:?}", query);

        let mut all_symbols = Vec::new();

        for (uri, content) in &self.documents {
            for symbol in extract_symbols(uri, content) {
                if query.is_empty()
                    || symbol
                        .name
                        .to_lowercase()
                        .contains(&query)
                {
                    all_symbols.push(symbol);
                }
            }
        }

        all_symbols
    }

    /// Segment document and convert the error span, if any, to a diagnostic
    fn segment_and_report<E>(
        &self,
        uri: Uri,
        content: &str,
        sender: &dyn Fn(Message) -> Result<(), E>,
    ) -> Result<(), Box<dyn std::error::Error + Sync + Send>>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let spans = segmenting::segment(content);
        let diagnostics = convert_error_spans(content, &spans);

        self.publish_diagnostics(uri, diagnostics, sender)
    }

    fn publish_diagnostics<E>(
        &self,
        uri: Uri,
        diagnostics: Vec<Diagnostic>,
        sender: &dyn Fn(Message) -> Result<(), E>,
    ) -> Result<(), Box<dyn std::error::Error + Sync + Send>>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let params = PublishDiagnosticsParams {
            uri,
            diagnostics,
            version: None,
        };

        let notification = Notification::new(
            "textDocument/publishDiagnostics".to_string(),
            to_value(params)?,
        );

        sender(Message::Notification(notification))?;
        Ok(())
    }
}

fn convert_error_spans(content: &str, spans: &[Span<'_, ParsingError>]) -> Vec<Diagnostic> {
    spans
        .iter()
        .filter_map(|span| {
            let error = span
                .error
                .as_ref()?;

            let range = Range {
                start: offset_to_position(content, span.from),
                end: offset_to_position(content, span.to),
            };

            Some(Diagnostic {
                range,
                severity: Some(DiagnosticSeverity::ERROR),
                code: None,
                code_description: None,
                source: Some("mathpad".to_string()),
                message: error.message(),
                related_information: None,
                tags: None,
                data: None,
            })
        })
        .collect()
}

/// Names defined by assignments in the parsable regions of a document.
/// Variables and functions are told apart by whether a parameter list was
/// given.
fn extract_symbols(uri: &Uri, content: &str) -> Vec<SymbolInformation> {
    let mut symbols = Vec::new();

    for span in segmenting::segment(content) {
        if span.is_error() {
            continue;
        }

        let statements = match parsing::parse(span.source) {
            Ok(statements) => statements,
            Err(_) => continue,
        };

        for statement in &statements {
            if let Some((identifier, function)) = statement.defines() {
                let name = identifier.0;

                // Calculate the byte offset of the name using pointer arithmetic
                let offset = calculate_slice_offset(content, name).unwrap_or(span.from);
                let start = offset_to_position(content, offset);
                let end = offset_to_position(content, offset + name.len());

                #[allow(deprecated)]
                let symbol = SymbolInformation {
                    name: name.to_string(),
                    kind: if function {
                        SymbolKind::FUNCTION
                    } else {
                        SymbolKind::VARIABLE
                    },
                    tags: None,
                    deprecated: None, // deprecated but still required, how annoying
                    location: Location {
                        uri: uri.clone(),
                        range: Range { start, end },
                    },
                    container_name: None,
                };
                symbols.push(symbol);
            }
        }
    }

    symbols
}

/// Calculate the byte offset of a substring within a parent string using
/// pointer arithmetic.
///
/// Returns None if the substring is not actually part of the parent string,
/// checking first to see if the substring pointer is actually within the
/// bounds of the parent string.
fn calculate_slice_offset(parent: &str, substring: &str) -> Option<usize> {
    let parent_ptr = parent.as_ptr() as usize;
    let substring_ptr = substring.as_ptr() as usize;

    if substring_ptr >= parent_ptr && substring_ptr < parent_ptr + parent.len() {
        Some(substring_ptr - parent_ptr)
    } else {
        None
    }
}

/// Convert byte offset to LSP Position. The column is counted in UTF-16
/// code units, which is what clients assume unless another position
/// encoding was negotiated.
fn offset_to_position(text: &str, offset: usize) -> Position {
    let line = calculate_line_number(text, offset) as u32;

    let start = text[..offset]
        .rfind('\n')
        .map(|i| i + 1)
        .unwrap_or(0);
    let character = text[start..offset]
        .encode_utf16()
        .count() as u32;

    Position { line, character }
}

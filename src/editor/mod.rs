use lsp_server::Connection;
use lsp_types::{
    InitializeParams, OneOf, ServerCapabilities, TextDocumentSyncCapability, TextDocumentSyncKind,
};
use tracing::{debug, info};

mod server;

pub(crate) fn run_language_server() -> Result<(), Box<dyn std::error::Error + Sync + Send>> {
    debug!("Starting mathpad Language Server");

    let (connection, threads) = Connection::stdio();

    let capabilities = serde_json::to_value(ServerCapabilities {
        text_document_sync: Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::FULL)),
        document_symbol_provider: Some(OneOf::Left(true)),
        workspace_symbol_provider: Some(OneOf::Left(true)),
        ..Default::default()
    })?;

    // extract any initialization parameters passed from the editor.
    let params = connection.initialize(capabilities)?;
    let params = serde_json::from_value::<InitializeParams>(params)?;

    if let Some(client) = params.client_info {
        info!(
            "Language Server initialized by {} {}",
            client.name,
            client
                .version
                .unwrap_or_default()
        );
    }

    let server = server::MathpadLanguageServer::new();
    server.run(connection)?;

    threads.join()?;
    Ok(())
}

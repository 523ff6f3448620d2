use super::handlers::ClientHandlers;
use crate::application::session::{BackendSession, SessionError};
use crate::config::ServerConfig;
use crate::constants::PROTOCOL_VERSION;
use crate::domain::types::{
    Arguments, GetPromptResult, ListPromptsResult, ListResourcesResult, ListToolsResult,
    PromptDescriptor, ReadResourceResult, ResourceDescriptor, ToolDescriptor, ToolResult,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::process::Stdio;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};
use tokio::process::{Child, Command};
use tokio::sync::{Mutex as AsyncMutex, oneshot};
use tracing::{debug, info, warn};

type Writer = BufWriter<Box<dyn AsyncWrite + Send + Unpin>>;
type Responder = oneshot::Sender<Result<Value, SessionError>>;

/// A live stdio session with one backend server process.
///
/// Cloning shares the same connection; concurrent requests are multiplexed
/// by JSON-RPC id.
#[derive(Clone)]
pub struct McpSession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    name: String,
    child: AsyncMutex<Option<Child>>,
    writer: AsyncMutex<Option<Writer>>,
    pending: AsyncMutex<HashMap<String, Responder>>,
    id_counter: AtomicU64,
    handlers: ClientHandlers,
    request_timeout: Option<Duration>,
    server_info: AsyncMutex<Option<Value>>,
}

impl McpSession {
    /// Spawns the configured server and performs the handshake.
    pub async fn connect(
        server: &ServerConfig,
        handlers: ClientHandlers,
        request_timeout: Option<Duration>,
    ) -> Result<Self, SessionError> {
        let mut command = Command::new(&server.command);
        command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        if let Some(dir) = &server.workdir {
            command.current_dir(dir);
        }
        if !server.args.is_empty() {
            command.args(&server.args);
        }
        for (key, value) in &server.env {
            command.env(key, value);
        }

        let mut child = command.spawn().map_err(|source| {
            SessionError::Unavailable(format!(
                "failed to spawn server '{}' ({}): {source}",
                server.name,
                server.command.display()
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| SessionError::Transport("failed to capture server stdin".into()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| SessionError::Transport("failed to capture server stdout".into()))?;

        info!(
            server = %server.name,
            command = %server.command.display(),
            pid = child.id(),
            "Spawned backend server"
        );

        let session = Self::attach(&server.name, stdout, stdin, handlers, request_timeout, Some(child));
        session.handshake_or_shutdown().await?;
        Ok(session)
    }

    /// Runs a session over an already-connected byte stream pair.
    pub async fn over_streams<R, W>(
        name: &str,
        reader: R,
        writer: W,
        handlers: ClientHandlers,
        request_timeout: Option<Duration>,
    ) -> Result<Self, SessionError>
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let session = Self::attach(name, reader, writer, handlers, request_timeout, None);
        session.handshake_or_shutdown().await?;
        Ok(session)
    }

    fn attach<R, W>(
        name: &str,
        reader: R,
        writer: W,
        handlers: ClientHandlers,
        request_timeout: Option<Duration>,
        child: Option<Child>,
    ) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let boxed: Box<dyn AsyncWrite + Send + Unpin> = Box::new(writer);
        let inner = Arc::new(SessionInner {
            name: name.to_string(),
            child: AsyncMutex::new(child),
            writer: AsyncMutex::new(Some(BufWriter::new(boxed))),
            pending: AsyncMutex::new(HashMap::new()),
            id_counter: AtomicU64::new(1),
            handlers,
            request_timeout,
            server_info: AsyncMutex::new(None),
        });

        let reader_inner = Arc::clone(&inner);
        tokio::spawn(async move {
            reader_inner.reader_loop(reader).await;
        });

        Self { inner }
    }

    async fn handshake_or_shutdown(&self) -> Result<(), SessionError> {
        if let Err(err) = self.inner.initialize().await {
            self.inner.shutdown().await;
            return Err(err);
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// `serverInfo` reported by the backend during the handshake.
    pub async fn server_info(&self) -> Option<Value> {
        self.inner.server_info.lock().await.clone()
    }

    pub fn handlers(&self) -> &ClientHandlers {
        &self.inner.handlers
    }
}

impl SessionInner {
    async fn initialize(&self) -> Result<(), SessionError> {
        let params = json!({
            "protocolVersion": PROTOCOL_VERSION,
            "clientInfo": {
                "name": "userdesk",
                "version": env!("CARGO_PKG_VERSION"),
            },
            "capabilities": self.handlers.capabilities(),
        });
        let result = self.send_request("initialize", params).await?;

        let negotiated = result
            .get("protocolVersion")
            .and_then(Value::as_str)
            .unwrap_or_default();
        if negotiated != PROTOCOL_VERSION {
            warn!(
                server = %self.name,
                requested = PROTOCOL_VERSION,
                negotiated,
                "backend negotiated a different protocol version"
            );
        }
        *self.server_info.lock().await = result.get("serverInfo").cloned();

        self.send_notification("notifications/initialized").await?;
        info!(server = %self.name, "Backend session initialised");
        Ok(())
    }

    async fn reader_loop<R>(self: Arc<Self>, reader: R)
    where
        R: AsyncRead + Unpin,
    {
        let mut lines = BufReader::new(reader).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(raw)) => {
                    let trimmed = raw.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    if trimmed.starts_with('\u{1b}') {
                        debug!(
                            server = %self.name,
                            line = trimmed,
                            "skipping non-JSON ANSI log line from backend"
                        );
                        continue;
                    }
                    match serde_json::from_str::<Value>(trimmed) {
                        Ok(value) => self.process_inbound_message(value).await,
                        Err(source) => {
                            warn!(
                                server = %self.name,
                                line = trimmed,
                                %source,
                                "received invalid JSON from backend"
                            );
                        }
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    warn!(server = %self.name, %err, "failed to read from backend");
                    break;
                }
            }
        }

        debug!(server = %self.name, "backend output closed");
        self.writer.lock().await.take();
        self.fail_all_pending().await;
    }

    async fn process_inbound_message(self: &Arc<Self>, value: Value) {
        match (value.get("id").cloned(), value.get("method").and_then(Value::as_str)) {
            (Some(id), Some(method)) => {
                let method = method.to_string();
                let params = value.get("params").cloned().unwrap_or(Value::Null);
                let inner = Arc::clone(self);
                tokio::spawn(async move {
                    inner.answer_server_request(id, &method, params).await;
                });
            }
            (Some(id), None) => self.handle_response(id, value).await,
            (None, Some(method)) => {
                debug!(server = %self.name, method, "received notification from backend");
            }
            (None, None) => {}
        }
    }

    async fn handle_response(&self, id: Value, value: Value) {
        let Some(key) = response_key(&id) else {
            return;
        };

        let responder = self.pending.lock().await.remove(&key);
        let Some(sender) = responder else {
            debug!(
                server = %self.name,
                response_id = key,
                "received response for unknown request"
            );
            return;
        };

        let outcome = match value.get("error") {
            Some(error) => Err(SessionError::Rpc {
                code: error.get("code").and_then(Value::as_i64).unwrap_or(-32000),
                message: error
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown error")
                    .to_string(),
            }),
            None => Ok(value.get("result").cloned().unwrap_or(Value::Null)),
        };
        let _ = sender.send(outcome);
    }

    async fn answer_server_request(&self, id: Value, method: &str, params: Value) {
        debug!(server = %self.name, method, "backend sent request");
        let payload = match self.handlers.handle(method, params).await {
            Ok(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
            Err(error) => {
                warn!(
                    server = %self.name,
                    method,
                    code = error.code,
                    "declining backend request"
                );
                json!({ "jsonrpc": "2.0", "id": id, "error": error.to_json() })
            }
        };
        if let Err(err) = self.write_message(&payload).await {
            warn!(server = %self.name, method, %err, "failed to answer backend request");
        }
    }

    async fn send_request(&self, method: &str, params: Value) -> Result<Value, SessionError> {
        let id = self.next_id();
        let (tx, rx) = oneshot::channel();
        self.pending.lock().await.insert(id.clone(), tx);

        let payload = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params
        });
        if let Err(err) = self.write_message(&payload).await {
            self.pending.lock().await.remove(&id);
            return Err(err);
        }

        let received = match self.request_timeout {
            Some(after) => match tokio::time::timeout(after, rx).await {
                Ok(received) => received,
                Err(_) => {
                    self.pending.lock().await.remove(&id);
                    warn!(server = %self.name, method, ?after, "backend request timed out");
                    return Err(SessionError::Timeout {
                        method: method.to_string(),
                        after,
                    });
                }
            },
            None => rx.await,
        };

        received.unwrap_or(Err(SessionError::Terminated))
    }

    /// Sends `method` and decodes its result, mapping JSON-RPC errors about
    /// `subject` onto typed variants.
    async fn request<T>(&self, method: &str, params: Value, subject: &str) -> Result<T, SessionError>
    where
        T: DeserializeOwned,
    {
        let result = self
            .send_request(method, params)
            .await
            .map_err(|err| match err {
                SessionError::Rpc { code, message } => {
                    SessionError::from_rpc(method, subject, code, message)
                }
                other => other,
            })?;
        serde_json::from_value(result).map_err(|source| SessionError::InvalidResponse {
            method: method.to_string(),
            source,
        })
    }

    async fn send_notification(&self, method: &str) -> Result<(), SessionError> {
        self.write_message(&json!({ "jsonrpc": "2.0", "method": method }))
            .await
    }

    async fn write_message(&self, message: &Value) -> Result<(), SessionError> {
        let mut encoded = message.to_string();
        encoded.push('\n');

        let mut writer = self.writer.lock().await;
        let stream = writer.as_mut().ok_or(SessionError::Terminated)?;
        let transport = |err: std::io::Error| SessionError::Transport(err.to_string());
        stream.write_all(encoded.as_bytes()).await.map_err(transport)?;
        stream.flush().await.map_err(transport)?;
        Ok(())
    }

    async fn shutdown(&self) {
        self.writer.lock().await.take();

        if let Some(mut child) = self.child.lock().await.take() {
            if let Err(err) = child.kill().await {
                debug!(
                    server = %self.name,
                    %err,
                    "failed to kill backend process (may have already exited)"
                );
            }
            let _ = child.wait().await;
        }

        self.fail_all_pending().await;
    }

    async fn fail_all_pending(&self) {
        let mut pending = self.pending.lock().await;
        for (_, sender) in pending.drain() {
            let _ = sender.send(Err(SessionError::Terminated));
        }
    }

    fn next_id(&self) -> String {
        let id = self.id_counter.fetch_add(1, Ordering::SeqCst);
        format!("req-{id}")
    }
}

fn response_key(id: &Value) -> Option<String> {
    match id {
        Value::String(value) => Some(value.clone()),
        Value::Number(num) => Some(num.to_string()),
        _ => None,
    }
}

/// Prompt arguments travel as strings; non-string values are rendered as JSON.
fn prompt_arguments(args: Arguments) -> Value {
    Value::Object(
        args.into_iter()
            .map(|(key, value)| {
                let text = match value {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (key, Value::String(text))
            })
            .collect(),
    )
}

#[async_trait]
impl BackendSession for McpSession {
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, SessionError> {
        let listed: ListToolsResult = self.inner.request("tools/list", json!({}), "").await?;
        Ok(listed.tools)
    }

    async fn list_resources(&self) -> Result<Vec<ResourceDescriptor>, SessionError> {
        let listed: ListResourcesResult = self.inner.request("resources/list", json!({}), "").await?;
        Ok(listed.resources)
    }

    async fn list_prompts(&self) -> Result<Vec<PromptDescriptor>, SessionError> {
        let listed: ListPromptsResult = self.inner.request("prompts/list", json!({}), "").await?;
        Ok(listed.prompts)
    }

    async fn call_tool(&self, name: &str, args: Arguments) -> Result<ToolResult, SessionError> {
        debug!(server = %self.inner.name, tool = name, "calling tool");
        self.inner
            .request(
                "tools/call",
                json!({ "name": name, "arguments": Value::Object(args) }),
                name,
            )
            .await
    }

    async fn read_resource(&self, uri: &str) -> Result<ReadResourceResult, SessionError> {
        self.inner
            .request("resources/read", json!({ "uri": uri }), uri)
            .await
    }

    async fn get_prompt(&self, name: &str, args: Arguments) -> Result<GetPromptResult, SessionError> {
        self.inner
            .request(
                "prompts/get",
                json!({ "name": name, "arguments": prompt_arguments(args) }),
                name,
            )
            .await
    }

    async fn close(&self) {
        info!(server = %self.inner.name, "Closing backend session");
        self.inner.shutdown().await;
    }
}

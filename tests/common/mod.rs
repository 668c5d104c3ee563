//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::Arc;

use oracle_client::codec::{Codec, CodecError, DecodedValue};
use oracle_client::config::{ClientConfig, PollConfig};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Well-known test private key (Anvil's first account).
#[allow(dead_code)]
pub const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// A request as seen by the mock ledger.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct MockRequest {
    pub method: String,
    /// Path including the query string.
    pub path: String,
    pub body: String,
}

/// Start a programmable mock ledger on an ephemeral port.
///
/// `handler` maps each request to `(status, body)`.
pub async fn start_mock_ledger<F>(handler: F) -> SocketAddr
where
    F: Fn(MockRequest) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handler = Arc::new(handler);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let handler = handler.clone();
                    tokio::spawn(async move {
                        serve(socket, handler.as_ref()).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

async fn serve<F>(mut socket: TcpStream, handler: &F)
where
    F: Fn(MockRequest) -> (u16, String),
{
    let request = match read_request(&mut socket).await {
        Some(request) => request,
        None => return,
    };
    let (status, body) = handler(request);
    let status_text = match status {
        200 => "200 OK",
        400 => "400 Bad Request",
        404 => "404 Not Found",
        429 => "429 Too Many Requests",
        500 => "500 Internal Server Error",
        502 => "502 Bad Gateway",
        503 => "503 Service Unavailable",
        _ => "200 OK",
    };

    let response_str = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_text,
        body.len(),
        body
    );
    let _ = socket.write_all(response_str.as_bytes()).await;
    let _ = socket.shutdown().await;
}

async fn read_request(socket: &mut TcpStream) -> Option<MockRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.lines();
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();

    let content_length = lines
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let body_end = buf.len().min(header_end + content_length);
    let body = String::from_utf8_lossy(&buf[header_end..body_end]).to_string();

    Some(MockRequest { method, path, body })
}

/// Client configuration pointed at a mock ledger with a fast poll schedule.
#[allow(dead_code)]
pub fn test_config(addr: SocketAddr) -> ClientConfig {
    let mut config = ClientConfig::new("bandchain", format!("http://{}", addr));
    config.http_timeout_secs = 2;
    config.polling = PollConfig {
        interval_ms: 10,
        max_interval_ms: 10,
        timeout_secs: 5,
        max_attempts: None,
    };
    config
}

/// Minimal codec for `{name:type,...}/{name:type,...}` schemas with
/// big-endian `i64`/`u64` fields and length-prefixed `string` fields.
#[allow(dead_code)]
pub struct FixtureCodec;

#[allow(dead_code)]
fn fields(part: &str) -> Vec<(String, String)> {
    part.trim_matches(|c| c == '{' || c == '}')
        .split(',')
        .filter(|f| !f.is_empty())
        .filter_map(|f| f.split_once(':'))
        .map(|(n, t)| (n.trim().to_string(), t.trim().to_string()))
        .collect()
}

#[allow(dead_code)]
fn split_schema(schema: &str) -> Result<(&str, &str), CodecError> {
    schema
        .split_once('/')
        .ok_or_else(|| CodecError::Decode(format!("bad schema {}", schema)))
}

impl Codec for FixtureCodec {
    fn encode_input(&self, schema: &str, params: &serde_json::Value) -> Result<Vec<u8>, CodecError> {
        let (input, _) = split_schema(schema)?;
        let mut out = Vec::new();
        for (name, ty) in fields(input) {
            let value = params
                .get(&name)
                .ok_or_else(|| CodecError::Encode(format!("missing field {}", name)))?;
            match ty.as_str() {
                "i64" => out.extend_from_slice(
                    &value
                        .as_i64()
                        .ok_or_else(|| CodecError::Encode(format!("{} is not i64", name)))?
                        .to_be_bytes(),
                ),
                "u64" => out.extend_from_slice(
                    &value
                        .as_u64()
                        .ok_or_else(|| CodecError::Encode(format!("{} is not u64", name)))?
                        .to_be_bytes(),
                ),
                "string" => {
                    let s = value
                        .as_str()
                        .ok_or_else(|| CodecError::Encode(format!("{} is not a string", name)))?;
                    out.extend_from_slice(&(s.len() as u32).to_be_bytes());
                    out.extend_from_slice(s.as_bytes());
                }
                other => return Err(CodecError::Encode(format!("unsupported type {}", other))),
            }
        }
        Ok(out)
    }

    fn decode_output(&self, schema: &str, bytes: &[u8]) -> Result<DecodedValue, CodecError> {
        let (_, output) = split_schema(schema)?;
        let mut rest = bytes;
        let mut entries = Vec::new();
        for (name, ty) in fields(output) {
            if rest.len() < 8 {
                return Err(CodecError::Decode("not enough bytes".into()));
            }
            let (head, tail) = rest.split_at(8);
            let raw: [u8; 8] = head.try_into().map_err(|_| CodecError::Decode("short".into()))?;
            let value = match ty.as_str() {
                "i64" => DecodedValue::from(i64::from_be_bytes(raw)),
                "u64" => DecodedValue::from(u64::from_be_bytes(raw)),
                other => return Err(CodecError::Decode(format!("unsupported type {}", other))),
            };
            entries.push((name, value));
            rest = tail;
        }
        if !rest.is_empty() {
            return Err(CodecError::Decode("trailing bytes".into()));
        }
        Ok(DecodedValue::Map(entries))
    }
}

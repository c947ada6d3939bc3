//! A throwaway local HTTP server for exercising the real clients.

use std::io;
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// Serves one canned response to the first connection, then stops.
#[derive(Debug)]
pub struct OneShotServer {
    addr: SocketAddr,
    handle: JoinHandle<io::Result<String>>,
}

impl OneShotServer {
    /// Binds to a free local port and starts serving.
    ///
    /// `status` is the status line tail, e.g. `"200 OK"`.
    pub async fn start(
        status: &str,
        content_type: &str,
        body: impl Into<String>,
    ) -> io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let body = body.into();
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await?;
            let request = read_request(&mut socket).await?;
            socket.write_all(response.as_bytes()).await?;
            socket.shutdown().await?;
            Ok(request)
        });

        Ok(Self { addr, handle })
    }

    /// URL for `path` on this server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Waits for the served request and returns it verbatim.
    pub async fn received(self) -> io::Result<String> {
        self.handle.await.map_err(io::Error::other)?
    }
}

async fn read_request(socket: &mut TcpStream) -> io::Result<String> {
    let mut raw = Vec::new();
    let mut buf = [0_u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut buf).await?;
        if n == 0 {
            return Ok(String::from_utf8_lossy(&raw).into_owned());
        }
        raw.extend_from_slice(&buf[..n]);
        if let Some(pos) = find_header_end(&raw) {
            break pos;
        }
    };

    let headers = String::from_utf8_lossy(&raw[..header_end]).to_ascii_lowercase();
    let content_length = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|value| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while raw.len() < header_end + content_length {
        let n = socket.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        raw.extend_from_slice(&buf[..n]);
    }

    Ok(String::from_utf8_lossy(&raw).into_owned())
}

fn find_header_end(raw: &[u8]) -> Option<usize> {
    raw.windows(4).position(|w| w == b"\r\n\r\n").map(|pos| pos + 4)
}

/// Returns an http URL on a local port with nothing listening.
pub async fn unreachable_url() -> io::Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{addr}/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_header_end() {
        assert_eq!(find_header_end(b"GET / HTTP/1.1\r\n\r\nbody"), Some(18));
        assert_eq!(find_header_end(b"GET / HTTP/1.1\r\n"), None);
    }

    #[tokio::test]
    async fn test_serves_one_request() {
        let server = OneShotServer::start("200 OK", "text/plain", "hi").await.unwrap();
        let mut socket = TcpStream::connect(server.addr).await.unwrap();
        socket
            .write_all(b"POST /x HTTP/1.1\r\nContent-Length: 3\r\n\r\nabc")
            .await
            .unwrap();

        let mut response = String::new();
        socket.read_to_string(&mut response).await.unwrap();
        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(response.ends_with("\r\n\r\nhi"));

        let request = server.received().await.unwrap();
        assert!(request.ends_with("\r\n\r\nabc"));
    }
}

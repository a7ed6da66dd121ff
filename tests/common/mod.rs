//! Throwaway HTTP/1.1 server for integration tests.
//!
//! Serves canned responses by exact path (query strings ignored) and records
//! every request head so tests can assert on headers.

#![allow(dead_code)]

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

#[derive(Clone)]
pub struct Route {
    pub path: String,
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl Route {
    pub fn new(
        path: impl Into<String>,
        status: u16,
        content_type: &'static str,
        body: Vec<u8>,
    ) -> Self {
        Self {
            path: path.into(),
            status,
            content_type,
            body,
        }
    }

    pub fn png(path: impl Into<String>) -> Self {
        Self::new(path, 200, "image/png", png_bytes())
    }

    pub fn gif(path: impl Into<String>) -> Self {
        Self::new(path, 200, "image/gif", encoded(ImageFormat::Gif))
    }

    pub fn bmp(path: impl Into<String>) -> Self {
        Self::new(path, 200, "image/bmp", encoded(ImageFormat::Bmp))
    }

    pub fn json(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self::new(path, 200, "application/json", body.to_string().into_bytes())
    }
}

pub struct TestServer {
    pub base: String,
    pub requests: Arc<Mutex<Vec<String>>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn request_heads(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Start serving `routes` on an ephemeral port of the current runtime.
pub async fn serve(routes: Vec<Route>) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let routes = Arc::new(routes);
    let requests = Arc::new(Mutex::new(Vec::new()));

    let log = Arc::clone(&requests);
    tokio::spawn(async move {
        while let Ok((mut sock, _)) = listener.accept().await {
            let routes = Arc::clone(&routes);
            let log = Arc::clone(&log);
            tokio::spawn(async move {
                let mut buf = vec![0u8; 16 * 1024];
                let mut read = 0;
                loop {
                    let n = sock.read(&mut buf[read..]).await.unwrap_or(0);
                    if n == 0 {
                        break;
                    }
                    read += n;
                    if buf[..read].windows(4).any(|w| w == b"\r\n\r\n") || read == buf.len() {
                        break;
                    }
                }

                let head = String::from_utf8_lossy(&buf[..read]).to_string();
                let target = head.split_whitespace().nth(1).unwrap_or("/").to_string();
                log.lock().unwrap().push(head);

                let path = target
                    .split('?')
                    .next()
                    .unwrap_or("/")
                    .replace("%27", "'")
                    .replace("%20", " ");
                let (status, content_type, body) = match routes.iter().find(|r| r.path == path) {
                    Some(r) => (r.status, r.content_type, r.body.clone()),
                    None => (404, "text/plain", b"not found".to_vec()),
                };

                let response_head = format!(
                    "HTTP/1.1 {status} X\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                let _ = sock.write_all(response_head.as_bytes()).await;
                let _ = sock.write_all(&body).await;
                let _ = sock.shutdown().await;
            });
        }
    });

    TestServer {
        base: format!("http://{addr}"),
        requests,
    }
}

/// A tiny valid PNG.
pub fn png_bytes() -> Vec<u8> {
    encoded(ImageFormat::Png)
}

/// A 4x4 test image in `format`.
pub fn encoded(format: ImageFormat) -> Vec<u8> {
    let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([200, 30, 30, 255])));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), format).unwrap();
    buf
}

pub fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|r| r.iter().map(|c| c.to_string()).collect())
        .collect()
}

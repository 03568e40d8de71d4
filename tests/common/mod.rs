use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::path::Path;
use std::thread;

use grid_cells::{RecognizeError, TextRecognizer};
use image::{Rgb, RgbImage};

pub struct Route {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl Route {
    pub fn ok(content_type: &'static str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            content_type,
            body: body.into(),
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            content_type: "text/plain",
            body: b"error".to_vec(),
        }
    }
}

/// Minimal HTTP/1.1 server answering canned routes and recording every requested path.
/// `{base}` inside text bodies is replaced by the server's own origin.
pub struct TestServer {
    pub base: String,
    hits: Arc<Mutex<Vec<String>>>,
}

impl TestServer {
    pub fn start(routes: Vec<(&'static str, Route)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server");
        let base = format!("http://{}", listener.local_addr().expect("local addr"));
        let routes: Arc<HashMap<&'static str, Route>> = Arc::new(
            routes
                .into_iter()
                .map(|(path, mut route)| {
                    if route.content_type.starts_with("text/") {
                        let text = String::from_utf8_lossy(&route.body).replace("{base}", &base);
                        route.body = text.into_bytes();
                    }
                    (path, route)
                })
                .collect(),
        );
        let hits = Arc::new(Mutex::new(Vec::new()));

        let thread_hits = Arc::clone(&hits);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                serve(stream, &routes, &thread_hits);
            }
        });

        Self { base, hits }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().expect("hits lock").clone()
    }
}

fn serve(mut stream: TcpStream, routes: &HashMap<&'static str, Route>, hits: &Mutex<Vec<String>>) {
    let mut request = Vec::new();
    let mut buffer = [0_u8; 1024];
    while !request.windows(4).any(|window| window == b"\r\n\r\n") {
        match stream.read(&mut buffer) {
            Ok(0) | Err(_) => return,
            Ok(read) => request.extend_from_slice(&buffer[..read]),
        }
    }

    let head = String::from_utf8_lossy(&request);
    let path = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    hits.lock().expect("hits lock").push(path.clone());

    let fallback = Route::status(404);
    let route = routes.get(path.as_str()).unwrap_or(&fallback);
    let reason = match route.status {
        200 => "OK",
        404 => "Not Found",
        _ => "Error",
    };
    let header = format!(
        "HTTP/1.1 {} {reason}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        route.status,
        route.content_type,
        route.body.len()
    );
    let _ = stream.write_all(header.as_bytes());
    let _ = stream.write_all(&route.body);
    let _ = stream.flush();
}

/// Writes a PNG with one-pixel dark ruling lines at the given columns and rows.
pub fn write_ruled_png(path: &Path, width: u32, height: u32, columns: &[u32], rows: &[u32]) {
    let ink = Rgb([20, 20, 20]);
    let mut page = RgbImage::from_pixel(width, height, Rgb([245, 245, 245]));
    let (left, right) = (columns[0], columns[columns.len() - 1]);
    let (top, bottom) = (rows[0], rows[rows.len() - 1]);
    for &x in columns {
        for y in top..=bottom {
            page.put_pixel(x, y, ink);
        }
    }
    for &y in rows {
        for x in left..=right {
            page.put_pixel(x, y, ink);
        }
    }
    page.save(path).expect("ruled fixture should be written");
}

/// Answers with the region size as `WIDTHxHEIGHT`.
pub struct SizeRecognizer;

impl TextRecognizer for SizeRecognizer {
    fn probe(&self) -> Result<(), RecognizeError> {
        Ok(())
    }

    fn recognize(&self, region: &image::DynamicImage) -> Result<String, RecognizeError> {
        Ok(format!("{}x{}\n", region.width(), region.height()))
    }
}

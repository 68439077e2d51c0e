//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves fixed responses per request path. Unknown paths get 404. Routes can
//! be added after start, once the base URL is known.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// One request as seen by the server.
#[derive(Debug, Clone)]
struct Hit {
    path: String,
    user_agent: String,
}

#[derive(Debug, Clone)]
struct Route {
    status: &'static str,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

/// Handle to a running server. The server runs until the process exits.
#[derive(Clone)]
pub struct PageServer {
    base: String,
    routes: Arc<Mutex<HashMap<String, Route>>>,
    hits: Arc<Mutex<Vec<Hit>>>,
}

impl PageServer {
    /// Starts a server in a background thread on an ephemeral port.
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let routes: Arc<Mutex<HashMap<String, Route>>> = Arc::default();
        let hits: Arc<Mutex<Vec<Hit>>> = Arc::default();
        let (r, h) = (Arc::clone(&routes), Arc::clone(&hits));
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let r = Arc::clone(&r);
                let h = Arc::clone(&h);
                thread::spawn(move || handle(stream, &r, &h));
            }
        });
        PageServer {
            base: format!("http://127.0.0.1:{}/", port),
            routes,
            hits,
        }
    }

    /// Base URL with trailing slash, e.g. `http://127.0.0.1:12345/`.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Absolute URL for `path` (leading slash optional).
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path.trim_start_matches('/'))
    }

    /// Serves `body` with 200 OK at `path`.
    pub fn ok(&self, path: &str, content_type: &str, body: impl Into<Vec<u8>>) -> &Self {
        self.insert(
            path,
            Route {
                status: "200 OK",
                headers: vec![("Content-Type".to_string(), content_type.to_string())],
                body: body.into(),
            },
        )
    }

    /// Serves an HTML page at `path`.
    pub fn html(&self, path: &str, html: &str) -> &Self {
        self.ok(path, "text/html; charset=utf-8", html.as_bytes().to_vec())
    }

    /// Answers `path` with `status` (e.g. "500 Internal Server Error") and a short body.
    pub fn status(&self, path: &str, status: &'static str) -> &Self {
        self.insert(
            path,
            Route {
                status,
                headers: vec![("Content-Type".to_string(), "text/plain".to_string())],
                body: status.as_bytes().to_vec(),
            },
        )
    }

    /// Redirects `path` to `location` with 302 Found.
    pub fn redirect(&self, path: &str, location: &str) -> &Self {
        self.insert(
            path,
            Route {
                status: "302 Found",
                headers: vec![("Location".to_string(), location.to_string())],
                body: Vec::new(),
            },
        )
    }

    /// Request paths (query stripped) seen so far, in arrival order.
    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().iter().map(|h| h.path.clone()).collect()
    }

    /// User-Agent headers seen so far, in arrival order.
    pub fn user_agents(&self) -> Vec<String> {
        self.hits
            .lock()
            .unwrap()
            .iter()
            .map(|h| h.user_agent.clone())
            .collect()
    }

    fn insert(&self, path: &str, route: Route) -> &Self {
        let key = format!("/{}", path.trim_start_matches('/'));
        self.routes.lock().unwrap().insert(key, route);
        self
    }
}

fn handle(
    mut stream: TcpStream,
    routes: &Mutex<HashMap<String, Route>>,
    hits: &Mutex<Vec<Hit>>,
) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));

    let mut request = Vec::new();
    let mut buf = [0u8; 4096];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") && request.len() < 64 * 1024 {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }
    let request = match std::str::from_utf8(&request) {
        Ok(s) => s,
        Err(_) => return,
    };
    let (method, path, user_agent) = parse_request(request);
    let path_only = path.split('?').next().unwrap_or("").to_string();
    hits.lock().unwrap().push(Hit {
        path: path_only.clone(),
        user_agent,
    });

    let route = routes.lock().unwrap().get(&path_only).cloned();
    let route = route.unwrap_or(Route {
        status: "404 Not Found",
        headers: vec![("Content-Type".to_string(), "text/plain".to_string())],
        body: b"not found".to_vec(),
    });

    let mut head = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n",
        route.status,
        route.body.len()
    );
    for (k, v) in &route.headers {
        head.push_str(&format!("{}: {}\r\n", k, v));
    }
    head.push_str("\r\n");
    let _ = stream.write_all(head.as_bytes());
    if !method.eq_ignore_ascii_case("HEAD") {
        let _ = stream.write_all(&route.body);
    }
}

/// Returns (method, request target, User-Agent value).
fn parse_request(request: &str) -> (String, String, String) {
    let mut lines = request.lines();
    let mut parts = lines.next().unwrap_or("").split_whitespace();
    let method = parts.next().unwrap_or("").to_string();
    let target = parts.next().unwrap_or("/").to_string();
    let mut user_agent = String::new();
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("user-agent") {
                user_agent = value.trim().to_string();
            }
        }
    }
    (method, target, user_agent)
}

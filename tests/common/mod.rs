use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;

/// Minimal scripted HTTP endpoint for end-to-end runs.
///
/// Routes are (substring, body) pairs matched against the request line in
/// order; the first hit is served as a 200 JSON response. Every connection
/// carries one request and is closed afterwards, so the accept loop serves an
/// arbitrary number of sequential requests.
pub fn spawn_stub(routes: Vec<(&'static str, serde_json::Value)>) -> String {
  let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub endpoint");
  let addr = listener.local_addr().expect("stub local addr");

  thread::spawn(move || {
    for conn in listener.incoming() {
      let Ok(mut stream) = conn else { continue };

      let mut buf = [0u8; 8192];
      let n = stream.read(&mut buf).unwrap_or(0);
      let request = String::from_utf8_lossy(&buf[..n]).to_string();
      let request_line = request.lines().next().unwrap_or("").to_string();

      let (status, body) = match routes.iter().find(|(needle, _)| request_line.contains(needle)) {
        Some((_, body)) => ("200 OK", body.to_string()),
        None => ("404 Not Found", format!("{{\"unmatched\":{:?}}}", request_line)),
      };

      let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
      );
      let _ = stream.write_all(response.as_bytes());
    }
  });

  format!("http://{}", addr)
}

//! Cursor position over Hyprland's request socket.

use std::env;
use std::io::{Read, Write};
use std::os::unix::net::UnixStream;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use super::{PointSource, PointerError};
use crate::util::Point;

const SOCKET_TIMEOUT: Duration = Duration::from_millis(100);

#[derive(Debug, Deserialize)]
struct CursorPos {
    x: f64,
    y: f64,
}

/// Polls `j/cursorpos` on the Hyprland request socket.
///
/// Hyprland closes the connection after every reply, so each poll opens a
/// fresh stream.
#[derive(Debug, Clone)]
pub struct HyprlandCursor {
    socket: PathBuf,
}

impl HyprlandCursor {
    /// Locates the socket of the running instance from the environment.
    pub fn from_env() -> Result<Self, PointerError> {
        let signature =
            env::var("HYPRLAND_INSTANCE_SIGNATURE").map_err(|_| PointerError::NoCompositor)?;
        let runtime_dir = env::var_os("XDG_RUNTIME_DIR").map(PathBuf::from);
        Ok(Self::new(socket_path(runtime_dir, &signature)))
    }

    pub fn new(socket: PathBuf) -> Self {
        Self { socket }
    }

    pub fn socket(&self) -> &PathBuf {
        &self.socket
    }

    fn socket_error(&self, source: std::io::Error) -> PointerError {
        PointerError::Socket {
            path: self.socket.clone(),
            source,
        }
    }

    fn request(&self) -> Result<String, PointerError> {
        let mut stream = UnixStream::connect(&self.socket).map_err(|e| self.socket_error(e))?;
        stream
            .set_read_timeout(Some(SOCKET_TIMEOUT))
            .and_then(|()| stream.set_write_timeout(Some(SOCKET_TIMEOUT)))
            .map_err(|e| self.socket_error(e))?;
        stream
            .write_all(b"j/cursorpos")
            .map_err(|e| self.socket_error(e))?;

        let mut reply = String::new();
        stream
            .read_to_string(&mut reply)
            .map_err(|e| self.socket_error(e))?;
        Ok(reply)
    }
}

impl PointSource for HyprlandCursor {
    fn poll(&mut self) -> Result<Option<Point>, PointerError> {
        let reply = self.request()?;
        parse_cursor_reply(&reply).map(Some)
    }
}

/// `$XDG_RUNTIME_DIR/hypr/<sig>/.socket.sock`, or the pre-0.40 `/tmp/hypr` layout.
fn socket_path(runtime_dir: Option<PathBuf>, signature: &str) -> PathBuf {
    let modern = runtime_dir.map(|dir| dir.join("hypr").join(signature).join(".socket.sock"));
    match modern {
        Some(path) if path.exists() => path,
        _ => PathBuf::from("/tmp/hypr")
            .join(signature)
            .join(".socket.sock"),
    }
}

fn parse_cursor_reply(reply: &str) -> Result<Point, PointerError> {
    let pos: CursorPos = serde_json::from_str(reply.trim())
        .map_err(|e| PointerError::InvalidReply(format!("{e}: {}", reply.trim())))?;
    Ok(Point::new(pos.x, pos.y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::net::UnixListener;
    use std::thread;
    use tempfile::TempDir;

    #[test]
    fn parses_json_reply() {
        let point = parse_cursor_reply("{\"x\": 1280, \"y\": 720}\n").unwrap();
        assert_eq!(point, Point::new(1280.0, 720.0));
    }

    #[test]
    fn rejects_plain_reply() {
        assert!(matches!(
            parse_cursor_reply("1280, 720"),
            Err(PointerError::InvalidReply(_))
        ));
    }

    #[test]
    fn falls_back_to_tmp_layout() {
        let temp = TempDir::new().unwrap();
        let path = socket_path(Some(temp.path().to_path_buf()), "abc");
        assert_eq!(path, PathBuf::from("/tmp/hypr/abc/.socket.sock"));
    }

    #[test]
    fn polls_a_live_socket() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".socket.sock");
        let listener = UnixListener::bind(&path).unwrap();
        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = [0u8; 11];
            stream.read_exact(&mut request).unwrap();
            assert_eq!(&request, b"j/cursorpos");
            stream.write_all(b"{\"x\": 10.5, \"y\": 20}").unwrap();
        });

        let mut cursor = HyprlandCursor::new(path);
        assert_eq!(cursor.poll().unwrap(), Some(Point::new(10.5, 20.0)));
        server.join().unwrap();
    }

    #[test]
    fn missing_socket_is_an_error() {
        let temp = TempDir::new().unwrap();
        let mut cursor = HyprlandCursor::new(temp.path().join("missing.sock"));
        assert!(matches!(cursor.poll(), Err(PointerError::Socket { .. })));
    }
}

//! [`Connection`] implementation backed by a single socket.
//!
//! One [`SocketConnection`] owns one stream for its whole lifetime.  Every
//! command is a blocking write of one JSON envelope followed by a read loop
//! that accumulates the reply until the daemon stops sending.
//!
//! # Framing
//!
//! Replies carry no length prefix.  The read loop stops when
//!
//! * a read reports end-of-stream, or
//! * a read returns fewer bytes than the buffer offered.
//!
//! The second rule is a heuristic the daemon's own CLI relies on as well.
//!
//! # Timeouts and cancellation
//!
//! None.  A caller that needs a deadline must configure it on the stream
//! (e.g. [`UnixStream::set_read_timeout`]) before handing it to
//! [`SocketConnection::from_stream`].  Closing the connection from another
//! thread while a command is in flight is not supported.

use crate::error::{Error, Result};
use crate::ipc::protocol::{Request, Response};
use crate::ipc::version::VersionRequirement;
use crate::traits::{Connection, Stream};
use log::{debug, info};
use std::io::{ErrorKind, Read, Write};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Bytes offered to each `read` call.
pub const READ_CHUNK_SIZE: usize = 4096;

/// Longest raw-data excerpt attached to read and decode errors.
const MAX_EXCERPT: usize = 4096;

/// A connection to the AeroSpace daemon over a [`Stream`].
///
/// The stream lives behind a mutex held across the full write-then-read
/// cycle, so the connection can be shared between threads.  Waiters are
/// not served in any particular order.
pub struct SocketConnection {
    socket_path: PathBuf,
    requirement: VersionRequirement,
    stream: Mutex<Option<Box<dyn Stream>>>,
}

impl SocketConnection {
    /// Connect to the Unix socket at `path`.
    pub fn connect(path: impl AsRef<Path>, requirement: VersionRequirement) -> Result<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(Error::EmptySocketPath);
        }
        let stream = UnixStream::connect(path).map_err(|source| Error::Connect {
            path: path.to_path_buf(),
            source,
        })?;
        info!("connected to {}", path.display());
        Ok(Self::from_stream(path, stream, requirement))
    }

    /// Wrap an already-open stream.
    pub fn from_stream(
        path: impl AsRef<Path>,
        stream: impl Stream + 'static,
        requirement: VersionRequirement,
    ) -> Self {
        Self {
            socket_path: path.as_ref().to_path_buf(),
            requirement,
            stream: Mutex::new(Some(Box::new(stream))),
        }
    }

    /// The minimum daemon version this connection accepts.
    pub fn requirement(&self) -> VersionRequirement {
        self.requirement
    }

    /// Whether the stream is still open.
    pub fn is_open(&self) -> bool {
        self.lock().is_some()
    }

    fn lock(&self) -> MutexGuard<'_, Option<Box<dyn Stream>>> {
        // The guarded value is just the stream handle; a panic elsewhere
        // cannot leave it half-updated.
        self.stream.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for SocketConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SocketConnection")
            .field("socket_path", &self.socket_path)
            .field("requirement", &self.requirement)
            .finish_non_exhaustive()
    }
}

impl Connection for SocketConnection {
    fn send_command(&self, command: &str, args: &[String]) -> Result<Response> {
        let mut guard = self.lock();
        let stream = guard.as_mut().ok_or(Error::NotEstablished)?;

        let request = Request::new(command, args);
        debug!("sending {:?}", request.args);
        let response = round_trip(&mut **stream, &request)?;
        response.into_result()
    }

    fn close(&self) -> Result<()> {
        if let Some(mut stream) = self.lock().take() {
            stream.shutdown().map_err(Error::Close)?;
            info!("closed connection to {}", self.socket_path.display());
        }
        Ok(())
    }

    fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    fn server_version(&self) -> Result<String> {
        // `config --config-path` is the cheapest command the daemon answers.
        let response = self.send_command("config", &["--config-path".to_string()])?;
        if response.server_version.is_empty() {
            return Err(Error::EmptyVersion);
        }
        Ok(response.server_version)
    }

    fn check_server_version(&self) -> Result<()> {
        let version = self.server_version()?;
        self.requirement.check(&version)
    }
}

//  Wire helpers

/// Write `request` and read back one decoded (but unchecked) response.
fn round_trip(stream: &mut dyn Stream, request: &Request) -> Result<Response> {
    let bytes = serde_json::to_vec(request).map_err(Error::Encode)?;
    stream.write_all(&bytes).map_err(Error::Write)?;
    stream.flush().map_err(Error::Write)?;

    let data = read_response(stream)?;
    debug!("received {} bytes", data.len());
    serde_json::from_slice(&data).map_err(|source| Error::Decode {
        source,
        data: excerpt(&data),
    })
}

/// Accumulate reads until end-of-stream or an under-full read.
fn read_response(stream: &mut dyn Stream) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    let mut buf = [0u8; READ_CHUNK_SIZE];
    loop {
        match stream.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                data.extend_from_slice(&buf[..n]);
                if n < buf.len() {
                    break;
                }
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(source) => {
                return Err(Error::Read {
                    source,
                    data: excerpt(&data),
                })
            }
        }
    }
    Ok(data)
}

fn excerpt(data: &[u8]) -> String {
    let end = data.len().min(MAX_EXCERPT);
    String::from_utf8_lossy(&data[..end]).into_owned()
}

//  Tests

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::io::{Read, Write};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// An in-memory stream that replays scripted reads and records writes.
    ///
    /// Each scripted chunk is handed out by exactly one `read` call; a
    /// chunk larger than the caller's buffer is split.  An exhausted
    /// script reads as end-of-stream.
    #[derive(Default)]
    pub(crate) struct ScriptedStream {
        pub reads: VecDeque<std::io::Result<Vec<u8>>>,
        pub written: Arc<Mutex<Vec<u8>>>,
        pub shutdowns: Arc<AtomicUsize>,
        pub read_calls: Arc<AtomicUsize>,
        pub fail_writes: bool,
    }

    impl ScriptedStream {
        pub fn with_chunks(chunks: Vec<Vec<u8>>) -> Self {
            Self {
                reads: chunks.into_iter().map(Ok).collect(),
                ..Default::default()
            }
        }
    }

    impl Read for ScriptedStream {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.read_calls.fetch_add(1, Ordering::SeqCst);
            match self.reads.pop_front() {
                None => Ok(0),
                Some(Err(e)) => Err(e),
                Some(Ok(mut chunk)) => {
                    if chunk.len() > buf.len() {
                        let rest = chunk.split_off(buf.len());
                        self.reads.push_front(Ok(rest));
                    }
                    buf[..chunk.len()].copy_from_slice(&chunk);
                    Ok(chunk.len())
                }
            }
        }
    }

    impl Write for ScriptedStream {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if self.fail_writes {
                return Err(std::io::Error::new(ErrorKind::BrokenPipe, "broken pipe"));
            }
            self.written.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Stream for ScriptedStream {
        fn shutdown(&mut self) -> std::io::Result<()> {
            self.shutdowns.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    pub(crate) fn response_bytes(response: &Response) -> Vec<u8> {
        serde_json::to_vec(response).unwrap()
    }

    fn connection(stream: ScriptedStream) -> SocketConnection {
        SocketConnection::from_stream("/tmp/test.sock", stream, VersionRequirement::default())
    }

    fn big_response() -> Response {
        Response {
            server_version: "0.20.0-Beta abc".into(),
            stderr: String::new(),
            stdout: "x".repeat(3 * READ_CHUNK_SIZE + 123),
            exit_code: 0,
        }
    }

    #[test]
    fn request_is_written_as_one_envelope() {
        let stream = ScriptedStream::with_chunks(vec![response_bytes(&Response::default())]);
        let written = stream.written.clone();
        let conn = connection(stream);

        conn.send_command("list-windows", &["--all".into(), "--json".into()])
            .unwrap();

        let sent: Request = serde_json::from_slice(&written.lock().unwrap()).unwrap();
        assert_eq!(sent.command, "");
        assert_eq!(sent.args, vec!["list-windows", "--all", "--json"]);
        assert_eq!(sent.stdin, "");
    }

    #[test]
    fn clean_response_round_trips_unchanged() {
        let expected = Response {
            server_version: "0.20.2-Beta 1234".into(),
            stderr: String::new(),
            stdout: r#"[{"workspace":"1"}]"#.into(),
            exit_code: 0,
        };
        let conn = connection(ScriptedStream::with_chunks(vec![response_bytes(&expected)]));
        assert_eq!(conn.send_command("list-workspaces", &[]).unwrap(), expected);
    }

    #[test]
    fn chunked_reply_decodes_like_a_single_reply() {
        let expected = big_response();
        let bytes = response_bytes(&expected);

        // Full-buffer chunks followed by a short tail.
        let chunks: Vec<Vec<u8>> = bytes.chunks(READ_CHUNK_SIZE).map(<[u8]>::to_vec).collect();
        assert!(chunks.len() > 1);
        let chunked = connection(ScriptedStream::with_chunks(chunks));

        // Everything offered at once; the stream splits it per read and
        // ends with end-of-stream.
        let whole = connection(ScriptedStream::with_chunks(vec![bytes]));

        let a = chunked.send_command("list-windows", &[]).unwrap();
        let b = whole.send_command("list-windows", &[]).unwrap();
        assert_eq!(a, expected);
        assert_eq!(a, b);
    }

    #[test]
    fn exact_multiple_of_buffer_ends_on_eof() {
        let mut response = Response::default();
        let base = response_bytes(&response).len();
        response.stdout = "y".repeat(READ_CHUNK_SIZE * 2 - base);
        let bytes = response_bytes(&response);
        assert_eq!(bytes.len(), READ_CHUNK_SIZE * 2);

        let stream = ScriptedStream::with_chunks(vec![bytes]);
        let reads = stream.read_calls.clone();
        let conn = connection(stream);
        assert_eq!(conn.send_command("x", &[]).unwrap(), response);
        // Two full reads plus the end-of-stream read.
        assert_eq!(reads.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn short_read_stops_the_loop() {
        let bytes = response_bytes(&Response::default());
        let mut stream = ScriptedStream::with_chunks(vec![bytes]);
        // Anything after the short read must not be consumed.
        stream.reads.push_back(Ok(b"garbage".to_vec()));
        let reads = stream.read_calls.clone();
        let conn = connection(stream);

        conn.send_command("x", &[]).unwrap();
        assert_eq!(reads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn read_error_keeps_partial_data() {
        let mut stream = ScriptedStream::with_chunks(vec![vec![b'{'; READ_CHUNK_SIZE]]);
        stream.reads.push_back(Err(std::io::Error::new(
            ErrorKind::ConnectionReset,
            "reset",
        )));
        let conn = connection(stream);

        match conn.send_command("x", &[]) {
            Err(Error::Read { data, .. }) => assert_eq!(data.len(), READ_CHUNK_SIZE),
            other => panic!("expected read error, got {:?}", other),
        }
    }

    #[test]
    fn interrupted_reads_are_retried() {
        let mut stream = ScriptedStream::default();
        stream
            .reads
            .push_back(Err(std::io::Error::new(ErrorKind::Interrupted, "signal")));
        stream
            .reads
            .push_back(Ok(response_bytes(&Response::default())));
        let conn = connection(stream);
        assert!(conn.send_command("x", &[]).is_ok());
    }

    #[test]
    fn malformed_reply_reports_raw_bytes() {
        let conn = connection(ScriptedStream::with_chunks(vec![b"<html>nope</html>".to_vec()]));
        match conn.send_command("x", &[]) {
            Err(e @ Error::Decode { .. }) => assert!(e.to_string().contains("<html>nope</html>")),
            other => panic!("expected decode error, got {:?}", other),
        }
    }

    #[test]
    fn write_failure_fails_only_this_call() {
        let mut stream = ScriptedStream::default();
        stream.fail_writes = true;
        let conn = connection(stream);
        assert!(matches!(conn.send_command("x", &[]), Err(Error::Write(_))));
        assert!(conn.is_open());
    }

    #[test]
    fn failing_exit_code_is_an_error() {
        let response = Response {
            exit_code: 1,
            stderr: "No window is focused".into(),
            ..Default::default()
        };
        let conn = connection(ScriptedStream::with_chunks(vec![response_bytes(&response)]));
        match conn.send_command("focus", &[]) {
            Err(Error::ExitCode { code, stderr }) => {
                assert_eq!(code, 1);
                assert_eq!(stderr, "No window is focused");
            }
            other => panic!("expected exit code error, got {:?}", other),
        }
    }

    #[test]
    fn send_after_close_is_not_established() {
        let stream = ScriptedStream::default();
        let shutdowns = stream.shutdowns.clone();
        let conn = connection(stream);

        conn.close().unwrap();
        conn.close().unwrap();
        assert_eq!(shutdowns.load(Ordering::SeqCst), 1);
        assert!(matches!(conn.send_command("x", &[]), Err(Error::NotEstablished)));
        assert!(matches!(conn.server_version(), Err(Error::NotEstablished)));
    }

    #[test]
    fn server_version_is_read_from_the_envelope() {
        let response = Response {
            server_version: "0.19.2-Beta abc".into(),
            stdout: "/Users/me/.aerospace.toml".into(),
            ..Default::default()
        };
        let stream = ScriptedStream::with_chunks(vec![
            response_bytes(&response),
            response_bytes(&response),
        ]);
        let written = stream.written.clone();
        let conn = connection(stream);

        assert_eq!(conn.server_version().unwrap(), "0.19.2-Beta abc");
        let sent = String::from_utf8(written.lock().unwrap().clone()).unwrap();
        assert!(sent.contains(r#""args":["config","--config-path"]"#));

        assert!(conn.check_server_version().unwrap_err().is_version_mismatch());
    }

    #[test]
    fn empty_server_version_is_rejected() {
        let conn = connection(ScriptedStream::with_chunks(vec![response_bytes(
            &Response::default(),
        )]));
        assert!(matches!(conn.check_server_version(), Err(Error::EmptyVersion)));
    }

    #[test]
    fn check_uses_the_requirement_given_at_construction() {
        let response = Response {
            server_version: "2.10.4-Beta abc".into(),
            ..Default::default()
        };
        let stream = ScriptedStream::with_chunks(vec![
            response_bytes(&response),
            response_bytes(&response),
        ]);
        let conn = SocketConnection::from_stream("/tmp/test.sock", stream, VersionRequirement::new(2, 10));
        assert_eq!(conn.requirement(), VersionRequirement::new(2, 10));
        conn.check_server_version().unwrap();

        // The default 0.20 requirement rejects the same daemon.
        let stream = ScriptedStream::with_chunks(vec![response_bytes(&response)]);
        let conn = connection(stream);
        assert_eq!(conn.requirement(), VersionRequirement::default());
        assert!(conn.check_server_version().unwrap_err().is_version_mismatch());
    }

    #[test]
    fn connect_rejects_empty_path() {
        let err = SocketConnection::connect("", VersionRequirement::default()).unwrap_err();
        assert!(matches!(err, Error::EmptySocketPath));
    }

    #[test]
    fn connect_reports_missing_socket() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.sock");
        match SocketConnection::connect(&path, VersionRequirement::default()) {
            Err(Error::Connect { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected connect error, got {:?}", other),
        }
    }

    #[test]
    fn concurrent_callers_are_serialized() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aerospace.sock");
        let _daemon = fake_daemon::spawn(&path, |req| Response {
            server_version: "0.20.0-Beta x".into(),
            stdout: req.args.join(" "),
            ..Default::default()
        });

        let conn = Arc::new(SocketConnection::connect(&path, VersionRequirement::default()).unwrap());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let conn = conn.clone();
                std::thread::spawn(move || {
                    for j in 0..10 {
                        let arg = format!("{}-{}", i, j);
                        let res = conn.send_command("echo", &[arg.clone()]).unwrap();
                        assert_eq!(res.stdout, format!("echo {}", arg));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        conn.close().unwrap();
    }

    /// A minimal stand-in for the AeroSpace daemon on a real Unix socket.
    pub(crate) mod fake_daemon {
        use super::super::*;
        use std::io::Write;
        use std::os::unix::net::UnixListener;
        use std::thread::JoinHandle;

        /// Bind `path` and answer every request with `handler`.
        ///
        /// Connections are served one after another; each may carry any
        /// number of requests.
        pub(crate) fn spawn<F>(path: &Path, handler: F) -> JoinHandle<()>
        where
            F: Fn(&Request) -> Response + Send + 'static,
        {
            let listener = UnixListener::bind(path).expect("bind fake daemon");
            std::thread::spawn(move || {
                for stream in listener.incoming() {
                    let Ok(stream) = stream else { break };
                    let requests =
                        serde_json::Deserializer::from_reader(&stream).into_iter::<Request>();
                    for request in requests {
                        let Ok(request) = request else { break };
                        let bytes = serde_json::to_vec(&handler(&request)).unwrap();
                        if (&stream).write_all(&bytes).is_err() {
                            break;
                        }
                    }
                }
            })
        }
    }
}

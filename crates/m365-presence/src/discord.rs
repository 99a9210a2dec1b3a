//! Discord local IPC sink
//!
//! Speaks the Discord rich-presence IPC protocol directly: frames of a
//! little-endian `opcode: u32` and `len: u32` header followed by a JSON
//! payload, over a unix socket (`discord-ipc-N` in the runtime dir) or a
//! named pipe (`\\.\pipe\discord-ipc-N`) depending on the platform.

use crate::PresenceSink;
use m365_core::{M365Error, M365Result};
use serde_json::json;
use std::io::{Read, Write};

/// Opcode for the initial handshake frame
const OP_HANDSHAKE: u32 = 0;
/// Opcode for command frames
const OP_FRAME: u32 = 1;

/// Application id registered for the shell's presence
const CLIENT_ID: &str = "1105711008025931856";

/// Discord scans indices 0..10 for its IPC endpoint
const MAX_SOCKET_INDEX: u32 = 10;

trait Connection: Read + Write + Send {}
impl<T: Read + Write + Send> Connection for T {}

/// Encode a single IPC frame
fn encode_frame(opcode: u32, payload: &str) -> Vec<u8> {
    let bytes = payload.as_bytes();
    let mut frame = Vec::with_capacity(8 + bytes.len());
    frame.extend_from_slice(&opcode.to_le_bytes());
    frame.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
    frame.extend_from_slice(bytes);
    frame
}

/// Presence sink talking to a local Discord client.
///
/// The connection is established lazily and re-established after any
/// failure on the next update; every error is reported to the caller, who
/// logs and moves on.
pub struct DiscordSink {
    conn: Option<Box<dyn Connection>>,
    nonce: u64,
}

impl DiscordSink {
    pub fn new() -> Self {
        Self {
            conn: None,
            nonce: 0,
        }
    }

    fn next_nonce(&mut self) -> String {
        self.nonce += 1;
        self.nonce.to_string()
    }

    #[cfg(unix)]
    fn open_socket() -> M365Result<Box<dyn Connection>> {
        use std::os::unix::net::UnixStream;
        use std::path::PathBuf;

        let base = std::env::var_os("XDG_RUNTIME_DIR")
            .or_else(|| std::env::var_os("TMPDIR"))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("/tmp"));

        for index in 0..MAX_SOCKET_INDEX {
            let path = base.join(format!("discord-ipc-{}", index));
            if let Ok(stream) = UnixStream::connect(&path) {
                log::debug!("Connected to presence socket {:?}", path);
                return Ok(Box::new(stream));
            }
        }
        Err(M365Error::presence("no presence socket found"))
    }

    #[cfg(windows)]
    fn open_socket() -> M365Result<Box<dyn Connection>> {
        use std::fs::OpenOptions;

        for index in 0..MAX_SOCKET_INDEX {
            let path = format!(r"\\.\pipe\discord-ipc-{}", index);
            if let Ok(pipe) = OpenOptions::new().read(true).write(true).open(&path) {
                log::debug!("Connected to presence pipe {}", path);
                return Ok(Box::new(pipe));
            }
        }
        Err(M365Error::presence("no presence pipe found"))
    }

    fn ensure_connected(&mut self) -> M365Result<()> {
        if self.conn.is_some() {
            return Ok(());
        }

        let mut conn = Self::open_socket()?;
        let handshake = json!({ "v": 1, "client_id": CLIENT_ID }).to_string();
        conn.write_all(&encode_frame(OP_HANDSHAKE, &handshake))?;

        // Discord answers with a READY dispatch; drain it so subsequent
        // writes start from a clean stream.
        let mut header = [0u8; 8];
        conn.read_exact(&mut header)?;
        let len = u32::from_le_bytes([header[4], header[5], header[6], header[7]]) as usize;
        let mut payload = vec![0u8; len];
        conn.read_exact(&mut payload)?;

        log::info!("Presence handshake complete");
        self.conn = Some(conn);
        Ok(())
    }

    fn send_activity(&mut self, activity: serde_json::Value) -> M365Result<()> {
        self.ensure_connected()?;
        let payload = json!({
            "cmd": "SET_ACTIVITY",
            "args": {
                "pid": std::process::id(),
                "activity": activity,
            },
            "nonce": self.next_nonce(),
        })
        .to_string();

        // A dead socket surfaces here as a write error; drop the connection
        // so the next update reconnects.
        let result = self
            .conn
            .as_mut()
            .ok_or_else(|| M365Error::presence("not connected"))
            .and_then(|conn| {
                conn.write_all(&encode_frame(OP_FRAME, &payload))
                    .map_err(M365Error::from)
            });
        if result.is_err() {
            self.conn = None;
        }
        result
    }
}

impl Default for DiscordSink {
    fn default() -> Self {
        Self::new()
    }
}

impl PresenceSink for DiscordSink {
    fn set_activity(&mut self, text: &str) -> M365Result<()> {
        self.send_activity(json!({ "details": text }))
    }

    fn clear(&mut self) -> M365Result<()> {
        self.send_activity(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_header_is_little_endian() {
        let frame = encode_frame(OP_HANDSHAKE, "{}");
        assert_eq!(&frame[0..4], &[0, 0, 0, 0]);
        assert_eq!(&frame[4..8], &[2, 0, 0, 0]);
        assert_eq!(&frame[8..], b"{}");
    }

    #[test]
    fn test_frame_length_matches_payload() {
        let payload = json!({ "v": 1, "client_id": CLIENT_ID }).to_string();
        let frame = encode_frame(OP_FRAME, &payload);
        let len = u32::from_le_bytes([frame[4], frame[5], frame[6], frame[7]]);
        assert_eq!(len as usize, payload.len());
        assert_eq!(frame.len(), 8 + payload.len());
        assert_eq!(&frame[0..4], &[1, 0, 0, 0]);
    }
}

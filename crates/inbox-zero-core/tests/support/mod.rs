//! Scripted in-process IMAP server for integration tests.
//!
//! Speaks just enough IMAP4rev1 over plain TCP for the mail service:
//! LOGIN, SELECT, FETCH, UID MOVE and LOGOUT. Folders live in shared state
//! so tests can seed them and inspect the result of a move.

#![allow(dead_code, clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use inbox_zero_core::ConnectionConfig;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

pub const USERNAME: &str = "tester@example.com";
pub const PASSWORD: &str = "secret-pass";

#[derive(Default)]
struct State {
    folders: HashMap<String, Vec<(u32, Vec<u8>)>>,
    next_uid: u32,
    omit_uids: bool,
    commands: Vec<String>,
}

/// A listening fake server. Dropping it leaves the accept task running until
/// the test runtime shuts down.
pub struct FakeServer {
    state: Arc<Mutex<State>>,
    port: u16,
}

impl FakeServer {
    /// Starts a server with empty `INBOX` and `Archive` folders.
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let mut state = State {
            next_uid: 1,
            ..State::default()
        };
        state.folders.insert("INBOX".to_string(), Vec::new());
        state.folders.insert("Archive".to_string(), Vec::new());
        let state = Arc::new(Mutex::new(state));

        let accept_state = Arc::clone(&state);
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let state = Arc::clone(&accept_state);
                tokio::spawn(async move {
                    let _ = serve(stream, state).await;
                });
            }
        });

        Self { state, port }
    }

    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Config pointing at this server with the right credentials.
    pub fn config(&self) -> ConnectionConfig {
        self.config_with_password(PASSWORD)
    }

    pub fn config_with_password(&self, password: &str) -> ConnectionConfig {
        ConnectionConfig::builder("127.0.0.1", USERNAME, password)
            .use_tls(false)
            .port(self.port)
            .build()
    }

    /// Appends a message to `folder`, creating it if needed. Returns its UID.
    pub fn add_message(&self, folder: &str, raw: impl Into<Vec<u8>>) -> u32 {
        let mut state = self.state.lock().unwrap();
        let uid = state.next_uid;
        state.next_uid += 1;
        state
            .folders
            .entry(folder.to_string())
            .or_default()
            .push((uid, raw.into()));
        uid
    }

    /// Same server, but the client is told to speak TLS to it.
    pub fn tls_config(&self) -> ConnectionConfig {
        ConnectionConfig::builder("127.0.0.1", USERNAME, PASSWORD)
            .use_tls(true)
            .port(self.port)
            .build()
    }

    /// Creates an empty folder under its wire (modified UTF-7) name.
    pub fn add_folder(&self, wire_name: &str) {
        self.state
            .lock()
            .unwrap()
            .folders
            .entry(wire_name.to_string())
            .or_default();
    }

    /// Every command line received so far, in order.
    pub fn commands(&self) -> Vec<String> {
        self.state.lock().unwrap().commands.clone()
    }

    /// Makes FETCH responses leave out the UID item.
    pub fn omit_uids(&self) {
        self.state.lock().unwrap().omit_uids = true;
    }

    /// UIDs currently in `folder`, in server order.
    pub fn uids(&self, folder: &str) -> Vec<u32> {
        self.state
            .lock()
            .unwrap()
            .folders
            .get(folder)
            .map(|messages| messages.iter().map(|(uid, _)| *uid).collect())
            .unwrap_or_default()
    }
}

/// Builds a simple text message with CRLF line endings.
pub fn text_message(subject: &str, body: &str) -> Vec<u8> {
    format!(
        "From: Sender <sender@test.com>\r\n\
         To: {USERNAME}\r\n\
         Subject: {subject}\r\n\
         Date: Tue, 05 Mar 2024 10:00:00 +0000\r\n\
         Content-Type: text/plain; charset=utf-8\r\n\
         \r\n\
         {body}\r\n"
    )
    .into_bytes()
}

/// A message with no Date header.
pub fn undated_message(subject: &str) -> Vec<u8> {
    format!(
        "From: sender@test.com\r\n\
         Subject: {subject}\r\n\
         \r\n\
         No date on this one\r\n"
    )
    .into_bytes()
}

/// Content of the `test.txt` attachment in [`message_with_attachment`].
pub const ATTACHMENT_CONTENT: &[u8] = b"Test file content";

/// A multipart message carrying `test.txt`.
pub fn message_with_attachment(subject: &str) -> Vec<u8> {
    format!(
        "From: sender@test.com\r\n\
         Subject: {subject}\r\n\
         MIME-Version: 1.0\r\n\
         Content-Type: multipart/mixed; boundary=\"part\"\r\n\
         \r\n\
         --part\r\n\
         Content-Type: text/plain; charset=utf-8\r\n\
         \r\n\
         Email with attachment\r\n\
         --part\r\n\
         Content-Type: application/octet-stream\r\n\
         Content-Transfer-Encoding: base64\r\n\
         Content-Disposition: attachment; filename=\"test.txt\"\r\n\
         \r\n\
         VGVzdCBmaWxlIGNvbnRlbnQ=\r\n\
         --part--\r\n"
    )
    .into_bytes()
}

async fn serve(stream: TcpStream, state: Arc<Mutex<State>>) -> std::io::Result<()> {
    let (read, mut write) = stream.into_split();
    let mut lines = BufReader::new(read).lines();
    let mut selected: Option<String> = None;

    write.write_all(b"* OK fake IMAP server ready\r\n").await?;

    while let Some(line) = lines.next_line().await? {
        state.lock().unwrap().commands.push(line.clone());
        let tokens: Vec<String> = line
            .split_whitespace()
            .map(|t| t.trim_matches('"').to_string())
            .collect();
        let [tag, command, args @ ..] = tokens.as_slice() else {
            continue;
        };

        let command = command.to_ascii_uppercase();
        let reply = respond(&state, &mut selected, tag, &command, args);
        write.write_all(&reply).await?;
        write.flush().await?;

        if command == "LOGOUT" {
            break;
        }
    }
    Ok(())
}

fn respond(
    state: &Mutex<State>,
    selected: &mut Option<String>,
    tag: &str,
    command: &str,
    args: &[String],
) -> Vec<u8> {
    let mut state = state.lock().unwrap();

    match command {
        "LOGIN" => {
            if args.len() == 2 && args[0] == USERNAME && args[1] == PASSWORD {
                format!("{tag} OK LOGIN completed\r\n").into_bytes()
            } else {
                format!("{tag} NO [AUTHENTICATIONFAILED] Invalid credentials\r\n").into_bytes()
            }
        }
        "SELECT" => {
            let folder = args.join(" ");
            match state.folders.get(&folder) {
                Some(messages) => {
                    let reply = format!(
                        "* {} EXISTS\r\n\
                         * 0 RECENT\r\n\
                         * FLAGS (\\Seen \\Deleted)\r\n\
                         * OK [UIDVALIDITY 1] UIDs valid\r\n\
                         * OK [UIDNEXT {}] Predicted next UID\r\n\
                         {tag} OK [READ-WRITE] SELECT completed\r\n",
                        messages.len(),
                        state.next_uid
                    );
                    *selected = Some(folder);
                    reply.into_bytes()
                }
                None => format!("{tag} NO Mailbox does not exist\r\n").into_bytes(),
            }
        }
        "FETCH" => {
            let Some(folder) = selected.as_deref() else {
                return format!("{tag} BAD No folder selected\r\n").into_bytes();
            };
            let Some((start, end)) = args.first().and_then(|set| sequence_range(set)) else {
                return format!("{tag} BAD Invalid sequence set\r\n").into_bytes();
            };

            let messages = state.folders.get(folder).cloned().unwrap_or_default();
            let mut reply = Vec::new();
            for seq in start..=end {
                let Some((uid, raw)) = messages.get(seq - 1) else {
                    continue;
                };
                let uid_item = if state.omit_uids {
                    String::new()
                } else {
                    format!("UID {uid} ")
                };
                reply.extend_from_slice(
                    format!("* {seq} FETCH ({uid_item}BODY[] {{{}}}\r\n", raw.len()).as_bytes(),
                );
                reply.extend_from_slice(raw);
                reply.extend_from_slice(b")\r\n");
            }
            reply.extend_from_slice(format!("{tag} OK FETCH completed\r\n").as_bytes());
            reply
        }
        "UID" if args.first().is_some_and(|sub| sub.eq_ignore_ascii_case("MOVE")) => {
            let Some(folder) = selected.clone() else {
                return format!("{tag} BAD No folder selected\r\n").into_bytes();
            };
            let (Some(uid), Some(target)) = (args.get(1), args.get(2..).map(|t| t.join(" "))) else {
                return format!("{tag} BAD Missing arguments\r\n").into_bytes();
            };
            if !state.folders.contains_key(&target) {
                return format!("{tag} NO [TRYCREATE] Mailbox does not exist\r\n").into_bytes();
            }

            let uid: u32 = uid.parse().unwrap_or(0);
            let source = state.folders.entry(folder).or_default();
            if let Some(index) = source.iter().position(|(u, _)| *u == uid) {
                let message = source.remove(index);
                state.folders.entry(target).or_default().push(message);
            }
            format!("{tag} OK MOVE completed\r\n").into_bytes()
        }
        "LOGOUT" => format!("{tag} OK LOGOUT completed\r\n").into_bytes(),
        _ => format!("{tag} BAD Unknown command\r\n").into_bytes(),
    }
}

fn sequence_range(set: &str) -> Option<(usize, usize)> {
    match set.split_once(':') {
        Some((start, end)) => Some((start.parse().ok()?, end.parse().ok()?)),
        None => {
            let seq = set.parse().ok()?;
            Some((seq, seq))
        }
    }
}

/// Installs a test subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

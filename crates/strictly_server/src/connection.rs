//! Line-oriented TCP front end.
//!
//! A connection logs in with a name, then sends one command per line.
//! Top-level commands manage tables; `table <name> <command>` (or a focused
//! table) forwards the rest of the line to that table.

use crate::config::ServerConfig;
use crate::host::GameHost;
use std::net::SocketAddr;
use std::sync::Arc;
use strictly_table::{Command, PlayerId, render_markup};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// Longest input line accepted from a client, in bytes.
pub const MAX_LINE_LENGTH: usize = 1024;

const HELP: &[&str] = &[
    "",
    "SERVER COMMANDS:",
    "",
    "                      ^!help^., ^!h^., ^!?^.     Show this help.",
    "                             ^!games^.     List the games you can play.",
    "                            ^!tables^.     List the open tables.",
    "              ^!new^. <game> <table>     Open a new table of <game>.",
    "     ^!table^. <table> <command>, ^!t^.     Send <command> to <table>.",
    "                 ^!focus^. <table>, ^!f^.     Send every line to <table>.",
    "                     ^!unfocus^., ^!unf^.     Stop sending lines to a table.",
    "                          ^!quit^., ^!q^.     Disconnect.",
    "",
    "While focused, start a line with ^!/^. to use a server command.",
    "",
];

/// Whether a connection should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next line.
    Continue,
    /// Close the connection.
    Quit,
}

/// Per-connection state of a logged-in player.
#[derive(Debug, Clone)]
pub struct Session {
    player: PlayerId,
    focus: Option<String>,
}

impl Session {
    /// Starts a session for a logged-in player.
    pub fn new(player: PlayerId) -> Self {
        Self {
            player,
            focus: None,
        }
    }

    /// The player behind this session.
    pub fn player(&self) -> &PlayerId {
        &self.player
    }

    /// Table every plain line goes to, if any.
    pub fn focus(&self) -> Option<&str> {
        self.focus.as_deref()
    }

    fn tell(&self, host: &GameHost, line: &str) {
        host.directory().send(&self.player, line);
    }

    /// Interprets one input line.
    #[instrument(skip(self, host), fields(player = %self.player))]
    pub fn handle_line(&mut self, host: &GameHost, line: &str) -> Flow {
        let line = line.trim();
        if line.is_empty() {
            return Flow::Continue;
        }

        if let Some(table) = self.focus.clone() {
            if host.table(&table).is_none() {
                self.tell(
                    host,
                    &format!("Table ^Y{}^~ is defunct; unfocusing.", table),
                );
                self.focus = None;
            } else if let Some(rest) = line.strip_prefix('/') {
                return self.top_level(host, rest);
            } else if Command::parse(line).is_some_and(|c| c.is(&["unfocus", "unf", "quit", "q"])) {
                return self.top_level(host, line);
            } else {
                if let Err(e) = host.dispatch(&self.player, &table, line) {
                    self.tell(host, e.message());
                }
                return Flow::Continue;
            }
        }

        self.top_level(host, line)
    }

    fn top_level(&mut self, host: &GameHost, line: &str) -> Flow {
        let Some(cmd) = Command::parse(line) else {
            return Flow::Continue;
        };
        debug!(command = %cmd.primary, "Top-level command");

        if cmd.is(&["help", "h", "?"]) {
            for line in HELP {
                self.tell(host, line);
            }
        } else if cmd.is(&["games"]) {
            host.list_games(&self.player);
        } else if cmd.is(&["tables"]) {
            host.list_tables(&self.player);
        } else if cmd.is(&["new"]) {
            match cmd.args.as_slice() {
                [game, table] => {
                    if let Err(e) = host.create_table(&self.player, game, table) {
                        self.tell(host, e.message());
                    }
                }
                _ => self.tell(host, "Invalid game command."),
            }
        } else if cmd.is(&["table", "t"]) {
            match cmd.args.split_first() {
                Some((table, rest)) if !rest.is_empty() => {
                    if let Err(e) = host.dispatch(&self.player, table, &rest.join(" ")) {
                        self.tell(host, e.message());
                    }
                }
                _ => self.tell(host, "Invalid table command."),
            }
        } else if cmd.is(&["focus", "f"]) {
            self.set_focus(host, cmd.args.first().map(String::as_str));
        } else if cmd.is(&["unfocus", "unf"]) {
            if self.focus.take().is_some() {
                self.tell(host, "You are no longer focused on a table.");
            } else {
                self.tell(host, "You are already unfocused.");
            }
        } else if cmd.is(&["quit", "q"]) {
            self.tell(host, "Goodbye.");
            return Flow::Quit;
        } else {
            self.tell(host, "Unknown command.  Type ^!help^. for help.");
        }
        Flow::Continue
    }

    fn set_focus(&mut self, host: &GameHost, table: Option<&str>) {
        let Some(name) = table else {
            self.tell(host, "You must have a table to focus on.");
            return;
        };
        match host.table(name) {
            Some(table) => {
                self.tell(host, &format!("You are now focused on ^G{}^~.", table.name()));
                self.focus = Some(table.name().to_string());
            }
            None => self.tell(host, "You cannot focus on a nonexistent table."),
        }
    }
}

/// Binds the configured address and serves connections forever.
#[instrument(skip_all, fields(addr = %config.bind_address()))]
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let listener = TcpListener::bind(config.bind_address()).await?;
    let host = Arc::new(GameHost::from_config(&config));
    run(listener, Arc::new(config), host).await
}

/// Accepts connections on an already bound listener.
pub async fn run(
    listener: TcpListener,
    config: Arc<ServerConfig>,
    host: Arc<GameHost>,
) -> anyhow::Result<()> {
    info!(addr = %listener.local_addr()?, name = %config.name(), "Server listening");
    loop {
        let (socket, addr) = listener.accept().await?;
        info!(%addr, "Client connected");
        let config = Arc::clone(&config);
        let host = Arc::clone(&host);
        tokio::spawn(async move {
            if let Err(e) = handle_connection(socket, addr, config, host).await {
                warn!(%addr, error = %e, "Connection ended with error");
            }
            info!(%addr, "Client disconnected");
        });
    }
}

async fn handle_connection(
    socket: TcpStream,
    addr: SocketAddr,
    config: Arc<ServerConfig>,
    host: Arc<GameHost>,
) -> anyhow::Result<()> {
    let (reader, mut writer) = socket.into_split();
    let mut reader = BufReader::new(reader);
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    let write_task = tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            if writer.write_all(line.as_bytes()).await.is_err() {
                break;
            }
            if writer.write_all(b"\r\n").await.is_err() {
                break;
            }
            if writer.flush().await.is_err() {
                break;
            }
        }
    });

    let style = config.markup_style();
    let say = |line: &str| {
        // The writer only stops once the socket is gone.
        let _ = tx.send(render_markup(line, style));
    };

    say("");
    say(&format!("Welcome to ^G{}^~!", config.name()));
    if let Some(greeting) = config.greeting() {
        say(greeting);
    }

    let player = loop {
        say("Please enter your name:");
        let Some(line) = read_line(&mut reader).await? else {
            debug!(%addr, "Closed before logging in");
            drop(tx);
            let _ = write_task.await;
            return Ok(());
        };
        match host.directory().register(line.trim(), tx.clone()) {
            Ok(player) => break player,
            Err(e) => say(e.message()),
        }
    };
    say(&format!("Welcome, {}!  Type ^!help^. for help.", player));
    info!(%addr, %player, "Logged in");

    let result = read_commands(&mut reader, Session::new(player.clone()), &host).await;

    host.logout(&player);
    drop(tx);
    let _ = write_task.await;
    result
}

async fn read_commands<R: AsyncBufRead + Unpin>(
    reader: &mut R,
    mut session: Session,
    host: &GameHost,
) -> anyhow::Result<()> {
    while let Some(line) = read_line(reader).await? {
        if session.handle_line(host, &line) == Flow::Quit {
            break;
        }
    }
    Ok(())
}

/// Reads one line without its terminator, or `None` at end of input.
///
/// # Errors
///
/// Fails on a read error or a line longer than [`MAX_LINE_LENGTH`].
async fn read_line<R: AsyncBufRead + Unpin>(reader: &mut R) -> anyhow::Result<Option<String>> {
    let mut buf = Vec::new();
    let read = (&mut *reader)
        .take(MAX_LINE_LENGTH as u64 + 1)
        .read_until(b'\n', &mut buf)
        .await?;
    if read == 0 {
        return Ok(None);
    }
    if buf.last() != Some(&b'\n') && buf.len() > MAX_LINE_LENGTH {
        anyhow::bail!("Input line exceeds {} bytes", MAX_LINE_LENGTH);
    }
    let line = String::from_utf8_lossy(&buf);
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

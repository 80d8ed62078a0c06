//! Tests for table hosting and the line front end, without a network.

use std::sync::Arc;
use strictly_server::{Flow, GameHost, PlayerDirectory, Session};
use strictly_table::{MarkupStyle, PlayerId, TableGame};
use strictly_y::Phase;
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

struct Client {
    id: PlayerId,
    rx: UnboundedReceiver<String>,
}

impl Client {
    /// Everything delivered since the last drain.
    fn drain(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        while let Ok(line) = self.rx.try_recv() {
            lines.push(line);
        }
        lines
    }

    fn saw(&mut self, needle: &str) -> bool {
        self.drain().iter().any(|l| l.contains(needle))
    }
}

fn host(max_tables: usize) -> GameHost {
    GameHost::new(Arc::new(PlayerDirectory::new(MarkupStyle::Plain)), max_tables)
}

fn login(host: &GameHost, name: &str) -> Client {
    let (tx, rx) = unbounded_channel();
    let id = host.directory().register(name, tx).expect("free name");
    Client { id, rx }
}

fn y_phase(host: &GameHost, table: &str) -> Phase {
    let table = host.table(table).expect("table exists");
    let game = table.game();
    match &*game {
        strictly_server::AnyGame::Y(y) => y.phase(),
    }
}

#[test]
fn test_create_table() {
    let host = host(8);
    let mut alice = login(&host, "alice");

    let table = host.create_table(&alice.id, "Y", "Oak").expect("new table");
    assert_eq!(table.name(), "Oak");
    assert_eq!(table.game().game_name(), "y");
    assert!(host.table("oak").is_some());
    assert_eq!(host.table_count(), 1);

    let lines = alice.drain();
    assert!(lines.iter().any(|l| l == "alice created a new table of Y."));
    assert!(lines.iter().any(|l| l == "A new table of Y called Oak has been created."));
}

#[test]
fn test_create_table_rejections() {
    let host = host(1);
    let alice = login(&host, "alice");

    let err = host.create_table(&alice.id, "chess", "oak").expect_err("unknown game");
    assert_eq!(err.message(), "No such game ^Rchess^~.");

    let err = host.create_table(&alice.id, "y", "2oak").expect_err("bad name");
    assert_eq!(err.message(), "Invalid table name.");

    host.create_table(&alice.id, "y", "oak").expect("new table");
    let err = host.create_table(&alice.id, "y", "OAK").expect_err("duplicate");
    assert_eq!(err.message(), "A table named ^ROAK^~ already exists.");

    let err = host.create_table(&alice.id, "y", "elm").expect_err("full");
    assert!(err.message().contains("cannot open any more tables"));
}

#[test]
fn test_dispatch_unknown_table() {
    let host = host(8);
    let alice = login(&host, "alice");
    let err = host.dispatch(&alice.id, "nowhere", "show").expect_err("no table");
    assert_eq!(err.message(), "Game table ^Mnowhere^~ does not exist.");
}

#[test]
fn test_refusals_go_to_actor_only() {
    let host = host(8);
    let mut alice = login(&host, "alice");
    let mut bob = login(&host, "bob");
    host.create_table(&alice.id, "y", "oak").expect("new table");
    host.dispatch(&bob.id, "oak", "watch").expect("table exists");
    alice.drain();
    bob.drain();

    host.dispatch(&alice.id, "oak", "size 40").expect("table exists");
    let lines = alice.drain();
    assert_eq!(lines, vec!["(Y): Too small or large.  Must be 2 to 26 inclusive.".to_string()]);
    assert!(bob.drain().is_empty());

    host.dispatch(&alice.id, "oak", "dance").expect("table exists");
    assert_eq!(alice.drain(), vec!["(Y): Invalid command.".to_string()]);
}

#[test]
fn test_common_commands() {
    let host = host(8);
    let mut alice = login(&host, "alice");
    let mut bob = login(&host, "bob");
    host.create_table(&alice.id, "y", "oak").expect("new table");

    host.dispatch(&bob.id, "oak", "help").expect("table exists");
    let help = bob.drain();
    assert!(help.iter().any(|l| l.contains("VIEWING:")));
    assert!(help.iter().any(|l| l.contains("Y SETUP PHASE:")));

    host.dispatch(&bob.id, "oak", "kibitz").expect("table exists");
    assert!(bob.saw("The game is not currently active."));
    host.dispatch(&bob.id, "oak", "kibitz").expect("table exists");
    assert!(bob.saw("You're already watching this game!"));

    host.dispatch(&alice.id, "oak", "size 5").expect("table exists");
    assert!(bob.saw("alice has changed the size of the board to 5."));

    host.dispatch(&bob.id, "oak", "showconf").expect("table exists");
    assert!(bob.saw("Board size: 5"));

    host.dispatch(&bob.id, "oak", "l").expect("table exists");
    assert!(bob.saw("- 5"));
    alice.drain();
}

#[test]
fn test_game_autostarts_after_dispatch() {
    let host = host(8);
    let mut alice = login(&host, "alice");
    let bob = login(&host, "bob");
    host.create_table(&alice.id, "y", "oak").expect("new table");

    host.dispatch(&alice.id, "oak", "size 3").expect("table exists");
    host.dispatch(&alice.id, "oak", "ready").expect("table exists");
    host.dispatch(&alice.id, "oak", "join").expect("table exists");
    assert_eq!(y_phase(&host, "oak"), Phase::NeedPlayers);
    host.dispatch(&bob.id, "oak", "join").expect("table exists");
    assert_eq!(y_phase(&host, "oak"), Phase::Playing);
    assert!(alice.saw("It is alice's turn (White)."));

    host.dispatch(&alice.id, "oak", "move a1").expect("table exists");
    assert!(alice.saw("alice has moved to a1."));
}

#[test]
fn test_finished_table_is_closed() {
    let host = host(8);
    let mut alice = login(&host, "alice");
    host.create_table(&alice.id, "y", "oak").expect("new table");
    alice.drain();

    host.dispatch(&alice.id, "oak", "terminate").expect("table exists");
    assert!(host.table("oak").is_none());
    let lines = alice.drain();
    assert!(lines.iter().any(|l| l == "(Y): alice has terminated the game."));
    assert!(lines.iter().any(|l| l == "Table oak is now closed."));
}

#[test]
fn test_logout_vacates_seats() {
    let host = host(8);
    let mut alice = login(&host, "alice");
    let bob = login(&host, "bob");
    host.create_table(&alice.id, "y", "oak").expect("new table");
    host.dispatch(&alice.id, "oak", "ready").expect("table exists");
    host.dispatch(&bob.id, "oak", "join").expect("table exists");
    alice.drain();

    host.logout(&bob.id);
    assert!(!host.directory().is_online(&bob.id));
    assert!(alice.saw("bob has left the table."));
    let table = host.table("oak").expect("still open");
    assert!(!strictly_table::Channel::is_connected(table.channel().as_ref(), &bob.id));
}

#[test]
fn test_replace_seats_only_logged_in_players() {
    let host = host(8);
    let mut alice = login(&host, "alice");
    let mut carol = login(&host, "carol");
    host.create_table(&alice.id, "y", "oak").expect("new table");
    host.dispatch(&alice.id, "oak", "ready").expect("table exists");
    host.dispatch(&alice.id, "oak", "join").expect("table exists");
    alice.drain();

    host.dispatch(&alice.id, "oak", "replace black dave").expect("table exists");
    assert_eq!(alice.drain(), vec!["(Y): Player dave does not exist.".to_string()]);

    host.dispatch(&alice.id, "oak", "replace black Carol").expect("table exists");
    assert!(alice.saw("You placed carol in seat Black."));
    assert_eq!(y_phase(&host, "oak"), Phase::Playing);
    assert!(carol.saw("It is alice's turn (White)."));
}

#[test]
fn test_session_table_and_focus() {
    let host = host(8);
    let mut alice = login(&host, "alice");
    let mut session = Session::new(alice.id.clone());

    assert_eq!(session.handle_line(&host, "new y oak"), Flow::Continue);
    assert!(host.table("oak").is_some());

    session.handle_line(&host, "t oak size 4");
    assert!(alice.saw("changed the size of the board to 4"));

    session.handle_line(&host, "table oak");
    assert!(alice.saw("Invalid table command."));

    session.handle_line(&host, "focus elm");
    assert!(alice.saw("You cannot focus on a nonexistent table."));

    session.handle_line(&host, "focus OAK");
    assert!(alice.saw("You are now focused on oak."));
    assert_eq!(session.focus(), Some("oak"));

    session.handle_line(&host, "size 6");
    assert!(alice.saw("changed the size of the board to 6"));

    session.handle_line(&host, "/tables");
    assert!(alice.saw("ACTIVE GAMES:"));

    session.handle_line(&host, "unfocus");
    assert!(alice.saw("You are no longer focused on a table."));
    session.handle_line(&host, "unf");
    assert!(alice.saw("You are already unfocused."));
}

#[test]
fn test_session_drops_focus_on_closed_table() {
    let host = host(8);
    let mut alice = login(&host, "alice");
    let mut session = Session::new(alice.id.clone());
    session.handle_line(&host, "new y oak");
    session.handle_line(&host, "focus oak");
    session.handle_line(&host, "finish");
    assert!(host.table("oak").is_none());
    alice.drain();

    session.handle_line(&host, "games");
    let lines = alice.drain();
    assert!(lines.iter().any(|l| l == "Table oak is defunct; unfocusing."));
    assert!(lines.iter().any(|l| l.contains("Games available:")));
    assert_eq!(session.focus(), None);
}

#[test]
fn test_session_misc_commands() {
    let host = host(8);
    let mut alice = login(&host, "alice");
    let mut session = Session::new(alice.id.clone());

    session.handle_line(&host, "   ");
    assert!(alice.drain().is_empty());

    session.handle_line(&host, "tables");
    assert!(alice.saw("None found!  You should start a game."));

    session.handle_line(&host, "new y");
    assert!(alice.saw("Invalid game command."));

    session.handle_line(&host, "dance");
    assert!(alice.saw("Unknown command."));

    session.handle_line(&host, "help");
    assert!(alice.saw("SERVER COMMANDS:"));

    assert_eq!(session.handle_line(&host, "quit"), Flow::Quit);
}

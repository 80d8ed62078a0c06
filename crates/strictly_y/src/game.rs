//! The Y table: seating, phases, turns and the command surface.

use crate::board::{Board, Coord, MAX_SIZE, MIN_SIZE, Stone};
use crate::codec::parse_moves;
use crate::phase::Phase;
use crate::record::MoveRecord;
use crate::render::render_board;
use crate::win::check_winner;
use std::sync::Arc;
use strictly_table::{
    Channel, Command, CommandError, PlayerId, Roster, Seat, Seating, TableContext, TableGame,
    booleanize,
};
use tracing::{debug, info, instrument, warn};

/// Prefix on every message the table sends.
pub const PREFIX: &str = "(^RY^~): ";

/// Seat data for Y: the seat's stone and its markup color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatColor {
    /// Stone placed by whoever sits here.
    pub stone: Stone,
    /// Markup code used for this seat's name.
    pub code: &'static str,
}

/// A Y game hosted at one table.
#[derive(Debug)]
pub struct YGame {
    context: TableContext,
    seating: Seating<SeatColor>,
    phase: Phase,
    board: Board,
    master: bool,
    turn: Option<Stone>,
    turn_number: u32,
    moves: Vec<MoveRecord>,
    last_moves: Vec<Coord>,
    resigner: Option<Stone>,
}

impl YGame {
    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Color on turn; `None` unless playing.
    pub fn turn(&self) -> Option<Stone> {
        self.turn
    }

    /// Turn counter, 1 for the opening move once play starts.
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    /// Move history.
    pub fn moves(&self) -> &[MoveRecord] {
        &self.moves
    }

    /// Whether Master Y (two stones per turn) is on.
    pub fn is_master(&self) -> bool {
        self.master
    }

    /// Color that resigned, if any.
    pub fn resigner(&self) -> Option<Stone> {
        self.resigner
    }

    /// The seats.
    pub fn seating(&self) -> &Seating<SeatColor> {
        &self.seating
    }

    /// Winning color: the resigner's opponent, otherwise whoever connected
    /// all three sides.
    pub fn winner(&self) -> Option<Stone> {
        match self.resigner {
            Some(resigner) => Some(resigner.opponent()),
            None => check_winner(&self.board),
        }
    }

    fn channel(&self) -> &Arc<dyn Channel> {
        self.context.channel()
    }

    fn broadcast(&self, message: &str) {
        self.channel().broadcast(&format!("{}{}", PREFIX, message));
    }

    fn tell(&self, player: &PlayerId, message: &str) {
        self.channel().tell(player, &format!("{}{}", PREFIX, message));
    }

    fn seat_for(&self, stone: Stone) -> Option<&Seat<SeatColor>> {
        self.seating.seats().iter().find(|s| s.data().stone == stone)
    }

    fn seat_label(&self, stone: Stone) -> &str {
        self.seat_for(stone).map_or("", Seat::player_name)
    }

    fn board_lines(&self) -> Vec<String> {
        render_board(&self.board, &self.last_moves)
    }

    fn send_board(&self) {
        for line in self.board_lines() {
            self.channel().broadcast(&line);
        }
    }

    fn turn_line(&self) -> String {
        match (self.phase, self.turn) {
            (Phase::Playing, Some(Stone::White)) => format!(
                "It is ^R{}^~'s turn (^WWhite^~).",
                self.seat_label(Stone::White)
            ),
            (Phase::Playing, Some(Stone::Black)) => format!(
                "It is ^Y{}^~'s turn (^KBlack^~).",
                self.seat_label(Stone::Black)
            ),
            _ => "The game is not currently active.".to_string(),
        }
    }

    // ─────────────────────────────────────────────────────────────
    //  Seated commands
    // ─────────────────────────────────────────────────────────────

    fn handle_seated(
        &mut self,
        player: &PlayerId,
        cmd: &Command,
    ) -> Option<Result<(), CommandError>> {
        if cmd.is(&["join", "add", "sit", "j"]) {
            Some(self.join(player, &cmd.args))
        } else if cmd.is(&["replace", "switch"]) {
            Some(match cmd.args.as_slice() {
                [seat, other] => self.replace(player, seat, other),
                _ => Err(CommandError::malformed("Invalid replacement.")),
            })
        } else if cmd.is(&["leave", "stand"]) {
            Some(self.leave(player))
        } else if cmd.is(&["list", "who", "w"]) {
            self.list_players(player);
            Some(Ok(()))
        } else {
            None
        }
    }

    fn join(&mut self, player: &PlayerId, args: &[String]) -> Result<(), CommandError> {
        if args.len() > 1 {
            return Err(CommandError::malformed("Invalid add."));
        }
        // A seat vacated mid-game may be refilled so play can continue.
        let open = self.phase == Phase::NeedPlayers
            || (self.phase == Phase::Playing && !self.seating.all_occupied());
        if !open {
            return Err(CommandError::illegal("Not looking for players."));
        }

        let index = self
            .seating
            .add_player(player, args.first().map(String::as_str))?;
        let seat = self.seating.seats()[index].name().to_string();
        if !self.channel().is_connected(player) {
            self.channel().connect(player);
        }
        self.tell(player, &format!("You are now sitting in seat {}.", seat));
        self.broadcast(&format!(
            "^Y{}^~ is now playing in seat ^C{}^~.",
            player, seat
        ));
        Ok(())
    }

    #[instrument(skip(self), fields(table = %self.context.table_name()))]
    fn replace(
        &mut self,
        player: &PlayerId,
        seat_name: &str,
        other_name: &str,
    ) -> Result<(), CommandError> {
        let other = self.context.roster().find_player(other_name).ok_or_else(|| {
            CommandError::illegal(format!("Player ^Y{}^~ does not exist.", other_name))
        })?;
        let (index, previous) = self.seating.replace(seat_name, &other)?;
        let seat = self.seating.seats()[index].name().to_string();

        if !self.channel().is_connected(&other) {
            self.channel().connect(&other);
        }
        match previous {
            Some(previous) => {
                self.broadcast(&format!("^R{}^~ has left the table.", previous));
                self.tell(
                    player,
                    &format!(
                        "You replaced ^R{}^~ with ^Y{}^~ in seat ^G{}^~.",
                        previous, other, seat
                    ),
                );
                self.broadcast(&format!(
                    "^C{}^~ replaced ^R{}^~ with ^Y{}^~ in seat ^G{}^~.",
                    player, previous, other, seat
                ));
            }
            None => {
                self.tell(
                    player,
                    &format!("You placed ^R{}^~ in seat ^G{}^~.", other, seat),
                );
                self.broadcast(&format!(
                    "^C{}^~ placed ^R{}^~ in seat ^G{}^~.",
                    player, other, seat
                ));
            }
        }
        Ok(())
    }

    fn leave(&mut self, player: &PlayerId) -> Result<(), CommandError> {
        self.seating
            .remove_player(player)
            .ok_or_else(|| CommandError::illegal("Can't leave a table you're not at."))?;
        self.broadcast(&format!("^R{}^~ has left the table.", player));
        Ok(())
    }

    fn list_players(&self, player: &PlayerId) {
        let channel = self.channel();
        channel.tell(
            player,
            &format!(
                "Players at table ^R{}^~ of ^G{}^~:",
                self.context.table_name(),
                self.display_name()
            ),
        );
        channel.tell(player, &self.seating.listing());
        channel.tell(player, "Kibitzers:");

        let kibitzers: Vec<String> = channel
            .listeners()
            .into_iter()
            .filter(|l| self.seating.index_of(l).is_none())
            .enumerate()
            .map(|(i, l)| {
                if i % 2 == 0 {
                    format!("^!{}^.", l)
                } else {
                    l.to_string()
                }
            })
            .collect();
        if kibitzers.is_empty() {
            channel.tell(player, "   ^!None yet!^.");
        } else {
            channel.tell(player, &format!("   {}", kibitzers.join(" ")));
        }
    }

    // ─────────────────────────────────────────────────────────────
    //  Config phase
    // ─────────────────────────────────────────────────────────────

    fn handle_config(&mut self, player: &PlayerId, cmd: &Command) -> Result<(), CommandError> {
        if cmd.is(&["size", "sz"]) {
            match cmd.args.as_slice() {
                [size] => self.set_size(player, size),
                _ => Err(CommandError::malformed("Invalid size command.")),
            }
        } else if cmd.is(&["master", "m"]) {
            match cmd.args.as_slice() {
                [value] => self.set_master(player, value),
                _ => Err(CommandError::malformed("Invalid master command.")),
            }
        } else if cmd.is(&["done", "ready", "d", "r"]) {
            self.phase
                .advance(Phase::NeedPlayers)
                .map_err(|e| CommandError::illegal(e.to_string()))?;
            info!(table = %self.context.table_name(), "Looking for players");
            self.broadcast("The game is now looking for players.");
            Ok(())
        } else {
            Err(CommandError::InvalidCommand)
        }
    }

    #[instrument(skip(self), fields(table = %self.context.table_name()))]
    fn set_size(&mut self, player: &PlayerId, size: &str) -> Result<(), CommandError> {
        if size.is_empty() || !size.chars().all(|c| c.is_ascii_digit()) {
            return Err(CommandError::malformed("You didn't even send a number!"));
        }
        let out_of_range = || {
            CommandError::configuration(format!(
                "Too small or large.  Must be {} to {} inclusive.",
                MIN_SIZE, MAX_SIZE
            ))
        };
        let size: usize = size.parse().map_err(|_| out_of_range())?;
        let board = Board::new(size).map_err(|e| {
            warn!(error = %e, "Rejected board size");
            out_of_range()
        })?;

        self.board = board;
        self.last_moves.clear();
        info!(size, "Board resized");
        self.broadcast(&format!(
            "^M{}^~ has changed the size of the board to ^C{}^~.",
            player, size
        ));
        Ok(())
    }

    fn set_master(&mut self, player: &PlayerId, value: &str) -> Result<(), CommandError> {
        let master = booleanize(value).ok_or_else(|| CommandError::malformed("Not a valid boolean!"))?;
        self.master = master;
        let shown = if master { "^Con^~" } else { "^coff^~" };
        self.broadcast(&format!(
            "^R{}^~ has turned ^GMaster Y^~ mode {}.",
            player, shown
        ));
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────
    //  Playing phase
    // ─────────────────────────────────────────────────────────────

    fn handle_playing(&mut self, player: &PlayerId, cmd: &Command) -> Result<(), CommandError> {
        if !cmd.is(&["move", "mv", "play", "pl", "swap", "resign"]) {
            return Err(CommandError::InvalidCommand);
        }

        let seat = self
            .seating
            .seat_of(player)
            .map(|s| *s.data())
            .ok_or_else(|| CommandError::illegal("You can't move; you're not playing!"))?;
        if Some(seat.stone) != self.turn {
            return Err(CommandError::illegal("You must wait for your turn to move."));
        }

        let record = if cmd.is(&["swap"]) {
            self.swap(player, seat)?
        } else if cmd.is(&["resign"]) {
            self.resign(player, seat)
        } else {
            self.place(player, seat, &cmd.args)?
        };

        self.finish_turn(record);
        Ok(())
    }

    #[instrument(skip(self, seat), fields(table = %self.context.table_name()))]
    fn place(
        &mut self,
        player: &PlayerId,
        seat: SeatColor,
        args: &[String],
    ) -> Result<MoveRecord, CommandError> {
        let coords = parse_moves(args, self.board.size()).map_err(|e| {
            debug!(error = %e, "Unparseable move");
            CommandError::malformed(format!("{}.  Unsuccessful move.", e))
        })?;

        let count = coords.len();
        if !self.master && count != 1 {
            return Err(CommandError::illegal("You can only make one move per turn."));
        }
        if self.master && self.turn_number == 1 && count != 1 {
            return Err(CommandError::illegal(
                "You can only make one move on the first turn.",
            ));
        }
        if self.master
            && self.turn_number > 1
            && count != 2
            && !(self.board.empty_count() == 1 && count == 1)
        {
            return Err(CommandError::illegal("You must make two moves per turn."));
        }

        for (i, coord) in coords.iter().enumerate() {
            if !self.board.is_empty(*coord) {
                return Err(CommandError::illegal(format!(
                    "^R{}^~ is already occupied.",
                    coord
                )));
            }
            if coords[..i].contains(coord) {
                return Err(CommandError::illegal(
                    "You can't move to the same place twice!",
                ));
            }
        }

        for coord in &coords {
            self.board
                .set(*coord, seat.stone)
                .map_err(|e| CommandError::illegal(e.to_string()))?;
        }
        self.last_moves = coords.clone();

        let record = MoveRecord::Place(coords);
        info!(stone = %seat.stone, mv = %record, "Stones placed");
        self.broadcast(&format!(
            "{}{}^~ has moved to ^C{}^~.",
            seat.code, player, record
        ));
        Ok(record)
    }

    fn swap(&mut self, player: &PlayerId, seat: SeatColor) -> Result<MoveRecord, CommandError> {
        if self.turn_number != 2 {
            return Err(CommandError::illegal(
                "Unsuccessful swap.  You can only swap on the second turn.",
            ));
        }
        if seat.stone == Stone::White {
            return Err(CommandError::illegal(
                "Unsuccessful swap.  Only Black may swap the opening move.",
            ));
        }
        let cell = self
            .moves
            .first()
            .and_then(MoveRecord::opening_cell)
            .ok_or_else(|| CommandError::illegal("Unsuccessful swap.  There is nothing to swap."))?;

        self.board
            .recolor(cell)
            .map_err(|e| CommandError::illegal(e.to_string()))?;
        self.last_moves = vec![cell];
        info!(%cell, "Opening move swapped");
        self.broadcast(&format!(
            "^Y{}^~ has swapped ^WWhite^~'s first move.",
            player
        ));
        Ok(MoveRecord::Swap)
    }

    fn resign(&mut self, player: &PlayerId, seat: SeatColor) -> MoveRecord {
        info!(%player, stone = %seat.stone, "Player resigned");
        self.broadcast(&format!("^R{}^~ is resigning from the game.", player));
        self.resigner = Some(seat.stone);
        MoveRecord::Resign
    }

    fn finish_turn(&mut self, record: MoveRecord) {
        self.send_board();
        self.moves.push(record);
        self.turn_number += 1;

        match self.winner() {
            Some(stone) => {
                self.resolve(stone);
                self.finish();
            }
            None => {
                self.turn = self.turn.map(Stone::opponent);
                self.broadcast(&self.turn_line());
            }
        }
    }

    fn resolve(&self, stone: Stone) {
        let name = match self.seat_for(stone).and_then(Seat::player) {
            Some(player) => player.to_string(),
            None => {
                warn!(%stone, "Winning seat is empty; announcing the seat instead");
                self.seat_label(stone).to_string()
            }
        };
        info!(table = %self.context.table_name(), winner = %name, %stone, "Game won");
        self.broadcast(&format!("^C{}^~ wins!", name));
    }

    fn finish(&mut self) {
        match self.phase.advance(Phase::Finished) {
            Ok(()) => info!(table = %self.context.table_name(), "Game finished"),
            Err(e) => debug!(error = %e, "Finish requested twice"),
        }
        self.turn = None;
    }

    fn start(&mut self) {
        if let Err(e) = self.phase.advance(Phase::Playing) {
            warn!(error = %e, "Could not start game");
            return;
        }
        self.turn = Some(Stone::White);
        self.turn_number = 1;
        info!(
            table = %self.context.table_name(),
            white = %self.seat_label(Stone::White),
            black = %self.seat_label(Stone::Black),
            size = self.board.size(),
            "Game started"
        );
        self.broadcast(&format!(
            "^WWhite^~: ^R{}^~; ^KBlack^~: ^Y{}^~",
            self.seat_label(Stone::White),
            self.seat_label(Stone::Black)
        ));
        self.send_board();
        self.broadcast(&self.turn_line());
    }
}

impl TableGame for YGame {
    #[instrument(skip(context), fields(table = %context.table_name()))]
    fn new(context: TableContext) -> Self {
        let mut seating = Seating::new(
            vec![
                Seat::new(
                    "White",
                    SeatColor {
                        stone: Stone::White,
                        code: "^W",
                    },
                ),
                Seat::new(
                    "Black",
                    SeatColor {
                        stone: Stone::Black,
                        code: "^K",
                    },
                ),
            ],
            2,
            2,
        );
        // Y needs both seats filled to play.
        for index in 0..2 {
            if let Some(seat) = seating.seat_mut(index) {
                seat.set_active(true);
            }
        }

        Self {
            context,
            seating,
            phase: Phase::default(),
            board: Board::default(),
            master: false,
            turn: None,
            turn_number: 0,
            moves: Vec::new(),
            last_moves: Vec::new(),
            resigner: None,
        }
    }

    fn game_name(&self) -> &'static str {
        "y"
    }

    fn display_name(&self) -> &'static str {
        "Y"
    }

    #[instrument(skip(self), fields(table = %self.context.table_name(), phase = %self.phase))]
    fn handle(&mut self, player: &PlayerId, command: &str) -> Result<(), CommandError> {
        let cmd = Command::parse(command).ok_or(CommandError::InvalidCommand)?;

        if self.phase == Phase::Finished {
            return Err(CommandError::illegal("Game already finished."));
        }
        if let Some(result) = self.handle_seated(player, &cmd) {
            return result;
        }

        match self.phase {
            Phase::Config => self.handle_config(player, &cmd),
            Phase::Playing => self.handle_playing(player, &cmd),
            Phase::NeedPlayers | Phase::Finished => Err(CommandError::InvalidCommand),
        }
    }

    fn show(&self, player: &PlayerId) {
        for line in self.board_lines() {
            self.channel().tell(player, &line);
        }
        self.channel().tell(player, &self.turn_line());
    }

    fn show_help(&self, player: &PlayerId) {
        const HELP: &[&str] = &[
            "",
            "Y SETUP PHASE:",
            "",
            "              ^!size^. <size>, ^!sz^.     Set board to size <size>.",
            "             ^!master^. on|off, ^!m^.     Enable/disable Master Y mode.",
            "            ^!ready^., ^!done^., ^!r^., ^!d^.     End setup phase.",
            "",
            "Y PLAY:",
            "",
            "      ^!move^. <ln>, ^!play^., ^!mv^., ^!pl^.     Make move <ln> (letter number).",
            "                         ^!swap^.     Swap the first move (only Black, only their first).",
            "                       ^!resign^.     Resign.",
        ];
        for line in HELP {
            self.channel().tell(player, line);
        }
    }

    fn show_config(&self, player: &PlayerId) {
        let channel = self.channel();
        channel.tell(player, &format!("^GBoard size^~: ^Y{}^~", self.board.size()));
        channel.tell(
            player,
            &format!(
                "^GMaster Y^~: ^Y{}^~",
                if self.master { "on" } else { "off" }
            ),
        );
        channel.tell(player, &format!("^GPhase^~: ^Y{}^~", self.phase));
    }

    fn tick(&mut self) {
        if self.phase == Phase::NeedPlayers && self.seating.has_quorum() {
            self.start();
        }
    }

    fn remove_player(&mut self, player: &PlayerId) {
        if self.seating.remove_player(player).is_some() {
            self.broadcast(&format!("^R{}^~ has left the table.", player));
        }
    }

    fn terminate(&mut self, player: &PlayerId) {
        info!(table = %self.context.table_name(), %player, "Game terminated");
        self.broadcast(&format!("^Y{}^~ has terminated the game.", player));
        self.finish();
    }

    fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }
}

//! Turn lifecycle: selection clicks, move application, turn finalization, end-of-game
//! detection and the delayed built-in opponent.

use crate::board::{Board, ByColor, Color, Square};
use crate::error::ChimeraError;
use crate::frontend::{EndModal, Frontend, RenderView};
use crate::morale;
use crate::rules::attacks::in_check;
use crate::rules::mechanics::{apply_move, refresh_rook_rights, resolve_diplomacy, resurrect, Resurrection};
use crate::rules::movegen::{has_saving_move, moves_from, Move, Special};
use crate::rules::state::LOYALTY_PERIOD;
use crate::rules::{ChimeraTracker, GameState};
use crate::search::eval::material_loss;
use crate::search::{select_move, SelectorParams};
use crate::wire::{GameStart, MovePayload, MoveRecord};
use log::{debug, info, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    pub ai_enabled: bool,
    pub ai_color: Color,
    /// Pause before the built-in opponent moves.
    pub ai_delay: Duration,
    /// Seed for morale and AI noise; `None` draws from entropy.
    pub seed: Option<u64>,
    pub selector: SelectorParams,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ai_enabled: false,
            ai_color: Color::Black,
            ai_delay: Duration::from_millis(150),
            seed: None,
            selector: SelectorParams::default(),
        }
    }
}

/// An outstanding diplomacy offer. While it exists no move may be applied by either side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingProposal {
    pub from: Square,
    pub to: Square,
    pub proposer: Color,
    /// Online proposer side: the answer comes back as a full snapshot.
    pub awaiting_remote: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Checkmate { loser: Color, resurrection_allowed: bool },
    Stalemate,
}

impl Outcome {
    pub fn winner(&self) -> Option<Color> {
        match self {
            Outcome::Checkmate { loser, .. } => Some(loser.flip()),
            Outcome::Stalemate => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    AwaitingSelection,
    AwaitingDestination { from: Square, moves: Vec<Move> },
    PendingProposal(PendingProposal),
    GameOver(Outcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Ignored,
    Selected(Square),
    Cleared,
    Applied(Move),
    Proposed(PendingProposal),
}

#[derive(Debug, Clone, Copy)]
struct AiTicket {
    due: Instant,
    last_move: Option<MoveRecord>,
}

/// One game. Owns the live position; everything speculative runs on board copies.
pub struct GameSession<F: Frontend> {
    board: Board,
    state: GameState,
    tracker: ChimeraTracker,
    phase: Phase,
    last_move: Option<MoveRecord>,
    material_loss: ByColor<i32>,
    config: SessionConfig,
    rng: SmallRng,
    ai_ticket: Option<AiTicket>,
    frontend: F,
}

impl<F: Frontend> GameSession<F> {
    pub fn new(frontend: F, config: SessionConfig) -> Self {
        Self::from_position(frontend, config, Board::startpos(), GameState::new())
    }

    /// Starts from an arbitrary position. The end-of-game test is not run until a move is made
    /// or [`check_game_state`](Self::check_game_state) is called.
    pub fn from_position(frontend: F, config: SessionConfig, board: Board, state: GameState) -> Self {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let mut s = Self {
            material_loss: material_loss(&board),
            board,
            state,
            tracker: ChimeraTracker::new(),
            phase: Phase::AwaitingSelection,
            last_move: None,
            config,
            rng,
            ai_ticket: None,
            frontend,
        };
        s.render();
        s.schedule_ai_if_due(Instant::now());
        s
    }

    pub fn reset(&mut self) {
        self.board = Board::startpos();
        self.state = GameState::new();
        self.tracker.reset();
        self.phase = Phase::AwaitingSelection;
        self.last_move = None;
        self.ai_ticket = None;
        self.material_loss = material_loss(&self.board);
        self.frontend.hide_end_modal();
        self.frontend.hide_diplomacy_modal();
        info!("new game");
        self.render();
        self.schedule_ai_if_due(Instant::now());
    }

    pub fn board(&self) -> &Board { &self.board }
    pub fn state(&self) -> &GameState { &self.state }
    pub fn tracker(&self) -> &ChimeraTracker { &self.tracker }
    pub fn phase(&self) -> &Phase { &self.phase }
    pub fn last_move(&self) -> Option<MoveRecord> { self.last_move }
    pub fn material_loss(&self) -> ByColor<i32> { self.material_loss }
    pub fn config(&self) -> &SessionConfig { &self.config }
    pub fn frontend(&self) -> &F { &self.frontend }
    pub fn frontend_mut(&mut self) -> &mut F { &mut self.frontend }

    /// Current morale; derived from the board each time.
    pub fn morale(&self) -> ByColor<f32> { morale::morale(&self.board) }

    pub fn selected(&self) -> Option<Square> {
        match &self.phase {
            Phase::AwaitingDestination { from, .. } => Some(*from),
            _ => None,
        }
    }

    pub fn pending_proposal(&self) -> Option<PendingProposal> {
        match self.phase {
            Phase::PendingProposal(p) => Some(p),
            _ => None,
        }
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            Phase::GameOver(o) => Some(o),
            _ => None,
        }
    }

    pub fn ai_pending(&self) -> bool { self.ai_ticket.is_some() }

    /// Entry point for board clicks.
    pub fn click(&mut self, sq: Square) -> ClickOutcome {
        if matches!(self.phase, Phase::PendingProposal(_) | Phase::GameOver(_)) {
            return ClickOutcome::Ignored;
        }
        if matches!(self.seat(), Some(mine) if mine != self.state.turn) {
            return ClickOutcome::Ignored;
        }
        if self.ai_ticket.is_some() {
            return ClickOutcome::Ignored;
        }
        if let Phase::AwaitingDestination { moves, .. } = &self.phase {
            if let Some(mv) = moves.iter().find(|m| m.to == sq).copied() {
                return self.play(mv);
            }
        }
        self.select(sq)
    }

    /// Our online seat, once one is assigned. Seat checks are skipped without it.
    fn seat(&self) -> Option<Color> {
        if self.frontend.is_online_active() { self.frontend.my_color() } else { None }
    }

    /// Drops a half-made selection. Returns false when nothing was selected.
    pub fn clear_selection(&mut self) -> bool {
        if !matches!(self.phase, Phase::AwaitingDestination { .. }) {
            return false;
        }
        self.phase = Phase::AwaitingSelection;
        self.render();
        true
    }

    fn select(&mut self, sq: Square) -> ClickOutcome {
        match self.board.get(sq) {
            Some(p) if p.color == self.state.turn => {
                let moves = moves_from(&self.board, &self.state, sq, true);
                self.phase = Phase::AwaitingDestination { from: sq, moves };
                self.render();
                ClickOutcome::Selected(sq)
            }
            _ => {
                self.phase = Phase::AwaitingSelection;
                self.render();
                ClickOutcome::Cleared
            }
        }
    }

    fn play(&mut self, mv: Move) -> ClickOutcome {
        if mv.special == Special::Diplomacy {
            return ClickOutcome::Proposed(self.propose(mv));
        }
        apply_move(&mut self.board, &mut self.state, &mut self.tracker, &mv);
        self.last_move = Some(MoveRecord::played(&mv));
        self.finalize_turn();
        ClickOutcome::Applied(mv)
    }

    fn propose(&mut self, mv: Move) -> PendingProposal {
        let online = self.frontend.is_online_active();
        let p = PendingProposal { from: mv.from, to: mv.to, proposer: self.state.turn, awaiting_remote: online };
        self.phase = Phase::PendingProposal(p);
        self.last_move = Some(MoveRecord::proposal(mv.from, mv.to));
        if online {
            let payload = self.payload();
            self.frontend.send_move(&payload);
            info!("alliance proposed from {} to {}; waiting for the opponent", mv.from, mv.to);
        } else {
            self.frontend.show_diplomacy_modal(&p);
            info!("alliance proposed from {} to {}", mv.from, mv.to);
        }
        self.render();
        p
    }

    pub fn accept_proposal(&mut self) -> Result<(), ChimeraError> {
        self.resolve_proposal(true)
    }

    pub fn decline_proposal(&mut self) -> Result<(), ChimeraError> {
        self.resolve_proposal(false)
    }

    fn resolve_proposal(&mut self, accept: bool) -> Result<(), ChimeraError> {
        let Phase::PendingProposal(p) = self.phase else { return Err(ChimeraError::NoPendingProposal) };
        if p.awaiting_remote {
            return Err(ChimeraError::AwaitingRemoteDecision);
        }
        self.frontend.hide_diplomacy_modal();
        resolve_diplomacy(&mut self.board, &mut self.state, &mut self.tracker, p.from, p.to, p.proposer, accept);
        self.last_move = Some(MoveRecord { from: p.from, to: p.to, is_proposal: false });
        self.finalize_turn();
        Ok(())
    }

    /// Closes the turn of the side to move: counters, loyalty sweep, morale, turn switch,
    /// notifications, then either the opponent's AI ticket or the end-of-game test.
    fn finalize_turn(&mut self) {
        let finished = self.state.turn;
        self.state.move_count += 1;
        self.tracker.end_of_turn(&mut self.board, finished);
        refresh_rook_rights(&self.board, &mut self.state);

        self.state.loyalty_countdown = self.state.loyalty_countdown.saturating_sub(1);
        if self.state.loyalty_countdown == 0 {
            let (m, defected) = morale::consult(&mut self.board, &mut self.rng);
            debug!("morale white {:.1} black {:.1}, {} defections", m.white, m.black, defected.len());
            self.state.loyalty_countdown = LOYALTY_PERIOD;
        }

        self.state.turn = finished.flip();
        self.phase = Phase::AwaitingSelection;
        self.material_loss = material_loss(&self.board);

        if self.frontend.is_online_active() {
            let payload = self.payload();
            self.frontend.send_move(&payload);
        }
        self.render();

        if !self.schedule_ai_if_due(Instant::now()) {
            self.check_game_state();
        }
    }

    /// Ends the game when the side to move has no saving move. Returns the outcome if it did.
    pub fn check_game_state(&mut self) -> Option<Outcome> {
        let color = self.state.turn;
        if has_saving_move(&self.board, &self.state, color) {
            return None;
        }
        let outcome = if in_check(&self.board, color, self.state.leader_kind(color)) {
            Outcome::Checkmate { loser: color, resurrection_allowed: self.state.resurrection_allowed(color) }
        } else {
            Outcome::Stalemate
        };
        self.phase = Phase::GameOver(outcome);
        self.ai_ticket = None;

        let modal = match outcome {
            Outcome::Checkmate { loser, resurrection_allowed } => {
                info!("checkmate, {} wins", loser.flip());
                let block = self.frontend.is_online_active()
                    && matches!(self.frontend.my_color(), Some(mine) if mine != loser);
                EndModal {
                    is_checkmate: true,
                    winner: Some(loser.flip()),
                    resurrection_allowed,
                    hide_buttons: block,
                    show_waiting: block,
                }
            }
            Outcome::Stalemate => {
                info!("stalemate");
                EndModal { is_checkmate: false, winner: None, resurrection_allowed: false, hide_buttons: false, show_waiting: false }
            }
        };
        self.frontend.show_end_modal(modal);
        self.render();
        Some(outcome)
    }

    /// Revives the checkmated side's army under a Z-leader.
    pub fn activate_last_stand(&mut self) -> Result<Resurrection, ChimeraError> {
        let Phase::GameOver(Outcome::Checkmate { loser, resurrection_allowed: true }) = self.phase else {
            return Err(ChimeraError::ResurrectionUnavailable);
        };
        if !self.state.resurrection_allowed(loser) {
            return Err(ChimeraError::ResurrectionUnavailable);
        }
        if matches!(self.seat(), Some(mine) if mine != loser) {
            return Err(ChimeraError::NotYourSeat(loser));
        }
        let revived = resurrect(&mut self.board, &mut self.state, &mut self.tracker, loser);
        self.frontend.hide_end_modal();
        self.phase = Phase::AwaitingSelection;
        self.material_loss = material_loss(&self.board);
        if self.frontend.is_online_active() {
            let payload = self.payload();
            self.frontend.send_move(&payload);
        }
        self.render();
        if !self.schedule_ai_if_due(Instant::now()) {
            self.check_game_state();
        }
        Ok(revived)
    }

    /// Replaces local state with a relayed snapshot, or opens the diplomacy choice when the
    /// snapshot carries a proposal addressed to us.
    pub fn apply_remote_move(&mut self, payload: &MovePayload) {
        if matches!(payload.last_move, Some(m) if m.is_proposal) {
            if self.frontend.my_color() == Some(payload.turn) {
                debug!("own proposal echoed back; still waiting");
                return;
            }
            let Some(rec) = payload.last_move else { return };
            self.board = payload.board;
            payload.restore_state(&mut self.state);
            self.tracker = payload.chimera_tracker.clone();
            let p = PendingProposal { from: rec.from, to: rec.to, proposer: payload.turn, awaiting_remote: false };
            self.phase = Phase::PendingProposal(p);
            self.last_move = Some(rec);
            self.ai_ticket = None;
            info!("alliance offered by {}", payload.turn);
            self.frontend.show_diplomacy_modal(&p);
            self.render();
            return;
        }

        self.frontend.hide_diplomacy_modal();
        self.board = payload.board;
        payload.restore_state(&mut self.state);
        self.tracker = payload.chimera_tracker.clone();
        self.last_move = payload.last_move;
        self.phase = Phase::AwaitingSelection;
        self.ai_ticket = None;
        self.material_loss = material_loss(&self.board);
        self.render();
        self.check_game_state();
    }

    /// Parses and applies a relayed JSON message. Malformed payloads are logged and rejected.
    pub fn apply_remote_json(&mut self, json: &str) -> Result<(), ChimeraError> {
        match MovePayload::from_json(json) {
            Ok(payload) => {
                self.apply_remote_move(&payload);
                Ok(())
            }
            Err(e) => {
                warn!("rejected remote payload: {e}");
                Err(e)
            }
        }
    }

    pub fn on_game_start(&mut self, start: &GameStart) {
        info!("online game started, playing {}", start.color);
        self.board = start.board;
        self.state = GameState::new();
        self.state.turn = start.turn;
        self.state.castling = start.castling;
        self.tracker.reset();
        self.phase = Phase::AwaitingSelection;
        self.last_move = None;
        self.ai_ticket = None;
        self.material_loss = material_loss(&self.board);
        self.frontend.hide_end_modal();
        self.frontend.hide_diplomacy_modal();
        self.render();
    }

    /// Switches the built-in opponent on or off and returns the new setting.
    pub fn toggle_ai(&mut self) -> bool {
        self.config.ai_enabled = !self.config.ai_enabled;
        if self.config.ai_enabled {
            self.schedule_ai_if_due(Instant::now());
        } else {
            self.ai_ticket = None;
        }
        info!("AI {}", if self.config.ai_enabled { "enabled" } else { "disabled" });
        self.config.ai_enabled
    }

    fn ai_should_move(&self) -> bool {
        self.config.ai_enabled
            && self.state.turn == self.config.ai_color
            && !self.frontend.is_online_active()
            && !matches!(self.phase, Phase::GameOver(_))
    }

    fn schedule_ai_if_due(&mut self, now: Instant) -> bool {
        if !self.ai_should_move() {
            return false;
        }
        self.ai_ticket = Some(AiTicket { due: now + self.config.ai_delay, last_move: self.last_move });
        true
    }

    /// Runs the AI turn if its ticket has come due. Returns true when the ticket fired.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.ai_ticket {
            Some(t) if t.due <= now => {
                self.ai_ticket = None;
                self.run_scheduled_ai(t.last_move);
                true
            }
            _ => false,
        }
    }

    fn run_scheduled_ai(&mut self, before: Option<MoveRecord>) {
        if !self.ai_should_move() {
            return;
        }
        self.play_ai_move();
        // Nothing was played: the AI is mated or stalemated.
        if self.last_move == before && !matches!(self.phase, Phase::GameOver(_)) {
            self.check_game_state();
        }
    }

    /// Lets the selector play for the side to move. A pending local proposal is declined
    /// instead. Returns the move that was applied.
    pub fn play_ai_move(&mut self) -> Option<Move> {
        if matches!(self.phase, Phase::GameOver(_)) {
            return None;
        }
        if let Some(p) = self.pending_proposal() {
            if p.awaiting_remote { return None; }
            self.decline_proposal().ok()?;
            return Some(Move::with_special(p.from, p.to, true, Special::Diplomacy));
        }
        self.ai_ticket = None;
        let color = self.state.turn;
        let best = select_move(&self.board, &self.state, color, &self.config.selector, &mut self.rng)?;
        debug!("{color} AI picked {} (score {:.2})", best.mv, best.score);
        apply_move(&mut self.board, &mut self.state, &mut self.tracker, &best.mv);
        self.last_move = Some(MoveRecord::played(&best.mv));
        self.finalize_turn();
        Some(best.mv)
    }

    fn payload(&self) -> MovePayload {
        MovePayload::snapshot(&self.board, &self.state, &self.tracker, self.last_move)
    }

    fn render(&mut self) {
        let (selected, moves): (Option<Square>, &[Move]) = match &self.phase {
            Phase::AwaitingDestination { from, moves } => (Some(*from), moves.as_slice()),
            _ => (None, &[]),
        };
        let view = RenderView {
            board: &self.board,
            state: &self.state,
            selected,
            moves,
            tracker: &self.tracker,
            last_move: self.last_move,
            material_loss: self.material_loss,
        };
        self.frontend.render(&view);
    }
}

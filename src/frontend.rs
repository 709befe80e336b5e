//! Collaborator contracts: everything the session needs from a user interface and a network
//! relay. The engine never draws, prompts or opens sockets itself.

use crate::board::{Board, ByColor, Color, Square};
use crate::rules::{ChimeraTracker, GameState, Move};
use crate::session::PendingProposal;
use crate::wire::{MovePayload, MoveRecord};

/// Snapshot handed to the renderer after every state change.
#[derive(Debug, Clone, Copy)]
pub struct RenderView<'a> {
    pub board: &'a Board,
    pub state: &'a GameState,
    pub selected: Option<Square>,
    pub moves: &'a [Move],
    pub tracker: &'a ChimeraTracker,
    pub last_move: Option<MoveRecord>,
    pub material_loss: ByColor<i32>,
}

pub trait Renderer {
    fn render(&mut self, view: &RenderView<'_>);
}

/// End-of-game dialog contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndModal {
    pub is_checkmate: bool,
    pub winner: Option<Color>,
    pub resurrection_allowed: bool,
    /// Online: the viewer is not the one deciding, so no buttons.
    pub hide_buttons: bool,
    pub show_waiting: bool,
}

pub trait Modals {
    fn show_end_modal(&mut self, modal: EndModal);
    fn hide_end_modal(&mut self) {}
    fn show_diplomacy_modal(&mut self, proposal: &PendingProposal);
    fn hide_diplomacy_modal(&mut self) {}
}

/// Network relay as seen from the session. The default is an offline relay.
pub trait Relay {
    fn is_online_active(&self) -> bool { false }
    fn my_color(&self) -> Option<Color> { None }
    fn send_move(&mut self, _payload: &MovePayload) {}
}

pub trait Frontend: Renderer + Modals + Relay {}

impl<T: Renderer + Modals + Relay> Frontend for T {}

/// Offline frontend that ignores every notification. Used by self-play and benches.
#[derive(Debug, Clone, Copy, Default)]
pub struct Headless;

impl Renderer for Headless {
    fn render(&mut self, _view: &RenderView<'_>) {}
}

impl Modals for Headless {
    fn show_end_modal(&mut self, _modal: EndModal) {}
    fn show_diplomacy_modal(&mut self, _proposal: &PendingProposal) {}
}

impl Relay for Headless {}

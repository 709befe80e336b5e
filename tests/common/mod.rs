#![allow(dead_code)]

use chimera::frontend::{EndModal, Modals, Relay, RenderView, Renderer};
use chimera::session::{ClickOutcome, GameSession, PendingProposal, SessionConfig};
use chimera::wire::MovePayload;
use chimera::{Color, Square};

/// Frontend that records every call for assertions.
#[derive(Debug, Default)]
pub struct Recorder {
    pub renders: usize,
    pub end_modals: Vec<EndModal>,
    pub end_hidden: usize,
    pub proposals_shown: Vec<PendingProposal>,
    pub proposals_hidden: usize,
    pub sent: Vec<MovePayload>,
    pub online: bool,
    pub seat: Option<Color>,
}

impl Recorder {
    pub fn online(seat: Color) -> Self {
        Self { online: true, seat: Some(seat), ..Default::default() }
    }
}

impl Renderer for Recorder {
    fn render(&mut self, _view: &RenderView<'_>) { self.renders += 1; }
}

impl Modals for Recorder {
    fn show_end_modal(&mut self, modal: EndModal) { self.end_modals.push(modal); }
    fn hide_end_modal(&mut self) { self.end_hidden += 1; }
    fn show_diplomacy_modal(&mut self, proposal: &PendingProposal) { self.proposals_shown.push(*proposal); }
    fn hide_diplomacy_modal(&mut self) { self.proposals_hidden += 1; }
}

impl Relay for Recorder {
    fn is_online_active(&self) -> bool { self.online }
    fn my_color(&self) -> Option<Color> { self.seat }
    fn send_move(&mut self, payload: &MovePayload) { self.sent.push(payload.clone()); }
}

pub fn sq(s: &str) -> Square { Square::from_algebraic(s).unwrap() }

/// Seeded, AI off.
pub fn offline() -> SessionConfig {
    SessionConfig { seed: Some(7), ..Default::default() }
}

/// Two clicks: select `mv[0..2]`, then target `mv[2..4]`.
pub fn play(session: &mut GameSession<Recorder>, mv: &str) -> ClickOutcome {
    assert!(matches!(session.click(sq(&mv[0..2])), ClickOutcome::Selected(_)), "cannot select {}", &mv[0..2]);
    session.click(sq(&mv[2..4]))
}

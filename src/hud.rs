//! HUD projection for the presentation layer

use serde::{Deserialize, Serialize};

use crate::sim::{GamePhase, GameState, PlayerId};

/// Everything the score bar and message box show
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HudSnapshot {
    /// "P1: n"
    pub player_one_score: String,
    /// "P2: n"
    pub player_two_score: String,
    /// "a : b"
    pub round_score: String,
    pub round: u32,
    /// Seconds left in the round
    pub timer: u32,
    /// Banner text, empty when there is none
    pub message: String,
    /// Whether players and projectiles should be drawn
    pub show_field: bool,
}

impl HudSnapshot {
    pub fn from_state(state: &GameState) -> Self {
        let p1 = state.wins(PlayerId::One);
        let p2 = state.wins(PlayerId::Two);
        Self {
            player_one_score: format!("P1: {p1}"),
            player_two_score: format!("P2: {p2}"),
            round_score: format!("{p1} : {p2}"),
            round: state.round,
            timer: state.round_timer,
            message: state.banner.map(|b| b.to_string()).unwrap_or_default(),
            show_field: state.phase == GamePhase::InRound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::{TickInput, tick};

    #[test]
    fn test_title_screen() {
        let state = GameState::new(1, Settings::default());
        let hud = HudSnapshot::from_state(&state);
        assert_eq!(hud.message, "ThrowDodge");
        assert_eq!(hud.player_one_score, "P1: 0");
        assert_eq!(hud.round_score, "0 : 0");
        assert!(!hud.show_field);
    }

    #[test]
    fn test_scores_and_message() {
        let mut state = GameState::new(1, Settings::default());
        state.rounds_won = [1, 0];
        state.round = 2;
        state.banner = Some(crate::sim::Banner::RoundWinner(PlayerId::One));
        let hud = HudSnapshot::from_state(&state);
        assert_eq!(hud.player_one_score, "P1: 1");
        assert_eq!(hud.player_two_score, "P2: 0");
        assert_eq!(hud.round_score, "1 : 0");
        assert_eq!(hud.message, "Player 1 wins the round!");
    }

    #[test]
    fn test_live_round_clears_message() {
        let mut state = GameState::new(1, Settings::default());
        let idle = TickInput::default();
        while state.phase != GamePhase::InRound {
            tick(&mut state, &idle);
        }
        let hud = HudSnapshot::from_state(&state);
        assert!(hud.message.is_empty());
        assert!(hud.show_field);
        assert_eq!(hud.timer, 30);
    }
}

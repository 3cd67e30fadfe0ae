//! Player-death collaborator.

use crate::state::{LevelKind, Player};

/// Decides what happens when the player's hp reaches zero.
///
/// The simulation only detects the death; respawn, penalties or endings are
/// entirely up to the implementation. A handler may restore hp, in which case
/// the turn continues as if the player survived.
pub trait PlayerDeathHandler {
    fn on_player_death(&mut self, player: &mut Player, level: LevelKind);
}

/// Records deaths without altering the player.
#[derive(Clone, Debug, Default)]
pub struct DeathLog {
    pub deaths: Vec<LevelKind>,
}

impl PlayerDeathHandler for DeathLog {
    fn on_player_death(&mut self, _player: &mut Player, level: LevelKind) {
        self.deaths.push(level);
    }
}

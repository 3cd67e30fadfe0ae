//! Item pickups and the player buffs they grant.

use tracing::debug;

use crate::config::SimConfig;
use crate::state::{Item, ItemKind, ModuleKind, Scene, SimEvent};

/// Applies a picked-up item to the player and the level tally.
pub fn apply_pickup(scene: &mut Scene<'_>, item: Item, config: &SimConfig) {
    let player = &mut *scene.player;
    match item.kind {
        ItemKind::Currency { value } => scene.level.tally.currency += value,
        ItemKind::Consumable { heal } => {
            player.heal(heal);
        }
        ItemKind::Module(ModuleKind::Cloak) => player.buffs.cloak_turns += config.cloak_turns,
        ItemKind::Module(ModuleKind::Overclock) => player.buffs.overclock = true,
        ItemKind::Module(ModuleKind::Firewall) => player.buffs.firewall_hp += config.firewall_pool,
        ItemKind::Module(ModuleKind::Plating) => player.def += 1,
        ItemKind::Module(ModuleKind::Emp) => {
            let origin = player.position;
            let mut stunned = 0;
            for enemy in scene.level.enemies_mut() {
                if enemy.position.manhattan(origin) <= config.emp_radius {
                    enemy.stun_turns = enemy.stun_turns.max(config.emp_stun_turns);
                    stunned += 1;
                }
            }
            scene.events.push(SimEvent::EmpPulse { origin, stunned });
        }
    }
    debug!(kind = ?item.kind, position = %item.position, "picked up item");
    scene.events.push(SimEvent::Pickup {
        position: item.position,
        kind: item.kind,
    });
}

use crate::domain::events::TickEvent;
use crate::domain::state::{PlayerEntity, Room};
use crate::domain::tuning::arena::INTERACT_RADIUS;
use tracing::debug;

/// Hands each item to the first living player in reach who can pay for it.
///
/// A player who is close but short of coins is skipped, so a richer teammate
/// standing nearby can still buy the item on the same tick.
pub fn claim_items(room: &mut Room, players: &mut [PlayerEntity]) -> Vec<TickEvent> {
    let mut events = Vec::new();

    let mut i = room.items.len();
    while i > 0 {
        i -= 1;
        let item = &room.items[i];
        let Some(buyer) = players.iter_mut().find(|p| {
            !p.is_dead && p.pos.distance(item.pos) < INTERACT_RADIUS && p.stats.can_afford(item)
        }) else {
            continue;
        };

        let item = room.items.remove(i);
        buyer.stats.coins -= item.price();
        if let Some(modifiers) = &item.modifiers {
            buyer.stats.apply(modifiers);
        }
        debug!(
            player_id = %buyer.id,
            item = %item.name,
            coins = buyer.stats.coins,
            "item claimed"
        );
        events.push(TickEvent::ItemClaimed {
            player_id: buyer.id.clone(),
            item_id: item.id,
            name: item.name,
        });
    }

    events
}

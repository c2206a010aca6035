// Host-authoritative simulation of one floor: the active room plus the party.

use crate::domain::dungeon;
use crate::domain::systems::shooting::{self, ShotCooldowns};
use crate::domain::systems::{doors, enemies, input, movement, pickups, projectiles};
use crate::domain::tuning::arena::CENTER;
use crate::domain::tuning::player::PLAYER_COLORS;
use crate::domain::{
    Floor, GameRng, KeySet, PlayerEntity, PlayerId, PlayerStats, Room, TickEvent, Tuning, Vector2,
};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info};

use super::types::WorldUpdate;

/// Color given to players who join by sending their first input.
const JOIN_COLOR: &str = PLAYER_COLORS[1];

pub struct Simulation {
    floor: Floor,
    room_index: usize,
    // Insertion order decides who acts first when several players qualify.
    players: Vec<PlayerEntity>,
    inputs: HashMap<PlayerId, KeySet>,
    cooldowns: ShotCooldowns,
    rng: GameRng,
    tuning: Tuning,
}

impl Simulation {
    /// Generates `floor_number` from `rng` and parks the party in its start room.
    pub fn new(floor_number: u32, mut rng: GameRng, tuning: Tuning) -> Self {
        let floor = dungeon::generate(floor_number, &mut rng);
        Self {
            floor,
            room_index: 0,
            players: Vec::new(),
            inputs: HashMap::new(),
            cooldowns: ShotCooldowns::new(),
            rng,
            tuning,
        }
    }

    pub fn floor(&self) -> &Floor {
        &self.floor
    }

    pub fn floor_number(&self) -> u32 {
        self.floor.number
    }

    pub fn room_index(&self) -> usize {
        self.room_index
    }

    pub fn active_room(&self) -> &Room {
        &self.floor.rooms[self.room_index]
    }

    pub fn players(&self) -> &[PlayerEntity] {
        &self.players
    }

    pub fn player(&self, id: &str) -> Option<&PlayerEntity> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Spawns a player at the room center with fresh stats. Returns false if the id is taken.
    pub fn add_player(&mut self, id: &str, color: &str) -> bool {
        if self.player(id).is_some() {
            return false;
        }
        self.players
            .push(PlayerEntity::new(id, CENTER, PlayerStats::default(), color));
        info!(player_id = id, players = self.players.len(), "player joined");
        true
    }

    pub fn remove_player(&mut self, id: &str) -> bool {
        let before = self.players.len();
        self.players.retain(|p| p.id != id);
        self.inputs.remove(id);
        self.cooldowns.remove(id);
        let removed = self.players.len() != before;
        if removed {
            info!(player_id = id, players = self.players.len(), "player left");
        }
        removed
    }

    /// Replaces the held keys for `player_id`. Input from an unseen id is an implicit join.
    pub fn set_input(&mut self, player_id: &str, keys: KeySet) {
        self.add_player(player_id, JOIN_COLOR);
        self.inputs.insert(player_id.to_string(), keys);
    }

    /// Runs one fixed step over the active room.
    pub fn advance(&mut self, now: Duration) -> Vec<TickEvent> {
        let mut events = Vec::new();
        let from = self.room_index;
        let room = &mut self.floor.rooms[from];
        let idle = KeySet::new();

        for p in self.players.iter_mut() {
            if p.is_dead {
                continue;
            }
            let keys = self.inputs.get(&p.id).unwrap_or(&idle);
            let intent = input::resolve(keys);
            movement::tick_player(p, intent.movement, &self.tuning.player);

            let tear = shooting::try_fire(
                p,
                intent.shot,
                now,
                &mut self.cooldowns,
                &mut self.floor.next_entity_id,
                &self.tuning.player,
            );
            if let Some(tear) = tear {
                room.projectiles.push(tear);
            }
        }

        events.extend(projectiles::tick_projectiles(
            &mut room.projectiles,
            &mut room.enemies,
            &mut self.players,
            &self.tuning.projectile,
            &self.tuning.player,
        ));

        events.extend(enemies::tick_enemies(
            room,
            &mut self.players,
            &mut self.floor.next_entity_id,
            &mut self.rng,
            &self.tuning.enemy,
            &self.tuning.projectile,
        ));

        if let Some(cleared) =
            enemies::resolve_room_clear(room, from, &mut self.floor.next_entity_id)
        {
            info!(room_index = from, "room cleared");
            events.push(cleared);
        }

        if let Some(door) = doors::find_traversal(room, &self.players) {
            if let Some(to) = self.floor.index_of(door.target) {
                doors::teleport_party(&mut self.players, door.direction);
                self.room_index = to;
                debug!(from, to, direction = ?door.direction, "party changed rooms");
                events.push(TickEvent::RoomChanged { from, to });
            }
        }

        let room = &mut self.floor.rooms[self.room_index];
        events.extend(pickups::claim_items(room, &mut self.players));

        if !self.players.is_empty() && self.players.iter().all(|p| p.is_dead) {
            events.push(TickEvent::Defeat);
        }

        for ev in &events {
            if let TickEvent::PlayerDied { player_id } = ev {
                info!(player_id = %player_id, "player died");
            }
        }
        events
    }

    /// Swaps in the next floor. Stats carry over; everyone restarts at the center.
    pub fn descend(&mut self) {
        let number = self.floor.number.saturating_add(1);
        self.load_floor(number);
    }

    /// Fresh run from floor 1: new layout, default stats, everyone revived.
    pub fn restart(&mut self) {
        self.load_floor(1);
        for p in self.players.iter_mut() {
            p.stats = PlayerStats::default();
            p.is_dead = false;
        }
    }

    fn load_floor(&mut self, number: u32) {
        self.floor = dungeon::generate(number, &mut self.rng);
        self.room_index = 0;
        self.cooldowns.clear();
        for p in self.players.iter_mut() {
            p.pos = CENTER;
            p.vel = Vector2::ZERO;
        }
        info!(
            floor = self.floor.number,
            rooms = self.floor.rooms.len(),
            "floor generated"
        );
    }

    pub fn snapshot(&self, tick: u64, floor_name: &str) -> WorldUpdate {
        let room = self.active_room();
        WorldUpdate {
            tick,
            floor: self.floor.number,
            floor_name: floor_name.to_string(),
            room_index: self.room_index,
            players: self.players.clone(),
            enemies: room.enemies.clone(),
            projectiles: room.projectiles.clone(),
            items: room.items.clone(),
            doors_open: room.cleared,
        }
    }
}

#[cfg(test)]
impl Simulation {
    pub(crate) fn jump_to_room(&mut self, index: usize) {
        self.room_index = index;
    }

    pub(crate) fn kill_all_enemies(&mut self) {
        for e in &mut self.floor.rooms[self.room_index].enemies {
            e.hp = 0.0;
        }
    }

    pub(crate) fn place_player(&mut self, id: &str, pos: Vector2) {
        if let Some(p) = self.players.iter_mut().find(|p| p.id == id) {
            p.pos = pos;
            p.vel = Vector2::ZERO;
        }
    }

    pub(crate) fn kill_player(&mut self, id: &str) {
        if let Some(p) = self.players.iter_mut().find(|p| p.id == id) {
            p.hurt(p.stats.max_hp);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dungeon::items::{HEART_PRICE, heart};
    use crate::domain::key_set;
    use crate::domain::state::{EntityKind, ProjectileOwner, RoomType};
    use crate::domain::systems::doors::anchor;
    use rand::SeedableRng;

    fn sim(seed: u64) -> Simulation {
        Simulation::new(1, GameRng::seed_from_u64(seed), Tuning::default())
    }

    fn tick(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    #[test]
    fn when_same_input_arrives_twice_then_it_counts_once() {
        let mut once = sim(11);
        let mut twice = sim(11);

        once.set_input("p1", key_set(["d"]));
        twice.set_input("p1", key_set(["d"]));
        twice.set_input("p1", key_set(["d"]));

        once.advance(tick(16));
        twice.advance(tick(16));

        assert_eq!(once.players(), twice.players());
        assert_eq!(twice.players().len(), 1);
    }

    #[test]
    fn when_unseen_player_sends_input_then_next_tick_has_them_at_spawn() {
        let mut s = sim(3);
        s.set_input("X", KeySet::new());
        s.advance(tick(16));

        let x = s.player("X").expect("implicit join");
        assert_eq!(x.pos, CENTER);
        assert_eq!(x.stats, PlayerStats::default());
        assert_eq!(x.stats.current_hp, 6);
        assert_eq!(x.color, JOIN_COLOR);
        assert!(!x.is_dead);
    }

    #[test]
    fn when_input_is_missing_then_player_idles() {
        let mut s = sim(3);
        s.add_player("host", PLAYER_COLORS[0]);
        s.advance(tick(16));
        assert_eq!(s.player("host").map(|p| p.pos), Some(CENTER));
    }

    #[test]
    fn when_every_enemy_dies_then_room_clears_and_boss_room_gets_trapdoor() {
        let mut s = sim(5);
        s.add_player("host", PLAYER_COLORS[0]);
        // Park the party far from the center so the trapdoor stays untouched.
        s.players[0].pos = Vector2::new(100.0, 100.0);

        let boss_index = s
            .floor
            .rooms
            .iter()
            .position(|r| r.kind == RoomType::Boss)
            .expect("boss room");
        s.room_index = boss_index;
        for e in &mut s.floor.rooms[boss_index].enemies {
            e.hp = 0.0;
        }

        let events = s.advance(tick(16));

        let room = s.active_room();
        assert!(room.cleared);
        assert!(events.contains(&TickEvent::RoomCleared {
            room_index: boss_index
        }));
        let trapdoors: Vec<_> = room
            .enemies
            .iter()
            .filter(|e| e.kind == EntityKind::Trapdoor)
            .collect();
        assert_eq!(trapdoors.len(), 1);
        assert_eq!(trapdoors[0].pos, CENTER);
        assert_eq!(room.hostile_count(), 0);
    }

    #[test]
    fn when_normal_room_is_wiped_out_then_no_trapdoor_spawns() {
        let mut s = sim(5);
        s.add_player("host", PLAYER_COLORS[0]);
        let index = s
            .floor
            .rooms
            .iter()
            .position(|r| r.kind == RoomType::Normal)
            .expect("normal room");
        s.room_index = index;
        for e in &mut s.floor.rooms[index].enemies {
            e.hp = -1.0;
        }

        s.advance(tick(16));

        assert!(s.active_room().cleared);
        assert!(s.active_room().enemies.is_empty());
    }

    #[test]
    fn when_player_cannot_afford_shop_item_then_it_stays() {
        let mut s = sim(8);
        s.add_player("host", PLAYER_COLORS[0]);
        s.floor.rooms[0].items = vec![heart(900, CENTER, Some(HEART_PRICE))];

        s.advance(tick(16));

        assert_eq!(s.active_room().items.len(), 1);
        assert_eq!(s.player("host").map(|p| p.stats.coins), Some(0));
    }

    #[test]
    fn when_player_walks_into_open_door_then_party_moves_to_the_target_room() {
        let mut s = sim(21);
        s.add_player("host", PLAYER_COLORS[0]);
        s.add_player("guest", JOIN_COLOR);
        let door = s.floor.rooms[0].doors[0];
        s.players[0].pos = anchor(door.direction);

        let events = s.advance(tick(16));

        let to = s.floor.index_of(door.target).expect("door target");
        assert_eq!(events, vec![TickEvent::RoomChanged { from: 0, to }]);
        assert_eq!(s.room_index(), to);
        for p in s.players() {
            assert_eq!(p.vel, Vector2::ZERO);
        }
    }

    #[test]
    fn when_arrow_is_held_then_tear_spawns_in_the_active_room() {
        let mut s = sim(2);
        s.set_input("host", key_set(["ArrowLeft"]));

        s.advance(tick(1000));
        s.advance(tick(1016));

        let tears = &s.active_room().projectiles;
        assert_eq!(tears.len(), 1);
        assert_eq!(tears[0].owner, ProjectileOwner::Player);
        assert!(tears[0].vel.x < 0.0);
    }

    #[test]
    fn when_every_player_is_dead_then_defeat_is_reported() {
        let mut s = sim(2);
        s.add_player("host", PLAYER_COLORS[0]);
        s.players[0].hurt(6);

        let events = s.advance(tick(16));

        assert!(events.contains(&TickEvent::Defeat));
    }

    #[test]
    fn when_no_one_is_connected_then_defeat_is_not_reported() {
        let mut s = sim(2);
        assert!(s.advance(tick(16)).is_empty());
    }

    #[test]
    fn when_descending_then_stats_survive_and_party_starts_over_at_center() {
        let mut s = sim(4);
        s.add_player("host", PLAYER_COLORS[0]);
        s.players[0].stats.coins = 9;
        s.players[0].pos = Vector2::new(80.0, 80.0);

        s.descend();

        assert_eq!(s.floor_number(), 2);
        assert_eq!(s.room_index(), 0);
        assert_eq!(s.players[0].stats.coins, 9);
        assert_eq!(s.players[0].pos, CENTER);
    }

    #[test]
    fn when_restarting_then_stats_reset_and_floor_one_returns() {
        let mut s = sim(4);
        s.add_player("host", PLAYER_COLORS[0]);
        s.descend();
        s.players[0].hurt(6);
        s.players[0].stats.coins = 4;

        s.restart();

        assert_eq!(s.floor_number(), 1);
        assert_eq!(s.players[0].stats, PlayerStats::default());
        assert!(!s.players[0].is_dead);
    }

    #[test]
    fn when_player_leaves_then_their_input_is_forgotten() {
        let mut s = sim(4);
        s.set_input("X", key_set(["w"]));
        assert!(s.remove_player("X"));
        assert!(s.inputs.is_empty());
        assert!(!s.remove_player("X"));
    }
}

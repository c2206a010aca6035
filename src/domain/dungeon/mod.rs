//! Procedural floor generation.
//!
//! A floor is grown breadth-first from the start room at the grid origin. Grid
//! coordinates are the dedupe key, so the resulting graph is connected but may
//! contain cycles. Roles are assigned after growth (boss, treasure, shop), doors
//! are derived from adjacency, and finally rooms are populated.

pub mod items;
pub mod population;

use crate::domain::geometry::Vector2;
use crate::domain::state::{Direction, Door, Floor, GridPos, Room, RoomType};
use crate::domain::tuning::arena::CENTER;
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::{HashSet, VecDeque};

/// Chance that an unoccupied neighbor is turned into a room during growth.
pub const BRANCH_PROBABILITY: f32 = 0.6;

/// Horizontal gap between shop pedestals.
const SHOP_SPACING: f32 = 100.0;

/// Room budget for a floor: grows by two per floor plus a small random spread.
pub fn target_room_count<R: Rng + ?Sized>(floor: u32, rng: &mut R) -> usize {
    8 + rng.random_range(0..4usize) + floor as usize * 2
}

/// Builds a complete floor. Deterministic for a given seeded `rng`.
pub fn generate<R: Rng + ?Sized>(floor: u32, rng: &mut R) -> Floor {
    let floor = floor.max(1);
    let target = target_room_count(floor, rng);
    let mut out = Floor {
        number: floor,
        rooms: grow_layout(target, rng),
        next_entity_id: 1,
    };

    let boss_index = assign_boss(&mut out.rooms);
    assign_treasure(&mut out, boss_index, rng);
    assign_shop(&mut out, rng);
    link_doors(&mut out.rooms);
    populate(&mut out, rng);
    out
}

fn grow_layout<R: Rng + ?Sized>(target: usize, rng: &mut R) -> Vec<Room> {
    let mut rooms = vec![Room::new(GridPos::ORIGIN, RoomType::Start)];
    let mut occupied: HashSet<GridPos> = HashSet::from([GridPos::ORIGIN]);
    let mut queue: VecDeque<GridPos> = VecDeque::from([GridPos::ORIGIN]);
    let mut start_neighbors: Option<[Direction; 4]> = None;

    while rooms.len() < target {
        let Some(current) = queue.pop_front() else {
            break;
        };

        let mut directions = Direction::ALL;
        directions.shuffle(rng);
        if current == GridPos::ORIGIN {
            start_neighbors = Some(directions);
        }

        for direction in directions {
            if rooms.len() >= target {
                break;
            }
            let next = current.step(direction);
            if occupied.contains(&next) {
                continue;
            }
            if rng.random::<f32>() < BRANCH_PROBABILITY {
                rooms.push(Room::new(next, RoomType::Normal));
                occupied.insert(next);
                queue.push_back(next);
            }
        }
    }

    // Every floor needs at least a start and a boss room.
    if rooms.len() < 2 {
        let direction = start_neighbors.map_or(Direction::Up, |dirs| dirs[0]);
        rooms.push(Room::new(GridPos::ORIGIN.step(direction), RoomType::Normal));
    }

    rooms
}

/// Marks the first room at the strictly greatest Manhattan distance as the boss room.
fn assign_boss(rooms: &mut [Room]) -> usize {
    let mut max_dist = 0;
    let mut boss_index = 0;
    for (i, room) in rooms.iter().enumerate() {
        let dist = room.pos.manhattan();
        if dist > max_dist {
            max_dist = dist;
            boss_index = i;
        }
    }

    let boss = &mut rooms[boss_index];
    boss.kind = RoomType::Boss;
    boss.cleared = false;
    boss_index
}

fn assign_treasure<R: Rng + ?Sized>(floor: &mut Floor, boss_index: usize, rng: &mut R) {
    let candidates: Vec<usize> = (1..floor.rooms.len())
        .filter(|&i| i != boss_index)
        .collect();
    if candidates.is_empty() {
        return;
    }

    let index = candidates[rng.random_range(0..candidates.len())];
    let id = floor.allocate_id();
    let item = items::random_passive(rng, id, CENTER, None);
    let room = &mut floor.rooms[index];
    room.kind = RoomType::Treasure;
    room.cleared = true;
    room.items.push(item);
}

fn assign_shop<R: Rng + ?Sized>(floor: &mut Floor, rng: &mut R) {
    let candidates: Vec<usize> = floor
        .rooms
        .iter()
        .enumerate()
        .filter(|(_, r)| r.kind == RoomType::Normal)
        .map(|(i, _)| i)
        .collect();
    if candidates.is_empty() {
        return;
    }

    let index = candidates[rng.random_range(0..candidates.len())];
    let mut stock = Vec::with_capacity(3);
    for slot in 0..3 {
        let pos = Vector2::new(CENTER.x + (slot as f32 - 1.0) * SHOP_SPACING, CENTER.y);
        let id = floor.allocate_id();
        stock.push(items::shop_item(rng, id, pos));
    }

    let room = &mut floor.rooms[index];
    room.kind = RoomType::Shop;
    room.cleared = true;
    room.items = stock;
}

/// A door exists in a direction iff a room occupies the adjacent coordinate.
fn link_doors(rooms: &mut [Room]) {
    let occupied: HashSet<GridPos> = rooms.iter().map(|r| r.pos).collect();
    for room in rooms.iter_mut() {
        room.doors = Direction::ALL
            .into_iter()
            .map(|direction| Door {
                direction,
                target: room.pos.step(direction),
            })
            .filter(|door| occupied.contains(&door.target))
            .collect();
    }
}

fn populate<R: Rng + ?Sized>(floor: &mut Floor, rng: &mut R) {
    let number = floor.number;
    for index in 0..floor.rooms.len() {
        match floor.rooms[index].kind {
            RoomType::Normal => {
                let count = population::enemy_count(number, rng.random::<f32>());
                for _ in 0..count {
                    let id = floor.allocate_id();
                    let enemy = population::spawn_enemy(rng, id, number);
                    floor.rooms[index].enemies.push(enemy);
                }
            }
            RoomType::Boss => {
                let id = floor.allocate_id();
                floor.rooms[index]
                    .enemies
                    .push(population::spawn_boss(id, number));
            }
            RoomType::Start | RoomType::Treasure | RoomType::Shop => {}
        }
    }
}

// Domain-level rooms, entities, items and player state.

use super::geometry::Vector2;

pub type PlayerId = String;
pub type EntityId = u64;

/// Integer coordinates of a room on the floor grid. The start room sits at the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn manhattan(self) -> i32 {
        self.x.abs() + self.y.abs()
    }

    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self::new(self.x + dx, self.y + dy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Fixed scan order used for door derivation and shot priority.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Grid offset with +Y pointing down.
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn unit(self) -> Vector2 {
        let (dx, dy) = self.offset();
        Vector2::new(dx as f32, dy as f32)
    }

    pub const fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomType {
    Start,
    Normal,
    Treasure,
    Boss,
    Shop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Door {
    pub direction: Direction,
    pub target: GridPos,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Fly,
    Spider,
    Gaper,
    Clotty,
    Pooter,
    Boss,
    Trapdoor,
}

impl EntityKind {
    pub fn is_trapdoor(self) -> bool {
        matches!(self, EntityKind::Trapdoor)
    }
}

/// Enemy or hazard living inside a room.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub pos: Vector2,
    pub vel: Vector2,
    /// Collision radius.
    pub size: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub damage: f32,
    pub color: String,
    /// Ticks since the last ranged attack.
    pub state_timer: u32,
}

impl Entity {
    pub fn is_dead(&self) -> bool {
        !self.kind.is_trapdoor() && self.hp <= 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileOwner {
    Player,
    Enemy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub id: EntityId,
    pub owner: ProjectileOwner,
    pub pos: Vector2,
    pub vel: Vector2,
    pub size: f32,
    pub damage: f32,
    pub color: String,
    pub range: f32,
    pub distance_traveled: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Passive,
    Active,
    Pickup,
}

/// Additive deltas applied to a player's stats when an item is claimed.
/// `hp` heals (clamped to max) rather than raising the cap.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatModifiers {
    pub speed: f32,
    pub damage: f32,
    pub fire_rate: f32,
    pub range: f32,
    pub shot_speed: f32,
    pub hp: i32,
    pub coins: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: EntityId,
    pub name: String,
    pub description: String,
    pub kind: ItemKind,
    pub modifiers: Option<StatModifiers>,
    /// Coin price; `None` means free.
    pub cost: Option<i32>,
    pub pos: Vector2,
}

impl Item {
    pub fn price(&self) -> i32 {
        self.cost.unwrap_or(0).max(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerStats {
    pub speed: f32,
    pub damage: f32,
    pub fire_rate: f32,
    pub range: f32,
    pub shot_speed: f32,
    pub max_hp: i32,
    pub current_hp: i32,
    pub coins: i32,
    pub keys: i32,
    pub bombs: i32,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            speed: 1.0,
            damage: 4.0,
            fire_rate: 5.0,
            range: 15.0,
            shot_speed: 1.0,
            max_hp: 6,
            current_hp: 6,
            coins: 0,
            keys: 0,
            bombs: 0,
        }
    }
}

impl PlayerStats {
    /// Removes hp, never below zero. Returns true when this hit emptied the bar.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        let was_alive = self.current_hp > 0;
        self.current_hp = (self.current_hp - amount.max(0)).clamp(0, self.max_hp.max(0));
        was_alive && self.current_hp == 0
    }

    pub fn heal(&mut self, amount: i32) {
        self.current_hp = (self.current_hp + amount.max(0)).clamp(0, self.max_hp.max(0));
    }

    pub fn can_afford(&self, item: &Item) -> bool {
        item.price() <= self.coins
    }

    pub fn apply(&mut self, modifiers: &StatModifiers) {
        self.speed += modifiers.speed;
        self.damage += modifiers.damage;
        self.fire_rate += modifiers.fire_rate;
        self.range += modifiers.range;
        self.shot_speed += modifiers.shot_speed;
        self.coins += modifiers.coins;
        if modifiers.hp > 0 {
            self.heal(modifiers.hp);
        }
    }
}

/// A connected participant as owned by the host simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerEntity {
    pub id: PlayerId,
    pub pos: Vector2,
    pub vel: Vector2,
    pub stats: PlayerStats,
    pub color: String,
    pub is_dead: bool,
}

impl PlayerEntity {
    pub fn new(id: impl Into<PlayerId>, pos: Vector2, stats: PlayerStats, color: &str) -> Self {
        Self {
            id: id.into(),
            pos,
            vel: Vector2::ZERO,
            stats,
            color: color.to_string(),
            is_dead: false,
        }
    }

    /// Applies hp loss and flips `is_dead` when the bar empties. Returns true on death.
    pub fn hurt(&mut self, amount: i32) -> bool {
        let died = self.stats.take_damage(amount);
        if self.stats.current_hp == 0 {
            self.is_dead = true;
        }
        died
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub pos: GridPos,
    pub kind: RoomType,
    pub cleared: bool,
    pub enemies: Vec<Entity>,
    pub items: Vec<Item>,
    pub projectiles: Vec<Projectile>,
    pub doors: Vec<Door>,
}

impl Room {
    pub fn new(pos: GridPos, kind: RoomType) -> Self {
        Self {
            pos,
            kind,
            cleared: matches!(kind, RoomType::Start),
            enemies: Vec::new(),
            items: Vec::new(),
            projectiles: Vec::new(),
            doors: Vec::new(),
        }
    }

    /// Enemies still standing between the party and the doors.
    pub fn hostile_count(&self) -> usize {
        self.enemies
            .iter()
            .filter(|e| !e.kind.is_trapdoor())
            .count()
    }

    pub fn door(&self, direction: Direction) -> Option<&Door> {
        self.doors.iter().find(|d| d.direction == direction)
    }
}

/// One generated floor: the room graph plus the id counter for entities spawned on it.
#[derive(Debug, Clone, PartialEq)]
pub struct Floor {
    pub number: u32,
    pub rooms: Vec<Room>,
    pub next_entity_id: EntityId,
}

impl Floor {
    pub fn index_of(&self, pos: GridPos) -> Option<usize> {
        self.rooms.iter().position(|r| r.pos == pos)
    }

    pub fn allocate_id(&mut self) -> EntityId {
        take_entity_id(&mut self.next_entity_id)
    }
}

/// Hands out the next id from a floor's counter. Systems that only hold the counter
/// (not the whole floor) allocate through this too.
pub fn take_entity_id(counter: &mut EntityId) -> EntityId {
    let id = *counter;
    *counter = counter.wrapping_add(1);
    id
}

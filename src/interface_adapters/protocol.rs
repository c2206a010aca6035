// Wire protocol DTOs and conversions for the co-op session messages.
// Domain types stay serde-free; everything on the socket goes through these.

use crate::domain::{
    Entity, EntityKind, Item, ItemKind, PlayerEntity, PlayerStats, Projectile, ProjectileOwner,
    StatModifiers, Vector2, key_set,
};
use crate::use_cases::{GameEvent, WorldUpdate};
use serde::{Deserialize, Serialize};

/// Every message either side may put on the socket. Tags this build does not know
/// decode to `Unknown` and are dropped by the receiver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WireMessage {
    // Client to host, once per client tick.
    Input(InputPacket),
    // Host to clients, once per host tick.
    State(StatePacket),
    #[serde(other)]
    Unknown,
}

pub fn encode(msg: &WireMessage) -> Result<String, serde_json::Error> {
    serde_json::to_string(msg)
}

pub fn decode(text: &str) -> Result<WireMessage, serde_json::Error> {
    serde_json::from_str(text)
}

/// Keys currently held by one player.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputPacket {
    #[serde(default)]
    pub player_id: String,
    #[serde(default)]
    pub keys: Vec<String>,
}

impl From<InputPacket> for GameEvent {
    fn from(packet: InputPacket) -> Self {
        GameEvent::Input {
            keys: key_set(&packet.keys),
            player_id: packet.player_id,
        }
    }
}

/// Snapshot of the host's active room.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatePacket {
    #[serde(default)]
    pub tick: u64,
    #[serde(default)]
    pub floor: u32,
    pub room_index: usize,
    pub players: Vec<PlayerDto>,
    pub enemies: Vec<EntityDto>,
    pub projectiles: Vec<ProjectileDto>,
    pub items: Vec<ItemDto>,
    pub doors_open: bool,
    #[serde(default)]
    pub floor_name: String,
}

impl From<&WorldUpdate> for StatePacket {
    fn from(update: &WorldUpdate) -> Self {
        Self {
            tick: update.tick,
            floor: update.floor,
            room_index: update.room_index,
            players: update.players.iter().map(PlayerDto::from).collect(),
            enemies: update.enemies.iter().map(EntityDto::from).collect(),
            projectiles: update.projectiles.iter().map(ProjectileDto::from).collect(),
            items: update.items.iter().map(ItemDto::from).collect(),
            doors_open: update.doors_open,
            floor_name: update.floor_name.clone(),
        }
    }
}

impl From<StatePacket> for WorldUpdate {
    fn from(packet: StatePacket) -> Self {
        Self {
            tick: packet.tick,
            floor: packet.floor,
            floor_name: packet.floor_name,
            room_index: packet.room_index,
            players: packet.players.into_iter().map(PlayerEntity::from).collect(),
            enemies: packet.enemies.into_iter().map(Entity::from).collect(),
            projectiles: packet.projectiles.into_iter().map(Projectile::from).collect(),
            items: packet.items.into_iter().map(Item::from).collect(),
            doors_open: packet.doors_open,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2Dto {
    pub x: f32,
    pub y: f32,
}

impl From<Vector2> for Vec2Dto {
    fn from(v: Vector2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl From<Vec2Dto> for Vector2 {
    fn from(v: Vec2Dto) -> Self {
        Vector2::new(v.x, v.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKindDto {
    #[serde(rename = "ENEMY_FLY")]
    Fly,
    #[serde(rename = "ENEMY_SPIDER")]
    Spider,
    #[serde(rename = "ENEMY_GAPER")]
    Gaper,
    #[serde(rename = "ENEMY_CLOTTY")]
    Clotty,
    #[serde(rename = "ENEMY_POOTER")]
    Pooter,
    #[serde(rename = "ENEMY_BOSS")]
    Boss,
    #[serde(rename = "TRAPDOOR")]
    Trapdoor,
}

impl From<EntityKind> for EntityKindDto {
    fn from(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Fly => EntityKindDto::Fly,
            EntityKind::Spider => EntityKindDto::Spider,
            EntityKind::Gaper => EntityKindDto::Gaper,
            EntityKind::Clotty => EntityKindDto::Clotty,
            EntityKind::Pooter => EntityKindDto::Pooter,
            EntityKind::Boss => EntityKindDto::Boss,
            EntityKind::Trapdoor => EntityKindDto::Trapdoor,
        }
    }
}

impl From<EntityKindDto> for EntityKind {
    fn from(kind: EntityKindDto) -> Self {
        match kind {
            EntityKindDto::Fly => EntityKind::Fly,
            EntityKindDto::Spider => EntityKind::Spider,
            EntityKindDto::Gaper => EntityKind::Gaper,
            EntityKindDto::Clotty => EntityKind::Clotty,
            EntityKindDto::Pooter => EntityKind::Pooter,
            EntityKindDto::Boss => EntityKind::Boss,
            EntityKindDto::Trapdoor => EntityKind::Trapdoor,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDto {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: EntityKindDto,
    pub pos: Vec2Dto,
    pub vel: Vec2Dto,
    pub size: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub damage: f32,
    pub color: String,
    #[serde(default)]
    pub state_timer: u32,
}

impl From<&Entity> for EntityDto {
    fn from(e: &Entity) -> Self {
        Self {
            id: e.id,
            kind: e.kind.into(),
            pos: e.pos.into(),
            vel: e.vel.into(),
            size: e.size,
            hp: e.hp,
            max_hp: e.max_hp,
            damage: e.damage,
            color: e.color.clone(),
            state_timer: e.state_timer,
        }
    }
}

impl From<EntityDto> for Entity {
    fn from(e: EntityDto) -> Self {
        Self {
            id: e.id,
            kind: e.kind.into(),
            pos: e.pos.into(),
            vel: e.vel.into(),
            size: e.size,
            hp: e.hp,
            max_hp: e.max_hp,
            damage: e.damage,
            color: e.color,
            state_timer: e.state_timer,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnerDto {
    Player,
    Enemy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectileDto {
    pub id: u64,
    pub owner: OwnerDto,
    pub pos: Vec2Dto,
    pub vel: Vec2Dto,
    pub size: f32,
    pub damage: f32,
    pub color: String,
    pub range: f32,
    pub distance_traveled: f32,
}

impl From<&Projectile> for ProjectileDto {
    fn from(p: &Projectile) -> Self {
        Self {
            id: p.id,
            owner: match p.owner {
                ProjectileOwner::Player => OwnerDto::Player,
                ProjectileOwner::Enemy => OwnerDto::Enemy,
            },
            pos: p.pos.into(),
            vel: p.vel.into(),
            size: p.size,
            damage: p.damage,
            color: p.color.clone(),
            range: p.range,
            distance_traveled: p.distance_traveled,
        }
    }
}

impl From<ProjectileDto> for Projectile {
    fn from(p: ProjectileDto) -> Self {
        Self {
            id: p.id,
            owner: match p.owner {
                OwnerDto::Player => ProjectileOwner::Player,
                OwnerDto::Enemy => ProjectileOwner::Enemy,
            },
            pos: p.pos.into(),
            vel: p.vel.into(),
            size: p.size,
            damage: p.damage,
            color: p.color,
            range: p.range,
            distance_traveled: p.distance_traveled,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKindDto {
    Passive,
    Active,
    Pickup,
}

/// Stat deltas; absent fields mean no change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatModifiersDto {
    pub speed: f32,
    pub damage: f32,
    pub fire_rate: f32,
    pub range: f32,
    pub shot_speed: f32,
    pub hp: i32,
    pub coins: i32,
}

impl From<StatModifiers> for StatModifiersDto {
    fn from(m: StatModifiers) -> Self {
        Self {
            speed: m.speed,
            damage: m.damage,
            fire_rate: m.fire_rate,
            range: m.range,
            shot_speed: m.shot_speed,
            hp: m.hp,
            coins: m.coins,
        }
    }
}

impl From<StatModifiersDto> for StatModifiers {
    fn from(m: StatModifiersDto) -> Self {
        Self {
            speed: m.speed,
            damage: m.damage,
            fire_rate: m.fire_rate,
            range: m.range,
            shot_speed: m.shot_speed,
            hp: m.hp,
            coins: m.coins,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDto {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub kind: ItemKindDto,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stat_modifiers: Option<StatModifiersDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<i32>,
    pub pos: Vec2Dto,
}

impl From<&Item> for ItemDto {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            description: item.description.clone(),
            kind: match item.kind {
                ItemKind::Passive => ItemKindDto::Passive,
                ItemKind::Active => ItemKindDto::Active,
                ItemKind::Pickup => ItemKindDto::Pickup,
            },
            stat_modifiers: item.modifiers.map(StatModifiersDto::from),
            cost: item.cost,
            pos: item.pos.into(),
        }
    }
}

impl From<ItemDto> for Item {
    fn from(item: ItemDto) -> Self {
        Self {
            id: item.id,
            name: item.name,
            description: item.description,
            kind: match item.kind {
                ItemKindDto::Passive => ItemKind::Passive,
                ItemKindDto::Active => ItemKind::Active,
                ItemKindDto::Pickup => ItemKind::Pickup,
            },
            modifiers: item.stat_modifiers.map(StatModifiers::from),
            cost: item.cost,
            pos: item.pos.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStatsDto {
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

impl From<PlayerStats> for PlayerStatsDto {
    fn from(s: PlayerStats) -> Self {
        Self {
            speed: s.speed,
            damage: s.damage,
            fire_rate: s.fire_rate,
            range: s.range,
            shot_speed: s.shot_speed,
            max_hp: s.max_hp,
            current_hp: s.current_hp,
            coins: s.coins,
            keys: s.keys,
            bombs: s.bombs,
        }
    }
}

impl From<PlayerStatsDto> for PlayerStats {
    fn from(s: PlayerStatsDto) -> Self {
        let max_hp = s.max_hp.max(0);
        Self {
            speed: s.speed,
            damage: s.damage,
            fire_rate: s.fire_rate,
            range: s.range,
            shot_speed: s.shot_speed,
            max_hp,
            current_hp: s.current_hp.clamp(0, max_hp),
            coins: s.coins,
            keys: s.keys,
            bombs: s.bombs,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDto {
    pub id: String,
    pub pos: Vec2Dto,
    pub vel: Vec2Dto,
    pub stats: PlayerStatsDto,
    pub color: String,
    pub is_dead: bool,
}

impl From<&PlayerEntity> for PlayerDto {
    fn from(p: &PlayerEntity) -> Self {
        Self {
            id: p.id.clone(),
            pos: p.pos.into(),
            vel: p.vel.into(),
            stats: p.stats.into(),
            color: p.color.clone(),
            is_dead: p.is_dead,
        }
    }
}

impl From<PlayerDto> for PlayerEntity {
    fn from(p: PlayerDto) -> Self {
        Self {
            id: p.id,
            pos: p.pos.into(),
            vel: p.vel.into(),
            stats: p.stats.into(),
            color: p.color,
            is_dead: p.is_dead,
        }
    }
}

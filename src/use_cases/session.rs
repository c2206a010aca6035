// Session controller: owns the simulation and drives the run through its states.

use super::engine::Simulation;
use super::flavor::{FloorTheme, FloorThemes, theme_or_placeholder};
use super::types::{GameEvent, SessionState, WorldUpdate};
use crate::domain::{GameRng, TickEvent, Tuning};
use rand::SeedableRng;
use std::time::Duration;
use tracing::{info, warn};

/// Player id the host uses for its own character.
pub const HOST_PLAYER_ID: &str = "host";

/// Knobs for one session.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Pause between generating a floor and resuming play.
    pub loading_delay: Duration,
    /// Touching the trapdoor on this floor wins the run. `None` means endless.
    pub final_floor: Option<u32>,
    /// Pins the dungeon layout; drawn from entropy when absent.
    pub seed: Option<u64>,
    pub tuning: Tuning,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            loading_delay: Duration::from_millis(2000),
            final_floor: None,
            seed: None,
            tuning: Tuning::default(),
        }
    }
}

pub struct Session {
    state: SessionState,
    sim: Simulation,
    settings: SessionSettings,
    themes: Box<dyn FloorThemes>,
    theme: FloorTheme,
    resume_at: Option<Duration>,
}

impl Session {
    pub fn new(settings: SessionSettings, themes: Box<dyn FloorThemes>) -> Self {
        let seed = settings.seed.unwrap_or_else(rand::random);
        info!(seed, "session created");
        let sim = Simulation::new(1, GameRng::seed_from_u64(seed), settings.tuning);
        let theme = theme_or_placeholder(themes.as_ref(), 1);
        Self {
            state: SessionState::Lobby,
            sim,
            settings,
            themes,
            theme,
            resume_at: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn theme(&self) -> &FloorTheme {
        &self.theme
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    /// Adds a player outside the input path (the host's own character).
    pub fn add_player(&mut self, id: &str, color: &str) -> bool {
        self.sim.add_player(id, color)
    }

    /// Applies one queued event. Inputs are accepted in every state so late joiners are
    /// already spawned when play resumes.
    pub fn handle(&mut self, ev: GameEvent, now: Duration) {
        match ev {
            GameEvent::Input { player_id, keys } => self.sim.set_input(&player_id, keys),
            GameEvent::Leave { player_id } => {
                self.sim.remove_player(&player_id);
            }
            GameEvent::TogglePause => {
                self.state = match self.state {
                    SessionState::Playing => SessionState::Paused,
                    SessionState::Paused => SessionState::Playing,
                    other => other,
                };
            }
            GameEvent::StartRun => match self.state {
                SessionState::Lobby => self.begin_loading(now),
                SessionState::GameOver | SessionState::Victory => {
                    self.sim.restart();
                    self.begin_loading(now);
                }
                other => warn!(state = ?other, "run already in progress"),
            },
        }
    }

    /// Advances the session clock. Only a playing session steps the simulation.
    pub fn tick(&mut self, now: Duration) -> Vec<TickEvent> {
        match self.state {
            SessionState::Loading => {
                if self.resume_at.is_some_and(|at| now >= at) {
                    self.resume_at = None;
                    self.state = SessionState::Playing;
                    info!(floor = self.sim.floor_number(), "floor started");
                }
                return Vec::new();
            }
            SessionState::Playing => {}
            _ => return Vec::new(),
        }

        let events = self.sim.advance(now);
        if events.contains(&TickEvent::Defeat) {
            info!(floor = self.sim.floor_number(), "party defeated");
            self.state = SessionState::GameOver;
        } else if events.contains(&TickEvent::FloorAdvanceRequested) {
            self.advance_floor(now);
        }
        events
    }

    /// Snapshot for broadcast; only produced while playing.
    pub fn snapshot(&self, tick: u64) -> Option<WorldUpdate> {
        (self.state == SessionState::Playing).then(|| self.sim.snapshot(tick, &self.theme.title))
    }

    fn advance_floor(&mut self, now: Duration) {
        let floor = self.sim.floor_number();
        if self.settings.final_floor.is_some_and(|last| floor >= last) {
            info!(floor, "final floor cleared");
            self.state = SessionState::Victory;
            return;
        }
        self.sim.descend();
        self.begin_loading(now);
    }

    fn begin_loading(&mut self, now: Duration) {
        let floor = self.sim.floor_number();
        self.theme = theme_or_placeholder(self.themes.as_ref(), floor);
        self.resume_at = Some(now + self.settings.loading_delay);
        self.state = SessionState::Loading;
        info!(floor, title = %self.theme.title, curse = %self.theme.curse, "floor loading");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Vector2, key_set};
    use crate::domain::state::RoomType;
    use crate::domain::tuning::arena::CENTER;
    use crate::domain::tuning::player::PLAYER_COLORS;
    use crate::use_cases::flavor::{CatalogThemes, PlaceholderThemes};

    fn session(final_floor: Option<u32>) -> Session {
        let settings = SessionSettings {
            loading_delay: Duration::from_millis(100),
            final_floor,
            seed: Some(42),
            tuning: Tuning::default(),
        };
        let mut s = Session::new(settings, Box::new(PlaceholderThemes));
        s.add_player(HOST_PLAYER_ID, PLAYER_COLORS[0]);
        s
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn start_playing(s: &mut Session) {
        s.handle(GameEvent::StartRun, ms(0));
        s.tick(ms(100));
        assert_eq!(s.state(), SessionState::Playing);
    }

    /// Clears the boss room, then drops the host onto the trapdoor it leaves behind.
    fn stand_on_trapdoor(s: &mut Session) {
        let boss = s
            .sim
            .floor()
            .rooms
            .iter()
            .position(|r| r.kind == RoomType::Boss)
            .expect("boss room");
        s.sim.jump_to_room(boss);
        s.sim.kill_all_enemies();
        s.sim.place_player(HOST_PLAYER_ID, Vector2::new(100.0, 100.0));
        s.tick(ms(200));
        assert!(s.sim.active_room().cleared);
        s.sim.place_player(HOST_PLAYER_ID, CENTER);
    }

    #[test]
    fn when_run_starts_then_loading_precedes_playing() {
        let mut s = session(None);
        assert_eq!(s.state(), SessionState::Lobby);
        assert!(s.snapshot(0).is_none());

        s.handle(GameEvent::StartRun, ms(0));
        assert_eq!(s.state(), SessionState::Loading);
        s.tick(ms(50));
        assert_eq!(s.state(), SessionState::Loading);
        s.tick(ms(100));
        assert_eq!(s.state(), SessionState::Playing);

        let snapshot = s.snapshot(7).expect("playing sessions broadcast");
        assert_eq!(snapshot.tick, 7);
        assert_eq!(snapshot.floor, 1);
        assert_eq!(snapshot.floor_name, "FLOOR 1");
        assert!(snapshot.doors_open);
    }

    #[test]
    fn when_paused_then_simulation_stops_and_resume_restores_play() {
        let mut s = session(None);
        start_playing(&mut s);
        s.handle(
            GameEvent::Input {
                player_id: HOST_PLAYER_ID.to_string(),
                keys: key_set(["d"]),
            },
            ms(120),
        );

        s.handle(GameEvent::TogglePause, ms(120));
        assert_eq!(s.state(), SessionState::Paused);
        s.tick(ms(140));
        assert_eq!(s.sim.player(HOST_PLAYER_ID).map(|p| p.pos), Some(CENTER));
        assert!(s.snapshot(1).is_none());

        s.handle(GameEvent::TogglePause, ms(160));
        s.tick(ms(180));
        assert!(s.sim.player(HOST_PLAYER_ID).is_some_and(|p| p.pos.x > CENTER.x));
    }

    #[test]
    fn when_everyone_dies_then_session_is_over_until_restarted() {
        let mut s = session(None);
        start_playing(&mut s);
        s.sim.kill_player(HOST_PLAYER_ID);

        let events = s.tick(ms(120));
        assert!(events.contains(&TickEvent::Defeat));
        assert_eq!(s.state(), SessionState::GameOver);

        s.handle(GameEvent::StartRun, ms(130));
        assert_eq!(s.state(), SessionState::Loading);
        assert!(s.sim.player(HOST_PLAYER_ID).is_some_and(|p| !p.is_dead));
    }

    #[test]
    fn when_trapdoor_is_touched_then_next_floor_loads() {
        let mut s = session(None);
        start_playing(&mut s);
        stand_on_trapdoor(&mut s);

        let events = s.tick(ms(220));

        assert!(events.contains(&TickEvent::FloorAdvanceRequested));
        assert_eq!(s.state(), SessionState::Loading);
        assert_eq!(s.sim.floor_number(), 2);
        assert_eq!(s.theme().title, "FLOOR 2");
    }

    #[test]
    fn when_final_floor_trapdoor_is_touched_then_run_is_won() {
        let mut s = session(Some(1));
        start_playing(&mut s);
        stand_on_trapdoor(&mut s);

        s.tick(ms(220));

        assert_eq!(s.state(), SessionState::Victory);
        assert!(s.state().is_finished());
    }

    #[test]
    fn when_run_is_already_going_then_start_is_ignored() {
        let mut s = session(None);
        start_playing(&mut s);
        s.handle(GameEvent::StartRun, ms(150));
        assert_eq!(s.state(), SessionState::Playing);
    }

    #[test]
    fn when_seed_is_pinned_then_layout_repeats() {
        let a = session(None);
        let b = session(None);
        assert_eq!(a.sim.floor(), b.sim.floor());
    }

    #[test]
    fn when_themes_provide_a_title_then_snapshots_carry_it() {
        let settings = SessionSettings {
            loading_delay: Duration::ZERO,
            ..SessionSettings::default()
        };
        let mut s = Session::new(settings, Box::new(CatalogThemes));
        s.handle(GameEvent::StartRun, ms(0));
        s.tick(ms(0));
        assert_eq!(s.snapshot(0).map(|u| u.floor_name), Some("The Cellar".to_string()));
    }
}

//! # Game — the frame loop
//!
//! ```text
//! frame()
//!   ├─ Time advance
//!   ├─ Input: clear edges, Platform::poll     (Quit → stop, nothing else runs)
//!   ├─ Registry::refresh()                    destroyed last frame → gone
//!   ├─ Registry::update()                     components + deferred commands
//!   ├─ Schedule::run()                        AI, terrain, projectile hits
//!   └─ render()                               layers back to front
//! ```
//!
//! `refresh()` runs first so `update()` never sees an entity destroyed on a
//! previous frame, and everything destroyed during this frame is still drawn
//! once before it disappears.

use std::time::Duration;

use crate::config::{ConfigError, GameConfig};
use crate::ecs::{Entity, Registry, Schedule};
use crate::input::{Input, Key};
use crate::platform::{Canvas, Platform, PlatformEvent};
use crate::role::Role;
use crate::spawn::{ArenaMap, spawn_arena};
use crate::state::GameRng;
use crate::systems::arena_schedule;
use crate::time::Time;

pub struct Game {
    registry: Registry,
    schedule: Schedule,
    config: GameConfig,
    running: bool,
}

impl Game {
    /// An empty game with its resources installed and the arena systems
    /// scheduled.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut registry = Registry::with_config(config.ecs);
        registry.insert_resource(Time::new());
        registry.insert_resource(Input::<Key>::new());
        registry.insert_resource(GameRng::new(config.seed));
        registry.insert_resource(config.clone());
        Ok(Self {
            registry,
            schedule: arena_schedule(),
            config,
            running: true,
        })
    }

    /// A game with `map` already populated. Returns the player handle too.
    pub fn arena(config: GameConfig, map: &ArenaMap) -> Result<(Self, Entity), ConfigError> {
        let mut game = Self::new(config)?;
        let player = spawn_arena(&mut game.registry, map, &game.config);
        log::info!(
            "arena ready: {} entities, {} monsters",
            game.registry.entity_count(),
            game.registry.group(Role::Monster).len()
        );
        Ok((game, player))
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// One frame on the wall clock.
    pub fn frame(&mut self, platform: &mut dyn Platform, canvas: &mut dyn Canvas) {
        self.registry.resource_mut::<Time>().update();
        self.tick(platform, canvas);
    }

    /// One frame of exactly `delta`.
    pub fn step(&mut self, delta: Duration, platform: &mut dyn Platform, canvas: &mut dyn Canvas) {
        self.registry.resource_mut::<Time>().advance(delta);
        self.tick(platform, canvas);
    }

    fn tick(&mut self, platform: &mut dyn Platform, canvas: &mut dyn Canvas) {
        #[cfg(feature = "diagnostics")]
        self.registry.reset_frame_counters();

        let input = self.registry.resource_mut::<Input<Key>>();
        input.clear_just();
        if platform.poll(input) == PlatformEvent::Quit {
            log::info!(
                "quit after {} frames",
                self.registry.resource::<Time>().frame_count()
            );
            self.running = false;
            return;
        }

        self.registry.refresh();
        self.registry.update();
        self.schedule.run(&mut self.registry);
        self.render(canvas);
    }

    /// Draw every layer back to front.
    pub fn render(&self, canvas: &mut dyn Canvas) {
        canvas.clear();
        for role in Role::RENDER_ORDER {
            self.registry.draw_group(role, canvas);
            if role == Role::Map && self.config.debug_colliders {
                self.registry.draw_group(Role::TerrainCollider, canvas);
            }
        }
        canvas.present();
    }

    /// Run on the wall clock until the platform asks to quit. Returns the
    /// number of frames rendered.
    pub fn run(&mut self, platform: &mut dyn Platform, canvas: &mut dyn Canvas) -> u64 {
        log::info!("entering main loop");
        let mut frames = 0;
        while self.running {
            self.frame(platform, canvas);
            if self.running {
                frames += 1;
            }
        }
        frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Transform;
    use crate::math::Vec2;
    use crate::platform::{KeyEvent, RecordingCanvas, ScriptedPlatform};
    use crate::spawn::{MONSTER_TEXTURE, PLAYER_TEXTURE, PROJECTILE_TEXTURE, TERRAIN_TEXTURE};

    const FRAME: Duration = Duration::from_millis(16);

    fn seeded() -> GameConfig {
        GameConfig {
            seed: Some(42),
            ..GameConfig::default()
        }
    }

    #[test]
    fn quit_stops_before_anything_runs() {
        let (mut game, player) = Game::arena(seeded(), &ArenaMap::walled(11)).unwrap();
        let before = game.registry().get_component::<Transform>(player).position;
        let mut canvas = RecordingCanvas::default();
        game.step(FRAME, &mut ScriptedPlatform::new(), &mut canvas);

        assert!(!game.is_running());
        assert_eq!(canvas.frames_presented, 0);
        assert_eq!(game.registry().get_component::<Transform>(player).position, before);
    }

    #[test]
    fn layers_are_drawn_back_to_front() {
        let (mut game, _) = Game::arena(seeded(), &ArenaMap::walled(5)).unwrap();
        let mut canvas = RecordingCanvas::default();
        let mut platform = ScriptedPlatform::new().then([KeyEvent::Down(Key::Fire)]);
        game.step(FRAME, &mut platform, &mut canvas);

        let order = canvas.texture_order();
        let last_terrain = order.iter().rposition(|&t| t == TERRAIN_TEXTURE.0).unwrap();
        let shot = order.iter().position(|&t| t == PROJECTILE_TEXTURE.0).unwrap();
        let player = order.iter().position(|&t| t == PLAYER_TEXTURE.0).unwrap();
        let first_monster = order.iter().position(|&t| t == MONSTER_TEXTURE.0).unwrap();
        assert!(last_terrain < shot);
        assert!(shot < player);
        assert!(player < first_monster);
        // 25 background + 16 wall tiles, 1 shot, 1 player, 3 monsters
        assert_eq!(order.len(), 46);
        assert!(canvas.rects.is_empty());
    }

    #[test]
    fn debug_colliders_are_outlined() {
        let config = GameConfig {
            debug_colliders: true,
            ..seeded()
        };
        let (mut game, _) = Game::arena(config, &ArenaMap::walled(5)).unwrap();
        let mut canvas = RecordingCanvas::default();
        game.step(FRAME, &mut ScriptedPlatform::new().idle(1), &mut canvas);
        assert_eq!(canvas.rects.len(), 16);
    }

    #[test]
    fn walking_into_the_wall_is_undone() {
        let (mut game, player) = Game::arena(seeded(), &ArenaMap::walled(11)).unwrap();
        // player starts at (144, 48); the top wall's bottom edge is y = 32 and
        // the hit box top is 64, so a few steps up reach it
        let mut platform = ScriptedPlatform::new()
            .then([KeyEvent::Down(Key::Up)])
            .idle(20);
        let mut canvas = RecordingCanvas::default();
        while game.is_running() {
            game.step(FRAME, &mut platform, &mut canvas);
            let y = game.registry().get_component::<Transform>(player).position.y;
            // hit box top (y + 16) may touch the wall for at most one frame
            assert!(y + 16.0 >= 32.0 - 3.0, "player walked through the wall: y = {y}");
        }
        let y = game.registry().get_component::<Transform>(player).position.y;
        assert!(y < 48.0);
    }

    #[test]
    fn monsters_close_in_over_time() {
        let mut config = seeded();
        config.monster.spawn_origin = Vec2::new(250.0, 250.0);
        config.monster.spawn_extent = Vec2::new(50.0, 50.0);
        let (mut game, player) = Game::arena(config, &ArenaMap::walled(11)).unwrap();
        let target = game.registry().get_component::<Transform>(player).position;
        let distance = |game: &Game| -> f32 {
            game.registry()
                .group(Role::Monster)
                .iter()
                .map(|&m| {
                    game.registry()
                        .get_component::<Transform>(m)
                        .position
                        .distance(target)
                })
                .sum()
        };
        let start = distance(&game);
        let mut platform = ScriptedPlatform::new().idle(10);
        let mut canvas = RecordingCanvas::default();
        for _ in 0..10 {
            game.step(FRAME, &mut platform, &mut canvas);
        }
        assert!(distance(&game) < start);
    }

    #[test]
    fn run_counts_rendered_frames() {
        let mut game = Game::new(seeded()).unwrap();
        let mut canvas = RecordingCanvas::default();
        let frames = game.run(&mut ScriptedPlatform::new().idle(4), &mut canvas);
        assert_eq!(frames, 4);
        assert_eq!(canvas.frames_presented, 4);
    }

    #[test]
    fn invalid_config_is_refused() {
        let mut config = GameConfig::default();
        config.tile_size = 0.0;
        assert!(matches!(Game::new(config), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn arena_with_too_few_component_slots_is_an_error() {
        let mut config = seeded();
        config.ecs.max_components = 3;
        let result = Game::arena(config, &ArenaMap::walled(5));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn fired_projectile_expires_after_its_range() {
        let mut config = seeded();
        config.projectile.range = 10.0;
        config.projectile.speed = 2.0;
        config.monster.count = 0;
        let (mut game, _) = Game::arena(config, &ArenaMap::walled(30)).unwrap();
        let mut platform = ScriptedPlatform::new()
            .then([KeyEvent::Down(Key::Fire)])
            .idle(8);
        let mut canvas = RecordingCanvas::default();

        game.step(FRAME, &mut platform, &mut canvas);
        assert_eq!(game.registry().group(Role::Projectile).len(), 1);
        for _ in 0..8 {
            game.step(FRAME, &mut platform, &mut canvas);
        }
        assert!(game.registry().group(Role::Projectile).is_empty());
    }
}

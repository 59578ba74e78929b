//! Arena — a headless run of the full game loop.
//!
//! Walks the player around a walled arena, fires a few shots and prints what
//! was drawn on the last frame. Pass a JSON config path to override tuning:
//!
//! ```text
//! RUST_LOG=info cargo run --example arena -- arena.json
//! ```

use std::time::Duration;

use skogr::prelude::*;

fn main() -> Result<(), ConfigError> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig {
            seed: Some(7),
            ..GameConfig::default()
        },
    };

    let (mut game, player) = Game::arena(config, &ArenaMap::walled(12))?;

    let mut platform = ScriptedPlatform::new()
        .then([KeyEvent::Down(Key::Right)])
        .idle(20)
        .then([KeyEvent::Up(Key::Right), KeyEvent::Down(Key::Fire)])
        .then([KeyEvent::Up(Key::Fire), KeyEvent::Down(Key::Down)])
        .idle(15)
        .then([KeyEvent::Up(Key::Down), KeyEvent::Down(Key::Fire)])
        .then([KeyEvent::Up(Key::Fire)])
        .idle(60);
    let mut canvas = RecordingCanvas::default();

    while game.is_running() {
        game.step(Duration::from_millis(16), &mut platform, &mut canvas);
    }

    let position = game.registry().get_component::<Transform>(player).position;
    println!("player ended at {position}");
    println!(
        "{} monsters left, {} sprites on the last frame",
        game.registry().group(Role::Monster).len(),
        canvas.sprites.len()
    );

    #[cfg(feature = "diagnostics")]
    println!("{}", game.snapshot().to_json());

    Ok(())
}

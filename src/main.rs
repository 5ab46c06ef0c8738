//! Bubble Pop headless demo
//!
//! Starts the engine with logging sinks and replays a short scripted session.
//! Usage: `bubble-pop [--mode random|single|still] [settings.json]`

use std::path::Path;
use std::thread;
use std::time::Duration;

use bubble_pop::audio::LogSound;
use bubble_pop::renderer::LogRenderer;
use bubble_pop::{Engine, EngineError, Settings, SpeedMode};

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    log::info!("Bubble Pop starting...");

    let mut args = std::env::args().skip(1);
    let mut path = None;
    let mut mode = None;
    while let Some(arg) = args.next() {
        if arg == "--mode" {
            match args.next().as_deref().and_then(SpeedMode::from_str) {
                Some(m) => mode = Some(m),
                None => log::warn!("--mode expects random, single or still"),
            }
        } else {
            path = Some(arg);
        }
    }

    let mut settings = match path {
        Some(path) => Settings::load(Path::new(&path)),
        None => Settings::default(),
    };
    if let Some(mode) = mode {
        settings.speed_mode = mode;
    }
    log::info!("Speed mode: {}", settings.speed_mode.as_str());

    if let Err(e) = run(&settings) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run(settings: &Settings) -> Result<(), EngineError> {
    let engine = Engine::start(
        settings,
        Box::new(LogRenderer::default()),
        Box::new(LogSound),
    )?;
    let input = engine.handle();
    let tick = Duration::from_millis(settings.tick_period_ms.max(1));

    // Input may arrive before layout
    input.tap(240.0, 400.0)?;
    input.bounds_known(480.0, 800.0)?;

    for (x, y) in [(60.0, 80.0), (420.0, 120.0), (120.0, 700.0)] {
        input.tap(x, y)?;
    }
    thread::sleep(tick * 10);

    // Pop whatever sits first under the middle of the screen
    input.tap(240.0, 400.0)?;
    thread::sleep(tick * 5);

    input.fling(120.0, -80.0)?;
    input.set_speed_mode(SpeedMode::Still)?;
    input.tap(300.0, 300.0)?;
    thread::sleep(tick * 25);

    let live = input.live_bubbles()?;
    log::info!("{} bubbles still on screen", live.len());
    match serde_json::to_string_pretty(&live) {
        Ok(json) => println!("{json}"),
        Err(e) => log::warn!("Could not serialize bubbles: {e}"),
    }

    engine.shutdown();
    Ok(())
}

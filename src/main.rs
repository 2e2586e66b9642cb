mod app;
mod config;
mod core;
mod game;
mod screens;

use game::profile::CardSlots;
use game::tournament::Tournament;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Install logger immediately, then set runtime max level from config after loading it.
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Trace)
        .try_init();
    // Startup default when config is missing or malformed.
    log::set_max_level(log::LevelFilter::Warn);

    config::load();
    let cfg = config::get();
    log::set_max_level(cfg.log_level.as_level_filter());

    let roster = match Tournament::load(&cfg.roster_path, cfg.max_competitors) {
        Ok(roster) => roster,
        Err(e) => {
            // Keep the broken file for inspection; work from an empty in-memory roster.
            log::error!("{e}");
            log::error!("Registrations made this session will not be saved.");
            Tournament::new(cfg.max_competitors)
        }
    };
    app::run(roster, CardSlots::from_config(&cfg))
}

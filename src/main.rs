mod animator;
mod app;
mod color;
mod render;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("huebounce starting up");

    if let Err(e) = app::run() {
        log::error!("Fatal error: {e:#}");
        std::process::exit(1);
    }
}

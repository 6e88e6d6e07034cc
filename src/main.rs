mod app;
mod audio;
mod config;
mod library;
mod player;
mod runtime;
mod session;
mod storage;
mod ui;
mod visualizer;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}

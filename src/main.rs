mod app;
mod audio;
mod config;
mod library;
mod logging;
mod notify;
mod player;
mod prefs;
mod queue;
mod runtime;
mod ui;

#[cfg(test)]
mod test_support;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}

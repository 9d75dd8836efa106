mod app;
mod cli;
mod config;
mod event;
mod http;
mod terminal;
#[cfg(test)]
mod testing;
mod ui;
mod view;

use app::App;
use clap::Parser;
use cli::CliArgs;
use color_eyre::Result;
use http::ReqwestBackend;
use parajes_core::DashboardSession;
use view::TerminalView;

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let args = CliArgs::parse();
    let config = config::init_app_config(&args);

    // Piped output gets the report instead of the console
    let headless = args.headless || !is_terminal();
    config::init_logging(args.debug, headless)?;

    let region = config::initial_region(&args);
    let backend = ReqwestBackend::new(&config.api_base);
    let session = DashboardSession::new(config, backend, TerminalView::new());

    if headless {
        return event::run_headless(&session, &region, args.json).await;
    }

    let mut terminal = terminal::setup_terminal()?;
    let mut app = App::new();

    let result = event::run(&mut terminal, &mut app, &session, &region).await;

    terminal::cleanup_terminal_state(true, true);
    result
}

// Check if we're running in a terminal
fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}

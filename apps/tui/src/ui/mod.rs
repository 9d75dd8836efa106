// Rendering for the parajes console

pub mod screens;
pub mod widgets;

use parajes_core::DashboardConfig;
use ratatui::Frame;

use crate::app::App;
use crate::view::Screen;

pub fn ui(app: &App, screen: &Screen, config: &DashboardConfig, f: &mut Frame<'_>) {
    screens::main::render_main(app, screen, config, f);
}

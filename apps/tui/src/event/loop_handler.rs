use color_eyre::eyre::eyre;
use color_eyre::Result;
use crossterm::event::{self, Event, KeyEventKind};
use parajes_core::api::LAYERS_PATH;
use parajes_core::kpi::serialize_count;
use parajes_core::normalize::ListResponse;
use parajes_core::{Backend, KpiAggregate, KpiEntry, LayerDescriptor, Region, Selector, View};
use ratatui::backend::Backend as TerminalBackend;
use ratatui::Terminal;
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

use crate::app::input::Session;
use crate::app::{handle_input, App};
use crate::ui;

const EVENT_POLL_TIMEOUT: Duration = Duration::from_millis(50);

#[derive(Debug, Serialize)]
struct HeadlessReport {
    api: String,
    region: String,
    layers: Vec<LayerDescriptor>,
    #[serde(serialize_with = "serialize_count")]
    total: f64,
    kpis: KpiAggregate,
}

/// Print the KPI report for one region and exit.
pub async fn run_headless<B: Backend>(
    session: &Session<B>,
    region: &Region,
    json: bool,
) -> Result<()> {
    let report = build_headless_report(session, region).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_headless_text(&report));
    }
    Ok(())
}

async fn build_headless_report<B: Backend>(
    session: &Session<B>,
    region: &Region,
) -> Result<HeadlessReport> {
    let payload: serde_json::Value = session
        .backend()
        .get(LAYERS_PATH)
        .await?
        .into_success()?
        .json()?;
    let layers = ListResponse::from(payload).layer_descriptors();
    let kpis = session.fetch_kpis(region).await?;
    let total = kpis.by_status.iter().map(|entry| entry.count).sum();

    Ok(HeadlessReport {
        api: session.config().api_base.clone(),
        region: region.to_string(),
        layers,
        total,
        kpis,
    })
}

fn render_headless_text(report: &HeadlessReport) -> String {
    fn group(out: &mut String, title: &str, entries: &[KpiEntry]) {
        out.push_str(&format!("\n{title}:\n"));
        if entries.is_empty() {
            out.push_str("- (sin datos)\n");
        }
        for entry in entries {
            out.push_str(&format!("- {}: {}\n", entry.label, entry.count));
        }
    }

    let mut out = String::new();
    out.push_str("\nParajes KPIs\n");
    out.push_str("============\n");
    out.push_str(&format!("API: {}\n", report.api));
    out.push_str(&format!("Departamento: {}\n", report.region));
    out.push_str(&format!("Total parajes: {}\n", report.total));

    out.push_str("\nCapas:\n");
    for layer in &report.layers {
        out.push_str(&format!("- {} ({})\n", layer.label, layer.id));
    }

    group(&mut out, "Por estado", &report.kpis.by_status);
    group(&mut out, "Por municipio", &report.kpis.by_municipality);
    group(&mut out, "Por departamento", &report.kpis.by_department);
    out
}

/// Commits `region` in the region list the way an operator would, if the
/// server offered it.
pub async fn apply_initial_region<B: Backend>(
    app: &mut App,
    session: &Session<B>,
    region: &Region,
) {
    let Region::Named(name) = region else {
        return;
    };

    let index = session
        .view()
        .screen()
        .regions
        .options
        .iter()
        .position(|option| option.value == *name);

    match index {
        Some(index) => {
            app.region_cursor = index;
            session.view().select_index(Selector::Region, index);
            session.on_region_changed().await;
            app.status_message = format!("Departamento: {name}");
        }
        None => {
            warn!(region = %name, "requested departamento not offered by the server");
            app.status_message = format!("Departamento desconocido: {name}");
        }
    }
}

fn draw<T: TerminalBackend, B: Backend>(
    terminal: &mut Terminal<T>,
    app: &App,
    session: &Session<B>,
) -> Result<()> {
    let screen = session.view().screen();
    terminal
        .draw(|f| ui::ui(app, &screen, session.config(), f))
        .map_err(|e| eyre!("Terminal draw error: {e}"))?;
    Ok(())
}

/// Run the main application event loop
pub async fn run<T: TerminalBackend, B: Backend>(
    terminal: &mut Terminal<T>,
    app: &mut App,
    session: &Session<B>,
    region: &Region,
) -> Result<()> {
    app.status_message = "Cargando...".to_string();
    draw(terminal, app, session)?;

    session.bootstrap().await;
    app.status_message.clear();
    apply_initial_region(app, session, region).await;
    info!("console ready");

    while app.running {
        draw(terminal, app, session)?;

        if !matches!(event::poll(EVENT_POLL_TIMEOUT), Ok(true)) {
            continue;
        }
        match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                handle_input(app, session, key.code).await;
            }
            Ok(_) => {
                // Resize and the rest only need the redraw at the top
            }
            Err(e) => warn!(error = %e, "failed to read terminal event"),
        }
    }
    Ok(())
}

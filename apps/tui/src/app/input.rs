use crossterm::event::KeyCode;
use parajes_core::popup::StatusAction;
use parajes_core::{Backend, DashboardSession, Selector, Status, View};
use tracing::debug;

use crate::app::helpers::{wrap_decrement, wrap_increment};
use crate::app::state::{App, Focus};
use crate::view::TerminalView;

pub type Session<B> = DashboardSession<B, TerminalView>;

/// Routes one key press. Screen borrows end before any session call, since
/// the session writes back into the same screen.
pub async fn handle_input<B: Backend>(app: &mut App, session: &Session<B>, key: KeyCode) {
    session.view().screen_mut().alert = None;

    if handle_help_toggle(app, key) {
        return;
    }

    let popup_open = session.view().screen().popup_open;
    if popup_open {
        handle_popup_input(app, session, key).await;
        return;
    }

    match key {
        KeyCode::Char('q') => app.running = false,
        KeyCode::Tab => app.focus = app.focus.next(),
        KeyCode::BackTab => app.focus = app.focus.previous(),
        KeyCode::Char('r') => {
            app.status_message = "Recargando...".to_string();
            session.on_region_changed().await;
            app.status_message = format!("Recargado: {}", session.current_region());
        }
        _ => match app.focus.selector() {
            Some(selector) => handle_selector_input(app, session, selector, key).await,
            None => handle_map_input(app, session, key),
        },
    }
}

fn handle_help_toggle(app: &mut App, key: KeyCode) -> bool {
    if key == KeyCode::F(1) || (key == KeyCode::Char('?') && !app.show_help) {
        app.show_help = !app.show_help;
        return true;
    }

    if app.show_help {
        if matches!(key, KeyCode::Esc | KeyCode::Char('?')) {
            app.show_help = false;
        }
        return true;
    }

    false
}

async fn handle_selector_input<B: Backend>(
    app: &mut App,
    session: &Session<B>,
    selector: Selector,
    key: KeyCode,
) {
    let len = session.view().screen().selector(selector).options.len();
    let cursor = app.cursor(selector);

    match key {
        KeyCode::Up => *app.cursor_mut(selector) = wrap_decrement(cursor, len),
        KeyCode::Down => *app.cursor_mut(selector) = wrap_increment(cursor, len),
        KeyCode::Home => *app.cursor_mut(selector) = 0,
        KeyCode::End => *app.cursor_mut(selector) = len.saturating_sub(1),
        KeyCode::Enter if cursor < len => commit_selection(app, session, selector).await,
        _ => {}
    }
}

/// Makes the highlighted option the selector's value and fires the same
/// change handler a browser `change` event would.
async fn commit_selection<B: Backend>(app: &mut App, session: &Session<B>, selector: Selector) {
    session.view().select_index(selector, app.cursor(selector));
    app.feature_cursor = 0;

    match selector {
        Selector::Region => {
            session.on_region_changed().await;
            app.status_message = format!("Departamento: {}", session.current_region());
        }
        Selector::Layer => {
            session.on_layer_changed().await;
            app.status_message = format!(
                "Capa: {}",
                session.current_layer().unwrap_or_default()
            );
        }
    }
}

fn handle_map_input<B: Backend>(app: &mut App, session: &Session<B>, key: KeyCode) {
    let mut screen = session.view().screen_mut();
    let len = screen
        .active_layer()
        .map_or(0, |layer| layer.features.len());

    match key {
        KeyCode::Left | KeyCode::Up => {
            app.feature_cursor = wrap_decrement(app.feature_cursor, len);
        }
        KeyCode::Right | KeyCode::Down => {
            app.feature_cursor = wrap_increment(app.feature_cursor, len);
        }
        KeyCode::Enter if app.feature_cursor < len => screen.popup_open = true,
        _ => {}
    }
}

async fn handle_popup_input<B: Backend>(app: &mut App, session: &Session<B>, key: KeyCode) {
    match key {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => session.view().close_popup(),
        KeyCode::Char(digit @ '1'..='3') => {
            let Some(status) = digit
                .to_digit(10)
                .and_then(|code| Status::from_code(i64::from(code)))
            else {
                return;
            };

            let Some(action) = review_action(session, app.feature_cursor, status) else {
                app.status_message = "Esta capa no admite revisión".to_string();
                return;
            };

            debug!(status = %action.status, "status key pressed");
            session.set_status(action.feature_id, action.status).await;
            let closed = !session.view().screen().popup_open;
            if closed {
                app.status_message = format!("Estado actualizado: {}", status.label());
            }
        }
        _ => {}
    }
}

/// The popup action for `status` on the highlighted feature, if its popup
/// offers review actions at all.
fn review_action<B: Backend>(
    session: &Session<B>,
    index: usize,
    status: Status,
) -> Option<StatusAction> {
    let screen = session.view().screen();
    let review = screen.feature(index)?.popup.review.as_ref()?;
    review
        .actions
        .iter()
        .find(|action| action.status == status)
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{census_backend, session};
    use parajes_core::{ChartSlot, FeatureId};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    async fn press<B: Backend>(app: &mut App, session: &Session<B>, keys: &[KeyCode]) {
        for key in keys {
            handle_input(app, session, *key).await;
        }
    }

    #[tokio::test]
    async fn committing_a_region_reloads_layer_and_kpis() {
        let session = session(census_backend());
        session.bootstrap().await;
        let mut app = App::new();

        press(&mut app, &session, &[KeyCode::Down, KeyCode::Enter]).await;

        assert_eq!(session.current_region().as_str(), "San Fernando");
        let backend = session.backend();
        assert_eq!(
            backend.requests_to("/api/pjes_censal_2022?depto=San%20Fernando"),
            1
        );
        assert_eq!(backend.requests_to("/api/kpis?depto=San%20Fernando"), 2);
        assert_eq!(app.status_message, "Departamento: San Fernando");
    }

    #[tokio::test]
    async fn moving_the_cursor_alone_fetches_nothing() {
        let session = session(census_backend());
        session.bootstrap().await;
        let before = session.backend().requests.borrow().len();
        let mut app = App::new();

        press(&mut app, &session, &[KeyCode::Down, KeyCode::Down, KeyCode::Up]).await;

        assert_eq!(app.region_cursor, 1);
        assert_eq!(session.backend().requests.borrow().len(), before);
        assert_eq!(session.current_region().as_str(), "todos");
    }

    #[tokio::test]
    async fn status_keys_post_and_repaint_the_feature() {
        let session = session(census_backend());
        session.bootstrap().await;
        let mut app = App::new();
        app.focus = Focus::Map;

        press(
            &mut app,
            &session,
            &[KeyCode::Right, KeyCode::Enter, KeyCode::Char('3')],
        )
        .await;

        assert_eq!(
            session.backend().posted(),
            vec![json!({ "id": 42, "estado": 3 })]
        );
        let screen = session.view().screen();
        assert!(!screen.popup_open);
        let edited = screen.feature(1).unwrap();
        assert_eq!(edited.feature.id(), Some(FeatureId::from(42)));
        assert_eq!(edited.style.primary_color(), Status::DoesNotCorrespond.color());
        assert_eq!(
            screen.feature(0).unwrap().style.primary_color(),
            Status::NotReviewed.color()
        );
        assert!(screen.charts.contains_key(&ChartSlot::Status));
    }

    #[tokio::test]
    async fn plain_layers_offer_no_review() {
        let session = session(census_backend());
        session.bootstrap().await;
        let mut app = App::new();

        app.focus = Focus::Layers;
        press(&mut app, &session, &[KeyCode::Down, KeyCode::Enter]).await;
        assert_eq!(session.overlay_ids(), vec!["dpto_chaco".to_string()]);

        app.focus = Focus::Map;
        press(&mut app, &session, &[KeyCode::Enter, KeyCode::Char('1')]).await;

        assert!(session.backend().posted().is_empty());
        assert_eq!(app.status_message, "Esta capa no admite revisión");
        assert!(session.view().screen().popup_open);

        press(&mut app, &session, &[KeyCode::Esc]).await;
        assert!(!session.view().screen().popup_open);
    }

    #[tokio::test]
    async fn failed_update_keeps_the_popup_and_shows_the_alert() {
        let backend = census_backend();
        backend.reply("/api/estado", 500, &json!({ "detail": "boom" }));
        let session = session(backend);
        session.bootstrap().await;
        let mut app = App::new();
        app.focus = Focus::Map;

        press(&mut app, &session, &[KeyCode::Enter, KeyCode::Char('1')]).await;

        let screen = session.view().screen();
        assert!(screen.popup_open);
        assert_eq!(
            screen.alert.as_deref(),
            Some(parajes_core::session::UPDATE_FAILED_ALERT)
        );
    }

    #[tokio::test]
    async fn quit_and_focus_keys() {
        let session = session(census_backend());
        let mut app = App::new();

        press(&mut app, &session, &[KeyCode::Tab, KeyCode::Tab]).await;
        assert_eq!(app.focus, Focus::Map);
        press(&mut app, &session, &[KeyCode::BackTab]).await;
        assert_eq!(app.focus, Focus::Layers);

        press(&mut app, &session, &[KeyCode::F(1), KeyCode::Char('q')]).await;
        assert!(app.running);
        press(&mut app, &session, &[KeyCode::Esc, KeyCode::Char('q')]).await;
        assert!(!app.running);
    }
}

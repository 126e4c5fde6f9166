pub(crate) use super::*;
pub(crate) use crate::tui::test_utils::{
    make_loaded_app, render_dashboard_to_buffer, sample_widgets, MemoryClipboard, StubApi,
};
pub(crate) use dashboard_api::{Position, Widget};


/// Editable app with the sample widgets, already in edit mode and rendered
/// once at 80x24 so mouse cells map onto the board.
pub(crate) fn editing_app() -> (App, Arc<StubApi>) {
    let (mut app, api, _) = make_loaded_app(ViewMode::Editable, sample_widgets());
    app.dispatch(Action::ToggleEdit);
    assert!(app.view.is_editing());
    app.status_message = None;
    render_dashboard_to_buffer(&mut app, 80, 24);
    (app, api)
}

/// Polls the loader channel until `done` holds or about a second passes.
pub(crate) async fn drain_until(app: &mut App, done: impl Fn(&App) -> bool) {
    for _ in 0..100 {
        app.drain_messages();
        if done(app) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("loader did not deliver in time");
}

//! Background fetch and save tasks for a view.
//!
//! Each request runs on its own tokio task and reports through the view
//! channel. Nothing is retried and nothing is cancelled; late results are
//! filtered by the view's generation check.

use std::sync::Arc;

use dashboard_api::DashboardApi;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::{LoadTicket, SaveRequest, ViewMessage};

/// Starts the metadata and widget fetches for `ticket`.
///
/// The two requests are independent and may complete in either order.
/// Failures are reported through the channel and logged by the view.
pub fn spawn_load(
    api: Arc<dyn DashboardApi>,
    username: &str,
    ticket: LoadTicket,
    tx: mpsc::Sender<ViewMessage>,
) -> [JoinHandle<()>; 2] {
    let dashboards = {
        let api = Arc::clone(&api);
        let tx = tx.clone();
        let ticket = ticket.clone();
        let username = username.to_string();
        tokio::spawn(async move {
            let result = api.list_dashboards(&username).await;
            let _ = tx.send(ViewMessage::Dashboards(ticket, result)).await;
        })
    };

    let widgets = tokio::spawn(async move {
        let result = api.fetch_widgets(ticket.dashboard_id()).await;
        let _ = tx.send(ViewMessage::Widgets(ticket, result)).await;
    });

    [dashboards, widgets]
}

/// Posts `request` to the backend and reports the outcome as
/// [`ViewMessage::Saved`].
pub fn spawn_save(
    api: Arc<dyn DashboardApi>,
    request: SaveRequest,
    tx: mpsc::Sender<ViewMessage>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let result = api
            .update_widgets(&request.dashboard_id, &request.widgets)
            .await;
        let _ = tx.send(ViewMessage::Saved(result)).await;
    })
}

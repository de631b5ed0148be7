//! Concurrent fetch-and-merge of a location's menu and store information.

use std::future::Future;

use tokio::task::JoinError;

use crate::model::{Menu, ProviderInfo};
use crate::ports::PortError;

/// Run the menu pipeline and the location pipeline as two independent tasks,
/// wait for both, and attach the store information to the menu.
///
/// Both tasks are always joined before any result is inspected. The menu
/// pipeline's error wins when both fail.
///
/// # Errors
///
/// Returns the first [`PortError`] produced by either pipeline, or
/// [`PortError::Internal`] when a task panicked.
pub async fn join_menu_with_info<M, I>(menu: M, info: I) -> Result<Menu, PortError>
where
    M: Future<Output = Result<Menu, PortError>> + Send + 'static,
    I: Future<Output = Result<ProviderInfo, PortError>> + Send + 'static,
{
    let menu_task = tokio::spawn(menu);
    let info_task = tokio::spawn(info);

    let (menu_res, info_res) = tokio::join!(menu_task, info_task);

    let mut menu = menu_res.map_err(join_failed)??;
    let provider_info = info_res.map_err(join_failed)??;

    menu.provider_info = Some(provider_info);
    Ok(menu)
}

fn join_failed(err: JoinError) -> PortError {
    PortError::Internal(format!("pipeline task failed: {err}"))
}

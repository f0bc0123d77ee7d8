pub mod app;
pub mod config;
pub mod domain;
pub mod http;
pub mod infra;

use crate::app::notifications::NoticeBoard;
use crate::app::session::Session;
use crate::app::store::JobStore;

#[derive(Clone)]
pub struct AppState {
    pub store: JobStore,
    pub session: Session,
    pub notices: NoticeBoard,
}

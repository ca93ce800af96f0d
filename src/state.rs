use std::sync::Arc;
use tokio::sync::mpsc;

use crate::application::services::LinkService;
use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::LinkRepository;

/// Shared handler state. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService<dyn LinkRepository>>,
    pub click_sender: mpsc::Sender<ClickEvent>,
}

impl AppState {
    pub fn new(
        link_repository: Arc<dyn LinkRepository>,
        click_sender: mpsc::Sender<ClickEvent>,
    ) -> Self {
        Self {
            link_service: Arc::new(LinkService::new(link_repository)),
            click_sender,
        }
    }
}

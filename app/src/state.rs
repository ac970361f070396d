// marina_project/app/src/state.rs
use crate::config::AppConfig;
use marina::{
  CatalogService, ConfirmationViewer, DocumentStore, FinalizeService, IdentityProvider,
  ProfileService, SessionService,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub store: Arc<dyn DocumentStore>,
  pub identity: Arc<dyn IdentityProvider>,
  pub config: Arc<AppConfig>, // Share loaded config
}

impl AppState {
  pub fn catalog(&self) -> CatalogService {
    CatalogService::new(self.store.clone())
  }

  pub fn sessions(&self) -> SessionService {
    SessionService::new(self.store.clone(), self.identity.clone())
  }

  pub fn profiles(&self) -> ProfileService {
    ProfileService::new(self.store.clone())
  }

  pub fn finalizer(&self) -> FinalizeService {
    FinalizeService::new(self.store.clone(), self.identity.clone())
  }

  pub fn confirmations(&self) -> ConfirmationViewer {
    ConfirmationViewer::new(self.store.clone())
  }
}

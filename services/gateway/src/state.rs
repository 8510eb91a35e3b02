use crate::auth::TokenVerifier;
use alerting::AlertService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub alerts: AlertService,
    pub tokens: Arc<TokenVerifier>,
}

impl AppState {
    pub fn new(alerts: AlertService, tokens: TokenVerifier) -> Self {
        Self {
            alerts,
            tokens: Arc::new(tokens),
        }
    }
}

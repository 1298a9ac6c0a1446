use std::sync::Arc;

use crate::config::AppConfig;
use crate::facade::Facade;

/// Shared per-process context, built once at startup and handed to every
/// handler by reference. No ambient globals.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub facade: Arc<Facade>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let facade = Arc::new(Facade::new());

        if let Some(seed) = &config.seed_admin {
            facade
                .bootstrap_admin("Admin", "Account", &seed.email, &seed.password)
                .await
                .map_err(|e| anyhow::anyhow!("admin seed failed: {e}"))?;
        }

        Ok(Self { config, facade })
    }

    pub fn fake() -> Self {
        use crate::config::JwtConfig;

        let config = Arc::new(AppConfig {
            jwt: JwtConfig {
                secret: "test".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 5,
                refresh_ttl_minutes: 60,
            },
            seed_admin: None,
        });
        Self {
            config,
            facade: Arc::new(Facade::new()),
        }
    }
}

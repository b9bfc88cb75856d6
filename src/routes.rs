use crate::{
    api::payroll::payroll_routes, auth::middleware::auth_middleware, config::Config,
    payroll::store::PayrollStore,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use std::sync::Arc;

// Per-peer-IP limiter refilling `requests_per_min` tokens a minute.
fn build_limiter(requests_per_min: u32) -> anyhow::Result<Governor<PeerIpKeyExtractor, NoOpMiddleware>> {
    let per_ms = if requests_per_min == 0 {
        1
    } else {
        60_000 / requests_per_min as u64
    };
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms.max(1))
        .burst_size(requests_per_min.max(1))
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .ok_or_else(|| anyhow::anyhow!("invalid rate limit: {requests_per_min} per minute"))?;
    Ok(Governor::new(&cfg))
}

#[derive(Clone)]
pub struct Limiters {
    protected: Arc<Governor<PeerIpKeyExtractor, NoOpMiddleware>>,
}

impl Limiters {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            protected: Arc::new(build_limiter(config.rate_protected_per_min)?),
        })
    }
}

/// Protected routes: authentication, then rate limiting, then the payroll scope.
pub fn configure<S: PayrollStore + 'static>(
    cfg: &mut web::ServiceConfig,
    config: &Config,
    limiters: &Limiters,
) {
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(limiters.protected.clone()) // rate limiting
            .service(web::scope("/payroll").configure(payroll_routes::<S>)),
    );
}

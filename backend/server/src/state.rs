use std::sync::Arc;

use super::{
    config::Config,
    upstream::{AppsScript, Upstream},
};

pub struct State {
    pub config: Config,
    pub upstream: Option<Arc<dyn Upstream>>,
}

impl State {
    pub fn new() -> Arc<Self> {
        let config = Config::load();

        let upstream = config
            .upstream_url
            .as_deref()
            .map(|url| Arc::new(AppsScript::new(url)) as Arc<dyn Upstream>);

        Self::with_upstream(config, upstream)
    }

    pub fn with_upstream(config: Config, upstream: Option<Arc<dyn Upstream>>) -> Arc<Self> {
        Arc::new(Self { config, upstream })
    }
}

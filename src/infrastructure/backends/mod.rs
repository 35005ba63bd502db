pub mod audience_builder;

use std::sync::Arc;

use anyhow::bail;
use anyhow::Result;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::BackendArc;

pub struct BackendManager {}

impl BackendManager {
    pub fn get() -> Result<BackendArc> {
        let url = Config::get(ConfigKey::ApiURL);
        if url.is_empty() {
            bail!(format!("{} is not defined", ConfigKey::ApiURL));
        }

        let backend = audience_builder::AudienceBuilder::new(&url, Config::request_timeout())?;
        return Ok(Arc::new(backend));
    }
}

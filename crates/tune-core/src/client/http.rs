use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::{debug, trace};
use tune_model::{CheckUpdateRequest, CheckUpdateResponse, ConfigResponse};
use uuid::Uuid;

use super::ControllerClient;
use crate::{
    config::{ProbeMethod, SyncConfig},
    error::{CoreError, SyncError},
};

/// reqwest-backed controller client.
///
/// Probe and config traffic use separate connection pools with their own timeouts,
/// so a slow config endpoint cannot delay the health probe.
#[derive(Debug, Clone)]
pub struct HttpControllerClient {
    api: Client,
    health: Client,
    check_url: Url,
    configs_url: Url,
    probe_url: Url,
    probe_method: ProbeMethod,
    instance_id: Uuid,
}

impl HttpControllerClient {
    pub fn new(cfg: &SyncConfig) -> Result<Self, CoreError> {
        let base = cfg.base_url()?;
        let instance_id = Uuid::new_v4();

        let api = Client::builder()
            .connect_timeout(cfg.connect_timeout())
            .timeout(cfg.read_timeout())
            .build()
            .map_err(|e| CoreError::Config(format!("failed to build http client: {e}")))?;
        let health = Client::builder()
            .connect_timeout(cfg.healthcheck_timeout())
            .timeout(cfg.healthcheck_timeout())
            .build()
            .map_err(|e| CoreError::Config(format!("failed to build probe client: {e}")))?;

        let mut probe_url = endpoint(&base, cfg.healthcheck_path.split('/'))?;
        if cfg.identify_instance {
            probe_url
                .query_pairs_mut()
                .append_pair("systemName", &cfg.system_name)
                .append_pair("instanceId", &instance_id.to_string());
        }

        Ok(Self {
            api,
            health,
            check_url: endpoint(&base, ["api", "configs", "checkUpdate"])?,
            configs_url: endpoint(&base, ["api", "configs"])?,
            probe_url,
            probe_method: cfg.healthcheck_method,
            instance_id,
        })
    }

    /// Identifier of this process, sent with the probe when `identify_instance` is set.
    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    pub fn probe_url(&self) -> &Url {
        &self.probe_url
    }

    fn config_url(&self, system_name: &str, version: &str) -> Url {
        let mut url = self.configs_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(system_name);
        }
        url.query_pairs_mut().append_pair("version", version);
        url
    }
}

/// Append non-empty `segments` to the path of `base`.
fn endpoint<'a>(base: &Url, segments: impl IntoIterator<Item = &'a str>) -> Result<Url, CoreError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| CoreError::Config(format!("controller url cannot be a base: {base}")))?
        .pop_if_empty()
        .extend(segments.into_iter().filter(|s| !s.is_empty()));
    Ok(url)
}

#[async_trait]
impl ControllerClient for HttpControllerClient {
    async fn probe(&self) -> Result<u16, SyncError> {
        let req = match self.probe_method {
            ProbeMethod::Get => self.health.get(self.probe_url.clone()),
            ProbeMethod::Post => self.health.post(self.probe_url.clone()),
        };
        let status = req.send().await?.status();
        trace!(url = %self.probe_url, status = status.as_u16(), "probe answered");
        Ok(status.as_u16())
    }

    async fn check_update(
        &self,
        request: &CheckUpdateRequest,
    ) -> Result<CheckUpdateResponse, SyncError> {
        debug!(url = %self.check_url, version = %request.version, "negotiating config version");
        let body = self
            .api
            .post(self.check_url.clone())
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(SyncError::Protocol("empty checkUpdate response".into()));
        }
        serde_json::from_slice(&body)
            .map_err(|e| SyncError::Protocol(format!("malformed checkUpdate response: {e}")))
    }

    async fn fetch_config(
        &self,
        system_name: &str,
        version: &str,
    ) -> Result<Option<ConfigResponse>, SyncError> {
        let url = self.config_url(system_name, version);
        debug!(%url, "fetching config");
        let body = self
            .api
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        serde_json::from_slice::<Option<ConfigResponse>>(&body)
            .map_err(|e| SyncError::Protocol(format!("malformed config response: {e}")))
    }
}

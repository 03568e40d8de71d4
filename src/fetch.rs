use std::time::Duration;

use ureq::Agent;
use ureq::http::Response;

use crate::error::HarvestError;

/// One agent is shared by every request of a run. Status codes are returned
/// to the caller instead of being turned into errors.
pub fn build_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

pub fn get(agent: &Agent, url: &str) -> Result<Response<ureq::Body>, HarvestError> {
    Ok(agent.get(url).call()?)
}

/// Fetches a page body, or `None` when the server answers with anything but 200.
pub fn fetch_page(agent: &Agent, url: &str) -> Result<Option<String>, HarvestError> {
    let mut response = get(agent, url)?;
    let status = response.status().as_u16();
    if status != 200 {
        tracing::warn!(url, status, "failed to access URL");
        return Ok(None);
    }

    let body = response.body_mut().read_to_string()?;
    Ok(Some(body))
}

pub fn content_type(response: &Response<ureq::Body>) -> Option<String> {
    response
        .headers()
        .get("content-type")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

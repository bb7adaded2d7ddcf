use std::time::Duration;

use crate::error::PlayerError;

use super::manifest::Manifest;

/// Fetch and parse the remote manifest.
///
/// Network and parse failures both surface as `SourceUnavailable`; the
/// caller falls through to the next library source.
pub(super) fn fetch_manifest(url: &str) -> Result<Manifest, PlayerError> {
    let agent = ureq::AgentBuilder::new()
        .timeout_connect(Duration::from_secs(5))
        .timeout_read(Duration::from_secs(15))
        .build();

    let body = agent
        .get(url)
        .call()
        .map_err(|e| PlayerError::SourceUnavailable(format!("{url}: {e}")))?
        .into_string()
        .map_err(|e| PlayerError::SourceUnavailable(format!("{url}: {e}")))?;

    Manifest::parse(&body)
        .map_err(|e| PlayerError::SourceUnavailable(format!("{url}: bad manifest: {e}")))
}

//! Disk-cached loading of the bootstrap document.

use std::path::Path;

use tracing::{debug, warn};

use crate::core::{try_read_to_string, write_string};
use crate::fpl::service::DataService;
use crate::fpl::types::GeneralInformation;
use crate::Result;

/// Try the cache file first. If it is missing, unreadable, or `refresh` is
/// set, fetch `bootstrap-static/` and rewrite the cache.
///
/// Cache write failures are logged and otherwise ignored.
pub async fn load_or_fetch_general_information<D: DataService + ?Sized>(
    service: &D,
    cache_path: Option<&Path>,
    refresh: bool,
) -> Result<GeneralInformation> {
    if let (Some(path), false) = (cache_path, refresh) {
        if let Some(s) = try_read_to_string(path) {
            match serde_json::from_str::<GeneralInformation>(&s) {
                Ok(info) => {
                    debug!(path = %path.display(), "bootstrap loaded from cache");
                    return Ok(info);
                }
                Err(e) => warn!(path = %path.display(), error = %e, "ignoring corrupt bootstrap cache"),
            }
        }
    }

    let info = service.general_information().await?;

    if let Some(path) = cache_path {
        match serde_json::to_string(&info) {
            Ok(json) => {
                if let Err(e) = write_string(path, &json) {
                    warn!(path = %path.display(), error = %e, "could not write bootstrap cache");
                }
            }
            Err(e) => warn!(error = %e, "could not serialise bootstrap cache"),
        }
    }

    Ok(info)
}

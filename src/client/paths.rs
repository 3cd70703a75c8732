use super::{ensure_key, MogileClient};
use crate::config::GetPathsOptions;
use crate::constants::MAX_PATH_SCAN;
use crate::error::Result;
use crate::tracker::{Command, Request, Values};

impl MogileClient {
    /// Returns the storage URLs holding `key`, best first.
    ///
    /// An empty list means the tracker knows no copy of the key; it is not an
    /// error.
    pub async fn get_paths(&self, key: &str, options: GetPathsOptions) -> Result<Vec<String>> {
        ensure_key(key)?;

        let request = Request::new(Command::GetPaths)
            .arg("domain", self.domain())
            .arg("key", key)
            .arg("pathcount", options.effective_path_count().to_string())
            .arg("noverify", if options.no_verify { "1" } else { "0" });

        let values = self.request(request).await?;
        Ok(extract_paths(&values))
    }
}

/// Collects `path1`, `path2`, ... from a `get_paths` reply.
///
/// Stops at the first missing or empty entry, or after [`MAX_PATH_SCAN`].
pub fn extract_paths(values: &Values) -> Vec<String> {
    (1..=MAX_PATH_SCAN)
        .map(|i| values.get_nonempty(&format!("path{}", i)))
        .take_while(Option::is_some)
        .flatten()
        .map(String::from)
        .collect()
}

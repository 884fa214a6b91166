//! Process environment as an [`EnvSource`].

use crate::domain::EnvSource;

/// Reads from `std::env`. Values that are not valid UTF-8 count as unset.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Loads a `.env` file from the working directory or its parents, if any.
///
/// Existing process variables win over file entries.
pub fn load_dotenv() -> Option<std::path::PathBuf> {
    dotenvy::dotenv().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_process_environment() {
        assert_eq!(
            ProcessEnv.var("CARGO_MANIFEST_DIR").as_deref(),
            Some(env!("CARGO_MANIFEST_DIR"))
        );
        assert_eq!(ProcessEnv.var("DATALAB_SURELY_UNSET_VARIABLE"), None);
    }
}

//! Campaign configuration loading
//!
//! Flat JSON file with documented defaults; a missing file means defaults,
//! a malformed file is an error.

use std::path::Path;

use crate::error::{CampaignError, CampaignResult};
use shared::CampaignConfig;

/// Load configuration, falling back to defaults when the file is absent.
pub fn load(path: &Path) -> CampaignResult<CampaignConfig> {
    if !path.exists() {
        tracing::warn!(
            "⚠️ No config at {}, using defaults",
            path.display()
        );
        return Ok(CampaignConfig::default());
    }

    let raw = std::fs::read_to_string(path)?;
    let config: CampaignConfig = serde_json::from_str(&raw)?;
    validate(&config)?;
    Ok(config)
}

/// Write a configuration file (pretty-printed, stable for hand editing).
pub fn save(path: &Path, config: &CampaignConfig) -> CampaignResult<()> {
    let raw = serde_json::to_string_pretty(config)?;
    std::fs::write(path, raw)?;
    Ok(())
}

fn validate(config: &CampaignConfig) -> CampaignResult<()> {
    if config.sources.is_empty() {
        return Err(CampaignError::ConfigurationError {
            field: "sources".to_string(),
        });
    }
    if config.targets.replies_per_day == 0 {
        return Err(CampaignError::ConfigurationError {
            field: "targets.replies_per_day".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{CampaignMode, EngagementStyle};

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config, CampaignConfig::default());
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("campaign_config.json");

        let mut config = CampaignConfig::default();
        config.style = EngagementStyle::DevilsAdvocate;
        config.mode = CampaignMode::ViralHunting {
            min_score: 80,
            top_k: 3,
        };
        save(&path, &config).unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("campaign_config.json");
        std::fs::write(
            &path,
            r#"{"targets": {"replies_per_day": 200}, "style": "hot_take"}"#,
        )
        .unwrap();

        let config = load(&path).unwrap();
        assert_eq!(config.targets.replies_per_day, 200);
        assert_eq!(config.targets.rest_secs, 3);
        assert_eq!(config.style, EngagementStyle::HotTake);
        // Empty sources from the partial file fail validation, so defaults
        // must have been applied instead
        assert!(!config.sources.is_empty());
    }

    #[test]
    fn test_zero_quota_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("campaign_config.json");
        std::fs::write(&path, r#"{"targets": {"replies_per_day": 0}}"#).unwrap();
        assert!(load(&path).is_err());
    }

    #[test]
    fn test_explicit_empty_sources_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("campaign_config.json");
        std::fs::write(&path, r#"{"sources": []}"#).unwrap();
        assert!(load(&path).is_err());
    }
}

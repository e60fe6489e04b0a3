use aws_config::meta::region::RegionProviderChain;
use aws_config::{BehaviorVersion, Region, SdkConfig};

use crate::{Result, SsmPickerError};

/// Per-invocation settings, resolved once at startup and passed by
/// reference to every component.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub profile: Option<String>,
    pub region: String,
    pub debug: bool,
}

pub async fn load_sdk_config(profile: Option<&str>, region: Option<&str>) -> SdkConfig {
    // AWS configuration chain (in order of precedence):
    // 1. CLI arguments (--profile, --region)
    // 2. Environment variables (AWS_PROFILE, AWS_REGION)
    // 3. AWS credentials file (~/.aws/credentials)
    // 4. AWS config file (~/.aws/config)
    // 5. Instance metadata (if running on EC2)

    let mut loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(region) = region {
        let provider =
            RegionProviderChain::first_try(Region::new(region.to_string())).or_default_provider();
        loader = loader.region(provider);
    }

    if let Some(profile) = profile {
        loader = loader.profile_name(profile);
    }

    loader.load().await
}

impl AppContext {
    /// Pin down the region the SDK actually resolved; without one no
    /// API call can be signed and the session endpoint cannot be built.
    pub fn resolve(profile: Option<String>, debug: bool, config: &SdkConfig) -> Result<Self> {
        let region = config
            .region()
            .map(|r| r.to_string())
            .ok_or(SsmPickerError::NoRegion)?;

        Ok(Self {
            profile,
            region,
            debug,
        })
    }
}

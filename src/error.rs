use thiserror::Error;

pub type Result<T> = std::result::Result<T, SsmPickerError>;

#[derive(Error, Debug)]
pub enum SsmPickerError {
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    #[error("No AWS region configured. Pass --region or set one in your AWS config.")]
    NoRegion,

    #[error("AWS credentials not found or invalid: {0}")]
    Credentials(String),

    #[error("AWS API error: {0}")]
    Api(String),

    #[error("No instances managed by SSM found in this account and region")]
    NoManagedInstances,

    #[error("Input error: {0}")]
    Input(String),

    #[error("session-manager-plugin not found. Install from: https://docs.aws.amazon.com/systems-manager/latest/userguide/session-manager-working-with-install-plugin.html")]
    PluginNotFound,

    #[error("Failed to launch session-manager-plugin: {0}")]
    PluginLaunch(String),
}

impl SsmPickerError {
    /// Process exit code reported for this failure kind. Success is 0;
    /// every fatal kind gets its own code so callers can tell them apart.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ProfileNotFound(_) => 2,
            Self::NoRegion => 3,
            Self::Credentials(_) => 4,
            Self::Api(_) => 5,
            Self::NoManagedInstances => 6,
            Self::Input(_) => 7,
            Self::PluginNotFound => 8,
            Self::PluginLaunch(_) => 9,
        }
    }
}

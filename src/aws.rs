use aws_config::SdkConfig;
use aws_sdk_ec2::Client as Ec2Client;
use aws_sdk_ssm::Client as SsmClient;
use aws_sdk_sts::Client as StsClient;

use crate::output::print_debug;
use crate::{Result, SsmPickerError};

/// AWS client wrapper holding all service clients.
pub struct AwsClients {
    pub ec2: Ec2Client,
    pub ssm: SsmClient,
    sts: StsClient,
}

impl AwsClients {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            ec2: Ec2Client::new(config),
            ssm: SsmClient::new(config),
            sts: StsClient::new(config),
        }
    }

    /// Verify the resolved credentials before any real call. A bad
    /// `--profile` only surfaces here, at first use of the chain.
    pub async fn verify_credentials(&self, profile: Option<&str>, debug: bool) -> Result<()> {
        print_debug("Validating AWS credentials with sts:GetCallerIdentity", debug);

        match self.sts.get_caller_identity().send().await {
            Ok(_) => {
                print_debug("AWS authentication successful", debug);
                Ok(())
            }
            Err(err) => {
                let detail = aws_sdk_sts::error::DisplayErrorContext(err).to_string();
                match profile {
                    Some(profile) => Err(SsmPickerError::ProfileNotFound(format!(
                        "{profile} ({detail})"
                    ))),
                    None => Err(SsmPickerError::Credentials(detail)),
                }
            }
        }
    }
}

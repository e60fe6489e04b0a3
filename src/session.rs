//! Session launch: StartSession plus the session-manager-plugin handoff.

use std::io::ErrorKind;

use aws_sdk_ssm::operation::start_session::StartSessionOutput;
use serde::Serialize;
use tokio::process::Command;
use url::Url;

use crate::config::AppContext;
use crate::output::{print_debug, print_info};
use crate::{Result, SsmPickerError};

/// The executable installed by the AWS Session Manager plugin package.
pub const PLUGIN_BIN: &str = "session-manager-plugin";

/// Wire form of the StartSession response the plugin expects as its
/// first argument.
#[derive(Debug, Serialize)]
pub struct SessionDescriptor {
    #[serde(rename = "SessionId")]
    session_id: String,
    #[serde(rename = "TokenValue")]
    token_value: String,
    #[serde(rename = "StreamUrl")]
    stream_url: String,
}

#[derive(Debug, Serialize)]
struct TargetDescriptor {
    #[serde(rename = "Target")]
    target: String,
}

impl SessionDescriptor {
    /// All three fields are mandatory for the plugin; a partial
    /// response is treated as an API failure.
    pub fn from_output(output: StartSessionOutput) -> Result<Self> {
        match (output.session_id, output.token_value, output.stream_url) {
            (Some(session_id), Some(token_value), Some(stream_url)) => Ok(Self {
                session_id,
                token_value,
                stream_url,
            }),
            _ => Err(SsmPickerError::Api(
                "incomplete session response from AWS SSM".to_string(),
            )),
        }
    }
}

/// Regional SSM endpoint handed to the plugin as its last argument.
pub fn session_endpoint(region: &str) -> Result<Url> {
    Url::parse(&format!("https://ssm.{region}.amazonaws.com"))
        .map_err(|err| SsmPickerError::Api(format!("invalid SSM endpoint for {region}: {err}")))
}

/// The plugin's fixed positional argument contract:
/// session descriptor JSON, region, "StartSession", profile or empty
/// string, target descriptor JSON, endpoint URL.
pub fn plugin_args(
    session: &SessionDescriptor,
    region: &str,
    profile: Option<&str>,
    instance_id: &str,
    endpoint: &Url,
) -> Result<[String; 6]> {
    let target = TargetDescriptor {
        target: instance_id.to_string(),
    };
    let session_json = serde_json::to_string(session)
        .map_err(|err| SsmPickerError::Api(format!("serializing session descriptor: {err}")))?;
    let target_json = serde_json::to_string(&target)
        .map_err(|err| SsmPickerError::Api(format!("serializing target descriptor: {err}")))?;

    Ok([
        session_json,
        region.to_string(),
        "StartSession".to_string(),
        profile.unwrap_or_default().to_string(),
        target_json,
        endpoint.as_str().to_string(),
    ])
}

/// Start an SSM session on the chosen instance and hand the terminal
/// over to `session-manager-plugin` until it exits.
pub async fn connect(ssm: &aws_sdk_ssm::Client, ctx: &AppContext, instance_id: &str) -> Result<()> {
    print_info(&format!("Connecting to {instance_id}"));
    print_debug("Running ssm:StartSession", ctx.debug);

    let output = ssm
        .start_session()
        .target(instance_id)
        .send()
        .await
        .map_err(|err| {
            SsmPickerError::Api(format!(
                "StartSession: {}",
                aws_sdk_ssm::error::DisplayErrorContext(err)
            ))
        })?;

    let session = SessionDescriptor::from_output(output)?;
    let endpoint = session_endpoint(&ctx.region)?;
    let args = plugin_args(
        &session,
        &ctx.region,
        ctx.profile.as_deref(),
        instance_id,
        &endpoint,
    )?;

    run_plugin(PLUGIN_BIN, &args, ctx.debug).await
}

/// Spawn the plugin with inherited stdio and wait for it. Ctrl-C is
/// swallowed in this process for the whole window so the interrupt
/// lands in the plugin's session instead of tearing down the wrapper.
async fn run_plugin(program: &str, args: &[String; 6], debug: bool) -> Result<()> {
    print_debug(&format!("Launching {program}"), debug);

    let mut child = Command::new(program)
        .args(args.iter())
        .spawn()
        .map_err(|err| match err.kind() {
            ErrorKind::NotFound => SsmPickerError::PluginNotFound,
            _ => SsmPickerError::PluginLaunch(err.to_string()),
        })?;

    let sigint_drain = tokio::spawn(async {
        loop {
            let _ = tokio::signal::ctrl_c().await;
        }
    });

    let waited = child
        .wait()
        .await
        .map_err(|err| SsmPickerError::PluginLaunch(err.to_string()));

    sigint_drain.abort();

    // The plugin's own exit code is not ours to interpret.
    let status = waited?;
    print_debug(&format!("{program} exited with {status}"), debug);
    Ok(())
}

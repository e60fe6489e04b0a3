use std::io;

use clap::Parser;

mod aws;
mod config;
mod error;
mod inventory;
mod output;
mod reconcile;
mod select;
mod session;

pub use error::{Result, SsmPickerError};

use aws::AwsClients;
use config::AppContext;
use output::{print_debug, print_error, print_info, print_success};

#[derive(Parser)]
#[command(name = "ssm-picker")]
#[command(about = "Pick a running EC2 instance and open a Session Manager session to it")]
#[command(version)]
struct Cli {
    /// AWS profile to use (defaults to the standard authentication chain)
    #[arg(short = 'p', long = "profile")]
    profile: Option<String>,

    /// AWS region to use (defaults to AWS_REGION env var or config file)
    #[arg(short = 'r', long = "region")]
    region: Option<String>,

    /// Print debug information
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        print_error(&err.to_string());
        std::process::exit(err.exit_code());
    }
}

async fn run(cli: Cli) -> Result<()> {
    if cli.profile.is_none() {
        print_info("No profile given, using standard authentication chain");
    }

    let sdk_config = config::load_sdk_config(cli.profile.as_deref(), cli.region.as_deref()).await;
    let ctx = AppContext::resolve(cli.profile, cli.debug, &sdk_config)?;

    print_debug(
        &format!("Profile: {}", ctx.profile.as_deref().unwrap_or("default")),
        ctx.debug,
    );
    print_debug(&format!("Region: {}", ctx.region), ctx.debug);

    let clients = AwsClients::new(&sdk_config);
    clients
        .verify_credentials(ctx.profile.as_deref(), ctx.debug)
        .await?;

    let instances = inventory::fetch_running_instances(&clients.ec2, ctx.debug).await?;
    let agents = inventory::fetch_agent_statuses(&clients.ssm, ctx.debug).await?;
    let merged = reconcile::merge_records(instances, agents)?;

    if !atty::is(atty::Stream::Stdin) {
        return Err(SsmPickerError::Input(
            "stdin is not a terminal, cannot prompt for a selection".to_string(),
        ));
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();
    let choice = select::prompt_selection(&mut input, &mut out, &merged)?;

    session::connect(&clients.ssm, &ctx, &merged[choice].id).await?;
    print_success("Session ended");
    Ok(())
}

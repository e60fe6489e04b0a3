//! Read-only inventory calls: running EC2 instances and SSM agent status.

use aws_sdk_ec2::types::{Filter, Instance};
use aws_sdk_ssm::types::InstanceInformation;

use crate::output::print_debug;
use crate::reconcile::InstanceRecord;
use crate::{Result, SsmPickerError};

const NAME_TAG: &str = "Name";

/// All running instances, in the order the API returns them.
pub async fn fetch_running_instances(
    ec2: &aws_sdk_ec2::Client,
    debug: bool,
) -> Result<Vec<InstanceRecord>> {
    print_debug("Running ec2:DescribeInstances (state = running)", debug);

    let state_filter = Filter::builder()
        .name("instance-state-name")
        .values("running")
        .build();

    let mut records = Vec::new();
    let mut pages = ec2
        .describe_instances()
        .filters(state_filter)
        .into_paginator()
        .send();

    while let Some(page) = pages.next().await {
        let page = page.map_err(|err| {
            SsmPickerError::Api(format!(
                "DescribeInstances: {}",
                aws_sdk_ec2::error::DisplayErrorContext(err)
            ))
        })?;

        for reservation in page.reservations() {
            records.extend(reservation.instances().iter().filter_map(instance_record));
        }
    }

    print_debug(&format!("Found {} running instances", records.len()), debug);
    Ok(records)
}

/// Agent liveness for every SSM-managed instance.
pub async fn fetch_agent_statuses(
    ssm: &aws_sdk_ssm::Client,
    debug: bool,
) -> Result<Vec<InstanceRecord>> {
    print_debug("Running ssm:DescribeInstanceInformation", debug);

    let mut records = Vec::new();
    let mut pages = ssm.describe_instance_information().into_paginator().send();

    while let Some(page) = pages.next().await {
        let page = page.map_err(|err| {
            SsmPickerError::Api(format!(
                "DescribeInstanceInformation: {}",
                aws_sdk_ssm::error::DisplayErrorContext(err)
            ))
        })?;

        records.extend(
            page.instance_information_list()
                .iter()
                .filter_map(agent_record),
        );
    }

    print_debug(&format!("Found {} managed instances", records.len()), debug);
    Ok(records)
}

/// Inventory half of a record. Instances without an id are skipped.
fn instance_record(instance: &Instance) -> Option<InstanceRecord> {
    let id = instance.instance_id()?.to_string();
    let name = instance
        .tags()
        .iter()
        .find(|tag| tag.key() == Some(NAME_TAG))
        .and_then(|tag| tag.value())
        .map(str::to_string);

    Some(InstanceRecord {
        id,
        name,
        agent_status: None,
    })
}

/// Agent-status half of a record.
fn agent_record(info: &InstanceInformation) -> Option<InstanceRecord> {
    let id = info.instance_id()?.to_string();
    let agent_status = info.ping_status().map(|status| status.as_str().to_string());

    Some(InstanceRecord {
        id,
        name: None,
        agent_status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_ec2::types::Tag;
    use aws_sdk_ssm::types::PingStatus;
    use pretty_assertions::assert_eq;

    #[test]
    fn instance_record_reads_name_tag() {
        let instance = Instance::builder()
            .instance_id("i-0123456789abcdef0")
            .tags(Tag::builder().key("Environment").value("prod").build())
            .tags(Tag::builder().key("Name").value("web-1").build())
            .build();

        let record = instance_record(&instance).unwrap();

        assert_eq!(record.id, "i-0123456789abcdef0");
        assert_eq!(record.name.as_deref(), Some("web-1"));
        assert_eq!(record.agent_status, None);
    }

    #[test]
    fn instance_record_without_name_tag() {
        let instance = Instance::builder()
            .instance_id("i-0123456789abcdef0")
            .tags(Tag::builder().key("Environment").value("prod").build())
            .build();

        let record = instance_record(&instance).unwrap();

        assert_eq!(record.name, None);
        assert_eq!(record.display_name(), "Unknown Name");
    }

    #[test]
    fn instance_record_skips_missing_id() {
        let instance = Instance::builder().build();
        assert_eq!(instance_record(&instance), None);
    }

    #[test]
    fn agent_record_reads_ping_status() {
        let info = InstanceInformation::builder()
            .instance_id("i-0123456789abcdef0")
            .ping_status(PingStatus::Online)
            .build();

        let record = agent_record(&info).unwrap();

        assert_eq!(record.id, "i-0123456789abcdef0");
        assert_eq!(record.agent_status.as_deref(), Some("Online"));
        assert_eq!(record.name, None);
    }

    #[test]
    fn agent_record_without_ping_status() {
        let info = InstanceInformation::builder()
            .instance_id("i-0123456789abcdef0")
            .build();

        let record = agent_record(&info).unwrap();

        assert_eq!(record.agent_status, None);
    }

    #[test]
    fn agent_record_skips_missing_id() {
        let info = InstanceInformation::builder()
            .ping_status(PingStatus::ConnectionLost)
            .build();

        assert_eq!(agent_record(&info), None);
    }
}

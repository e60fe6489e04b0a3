use std::io::{BufRead, Write};

use crate::reconcile::InstanceRecord;
use crate::{Result, SsmPickerError};

/// One printable list entry. A record with no agent status still shows
/// up, flagged so the user knows the session will likely fail.
pub fn render_line(index: usize, record: &InstanceRecord) -> String {
    let status = record
        .agent_status
        .as_deref()
        .unwrap_or("agent not installed?");

    format!(
        "[{}]: {} - {} ({})",
        index,
        record.display_name(),
        record.id,
        status
    )
}

/// Print the instance list and read a validated zero-based choice.
///
/// Re-prompts forever on non-numeric or out-of-range input; only EOF on
/// `input` aborts. Written against `BufRead`/`Write` so the loop can be
/// driven with scripted input.
pub fn prompt_selection<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    records: &[InstanceRecord],
) -> Result<usize> {
    if records.is_empty() {
        return Err(SsmPickerError::NoManagedInstances);
    }

    writeln!(out, "List of running instances:").map_err(io_error)?;
    for (index, record) in records.iter().enumerate() {
        writeln!(out, "{}", render_line(index, record)).map_err(io_error)?;
    }

    loop {
        write!(out, "Type the number of the instance you want to connect to: ")
            .map_err(io_error)?;
        out.flush().map_err(io_error)?;

        let mut line = String::new();
        let read = input.read_line(&mut line).map_err(io_error)?;
        if read == 0 {
            return Err(SsmPickerError::Input(
                "stdin closed before a selection was made".to_string(),
            ));
        }

        match line.trim().parse::<usize>() {
            Ok(choice) if choice < records.len() => return Ok(choice),
            _ => {
                writeln!(
                    out,
                    "The selection must be a number between 0 and {}",
                    records.len() - 1
                )
                .map_err(io_error)?;
            }
        }
    }
}

fn io_error(err: std::io::Error) -> SsmPickerError {
    SsmPickerError::Input(err.to_string())
}

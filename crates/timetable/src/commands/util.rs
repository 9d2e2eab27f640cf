//! Shared helpers for command handlers.

use std::io::IsTerminal;

use timetable_api::Schedule;

use crate::cli::ScheduleInput;
use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal there is nobody to ask, so the action is refused.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Read `--schedule` / `--schedule-file`, if either was given.
///
/// User input is parsed strictly: a malformed slot is an error here, unlike
/// data coming back from the API.
pub fn read_schedule(input: &ScheduleInput) -> Result<Option<Schedule>, CliError> {
    let raw = match (&input.schedule, &input.schedule_file) {
        (Some(json), _) => json.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)?,
        (None, None) => return Ok(None),
    };

    Schedule::parse_strict(&raw)
        .map(Some)
        .map_err(|e| CliError::Validation {
            field: "schedule".into(),
            reason: format!("invalid schedule JSON: {e}"),
        })
}

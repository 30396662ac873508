use std::process::Command;

use crate::error::HookError;

/// Substitute `{hash}` and `{prev_hash}` in an on-change command template
pub(crate) fn render_command(template: &str, hash: &str, prev_hash: &str) -> String {
    template
        .replace("{prev_hash}", prev_hash)
        .replace("{hash}", hash)
}

fn shell(command: &str) -> Command {
    if cfg!(windows) {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(command);
        cmd
    } else {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        cmd
    }
}

/// Run the on-change command through the shell, inheriting stdio
pub(crate) fn run_on_change(template: &str, hash: &str, prev_hash: &str) -> Result<(), HookError> {
    let command = render_command(template, hash, prev_hash);
    tracing::info!(command = %command, "running on-change command");

    let status = shell(&command)
        .status()
        .map_err(|source| HookError::Spawn {
            command: command.clone(),
            source,
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(HookError::Failed {
            command,
            status: status.to_string(),
        })
    }
}

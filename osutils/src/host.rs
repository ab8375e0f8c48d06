use anyhow::{Context, Error};

/// Environment variables that point to a graphical display server.
const DISPLAY_VARIABLES: [&str; 2] = ["DISPLAY", "WAYLAND_DISPLAY"];

/// Returns the hostname of the running system.
pub fn hostname() -> Result<String, Error> {
    Ok(hostname::get()
        .context("Failed to get hostname")?
        .to_string_lossy()
        .into_owned())
}

/// Returns whether a graphical display is reachable from this process.
pub fn has_graphical_display() -> bool {
    DISPLAY_VARIABLES
        .iter()
        .any(|var| std::env::var_os(var).is_some_and(|value| !value.is_empty()))
}

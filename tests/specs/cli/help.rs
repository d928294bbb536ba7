//! CLI help output specs

use crate::prelude::*;

#[test]
fn gw_help_lists_commands() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("Usage:")
        .stdout_has("watch")
        .stdout_has("status")
        .stdout_has("reset")
        .stdout_has("trigger");
}

#[test]
fn gw_version_prints_name() {
    cli().args(&["--version"]).passes().stdout_has("gw ");
}

#[test]
fn gw_watch_help_shows_options() {
    cli()
        .args(&["watch", "--help"])
        .passes()
        .stdout_has("--on-resume")
        .stdout_has("--interval")
        .stdout_has("--unknown");
}

#[test]
fn gw_without_command_is_usage_error() {
    cli().exits_with(2).stderr_has("Usage:");
}

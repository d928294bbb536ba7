mod config;
mod help;
mod status;
mod watch;

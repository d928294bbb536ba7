// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Watch command: drive one job to completion from the terminal

use std::io::{BufRead, Write};
use std::time::Duration;

use anyhow::Result;
use clap::{Args, ValueEnum};
use gw_adapters::{
    ChannelNavigator, DesktopNotifyAdapter, HttpJobTrigger, HttpPlatform, HttpRecordStore,
    NoopNotifyAdapter, NotifyAdapter,
};
use gw_core::{Choice, ControllerState, ExitReason, JobId, SessionView, UnknownPolicy};
use gw_engine::{
    parse_duration, Controller, ControllerConfig, ControllerDeps, ControllerError, ControllerHandle,
    Outcome, DEFAULT_POLL_INTERVAL,
};
use tokio::sync::{mpsc, watch};

use crate::color;
use crate::env;
use crate::exit_error::{self, ExitError};
use crate::output::write_view;

#[derive(Args)]
pub struct WatchArgs {
    /// Job (report) id
    pub job: String,

    /// Answer the resume/restart prompt in advance
    #[arg(long, value_enum, default_value_t = OnResume::Ask)]
    pub on_resume: OnResume,

    /// Poll interval (e.g. 500ms, 5s, 2m) [default: GW_POLL_INTERVAL_MS or 5s]
    #[arg(long, value_parser = parse_duration)]
    pub interval: Option<Duration>,

    /// What to do with an unrecognised initial status [default: GW_UNKNOWN_POLICY or fresh-start]
    #[arg(long, value_enum)]
    pub unknown: Option<UnknownArg>,

    /// Skip the desktop notification on completion
    #[arg(long)]
    pub no_notify: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OnResume {
    Resume,
    Restart,
    Ask,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum UnknownArg {
    FreshStart,
    Ask,
}

impl From<UnknownArg> for UnknownPolicy {
    fn from(arg: UnknownArg) -> Self {
        match arg {
            UnknownArg::FreshStart => UnknownPolicy::FreshStart,
            UnknownArg::Ask => UnknownPolicy::AskUser,
        }
    }
}

/// What to do with a failed job
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureAction {
    Retry,
    ReturnToInput,
}

pub async fn handle(args: WatchArgs) -> Result<()> {
    let platform = env::platform()?;
    let interval = args.interval.or_else(env::poll_interval).unwrap_or(DEFAULT_POLL_INTERVAL);
    let policy = args.unknown.map(UnknownPolicy::from).unwrap_or_else(env::unknown_policy);
    let config = ControllerConfig::default().poll_interval(interval).unknown_policy(policy);

    // One client, so reads and triggers share a connection pool
    let platform = HttpPlatform::new(platform)?;
    let (store, trigger) = (platform.store(), platform.trigger());
    if args.no_notify {
        run(args, store, trigger, NoopNotifyAdapter, config).await
    } else {
        run(args, store, trigger, DesktopNotifyAdapter::new(), config).await
    }
}

async fn run<N: NotifyAdapter>(
    args: WatchArgs,
    store: HttpRecordStore,
    trigger: HttpJobTrigger,
    notifier: N,
    config: ControllerConfig,
) -> Result<()> {
    let job_id = JobId::new(args.job);
    tracing::info!(job = %job_id, interval_ms = config.poll_interval.as_millis() as u64, policy = %config.unknown_policy, "watching");

    let (navigator, mut exits) = ChannelNavigator::new();
    let handle = Controller::spawn(
        job_id,
        ControllerDeps { store, trigger, notifier, navigator },
        config,
    );

    let mut prompter = Prompter::new(args.on_resume);
    let mut views = handle.subscribe();
    let mut last_line = String::new();

    loop {
        let view = views.borrow_and_update().clone();
        print_progress(&view, &mut last_line)?;

        match &view.state {
            ControllerState::AwaitingUserChoice { resume_step } => {
                match prompter.resume(*resume_step, &views, &view.state).await? {
                    Reply::Answer(choice) => {
                        if let Err(e) = handle.choose(choice).await {
                            report_rejected(&e)?;
                            continue;
                        }
                    }
                    Reply::Moved => continue,
                    Reply::Interrupted => handle.stop(),
                }
            }
            ControllerState::Failed { step, label } => {
                let question = failure_question(*step, label.as_deref());
                match prompter.failure(&question, &views, &view.state).await? {
                    Reply::Answer(FailureAction::Retry) => {
                        if let Err(e) = handle.retry().await {
                            report_rejected(&e)?;
                            continue;
                        }
                    }
                    Reply::Answer(FailureAction::ReturnToInput) => {
                        if let Err(e) = handle.return_to_input().await {
                            report_rejected(&e)?;
                            continue;
                        }
                    }
                    Reply::Moved => continue,
                    Reply::Interrupted => handle.stop(),
                }
            }
            ControllerState::Completed | ControllerState::ReturnedToInput => break,
            ControllerState::Uninitialized | ControllerState::Running => {}
        }

        tokio::select! {
            changed = views.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                handle.stop();
            }
        }
    }

    finish(handle, &mut exits).await
}

async fn finish(
    handle: ControllerHandle,
    exits: &mut mpsc::UnboundedReceiver<(JobId, ExitReason)>,
) -> Result<()> {
    let outcome = handle.join().await?;
    while let Ok((job_id, reason)) = exits.try_recv() {
        match reason {
            ExitReason::Completed => println!("Report {} is ready", color::header(job_id.as_str())),
            ExitReason::ReturnToInput => {
                println!("Returning to input for {}", color::header(job_id.as_str()))
            }
        }
    }

    match outcome {
        Outcome::Completed => Ok(()),
        Outcome::ReturnedToInput => {
            Err(ExitError::new(exit_error::RETURNED_TO_INPUT, "returned to input").into())
        }
        Outcome::Stopped => Err(ExitError::new(exit_error::INTERRUPTED, "interrupted").into()),
    }
}

/// Print the view unless it renders the same as the last one.
fn print_progress(view: &SessionView, last_line: &mut String) -> Result<()> {
    let mut buf = Vec::new();
    write_view(&mut buf, view)?;
    let line = String::from_utf8_lossy(&buf).into_owned();
    if line != *last_line {
        let mut stdout = std::io::stdout();
        stdout.write_all(line.as_bytes())?;
        stdout.flush()?;
        *last_line = line;
    }
    Ok(())
}

fn report_rejected(error: &ControllerError) -> Result<()> {
    match error {
        ControllerError::Stopped => Err(ExitError::new(exit_error::FAILURE, "controller stopped").into()),
        other => {
            eprintln!("{}", other);
            Ok(())
        }
    }
}

pub fn resume_question(resume_step: Option<u32>) -> String {
    match resume_step {
        Some(step) => format!(
            "Generation was interrupted at step {step}. Resume from step {step} or start over? [r=resume, s=start over]: "
        ),
        None => "Report status is unrecognised. Start over? [s=start over]: ".to_string(),
    }
}

pub fn failure_question(step: Option<u32>, label: Option<&str>) -> String {
    let at = match (step, label) {
        (Some(step), Some(label)) => format!(" at step {} ({})", step, label),
        (Some(step), None) => format!(" at step {}", step),
        _ => String::new(),
    };
    format!("Generation failed{}. [r=retry, b=back to input]: ", at)
}

/// Interpret an answer to the resume prompt. `Resume` is only offered when
/// there is a step to resume from.
pub fn parse_resume_answer(line: &str, can_resume: bool) -> Option<Choice> {
    match line.trim().to_lowercase().as_str() {
        "r" | "resume" if can_resume => Some(Choice::Resume),
        "s" | "start" | "restart" | "start over" => Some(Choice::Restart),
        _ => None,
    }
}

pub fn parse_failure_answer(line: &str) -> Option<FailureAction> {
    match line.trim().to_lowercase().as_str() {
        "r" | "retry" => Some(FailureAction::Retry),
        "b" | "back" | "q" | "quit" => Some(FailureAction::ReturnToInput),
        _ => None,
    }
}

enum Reply<T> {
    Answer(T),
    /// The controller left the prompting state before the user answered.
    Moved,
    Interrupted,
}

struct Prompter {
    on_resume: OnResume,
    lines: Option<mpsc::UnboundedReceiver<String>>,
}

impl Prompter {
    fn new(on_resume: OnResume) -> Self {
        Self { on_resume, lines: None }
    }

    async fn resume(
        &mut self,
        resume_step: Option<u32>,
        views: &watch::Receiver<SessionView>,
        state: &ControllerState,
    ) -> Result<Reply<Choice>> {
        match (self.on_resume, resume_step) {
            (OnResume::Resume, Some(_)) => return Ok(Reply::Answer(Choice::Resume)),
            (OnResume::Restart, _) => return Ok(Reply::Answer(Choice::Restart)),
            _ => {}
        }
        let question = resume_question(resume_step);
        self.ask(&question, views, state, |line| parse_resume_answer(line, resume_step.is_some()))
            .await
    }

    async fn failure(
        &mut self,
        question: &str,
        views: &watch::Receiver<SessionView>,
        state: &ControllerState,
    ) -> Result<Reply<FailureAction>> {
        self.ask(question, views, state, parse_failure_answer).await
    }

    /// Prompt on stderr until `parse` accepts a line from stdin.
    async fn ask<T>(
        &mut self,
        question: &str,
        views: &watch::Receiver<SessionView>,
        state: &ControllerState,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<Reply<T>> {
        let lines = self.lines.get_or_insert_with(stdin_lines);
        let mut moved = views.clone();
        loop {
            eprint!("{}", question);
            std::io::stderr().flush().ok();

            tokio::select! {
                line = lines.recv() => {
                    let Some(line) = line else {
                        return Err(ExitError::new(exit_error::FAILURE, "no answer on stdin").into());
                    };
                    if let Some(answer) = parse(&line) {
                        return Ok(Reply::Answer(answer));
                    }
                    eprintln!("{}", color::context("unrecognised answer"));
                }
                result = moved.wait_for(|v| v.state != *state) => {
                    eprintln!();
                    if result.is_err() {
                        return Err(ExitError::new(exit_error::FAILURE, "controller stopped").into());
                    }
                    return Ok(Reply::Moved);
                }
                _ = tokio::signal::ctrl_c() => {
                    eprintln!();
                    return Ok(Reply::Interrupted);
                }
            }
        }
    }
}

/// Forward stdin lines from a dedicated thread, so an unanswered prompt can
/// be abandoned without leaving a blocking read behind on the runtime.
fn stdin_lines() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;

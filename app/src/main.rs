mod cli;
mod config;
mod infrastructure;
mod terminal;

use std::io;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use domain::{
    model::vo::{Action, ParameterValue},
    service::{ParameterStore, RemoteShell, View},
};
use service::prelude::*;

use self::cli::{parse_key_value, Cli, Command};
use self::config::{build_config, LauncherConfig};
use self::infrastructure::command::{SshConfig, SshShell};
use self::infrastructure::service::ParameterFiles;
use self::infrastructure::telemetry::init_telemetry;
use self::terminal::TerminalView;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = build_config(cli.config.as_deref())
        .with_context(|| "Failed to build config".red())?;
    let launcher_config: LauncherConfig = config
        .try_deserialize()
        .with_context(|| "Invalid config".red())?;

    init_telemetry(&launcher_config.telemetry)
        .with_context(|| "Failed to initialize logger".red())?;

    let form = cli
        .command
        .form()
        .build(launcher_config.mode, &ParameterFiles)
        .await
        .with_context(|| "Cannot fill the form".red())?;

    let shell = SshShell::new(SshConfig::new(&launcher_config.remote));
    let settings = launcher_config.remote.settings();
    let controller =
        |view: TerminalView| Controller::new(view, shell.clone(), ParameterFiles, settings.clone());

    match cli.command {
        Command::Submit { yes, .. } => {
            let view = TerminalView::builder().form(form).assume_yes(yes).build();
            controller(view).dispatch(Action::Submit).await;
        }
        Command::Load { file, .. } => {
            let view = TerminalView::builder().form(form).open_path(file).build();
            let mut controller = controller(view);
            controller.dispatch(Action::LoadParameters).await;
            print!("{}", controller.view().parameters());
        }
        Command::Save { file, .. } => {
            let view = TerminalView::builder().form(form).save_path(file).build();
            controller(view).dispatch(Action::SaveParameters).await;
        }
        Command::Dashboard { watch, .. } => {
            let mut controller = controller(TerminalView::builder().form(form).build());
            if watch {
                let interval = Duration::from_secs(launcher_config.refresh_interval.max(5));
                tokio::select! {
                    _ = controller.watch(interval) => {}
                    _ = tokio::signal::ctrl_c() => {
                        tracing::info!("Stopping dashboard (ctrl-c handling).");
                    }
                }
            } else {
                controller.dispatch(Action::RefreshDashboard).await;
            }
        }
        Command::Kill { job_ids, .. } => {
            let view = TerminalView::builder().form(form).selected(job_ids).build();
            controller(view).dispatch(Action::KillJobs).await;
        }
        Command::Menu { .. } => {
            let view = TerminalView::builder().form(form).interactive(true).build();
            menu(controller(view), &launcher_config.menu).await?;
        }
    }
    Ok(())
}

async fn menu<S, P>(
    mut controller: Controller<TerminalView, S, P>,
    entries: &[Action],
) -> anyhow::Result<()>
where
    S: RemoteShell + Sync,
    P: ParameterStore + Sync,
{
    loop {
        println!();
        for (i, action) in entries.iter().enumerate() {
            println!("{:>2}) {}", i + 1, action.label());
        }
        println!(" e) Edit parameter");
        println!(" f) Show form");
        println!(" q) Quit");

        let choice = match terminal::line("Choose") {
            Ok(Some(choice)) => choice,
            Ok(None) => continue,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(()),
            Err(e) => return Err(e.into()),
        };
        match choice.as_str() {
            "q" => return Ok(()),
            "f" => print!("{}", controller.view().parameters()),
            "e" => edit(controller.view_mut())?,
            other => match other
                .parse::<usize>()
                .ok()
                .and_then(|n| entries.get(n.checked_sub(1)?))
            {
                Some(action) => controller.dispatch(*action).await,
                None => eprintln!("{}", format!("Unknown choice: {other}").red()),
            },
        }
    }
}

/// `KEY=VALUE` sets a text option, a bare `KEY` toggles a flag.
fn edit(view: &mut TerminalView) -> io::Result<()> {
    let Some(answer) = terminal::line("KEY=VALUE, or KEY to toggle a flag")? else {
        return Ok(());
    };
    if answer.contains('=') {
        match parse_key_value(&answer) {
            Ok((key, value)) => view.form_mut().insert(key, value),
            Err(e) => view.error(&e),
        }
        return Ok(());
    }
    match view.parameters().get(&answer) {
        Some(ParameterValue::Flag(on)) => view.form_mut().insert(answer, !*on),
        _ => view.error(&format!("`{answer}` is not a flag on this form")),
    }
    Ok(())
}

//! `tasknest` command line
//!
//! Each invocation runs one command against the configured API. The session
//! is kept in the state directory between invocations.

use crate::app::{App, AppParts};
use crate::config::{normalize_base_url, ClientConfig};
use crate::login::LoginOutcome;
use crate::session::FileStore;
use crate::transport::HttpTransport;
use crate::ui::{
    auth_guard, guest_guard, sign_out, ConfirmPrompt, Confirmer, MemoryNavigator,
    NotificationKind, Route, ToastQueue,
};
use anyhow::{anyhow, bail, Context};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::sync::Arc;
use tasknest_shared::models::{Task, TaskForm};

#[derive(Parser, Debug)]
#[command(name = "tasknest", version, about = "Manage your TaskNest tasks")]
pub struct Cli {
    /// Overrides TASKNEST_API_URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Sign in, creating the account if needed
    Login { email: String },

    /// Sign out
    Logout,

    /// List your tasks
    List,

    /// Create a task
    Add {
        title: String,

        #[arg(long, short, default_value = "")]
        description: String,
    },

    /// Change the title or description of a task
    Edit {
        id: String,

        #[arg(long, short)]
        title: Option<String>,

        #[arg(long, short)]
        description: Option<String>,
    },

    /// Mark a task done, or not done
    Toggle { id: String },

    /// Delete a task
    Delete { id: String },

    /// Show who is signed in
    Whoami,
}

/// Asks yes/no questions on the terminal
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalConfirmer;

#[async_trait]
impl Confirmer for TerminalConfirmer {
    async fn confirm(&self, prompt: ConfirmPrompt) -> bool {
        let question = format!(
            "{}\n{}\n[y] {} / [N] {}: ",
            prompt.title, prompt.message, prompt.confirm_text, prompt.cancel_text
        );

        let answer = tokio::task::spawn_blocking(move || -> io::Result<String> {
            let mut stdout = io::stdout();
            stdout.write_all(question.as_bytes())?;
            stdout.flush()?;

            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            Ok(line)
        })
        .await;

        match answer {
            Ok(Ok(line)) => is_yes(&line),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Could not read the answer");
                false
            }
            Err(e) => {
                tracing::warn!(error = %e, "Prompt task failed");
                false
            }
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Runs one command
///
/// Failures the user was already shown as an error notification come back as
/// `ExitCode::FAILURE` rather than as an error.
pub async fn run(cli: Cli, mut config: ClientConfig) -> anyhow::Result<ExitCode> {
    if let Some(url) = cli.api_url {
        config.api.base_url = normalize_base_url(&url);
        config.validate()?;
    }

    let transport =
        HttpTransport::from_config(&config).context("Failed to build the HTTP client")?;
    let toasts = Arc::new(ToastQueue::new(config.toast_ttl()));

    let app = App::new(AppParts {
        transport: Arc::new(transport),
        store: Arc::new(FileStore::new(&config.storage.state_dir)),
        notifier: toasts.clone(),
        navigator: Arc::new(MemoryNavigator::new(Route::Login)),
        confirmer: Arc::new(TerminalConfirmer),
    });

    let result = execute(&app, cli.command).await;
    let errors_shown = print_toasts(&toasts);
    let succeeded = settle(result, errors_shown)?;
    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn settle(result: anyhow::Result<()>, errors_shown: bool) -> anyhow::Result<bool> {
    match result {
        Ok(()) => Ok(true),
        Err(e) if errors_shown => {
            tracing::debug!(error = %e, "Command failed, already reported");
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

async fn execute(app: &App, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Login { email } => login(app, &email).await,
        Command::Logout => {
            sign_out(&app.sessions, app.navigator.as_ref());
            println!("Signed out.");
            Ok(())
        }
        Command::Whoami => {
            match app.sessions.current_user() {
                Some(user) => println!("{}", user.email),
                None => println!("Not signed in."),
            }
            Ok(())
        }
        Command::List => {
            require_session(app)?;
            app.tasks.load_tasks().await?;
            print_tasks(app);
            Ok(())
        }
        Command::Add { title, description } => {
            require_session(app)?;
            let created = app
                .tasks
                .submit_task(TaskForm::new(title, description))
                .await?;
            if let Some(task) = created {
                println!("{}", format_task(&task));
            }
            Ok(())
        }
        Command::Edit {
            id,
            title,
            description,
        } => {
            require_session(app)?;
            let task = find_task(app, &id).await?;

            let current = TaskForm::from(&task);
            let form = TaskForm::new(
                title.unwrap_or(current.title),
                description.unwrap_or(current.description),
            );

            app.tasks.begin_edit(task);
            if let Some(updated) = app.tasks.submit_task(form).await? {
                println!("{}", format_task(&updated));
            }
            Ok(())
        }
        Command::Toggle { id } => {
            require_session(app)?;
            let task = find_task(app, &id).await?;
            let updated = app.tasks.toggle_completed(&task).await?;
            println!("{}", format_task(&updated));
            Ok(())
        }
        Command::Delete { id } => {
            require_session(app)?;
            let task = find_task(app, &id).await?;
            app.tasks.delete_task(&task).await?;
            Ok(())
        }
    }
}

async fn login(app: &App, email: &str) -> anyhow::Result<()> {
    if !guest_guard(&app.sessions, app.navigator.as_ref()) {
        let who = app
            .sessions
            .current_user()
            .map(|u| u.email)
            .unwrap_or_default();
        println!("Already signed in as {}. Run `tasknest logout` first.", who);
        return Ok(());
    }

    match app.login.submit(email).await? {
        LoginOutcome::SignedIn(_) | LoginOutcome::AccountCreated(_) => Ok(()),
        LoginOutcome::Declined => {
            println!("No account created.");
            Ok(())
        }
        LoginOutcome::Failed(message) => Err(anyhow!(message)),
    }
}

fn require_session(app: &App) -> anyhow::Result<()> {
    if !auth_guard(&app.sessions, app.navigator.as_ref()) {
        bail!("Not signed in. Run `tasknest login <email>` first.");
    }
    Ok(())
}

async fn find_task(app: &App, id: &str) -> anyhow::Result<Task> {
    app.tasks.load_tasks().await?;
    app.tasks
        .tasks()
        .into_iter()
        .find(|t| t.id == id)
        .ok_or_else(|| anyhow!("No task with id {}", id))
}

fn print_tasks(app: &App) {
    let state = app.tasks.snapshot();
    if state.tasks.is_empty() {
        println!("No tasks yet.");
        return;
    }

    for task in &state.tasks {
        println!("{}", format_task(task));
    }
    println!(
        "\n{} pending, {} completed",
        state.pending_count(),
        state.completed_count()
    );
}

fn format_task(task: &Task) -> String {
    let mark = if task.completed { "x" } else { " " };
    if task.description.is_empty() {
        format!("[{}] {:>4}  {}", mark, task.id, task.title)
    } else {
        format!(
            "[{}] {:>4}  {} ({})",
            mark, task.id, task.title, task.description
        )
    }
}

/// Prints pending notifications, returning whether any was an error
fn print_toasts(toasts: &ToastQueue) -> bool {
    let mut errors_shown = false;
    for toast in toasts.drain_new() {
        match toast.kind {
            NotificationKind::Error => {
                errors_shown = true;
                eprintln!("error: {}", toast.message);
            }
            _ => println!("{}", toast.message),
        }
    }
    errors_shown
}

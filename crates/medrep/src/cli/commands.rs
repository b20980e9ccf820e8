//! # CLI Layer
//!
//! This module is **one possible UI client** for medrep, not the application itself.
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr, the delete prompt on stdin)
//! - Decides exit codes
//! - Starts the async runtime
//! - Formats output for human consumption (or JSON)
//!
//! ## One Invocation, One Session
//!
//! Each command replays a short UI session against a fresh [`MedrepApi`]:
//! `edit 7 --notes x` loads the list, opens the form on record 7, sets the
//! field and submits, exactly as a user clicking through the screens would.
//!
//! ## Exit Codes
//!
//! - `0`: success, and recovered fetch failures on `list` (the error notice is
//!   printed, the table shows its placeholder)
//! - `1`: a write that failed (add, edit, delete), a lookup that could not load
//!   the collection, or a returned error (`Error: ...` on stderr)

use super::render::{print_json, print_messages, print_record, print_table};
use super::setup::{
    build_command, Cli, Commands, ConfigAction, FieldArgs, MiscCommands, OutputMode,
    RecordCommands,
};
use anyhow::Result;
use clap::Parser;
use clap_complete::Shell;
use medrepapp::api::{CmdMessage, CmdResult, MedrepApi};
use medrepapp::config::{ConfigOverrides, MedrepConfig};
use medrepapp::error::MedrepError;
use medrepapp::model::{Doctor, DoctorId, SearchColumn, Weekday};
use medrepapp::store::http::HttpStore;
use medrepapp::views::form::RecordForm;
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _, EnvFilter};

const LOG_ENV: &str = "MEDREP_LOG";
const VERBOSE_FILTER: &str = "warn,medrep=debug,medrepapp=debug";
const DELETE_CANCELLED: &str = "Delete cancelled.";

struct AppContext {
    api: MedrepApi<HttpStore>,
    output: OutputMode,
}

pub fn run() -> Result<ExitCode> {
    let Cli {
        command,
        base_url,
        config,
        output,
        verbose,
    } = Cli::parse();

    init_tracing(verbose);
    let overrides = ConfigOverrides { base_url };

    let command = match command {
        Some(Commands::Misc(cmd)) => {
            return match cmd {
                MiscCommands::Config { action } => {
                    handle_config(config.as_deref(), &overrides, action, output)
                }
                MiscCommands::Completions { shell } => handle_completions(shell),
            }
        }
        Some(Commands::Records(cmd)) => cmd,
        None => RecordCommands::List {
            by: None,
            search: None,
        },
    };

    let settings = MedrepConfig::load(config.as_deref(), &overrides)?;
    let mut ctx = init_context(&settings, output)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(dispatch(&mut ctx, command))
}

/// Logs go to stderr so stdout only carries rendered output.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(filter)
        .try_init();
}

fn init_context(settings: &MedrepConfig, output: OutputMode) -> Result<AppContext> {
    tracing::debug!(base_url = %settings.base_url, "using doctors API");
    let store = HttpStore::new(&settings.base_url)?;
    Ok(AppContext {
        api: MedrepApi::new(store, settings.search_column),
        output,
    })
}

async fn dispatch(ctx: &mut AppContext, command: RecordCommands) -> Result<ExitCode> {
    match command {
        RecordCommands::List { by, search } => handle_list(ctx, by, search).await,
        RecordCommands::View { id } => handle_view(ctx, DoctorId::new(id)).await,
        RecordCommands::Add { fields, days } => handle_add(ctx, &fields, &days).await,
        RecordCommands::Edit {
            id,
            fields,
            toggle_days,
        } => handle_edit(ctx, DoctorId::new(id), &fields, &toggle_days).await,
        RecordCommands::Delete { id, yes } => handle_delete(ctx, DoctorId::new(id), yes).await,
    }
}

/// Prints a result: coloured messages, or the whole result as JSON.
fn emit(output: OutputMode, result: &CmdResult) -> Result<()> {
    match output {
        OutputMode::Text => print_messages(&result.messages),
        OutputMode::Json => print_json(result)?,
    }
    Ok(())
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[derive(Serialize)]
struct ListOutput<'a> {
    records: Vec<&'a Doctor>,
    total: usize,
    search_column: SearchColumn,
    search_text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    placeholder: Option<&'static str>,
    error: bool,
    messages: &'a [CmdMessage],
}

async fn handle_list(
    ctx: &mut AppContext,
    by: Option<SearchColumn>,
    search: Option<String>,
) -> Result<ExitCode> {
    let result = ctx.api.open_list().await;

    if by.is_some() || search.is_some() {
        let column = by.unwrap_or_else(|| ctx.api.list().search_column());
        ctx.api.search(column, search.unwrap_or_default());
    }

    let view = ctx.api.list();
    let rows = view.visible();
    match ctx.output {
        OutputMode::Text => {
            print_messages(&result.messages);
            print_table(&rows, view.placeholder(), view.summary().as_deref());
        }
        OutputMode::Json => print_json(&ListOutput {
            total: view.records().len(),
            records: rows,
            search_column: view.search_column(),
            search_text: view.search_text(),
            summary: view.summary(),
            placeholder: view.placeholder(),
            error: view.has_error(),
            messages: &result.messages,
        })?,
    }
    Ok(ExitCode::SUCCESS)
}

/// Loads the collection before acting on one record. Reports and returns
/// false when the load failed.
async fn load_for_lookup(ctx: &mut AppContext) -> Result<bool> {
    let result = ctx.api.open_list().await;
    if ctx.api.list().has_error() {
        emit(ctx.output, &result)?;
        return Ok(false);
    }
    Ok(true)
}

async fn handle_view(ctx: &mut AppContext, id: DoctorId) -> Result<ExitCode> {
    if !load_for_lookup(ctx).await? {
        return Ok(ExitCode::FAILURE);
    }
    let doctor = ctx
        .api
        .list()
        .find(&id)
        .cloned()
        .ok_or(MedrepError::NotFound(id))?;

    match ctx.output {
        OutputMode::Text => print_record(&doctor),
        OutputMode::Json => print_json(&doctor)?,
    }
    Ok(ExitCode::SUCCESS)
}

fn fill_form(form: &mut RecordForm, fields: &FieldArgs) {
    for (field, value) in fields.assignments() {
        form.set(field, value);
    }
}

/// Submits the open form. Fails the process when the store rejected the write.
async fn submit(ctx: &mut AppContext) -> Result<ExitCode> {
    let result = ctx.api.submit_form().await?;
    // A saved form is closed; a failed one stays open for a retry.
    let saved = ctx.api.form().is_err();
    emit(ctx.output, &result)?;
    Ok(exit_code(saved))
}

async fn handle_add(ctx: &mut AppContext, fields: &FieldArgs, days: &[Weekday]) -> Result<ExitCode> {
    let form = ctx.api.begin_add()?;
    fill_form(form, fields);
    for day in days {
        form.add_day(*day);
    }
    submit(ctx).await
}

async fn handle_edit(
    ctx: &mut AppContext,
    id: DoctorId,
    fields: &FieldArgs,
    toggle_days: &[Weekday],
) -> Result<ExitCode> {
    if !load_for_lookup(ctx).await? {
        return Ok(ExitCode::FAILURE);
    }
    let form = ctx.api.begin_edit(&id)?;
    fill_form(form, fields);
    for day in toggle_days {
        form.toggle_day(*day);
    }
    submit(ctx).await
}

async fn handle_delete(ctx: &mut AppContext, id: DoctorId, yes: bool) -> Result<ExitCode> {
    if !load_for_lookup(ctx).await? {
        return Ok(ExitCode::FAILURE);
    }
    let target = ctx.api.request_delete(&id)?.clone();

    if !yes && !ask_delete(&target)? {
        ctx.api.cancel_delete();
        let result = CmdResult::default().with_message(CmdMessage::info(DELETE_CANCELLED));
        emit(ctx.output, &result)?;
        return Ok(ExitCode::SUCCESS);
    }

    let result = ctx.api.confirm_delete().await;
    // The delete outcome comes first; a failed re-fetch after it is only reported.
    let deleted = result.messages.first().is_some_and(|m| !m.is_error());
    emit(ctx.output, &result)?;
    Ok(exit_code(deleted))
}

/// Asks on stderr, reads the answer from stdin. Anything but y/yes declines.
fn ask_delete(doctor: &Doctor) -> Result<bool> {
    let name = if doctor.fields.name.is_empty() {
        doctor.id.to_string()
    } else {
        format!("{} ({})", doctor.fields.name, doctor.id)
    };
    eprint!("Delete doctor {}? [y/N]: ", name);
    io::stderr().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let answer = input.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}

fn handle_config(
    path: Option<&Path>,
    overrides: &ConfigOverrides,
    action: Option<ConfigAction>,
    output: OutputMode,
) -> Result<ExitCode> {
    if action == Some(ConfigAction::Gen) {
        print!("{}", MedrepConfig::template());
        return Ok(ExitCode::SUCCESS);
    }

    let settings = MedrepConfig::load(path, overrides)?;
    match output {
        OutputMode::Text => {
            println!("base_url = {}", settings.base_url);
            println!("search_column = {}", settings.search_column.key());
            if let Some(file) = path
                .map(Path::to_path_buf)
                .or_else(MedrepConfig::default_path)
            {
                println!("# file: {}", file.display());
            }
        }
        OutputMode::Json => print_json(&settings)?,
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_completions(shell: Shell) -> Result<ExitCode> {
    let mut cmd = build_command();
    clap_complete::generate(shell, &mut cmd, "medrep", &mut io::stdout());
    Ok(ExitCode::SUCCESS)
}

use std::path::PathBuf;
use std::process::ExitCode;

use agrochat::{ChatView, Dispatcher};
use clap::Parser;
use rustyline_async::SharedWriter;
use tracing_subscriber::EnvFilter;

mod command;
mod http;
mod input;
mod settings;
mod terminal;

use command::{Command, HELP};
use http::{LocalFile, ReqwestBackend, expand_home};
use input::{ChatInput, InputEvent};
use settings::CliSettings;
use terminal::TerminalView;

type TerminalDispatcher = Dispatcher<ReqwestBackend, TerminalView<SharedWriter>>;

/// Terminal client for the AgroChat backend.
#[derive(Debug, Parser)]
#[command(name = "agrochat-cli", version)]
struct Args {
    /// JSON settings file (defaults to <config dir>/agrochat/settings.json).
    #[arg(short, long, env = "AGROCHAT_CONFIG")]
    config: Option<PathBuf>,

    /// Backend origin, e.g. http://127.0.0.1:5000.
    #[arg(short, long)]
    base_url: Option<String>,
}

/// Application entry point.
///
/// Logs go to stderr so they never interleave with the transcript on stdout.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let settings = match CliSettings::load(args.config.as_deref(), args.base_url.as_deref()) {
        Ok(settings) => settings,
        Err(error) => {
            tracing::error!(error = %error, "failed to load settings");
            return ExitCode::FAILURE;
        }
    };

    let backend = match ReqwestBackend::new(settings.endpoints.clone(), settings.request_timeout())
    {
        Ok(backend) => backend,
        Err(error) => {
            tracing::error!(error = %error, "failed to build http client");
            return ExitCode::FAILURE;
        }
    };

    let (mut input, writer) = match ChatInput::new("> ") {
        Ok(pair) => pair,
        Err(error) => {
            tracing::error!(error = %error, "failed to open terminal input");
            return ExitCode::FAILURE;
        }
    };

    let view = TerminalView::new(writer);
    let dispatcher = Dispatcher::new(backend, view, settings.chat_config());

    run(&dispatcher, &mut input).await;
    input.finish();
    ExitCode::SUCCESS
}

async fn run(dispatcher: &TerminalDispatcher, input: &mut ChatInput) {
    let view = dispatcher.view();
    view.notice(&format!(
        "AgroChat ({}) - /help for commands, Ctrl+D to exit",
        dispatcher.config().endpoints.chat_url()
    ));

    loop {
        input.update_prompt(&view.prompt_text());
        let line = match input.read_line().await {
            InputEvent::Line(line) => line,
            InputEvent::Interrupted => {
                view.notice("press Ctrl+D or type /quit to exit");
                continue;
            }
            InputEvent::Eof => break,
        };

        match Command::parse(&line) {
            Command::Send(text) => {
                view.set_input(text);
                let outcome = dispatcher.submit().await;
                tracing::debug!(?outcome, "submit finished");
            }
            Command::Attach(Some(path)) => match LocalFile::open(expand_home(&path)).await {
                Ok(file) => view.select_attachment(file),
                Err(error) => view.notice(&format!("cannot attach {path}: {error}")),
            },
            Command::Attach(None) => view.notice("usage: /attach <path>"),
            Command::Detach => {
                view.clear_attachment();
                view.notice("attachment cleared");
            }
            Command::Help => view.notice(HELP),
            Command::Quit => break,
        }
    }
}

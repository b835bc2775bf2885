// UI layer: the prompt loop, the command dispatcher and colored console
// output. Every command error ends here as a single red line; nothing a
// user types can terminate the process.

use std::io::{self, BufRead, IsTerminal};

use anyhow::Result;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use crossterm::style::{style, Stylize};
use dialoguer::{Input, Password};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;

use crate::admin;
use crate::api::ApiClient;
use crate::command::{self, Command, HELP};
use crate::config::Config;
use crate::error::CliError;
use crate::login;
use crate::relaxed;

/// Whether the loop should keep reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// What a successfully executed command has to report.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Help,
    Unknown(String),
    Response(Value),
    LoggedIn(Value),
    CredentialSet,
    LoggedOut { had_credential: bool },
    Elevated,
    Whoami(Option<Value>),
    Exit,
}

/// Run one command against the client. Never prompts; the only terminal
/// output is the request spinner.
pub fn execute(api: &mut ApiClient, config: &Config, command: Command) -> Result<Reply, CliError> {
    match command {
        Command::Help => Ok(Reply::Help),
        Command::Unknown(verb) => Ok(Reply::Unknown(verb)),
        Command::Exit => Ok(Reply::Exit),
        Command::Request(raw) => {
            let body = relaxed::parse(&raw)?;
            let response = with_spinner("Sending request...", || api.post(&body))?;
            Ok(Reply::Response(response))
        }
        Command::Login(raw) => {
            let body = relaxed::parse(&raw)?;
            let success = with_spinner("Logging in...", || login::login(api, &body))?;
            Ok(Reply::LoggedIn(success.identifier))
        }
        Command::Jwt(token) => {
            api.session_mut().set(&token)?;
            Ok(Reply::CredentialSet)
        }
        Command::Logout => Ok(Reply::LoggedOut {
            had_credential: api.session_mut().clear(),
        }),
        Command::Admin(secret) => {
            if secret.trim().is_empty() {
                return Err(CliError::MissingArgument("admin secret: admin <secret>"));
            }
            admin::elevate_session(api, &config.key, secret.trim())?;
            Ok(Reply::Elevated)
        }
        Command::Whoami => Ok(Reply::Whoami(
            api.session().credential().and_then(decode_claims),
        )),
    }
}

/// Execute and report one command. Errors are printed, never returned.
pub fn dispatch(api: &mut ApiClient, config: &Config, command: Command) -> Flow {
    let command = match command {
        Command::Admin(secret) if secret.trim().is_empty() && io::stdin().is_terminal() => {
            match Password::new().with_prompt("Admin secret").interact() {
                Ok(secret) => Command::Admin(secret),
                Err(e) => {
                    failure(&format!("could not read secret: {}", e));
                    return Flow::Continue;
                }
            }
        }
        other => other,
    };
    match execute(api, config, command) {
        Ok(reply) => report(api, reply),
        Err(e) => {
            log::debug!("command failed ({}): {:?}", e.kind(), e);
            failure(&e.to_string());
            Flow::Continue
        }
    }
}

fn report(api: &ApiClient, reply: Reply) -> Flow {
    match reply {
        Reply::Help => info(HELP),
        Reply::Unknown(verb) => {
            info(&format!("Unknown command `{}`.", verb));
            info(HELP);
        }
        Reply::Response(value) => success(&pretty(&value)),
        Reply::LoggedIn(identifier) => {
            let id = match identifier {
                Value::String(s) => s,
                other => other.to_string(),
            };
            success(&format!("User {} got logged in.", id))
        }
        Reply::CredentialSet => success("The jwt will be sent with the next requests."),
        Reply::LoggedOut { had_credential: true } => success("Logged out."),
        Reply::LoggedOut { had_credential: false } => info("No active session."),
        Reply::Elevated => success("You are now logged in as admin."),
        Reply::Whoami(claims) => match (api.session().is_set(), claims) {
            (false, _) => info("No active session."),
            (true, Some(claims)) => success(&pretty(&claims)),
            (true, None) => success("A credential is set (not a readable jwt)."),
        },
        Reply::Exit => return Flow::Exit,
    }
    Flow::Continue
}

/// Main loop. Interactive terminals get a line-editing prompt; piped input
/// is read line by line until EOF.
pub fn main_loop(mut api: ApiClient, config: &Config) -> Result<()> {
    info(&format!(
        "Requests will reach {}. To change the port, edit PORT env variable.",
        api.endpoint()
    ));
    if io::stdin().is_terminal() {
        info("Type `help` for the list of commands.");
        loop {
            let line: String = match Input::new()
                .with_prompt(">")
                .allow_empty(true)
                .interact_text()
            {
                Ok(line) => line,
                // Ctrl-D / Ctrl-C on the prompt
                Err(_) => break,
            };
            if dispatch(&mut api, config, command::parse(&line)) == Flow::Exit {
                break;
            }
        }
    } else {
        read_lines(&mut api, config, io::stdin().lock());
    }
    Ok(())
}

/// Dispatch every line of `reader` until EOF or `exit`. A line that cannot
/// be read (invalid UTF-8) is reported and skipped.
pub fn read_lines<R: BufRead>(api: &mut ApiClient, config: &Config, reader: R) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                failure(&format!("skipped unreadable line: {}", e));
                continue;
            }
            Err(e) => {
                failure(&format!("could not read input: {}", e));
                break;
            }
        };
        if dispatch(api, config, command::parse(&line)) == Flow::Exit {
            break;
        }
    }
}

/// Run a single command line and return.
pub fn run_once(mut api: ApiClient, config: &Config, line: &str) {
    info(&format!("Requests will reach {}.", api.endpoint()));
    dispatch(&mut api, config, command::parse(line));
}

/// Decode the payload segment of a JWT without verifying it.
pub fn decode_claims(token: &str) -> Option<Value> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    serde_json::from_slice(&bytes).ok()
}

fn with_spinner<T>(msg: &'static str, f: impl FnOnce() -> T) -> T {
    let spinner = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(spinner_style);
    }
    spinner.set_message(msg);
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    let out = f();
    spinner.finish_and_clear();
    out
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

pub fn success(msg: &str) {
    println!("{}", style(msg).green());
}

pub fn info(msg: &str) {
    println!("{}", style(msg).cyan());
}

pub fn failure(msg: &str) {
    eprintln!("{} {}", style("error:").red().bold(), style(msg).red());
}

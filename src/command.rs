// Command tokenizer: one input line becomes one `Command`. The verb is the
// first word, everything after the first run of whitespace is passed on raw.

/// A parsed prompt line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Login(String),
    Request(String),
    Jwt(String),
    Logout,
    Admin(String),
    Whoami,
    Exit,
    /// Unknown verb; help is printed after a notice.
    Unknown(String),
}

pub fn parse(line: &str) -> Command {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };
    match verb.to_lowercase().as_str() {
        "" | "help" => Command::Help,
        "login" => Command::Login(rest.to_string()),
        "request" | "req" => Command::Request(rest.to_string()),
        "jwt" => Command::Jwt(rest.to_string()),
        "logout" => Command::Logout,
        "admin" => Command::Admin(rest.to_string()),
        "whoami" => Command::Whoami,
        "exit" | "quit" => Command::Exit,
        _ => Command::Unknown(verb.to_string()),
    }
}

pub const HELP: &str = "You can use the following commands:
    - req | request {json}  Send a SimpleQL request
    - login {json}          Send a request and keep the jwt it returns
    - jwt {token}           Use this jwt for the next requests
    - logout                Forget the current jwt
    - admin [secret]        Sign an admin jwt with the local private key
    - whoami                Show the current jwt claims
    - help                  This help message
    - exit                  Leave the prompt
  {json} accepts unquoted keys and single quotes: {User: {login: 'test'}}";

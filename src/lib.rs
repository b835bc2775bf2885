// Library root
// -----------
// This crate exposes the pieces of the SimpleQL command-line client. The
// binary (`main.rs`) parses the configuration, builds an `ApiClient` and
// hands it to the prompt loop in `ui`.
//
// Module responsibilities:
// - `config`: flags and `URL` / `PORT` / `ADMIN_KEY` environment fallbacks.
// - `relaxed`: turns `{User: {login: 'test'}}` into strict JSON.
// - `session`: the optional bearer token attached to requests.
// - `api`: one JSON POST per command, with the session credential.
// - `login`: finds the issued jwt in a login response.
// - `admin`: signs an admin jwt with a local private key.
// - `command`: splits a prompt line into a verb and its argument.
// - `ui`: dispatches commands and prints colored results.
pub mod admin;
pub mod api;
pub mod command;
pub mod config;
pub mod error;
pub mod login;
pub mod relaxed;
pub mod session;
pub mod ui;

// Entrypoint for the CLI application.
// - Keeps `main` small: read the configuration, create the API client and
//   hand it to the UI loop (or run the single command given on the line).

use clap::Parser;
use simpleql_cli::{api::ApiClient, config::Config, ui};

fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    config.log_builder().init();

    let api = ApiClient::new(&config)?;

    match config.one_shot() {
        Some(line) => ui::run_once(api, &config, &line),
        None => ui::main_loop(api, &config)?,
    }
    Ok(())
}

use crate::api::{TfeClient, WorkspaceApi};
use crate::cli::{Cli, Commands};
use crate::command_handlers::update_value;
use crate::config;
use crate::error::CommandError;
use crate::output;
use std::io::Write;

pub fn dispatch(
    cli: Cli,
    w: &mut dyn Write,
    lookup_env: &dyn Fn(&str) -> Option<String>,
) -> Result<(), CommandError> {
    let file = match config::load(cli.config.as_deref()) {
        Ok(f) => f,
        Err(e) => {
            let err = CommandError::invalid_args(format!("{e:#}"));
            output::write_error(w, &err);
            return Err(err);
        }
    };
    match cli.command {
        Commands::UpdateValue(args) => {
            update_value::execute(&args, cli.address.as_deref(), &file, lookup_env, w, |settings| {
                let client = TfeClient::new(&settings.address, &settings.token)?;
                Ok(Box::new(client) as Box<dyn WorkspaceApi>)
            })
        }
    }
}

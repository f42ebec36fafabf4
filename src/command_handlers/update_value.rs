use crate::api::{ApiError, VariableUpdateOptions, WorkspaceApi};
use crate::cli::UpdateValueArgs;
use crate::command_handlers::helpers::variable_from_key;
use crate::config::{self, FileConfig, Overrides, Settings};
use crate::error::CommandError;
use crate::output::{self, UpdateValueResult};
use std::io::Write;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateValueRequest {
    pub settings: Settings,
    pub workspace: String,
    pub key: String,
    pub value: String,
}

/// Checks inputs in order: token, organization, workspace, key, value.
pub fn validate(
    args: &UpdateValueArgs,
    address: Option<&str>,
    file: &FileConfig,
    lookup_env: &dyn Fn(&str) -> Option<String>,
) -> Result<UpdateValueRequest, CommandError> {
    let flags = Overrides {
        token: args.token.as_deref(),
        organization: args.org.as_deref(),
        address,
    };
    let settings = config::resolve(flags, file, lookup_env)?;
    let workspace = required(args.workspace.as_deref(), "--workspace")?;
    let key = required(args.key.as_deref(), "--key")?;
    // an explicit empty value is allowed
    let value = args
        .value
        .clone()
        .ok_or_else(|| CommandError::invalid_args("--value argument is required"))?;
    Ok(UpdateValueRequest {
        settings,
        workspace,
        key,
        value,
    })
}

fn required(value: Option<&str>, flag: &str) -> Result<String, CommandError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(CommandError::invalid_args(format!("{flag} argument is required"))),
    }
}

/// Workspace by org/name, then variable by key, then the value update.
/// Stops at the first failure.
pub fn update_value(
    api: &dyn WorkspaceApi,
    req: &UpdateValueRequest,
) -> Result<UpdateValueResult, CommandError> {
    let workspace = api.read_workspace(&req.settings.organization, &req.workspace)?;
    debug!(workspace_id = %workspace.id, workspace = %workspace.name, "resolved workspace");
    let variable = variable_from_key(api, &workspace.id, &req.key)?;
    debug!(
        variable_id = %variable.id,
        key = %variable.key,
        category = ?variable.category,
        hcl = variable.hcl,
        sensitive = variable.sensitive,
        "resolved variable"
    );
    let options = VariableUpdateOptions {
        value: Some(req.value.clone()),
    };
    let Some(updated) = api.update_variable(&workspace.id, &variable.id, &options)? else {
        return Err(CommandError::internal("update returned neither a variable nor an error"));
    };
    info!(variable_id = %updated.id, key = %updated.key, "variable updated");
    if updated.sensitive {
        debug!("sensitive variable; reporting the supplied value");
    }
    Ok(UpdateValueResult {
        id: updated.id,
        key: updated.key,
        value: req.value.clone(),
    })
}

/// Validates, connects and updates, writing exactly one JSON document to `w`.
pub fn execute<F>(
    args: &UpdateValueArgs,
    address: Option<&str>,
    file: &FileConfig,
    lookup_env: &dyn Fn(&str) -> Option<String>,
    w: &mut dyn Write,
    connect: F,
) -> Result<(), CommandError>
where
    F: FnOnce(&Settings) -> Result<Box<dyn WorkspaceApi>, ApiError>,
{
    let outcome = validate(args, address, file, lookup_env).and_then(|req| {
        debug!(settings = ?req.settings, "connecting");
        let api = connect(&req.settings)?;
        update_value(api.as_ref(), &req)
    });
    match outcome {
        Ok(result) => output::write_result(w, &result)
            .map_err(|e| CommandError::internal(format!("writing result: {e}"))),
        Err(e) => {
            output::write_error(w, &e);
            Err(e)
        }
    }
}

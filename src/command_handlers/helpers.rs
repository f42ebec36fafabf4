use crate::api::{Variable, WorkspaceApi};
use crate::error::CommandError;
use tracing::debug;

/// Lists the workspace's variables (one unpaginated request) and returns the
/// first exact key match.
pub fn variable_from_key(
    api: &dyn WorkspaceApi,
    workspace_id: &str,
    key: &str,
) -> Result<Variable, CommandError> {
    let variables = api.list_variables(workspace_id)?;
    debug!(workspace_id, count = variables.len(), "listed variables");
    find_variable(variables, key).ok_or_else(|| CommandError::VariableNotFound(key.to_string()))
}

pub fn find_variable(variables: Vec<Variable>, key: &str) -> Option<Variable> {
    variables.into_iter().find(|v| v.key == key)
}

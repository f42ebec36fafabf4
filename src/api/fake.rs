use super::{ApiError, Variable, VariableCategory, VariableUpdateOptions, Workspace, WorkspaceApi};
use std::cell::RefCell;

#[derive(Debug, Clone, Copy)]
pub enum UpdateBehavior {
    /// Return the listed variable carrying the new value, as the platform does.
    Echo,
    /// Succeed without returning a variable.
    Nothing,
    Fail(u16),
}

/// In-memory `WorkspaceApi` that records every call it receives.
pub struct FakeApi {
    pub workspace: Option<Workspace>,
    pub variables: Vec<Variable>,
    pub list_fails: bool,
    pub update: UpdateBehavior,
    pub calls: RefCell<Vec<String>>,
}

impl FakeApi {
    pub fn new(variables: Vec<Variable>) -> Self {
        Self {
            workspace: Some(Workspace {
                id: "ws-1".into(),
                name: "prod".into(),
            }),
            variables,
            list_fails: false,
            update: UpdateBehavior::Echo,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

pub fn variable(id: &str, key: &str, value: &str) -> Variable {
    Variable {
        id: id.into(),
        key: key.into(),
        value: value.into(),
        category: VariableCategory::Terraform,
        hcl: false,
        sensitive: false,
    }
}

impl WorkspaceApi for FakeApi {
    fn read_workspace(&self, organization: &str, name: &str) -> Result<Workspace, ApiError> {
        self.calls.borrow_mut().push(format!("read {organization}/{name}"));
        self.workspace.clone().ok_or(ApiError::NotFound)
    }

    fn list_variables(&self, workspace_id: &str) -> Result<Vec<Variable>, ApiError> {
        self.calls.borrow_mut().push(format!("list {workspace_id}"));
        if self.list_fails {
            return Err(ApiError::Status {
                status: 500,
                detail: "internal error".into(),
            });
        }
        Ok(self.variables.clone())
    }

    fn update_variable(
        &self,
        workspace_id: &str,
        variable_id: &str,
        options: &VariableUpdateOptions,
    ) -> Result<Option<Variable>, ApiError> {
        self.calls
            .borrow_mut()
            .push(format!("update {workspace_id}/{variable_id}"));
        match self.update {
            UpdateBehavior::Echo => Ok(self
                .variables
                .iter()
                .find(|v| v.id == variable_id)
                .map(|v| Variable {
                    // sensitive values are write-only remotely
                    value: if v.sensitive {
                        String::new()
                    } else {
                        options.value.clone().unwrap_or_else(|| v.value.clone())
                    },
                    ..v.clone()
                })),
            UpdateBehavior::Nothing => Ok(None),
            UpdateBehavior::Fail(status) => Err(ApiError::Status {
                status,
                detail: "update rejected".into(),
            }),
        }
    }
}

use crate::plan::Plan;
use std::collections::HashMap;

/// Prepared statement cache entry
#[derive(Debug, Clone)]
pub struct PreparedPlan {
    pub plan: Plan,
    pub param_count: usize,
}

/// Per-session cache of named prepared plans (PREPARE / EXECUTE / DEALLOCATE)
#[derive(Debug, Default)]
pub struct PreparedCache {
    statements: HashMap<String, PreparedPlan>,
}

impl PreparedCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a prepared plan, replacing any previous one with the same name
    pub fn add_statement(&mut self, name: &str, plan: Plan) {
        let param_count = plan.param_count();
        self.statements
            .insert(name.to_lowercase(), PreparedPlan { plan, param_count });
    }

    /// Get a prepared plan by name
    #[must_use]
    pub fn get_statement(&self, name: &str) -> Option<&PreparedPlan> {
        self.statements.get(&name.to_lowercase())
    }

    /// Remove a prepared plan
    pub fn remove_statement(&mut self, name: &str) -> bool {
        self.statements.remove(&name.to_lowercase()).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn clear(&mut self) {
        self.statements.clear();
    }
}

use std::{collections::HashMap, env::VarError, sync::Arc};

use tokio::sync::Mutex;

use crate::ArcStr;

/// In-memory variables standing in for the process environment.
#[derive(Debug, Clone, Default)]
pub struct Mock {
    variables: Arc<Mutex<HashMap<ArcStr, ArcStr>>>,
}

impl Mock {
    pub fn with_variables(variables: HashMap<ArcStr, ArcStr>) -> Self {
        Self {
            variables: Arc::new(Mutex::new(variables)),
        }
    }

    pub async fn env(&self, key: &str) -> Result<ArcStr, VarError> {
        self.variables
            .lock()
            .await
            .get(key)
            .cloned()
            .ok_or(VarError::NotPresent)
    }
}

use quarry_core::driver::Compiled;
use std::sync::{Arc, Mutex};

/// Statements a test's `Db` ran, oldest first.
pub struct ExecLog {
    statements: Arc<Mutex<Vec<Compiled>>>,
}

impl ExecLog {
    pub(crate) fn new(statements: Arc<Mutex<Vec<Compiled>>>) -> Self {
        Self { statements }
    }

    pub fn len(&self) -> usize {
        self.statements.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.lock().unwrap().is_empty()
    }

    /// SQL text of every statement run so far.
    pub fn sql(&self) -> Vec<String> {
        self.statements
            .lock()
            .unwrap()
            .iter()
            .map(|compiled| compiled.sql.clone())
            .collect()
    }

    /// Removes and returns the oldest statement.
    #[track_caller]
    pub fn pop(&self) -> Compiled {
        let mut statements = self.statements.lock().unwrap();
        assert!(!statements.is_empty(), "no statements were run");
        statements.remove(0)
    }

    pub fn clear(&self) {
        self.statements.lock().unwrap().clear();
    }
}

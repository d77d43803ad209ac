/// Row-level locking requested for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Lock {
    pub mode: LockMode,
    pub wait: LockWait,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockMode {
    /// `FOR UPDATE`
    Update,

    /// `FOR SHARE`
    Share,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockWait {
    Wait,
    NoWait,
    SkipLocked,
}

impl Lock {
    pub fn update() -> Self {
        Self {
            mode: LockMode::Update,
            wait: LockWait::Wait,
        }
    }

    pub fn share() -> Self {
        Self {
            mode: LockMode::Share,
            wait: LockWait::Wait,
        }
    }

    pub fn nowait(self) -> Self {
        Self {
            wait: LockWait::NoWait,
            ..self
        }
    }

    pub fn skip_locked(self) -> Self {
        Self {
            wait: LockWait::SkipLocked,
            ..self
        }
    }
}

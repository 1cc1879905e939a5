use std::process::ExitCode;

/// Status decided by the command dispatcher, turned into the process exit code as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Success,
    Failure,
    Usage,
}
impl Outcome {
    pub fn status(&self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Failure => 1,
            Self::Usage => 2,
        }
    }
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.status())
    }
}
impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        outcome.exit_code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status() {
        assert_eq!(Outcome::Success.status(), 0);
        assert_eq!(Outcome::Failure.status(), 1);
        assert_eq!(Outcome::Usage.status(), 2);
        assert!(Outcome::Success.is_success());
        assert!(!Outcome::Usage.is_success());
    }
}

use std::{
    collections::HashMap,
    ffi::OsString,
    io::{Stderr, Stdout},
};

/// Process context handed to the command dispatcher: arguments, environment and standard streams.
#[derive(Debug)]
pub struct Invocation<O, E> {
    pub args: Vec<OsString>,
    pub env: HashMap<String, String>,
    pub stdout: O,
    pub stderr: E,
}

impl Invocation<Stdout, Stderr> {
    /// Captures the context of the running process. Variables that are not unicode are left out.
    pub fn process() -> Self {
        let env = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        Self::new(std::env::args_os(), env, std::io::stdout(), std::io::stderr())
    }
}

impl<O, E> Invocation<O, E> {
    pub fn new<I, A>(args: I, env: HashMap<String, String>, stdout: O, stderr: E) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        Self { args: args.into_iter().map(Into::into).collect(), env, stdout, stderr }
    }

    pub fn var(&self, name: &str) -> Option<&str> {
        self.env.get(name).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_invocation() {
        let env = [("VESPA_CLI_HOME".to_string(), "/tmp/vespa".to_string())].into_iter().collect();
        let invocation = Invocation::new(["vespa", "version"], env, Vec::<u8>::new(), Vec::<u8>::new());
        assert_eq!(invocation.args, [OsString::from("vespa"), OsString::from("version")]);
        assert_eq!(invocation.var("VESPA_CLI_HOME"), Some("/tmp/vespa"));
        assert_eq!(invocation.var("HOME"), None);
    }

    #[test]
    fn test_process_invocation() {
        let invocation = Invocation::process();
        assert!(!invocation.args.is_empty());
    }
}

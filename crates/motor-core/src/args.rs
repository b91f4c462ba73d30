/// Raw process arguments.
///
/// The orchestrator stores them verbatim and never interprets them; modules
/// read them through [`crate::context::AppContext`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessArgs {
    args: Vec<String>,
}

impl ProcessArgs {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Capture the arguments of the running process.
    ///
    /// Arguments that are not valid unicode are converted lossily.
    pub fn from_env() -> Self {
        Self::new(std::env::args_os().map(|a| a.to_string_lossy().into_owned()))
    }

    /// Number of arguments, including the program name.
    pub fn argc(&self) -> usize {
        self.args.len()
    }

    /// Argument at `index`, or `None` past the end.
    pub fn argv(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.args.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argv_in_range_returns_exact_string() {
        let args = ProcessArgs::new(["motor", "--map", "iso walk.tmx"]);
        assert_eq!(args.argc(), 3);
        assert_eq!(args.argv(0), Some("motor"));
        assert_eq!(args.argv(2), Some("iso walk.tmx"));
    }

    #[test]
    fn argv_out_of_range_is_none() {
        let args = ProcessArgs::new(["motor"]);
        assert_eq!(args.argv(1), None);
        assert_eq!(args.argv(usize::MAX), None);
        assert_eq!(ProcessArgs::default().argv(0), None);
    }

    #[test]
    fn from_env_includes_program_name() {
        let args = ProcessArgs::from_env();
        assert!(args.argc() >= 1);
        assert!(args.argv(0).is_some());
    }

    #[test]
    fn iter_preserves_order() {
        let args = ProcessArgs::new(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(args.iter().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}

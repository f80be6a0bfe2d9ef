//! The script path and pass-through arguments of one launcher run.

use crate::error::LaunchError;

/// Interpreter flag that makes PowerShell run a script file.
pub const FILE_FLAG: &str = "-file";

/// Script path plus the arguments forwarded to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub script: String,
    pub script_args: Vec<String>,
}

impl Invocation {
    /// Build from the raw argument list: the first entry is the script, the rest belong to it.
    ///
    /// # Errors
    /// Returns [`LaunchError::MissingScript`] when `args` is empty.
    pub fn from_args(args: Vec<String>) -> Result<Self, LaunchError> {
        let mut args = args.into_iter();
        let script = args.next().ok_or(LaunchError::MissingScript)?;
        Ok(Self {
            script,
            script_args: args.collect(),
        })
    }

    /// Arguments handed to the interpreter, one entry per argument.
    #[must_use]
    pub fn interpreter_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(self.script_args.len() + 2);
        args.push(FILE_FLAG.to_string());
        args.push(self.script.clone());
        args.extend(self.script_args.iter().cloned());
        args
    }

    /// Single-string form used in error messages and logs: `-file <script> "a" "b c"`.
    ///
    /// Arguments are wrapped in double quotes without escaping, so an embedded quote
    /// makes this string ambiguous. The child never sees it.
    #[must_use]
    pub fn command_line(&self) -> String {
        let mut line = format!("{FILE_FLAG} {}", self.script);
        if !self.script_args.is_empty() {
            let quoted: Vec<String> = self
                .script_args
                .iter()
                .map(|arg| format!("\"{arg}\""))
                .collect();
            line.push(' ');
            line.push_str(&quoted.join(" "));
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invocation(args: &[&str]) -> Invocation {
        Invocation::from_args(args.iter().map(|s| (*s).to_string()).collect())
            .unwrap_or_else(|e| panic!("unexpected error: {e}"))
    }

    #[test]
    fn test_empty_args_is_missing_script() {
        assert!(matches!(
            Invocation::from_args(Vec::new()),
            Err(LaunchError::MissingScript)
        ));
    }

    #[test]
    fn test_command_line_script_only() {
        assert_eq!(invocation(&["script.ps1"]).command_line(), "-file script.ps1");
    }

    #[test]
    fn test_command_line_quotes_each_argument() {
        assert_eq!(
            invocation(&["script.ps1", "a", "b c"]).command_line(),
            r#"-file script.ps1 "a" "b c""#
        );
    }

    #[test]
    fn test_command_line_keeps_empty_argument() {
        assert_eq!(
            invocation(&["script.ps1", ""]).command_line(),
            r#"-file script.ps1 """#
        );
    }

    #[test]
    fn test_script_path_is_not_quoted() {
        assert_eq!(
            invocation(&["C:\\Sensors\\my check.ps1"]).command_line(),
            "-file C:\\Sensors\\my check.ps1"
        );
    }

    #[test]
    fn test_interpreter_args_are_discrete() {
        assert_eq!(
            invocation(&["script.ps1", "-Host", "b c"]).interpreter_args(),
            vec!["-file", "script.ps1", "-Host", "b c"]
        );
    }
}

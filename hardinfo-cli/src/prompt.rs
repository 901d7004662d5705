//! Terminal confirmation for missing module dependencies

use hardinfo_module_runtime::DependencyPrompt;
use std::cell::RefCell;
use std::io::{self, BufRead, Write};

/// Asks on a terminal whether a dependency may be loaded
///
/// Anything but an answer starting with `y` declines, including end of input.
pub(crate) struct TerminalPrompt<R, W> {
    input: RefCell<R>,
    output: RefCell<W>,
}

impl TerminalPrompt<io::StdinLock<'static>, io::Stderr> {
    /// Prompt on stderr, read answers from stdin
    pub(crate) fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub(crate) fn new(input: R, output: W) -> Self {
        Self {
            input: RefCell::new(input),
            output: RefCell::new(output),
        }
    }

    fn ask(&self, question: &str) -> io::Result<bool> {
        let mut output = self.output.borrow_mut();
        write!(output, "{question} [y/N] ")?;
        output.flush()?;

        let mut answer = String::new();
        self.input.borrow_mut().read_line(&mut answer)?;

        Ok(matches!(answer.trim_start().chars().next(), Some('y' | 'Y')))
    }
}

impl<R: BufRead, W: Write> DependencyPrompt for TerminalPrompt<R, W> {
    fn confirm(&self, module: &str, dependency: &str) -> bool {
        let question = format!("Module \"{module}\" depends on module \"{dependency}\", load it?");

        self.ask(&question).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Cannot read answer, declining");
            false
        })
    }
}

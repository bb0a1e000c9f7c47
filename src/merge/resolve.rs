//! Conflict resolution: run-scoped policy plus pluggable prompt strategies.
//!
//! A conflict is an existing destination file whose content differs from the
//! source.  [`ConflictResolver`] turns each conflict into a [`Decision`],
//! either straight from its [`ResolutionPolicy`] or by asking a [`Prompt`].
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::compare::DiffResult;
use crate::logging::terminal_columns;

/// What to do with one conflicting destination file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Copy the source over the destination.
    Overwrite,
    /// Leave the destination untouched.
    Skip,
    /// Stop the whole run.
    Abort,
}

/// Run-scoped conflict policy.
///
/// Moves from `Undetermined` to `OverrideAll` at most once and never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolutionPolicy {
    /// Ask about every conflict.
    #[default]
    Undetermined,
    /// Overwrite every conflict without asking.
    OverrideAll,
}

/// An operator answer to the overwrite prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// `y` / `yes`: overwrite this file.
    Yes,
    /// `n` / `no`: keep this file.
    No,
    /// `a` / `all`: overwrite this and every later conflict.
    All,
    /// `q` / `quit`: cancel the run.
    Quit,
}

impl Choice {
    /// Parse an answer, case-insensitively, accepting the letter or the word.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "y" | "yes" => Some(Self::Yes),
            "n" | "no" => Some(Self::No),
            "a" | "all" => Some(Self::All),
            "q" | "quit" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Source of answers for conflicts the policy does not settle.
pub trait Prompt {
    /// Ask what to do with `dest`, given how it differs from the source.
    ///
    /// # Errors
    ///
    /// Returns an error if the answer cannot be obtained.
    fn ask(&mut self, dest: &Path, diff: &DiffResult) -> io::Result<Choice>;
}

/// Interactive prompt over a line-based reader and writer.
///
/// Shows the diff, then reads lines until one parses as a [`Choice`].  End of
/// input counts as [`Choice::Quit`].
#[derive(Debug)]
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompt<io::StdinLock<'static>, io::Stdout> {
    /// Prompt on the process's standard input and output.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    /// Prompt reading from `input` and writing to `output`.
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Consume the prompt, returning the writer.
    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Prompt for TerminalPrompt<R, W> {
    fn ask(&mut self, dest: &Path, diff: &DiffResult) -> io::Result<Choice> {
        let rule = "-".repeat(terminal_columns().min(72));
        writeln!(
            self.output,
            "\x1b[33mWarning: File '{}' already exists.\x1b[0m",
            dest.display()
        )?;
        writeln!(self.output, "--- Diff ---")?;
        writeln!(self.output, "{}", diff.text().trim_end())?;
        writeln!(self.output, "{rule}")?;

        loop {
            write!(self.output, "Overwrite? [y]es, [n]o, [a]ll, [q]uit: ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                return Ok(Choice::Quit);
            }
            if let Some(choice) = Choice::parse(&line) {
                return Ok(choice);
            }
            writeln!(self.output, "Please answer y, n, a, or q.")?;
        }
    }
}

/// Prompt that gives the same answer every time.
#[derive(Debug, Clone, Copy)]
pub struct FixedPrompt(pub Choice);

impl Prompt for FixedPrompt {
    fn ask(&mut self, _dest: &Path, _diff: &DiffResult) -> io::Result<Choice> {
        Ok(self.0)
    }
}

/// Shared record of every destination a prompt was asked about.
#[derive(Debug, Clone, Default)]
pub struct PromptTranscript(Arc<Mutex<Vec<PathBuf>>>);

impl PromptTranscript {
    fn push(&self, path: &Path) {
        if let Ok(mut guard) = self.0.lock() {
            guard.push(path.to_path_buf());
        }
    }

    /// Paths asked about, in order.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.0.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Number of prompts issued.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.lock().map_or(0, |g| g.len())
    }

    /// Whether no prompt was issued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Prompt that replays a fixed sequence of answers.
///
/// Lets the merge engine run headless; running out of answers is an error.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<Choice>,
    transcript: PromptTranscript,
}

impl ScriptedPrompt {
    /// Answer with `answers`, in order.
    #[must_use]
    pub fn new(answers: impl IntoIterator<Item = Choice>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            transcript: PromptTranscript::default(),
        }
    }

    /// Handle that observes which paths were asked about.
    #[must_use]
    pub fn transcript(&self) -> PromptTranscript {
        self.transcript.clone()
    }
}

impl Prompt for ScriptedPrompt {
    fn ask(&mut self, dest: &Path, _diff: &DiffResult) -> io::Result<Choice> {
        self.transcript.push(dest);
        self.answers.pop_front().ok_or_else(|| {
            io::Error::other(format!("no scripted answer left for {}", dest.display()))
        })
    }
}

/// Turns conflicts into decisions for one install run.
///
/// Owns the run's [`ResolutionPolicy`]; the merger passes it by `&mut`
/// through every recursive call so an "all" answer reaches every later
/// conflict, including those of components processed afterwards.
pub struct ConflictResolver {
    policy: ResolutionPolicy,
    prompt: Box<dyn Prompt>,
}

impl std::fmt::Debug for ConflictResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConflictResolver")
            .field("policy", &self.policy)
            .field("prompt", &"<dyn Prompt>")
            .finish()
    }
}

impl ConflictResolver {
    /// Resolver that starts out asking `prompt` about every conflict.
    #[must_use]
    pub fn new(prompt: Box<dyn Prompt>) -> Self {
        Self::with_policy(ResolutionPolicy::Undetermined, prompt)
    }

    /// Resolver starting from an explicit policy.
    #[must_use]
    pub fn with_policy(policy: ResolutionPolicy, prompt: Box<dyn Prompt>) -> Self {
        Self { policy, prompt }
    }

    /// Current policy.
    #[must_use]
    pub const fn policy(&self) -> ResolutionPolicy {
        self.policy
    }

    /// Decide what to do with the conflicting file `dest`.
    ///
    /// # Errors
    ///
    /// Returns an error if the prompt cannot produce an answer.
    pub fn resolve(&mut self, dest: &Path, diff: &DiffResult) -> io::Result<Decision> {
        if self.policy == ResolutionPolicy::OverrideAll {
            return Ok(Decision::Overwrite);
        }
        Ok(match self.prompt.ask(dest, diff)? {
            Choice::Yes => Decision::Overwrite,
            Choice::No => Decision::Skip,
            Choice::All => {
                self.policy = ResolutionPolicy::OverrideAll;
                Decision::Overwrite
            }
            Choice::Quit => Decision::Abort,
        })
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn diff() -> DiffResult {
        DiffResult::different("-Y\n+X\n")
    }

    fn terminal(input: &str) -> TerminalPrompt<Cursor<Vec<u8>>, Vec<u8>> {
        TerminalPrompt::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn parse_accepts_letters_and_words_in_any_case() {
        assert_eq!(Choice::parse("y"), Some(Choice::Yes));
        assert_eq!(Choice::parse("YES"), Some(Choice::Yes));
        assert_eq!(Choice::parse("No\n"), Some(Choice::No));
        assert_eq!(Choice::parse(" a "), Some(Choice::All));
        assert_eq!(Choice::parse("All"), Some(Choice::All));
        assert_eq!(Choice::parse("q"), Some(Choice::Quit));
        assert_eq!(Choice::parse("QUIT"), Some(Choice::Quit));
    }

    #[test]
    fn parse_rejects_other_input() {
        assert_eq!(Choice::parse(""), None);
        assert_eq!(Choice::parse("yep"), None);
        assert_eq!(Choice::parse("x"), None);
    }

    #[test]
    fn terminal_prompt_shows_diff_and_reprompts_on_invalid_input() {
        let mut prompt = terminal("maybe\n\nN\n");
        let choice = prompt.ask(Path::new("/dest/CLAUDE.md"), &diff()).unwrap();
        assert_eq!(choice, Choice::No);

        let output = String::from_utf8(prompt.into_output()).unwrap();
        assert!(output.contains("File '/dest/CLAUDE.md' already exists."));
        assert!(output.contains("--- Diff ---\n-Y\n+X\n"));
        assert_eq!(output.matches("Overwrite? [y]es, [n]o, [a]ll, [q]uit: ").count(), 3);
        assert_eq!(output.matches("Please answer y, n, a, or q.").count(), 2);
    }

    #[test]
    fn terminal_prompt_treats_end_of_input_as_quit() {
        let mut prompt = terminal("");
        let choice = prompt.ask(Path::new("/dest/a"), &diff()).unwrap();
        assert_eq!(choice, Choice::Quit);
    }

    #[test]
    fn yes_and_no_apply_to_one_entry_only() {
        let mut resolver =
            ConflictResolver::new(Box::new(ScriptedPrompt::new([Choice::Yes, Choice::No])));
        assert_eq!(
            resolver.resolve(Path::new("a"), &diff()).unwrap(),
            Decision::Overwrite
        );
        assert_eq!(resolver.policy(), ResolutionPolicy::Undetermined);
        assert_eq!(
            resolver.resolve(Path::new("b"), &diff()).unwrap(),
            Decision::Skip
        );
        assert_eq!(resolver.policy(), ResolutionPolicy::Undetermined);
    }

    #[test]
    fn all_switches_policy_and_stops_prompting() {
        let prompt = ScriptedPrompt::new([Choice::All]);
        let transcript = prompt.transcript();
        let mut resolver = ConflictResolver::new(Box::new(prompt));

        for name in ["a", "b", "c"] {
            assert_eq!(
                resolver.resolve(Path::new(name), &diff()).unwrap(),
                Decision::Overwrite
            );
        }
        assert_eq!(resolver.policy(), ResolutionPolicy::OverrideAll);
        assert_eq!(transcript.paths(), vec![PathBuf::from("a")]);
    }

    #[test]
    fn quit_aborts() {
        let mut resolver = ConflictResolver::new(Box::new(FixedPrompt(Choice::Quit)));
        assert_eq!(
            resolver.resolve(Path::new("a"), &diff()).unwrap(),
            Decision::Abort
        );
    }

    #[test]
    fn preset_override_all_never_prompts() {
        let prompt = ScriptedPrompt::new([]);
        let transcript = prompt.transcript();
        let mut resolver =
            ConflictResolver::with_policy(ResolutionPolicy::OverrideAll, Box::new(prompt));
        assert_eq!(
            resolver.resolve(Path::new("a"), &diff()).unwrap(),
            Decision::Overwrite
        );
        assert!(transcript.is_empty());
    }

    #[test]
    fn fixed_no_skips_everything() {
        let mut resolver = ConflictResolver::new(Box::new(FixedPrompt(Choice::No)));
        for name in ["a", "b"] {
            assert_eq!(
                resolver.resolve(Path::new(name), &diff()).unwrap(),
                Decision::Skip
            );
        }
    }

    #[test]
    fn exhausted_script_is_an_error() {
        let mut resolver = ConflictResolver::new(Box::new(ScriptedPrompt::new([])));
        let err = resolver.resolve(Path::new("late"), &diff()).unwrap_err();
        assert!(err.to_string().contains("late"));
    }
}

//! Mock terminal pane: a line buffer that answers a few canned commands

/// Prompt glyph echoed in front of each command
pub const PROMPT: &str = "›";

const HELP_HINT: &str = "type \"help\" for available mock commands";

const PNPM_DEV_OUTPUT: &[&str] = &[
    " > web@dev",
    " > next dev",
    "",
    "ready - started server on 0.0.0.0:3000, url: http://localhost:3000",
    "event - compiled client and server successfully",
];

const HELP_OUTPUT: &[&str] = &[
    "Available mock commands:",
    "  • pnpm dev",
    "  • hello",
    "  • clear",
];

const HELLO_OUTPUT: &[&str] = &["Hello, developer 👋", "This is a mock terminal output."];

fn canned_output(command: &str) -> Option<&'static [&'static str]> {
    match command {
        "pnpm dev" => Some(PNPM_DEV_OUTPUT),
        "help" => Some(HELP_OUTPUT),
        "hello" => Some(HELLO_OUTPUT),
        _ => None,
    }
}

/// Output lines plus the command being typed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalPane {
    lines: Vec<String>,
    input: String,
}

impl Default for TerminalPane {
    fn default() -> Self {
        Self {
            lines: vec![
                format!("{} pnpm dev", PROMPT),
                "ready - mock dev server started".to_string(),
            ],
            input: String::new(),
        }
    }
}

impl TerminalPane {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    /// Run the typed input and clear it
    pub fn submit(&mut self) {
        let command = std::mem::take(&mut self.input);
        self.run(&command);
    }

    /// Run a command against the mock shell
    pub fn run(&mut self, command: &str) {
        if command.trim().is_empty() {
            return;
        }

        if command == "clear" {
            self.lines.clear();
            return;
        }

        self.lines.push(format!("{} {}", PROMPT, command));
        match canned_output(command) {
            Some(output) => self.lines.extend(output.iter().map(|line| line.to_string())),
            None => {
                tracing::debug!(command, "Unknown mock terminal command");
                self.lines.push(format!("command not found: {}", command));
                self.lines.push(HELP_HINT.to_string());
            }
        }
    }
}

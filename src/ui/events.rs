use crate::client::ClientError;
use crate::web::models::{SavedRequest, SendResponse};

/// Application-level events
#[derive(Debug)]
pub enum AppEvent {
    /// Terminal input event
    Input(crossterm::event::Event),

    /// Proxy send completed
    SendFinished(Result<SendResponse, ClientError>),

    /// Saved-request creation completed
    RequestSaved(Result<SavedRequest, ClientError>),

    /// Saved-request deletion completed
    RequestDeleted {
        id: u64,
        result: Result<SavedRequest, ClientError>,
    },

    /// Terminal input ended; the shell should exit
    Quit,
}

/// Pane that receives unmodified keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    Sidebar,
    #[default]
    Editor,
    Terminal,
}

impl Focus {
    /// Next pane in tab order, skipping panes that are hidden
    pub fn next(self, sidebar_visible: bool, terminal_open: bool) -> Self {
        let order = [Focus::Sidebar, Focus::Editor, Focus::Terminal];
        let start = order.iter().position(|f| *f == self).unwrap_or(0);
        (1..=order.len())
            .map(|step| order[(start + step) % order.len()])
            .find(|focus| match focus {
                Focus::Sidebar => sidebar_visible,
                Focus::Editor => true,
                Focus::Terminal => terminal_open,
            })
            .unwrap_or(Focus::Editor)
    }
}

/// Text field being edited in the status line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    /// New explorer file under a parent path
    AddFile { parent: Vec<String> },
    /// New explorer folder under a parent path
    AddFolder { parent: Vec<String> },
    /// API client draft url
    DraftUrl,
    /// API client draft body
    DraftBody,
}

impl PromptKind {
    pub fn label(&self) -> &'static str {
        match self {
            PromptKind::AddFile { .. } => "New file",
            PromptKind::AddFolder { .. } => "New folder",
            PromptKind::DraftUrl => "URL",
            PromptKind::DraftBody => "Body",
        }
    }
}

/// Active text prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub input: String,
}

impl Prompt {
    pub fn new(kind: PromptKind, input: impl Into<String>) -> Self {
        Self {
            kind,
            input: input.into(),
        }
    }
}

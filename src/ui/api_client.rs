//! State behind the API client page

use serde_json::Value;

use crate::client::ClientError;
use crate::web::models::{
    DraftError, HttpMethod, NewSavedRequest, RequestDraft, SavedRequest, SendRequest, SendResponse,
};

/// Saved requests, the editable draft and the last response
#[derive(Debug, Clone, Default)]
pub struct ApiClientPage {
    pub draft: RequestDraft,
    requests: Vec<SavedRequest>,
    selected: Option<u64>,
    response: Option<SendResponse>,
    error: Option<String>,
    sending: bool,
}

impl ApiClientPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> &[SavedRequest] {
        &self.requests
    }

    pub fn selected_id(&self) -> Option<u64> {
        self.selected
    }

    pub fn selected(&self) -> Option<&SavedRequest> {
        let id = self.selected?;
        self.requests.iter().find(|r| r.id == id)
    }

    pub fn response(&self) -> Option<&SendResponse> {
        self.response.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_sending(&self) -> bool {
        self.sending
    }

    /// Replace the list from a polled snapshot.
    ///
    /// The first load selects the first request and copies it into the draft.
    pub fn sync_requests(&mut self, data: Option<&Value>) {
        let Some(data) = data else {
            return;
        };
        let requests: Vec<SavedRequest> = match serde_json::from_value(data.clone()) {
            Ok(requests) => requests,
            Err(err) => {
                tracing::warn!(error = %err, "Ignoring malformed saved request list");
                return;
            }
        };

        self.requests = requests;
        if self.selected.is_none() {
            if let Some(first) = self.requests.first() {
                self.selected = Some(first.id);
                self.draft = RequestDraft::from_saved(first);
            }
        }
    }

    /// Move the selection by `step`, wrapping, and load it into the draft
    pub fn select_step(&mut self, step: isize) {
        if self.requests.is_empty() {
            return;
        }
        let len = self.requests.len() as isize;
        let current = self
            .selected
            .and_then(|id| self.requests.iter().position(|r| r.id == id))
            .map(|i| i as isize)
            .unwrap_or(-1);
        let next = (current + step).rem_euclid(len) as usize;
        let request = &self.requests[next];
        self.selected = Some(request.id);
        self.draft = RequestDraft::from_saved(request);
    }

    /// Cycle the draft's method through GET, POST, PUT, DELETE
    pub fn cycle_method(&mut self) {
        let current = self.draft.method.parse::<HttpMethod>().ok();
        let index = current
            .and_then(|m| HttpMethod::ALL.iter().position(|x| *x == m))
            .map(|i| (i + 1) % HttpMethod::ALL.len())
            .unwrap_or(0);
        self.draft.method = HttpMethod::ALL[index].as_str().to_string();
    }

    /// Payload for saving the current draft
    pub fn new_saved_request(&self) -> Result<NewSavedRequest, DraftError> {
        let request = self.draft.validate()?;
        Ok(NewSavedRequest {
            name: None,
            method: request.method,
            url: request.url,
        })
    }

    /// Record a request the server accepted
    pub fn apply_saved(&mut self, saved: SavedRequest) {
        self.selected = Some(saved.id);
        self.requests.insert(0, saved);
    }

    /// Record a deletion the server confirmed
    pub fn apply_deleted(&mut self, id: u64) {
        self.requests.retain(|r| r.id != id);
        if self.selected == Some(id) {
            self.selected = None;
        }
    }

    /// Validate the draft and mark a send in flight.
    ///
    /// Invalid drafts are reported on the page and nothing is sent.
    pub fn begin_send(&mut self) -> Option<SendRequest> {
        if self.sending {
            return None;
        }
        self.response = None;
        match self.draft.validate() {
            Ok(request) => {
                self.error = None;
                self.sending = true;
                Some(request)
            }
            Err(err) => {
                self.error = Some(err.to_string());
                None
            }
        }
    }

    pub fn finish_send(&mut self, result: Result<SendResponse, ClientError>) {
        self.sending = false;
        match result {
            Ok(response) => {
                self.error = if response.success {
                    None
                } else {
                    Some(
                        response
                            .error
                            .clone()
                            .unwrap_or_else(|| "Request failed".to_string()),
                    )
                };
                self.response = Some(response);
            }
            Err(err) => {
                tracing::warn!(error = %err, "Send failed");
                self.error = Some(err.to_string());
            }
        }
    }

    /// Report a failed save or delete
    pub fn report_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }
}

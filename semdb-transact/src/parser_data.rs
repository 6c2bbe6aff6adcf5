//! Parser data
//!
//! The document-processing side of an update: owns the container for the
//! page being parsed, mirrors it into the parse result, and hands a detached
//! snapshot to the dispatcher when the store should be updated.

use crate::dispatch::{DispatchContext, DispatchReport, DispatchState, UpdateDispatcher};
use crate::output::ParserOutput;
use semdb_core::{DataValue, SemanticData, Subject};
use tracing::{debug, warn};

#[derive(Debug)]
pub struct ParserData {
    subject: Subject,
    output: ParserOutput,
    data: SemanticData,
    errors: Vec<String>,
    update_jobs: bool,
    dispatcher: Option<UpdateDispatcher>,
    last_report: Option<DispatchReport>,
}

impl ParserData {
    /// Start from a parse result, reusing its container when it belongs to
    /// `subject`
    pub fn new(subject: Subject, output: ParserOutput) -> Self {
        let data = output.semantic_data_or_default(&subject);
        Self {
            subject,
            output,
            data,
            errors: Vec::new(),
            update_jobs: true,
            dispatcher: None,
            last_report: None,
        }
    }

    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    pub fn data(&self) -> &SemanticData {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut SemanticData {
        &mut self.data
    }

    pub fn output(&self) -> &ParserOutput {
        &self.output
    }

    /// Consume, returning the parse result with the container attached
    pub fn into_output(mut self) -> ParserOutput {
        self.update_output();
        self.output
    }

    /// Replace the container with an empty one for the same subject
    pub fn clear_data(&mut self) {
        self.data = SemanticData::new(self.subject.clone());
    }

    /// Copy the container into the parse result
    pub fn update_output(&mut self) {
        self.output.set_semantic_data(self.data.clone());
    }

    /// Add an interpreted annotation value
    pub fn add_property_value(&mut self, value: &DataValue) -> bool {
        self.data.add_property_value(value)
    }

    /// Record a processing error not tied to a value
    pub fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    /// Processing errors followed by value errors
    pub fn errors(&self) -> Vec<&str> {
        self.errors
            .iter()
            .map(String::as_str)
            .chain(self.data.errors())
            .collect()
    }

    /// Force synchronous store writes (set when running inside a job)
    pub fn disable_update_jobs(&mut self) {
        self.update_jobs = false;
    }

    pub fn update_jobs_enabled(&self) -> bool {
        self.update_jobs
    }

    pub fn set_dispatcher(&mut self, dispatcher: UpdateDispatcher) {
        self.dispatcher = Some(dispatcher);
    }

    /// Report of the most recent `update_store` call
    pub fn last_report(&self) -> Option<&DispatchReport> {
        self.last_report.as_ref()
    }

    /// Notify the dispatcher that the store should reflect this page
    ///
    /// Returns whether observers were notified; it does not wait for a
    /// deferred write. Observer failures are available from
    /// [`last_report`](Self::last_report).
    pub async fn update_store(&mut self) -> bool {
        self.dispatch(DispatchState::RunStoreUpdater).await
    }

    /// Notify the dispatcher that the page was deleted
    pub async fn delete_from_store(&mut self) -> bool {
        self.dispatch(DispatchState::RunStoreDelete).await
    }

    async fn dispatch(&mut self, state: DispatchState) -> bool {
        let Some(dispatcher) = &self.dispatcher else {
            warn!(subject = %self.subject, state = %state, "no dispatcher registered");
            return false;
        };
        let ctx = DispatchContext::new(self.data.snapshot(), self.update_jobs);
        let report = dispatcher.dispatch(state, &ctx).await;
        debug!(
            subject = %self.subject,
            succeeded = report.succeeded,
            failed = report.failures.len(),
            "dispatch finished"
        );
        self.last_report = Some(report);
        true
    }

    /// Inline error markers for the rendered page
    ///
    /// Empty when there are no errors.
    pub fn render_errors(&self) -> String {
        let errors = self.errors();
        if errors.is_empty() {
            return String::new();
        }
        let items: Vec<String> = errors
            .iter()
            .map(|e| format!("<li>{}</li>", escape_html(e)))
            .collect();
        format!(
            "<span class=\"smw-highlighter\" data-type=\"error\"><ul>{}</ul></span>",
            items.concat()
        )
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

//! In-memory fakes shared by the unit tests.

use crate::api::{RawResponse, Transport, TransportError};
use crate::menu::{Console, Input};
use crate::report::{ClubReport, ReportSink};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

type Reply = Result<RawResponse, TransportError>;

/// Transport answering from a per-URL script.
///
/// Each URL holds a queue of replies; the last reply repeats once the queue
/// is down to one entry. Unknown URLs fail like a refused connection.
#[derive(Default)]
pub struct FakeTransport {
    routes: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: Mutex<Vec<String>>,
    hooks: Mutex<HashMap<String, Arc<Notify>>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(self, url: &str, body: &str) -> Self {
        self.respond(url, 200, body)
    }

    pub fn respond(self, url: &str, status: u16, body: &str) -> Self {
        let status = StatusCode::from_u16(status).unwrap();
        self.push(url, Ok(RawResponse::new(status, body)))
    }

    pub fn fail(self, url: &str, reason: &str) -> Self {
        self.push(url, Err(TransportError(reason.to_string())))
    }

    /// Signal `notify` every time `url` is requested
    pub fn notify_on(self, url: &str, notify: Arc<Notify>) -> Self {
        self.hooks.lock().unwrap().insert(url.to_string(), notify);
        self
    }

    fn push(self, url: &str, reply: Reply) -> Self {
        self.routes
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    /// Number of requests made for `url`
    pub fn calls(&self, url: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|u| *u == url).count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn get(&self, url: &str) -> Result<RawResponse, TransportError> {
        self.calls.lock().unwrap().push(url.to_string());
        if let Some(notify) = self.hooks.lock().unwrap().get(url) {
            notify.notify_one();
        }

        let mut routes = self.routes.lock().unwrap();
        let Some(queue) = routes.get_mut(url) else {
            return Err(TransportError(format!("connection refused: {}", url)));
        };

        if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue.front().cloned().unwrap()
        }
    }
}

/// Sink that keeps everything it is given
#[derive(Default)]
pub struct CollectingSink {
    pub reports: Mutex<Vec<ClubReport>>,
    pub diagnostics: Mutex<Vec<String>>,
}

impl CollectingSink {
    pub fn reports(&self) -> Vec<ClubReport> {
        self.reports.lock().unwrap().clone()
    }

    pub fn diagnostics(&self) -> Vec<String> {
        self.diagnostics.lock().unwrap().clone()
    }
}

impl ReportSink for CollectingSink {
    fn club(&self, report: &ClubReport) {
        self.reports.lock().unwrap().push(report.clone());
    }

    fn diagnostic(&self, message: &str) {
        self.diagnostics.lock().unwrap().push(message.to_string());
    }
}

/// Console replaying scripted input and recording output.
///
/// Running out of script reads as a closed stdin. Ctrl-C outside a prompt
/// fires only when a trigger is set and signalled.
#[derive(Default)]
pub struct ScriptedConsole {
    pub inputs: VecDeque<Input>,
    pub prompts: Vec<String>,
    pub output: Vec<String>,
    pub clears: usize,
    pub interrupt: Option<Arc<Notify>>,
}

impl ScriptedConsole {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inputs: lines.into_iter().map(|l| Input::Line(l.into())).collect(),
            ..Default::default()
        }
    }

    pub fn then(mut self, input: Input) -> Self {
        self.inputs.push_back(input);
        self
    }

    /// Resolve `interrupted` once `trigger` is signalled
    pub fn interrupt_on(mut self, trigger: Arc<Notify>) -> Self {
        self.interrupt = Some(trigger);
        self
    }

    pub fn printed(&self, needle: &str) -> bool {
        self.output.iter().any(|line| line.contains(needle))
    }
}

#[async_trait]
impl Console for ScriptedConsole {
    async fn read_line(&mut self, prompt: &str) -> io::Result<Input> {
        self.prompts.push(prompt.to_string());
        Ok(self.inputs.pop_front().unwrap_or(Input::Closed))
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.output.push(line.to_string());
        Ok(())
    }

    fn clear(&mut self) -> io::Result<()> {
        self.clears += 1;
        Ok(())
    }

    async fn interrupted(&mut self) {
        match self.interrupt.clone() {
            Some(trigger) => trigger.notified().await,
            None => std::future::pending::<()>().await,
        }
    }
}

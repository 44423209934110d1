//! Shared mock infrastructure for unit tests.
//!
//! [`FakePlatform`] keeps per-instance state the way a broker would, so the
//! lifecycle and scenario tests can assert on what is left behind.

#![allow(dead_code, clippy::expect_used)]

use std::collections::{BTreeMap, BTreeSet};
use std::process::{ExitStatus, Output};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use mits_cli::application::ports::{
    CreateServiceRequest, HealthProbe, ProgressReporter, ServiceBindings, ServiceInspector,
    ServiceKeys, ServiceLifecycle,
};

// ── Output helpers ────────────────────────────────────────────────────────────

#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    #[allow(clippy::cast_sign_loss)]
    ExitStatus::from_raw(code as u32)
}

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn err_output(stderr: &str) -> Output {
    Output {
        status: exit_status(1),
        stdout: Vec::new(),
        stderr: stderr.as_bytes().to_vec(),
    }
}

// ── Fake platform ─────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct FakeInstance {
    class: String,
    parameters: Option<String>,
    pending_polls: u32,
    keys: BTreeSet<String>,
    bindings: BTreeSet<String>,
}

#[derive(Default)]
struct State {
    instances: BTreeMap<String, FakeInstance>,
    calls: Vec<String>,
}

/// In-memory broker behind the `cf` gateway ports.
///
/// New instances report `create in progress` for `pending_polls` polls, then
/// `create succeeded`. Deleted instances disappear, so `cf service` fails.
#[derive(Default)]
pub struct FakePlatform {
    state: Mutex<State>,
    pending_polls: u32,
    failing_classes: BTreeSet<String>,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Instances report progress this many times before succeeding.
    pub fn with_pending_polls(mut self, polls: u32) -> Self {
        self.pending_polls = polls;
        self
    }

    /// `cf create-service` for `class` is rejected by the broker.
    pub fn failing_class(mut self, class: &str) -> Self {
        self.failing_classes.insert(class.to_string());
        self
    }

    /// Names of instances that still exist.
    pub fn live_instances(&self) -> Vec<String> {
        self.lock().instances.keys().cloned().collect()
    }

    /// Keys still issued against any instance.
    pub fn live_keys(&self) -> usize {
        self.lock().instances.values().map(|i| i.keys.len()).sum()
    }

    pub fn bindings_of(&self, name: &str) -> Vec<String> {
        self.lock()
            .instances
            .get(name)
            .map(|i| i.bindings.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn parameters_of(&self, name: &str) -> Option<String> {
        self.lock()
            .instances
            .get(name)
            .and_then(|i| i.parameters.clone())
    }

    /// Every call so far, as `"<op> <first arg>"`.
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().expect("fake platform lock")
    }

    fn record(state: &mut State, op: &str, arg: &str) {
        state.calls.push(format!("{op} {arg}"));
    }
}

fn missing(name: &str) -> Output {
    err_output(&format!("Service instance {name} not found\nFAILED"))
}

impl ServiceLifecycle for FakePlatform {
    async fn create_service(&self, req: &CreateServiceRequest<'_>, _: Duration) -> Result<Output> {
        let mut state = self.lock();
        Self::record(&mut state, "create-service", req.name);
        if self.failing_classes.contains(req.class) {
            return Ok(err_output(&format!(
                "Service broker error: plan {} unavailable\nFAILED",
                req.plan
            )));
        }
        state.instances.insert(
            req.name.to_string(),
            FakeInstance {
                class: req.class.to_string(),
                parameters: req.parameters.map(str::to_string),
                pending_polls: self.pending_polls,
                ..FakeInstance::default()
            },
        );
        Ok(ok_output(b"Creating service instance...\nOK\n"))
    }

    async fn delete_service(&self, name: &str, _: Duration) -> Result<Output> {
        let mut state = self.lock();
        Self::record(&mut state, "delete-service", name);
        if state.instances.remove(name).is_some() {
            Ok(ok_output(b"Deleting service...\nOK\n"))
        } else {
            Ok(ok_output(b"Service does not exist.\nOK\n"))
        }
    }
}

impl ServiceInspector for FakePlatform {
    async fn service_guid(&self, name: &str, _: Duration) -> Result<Output> {
        let mut state = self.lock();
        Self::record(&mut state, "service-guid", name);
        if state.instances.contains_key(name) {
            Ok(ok_output(format!("guid-{name}\n").as_bytes()))
        } else {
            Ok(missing(name))
        }
    }

    async fn service_info(&self, name: &str, _: Duration) -> Result<Output> {
        let mut state = self.lock();
        Self::record(&mut state, "service", name);
        let Some(instance) = state.instances.get_mut(name) else {
            return Ok(missing(name));
        };
        let status = if instance.pending_polls > 0 {
            instance.pending_polls -= 1;
            "create in progress"
        } else {
            "create succeeded"
        };
        Ok(ok_output(
            format!(
                "name:            {name}\nservice:         {}\n\nShowing status of last operation:\nstatus:    {status}\n",
                instance.class
            )
            .as_bytes(),
        ))
    }
}

impl ServiceKeys for FakePlatform {
    async fn create_service_key(&self, instance: &str, key: &str, _: Duration) -> Result<Output> {
        let mut state = self.lock();
        Self::record(&mut state, "create-service-key", instance);
        match state.instances.get_mut(instance) {
            Some(i) => {
                i.keys.insert(key.to_string());
                Ok(ok_output(b"OK\n"))
            }
            None => Ok(missing(instance)),
        }
    }

    async fn service_key_guid(&self, instance: &str, key: &str, _: Duration) -> Result<Output> {
        let mut state = self.lock();
        Self::record(&mut state, "service-key-guid", instance);
        match state.instances.get(instance) {
            Some(i) if i.keys.contains(key) => {
                Ok(ok_output(format!("key-{instance}\n").as_bytes()))
            }
            _ => Ok(err_output("No service key found\nFAILED")),
        }
    }

    async fn fetch_service_key(&self, guid: &str, _: Duration) -> Result<Output> {
        let mut state = self.lock();
        Self::record(&mut state, "curl", guid);
        let body = serde_json::json!({
            "metadata": { "guid": guid },
            "entity": {
                "credentials": {
                    "host": "10.0.0.7",
                    "port": 6379,
                    "uri": "redis://10.0.0.7:6379",
                }
            }
        });
        Ok(ok_output(body.to_string().as_bytes()))
    }

    async fn delete_service_key(&self, instance: &str, key: &str, _: Duration) -> Result<Output> {
        let mut state = self.lock();
        Self::record(&mut state, "delete-service-key", instance);
        if let Some(i) = state.instances.get_mut(instance) {
            i.keys.remove(key);
        }
        Ok(ok_output(b"OK\n"))
    }
}

impl ServiceBindings for FakePlatform {
    async fn bind_service(&self, app: &str, instance: &str, _: Duration) -> Result<Output> {
        let mut state = self.lock();
        Self::record(&mut state, "bind-service", instance);
        match state.instances.get_mut(instance) {
            Some(i) => {
                i.bindings.insert(app.to_string());
                Ok(ok_output(b"OK\n"))
            }
            None => Ok(missing(instance)),
        }
    }

    async fn unbind_service(&self, app: &str, instance: &str, _: Duration) -> Result<Output> {
        let mut state = self.lock();
        Self::record(&mut state, "unbind-service", instance);
        if let Some(i) = state.instances.get_mut(instance) {
            i.bindings.remove(app);
        }
        Ok(ok_output(b"OK\n"))
    }
}

// ── Probes and reporters ──────────────────────────────────────────────────────

/// Answers every probe with the same result.
pub struct FixedProbe(pub bool);

impl HealthProbe for FixedProbe {
    async fn check(&self, _: &str, _: Duration) -> Result<bool> {
        Ok(self.0)
    }
}

/// Collects every progress message.
#[derive(Default)]
pub struct RecordingReporter {
    messages: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().expect("reporter lock").clone()
    }

    fn push(&self, kind: &str, message: &str) {
        self.messages
            .lock()
            .expect("reporter lock")
            .push(format!("{kind}: {message}"));
    }
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.push("step", message);
    }
    fn success(&self, message: &str) {
        self.push("success", message);
    }
    fn warn(&self, message: &str) {
        self.push("warn", message);
    }
}

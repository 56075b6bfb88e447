//! End-to-end call session scenarios through the public API

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ringline::{
    AnswerCallAction, CallError, CallEvent, CallId, CallObserver, CallSessionManager,
    CallState, EndCallAction, Handle, ProviderConfiguration, Result, SetHeldCallAction,
    SettingsProvider, SignalingTransport, StartCallAction, SystemCallReporter, TelephonyAdapter,
    VoiceChannel,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct FakeTransport {
    fail_start: AtomicBool,
    fail_answer: AtomicBool,
    ended: Mutex<Vec<CallId>>,
}

#[async_trait]
impl SignalingTransport for FakeTransport {
    async fn start_call(&self, _id: CallId, _handle: Handle, _has_video: bool) -> Result<()> {
        if self.fail_start.load(Ordering::SeqCst) {
            return Err(CallError::Transport("start rejected".to_string()));
        }
        Ok(())
    }

    async fn answer_call(&self, _id: CallId) -> Result<()> {
        if self.fail_answer.load(Ordering::SeqCst) {
            return Err(CallError::Transport("answer rejected".to_string()));
        }
        Ok(())
    }

    async fn end_call(&self, id: CallId) -> Result<()> {
        self.ended.lock().unwrap().push(id);
        Ok(())
    }
}

#[derive(Default)]
struct FakeVoiceChannel {
    left: Mutex<Vec<CallId>>,
}

#[async_trait]
impl VoiceChannel for FakeVoiceChannel {
    async fn leave(&self, id: CallId) {
        self.left.lock().unwrap().push(id);
    }
}

#[derive(Default)]
struct FakeReporter {
    fail_incoming: AtomicBool,
    reported_connecting: Mutex<Vec<CallId>>,
    reported_connected: Mutex<Vec<CallId>>,
}

#[async_trait]
impl SystemCallReporter for FakeReporter {
    async fn report_new_incoming_call(
        &self,
        _id: CallId,
        _handle: Handle,
        _has_video: bool,
    ) -> Result<()> {
        if self.fail_incoming.load(Ordering::SeqCst) {
            return Err(CallError::Reporting("do not disturb".to_string()));
        }
        Ok(())
    }

    async fn report_outgoing_started_connecting(
        &self,
        id: CallId,
        _at: DateTime<Utc>,
    ) -> Result<()> {
        self.reported_connecting.lock().unwrap().push(id);
        Ok(())
    }

    async fn report_outgoing_connected(&self, id: CallId, _at: DateTime<Utc>) -> Result<()> {
        self.reported_connected.lock().unwrap().push(id);
        Ok(())
    }
}

#[derive(Default)]
struct RecordingObserver {
    events: Mutex<Vec<String>>,
}

impl CallObserver for RecordingObserver {
    fn on_call_event(&self, event: &CallEvent) {
        let name = match event {
            CallEvent::Initiated(_) => "initiated",
            CallEvent::Ringing(_) => "ringing",
            CallEvent::Connecting(_) => "connecting",
            CallEvent::Connected(_) => "connected",
            CallEvent::Held(_) => "held",
            CallEvent::Resumed(_) => "resumed",
            CallEvent::Ended(_) => "ended",
        };
        self.events.lock().unwrap().push(name.to_string());
    }
}

struct TestSettings;

impl SettingsProvider for TestSettings {
    fn ringtone_sound(&self) -> Option<String> {
        None
    }

    fn calling_disabled(&self) -> bool {
        false
    }
}

struct Harness {
    manager: Arc<CallSessionManager>,
    adapter: TelephonyAdapter,
    transport: Arc<FakeTransport>,
    voice_channel: Arc<FakeVoiceChannel>,
    reporter: Arc<FakeReporter>,
    observer: Arc<RecordingObserver>,
}

fn harness() -> Harness {
    let transport = Arc::new(FakeTransport::default());
    let voice_channel = Arc::new(FakeVoiceChannel::default());
    let reporter = Arc::new(FakeReporter::default());
    let observer = Arc::new(RecordingObserver::default());

    let manager = Arc::new(CallSessionManager::new(
        ProviderConfiguration::from_settings("Ringline", &TestSettings),
        transport.clone(),
        voice_channel.clone(),
        reporter.clone(),
    ));
    manager.add_observer(observer.clone());

    Harness {
        adapter: TelephonyAdapter::new(manager.clone()),
        manager,
        transport,
        voice_channel,
        reporter,
        observer,
    }
}

#[tokio::test]
async fn outgoing_call_lifecycle_reports_to_the_system() {
    let h = harness();
    let id = CallId::new();

    let (action, receipt) = StartCallAction::new(id, Handle::phone("+1555"), false);
    h.adapter.perform_start(action).await;
    assert_eq!(receipt.await.unwrap(), Ok(()));

    let call = h.manager.call(&id).await.unwrap();
    assert!(matches!(call.state(), CallState::Connecting));
    assert_eq!(h.reporter.reported_connecting.lock().unwrap().as_slice(), &[id]);

    h.manager.handle_connected(id).await;
    let call = h.manager.call(&id).await.unwrap();
    assert!(matches!(call.state(), CallState::Connected));
    assert!(call.connected_at().is_some());
    assert_eq!(h.reporter.reported_connected.lock().unwrap().as_slice(), &[id]);

    let (action, receipt) = EndCallAction::new(id);
    h.adapter.perform_end(action).await;
    assert_eq!(receipt.await.unwrap(), Ok(()));
    assert!(h.manager.call(&id).await.is_none());

    // Teardown towards the transport is best-effort in the background
    for _ in 0..100 {
        if h.transport.ended.lock().unwrap().contains(&id) {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    assert!(h.transport.ended.lock().unwrap().contains(&id));

    let events = h.observer.events.lock().unwrap().clone();
    assert_eq!(events, ["initiated", "connecting", "connected", "ended"]);
}

#[tokio::test]
async fn rejected_incoming_call_leaves_the_conversation() {
    let h = harness();
    h.reporter.fail_incoming.store(true, Ordering::SeqCst);
    let id = CallId::new();

    let result = h
        .adapter
        .report_incoming(id, Handle::email("alice@example.com"), false)
        .await;
    assert!(matches!(result, Err(CallError::Reporting(_))));
    assert!(h.manager.call(&id).await.is_none());
    assert_eq!(h.voice_channel.left.lock().unwrap().as_slice(), &[id]);
}

#[tokio::test]
async fn answered_incoming_call_connects_and_holds() {
    let h = harness();
    let id = CallId::new();

    h.adapter
        .report_incoming(id, Handle::phone("+1555"), true)
        .await
        .unwrap();

    let (action, receipt) = AnswerCallAction::new(id);
    h.adapter.perform_answer(action).await;
    assert_eq!(receipt.await.unwrap(), Ok(()));

    h.adapter.on_audio_activated();
    assert!(h.manager.audio().is_audio_running());

    let (action, receipt) = SetHeldCallAction::new(id, true);
    h.adapter.perform_set_held(action).await;
    assert_eq!(receipt.await.unwrap(), Ok(()));
    assert!(h.manager.call(&id).await.unwrap().is_on_hold());
    assert!(!h.manager.audio().is_audio_running());

    let (action, receipt) = SetHeldCallAction::new(id, false);
    h.adapter.perform_set_held(action).await;
    assert_eq!(receipt.await.unwrap(), Ok(()));
    assert!(!h.manager.call(&id).await.unwrap().is_on_hold());
    assert!(h.manager.audio().is_audio_running());

    let events = h.observer.events.lock().unwrap().clone();
    assert_eq!(events, ["ringing", "connected", "held", "resumed"]);
}

#[tokio::test]
async fn failed_answer_keeps_the_call_ringing() {
    let h = harness();
    let id = CallId::new();

    h.adapter
        .report_incoming(id, Handle::phone("+1555"), false)
        .await
        .unwrap();
    h.transport.fail_answer.store(true, Ordering::SeqCst);

    let (action, receipt) = AnswerCallAction::new(id);
    h.adapter.perform_answer(action).await;
    assert!(matches!(
        receipt.await.unwrap(),
        Err(CallError::Transport(_))
    ));

    // Still ringing; the user may retry the answer
    let call = h.manager.call(&id).await.unwrap();
    assert!(matches!(call.state(), CallState::Connecting));
}

#[tokio::test]
async fn failed_start_surfaces_to_the_action() {
    let h = harness();
    h.transport.fail_start.store(true, Ordering::SeqCst);
    let id = CallId::new();

    let (action, receipt) = StartCallAction::new(id, Handle::phone("+1555"), false);
    h.adapter.perform_start(action).await;
    assert!(matches!(
        receipt.await.unwrap(),
        Err(CallError::Transport(_))
    ));
    assert!(h.manager.call(&id).await.is_none());
}

#[tokio::test]
async fn provider_reset_drops_every_call() {
    let h = harness();
    let a = CallId::new();
    let b = CallId::new();

    let (action, receipt) = StartCallAction::new(a, Handle::phone("+1555"), false);
    h.adapter.perform_start(action).await;
    receipt.await.unwrap().unwrap();
    h.adapter
        .report_incoming(b, Handle::phone("+1666"), false)
        .await
        .unwrap();
    assert_eq!(h.manager.active_calls().await.len(), 2);

    h.adapter.on_reset().await;
    assert!(h.manager.active_calls().await.is_empty());

    let left = h.voice_channel.left.lock().unwrap().clone();
    assert_eq!(left.len(), 2);
    assert!(left.contains(&a) && left.contains(&b));
}

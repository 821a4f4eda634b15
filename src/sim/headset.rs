use std::future::pending;
use std::sync::{Arc, Mutex};
use futures::SinkExt;
use futures::channel::mpsc::Sender;
use log::{debug, info, warn};
use tokio::spawn;
use tokio::sync::Notify;
use tokio::time::{interval, sleep, Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::config::types::{ConnectOutcome, HeadsetConfig};
use crate::device::session::DeviceSession;
use crate::device::types::{ConnectionState, DeviceEvent, SignalQuality};
use crate::sim::signal::{raw_multi, raw_sample, readings};

type SharedState = Arc<Mutex<ConnectionState>>;

struct Connection {
    cancel: CancellationToken,
    start: Arc<Notify>,
}

/**
 * A headset that produces synthetic readings. It behaves like the vendor session object: connect
 * requests resolve asynchronously into state changes, readings only flow after `start()`, and
 * all events are delivered over the channel passed to `new`.
 */
pub struct SimulatedHeadset {
    config: HeadsetConfig,
    sender: Sender<DeviceEvent>,
    state: SharedState,
    session_cancel: CancellationToken,
    connection: Option<Connection>,
    closed: bool,
}

// Moves to `new_state` unless the connection has been cancelled. The check happens under the
// state lock so that a concurrent disconnect() can not be overwritten.
fn transition(state: &SharedState, cancel: &CancellationToken, new_state: ConnectionState) -> bool {
    let mut state = state.lock().expect("Failed to lock headset state");
    if cancel.is_cancelled() {
        return false;
    }

    *state = new_state;
    true
}

async fn emit(sender: &mut Sender<DeviceEvent>, cancel: &CancellationToken, event: DeviceEvent) -> bool {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => false,
        result = sender.send(event) => result.is_ok(),
    }
}

async fn stream_readings(config: HeadsetConfig, raw_mode: bool, mut sender: Sender<DeviceEvent>, cancel: CancellationToken) {
    let mut reading_interval = interval(Duration::from_millis(config.reading_interval_ms.max(1)));
    let mut raw_interval = interval(Duration::from_millis(config.raw_sample_interval_ms.max(1)));
    reading_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    raw_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let low_battery_after = config.low_battery_after_secs;
    let low_battery = async move {
        match low_battery_after {
            Some(secs) => sleep(Duration::from_secs(secs)).await,
            None => pending::<()>().await,
        }
    };
    tokio::pin!(low_battery);
    let mut low_battery_sent = false;

    let mut reading_tick: u64 = 0;
    let mut sample_index: u64 = 0;
    let mut raw_count: i32 = 0;

    'mainloop: loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                break 'mainloop;
            },
            _ = &mut low_battery, if !low_battery_sent => {
                low_battery_sent = true;
                if !emit(&mut sender, &cancel, DeviceEvent::LowBattery).await {
                    break 'mainloop;
                }
            },
            _ = reading_interval.tick() => {
                let r = readings(reading_tick);
                reading_tick += 1;

                let mut events = vec![
                    DeviceEvent::PoorSignal(SignalQuality(r.poor_signal)),
                    DeviceEvent::Attention(r.attention),
                    DeviceEvent::Meditation(r.meditation),
                ];
                if let Some(strength) = r.blink {
                    events.push(DeviceEvent::Blink(strength));
                }
                if config.heart_rate {
                    events.push(DeviceEvent::HeartRate(r.heart_rate));
                }
                if raw_mode {
                    events.push(DeviceEvent::RawCount(raw_count));
                    raw_count = 0;
                }

                for event in events {
                    if !emit(&mut sender, &cancel, event).await {
                        break 'mainloop;
                    }
                }
            },
            _ = raw_interval.tick(), if raw_mode => {
                if !emit(&mut sender, &cancel, DeviceEvent::RawSample(raw_sample(sample_index))).await {
                    break 'mainloop;
                }
                if config.multi_channel {
                    if !emit(&mut sender, &cancel, DeviceEvent::RawMultiSample(raw_multi(sample_index))).await {
                        break 'mainloop;
                    }
                }
                sample_index += 1;
                raw_count = raw_count.saturating_add(1);
            },
        }
    }

    debug!("Simulated headset stopped streaming");
}

async fn run_connection(
    config: HeadsetConfig,
    raw_mode: bool,
    state: SharedState,
    mut sender: Sender<DeviceEvent>,
    cancel: CancellationToken,
    start: Arc<Notify>,
) {
    if !emit(&mut sender, &cancel, DeviceEvent::StateChange(ConnectionState::Connecting)).await {
        return;
    }

    tokio::select! {
        _ = cancel.cancelled() => return,
        _ = sleep(Duration::from_millis(config.connect_delay_ms)) => {},
    }

    let outcome = match config.outcome {
        ConnectOutcome::Connected => ConnectionState::Connected,
        ConnectOutcome::NotFound => ConnectionState::NotFound,
        ConnectOutcome::NotPaired => ConnectionState::NotPaired,
    };

    if !transition(&state, &cancel, outcome) {
        return;
    }
    if !emit(&mut sender, &cancel, DeviceEvent::StateChange(outcome)).await {
        return;
    }
    if outcome != ConnectionState::Connected {
        return;
    }

    tokio::select! {
        _ = cancel.cancelled() => return,
        _ = start.notified() => {},
    }

    info!("Simulated headset streaming (raw mode: {})", raw_mode);
    stream_readings(config, raw_mode, sender, cancel).await;
}

impl SimulatedHeadset {
    /// The headset stops for good when `cancel` is cancelled or `close()` is called.
    pub fn new(config: HeadsetConfig, sender: Sender<DeviceEvent>, cancel: CancellationToken) -> Self {
        SimulatedHeadset {
            config,
            sender,
            state: Arc::new(Mutex::new(ConnectionState::Idle)),
            session_cancel: cancel,
            connection: None,
            closed: false,
        }
    }
}

impl DeviceSession for SimulatedHeadset {
    fn connect(&mut self, raw_mode: bool) {
        if self.closed {
            warn!("Ignoring connect request on a closed headset session");
            return;
        }

        {
            let mut state = self.state.lock().expect("Failed to lock headset state");
            if state.is_busy() {
                debug!("Ignoring connect request, headset is {}", *state);
                return;
            }

            // the previous attempt has reached a final state, its task is done or about to be
            if let Some(previous) = self.connection.take() {
                previous.cancel.cancel();
            }
            *state = ConnectionState::Connecting;
        }

        let cancel = self.session_cancel.child_token();
        let start = Arc::new(Notify::new());

        spawn(run_connection(
            self.config.clone(),
            raw_mode,
            self.state.clone(),
            self.sender.clone(),
            cancel.clone(),
            start.clone(),
        ));

        self.connection = Some(Connection { cancel, start });
    }

    fn start(&mut self) {
        match &self.connection {
            Some(connection) if self.state() == ConnectionState::Connected => {
                connection.start.notify_one();
            },
            _ => debug!("Ignoring start request, headset is {}", self.state()),
        }
    }

    fn disconnect(&mut self) {
        let was_busy = {
            let mut state = self.state.lock().expect("Failed to lock headset state");
            if let Some(connection) = self.connection.take() {
                connection.cancel.cancel();
            }

            if state.is_busy() {
                *state = ConnectionState::Disconnected;
                true
            }
            else {
                false
            }
        };

        if was_busy {
            info!("Simulated headset disconnected");
            if let Err(err) = self.sender.try_send(DeviceEvent::StateChange(ConnectionState::Disconnected)) {
                warn!("Failed to report disconnect: {}", err);
            }
        }
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }

        self.disconnect();
        self.session_cancel.cancel();
        self.sender.close_channel();
        self.closed = true;
    }

    fn state(&self) -> ConnectionState {
        *self.state.lock().expect("Failed to lock headset state")
    }
}

impl Drop for SimulatedHeadset {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use futures::channel::mpsc::{channel, Receiver};
    use tokio::time::timeout;

    fn fast_config() -> HeadsetConfig {
        HeadsetConfig {
            connect_delay_ms: 10,
            reading_interval_ms: 5,
            raw_sample_interval_ms: 1,
            ..HeadsetConfig::default()
        }
    }

    fn headset(config: HeadsetConfig) -> (SimulatedHeadset, Receiver<DeviceEvent>) {
        let (sender, receiver) = channel(64);
        (SimulatedHeadset::new(config, sender, CancellationToken::new()), receiver)
    }

    async fn next_event(receiver: &mut Receiver<DeviceEvent>) -> Option<DeviceEvent> {
        timeout(Duration::from_secs(2), receiver.next()).await.expect("Timed out waiting for event")
    }

    #[tokio::test]
    async fn test_connect_then_start() {
        let (mut headset, mut receiver) = headset(fast_config());
        assert_eq!(headset.state(), ConnectionState::Idle);

        headset.connect(false);
        assert_eq!(headset.state(), ConnectionState::Connecting);

        assert_eq!(next_event(&mut receiver).await, Some(DeviceEvent::StateChange(ConnectionState::Connecting)));
        assert_eq!(next_event(&mut receiver).await, Some(DeviceEvent::StateChange(ConnectionState::Connected)));
        assert_eq!(headset.state(), ConnectionState::Connected);

        headset.start();
        assert!(matches!(next_event(&mut receiver).await, Some(DeviceEvent::PoorSignal(_))));
        assert!(matches!(next_event(&mut receiver).await, Some(DeviceEvent::Attention(_))));
        assert!(matches!(next_event(&mut receiver).await, Some(DeviceEvent::Meditation(_))));
    }

    #[tokio::test]
    async fn test_no_readings_before_start() {
        let (mut headset, mut receiver) = headset(fast_config());
        headset.connect(true);

        next_event(&mut receiver).await;
        next_event(&mut receiver).await;
        assert_eq!(headset.state(), ConnectionState::Connected);

        let result = timeout(Duration::from_millis(50), receiver.next()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_duplicate_connect_is_ignored() {
        let (mut headset, mut receiver) = headset(fast_config());
        headset.connect(false);
        headset.connect(false);

        assert_eq!(next_event(&mut receiver).await, Some(DeviceEvent::StateChange(ConnectionState::Connecting)));
        assert_eq!(next_event(&mut receiver).await, Some(DeviceEvent::StateChange(ConnectionState::Connected)));

        headset.connect(false);
        assert_eq!(headset.state(), ConnectionState::Connected);
        let result = timeout(Duration::from_millis(50), receiver.next()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_not_found_allows_new_attempt() {
        let config = HeadsetConfig { outcome: ConnectOutcome::NotFound, ..fast_config() };
        let (mut headset, mut receiver) = headset(config);

        headset.connect(false);
        assert_eq!(next_event(&mut receiver).await, Some(DeviceEvent::StateChange(ConnectionState::Connecting)));
        assert_eq!(next_event(&mut receiver).await, Some(DeviceEvent::StateChange(ConnectionState::NotFound)));
        assert_eq!(headset.state(), ConnectionState::NotFound);

        headset.connect(false);
        assert_eq!(headset.state(), ConnectionState::Connecting);
        assert_eq!(next_event(&mut receiver).await, Some(DeviceEvent::StateChange(ConnectionState::Connecting)));
    }

    #[tokio::test]
    async fn test_raw_mode_streams_samples() {
        let config = HeadsetConfig { multi_channel: true, reading_interval_ms: 1000, ..fast_config() };
        let (mut headset, mut receiver) = headset(config);
        headset.connect(true);
        next_event(&mut receiver).await;
        next_event(&mut receiver).await;
        headset.start();

        let mut raw = 0;
        let mut multi = 0;
        for _ in 0..20 {
            match next_event(&mut receiver).await {
                Some(DeviceEvent::RawSample(_)) => raw += 1,
                Some(DeviceEvent::RawMultiSample(_)) => multi += 1,
                _ => {},
            }
        }
        assert!(raw > 0);
        assert!(multi > 0);
    }

    #[tokio::test]
    async fn test_no_raw_samples_without_raw_mode() {
        let config = HeadsetConfig { heart_rate: true, ..fast_config() };
        let (mut headset, mut receiver) = headset(config);
        headset.connect(false);
        next_event(&mut receiver).await;
        next_event(&mut receiver).await;
        headset.start();

        let mut heart_rate = 0;
        for _ in 0..30 {
            let event = next_event(&mut receiver).await;
            assert!(!matches!(event, Some(DeviceEvent::RawSample(_)) | Some(DeviceEvent::RawCount(_))));
            if let Some(DeviceEvent::HeartRate(_)) = event {
                heart_rate += 1;
            }
        }
        assert!(heart_rate > 0);
    }

    #[tokio::test]
    async fn test_low_battery() {
        let config = HeadsetConfig { low_battery_after_secs: Some(0), ..fast_config() };
        let (mut headset, mut receiver) = headset(config);
        headset.connect(false);
        next_event(&mut receiver).await;
        next_event(&mut receiver).await;
        headset.start();

        let mut low_battery = 0;
        for _ in 0..30 {
            if let Some(DeviceEvent::LowBattery) = next_event(&mut receiver).await {
                low_battery += 1;
            }
        }
        assert_eq!(low_battery, 1);
    }

    #[tokio::test]
    async fn test_disconnect() {
        let (mut headset, mut receiver) = headset(fast_config());

        // nothing to release yet
        headset.disconnect();
        assert_eq!(headset.state(), ConnectionState::Idle);

        headset.connect(false);
        headset.disconnect();
        assert_eq!(headset.state(), ConnectionState::Disconnected);

        let mut events = vec![];
        while let Ok(Some(event)) = timeout(Duration::from_millis(50), receiver.next()).await {
            events.push(event);
        }
        assert_eq!(events.last(), Some(&DeviceEvent::StateChange(ConnectionState::Disconnected)));
        assert!(!events.contains(&DeviceEvent::StateChange(ConnectionState::Connected)));
    }

    #[tokio::test]
    async fn test_close_ends_stream() {
        let (mut headset, mut receiver) = headset(fast_config());
        headset.connect(true);
        next_event(&mut receiver).await;
        next_event(&mut receiver).await;
        headset.start();

        headset.close();
        headset.close();
        headset.disconnect();
        assert!(!headset.state().is_busy());

        // whatever was queued drains, then the stream ends
        let drained = timeout(Duration::from_secs(2), async {
            while receiver.next().await.is_some() {}
        }).await;
        assert!(drained.is_ok());

        headset.connect(true);
        assert!(!headset.state().is_busy());
    }
}

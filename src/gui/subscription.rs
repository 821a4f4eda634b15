use std::convert::Infallible;
use std::future::pending;
use std::sync::{Arc, Mutex};
use futures::{SinkExt, StreamExt};
use futures::channel::mpsc::Receiver;
use iced::subscription::{self, Subscription};
use log::info;

use crate::device::constants::EVENT_CHANNEL_SIZE;
use crate::device::types::DeviceEvent;

/**
 * The receiving end of the session's event channel. iced asks for the subscription on every
 * update, but only runs the forwarding future once, which takes the receiver out.
 */
pub type SessionEvents = Arc<Mutex<Option<Receiver<DeviceEvent>>>>;

async fn forward_events(events: SessionEvents, mut output: futures::channel::mpsc::Sender<DeviceEvent>) -> Infallible {
    let receiver = events.lock().expect("Failed to lock session events").take();

    if let Some(mut receiver) = receiver {
        while let Some(event) = receiver.next().await {
            if output.send(event).await.is_err() {
                break;
            }
        }
        info!("Device event stream ended");
    }

    // note: subscription::channel expects the future to never resolve
    pending().await
}

pub fn session_event_subscription(events: SessionEvents) -> Subscription<DeviceEvent> {
    struct SessionEventsId;

    subscription::channel(
        std::any::TypeId::of::<SessionEventsId>(),
        EVENT_CHANNEL_SIZE,
        move |output| forward_events(events, output),
    )
}

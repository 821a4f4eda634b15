use btleplug::api::{Central, CentralState, Manager as _};
use btleplug::platform::{Adapter, Manager};
use log::{debug, info, warn};
use tokio::time::{sleep, Duration, Instant};

use crate::error::DeviceError;

/**
 * How long (milliseconds) to wait for an adapter to leave the "unknown" state. CoreBluetooth
 * starts out unknown right after launch.
 */
const ADAPTER_STATE_DEADLINE: u64 = 2000;

/**
 * How often (milliseconds) to ask an adapter in the "unknown" state again.
 */
const ADAPTER_STATE_POLL_DELAY: u64 = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BluetoothAvailability {
    Available { adapters: usize },
    // there is an adapter, but its radio is switched off
    PoweredOff,
    Unavailable,
}

/// Decide availability from the states of all adapters. Only a powered on adapter is usable.
pub fn availability(result: Result<Vec<CentralState>, DeviceError>) -> BluetoothAvailability {
    let states = match result {
        Ok(states) => states,
        Err(err) => {
            warn!("Failed to query bluetooth adapters: {:?}", err);
            return BluetoothAvailability::Unavailable;
        },
    };

    let powered_on = states.iter().filter(|state| matches!(state, CentralState::PoweredOn)).count();
    if powered_on > 0 {
        return BluetoothAvailability::Available { adapters: powered_on };
    }

    if states.is_empty() {
        warn!("No bluetooth adapters found");
        BluetoothAvailability::Unavailable
    }
    else if states.iter().any(|state| matches!(state, CentralState::PoweredOff)) {
        warn!("Bluetooth is turned off");
        BluetoothAvailability::PoweredOff
    }
    else {
        warn!("No bluetooth adapter reports its state");
        BluetoothAvailability::Unavailable
    }
}

async fn adapter_state(adapter: &Adapter) -> CentralState {
    let deadline = Instant::now() + Duration::from_millis(ADAPTER_STATE_DEADLINE);

    loop {
        match adapter.adapter_state().await {
            Ok(CentralState::Unknown) => {
                if Instant::now() >= deadline {
                    warn!("Bluetooth adapter state still unknown");
                    return CentralState::Unknown;
                }
                debug!("Bluetooth adapter state unknown, waiting...");
            },
            Ok(state) => return state,
            Err(err) => {
                warn!("Failed to query bluetooth adapter state: {:?}", err);
                return CentralState::Unknown;
            },
        }

        sleep(Duration::from_millis(ADAPTER_STATE_POLL_DELAY)).await;
    }
}

async fn adapter_states() -> Result<Vec<CentralState>, DeviceError> {
    let manager = Manager::new().await?;
    let adapters = manager.adapters().await?;

    let mut states = Vec::with_capacity(adapters.len());
    for adapter in &adapters {
        let state = adapter_state(adapter).await;
        info!(
            "Found bluetooth adapter {} ({:?})",
            adapter.adapter_info().await.unwrap_or("UNKNOWN".to_string()),
            state,
        );
        states.push(state);
    }

    Ok(states)
}

/// Ask the platform bluetooth stack whether a powered on adapter exists. Failing to talk to the
/// stack at all counts as unavailable.
pub async fn check_bluetooth() -> BluetoothAvailability {
    availability(adapter_states().await)
}

//! WASAPI endpoint topology binding.
//!
//! Wraps `IMMDeviceEnumerator` for default endpoint and device state lookups,
//! and forwards `IMMNotificationClient` callbacks to an
//! [`EndpointNotificationClient`].

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use windows::core::{implement, Result as WinResult, HRESULT, HSTRING, PCWSTR};
use windows::Win32::Foundation::{PROPERTYKEY, RPC_E_CHANGED_MODE};
use windows::Win32::Media::Audio::{
    eCapture, eCommunications, eConsole, eMultimedia, eRender, EDataFlow, ERole, IMMDevice,
    IMMDeviceEnumerator, IMMNotificationClient, IMMNotificationClient_Impl, MMDeviceEnumerator,
    DEVICE_STATE,
};
use windows::Win32::System::Com::{
    CoCreateInstance, CoInitializeEx, CoTaskMemFree, CLSCTX_ALL, COINIT_MULTITHREADED,
};

use crate::device::{
    DataFlow, DeviceId, DeviceState, EndpointNotificationClient, RegistrationToken, Role,
    TopologySource,
};
use crate::error::{DeviceError, DeviceResult, EarshotError, EarshotResult};

/// `HRESULT_FROM_WIN32(ERROR_NOT_FOUND)`, returned for unknown or missing endpoints.
const E_NOTFOUND: HRESULT = HRESULT(0x8007_0490_u32 as i32);

/// Interface pointer owned by the multithreaded apartment.
struct MtaPtr<T>(T);

// SAFETY: the enumerator and notification clients are created after joining the
// MTA, and MMDevice API objects are free-threaded within it.
unsafe impl<T> Send for MtaPtr<T> {}
unsafe impl<T> Sync for MtaPtr<T> {}

/// Endpoint topology backed by `IMMDeviceEnumerator`.
pub struct WasapiTopology {
    enumerator: MtaPtr<IMMDeviceEnumerator>,
    registrations: Mutex<HashMap<u64, MtaPtr<IMMNotificationClient>>>,
    next_token: AtomicU64,
}

impl WasapiTopology {
    /// Joins the MTA and creates the device enumerator.
    ///
    /// # Errors
    ///
    /// Returns `EarshotError::Device` if COM or the enumerator cannot be initialized.
    pub fn new() -> EarshotResult<Self> {
        let hr = unsafe { CoInitializeEx(None, COINIT_MULTITHREADED) };
        if hr.is_err() && hr != RPC_E_CHANGED_MODE {
            return Err(EarshotError::Device(format!("CoInitializeEx failed: {:?}", hr)));
        }

        let enumerator: IMMDeviceEnumerator =
            unsafe { CoCreateInstance(&MMDeviceEnumerator, None, CLSCTX_ALL) }.map_err(|e| {
                EarshotError::Device(format!("Failed to create device enumerator: {}", e))
            })?;

        Ok(Self {
            enumerator: MtaPtr(enumerator),
            registrations: Mutex::new(HashMap::new()),
            next_token: AtomicU64::new(1),
        })
    }
}

impl TopologySource for WasapiTopology {
    fn default_endpoint(&self, flow: DataFlow, role: Role) -> DeviceResult<DeviceId> {
        let device = unsafe {
            self.enumerator
                .0
                .GetDefaultAudioEndpoint(to_edataflow(flow), to_erole(role))
        }
        .map_err(|e| {
            if e.code() == E_NOTFOUND {
                DeviceError::NoDefaultDevice
            } else {
                DeviceError::Platform(e.to_string())
            }
        })?;
        device_id_of(&device)
    }

    fn device_state(&self, device_id: &DeviceId) -> DeviceResult<DeviceState> {
        let wide = HSTRING::from(device_id.as_str());
        let device = unsafe { self.enumerator.0.GetDevice(PCWSTR(wide.as_ptr())) }.map_err(|e| {
            if e.code() == E_NOTFOUND {
                DeviceError::NotFound(device_id.to_string())
            } else {
                DeviceError::Platform(e.to_string())
            }
        })?;
        let state = unsafe { device.GetState() }.map_err(|e| DeviceError::Platform(e.to_string()))?;
        Ok(DeviceState::from_raw(state.0))
    }

    fn register(
        &self,
        client: Arc<dyn EndpointNotificationClient>,
    ) -> DeviceResult<RegistrationToken> {
        let forwarder: IMMNotificationClient = NotificationForwarder { client }.into();
        unsafe { self.enumerator.0.RegisterEndpointNotificationCallback(&forwarder) }
            .map_err(|e| DeviceError::Platform(e.to_string()))?;

        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        self.registrations.lock().insert(token, MtaPtr(forwarder));
        log::debug!("[Wasapi] Registered notification client #{}", token);
        Ok(RegistrationToken(token))
    }

    fn unregister(&self, token: RegistrationToken) -> DeviceResult<()> {
        let forwarder = self.registrations.lock().remove(&token.0).ok_or_else(|| {
            DeviceError::Platform(format!("unknown notification registration #{}", token.0))
        })?;
        unsafe {
            self.enumerator
                .0
                .UnregisterEndpointNotificationCallback(&forwarder.0)
        }
        .map_err(|e| DeviceError::Platform(e.to_string()))?;
        log::debug!("[Wasapi] Unregistered notification client #{}", token.0);
        Ok(())
    }
}

fn device_id_of(device: &IMMDevice) -> DeviceResult<DeviceId> {
    let raw = unsafe { device.GetId() }.map_err(|e| DeviceError::Platform(e.to_string()))?;
    let id = unsafe { raw.to_string() };
    unsafe { CoTaskMemFree(Some(raw.0 as *const _)) };
    id.map(DeviceId::from)
        .map_err(|e| DeviceError::Platform(format!("device id is not UTF-16: {}", e)))
}

fn to_edataflow(flow: DataFlow) -> EDataFlow {
    match flow {
        DataFlow::Render => eRender,
        DataFlow::Capture => eCapture,
        DataFlow::All => windows::Win32::Media::Audio::eAll,
    }
}

fn from_edataflow(flow: EDataFlow) -> DataFlow {
    if flow == eRender {
        DataFlow::Render
    } else if flow == eCapture {
        DataFlow::Capture
    } else {
        DataFlow::All
    }
}

fn to_erole(role: Role) -> ERole {
    match role {
        Role::Console => eConsole,
        Role::Multimedia => eMultimedia,
        Role::Communications => eCommunications,
    }
}

fn from_erole(role: ERole) -> Role {
    if role == eConsole {
        Role::Console
    } else if role == eMultimedia {
        Role::Multimedia
    } else {
        Role::Communications
    }
}

/// Reads a callback device id. `None` for a null pointer or invalid UTF-16.
fn read_device_id(raw: &PCWSTR) -> Option<DeviceId> {
    if raw.is_null() {
        return None;
    }
    unsafe { raw.to_string() }.ok().map(DeviceId::from)
}

/// COM object handed to `RegisterEndpointNotificationCallback`.
#[implement(IMMNotificationClient)]
struct NotificationForwarder {
    client: Arc<dyn EndpointNotificationClient>,
}

impl NotificationForwarder {
    /// Runs a callback, containing any panic so it never unwinds into the audio service.
    fn forward(&self, callback: &str, f: impl FnOnce(&dyn EndpointNotificationClient)) {
        let client = self.client.as_ref();
        if catch_unwind(AssertUnwindSafe(|| f(client))).is_err() {
            log::error!("[Wasapi] {} handler panicked", callback);
        }
    }
}

impl IMMNotificationClient_Impl for NotificationForwarder_Impl {
    fn OnDeviceStateChanged(&self, pwstrdeviceid: &PCWSTR, dwnewstate: DEVICE_STATE) -> WinResult<()> {
        if let Some(id) = read_device_id(pwstrdeviceid) {
            let state = DeviceState::from_raw(dwnewstate.0);
            self.forward("OnDeviceStateChanged", |c| c.on_device_state_changed(&id, state));
        }
        Ok(())
    }

    fn OnDeviceAdded(&self, pwstrdeviceid: &PCWSTR) -> WinResult<()> {
        if let Some(id) = read_device_id(pwstrdeviceid) {
            self.forward("OnDeviceAdded", |c| c.on_device_added(&id));
        }
        Ok(())
    }

    fn OnDeviceRemoved(&self, pwstrdeviceid: &PCWSTR) -> WinResult<()> {
        if let Some(id) = read_device_id(pwstrdeviceid) {
            self.forward("OnDeviceRemoved", |c| c.on_device_removed(&id));
        }
        Ok(())
    }

    fn OnDefaultDeviceChanged(
        &self,
        flow: EDataFlow,
        role: ERole,
        pwstrdefaultdeviceid: &PCWSTR,
    ) -> WinResult<()> {
        let id = read_device_id(pwstrdefaultdeviceid);
        let (flow, role) = (from_edataflow(flow), from_erole(role));
        self.forward("OnDefaultDeviceChanged", |c| {
            c.on_default_device_changed(flow, role, id.as_ref())
        });
        Ok(())
    }

    fn OnPropertyValueChanged(&self, pwstrdeviceid: &PCWSTR, _key: &PROPERTYKEY) -> WinResult<()> {
        if let Some(id) = read_device_id(pwstrdeviceid) {
            self.forward("OnPropertyValueChanged", |c| c.on_property_value_changed(&id));
        }
        Ok(())
    }
}

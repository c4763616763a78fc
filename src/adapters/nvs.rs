//! NVS (Non-Volatile Storage) adapter.
//!
//! Implements both [`ConfigPort`] and [`StoragePort`].
//!
//! The network configuration is stored as individual scalars in the
//! `CONFIG` namespace, one key per octet or port:
//!
//! | Key              | Value                       |
//! |------------------|-----------------------------|
//! | `ip0` … `ip3`    | local address octets        |
//! | `sub0` … `sub3`  | subnet mask octets          |
//! | `gw0` … `gw3`    | gateway octets              |
//! | `inPort`         | inbound UDP port            |
//! | `outPort`        | outbound UDP port           |
//!
//! Each value is a `u32` encoded with `postcard`.  A missing or
//! undecodable key falls back to its default; the others are unaffected.

use core::net::Ipv4Addr;

use log::{info, warn};

use crate::app::ports::{ConfigError, ConfigPort, StorageError, StoragePort};
use crate::config::NetworkConfig;

#[cfg(not(target_os = "espidf"))]
use std::collections::HashMap;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

pub const CONFIG_NAMESPACE: &str = "CONFIG";

const IP_KEY: &str = "ip";
const SUBNET_KEY: &str = "sub";
const GATEWAY_KEY: &str = "gw";
const IN_PORT_KEY: &str = "inPort";
const OUT_PORT_KEY: &str = "outPort";

/// Upper bound of a postcard-encoded `u32` (varint).
const SCALAR_BUF: usize = 5;

pub struct NvsAdapter {
    #[cfg(not(target_os = "espidf"))]
    store: HashMap<String, Vec<u8>>,
}

impl NvsAdapter {
    /// Create the adapter and initialise NVS flash.
    ///
    /// On first boot or after a version mismatch the NVS partition is
    /// erased and re-initialised automatically.
    pub fn new() -> Result<Self, StorageError> {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: called once from the main task before any NVS access.
            let ret = unsafe { nvs_flash_init() };
            if ret == ESP_ERR_NVS_NO_FREE_PAGES || ret == ESP_ERR_NVS_NEW_VERSION_FOUND {
                warn!("NVS: erasing and re-initialising flash partition");
                if unsafe { nvs_flash_erase() } != ESP_OK {
                    return Err(StorageError::IoError);
                }
                if unsafe { nvs_flash_init() } != ESP_OK {
                    return Err(StorageError::IoError);
                }
            } else if ret != ESP_OK {
                return Err(StorageError::IoError);
            }
            info!("NvsAdapter: ESP-IDF NVS initialised");
        }

        #[cfg(not(target_os = "espidf"))]
        info!("NvsAdapter: simulation backend");

        Ok(Self {
            #[cfg(not(target_os = "espidf"))]
            store: HashMap::new(),
        })
    }

    #[cfg(not(target_os = "espidf"))]
    fn composite_key(namespace: &str, key: &str) -> String {
        format!("{}::{}", namespace, key)
    }

    /// NUL-terminated copy of a namespace or key (NVS limit: 15 chars).
    #[cfg(target_os = "espidf")]
    fn c_name(name: &str) -> [u8; 16] {
        let mut buf = [0u8; 16];
        let bytes = name.as_bytes();
        let len = bytes.len().min(15);
        buf[..len].copy_from_slice(&bytes[..len]);
        buf
    }

    /// Run `f` against an open handle on `namespace`; the handle is
    /// closed whatever `f` returns.  Errors come back as storage errors.
    #[cfg(target_os = "espidf")]
    fn with_namespace<T>(
        namespace: &str,
        mode: nvs_open_mode_t,
        f: impl FnOnce(nvs_handle_t) -> Result<T, esp_err_t>,
    ) -> Result<T, StorageError> {
        let ns = Self::c_name(namespace);
        let mut handle: nvs_handle_t = 0;
        // SAFETY: `ns` is NUL-terminated and outlives the call.
        esp_ok(unsafe { nvs_open(ns.as_ptr().cast(), mode, &mut handle) })
            .map_err(storage_error)?;

        let result = f(handle);
        // SAFETY: `handle` was opened above and is not used afterwards.
        unsafe { nvs_close(handle) };
        result.map_err(storage_error)
    }
}

#[cfg(target_os = "espidf")]
fn esp_ok(ret: esp_err_t) -> Result<(), esp_err_t> {
    if ret == ESP_OK as esp_err_t {
        Ok(())
    } else {
        Err(ret)
    }
}

#[cfg(target_os = "espidf")]
fn storage_error(code: esp_err_t) -> StorageError {
    match code {
        c if c == ESP_ERR_NVS_NOT_FOUND as esp_err_t => StorageError::NotFound,
        c if c == ESP_ERR_NVS_NOT_ENOUGH_SPACE as esp_err_t => StorageError::Full,
        _ => StorageError::IoError,
    }
}

// ── Scalar helpers ────────────────────────────────────────────

fn read_u32(storage: &impl StoragePort, key: &str) -> Option<u32> {
    let mut buf = [0u8; SCALAR_BUF];
    let len = match storage.read(CONFIG_NAMESPACE, key, &mut buf) {
        Ok(len) => len,
        Err(StorageError::NotFound) => return None,
        Err(e) => {
            warn!("CFG | read {} failed: {}, using default", key, e);
            return None;
        }
    };
    match postcard::from_bytes::<u32>(&buf[..len]) {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("CFG | {} undecodable, using default", key);
            None
        }
    }
}

fn write_u32(storage: &mut impl StoragePort, key: &str, value: u32) -> Result<(), ConfigError> {
    let mut buf = [0u8; SCALAR_BUF];
    let bytes = postcard::to_slice(&value, &mut buf).map_err(|_| ConfigError::Encode)?;
    storage.write(CONFIG_NAMESPACE, key, bytes)?;
    Ok(())
}

fn load_addr(storage: &impl StoragePort, prefix: &str, default: Ipv4Addr) -> Ipv4Addr {
    let mut octets = default.octets();
    for (i, octet) in octets.iter_mut().enumerate() {
        let key = format!("{}{}", prefix, i);
        match read_u32(storage, &key).map(u8::try_from) {
            Some(Ok(v)) => *octet = v,
            Some(Err(_)) => warn!("CFG | {} out of range, using default", key),
            None => {}
        }
    }
    Ipv4Addr::from(octets)
}

fn load_port(storage: &impl StoragePort, key: &str, default: u16) -> u16 {
    match read_u32(storage, key).map(u16::try_from) {
        Some(Ok(p)) if p != 0 => p,
        Some(_) => {
            warn!("CFG | {} out of range, using default", key);
            default
        }
        None => default,
    }
}

fn save_addr(storage: &mut impl StoragePort, prefix: &str, addr: Ipv4Addr) -> Result<(), ConfigError> {
    for (i, octet) in addr.octets().into_iter().enumerate() {
        write_u32(storage, &format!("{}{}", prefix, i), u32::from(octet))?;
    }
    Ok(())
}

/// Load a [`NetworkConfig`] from any key-value store, key by key.
pub fn load_config(storage: &impl StoragePort) -> NetworkConfig {
    let d = NetworkConfig::default();
    NetworkConfig {
        local_ip: load_addr(storage, IP_KEY, d.local_ip),
        subnet_mask: load_addr(storage, SUBNET_KEY, d.subnet_mask),
        gateway: load_addr(storage, GATEWAY_KEY, d.gateway),
        in_port: load_port(storage, IN_PORT_KEY, d.in_port),
        out_port: load_port(storage, OUT_PORT_KEY, d.out_port),
    }
}

/// Write all five fields.  Stops at the first failing key.
pub fn save_config(storage: &mut impl StoragePort, config: &NetworkConfig) -> Result<(), ConfigError> {
    save_addr(storage, IP_KEY, config.local_ip)?;
    save_addr(storage, SUBNET_KEY, config.subnet_mask)?;
    save_addr(storage, GATEWAY_KEY, config.gateway)?;
    write_u32(storage, IN_PORT_KEY, u32::from(config.in_port))?;
    write_u32(storage, OUT_PORT_KEY, u32::from(config.out_port))?;
    Ok(())
}

impl ConfigPort for NvsAdapter {
    fn load(&self) -> NetworkConfig {
        let cfg = load_config(self);
        info!("NvsAdapter: config loaded");
        cfg
    }

    fn save(&mut self, config: &NetworkConfig) -> Result<(), ConfigError> {
        save_config(self, config)?;
        info!("NvsAdapter: config saved");
        Ok(())
    }
}

impl StoragePort for NvsAdapter {
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        #[cfg(not(target_os = "espidf"))]
        {
            match self.store.get(&Self::composite_key(namespace, key)) {
                Some(data) => {
                    let len = data.len().min(buf.len());
                    buf[..len].copy_from_slice(&data[..len]);
                    Ok(len)
                }
                None => Err(StorageError::NotFound),
            }
        }

        #[cfg(target_os = "espidf")]
        {
            let k = Self::c_name(key);
            Self::with_namespace(namespace, nvs_open_mode_t_NVS_READONLY, |handle| {
                let mut len = buf.len();
                // SAFETY: `len` holds the capacity of `buf` on entry.
                esp_ok(unsafe {
                    nvs_get_blob(handle, k.as_ptr().cast(), buf.as_mut_ptr().cast(), &mut len)
                })?;
                Ok(len)
            })
        }
    }

    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        #[cfg(not(target_os = "espidf"))]
        {
            self.store
                .insert(Self::composite_key(namespace, key), data.to_vec());
            Ok(())
        }

        #[cfg(target_os = "espidf")]
        {
            let k = Self::c_name(key);
            Self::with_namespace(namespace, nvs_open_mode_t_NVS_READWRITE, |handle| {
                // SAFETY: `data` is valid for `data.len()` bytes.
                esp_ok(unsafe {
                    nvs_set_blob(handle, k.as_ptr().cast(), data.as_ptr().cast(), data.len())
                })?;
                esp_ok(unsafe { nvs_commit(handle) })
            })
        }
    }

    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError> {
        #[cfg(not(target_os = "espidf"))]
        {
            self.store.remove(&Self::composite_key(namespace, key));
            Ok(())
        }

        #[cfg(target_os = "espidf")]
        {
            let k = Self::c_name(key);
            Self::with_namespace(namespace, nvs_open_mode_t_NVS_READWRITE, |handle| {
                match esp_ok(unsafe { nvs_erase_key(handle, k.as_ptr().cast()) }) {
                    Ok(()) => {}
                    Err(e) if e == ESP_ERR_NVS_NOT_FOUND as esp_err_t => {}
                    Err(e) => return Err(e),
                }
                esp_ok(unsafe { nvs_commit(handle) })
            })
        }
    }

    fn exists(&self, namespace: &str, key: &str) -> bool {
        #[cfg(not(target_os = "espidf"))]
        {
            self.store
                .contains_key(&Self::composite_key(namespace, key))
        }

        #[cfg(target_os = "espidf")]
        {
            let k = Self::c_name(key);
            Self::with_namespace(namespace, nvs_open_mode_t_NVS_READONLY, |handle| {
                Ok(unsafe { nvs_find_key(handle, k.as_ptr().cast(), core::ptr::null_mut()) })
            })
            .is_ok_and(|ret| esp_ok(ret).is_ok())
        }
    }
}

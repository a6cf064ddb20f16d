//! `--install`: register this executable as the OS handler for the scheme.

use std::path::Path;

use thiserror::Error;

/// Shown in Windows' "open with" prompts.
const PROTOCOL_DESCRIPTION: &str = "URL:Jellyfin Universal Player";

#[derive(Debug, Error)]
pub enum InstallError {
    #[cfg_attr(not(target_os = "windows"), allow(dead_code))]
    #[error("registry error at {key}: {message}")]
    Registry { key: String, message: String },

    #[cfg_attr(target_os = "windows", allow(dead_code))]
    #[error("protocol registration is not supported on this platform")]
    Unsupported,
}

/// Registry values written for the scheme, as (key path under HKCU, value
/// name, data). An empty value name is the key's default value.
#[cfg(any(target_os = "windows", test))]
fn registry_entries(exe: &Path, scheme: &str) -> Vec<(String, &'static str, String)> {
    let exe = exe.display();
    let base = format!(r"Software\Classes\{scheme}");
    vec![
        (base.clone(), "", PROTOCOL_DESCRIPTION.to_string()),
        (base.clone(), "URL Protocol", String::new()),
        (format!(r"{base}\DefaultIcon"), "", format!("\"{exe}\",0")),
        (
            format!(r"{base}\shell\open\command"),
            "",
            format!("\"{exe}\" \"%1\""),
        ),
    ]
}

/// Write the scheme registration for `exe` into the current user's classes.
#[cfg(target_os = "windows")]
pub fn install(exe: &Path, scheme: &str) -> Result<(), InstallError> {
    for (key, name, data) in registry_entries(exe, scheme) {
        registry::set_string(&key, name, &data).map_err(|e| InstallError::Registry {
            key: key.clone(),
            message: e.to_string(),
        })?;
        tracing::debug!(key = %key, name, data = %data, "Registry value written");
    }
    Ok(())
}

#[cfg(not(target_os = "windows"))]
pub fn install(_exe: &Path, _scheme: &str) -> Result<(), InstallError> {
    Err(InstallError::Unsupported)
}

#[cfg(target_os = "windows")]
mod registry {
    use windows::core::{Result, HSTRING, PCWSTR};
    use windows::Win32::System::Registry::{
        RegCloseKey, RegCreateKeyExW, RegSetValueExW, HKEY, HKEY_CURRENT_USER, KEY_SET_VALUE,
        REG_OPTION_NON_VOLATILE, REG_SZ,
    };

    /// Open (creating if needed) `path` under HKCU and set a REG_SZ value.
    pub fn set_string(path: &str, name: &str, data: &str) -> Result<()> {
        let key = Key::create(path)?;
        key.set_string(name, data)
    }

    struct Key(HKEY);

    impl Key {
        fn create(path: &str) -> Result<Self> {
            let path = HSTRING::from(path);
            let mut hkey = HKEY(std::ptr::null_mut());
            unsafe {
                RegCreateKeyExW(
                    HKEY_CURRENT_USER,
                    &path,
                    0,
                    PCWSTR::null(),
                    REG_OPTION_NON_VOLATILE,
                    KEY_SET_VALUE,
                    None,
                    &mut hkey,
                    None,
                )
                .ok()?;
            }
            Ok(Self(hkey))
        }

        fn set_string(&self, name: &str, data: &str) -> Result<()> {
            let name = HSTRING::from(name);
            // REG_SZ: UTF-16LE including the terminating NUL.
            let bytes: Vec<u8> = data
                .encode_utf16()
                .chain(std::iter::once(0))
                .flat_map(u16::to_le_bytes)
                .collect();
            unsafe { RegSetValueExW(self.0, &name, 0, REG_SZ, Some(bytes.as_slice())).ok() }
        }
    }

    impl Drop for Key {
        fn drop(&mut self) {
            unsafe {
                let _ = RegCloseKey(self.0);
            }
        }
    }
}

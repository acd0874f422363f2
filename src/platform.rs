//! Cross-platform path resolution.
//!
//! Paths are derived from the captured [`HostEnv`] rather than the live
//! process, so they stay consistent within one scan.

use crate::env::HostEnv;
use crate::model::Platform;
use std::path::PathBuf;

/// Returns the path to the editor's user `settings.json`.
///
/// Platform-specific locations:
/// - Linux: `~/.config/Code/User/settings.json`
/// - macOS: `~/Library/Application Support/Code/User/settings.json`
/// - Windows: `%APPDATA%\Code\User\settings.json`
///
/// The file is not required to exist. Returns `None` only when no base
/// directory can be determined.
pub fn editor_settings_path(env: &HostEnv) -> Option<PathBuf> {
    let user_dir = match env.platform() {
        Platform::Linux => env.home()?.join(".config").join("Code").join("User"),
        Platform::MacOS => env
            .home()?
            .join("Library")
            .join("Application Support")
            .join("Code")
            .join("User"),
        Platform::Windows => {
            let roaming = match env.var("APPDATA") {
                Some(appdata) => PathBuf::from(appdata),
                None => env.home()?.join("AppData").join("Roaming"),
            };
            roaming.join("Code").join("User")
        }
    };

    Some(user_dir.join("settings.json"))
}

/// Returns the directory holding the devenv config file.
///
/// - Linux: `~/.config/devenv/`
/// - macOS: `~/Library/Application Support/devenv/`
/// - Windows: `%APPDATA%\devenv\`
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("devenv")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linux_settings_path() {
        let env = HostEnv::empty(Platform::Linux).with_home("/home/dev");
        assert_eq!(
            editor_settings_path(&env),
            Some(PathBuf::from("/home/dev/.config/Code/User/settings.json"))
        );
    }

    #[test]
    fn test_macos_settings_path() {
        let env = HostEnv::empty(Platform::MacOS).with_home("/Users/dev");
        assert_eq!(
            editor_settings_path(&env),
            Some(PathBuf::from(
                "/Users/dev/Library/Application Support/Code/User/settings.json"
            ))
        );
    }

    #[test]
    fn test_windows_settings_path_prefers_appdata() {
        let env = HostEnv::empty(Platform::Windows)
            .with_home("C:/Users/dev")
            .with_var("APPDATA", "D:/Roaming");
        assert_eq!(
            editor_settings_path(&env),
            Some(PathBuf::from("D:/Roaming").join("Code").join("User").join("settings.json"))
        );
    }

    #[test]
    fn test_no_home_no_path() {
        assert!(editor_settings_path(&HostEnv::empty(Platform::Linux)).is_none());
    }
}

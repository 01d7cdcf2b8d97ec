//! Suite configuration.
//!
//! One `SuiteConfig` per browser session. Defaults target the public
//! SauceDemo instance; environment variables override them so CI can point
//! the suite at a mirror or a headful browser for debugging.

use std::path::PathBuf;
use std::time::Duration;

/// Default target site
pub const DEFAULT_BASE_URL: &str = "https://www.saucedemo.com/";

/// Password shared by every predefined SauceDemo user
pub const DEFAULT_PASSWORD: &str = "secret_sauce";

/// Default deadline for explicit waits (matches the original suite)
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Configuration for one browser session
#[derive(Debug, Clone)]
pub struct SuiteConfig {
    /// Base URL of the storefront under test
    pub base_url: String,
    /// Password used for every predefined user
    pub password: String,
    /// Run the browser headless
    pub headless: bool,
    /// Path to the chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Chromium sandbox (disable in containers)
    pub sandbox: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Where debug screenshots land
    pub artifacts_dir: PathBuf,
    /// Default deadline for explicit waits
    pub default_timeout_ms: u64,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
            headless: true,
            chromium_path: None,
            sandbox: true,
            viewport_width: 1280,
            viewport_height: 900,
            artifacts_dir: PathBuf::from("target/comprar-artifacts"),
            default_timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl SuiteConfig {
    /// Build a config from the environment.
    ///
    /// Honors `SAUCEDEMO_BASE_URL`, `SAUCEDEMO_PASSWORD`, `CHROMIUM_PATH`
    /// and `COMPRAR_HEADFUL` (any non-empty value turns headless off).
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("SAUCEDEMO_BASE_URL") {
            if !url.is_empty() {
                config.base_url = url;
            }
        }
        if let Ok(password) = std::env::var("SAUCEDEMO_PASSWORD") {
            if !password.is_empty() {
                config.password = password;
            }
        }
        if let Ok(path) = std::env::var("CHROMIUM_PATH") {
            if !path.is_empty() {
                config.chromium_path = Some(path);
            }
        }
        if std::env::var("COMPRAR_HEADFUL").is_ok_and(|v| !v.is_empty()) {
            config.headless = false;
        }
        config
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set the chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable the sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }

    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set the artifacts directory
    #[must_use]
    pub fn with_artifacts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifacts_dir = dir.into();
        self
    }

    /// Default wait deadline as a `Duration`
    #[must_use]
    pub const fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SuiteConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.password, DEFAULT_PASSWORD);
        assert!(config.headless);
        assert!(config.sandbox);
        assert_eq!(config.default_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_builder_chain() {
        let config = SuiteConfig::default()
            .with_base_url("http://localhost:3000/")
            .with_headless(false)
            .with_no_sandbox()
            .with_viewport(800, 600);
        assert_eq!(config.base_url, "http://localhost:3000/");
        assert!(!config.headless);
        assert!(!config.sandbox);
        assert_eq!(config.viewport_width, 800);
        assert_eq!(config.viewport_height, 600);
    }

    #[test]
    fn test_with_chromium_path() {
        let config = SuiteConfig::default().with_chromium_path("/usr/bin/chromium");
        assert_eq!(config.chromium_path.as_deref(), Some("/usr/bin/chromium"));
    }

    #[test]
    fn test_with_artifacts_dir() {
        let config = SuiteConfig::default().with_artifacts_dir("/tmp/shots");
        assert_eq!(config.artifacts_dir, PathBuf::from("/tmp/shots"));
    }

    mod env_tests {
        use super::*;
        use std::sync::Mutex;

        // the process environment is global, so these tests take turns
        static ENV_LOCK: Mutex<()> = Mutex::new(());

        const VARS: &[&str] = &[
            "SAUCEDEMO_BASE_URL",
            "SAUCEDEMO_PASSWORD",
            "CHROMIUM_PATH",
            "COMPRAR_HEADFUL",
        ];

        fn with_clean_env<F: FnOnce()>(f: F) {
            let _guard = ENV_LOCK.lock().unwrap();
            for var in VARS {
                std::env::remove_var(var);
            }
            f();
            for var in VARS {
                std::env::remove_var(var);
            }
        }

        #[test]
        fn test_from_env_without_overrides_is_default() {
            with_clean_env(|| {
                let config = SuiteConfig::from_env();
                assert_eq!(config.base_url, DEFAULT_BASE_URL);
                assert_eq!(config.password, DEFAULT_PASSWORD);
                assert!(config.chromium_path.is_none());
                assert!(config.headless);
            });
        }

        #[test]
        fn test_from_env_overrides_land() {
            with_clean_env(|| {
                std::env::set_var("SAUCEDEMO_BASE_URL", "http://localhost:3000/");
                std::env::set_var("SAUCEDEMO_PASSWORD", "hunter2");
                std::env::set_var("CHROMIUM_PATH", "/usr/bin/chromium");
                std::env::set_var("COMPRAR_HEADFUL", "1");

                let config = SuiteConfig::from_env();
                assert_eq!(config.base_url, "http://localhost:3000/");
                assert_eq!(config.password, "hunter2");
                assert_eq!(config.chromium_path.as_deref(), Some("/usr/bin/chromium"));
                assert!(!config.headless);
            });
        }

        #[test]
        fn test_from_env_ignores_empty_values() {
            with_clean_env(|| {
                std::env::set_var("SAUCEDEMO_BASE_URL", "");
                std::env::set_var("SAUCEDEMO_PASSWORD", "");
                std::env::set_var("CHROMIUM_PATH", "");
                std::env::set_var("COMPRAR_HEADFUL", "");

                let config = SuiteConfig::from_env();
                assert_eq!(config.base_url, DEFAULT_BASE_URL);
                assert_eq!(config.password, DEFAULT_PASSWORD);
                assert!(config.chromium_path.is_none());
                assert!(config.headless, "an empty headful toggle must not stick");
            });
        }
    }
}

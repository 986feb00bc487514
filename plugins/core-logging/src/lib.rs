//! Core logging plugin: installs a `tracing` subscriber during plugin
//! initialization and bridges the `log` facade into it, so every plugin
//! initialized after it logs through one configured sink.
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use hmi_core::base::{ErrorInfo, ErrorKind, Result, ToErrorInfo};
use hmi_core::plugin_system::{IPlugin, Plugin, PluginDependency, StaticLoader, Version};
use log::LevelFilter;
use tracing::info;
use tracing_log::LogTracer;
use tracing_subscriber::EnvFilter;

pub const PLUGIN_NAME: &str = "core-logging";
pub const PLUGIN_VERSION: Version = Version::new(0, 1, 0);

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to install tracing subscriber: {0}")]
    Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
    #[error("Failed to bridge log records into tracing: {0}")]
    LogBridge(#[from] log::SetLoggerError),
}

impl ToErrorInfo for LoggingError {
    fn error_info(&self) -> ErrorInfo {
        ErrorInfo::new(ErrorKind::custom("LoggerSetup"), self.to_string()).with_context(PLUGIN_NAME)
    }
}

/// Logging backend plugin
#[derive(Debug)]
pub struct LoggingPlugin {
    level: LevelFilter,
    installed: AtomicBool,
}

impl Default for LoggingPlugin {
    fn default() -> Self {
        Self::new(LevelFilter::Info)
    }
}

impl LoggingPlugin {
    /// `level` is the default filter; `RUST_LOG` still overrides it
    pub fn new(level: LevelFilter) -> Self {
        Self {
            level,
            installed: AtomicBool::new(false),
        }
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }

    /// Whether this instance installed the global logger
    pub fn is_installed(&self) -> bool {
        self.installed.load(Ordering::SeqCst)
    }

    /// Registry descriptor for this plugin
    pub fn descriptor() -> Plugin {
        Plugin::new(PLUGIN_NAME, PLUGIN_VERSION, PLUGIN_NAME)
    }

    /// Register a factory for this plugin under its name
    pub fn register(loader: &mut StaticLoader, level: LevelFilter) {
        loader.register(PLUGIN_NAME, move |_| Ok(Arc::new(LoggingPlugin::new(level)) as Arc<dyn IPlugin>));
    }
}

impl IPlugin for LoggingPlugin {
    fn dependencies(&self) -> Vec<PluginDependency> {
        vec![]
    }

    fn initialize(&self) -> Result<()> {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level.to_string().to_lowercase()));
        // stdout is reserved for command output
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber).map_err(LoggingError::from)?;
        // The subscriber stays global even if the bridge below fails
        self.installed.store(true, Ordering::SeqCst);
        LogTracer::builder()
            .with_max_level(self.level)
            .init()
            .map_err(LoggingError::from)?;
        info!("Initializing Core Logging Plugin v{}", PLUGIN_VERSION);
        Ok(())
    }

    fn finalize(&self) {
        if self.installed.swap(false, Ordering::SeqCst) {
            info!("Shutting down Core Logging Plugin");
            log::logger().flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hmi_core::plugin_system::PluginLoader;

    /// Stands in for a `log` backend some other component installed first
    struct ForeignLogger;

    impl log::Log for ForeignLogger {
        fn enabled(&self, _metadata: &log::Metadata<'_>) -> bool {
            false
        }

        fn log(&self, _record: &log::Record<'_>) {}

        fn flush(&self) {}
    }

    static FOREIGN_LOGGER: ForeignLogger = ForeignLogger;

    // Global logger state is per process, so the whole sequence lives in one test.
    #[test]
    fn test_install_sequence() {
        // The subscriber goes in, the log bridge then finds a logger already set
        log::set_logger(&FOREIGN_LOGGER).unwrap();
        let first = LoggingPlugin::new(LevelFilter::Warn);
        let err = first.initialize().unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::custom("LoggerSetup"));
        assert!(err.message().contains("bridge log records"));
        assert!(first.is_installed());

        // Nothing left to install for a second plugin
        let second = LoggingPlugin::default();
        let err = second.initialize().unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::custom("LoggerSetup"));
        assert_eq!(err.info().context(), Some(PLUGIN_NAME));
        assert!(err.message().contains("tracing subscriber"));
        assert!(!second.is_installed());

        first.finalize();
        assert!(!first.is_installed());
        // No-op when never installed
        second.finalize();
    }

    #[test]
    fn test_registers_factory_under_plugin_name() {
        let mut loader = StaticLoader::new();
        LoggingPlugin::register(&mut loader, LevelFilter::Debug);
        assert!(loader.has_factory(PLUGIN_NAME));

        let instance = match loader.load(&LoggingPlugin::descriptor()) {
            Ok(instance) => instance,
            Err(e) => panic!("load failed: {}", e),
        };
        assert!(instance.dependencies().is_empty());
        assert_eq!(LoggingPlugin::descriptor().version(), &PLUGIN_VERSION);
    }
}

use crate::base::Result;
use crate::plugin_system::dependency::PluginDependency;

/// Capability interface every loaded plugin module implements.
///
/// Methods take `&self`; implementations keep mutable state behind their own
/// locks, which lets the registry hand out shared handles after resolution.
pub trait IPlugin: Send + Sync {
    /// Plugins this module needs, in the order they were declared.
    /// Called before `initialize` and must not depend on it.
    fn dependencies(&self) -> Vec<PluginDependency>;

    /// Module-specific setup. Report misconfiguration with an
    /// [`ErrorException`](crate::base::ErrorException) carrying the
    /// module's own error kind; the registry wraps it, never replaces it.
    fn initialize(&self) -> Result<()>;

    /// Release module resources.
    ///
    /// Must be safe to call when `initialize` never ran or failed partway,
    /// and safe to call twice.
    fn finalize(&self);
}

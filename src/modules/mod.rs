pub mod bookshop;

use bookshop_db::SharedStore;
use bookshop_kernel::ModuleRegistry;

/// Register all project-specific modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, store: SharedStore) {
    registry.register(bookshop::create_module(store));
}

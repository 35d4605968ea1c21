pub mod config;
pub mod report;
pub mod snapshot;
pub mod stats;
pub mod system;

use crate::cli::registry::CommandRegistry;

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    for entry in system::definitions()
        .into_iter()
        .chain(snapshot::definitions())
        .chain(report::definitions())
        .chain(stats::definitions())
        .chain(config::definitions())
    {
        registry.register(entry);
    }
}

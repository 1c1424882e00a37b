use anyhow::bail;
use dusky_core::config::Config;
use dusky_core::dispatch::{DispatchOutcome, Dispatcher, Spawner};

/// Dispatch one item by page name and item title, as if its Run button was pressed
pub fn run_item<S: Spawner>(
    config: &Config,
    dispatcher: &Dispatcher<S>,
    page: &str,
    title: &str,
) -> anyhow::Result<()> {
    let Some(item) = config.find_item(page, title) else {
        bail!("no item '{}' on page '{}' (see `dusky list`)", title, page);
    };

    match dispatcher.dispatch(item) {
        DispatchOutcome::Spawned(request) => {
            println!("Launched: {}", request);
            Ok(())
        }
        DispatchOutcome::Skipped => bail!("item '{}' has no command", item.title),
        DispatchOutcome::Failed(message) => bail!("failed to launch '{}': {}", item.title, message),
    }
}

//! `check`: the setup validation step. One poll must succeed.

use mediola_core::{Coordinator, GatewayConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

pub async fn handle(config: GatewayConfig, global: &GlobalOpts) -> Result<(), CliError> {
    let title = format!("Mediola Gateway ({})", config.host);
    let shutters = Coordinator::oneshot(config, |c| async move { Ok(c.snapshot().len()) }).await?;

    if !global.quiet {
        let color = output::should_color(&global.color);
        println!("{} {title}: {shutters} shutters", output::check_mark(color));
    }
    Ok(())
}

mod auto;
mod devices;
mod fleet;
mod matches;
mod swipe;

use crate::cli::{Cli, Commands};
use crate::error::Result;

pub async fn dispatch(cli: Cli) -> Result<()> {
	match cli.command {
		Commands::Devices(args) => devices::execute(args).await,
		Commands::Swipe(args) => swipe::execute(args).await,
		Commands::Matches(args) => matches::execute(args).await,
		Commands::Auto(args) => auto::execute(args).await,
		Commands::Fleet(args) => fleet::execute(args).await,
	}
}

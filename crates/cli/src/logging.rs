use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

pub fn init_logging(verbosity: u8) {
	// 0 = progress only (info from the bot, wire chatter off)
	// 1 (-v) = debug for everything but the wire
	// 2+ (-vv) = trace, including every driver request
	let filter = match verbosity {
		0 => "info,swipr_runtime=warn",
		1 => "debug,swipr_runtime=info",
		_ => "trace",
	};

	let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

	let stderr = std::io::stderr.with_max_level(tracing::Level::TRACE);

	tracing_subscriber::fmt()
		.with_env_filter(env_filter)
		.with_writer(stderr)
		.with_target(true)
		.with_level(true)
		.compact()
		.init();
}

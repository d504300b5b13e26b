//! Device resolution and driver-session bring-up.

use std::time::Duration;

use swipr::Session;
use swipr::session::{APP_ACTIVITY, APP_PACKAGE, verify_ready};
use swipr_protocol::Capabilities;
use swipr_runtime::DriverSession;
use tracing::info;

use crate::adb;
use crate::cli::DeviceOpts;
use crate::config::ProvisionConfig;
use crate::device::{Connectivity, DeviceDescriptor};
use crate::error::{CliError, Result};
use crate::provision::ProvisionClient;

/// Budget for a cloud phone to boot.
const PHONE_START_TIMEOUT: Duration = Duration::from_secs(180);

/// A resolved device plus everything needed to tear it down afterwards.
pub struct PreparedSession {
	pub session: Session<DriverSession>,
	pub descriptor: DeviceDescriptor,
	/// Set for cloud phones: the provisioning client to stop them with.
	pub cloud: Option<CloudContext>,
}

pub struct CloudContext {
	pub client: ProvisionClient,
	pub phone_id: String,
	pub keep_running: bool,
}

/// Resolves the device named in `opts` (or the first available one), boots
/// and tethers it if it is a cloud phone, and opens a driver session with
/// the app foregrounded.
pub async fn prepare(opts: &DeviceOpts) -> Result<PreparedSession> {
	let (descriptor, cloud) = if opts.local {
		(resolve_local(opts).await?, None)
	} else {
		let client = ProvisionClient::new(ProvisionConfig::from_env()?)?;
		let descriptor = resolve_cloud(&client, opts).await?;
		let address = tether_cloud_phone(&client, &descriptor.id).await?;
		let context = CloudContext {
			client,
			phone_id: descriptor.id.clone(),
			keep_running: opts.keep_phone_running,
		};
		(with_address(descriptor, address), Some(context))
	};

	let udid = descriptor.id.clone();
	let platform_version = adb::platform_version(&udid).await;
	info!(
		target = "swipr.setup",
		device = %descriptor.name,
		udid = %udid,
		platform_version = %platform_version,
		"initializing driver session"
	);

	let mut capabilities = Capabilities::android(APP_PACKAGE)
		.with_device(udid)
		.with_platform_version(platform_version)
		.with_app_activity(APP_ACTIVITY);
	if let Some(port) = opts.system_port {
		capabilities = capabilities.with_system_port(port);
	}

	let driver = DriverSession::create(&opts.server, &capabilities).await?;
	let mut session = Session::new(driver, APP_PACKAGE);
	if let Some(dir) = &opts.artifacts_dir {
		session = session.with_artifacts_dir(dir);
	}
	verify_ready(&session).await?;

	Ok(PreparedSession { session, descriptor, cloud })
}

async fn resolve_local(opts: &DeviceOpts) -> Result<DeviceDescriptor> {
	let devices = adb::list_local_devices().await?;
	DeviceDescriptor::select(devices, opts.device.as_deref()).ok_or(CliError::NoDevice {
		hint: Some("no local device in `adb devices` output".to_string()),
	})
}

async fn resolve_cloud(client: &ProvisionClient, opts: &DeviceOpts) -> Result<DeviceDescriptor> {
	let devices = client.available_devices().await?;
	DeviceDescriptor::select(devices, opts.device.as_deref()).ok_or(CliError::NoDevice {
		hint: Some("no active cloud phone on the account".to_string()),
	})
}

/// Boots the phone, fetches its ADB credentials, connects and logs in.
/// Returns the `ip:port` address the driver should target as udid.
async fn tether_cloud_phone(client: &ProvisionClient, phone_id: &str) -> Result<String> {
	adb::restart_server().await?;
	client.wait_until_started(phone_id, PHONE_START_TIMEOUT).await?;

	let info = client.ready_adb_info(phone_id).await?;
	let address = info.address().ok_or_else(|| CliError::Provision {
		code: -1,
		message: format!("phone {phone_id} returned no adb address"),
	})?;

	adb::connect(&address).await?;
	if let Some(password) = info.pwd.as_deref() {
		adb::cloud_login(&address, password).await?;
	}
	Ok(address)
}

fn with_address(mut descriptor: DeviceDescriptor, address: String) -> DeviceDescriptor {
	debug_assert_eq!(descriptor.connectivity, Connectivity::Cloud);
	descriptor.id = address;
	descriptor
}

//! Printer management endpoints.
//!
//! Binding and unbinding only succeed for devices owned by the developer account.

// crates.io
use serde::de::IgnoredAny;
// self
use crate::{
	_prelude::*,
	client::Client,
	http::HttpTransport,
	model::{Cleared, Device},
	query::Params,
};

impl<T> Client<T>
where
	T: ?Sized + HttpTransport,
{
	/// Binds `device_no` to the configured application.
	pub async fn device_bind(&self, device_no: &str) -> Result<()> {
		self.post::<IgnoredAny>("device_bind", &["device", device_no, "bind"], None).await?;

		Ok(())
	}

	/// Releases `device_no` from the configured application.
	pub async fn device_unbind(&self, device_no: &str) -> Result<()> {
		self.post::<IgnoredAny>("device_unbind", &["device", device_no, "unbind"], None).await?;

		Ok(())
	}

	/// Fetches the connection and paper state of `device_no`.
	pub async fn device(&self, device_no: &str) -> Result<Device> {
		self.get("device", &["device", device_no, "status"], Params::new()).await
	}

	/// Lists every printer visible to the configured application.
	pub async fn devices(&self) -> Result<Vec<Device>> {
		self.get("devices", &["devices"], Params::new()).await
	}

	/// Drops queued, unprinted jobs on `device_no` and returns how many were cleared.
	pub async fn device_clear(&self, device_no: &str) -> Result<u64> {
		let cleared: Cleared =
			self.post("device_clear", &["device", device_no, "msg", "clear"], None).await?;

		Ok(cleared.clear_cnt)
	}
}

// crates.io
use serde::de::IgnoredAny;
// self
use crate::{
	_prelude::*,
	client::Client,
	http::HttpTransport,
	model::{MessageStatus, PrintAccepted, PrintRequest},
	query::Params,
};

impl<T> Client<T>
where
	T: ?Sized + HttpTransport,
{
	/// Queues a print job and returns its message number.
	pub async fn print(&self, request: PrintRequest) -> Result<String> {
		let body = request.into_params(&self.config.app_id);
		let accepted: PrintAccepted = self.post("print", &["msg"], Some(body)).await?;

		Ok(accepted.msg_no)
	}

	/// Fetches the state of a print job.
	pub async fn message_status(&self, msg_no: &str) -> Result<MessageStatus> {
		self.get("message_status", &["msg", msg_no, "status"], Params::new()).await
	}

	/// Cancels a print job that has not printed yet.
	pub async fn message_cancel(&self, msg_no: &str) -> Result<()> {
		self.post::<IgnoredAny>("message_cancel", &["msg", msg_no, "cancel"], None).await?;

		Ok(())
	}
}

// self
use crate::{_prelude::*, client::Client, http::HttpTransport, model::Member, query::Params};

impl<T> Client<T>
where
	T: ?Sized + HttpTransport,
{
	/// Lists the members registered under the configured application.
	pub async fn members(&self) -> Result<Vec<Member>> {
		self.get("members", &["app", self.config.app_id.as_ref(), "members"], Params::new()).await
	}

	/// Fetches one member and the printers bound to it.
	pub async fn member(&self, uid: &str) -> Result<Member> {
		self.get("member", &["member", uid], Params::new()).await
	}
}

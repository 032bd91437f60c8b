// crates.io
use serde::de::IgnoredAny;
// self
use crate::{
	_prelude::*,
	client::Client,
	http::HttpTransport,
	model::{Template, TemplateAdded},
	query::{self, Params},
};

impl<T> Client<T>
where
	T: ?Sized + HttpTransport,
{
	/// Stores a new template and returns its identifier.
	pub async fn template_add(&self, template: &Template) -> Result<String> {
		let body = query::to_params(template)?;
		let added: TemplateAdded = self.post("template_add", &["template"], Some(body)).await?;

		Ok(added.template_id)
	}

	/// Replaces the name, content, catalog, and description of `template_id`.
	pub async fn template_edit(&self, template_id: &str, template: &Template) -> Result<()> {
		let body = query::to_params(template)?;

		self.post::<IgnoredAny>("template_edit", &["template", template_id], Some(body)).await?;

		Ok(())
	}

	/// Fetches one template.
	pub async fn template(&self, template_id: &str) -> Result<Template> {
		self.get("template", &["template", "detail", template_id], Params::new()).await
	}

	/// Lists every stored template.
	pub async fn templates(&self) -> Result<Vec<Template>> {
		self.get("templates", &["templates"], Params::new()).await
	}
}

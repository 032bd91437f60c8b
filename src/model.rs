//! Records exchanged with the printing API.

// self
use crate::{
	_prelude::*,
	auth::AppId,
	query::{Params, Value},
};

/// Error fields the API may add to any JSON object response.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ResponseError {
	/// Non-zero on failure.
	#[serde(default)]
	pub errcode: i64,
	/// Human-readable failure description.
	#[serde(default)]
	pub errmsg: String,
}
impl ResponseError {
	/// Returns `true` when the response reports a failure.
	pub fn is_error(&self) -> bool {
		self.errcode != 0
	}
}

/// Body returned by the token endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct TokenResponse {
	/// Issued access token.
	pub access_token: String,
	/// Application the token was issued for.
	#[serde(default)]
	pub appid: String,
	/// Token lifetime in seconds.
	pub expires_in: i64,
}

/// Connection state reported for a printer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
	/// Connected and ready.
	Online,
	/// Not connected.
	Offline,
	/// Print head overheated.
	Overheat,
	/// Printer reported a system fault.
	Error,
	/// State missing or not recognized by this SDK version.
	#[default]
	#[serde(other)]
	Unknown,
}

/// Paper state reported for a printer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaperStatus {
	/// Paper loaded. The API spells it `nomal`.
	#[serde(rename = "nomal", alias = "normal")]
	Normal,
	/// Out of paper.
	#[serde(rename = "lack")]
	Lack,
	/// State missing or not recognized by this SDK version.
	#[default]
	#[serde(other)]
	Unknown,
}

/// Printer status snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Device {
	/// Device serial number.
	pub device_no: String,
	/// Activation time.
	#[serde(default)]
	pub since: String,
	/// Connection state.
	#[serde(default)]
	pub status: DeviceStatus,
	/// Paper state.
	#[serde(default)]
	pub paper_status: PaperStatus,
	/// Most recent connection time.
	#[serde(default)]
	pub last_connected_at: String,
}

/// Receipt template.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
	/// Template name.
	pub name: String,
	/// Template markup.
	pub content: String,
	/// Grouping label.
	#[serde(default)]
	pub catalog: String,
	/// Free-form description.
	#[serde(default)]
	pub desc: String,
	/// Last modification time; empty when creating or editing.
	#[serde(default, skip_serializing)]
	pub updated_at: String,
}
impl Template {
	/// Creates a template payload for add/edit calls.
	pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
		Self { name: name.into(), content: content.into(), ..Default::default() }
	}

	/// Sets the grouping label.
	pub fn with_catalog(mut self, catalog: impl Into<String>) -> Self {
		self.catalog = catalog.into();

		self
	}

	/// Sets the description.
	pub fn with_desc(mut self, desc: impl Into<String>) -> Self {
		self.desc = desc.into();

		self
	}
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct TemplateAdded {
	pub(crate) template_id: String,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct PrintAccepted {
	pub(crate) msg_no: String,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct Cleared {
	pub(crate) clear_cnt: u64,
}

/// Print job status.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct MessageStatus {
	/// Message number returned by [`print`](crate::client::Client::print).
	pub msg_no: String,
	/// Job state as reported by the API.
	pub status: String,
	/// Time the job was accepted.
	#[serde(default)]
	pub msg_time: String,
	/// Time the job printed, when it has.
	#[serde(default)]
	pub print_time: String,
}

/// Printer bound to a member.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct MemberDevice {
	/// Device serial number.
	pub device_no: String,
	/// Hardware model.
	#[serde(default)]
	pub model: String,
	/// Free-form note.
	#[serde(default)]
	pub memo: String,
}

/// Member (end-user account) registered under an application.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Member {
	/// Member identifier.
	pub uid: String,
	/// Display name.
	#[serde(default)]
	pub name: String,
	/// Registration time.
	#[serde(default)]
	pub created_at: Option<String>,
	/// Printers bound to the member.
	#[serde(default)]
	pub devices: Vec<MemberDevice>,
}

/// What a print job renders.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PrintContent {
	/// Raw receipt markup.
	Text(String),
	/// Stored template filled with nested data.
	Template {
		/// Template identifier.
		template_id: String,
		/// Values substituted into the template.
		data: Params,
	},
}

/// Print job submitted to a device.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrintRequest {
	/// Target device serial number.
	pub device_no: String,
	/// Job content.
	pub content: PrintContent,
}
impl PrintRequest {
	/// Prints raw markup.
	pub fn text(device_no: impl Into<String>, content: impl Into<String>) -> Self {
		Self { device_no: device_no.into(), content: PrintContent::Text(content.into()) }
	}

	/// Prints a stored template filled with `data`.
	pub fn template(
		device_no: impl Into<String>,
		template_id: impl Into<String>,
		data: Params,
	) -> Self {
		Self {
			device_no: device_no.into(),
			content: PrintContent::Template { template_id: template_id.into(), data },
		}
	}

	pub(crate) fn into_params(self, app_id: &AppId) -> Params {
		let mut params = Params::new();

		params.insert("device_no".into(), self.device_no.into());
		params.insert("appid".into(), Value::from(app_id.as_ref()));

		match self.content {
			PrintContent::Text(content) => {
				params.insert("msg_content".into(), content.into());
			},
			PrintContent::Template { template_id, data } => {
				params.insert("template_id".into(), template_id.into());
				params.insert("template_data".into(), data.into());
			},
		}

		params
	}
}

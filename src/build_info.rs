//! Static build metadata reported by the Info path.

// self
use crate::_prelude::*;

/// Build and version metadata, populated once at startup and handed to the backend by value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildInfo {
	/// Build timestamp.
	pub build_date: String,
	/// Released version.
	pub build_version: String,
	/// Source commit hash.
	pub build_commit: String,
	/// Commit timestamp.
	pub build_commit_date: String,
	/// Branch the build was cut from.
	pub build_commit_branch: String,
	/// Release tag, if any.
	pub build_tag: String,
	/// Whether the working tree had uncommitted changes.
	pub build_dirty: String,
}
impl BuildInfo {
	/// Reads metadata from `VERCEL_TOKEN_BACKEND_BUILD_*` variables set at compile time.
	///
	/// Unset variables yield empty strings, except the version, which falls back to the crate
	/// version.
	pub fn from_build_env() -> Self {
		Self {
			build_date: option_env!("VERCEL_TOKEN_BACKEND_BUILD_DATE").unwrap_or_default().into(),
			build_version: option_env!("VERCEL_TOKEN_BACKEND_BUILD_VERSION")
				.unwrap_or(env!("CARGO_PKG_VERSION"))
				.into(),
			build_commit: option_env!("VERCEL_TOKEN_BACKEND_BUILD_COMMIT")
				.unwrap_or_default()
				.into(),
			build_commit_date: option_env!("VERCEL_TOKEN_BACKEND_BUILD_COMMIT_DATE")
				.unwrap_or_default()
				.into(),
			build_commit_branch: option_env!("VERCEL_TOKEN_BACKEND_BUILD_COMMIT_BRANCH")
				.unwrap_or_default()
				.into(),
			build_tag: option_env!("VERCEL_TOKEN_BACKEND_BUILD_TAG").unwrap_or_default().into(),
			build_dirty: option_env!("VERCEL_TOKEN_BACKEND_BUILD_DIRTY").unwrap_or_default().into(),
		}
	}
}

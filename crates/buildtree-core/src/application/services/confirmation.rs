//! Overwrite confirmation for existing bundles.

use std::path::Path;

use tracing::debug;

use crate::{
    application::ports::{Console, Filesystem},
    domain::{OverwriteDecision, is_affirmative},
    error::BuildtreeResult,
};

/// Default answer when the user just presses enter.
const DEFAULT_ANSWER: &str = "n";

/// Decide whether an existing bundle may be replaced.
///
/// The user is asked at most once. With input disabled nothing is asked and
/// the bundle is kept.
pub(crate) fn confirm_overwrite(
    filesystem: &dyn Filesystem,
    console: &dyn Console,
    bundle_path: &Path,
    display_path: &Path,
) -> BuildtreeResult<OverwriteDecision> {
    if !filesystem.exists(bundle_path) {
        return Ok(OverwriteDecision::Absent);
    }

    if !console.input_enabled() {
        debug!(path = %bundle_path.display(), "Input disabled; keeping existing bundle");
        return Ok(OverwriteDecision::Keep);
    }

    let question = format!(
        "The directory {} already exists; overwrite [y/N]? ",
        display_path.display()
    );
    let answer = console.prompt(&question, DEFAULT_ANSWER)?;

    Ok(if is_affirmative(&answer) {
        OverwriteDecision::Overwrite
    } else {
        OverwriteDecision::Keep
    })
}

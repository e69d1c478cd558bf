use tracing::{debug, instrument};

use venvflow_core::{ConfigurationError, FlowError, Result};

pub const PYTHON_MARKER: &str = "@_PYTHON@";
pub const OPTIONS_MARKER: &str = "@_OPTIONS@";
pub const DEFAULT_MARKER: &str = "@_DEFAULT@";

/// Separator between option entries; matches the indentation of the
/// `options` array in the templates.
const OPTIONS_SEPARATOR: &str = "\",\n                \"";

/// Template used when the project does not ship its own.
pub const BUILTIN_TEMPLATE: &str = include_str!("../resources/launch-template.json");

/// Extracts test ids from `pytest -q --co` output.
///
/// Ids are listed one per line; the first blank line ends the list and
/// everything after it (the summary) is ignored.
pub fn parse_collected_tests(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .take_while(|line| !line.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Fills the template with the interpreter path and the test entries.
#[instrument(skip(template))]
pub fn render_launch_config(template: &str, python: &str, entries: &[String]) -> Result<String> {
    let default = entries
        .first()
        .ok_or_else(|| FlowError::Discovery("no tests found".to_string()))?;
    debug!("rendering launch config with {} entries", entries.len());

    let rendered = template
        .replace(PYTHON_MARKER, python)
        .replace(OPTIONS_MARKER, &entries.join(OPTIONS_SEPARATOR))
        .replace(DEFAULT_MARKER, default);

    Ok(rendered)
}

/// Rejects templates that would render without the interpreter or the test list.
pub fn check_template(template: &str) -> Result<()> {
    let missing = [PYTHON_MARKER, OPTIONS_MARKER]
        .into_iter()
        .filter(|marker| !template.contains(marker))
        .collect::<Vec<_>>();

    if missing.is_empty() {
        return Ok(());
    }

    Err(ConfigurationError::InvalidValue {
        name: "launch template".to_string(),
        message: format!("missing marker(s): {}", missing.join(", ")),
    }
    .into())
}

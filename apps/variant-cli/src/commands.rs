//! # Form Commands
//!
//! The seller actions of the product form, as a JSON script.
//!
//! ## Script Format
//! ```json
//! [
//!   { "command": "renameOption", "index": 0, "name": "Color" },
//!   { "command": "addValue", "index": 0, "value": "Red" },
//!   { "command": "addOption" },
//!   { "command": "updateQuantity", "key": "Red", "quantity": "5" }
//! ]
//! ```

use bazaar_core::{CoreResult, FormSession};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{CliError, CliResult};

/// One seller action.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum FormCommand {
    AddOption,
    RemoveOption { index: usize },
    RenameOption { index: usize, name: String },
    AddValue { index: usize, value: String },
    RemoveValue {
        index: usize,
        #[serde(rename = "valueIndex")]
        value_index: usize,
    },
    UpdateQuantity { key: String, quantity: String },
    UpdatePrice { key: String, price: String },
    SetBasePrice { price: String },
}

impl FormCommand {
    /// Command name as written in scripts.
    pub fn name(&self) -> &'static str {
        match self {
            FormCommand::AddOption => "addOption",
            FormCommand::RemoveOption { .. } => "removeOption",
            FormCommand::RenameOption { .. } => "renameOption",
            FormCommand::AddValue { .. } => "addValue",
            FormCommand::RemoveValue { .. } => "removeValue",
            FormCommand::UpdateQuantity { .. } => "updateQuantity",
            FormCommand::UpdatePrice { .. } => "updatePrice",
            FormCommand::SetBasePrice { .. } => "setBasePrice",
        }
    }

    /// Applies the command to the session.
    pub fn apply(&self, session: &mut FormSession) -> CoreResult<()> {
        match self {
            FormCommand::AddOption => session.add_option().map(drop),
            FormCommand::RemoveOption { index } => session.remove_option(*index).map(drop),
            FormCommand::RenameOption { index, name } => session.rename_option(*index, name.as_str()),
            FormCommand::AddValue { index, value } => session.add_value(*index, value),
            FormCommand::RemoveValue { index, value_index } => {
                session.remove_value(*index, *value_index).map(drop)
            }
            FormCommand::UpdateQuantity { key, quantity } => {
                session.update_variant_quantity(key, quantity.as_str())
            }
            FormCommand::UpdatePrice { key, price } => session.update_variant_price(key, price.as_str()),
            FormCommand::SetBasePrice { price } => {
                session.set_base_price(price.as_str());
                Ok(())
            }
        }
    }
}

/// Outcome counts of a script run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptReport {
    pub applied: usize,
    pub rejected: usize,
}

/// Runs every command in order.
///
/// Rejected input is logged and skipped, like a form that simply ignores
/// the keystroke. Any other failure aborts the run.
pub fn run_script(session: &mut FormSession, commands: &[FormCommand]) -> CliResult<ScriptReport> {
    let mut report = ScriptReport::default();

    for (i, command) in commands.iter().enumerate() {
        let position = i + 1;
        debug!(position, command = command.name(), "Applying command");

        match command.apply(session) {
            Ok(()) => report.applied += 1,
            Err(err) if err.is_rejection() => {
                warn!(position, command = command.name(), error = %err, "Command rejected");
                report.rejected += 1;
            }
            Err(source) => {
                return Err(CliError::Command {
                    position,
                    command: command.name().to_string(),
                    source,
                })
            }
        }
    }

    Ok(report)
}

use fairmark_core::{AdjustmentPolicy, LiquidityPolicy, ScenarioPolicy};
use serde_json::json;

use crate::cli::{PolicyArgs, PolicyTable};
use crate::error::CliError;

use super::CommandResult;

pub fn run(args: &PolicyArgs) -> Result<CommandResult, CliError> {
    let adjustment = AdjustmentPolicy::standard();
    let liquidity = LiquidityPolicy::default();
    let scenario = ScenarioPolicy::default();

    let data = match args.table {
        PolicyTable::All => json!({
            "adjustment": adjustment,
            "liquidity": liquidity,
            "scenario": scenario,
        }),
        PolicyTable::Adjustment => json!({ "adjustment": adjustment }),
        PolicyTable::Liquidity => json!({ "liquidity": liquidity }),
        PolicyTable::Scenario => json!({ "scenario": scenario }),
    };

    Ok(CommandResult::ok(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prints_all_tables_by_default() {
        let result = run(&PolicyArgs {
            table: PolicyTable::All,
        })
        .expect("must run");

        assert!(result.data["adjustment"].is_object());
        assert!(result.data["liquidity"].is_object());
        assert!(result.data["scenario"].is_object());
    }

    #[test]
    fn selects_a_single_table() {
        let result = run(&PolicyArgs {
            table: PolicyTable::Scenario,
        })
        .expect("must run");

        assert!(result.data["scenario"]["base_days_on_market"].is_number());
        assert!(result.data.get("adjustment").is_none());
    }
}

//! Configuration validation.
//!
//! Checks every field the engine consumes before a run starts, so a bad
//! config fails fast with a section/key-qualified error instead of
//! producing a nonsense trace.

use crate::domain::error::TradesimError;
use crate::ports::config_port::ConfigPort;

pub const EXIT_RULE_SIGNAL: &str = "signal";
pub const EXIT_RULE_THRESHOLD: &str = "threshold";

pub fn validate_simulation_config(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    validate_initial_balance(config)?;
    validate_transaction_cost(config)?;
    validate_exit_rule(config)?;
    validate_risk_free_rate(config)?;
    Ok(())
}

fn invalid(key: &str, reason: &str) -> TradesimError {
    TradesimError::ConfigInvalid {
        section: "simulation".to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_initial_balance(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    let value = config.get_float("simulation", "initial_balance", 10_000.0);
    if !(value.is_finite() && value > 0.0) {
        return Err(invalid("initial_balance", "initial_balance must be positive"));
    }
    Ok(())
}

fn validate_transaction_cost(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    let value = config.get_float("simulation", "transaction_cost", 10.0);
    if !(value.is_finite() && value >= 0.0) {
        return Err(invalid(
            "transaction_cost",
            "transaction_cost must be non-negative",
        ));
    }
    Ok(())
}

fn validate_exit_rule(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    let rule = config
        .get_str("simulation", "exit_rule")
        .unwrap_or_else(|| EXIT_RULE_SIGNAL.to_string());

    match rule.as_str() {
        EXIT_RULE_SIGNAL => Ok(()),
        EXIT_RULE_THRESHOLD => {
            let take_profit = config.get_float("simulation", "take_profit", 0.05);
            if !(take_profit.is_finite() && take_profit > 0.0) {
                return Err(invalid(
                    "take_profit",
                    "take_profit must be a positive fraction of entry price",
                ));
            }
            let stop_loss = config.get_float("simulation", "stop_loss", 0.02);
            if !(stop_loss.is_finite() && stop_loss > 0.0 && stop_loss <= 1.0) {
                return Err(invalid(
                    "stop_loss",
                    "stop_loss must be a fraction in (0, 1]",
                ));
            }
            Ok(())
        }
        other => Err(invalid(
            "exit_rule",
            &format!("unknown exit_rule {other:?} (expected \"signal\" or \"threshold\")"),
        )),
    }
}

fn validate_risk_free_rate(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    let value = config.get_float("metrics", "risk_free_rate", 0.01);
    if !(value.is_finite() && (0.0..1.0).contains(&value)) {
        return Err(TradesimError::ConfigInvalid {
            section: "metrics".to_string(),
            key: "risk_free_rate".to_string(),
            reason: "risk_free_rate must be an annual fraction in [0, 1)".to_string(),
        });
    }
    Ok(())
}

//! Lambda ARN helpers.

use once_cell::sync::Lazy;
use regex::Regex;

/// Region used when the ARN does not carry one.
pub const DEFAULT_REGION: &str = "us-east-1";

static LAMBDA_ARN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"arn:aws:lambda:([^:]+):").expect("static ARN pattern is valid"));

/// Extract the region from a Lambda function ARN
/// (`arn:aws:lambda:<region>:<account>:function:<name>`).
///
/// Falls back to [`DEFAULT_REGION`] when the input is not a Lambda ARN.
pub fn extract_region_from_arn(arn: &str) -> &str {
    LAMBDA_ARN
        .captures(arn)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(DEFAULT_REGION)
}

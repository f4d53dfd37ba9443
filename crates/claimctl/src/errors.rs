//! Exit codes for claimctl

use claimcheck_common::{AnalysisResult, FailureKind};

/// Exit code for success
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for general errors, including errors reported by the service
pub const EXIT_GENERAL_ERROR: i32 = 1;

/// Exit code when required input is missing (EX_USAGE)
pub const EXIT_VALIDATION: i32 = 64;

/// Exit code when the service returns an unreadable response
pub const EXIT_INVALID_RESPONSE: i32 = 65;

/// Exit code when the service is unreachable or times out
pub const EXIT_SERVICE_UNAVAILABLE: i32 = 70;

/// Exit code for a terminal submission result
pub fn exit_code_for(result: &AnalysisResult) -> i32 {
    match result {
        AnalysisResult::Report(_) => EXIT_SUCCESS,
        AnalysisResult::Error { failure, .. } => match failure {
            FailureKind::Transport => EXIT_SERVICE_UNAVAILABLE,
            FailureKind::Malformed => EXIT_INVALID_RESPONSE,
            FailureKind::Server => EXIT_GENERAL_ERROR,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimcheck_common::AnalysisReport;

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            exit_code_for(&AnalysisResult::Report(AnalysisReport::default())),
            EXIT_SUCCESS
        );
        assert_eq!(
            exit_code_for(&AnalysisResult::error(FailureKind::Transport, "x")),
            EXIT_SERVICE_UNAVAILABLE
        );
        assert_eq!(
            exit_code_for(&AnalysisResult::error(FailureKind::Malformed, "x")),
            EXIT_INVALID_RESPONSE
        );
        assert_eq!(
            exit_code_for(&AnalysisResult::error(FailureKind::Server, "x")),
            EXIT_GENERAL_ERROR
        );
    }
}

use aws_sdk_cloudformation::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_cloudformation::types as cfn;
use stackreap_core::{StackId, StackName, StackStatus, StackSummary};
use stackreap_provider::ProviderError;

const THROTTLING_CODES: &[&str] = &["Throttling", "ThrottlingException", "RequestLimitExceeded"];

pub fn status_from_cfn(status: &cfn::StackStatus) -> StackStatus {
    StackStatus::parse(status.as_str())
}

pub fn status_to_cfn(status: &StackStatus) -> cfn::StackStatus {
    cfn::StackStatus::from(status.as_str())
}

/// `None` when the listing entry has no name; CloudFormation always sends one, so such an
/// entry is dropped rather than failing the run.
pub fn summary_from_cfn(s: &cfn::StackSummary) -> Option<StackSummary> {
    let name = s.stack_name()?;
    Some(StackSummary {
        name: StackName::from_str(name),
        id: StackId::from_str(s.stack_id().unwrap_or_default()),
        status: s
            .stack_status()
            .map(status_from_cfn)
            .unwrap_or_else(|| StackStatus::Other("UNKNOWN".to_string())),
        created_at_unix: s.creation_time().map(|t| t.secs()).unwrap_or_default(),
        updated_at_unix: s.last_updated_time().map(|t| t.secs()),
    })
}

/// CloudFormation has no dedicated not-found error: a missing stack is a
/// `ValidationError` whose message reads "Stack with id <name> does not exist".
pub fn is_missing_stack(code: &str, message: &str) -> bool {
    code == "ValidationError" && message.contains("does not exist")
}

pub fn classify_error<E, R>(stack: Option<&StackName>, err: SdkError<E, R>) -> ProviderError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug,
{
    if let SdkError::ServiceError(_) = &err {
        let code = err.code().unwrap_or("Unknown").to_string();
        let message = err.message().unwrap_or_default().to_string();

        if let Some(name) = stack {
            if is_missing_stack(&code, &message) {
                return ProviderError::NotFound(name.clone());
            }
        }
        if THROTTLING_CODES.contains(&code.as_str()) {
            return ProviderError::Transport(format!("{code}: {message}"));
        }
        return ProviderError::Rejected { code, message };
    }
    ProviderError::Transport(DisplayErrorContext(&err).to_string())
}

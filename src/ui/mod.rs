//! Terminal UI building blocks shared by the CLI and the chat loop.

use anyhow::Result;
use inquire::InquireError;

mod spinner;
mod style;

pub use spinner::Spinner;
pub use style::Style;

/// Returns `true` for Ctrl+C / Escape on an inquire prompt.
pub const fn is_prompt_cancelled(err: &InquireError) -> bool {
    matches!(
        err,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}

/// Runs `f`, treating a cancelled prompt inside it as success.
///
/// A newline is printed so the next output starts on a clean line.
pub fn handle_prompt_cancellation<F>(f: F) -> Result<()>
where
    F: FnOnce() -> Result<()>,
{
    match f() {
        Err(e)
            if e.downcast_ref::<InquireError>()
                .is_some_and(is_prompt_cancelled) =>
        {
            println!();
            Ok(())
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelled_prompt_is_swallowed() {
        assert!(handle_prompt_cancellation(|| Err(InquireError::OperationCanceled.into())).is_ok());
        assert!(
            handle_prompt_cancellation(|| Err(InquireError::OperationInterrupted.into())).is_ok()
        );
    }

    #[test]
    fn test_other_errors_propagate() {
        let result = handle_prompt_cancellation(|| Err(anyhow::anyhow!("config is broken")));
        let Err(err) = result else {
            panic!("expected an error");
        };
        assert!(err.to_string().contains("config is broken"));

        assert!(!is_prompt_cancelled(&InquireError::Custom("x".into())));
    }
}

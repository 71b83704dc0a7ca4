//! One-shot form submissions: contact, login, signup, service requests.

use himsols_core::{FlowState, FormFlow, FormKind, Notice, RequestForm, RequestIdGenerator};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::CliConfig;
use crate::output::Output;
use crate::render;
use crate::scheduler::TokioResetScheduler;

#[derive(Serialize)]
struct FlowView<'a> {
    kind: FormKind,
    notice: Option<&'a Notice>,
    #[serde(flatten)]
    state: &'a FlowState,
    form: &'a RequestForm,
}

impl<'a> FlowView<'a> {
    fn new(flow: &'a FormFlow, notice: Option<&'a Notice>) -> Self {
        Self {
            kind: flow.kind(),
            notice,
            state: flow.state(),
            form: flow.form(),
        }
    }
}

/// Fill `form` with the non-empty `fields` and submit it.
///
/// When the form resets itself after submitting (contact), this waits for the
/// reset and shows the cleared form unless `wait_for_reset` is false.
///
/// # Errors
///
/// Returns an error if a field is unknown, validation fails, or output fails.
pub async fn submit(
    form: RequestForm,
    fields: &[(&str, String)],
    config: &CliConfig,
    wait_for_reset: bool,
    output: Output,
) -> Result<(), Box<dyn std::error::Error>> {
    let ids = config.request_ids.build();
    let mut flow = FormFlow::with_form(form).with_reset_delay(config.contact_reset_delay);
    for (name, value) in fields {
        if !value.is_empty() {
            flow.update_field(name, value.as_str())?;
        }
    }

    let (mut scheduler, mut resets) = TokioResetScheduler::new();
    submit_flow(&mut flow, ids.as_ref(), &mut scheduler, output)?;

    if wait_for_reset && flow.pending_reset().is_some() {
        while let Some(ticket) = resets.recv().await {
            if flow.fire_reset(ticket) {
                output.emit(&render::flow(&flow), &FlowView::new(&flow, None))?;
                break;
            }
        }
    }
    Ok(())
}

fn submit_flow(
    flow: &mut FormFlow,
    ids: &dyn RequestIdGenerator,
    scheduler: &mut TokioResetScheduler,
    output: Output,
) -> Result<(), Box<dyn std::error::Error>> {
    let kind = flow.kind();
    match flow.submit(ids, scheduler) {
        Ok(result) => {
            info!(%kind, request_id = %result, "submission accepted");
            let notice = Notice::submitted(kind, &result);
            let mut lines = vec![render::notice(&notice)];
            lines.extend(render::flow(flow));
            output.emit(&lines, &FlowView::new(flow, Some(&notice)))?;
            Ok(())
        }
        Err(err) => {
            warn!(%kind, error = %err, "submission rejected");
            let notice = Notice::for_error(kind, &err);
            output.emit(&[render::notice(&notice)], &FlowView::new(flow, Some(&notice)))?;
            Err(err.into())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use himsols_core::FormError;

    use super::*;

    fn config() -> CliConfig {
        CliConfig {
            contact_reset_delay: Duration::from_secs(3),
            ..CliConfig::default()
        }
    }

    fn field(name: &'static str, value: &str) -> (&'static str, String) {
        (name, value.to_string())
    }

    #[tokio::test(start_paused = true)]
    async fn test_contact_submit_waits_for_reset() {
        let fields = [
            field("name", "Asha"),
            field("mobile", "9876543210"),
            field("email", ""),
            field("message", "Need saplings"),
        ];
        submit(
            RequestForm::new(FormKind::Contact),
            &fields,
            &config(),
            true,
            Output::Json,
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_signup_mismatch_is_error() {
        let fields = [
            field("name", "Asha"),
            field("email", "a@b.in"),
            field("mobile", "9876543210"),
            field("password", "secret1"),
            field("confirmPassword", "secret2"),
        ];
        let err = submit(
            RequestForm::new(FormKind::Signup),
            &fields,
            &config(),
            false,
            Output::Json,
        )
        .await
        .unwrap_err();
        assert_eq!(
            err.downcast_ref::<FormError>(),
            Some(&FormError::PasswordMismatch)
        );
    }

    #[test]
    fn test_json_view_hides_passwords() {
        let mut flow = FormFlow::new(FormKind::Signup);
        flow.update_field("name", "Asha").unwrap();
        flow.update_field("password", "hunter2-secret").unwrap();
        flow.update_field("confirmPassword", "other-secret").unwrap();
        let notice = Notice::for_error(FormKind::Signup, &FormError::PasswordMismatch);

        let json = serde_json::to_string(&FlowView::new(&flow, Some(&notice))).unwrap();
        assert!(!json.contains("hunter2-secret"));
        assert!(!json.contains("other-secret"));
        assert!(json.contains("Asha"));
    }

    #[tokio::test]
    async fn test_missing_field_is_error() {
        let err = submit(
            RequestForm::new(FormKind::Login),
            &[field("email", "a@b.in")],
            &config(),
            false,
            Output::Json,
        )
        .await
        .unwrap_err();
        let err = err.downcast_ref::<FormError>().unwrap();
        assert_eq!(err.missing_fields(), ["password".to_string()]);
    }
}

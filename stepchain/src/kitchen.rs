//! Shop, soak, cook: a three-step chain of dependent async operations.
//!
//! Each operation needs the resolved value of the one before it, so they
//! cannot start until the previous one finishes.

use crate::errors::{PipelineValidationError, StepError};
use crate::pipeline::{Pipeline, PipelineBuilder};
use std::time::Duration;

/// Bean type bought at the shop.
pub const BEAN_TYPE: &str = "pinto";

/// Message announced once the beans are cooked.
pub const DINNER_READY: &str = "Dinner is ready!";

const CHORE_DELAY: Duration = Duration::from_millis(5);

/// Buys beans and resolves to their type.
pub async fn shop_for_beans() -> Result<String, StepError> {
    tokio::time::sleep(CHORE_DELAY).await;
    Ok(BEAN_TYPE.to_string())
}

/// Soaks beans of the given type and resolves to whether they softened.
pub async fn soak_the_beans(bean_type: String) -> Result<bool, StepError> {
    if bean_type.trim().is_empty() {
        return Err(StepError::rejected("no beans to soak"));
    }
    tokio::time::sleep(CHORE_DELAY).await;
    tracing::debug!(%bean_type, "Beans soaked");
    Ok(true)
}

/// Cooks softened beans and resolves to the dinner announcement.
pub async fn cook_the_beans(is_softened: bool) -> Result<String, StepError> {
    if !is_softened {
        return Err(StepError::rejected("the beans are still hard"));
    }
    tokio::time::sleep(CHORE_DELAY).await;
    Ok(DINNER_READY.to_string())
}

/// Returns a builder with the shop, soak and cook steps in order.
#[must_use]
pub fn kitchen_builder() -> PipelineBuilder {
    PipelineBuilder::new("make-beans")
        .then_typed("shop_for_beans", |(): ()| shop_for_beans())
        .then_typed("soak_the_beans", soak_the_beans)
        .then_typed("cook_the_beans", cook_the_beans)
}

/// Builds the shop, soak, cook pipeline.
pub fn make_beans_pipeline() -> Result<Pipeline, PipelineValidationError> {
    kitchen_builder().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_chores_individually() {
        assert_eq!(shop_for_beans().await.unwrap(), "pinto");
        assert!(soak_the_beans("pinto".to_string()).await.unwrap());
        assert_eq!(cook_the_beans(true).await.unwrap(), DINNER_READY);
    }

    #[tokio::test]
    async fn test_chores_reject_bad_input() {
        assert_eq!(
            soak_the_beans(" ".to_string()).await,
            Err(StepError::rejected("no beans to soak"))
        );
        assert_eq!(
            cook_the_beans(false).await,
            Err(StepError::rejected("the beans are still hard"))
        );
    }

    #[tokio::test]
    async fn test_make_beans() {
        let pipeline = make_beans_pipeline().unwrap();
        let outcome = pipeline.run_traced(None).await.unwrap();

        assert_eq!(outcome.output, json!(DINNER_READY));
        assert_eq!(
            outcome.trace.outputs(),
            vec![json!("pinto"), json!(true), json!("Dinner is ready!")]
        );
    }

    #[tokio::test]
    async fn test_cook_rejects_wrong_shape() {
        let pipeline = PipelineBuilder::new("bad")
            .then_typed("cook_the_beans", cook_the_beans)
            .build()
            .unwrap();

        let failure = pipeline.run(Some(json!("pinto"))).await.unwrap_err();
        assert_eq!(failure.step_index, 0);
        assert_eq!(failure.cause.kind(), "invalid_input");
    }
}

// Ordered request pipeline: each step sees the same scope and may stop
// the chain by producing a response of its own.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    Router,
};

use super::scope::RequestScope;

/// Outcome of a single step
pub enum Flow {
    /// Hand the scope to the next step, or to the handler after the last one
    Continue,
    /// Stop here and send this response
    Respond(Response),
}

#[async_trait]
pub trait Step: Send + Sync {
    fn name(&self) -> &'static str;

    async fn execute(&self, scope: &mut RequestScope<'_>) -> Flow;
}

/// Steps run in declaration order. A pipeline with no steps passes every
/// request straight through.
#[derive(Clone, Default)]
pub struct Pipeline {
    steps: Vec<Arc<dyn Step>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step; it runs after every step added before it
    pub fn step(mut self, step: impl Step + 'static) -> Self {
        tracing::debug!("Registered pipeline step '{}'", step.name());
        self.steps.push(Arc::new(step));
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|step| step.name()).collect()
    }

    pub async fn run(&self, scope: &mut RequestScope<'_>) -> Flow {
        for step in &self.steps {
            let started = Instant::now();
            match step.execute(scope).await {
                Flow::Continue => {
                    tracing::trace!("Step '{}' continued after {:?}", step.name(), started.elapsed());
                }
                Flow::Respond(response) => {
                    tracing::debug!(
                        "Pipeline stopped at step '{}' with status {}",
                        step.name(),
                        response.status()
                    );
                    return Flow::Respond(response);
                }
            }
        }
        Flow::Continue
    }
}

/// Axum middleware running `pipeline` ahead of the wrapped handler. A
/// resolved principal is moved into the request extensions for the
/// `CurrentUser` extractor.
pub async fn run_pipeline(State(pipeline): State<Pipeline>, request: Request, next: Next) -> Response {
    let (mut parts, body) = request.into_parts();

    let (flow, principal) = {
        let mut scope = RequestScope::new(&parts);
        let flow = pipeline.run(&mut scope).await;
        (flow, scope.into_principal())
    };

    if let Flow::Respond(response) = flow {
        return response;
    }
    if let Some(principal) = principal {
        parts.extensions.insert(principal);
    }
    next.run(Request::from_parts(parts, body)).await
}

/// Wrap every route in `routes` with `pipeline`, so the steps run before
/// each handler and may answer in its place.
pub fn compose<S>(routes: Router<S>, pipeline: Pipeline) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    routes.route_layer(middleware::from_fn_with_state(pipeline, run_pipeline))
}

//! The edge gate: resolve, classify, decide, enforce.

use {
    super::{
        CallerIdentity, Decision, MatcherSet, PathClass, PathClassifier, RedirectPolicy,
        SessionResolver,
    },
    crate::{AuthConfig, Config, GateConfig, Result},
    axum::{
        body::Body,
        extract::Request,
        middleware::Next,
        response::{IntoResponse, Redirect, Response},
    },
    std::sync::Arc,
};

/// Everything needed to gate a request, built once from [`Config`] and shared
/// behind an `Arc` by all requests.
#[derive(Debug, Clone)]
pub struct Gate {
    resolver: SessionResolver,
    classifier: PathClassifier,
    policy: RedirectPolicy,
    matchers: MatcherSet,
}

/// What the gate concluded about one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateOutcome {
    pub identity: Option<CallerIdentity>,
    pub class: PathClass,
    pub decision: Decision,
}

impl Gate {
    /// Builds the gate. Fails with a configuration error when the secret or
    /// the gate section is unusable; the server must not start in that case.
    pub fn new(config: &Config) -> Result<Self> {
        Self::from_parts(&config.auth, &config.gate)
    }

    pub fn from_parts(auth: &AuthConfig, gate: &GateConfig) -> Result<Self> {
        gate.validate()?;
        Ok(Self {
            resolver: SessionResolver::new(auth)?,
            classifier: PathClassifier::from_config(gate),
            policy: RedirectPolicy::from_config(gate),
            matchers: MatcherSet::compile(&gate.matchers)?,
        })
    }

    /// True when the matcher set selects `path`.
    pub fn intercepts(&self, path: &str) -> bool {
        self.matchers.matches(path)
    }

    /// Classifies `path` and applies the redirect rules for `identity`.
    pub fn evaluate(&self, identity: Option<&CallerIdentity>, path: &str) -> Decision {
        let class = self.classifier.classify(path);
        self.policy.decide(identity, path, class)
    }

    /// Runs the whole pipeline for a request the gate intercepts.
    pub fn check<B>(&self, request: &Request<B>) -> GateOutcome {
        let path = request.uri().path();
        let identity = self.resolver.resolve(request);
        let class = self.classifier.classify(path);
        let decision = self.policy.decide(identity.as_ref(), path, class);
        GateOutcome {
            identity,
            class,
            decision,
        }
    }

    pub fn resolver(&self) -> &SessionResolver {
        &self.resolver
    }

    pub fn classifier(&self) -> &PathClassifier {
        &self.classifier
    }

    pub fn policy(&self) -> &RedirectPolicy {
        &self.policy
    }

    pub fn matchers(&self) -> &MatcherSet {
        &self.matchers
    }
}

/// Axum middleware enforcing the gate.
///
/// Requests outside the matcher set pass through untouched. Intercepted
/// requests are either redirected (307) or forwarded with the resolved
/// [`CallerIdentity`] in their extensions.
pub(crate) async fn gate_middleware(
    gate: Arc<Gate>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    if !gate.intercepts(&path) {
        return next.run(request).await;
    }

    let GateOutcome {
        identity,
        class,
        decision,
    } = gate.check(&request);

    match decision {
        Decision::RedirectTo(target) => {
            tracing::debug!(
                path = %path,
                class = %class,
                authenticated = identity.is_some(),
                target = %target,
                "Redirecting gated request"
            );
            Redirect::temporary(&target).into_response()
        }
        Decision::Allow => {
            if let Some(identity) = identity {
                request.extensions_mut().insert(identity);
            }
            next.run(request).await
        }
    }
}

//! Application routes: the gated pages and the mock integrations.

use super::router::FluentRouter;
use crate::{api, pages};

impl<State> FluentRouter<State>
where
    State: Clone + Send + Sync + 'static,
{
    /// Registers the pages for the paths configured in `[gate]`.
    ///
    /// Call before [`setup_middleware`](FluentRouter::setup_middleware) so the
    /// gate layer covers them.
    #[must_use]
    pub fn setup_pages(mut self) -> Self {
        let state = pages::PageState::new(self.gate(), &self.config);
        self.inner = self.inner.merge(pages::router(state, &self.config));
        self
    }

    /// Registers the mock bank-link endpoints under `/api/plaid`.
    #[must_use]
    pub fn setup_mock_integrations(mut self) -> Self {
        self.inner = self.inner.merge(api::plaid::router());
        self
    }
}

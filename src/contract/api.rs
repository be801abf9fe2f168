use std::sync::Arc;

use crate::config::ContractConfig;
use crate::request::Request;
use crate::response::Response;
use crate::schema::Schema;

use super::{Accepts, Handler, Returns};

/// Full contract: accepts, then the handler, then returns.
///
/// A request rejected by the accepts stage never reaches the handler, so the
/// returns stage only ever sees responses the handler produced.
///
/// Built with [`Contract::api`](super::Contract::api).
#[derive(Debug, Clone)]
pub struct Api<H> {
    config: ContractConfig,
    pipeline: Accepts<Returns<H>>,
}

impl<H: Handler> Api<H> {
    pub(crate) fn new(schema: Arc<Schema>, config: ContractConfig, handler: H) -> Self {
        let returns = Returns::new(Arc::clone(&schema), config, handler);
        Self {
            config,
            pipeline: Accepts::new(schema, config, returns),
        }
    }

    /// Returns the wrapped handler.
    pub fn inner(&self) -> &H {
        self.pipeline.inner().inner()
    }
}

impl<H: Handler> Handler for Api<H> {
    fn call(&self, request: Request) -> Response {
        if self.config.mode().is_bypassed() {
            return self.inner().call(request);
        }
        self.pipeline.call(request)
    }
}

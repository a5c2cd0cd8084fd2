use std::sync::Arc;

use super::{
    AfterRequestHook, BeforeRequestHook, HookPoint, WebsocketCloseHook, WebsocketConnectHook,
    WebsocketMessageHook,
};

/// Ordered callbacks per hook point. Order is registration order.
#[derive(Default, Clone)]
pub struct HookRegistry {
    pub(crate) before_request: Vec<Arc<dyn BeforeRequestHook>>,
    pub(crate) after_request: Vec<Arc<dyn AfterRequestHook>>,
    pub(crate) websocket_connect: Vec<Arc<dyn WebsocketConnectHook>>,
    pub(crate) websocket_message: Vec<Arc<dyn WebsocketMessageHook>>,
    pub(crate) websocket_close: Vec<Arc<dyn WebsocketCloseHook>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_before_request(&mut self, hook: impl BeforeRequestHook + 'static) -> &mut Self {
        self.before_request.push(Arc::new(hook));
        self
    }

    pub fn on_after_request(&mut self, hook: impl AfterRequestHook + 'static) -> &mut Self {
        self.after_request.push(Arc::new(hook));
        self
    }

    pub fn on_websocket_connect(&mut self, hook: impl WebsocketConnectHook + 'static) -> &mut Self {
        self.websocket_connect.push(Arc::new(hook));
        self
    }

    pub fn on_websocket_message(&mut self, hook: impl WebsocketMessageHook + 'static) -> &mut Self {
        self.websocket_message.push(Arc::new(hook));
        self
    }

    pub fn on_websocket_close(&mut self, hook: impl WebsocketCloseHook + 'static) -> &mut Self {
        self.websocket_close.push(Arc::new(hook));
        self
    }

    /// Number of callbacks registered at `point`.
    pub fn len(&self, point: HookPoint) -> usize {
        match point {
            HookPoint::BeforeRequest => self.before_request.len(),
            HookPoint::AfterRequest => self.after_request.len(),
            HookPoint::WebsocketConnect => self.websocket_connect.len(),
            HookPoint::WebsocketMessage => self.websocket_message.len(),
            HookPoint::WebsocketClose => self.websocket_close.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        HookPoint::ALL.iter().all(|point| self.len(*point) == 0)
    }

    /// Appends every callback of `other` after the existing ones.
    pub fn extend(&mut self, other: HookRegistry) {
        self.before_request.extend(other.before_request);
        self.after_request.extend(other.after_request);
        self.websocket_connect.extend(other.websocket_connect);
        self.websocket_message.extend(other.websocket_message);
        self.websocket_close.extend(other.websocket_close);
    }
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("HookRegistry");
        for point in HookPoint::ALL {
            s.field(point.name(), &self.len(point));
        }
        s.finish()
    }
}

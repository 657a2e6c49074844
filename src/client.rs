//! Zendesk API client.
//!
//! [`HttpClient`] owns the transport and the state shared by resources:
//! the sideload directive, one pending id per resource kind, and what the
//! last response looked like. Resource handles borrow it mutably, so one
//! client drives one call at a time. Wrap it in a `Mutex` to share it
//! across threads.

use std::collections::HashMap;

use reqwest::StatusCode;
use tracing::{debug, trace, warn};

use crate::config::ClientConfig;
use crate::http::{ApiRequest, RawResponse, ReqwestTransport, Transport};
use crate::params::{ParamValue, Params};
use crate::resources::{Apps, ResourceKind};
use crate::response::{ApiObject, DebugInfo, Decoded};
use crate::{Result, ZendeskApiError};

pub struct HttpClient<T: Transport = ReqwestTransport> {
    transport: T,
    sideload: Option<Vec<String>>,
    last_ids: HashMap<ResourceKind, u64>,
    debug: DebugInfo,
}

impl HttpClient<ReqwestTransport> {
    /// Client over the blocking reqwest transport.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self::with_transport(ReqwestTransport::new(config)?))
    }
}

impl<T: Transport> HttpClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            sideload: None,
            last_ids: HashMap::new(),
            debug: DebugInfo::default(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Request and response details of the last call.
    pub fn debug(&self) -> &DebugInfo {
        &self.debug
    }

    pub fn sideload(&self) -> Option<&[String]> {
        self.sideload.as_deref()
    }

    /// Related resources to include in the next response. Reset after every
    /// successful call.
    pub fn set_sideload(&mut self, sideload: Option<Vec<String>>) {
        self.sideload = sideload;
    }

    /// The `sideload` param wins over the client-level directive. It may be a
    /// list or a comma-separated string.
    pub(crate) fn sideload_for(&self, params: &Params) -> Option<Vec<String>> {
        match params.get("sideload") {
            Some(ParamValue::Json(serde_json::Value::Array(items))) => Some(
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect(),
            ),
            Some(ParamValue::Json(serde_json::Value::String(s))) => Some(
                s.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
            _ => self.sideload.clone(),
        }
    }

    /// Apps resource.
    pub fn apps(&mut self) -> Apps<'_, T> {
        Apps::new(self)
    }

    /// Apps resource with `id` primed for the next id-taking call.
    pub fn app(&mut self, id: u64) -> Apps<'_, T> {
        self.set_last_id(ResourceKind::Apps, id);
        Apps::new(self)
    }

    /// Pending id for a resource kind, if any.
    pub fn last_id(&self, kind: ResourceKind) -> Option<u64> {
        self.last_ids.get(&kind).copied()
    }

    pub(crate) fn set_last_id(&mut self, kind: ResourceKind, id: u64) {
        trace!(?kind, id, "priming last id");
        self.last_ids.insert(kind, id);
    }

    /// One-shot: the id is cleared as it is read.
    pub(crate) fn take_last_id(&mut self, kind: ResourceKind) -> Option<u64> {
        self.last_ids.remove(&kind)
    }

    fn dispatch(&mut self, request: &ApiRequest) -> Result<RawResponse> {
        let line = format!("{} {}", request.method, request.endpoint);
        debug!(request = %line, "sending request");
        self.debug = DebugInfo {
            last_request: Some(line),
            ..DebugInfo::default()
        };

        let resp = self.transport.send(request)?;
        debug!(status = resp.status, "received response");
        self.debug.last_response_code = Some(resp.status);
        self.debug.last_response_headers = resp.headers.clone();
        if resp.status >= 400 {
            self.debug.last_response_error = Some(resp.body.clone());
        }
        Ok(resp)
    }

    fn finish(&mut self) {
        if self.sideload.take().is_some() {
            trace!("sideload reset");
        }
    }

    /// Send, then require an object body and exactly `expected`.
    pub(crate) fn expect_object(
        &mut self,
        method: &'static str,
        request: ApiRequest,
        expected: StatusCode,
    ) -> Result<ApiObject> {
        let resp = self.dispatch(&request)?;
        match Decoded::from_body(&resp.body) {
            Decoded::Object(obj) if resp.status == expected.as_u16() => {
                self.finish();
                Ok(obj)
            }
            decoded => {
                warn!(
                    method,
                    status = resp.status,
                    expected = expected.as_u16(),
                    body_is_object = decoded.is_object(),
                    "rejecting response"
                );
                Err(ZendeskApiError::ResponseError { method })
            }
        }
    }

    /// Send, then require exactly `expected`. The body is ignored.
    pub(crate) fn expect_status(
        &mut self,
        method: &'static str,
        request: ApiRequest,
        expected: StatusCode,
    ) -> Result<()> {
        let resp = self.dispatch(&request)?;
        if resp.status != expected.as_u16() {
            warn!(
                method,
                status = resp.status,
                expected = expected.as_u16(),
                "rejecting response"
            );
            return Err(ZendeskApiError::ResponseError { method });
        }
        self.finish();
        Ok(())
    }
}

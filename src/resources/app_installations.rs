//! App installations: list, show, install, reconfigure and remove.

use reqwest::StatusCode;

use crate::client::HttpClient;
use crate::http::{ApiRequest, Endpoint, ReqwestTransport, RequestBody, Transport};
use crate::params::{self, Params};
use crate::resources::{inject_last_id, ResourceKind};
use crate::response::ApiObject;
use crate::Result;

pub struct AppInstallations<'c, T: Transport = ReqwestTransport> {
    client: &'c mut HttpClient<T>,
}

impl<'c, T: Transport> AppInstallations<'c, T> {
    pub(crate) fn new(client: &'c mut HttpClient<T>) -> Self {
        Self { client }
    }

    /// GET apps/installations.json
    pub fn find_all(&mut self, params: Params) -> Result<ApiObject> {
        const METHOD: &str = "AppInstallations::find_all";
        let endpoint = Endpoint::prepare("apps/installations.json")
            .with_sideload(self.client.sideload_for(&params).as_deref())
            .with_iterators(&params);
        self.client.expect_object(METHOD, ApiRequest::get(endpoint), StatusCode::OK)
    }

    /// GET apps/installations/{id}.json
    pub fn find(&mut self, mut params: Params) -> Result<ApiObject> {
        const METHOD: &str = "AppInstallations::find";
        inject_last_id(self.client, ResourceKind::AppInstallations, &mut params);
        params::require(METHOD, &params, &["id"])?;
        let id = params.path_segment(METHOD, "id")?;
        let endpoint = Endpoint::prepare(format!("apps/installations/{id}.json"))
            .with_sideload(self.client.sideload_for(&params).as_deref());
        self.client.expect_object(METHOD, ApiRequest::get(endpoint), StatusCode::OK)
    }

    /// POST apps/installations.json: install an app. Expects 201.
    pub fn create(&mut self, params: Params) -> Result<ApiObject> {
        const METHOD: &str = "AppInstallations::create";
        params::require(METHOD, &params, &["app_id"])?;
        let request = ApiRequest::post(
            Endpoint::prepare("apps/installations.json"),
            RequestBody::Json(params.to_json()),
        );
        self.client.expect_object(METHOD, request, StatusCode::CREATED)
    }

    /// PUT apps/installations/{id}.json: everything but `id` and `sideload`
    /// is the body.
    pub fn update(&mut self, mut params: Params) -> Result<ApiObject> {
        const METHOD: &str = "AppInstallations::update";
        inject_last_id(self.client, ResourceKind::AppInstallations, &mut params);
        params::require(METHOD, &params, &["id"])?;
        let id = params.path_segment(METHOD, "id")?;
        params.remove("id");
        params.remove("sideload");
        let request = ApiRequest::put(
            Endpoint::prepare(format!("apps/installations/{id}.json")),
            RequestBody::Json(params.to_json()),
        );
        self.client.expect_object(METHOD, request, StatusCode::OK)
    }

    /// DELETE apps/installations/{id}.json. Expects 204.
    pub fn delete(&mut self, mut params: Params) -> Result<bool> {
        const METHOD: &str = "AppInstallations::delete";
        inject_last_id(self.client, ResourceKind::AppInstallations, &mut params);
        params::require(METHOD, &params, &["id"])?;
        let id = params.path_segment(METHOD, "id")?;
        let endpoint = Endpoint::prepare(format!("apps/installations/{id}.json"));
        let request = ApiRequest::delete(endpoint);
        self.client.expect_status(METHOD, request, StatusCode::NO_CONTENT)?;
        Ok(true)
    }
}

//! Apps: upload a package, create or update an app from it, poll the
//! build job, delete, and notify running instances.

use reqwest::StatusCode;

use crate::client::HttpClient;
use crate::http::{ApiRequest, Endpoint, ReqwestTransport, RequestBody, Transport};
use crate::params::{self, Params};
use crate::resources::{inject_last_id, AppInstallations, ResourceKind};
use crate::response::ApiObject;
use crate::Result;

const UPLOAD_FIELD: &str = "uploaded_data";

pub struct Apps<'c, T: Transport = ReqwestTransport> {
    client: &'c mut HttpClient<T>,
}

impl<'c, T: Transport> Apps<'c, T> {
    pub(crate) fn new(client: &'c mut HttpClient<T>) -> Self {
        Self { client }
    }

    /// POST apps/uploads.json: upload an app package (`file`). Expects 201.
    pub fn upload(&mut self, params: Params) -> Result<ApiObject> {
        const METHOD: &str = "Apps::upload";
        params::require(METHOD, &params, &["file"])?;
        let file = params.file_path(METHOD, "file")?;
        let request = ApiRequest::post(
            Endpoint::prepare("apps/uploads.json"),
            RequestBody::Upload {
                field: UPLOAD_FIELD,
                path: file,
            },
        );
        self.client.expect_object(METHOD, request, StatusCode::CREATED)
    }

    /// POST apps.json: create an app from an upload. Expects 202 and a
    /// `job_id` to poll.
    pub fn create(&mut self, params: Params) -> Result<ApiObject> {
        const METHOD: &str = "Apps::create";
        let request = ApiRequest::post(
            Endpoint::prepare("apps.json"),
            RequestBody::Json(params.to_json()),
        );
        self.client.expect_object(METHOD, request, StatusCode::ACCEPTED)
    }

    /// GET apps/job_statuses/{id}.json
    pub fn job_status(&mut self, params: Params) -> Result<ApiObject> {
        const METHOD: &str = "Apps::job_status";
        params::require(METHOD, &params, &["id"])?;
        let id = params.path_segment(METHOD, "id")?;
        let endpoint = Endpoint::prepare(format!("apps/job_statuses/{id}.json"));
        let request = ApiRequest::get(endpoint);
        self.client.expect_object(METHOD, request, StatusCode::OK)
    }

    /// PUT apps/{id}.json: replace the app package. `id` may come from a
    /// primed id.
    pub fn update(&mut self, mut params: Params) -> Result<ApiObject> {
        const METHOD: &str = "Apps::update";
        inject_last_id(self.client, ResourceKind::Apps, &mut params);
        params::require(METHOD, &params, &["file", "id"])?;
        let id = params.path_segment(METHOD, "id")?;
        let file = params.file_path(METHOD, "file")?;
        let request = ApiRequest::put(
            Endpoint::prepare(format!("apps/{id}.json")),
            RequestBody::Upload {
                field: UPLOAD_FIELD,
                path: file,
            },
        );
        self.client.expect_object(METHOD, request, StatusCode::OK)
    }

    /// DELETE apps/{id}.json. Only the status is checked.
    pub fn delete(&mut self, mut params: Params) -> Result<bool> {
        const METHOD: &str = "Apps::delete";
        inject_last_id(self.client, ResourceKind::Apps, &mut params);
        params::require(METHOD, &params, &["id"])?;
        let id = params.path_segment(METHOD, "id")?;
        let request = ApiRequest::delete(Endpoint::prepare(format!("apps/{id}.json")));
        self.client.expect_status(METHOD, request, StatusCode::OK)?;
        Ok(true)
    }

    /// POST apps/notify.json: push an event to running app instances.
    pub fn send_notification(&mut self, params: Params) -> Result<ApiObject> {
        const METHOD: &str = "Apps::send_notification";
        let request = ApiRequest::post(
            Endpoint::prepare("apps/notify.json"),
            RequestBody::Json(params.to_json()),
        );
        self.client.expect_object(METHOD, request, StatusCode::OK)
    }

    /// Installations sub-resource, with `id` primed when given.
    pub fn installations(&mut self, id: Option<u64>) -> AppInstallations<'_, T> {
        if let Some(id) = id {
            self.client.set_last_id(ResourceKind::AppInstallations, id);
        }
        AppInstallations::new(self.client)
    }

    /// Installations sub-resource with `id` primed.
    pub fn installation(&mut self, id: u64) -> AppInstallations<'_, T> {
        self.installations(Some(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTransport;
    use crate::types::{AppJob, AppUpload, Notification};
    use crate::ZendeskApiError;
    use reqwest::Method;
    use serde_json::json;
    use std::path::PathBuf;

    fn client(transport: MockTransport) -> HttpClient<MockTransport> {
        HttpClient::with_transport(transport)
    }

    fn assert_missing(err: ZendeskApiError, method: &str, expected: &[&str]) {
        match err {
            ZendeskApiError::MissingParameters { method: m, params } => {
                assert_eq!(m, method);
                assert_eq!(params, expected);
            }
            other => panic!("expected MissingParameters, got {other:?}"),
        }
    }

    #[test]
    fn test_upload_returns_object_unchanged() {
        let body = json!({"id": 12345, "extra": {"nested": [1, 2]}});
        let mut client = client(MockTransport::new().reply(201, body.clone()));
        let obj = client
            .apps()
            .upload(Params::new().with("file", "blob"))
            .unwrap();
        assert_eq!(obj.clone().into_value(), body);
        assert_eq!(obj.decode::<AppUpload>().unwrap().id, 12345);

        let requests = client.transport().requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::POST);
        assert_eq!(requests[0].endpoint.path(), "apps/uploads.json");
        assert_eq!(
            requests[0].body,
            RequestBody::Upload {
                field: "uploaded_data",
                path: PathBuf::from("blob"),
            }
        );
    }

    #[test]
    fn test_upload_requires_file() {
        let mut client = client(MockTransport::new());
        let err = client.apps().upload(Params::new()).unwrap_err();
        assert_missing(err, "Apps::upload", &["file"]);
        assert!(client.transport().requests().is_empty());
    }

    #[test]
    fn test_upload_rejects_200() {
        let mut client = client(MockTransport::new().reply(200, json!({"id": 1})));
        let err = client
            .apps()
            .upload(Params::new().with_file("file", "app.zip"))
            .unwrap_err();
        assert!(matches!(
            err,
            ZendeskApiError::ResponseError {
                method: "Apps::upload"
            }
        ));
    }

    #[test]
    fn test_create_sends_params_as_json() {
        let mut client = client(MockTransport::new().reply(202, json!({"job_id": "j-1"})));
        let obj = client
            .apps()
            .create(Params::new().with("name", "Timer").with("upload_id", 12345))
            .unwrap();
        assert_eq!(obj.decode::<AppJob>().unwrap().job_id, "j-1");

        let request = &client.transport().requests()[0];
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.endpoint.path(), "apps.json");
        assert_eq!(
            request.body,
            RequestBody::Json(json!({"name": "Timer", "upload_id": 12345}))
        );
    }

    #[test]
    fn test_create_enforces_no_params() {
        let mut client = client(MockTransport::new().reply(202, json!({"job_id": "j-2"})));
        assert!(client.apps().create(Params::new()).is_ok());
    }

    #[test]
    fn test_create_rejects_non_object_body() {
        let mut client = client(MockTransport::new().reply(202, json!(["j-1"])));
        let err = client.apps().create(Params::new()).unwrap_err();
        assert_eq!(err.method(), Some("Apps::create"));
    }

    #[test]
    fn test_job_status_get() {
        let body = json!({"id": "7", "status": "working", "progress": 1, "total": 2});
        let mut client = client(MockTransport::new().reply(200, body.clone()));
        let obj = client
            .apps()
            .job_status(Params::new().with("id", 7))
            .unwrap();
        assert_eq!(obj.into_value(), body);
        assert_eq!(
            client.transport().request_lines(),
            vec!["GET apps/job_statuses/7.json"]
        );
        assert_eq!(client.transport().requests()[0].body, RequestBody::None);
    }

    #[test]
    fn test_job_status_requires_id() {
        let mut client = client(MockTransport::new());
        let err = client.apps().job_status(Params::new()).unwrap_err();
        assert_missing(err, "Apps::job_status", &["id"]);
        assert!(client.transport().requests().is_empty());
    }

    #[test]
    fn test_job_status_does_not_consume_primed_id() {
        let mut client = client(MockTransport::new());
        let err = client.app(5).job_status(Params::new()).unwrap_err();
        assert_missing(err, "Apps::job_status", &["id"]);
        assert_eq!(client.last_id(ResourceKind::Apps), Some(5));
    }

    #[test]
    fn test_update_with_explicit_id() {
        let mut client = client(MockTransport::new().reply(200, json!({"id": 3})));
        client
            .apps()
            .update(Params::new().with("id", 3).with_file("file", "app.zip"))
            .unwrap();
        let request = &client.transport().requests()[0];
        assert_eq!(request.method, Method::PUT);
        assert_eq!(request.endpoint.path(), "apps/3.json");
        assert_eq!(
            request.body,
            RequestBody::Upload {
                field: "uploaded_data",
                path: PathBuf::from("app.zip"),
            }
        );
    }

    #[test]
    fn test_update_primed_id_is_one_shot() {
        let mut client = client(MockTransport::new().reply(200, json!({"id": 42})));
        let file = || Params::new().with_file("file", "app.zip");

        client.app(42).update(file()).unwrap();
        assert_eq!(client.transport().request_lines(), vec!["PUT apps/42.json"]);

        let err = client.apps().update(file()).unwrap_err();
        assert_missing(err, "Apps::update", &["file", "id"]);
        assert_eq!(client.transport().requests().len(), 1);
    }

    #[test]
    fn test_update_primed_id_overrides_param() {
        let mut client = client(MockTransport::new().reply(200, json!({})));
        client
            .app(42)
            .update(Params::new().with("id", 1).with_file("file", "app.zip"))
            .unwrap();
        assert_eq!(client.transport().request_lines(), vec!["PUT apps/42.json"]);
    }

    #[test]
    fn test_update_failed_validation_loses_primed_id() {
        let mut client = client(MockTransport::new());
        let err = client.app(42).update(Params::new()).unwrap_err();
        assert_missing(err, "Apps::update", &["file", "id"]);
        assert_eq!(client.last_id(ResourceKind::Apps), None);
    }

    #[test]
    fn test_update_rejects_wrong_status() {
        let mut client = client(MockTransport::new().reply(201, json!({"id": 3})));
        let err = client
            .app(3)
            .update(Params::new().with_file("file", "app.zip"))
            .unwrap_err();
        assert_eq!(err.method(), Some("Apps::update"));
    }

    #[test]
    fn test_delete_ignores_body() {
        let mut client = client(MockTransport::new().reply_raw(200, ""));
        assert!(client.apps().delete(Params::new().with("id", 9)).unwrap());
        assert_eq!(
            client.transport().request_lines(),
            vec!["DELETE apps/9.json"]
        );
    }

    #[test]
    fn test_delete_with_primed_id() {
        let mut client = client(MockTransport::new().reply_raw(200, "not json"));
        assert!(client.app(11).delete(Params::default()).unwrap());
        assert_eq!(
            client.transport().request_lines(),
            vec!["DELETE apps/11.json"]
        );
    }

    #[test]
    fn test_delete_rejects_204() {
        let mut client = client(MockTransport::new().reply_raw(204, ""));
        let err = client
            .apps()
            .delete(Params::new().with("id", 9))
            .unwrap_err();
        assert!(matches!(
            err,
            ZendeskApiError::ResponseError {
                method: "Apps::delete"
            }
        ));
    }

    #[test]
    fn test_delete_requires_id() {
        let mut client = client(MockTransport::new());
        let err = client.apps().delete(Params::default()).unwrap_err();
        assert_missing(err, "Apps::delete", &["id"]);
        assert!(client.transport().requests().is_empty());
    }

    #[test]
    fn test_send_notification() {
        let mut client = client(MockTransport::new().reply(200, json!({})));
        let notification = Notification {
            app_id: 31,
            event: "refresh".into(),
            body: json!({"ticket": 1}),
            agent_id: Some(4),
        };
        client
            .apps()
            .send_notification(Params::from_serialize(&notification).unwrap())
            .unwrap();
        let request = &client.transport().requests()[0];
        assert_eq!(request.endpoint.path(), "apps/notify.json");
        assert_eq!(
            request.body,
            RequestBody::Json(json!({
                "app_id": 31,
                "event": "refresh",
                "body": {"ticket": 1},
                "agent_id": 4
            }))
        );
    }

    #[test]
    fn test_sideload_reset_after_each_success() {
        let mut client = client(
            MockTransport::new()
                .reply(201, json!({"id": 1}))
                .reply(200, json!({}))
                .reply_raw(200, ""),
        );
        client.set_sideload(Some(vec!["users".into()]));
        client
            .apps()
            .upload(Params::new().with("file", "blob"))
            .unwrap();
        assert!(client.sideload().is_none());

        client.set_sideload(Some(vec!["app".into()]));
        client.apps().send_notification(Params::new()).unwrap();
        assert!(client.sideload().is_none());

        client.set_sideload(Some(vec![]));
        client.apps().delete(Params::new().with("id", 2)).unwrap();
        assert!(client.sideload().is_none());
    }

    #[test]
    fn test_id_stays_inside_its_segment() {
        let base = reqwest::Url::parse("https://acme.zendesk.com/api/v2/").unwrap();
        let mut client = client(
            MockTransport::new()
                .reply(200, json!({"id": "x"}))
                .reply_raw(200, ""),
        );
        client
            .apps()
            .job_status(Params::new().with("id", "../../users/1"))
            .unwrap();
        client
            .apps()
            .delete(Params::new().with("id", "5?x=1"))
            .unwrap();

        let requests = client.transport().requests();
        let job = requests[0].endpoint.url(&base).unwrap();
        assert_eq!(
            requests[0].endpoint.path(),
            "apps/job_statuses/..%2F..%2Fusers%2F1.json"
        );
        assert_eq!(
            job.as_str(),
            "https://acme.zendesk.com/api/v2/apps/job_statuses/..%2F..%2Fusers%2F1.json"
        );

        let delete = requests[1].endpoint.url(&base).unwrap();
        assert_eq!(requests[1].endpoint.path(), "apps/5%3Fx%3D1.json");
        assert_eq!(delete.path(), "/api/v2/apps/5%3Fx%3D1.json");
        assert_eq!(delete.query(), None);
    }

    #[test]
    fn test_every_operation_rejects_unexpected_status() {
        let cases = [
            ("Apps::upload", 200),
            ("Apps::create", 200),
            ("Apps::create", 201),
            ("Apps::job_status", 201),
            ("Apps::job_status", 404),
            ("Apps::update", 201),
            ("Apps::delete", 204),
            ("Apps::send_notification", 201),
            ("Apps::send_notification", 202),
        ];
        let with_id = || Params::new().with("id", 7);
        let with_file = || Params::new().with_file("file", "app.zip");

        for (method, status) in cases {
            let mut client = client(MockTransport::new().reply(status, json!({"id": 1})));
            client.set_sideload(Some(vec!["users".into()]));
            let mut apps = client.apps();
            let result = match method {
                "Apps::upload" => apps.upload(with_file()).map(drop),
                "Apps::create" => apps.create(Params::new()).map(drop),
                "Apps::job_status" => apps.job_status(with_id()).map(drop),
                "Apps::update" => apps.update(with_file().with("id", 7)).map(drop),
                "Apps::delete" => apps.delete(with_id()).map(drop),
                "Apps::send_notification" => apps.send_notification(Params::new()).map(drop),
                _ => unreachable!("no operation named {method}"),
            };
            let err = result.unwrap_err();
            assert!(
                matches!(err, ZendeskApiError::ResponseError { method: m } if m == method),
                "{method} accepted {status}: {err:?}"
            );
            assert_eq!(client.transport().requests().len(), 1);
            assert_eq!(client.debug().last_response_code, Some(status));
            assert!(client.sideload().is_some(), "{method} reset sideload on failure");
        }
    }

    #[test]
    fn test_transport_failure_propagates() {
        let mut client = client(MockTransport::new().fail_with("timed out"));
        let err = client
            .apps()
            .job_status(Params::new().with("id", "abc"))
            .unwrap_err();
        assert!(matches!(err, ZendeskApiError::Io(_)));
    }

    #[test]
    fn test_installations_delegation_primes_only_with_id() {
        let mut client = client(MockTransport::new());
        client.apps().installations(None);
        assert_eq!(client.last_id(ResourceKind::AppInstallations), None);

        client.apps().installations(Some(8));
        assert_eq!(client.last_id(ResourceKind::AppInstallations), Some(8));

        client.apps().installation(9);
        assert_eq!(client.last_id(ResourceKind::AppInstallations), Some(9));
        assert_eq!(client.last_id(ResourceKind::Apps), None);
    }
}

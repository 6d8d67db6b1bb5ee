/// WHMCS action API client.
///
/// Every remote call is a single POST of a form-encoded body to the configured
/// endpoint. `api_call` is the generic dispatcher and reports failures as
/// `ApiError`; the convenience methods wrap it with `fail_soft`, which logs the
/// failure once and hands the caller `None` instead.
///
/// Calls are fire-once: no retry, no backoff, and no timeout beyond whatever
/// the supplied `reqwest::Client` carries (the default carries none).
///
/// Reference: https://developers.whmcs.com/api/

use std::future::Future;

use gh_error::ApiError;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::Value;

use crate::action::{Params, RemoteAction};
use crate::config::ClientConfiguration;
use crate::navigate::Navigator;
use crate::types::{NewClient, OrderItem};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const PRODUCT_PAGE_SIZE: u32 = 100;
const ORDER_NOTES: &str = "Order created from website";

pub struct WhmcsClient {
    client: Client,
    config: ClientConfiguration,
}

impl WhmcsClient {
    pub fn new(config: ClientConfiguration) -> Self {
        Self::with_http_client(config, Client::new())
    }

    /// Share an existing connection pool.
    pub fn with_http_client(config: ClientConfiguration, client: Client) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ClientConfiguration {
        &self.config
    }

    /// Full request body for `action`: the action name and response type
    /// first, then the caller's fields, then credentials.
    pub fn build_form(&self, action: RemoteAction, params: Params) -> Params {
        let mut form = Params::new()
            .with("action", action.as_str())
            .with("responsetype", self.config.response_type());
        form.extend(params);
        for (key, value) in self.config.credentials().form_fields() {
            form.set(key, value);
        }
        form
    }

    /// Generic dispatcher. Returns the decoded JSON body untouched.
    pub async fn api_call(&self, action: RemoteAction, params: Params) -> Result<Value, ApiError> {
        let body = self.build_form(action, params).to_form_body();
        tracing::debug!(
            action = %action,
            endpoint = self.config.api_url(),
            auth = self.config.credentials().mode(),
            "dispatching WHMCS action"
        );

        let response = self
            .client
            .post(self.config.api_url())
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(|e| ApiError::network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Transport {
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::network(e.to_string()))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn call(&self, operation: &str, action: RemoteAction, params: Params) -> Option<Value> {
        fail_soft(operation, self.api_call(action, params)).await
    }

    // ------------------------------------------------------------------
    // Products
    // ------------------------------------------------------------------

    pub async fn get_products(&self) -> Option<Value> {
        let params = Params::new()
            .with("limitstart", 0)
            .with("limitnum", PRODUCT_PAGE_SIZE);
        self.call("get_products", RemoteAction::GetProducts, params).await
    }

    pub async fn get_product_pricing(&self, product_id: u32) -> Option<Value> {
        let params = Params::new().with("pid", product_id);
        self.call("get_product_pricing", RemoteAction::GetProducts, params)
            .await
    }

    // ------------------------------------------------------------------
    // Orders
    // ------------------------------------------------------------------

    pub async fn create_order(&self, client_id: u32, items: &[OrderItem]) -> Option<Value> {
        let request = async {
            let lineitems = serde_json::to_string(items).map_err(ApiError::from)?;
            let params = Params::new()
                .with("clientid", client_id)
                .with("paymentmethod", self.config.payment_method())
                .with("lineitems", lineitems)
                .with("notes", ORDER_NOTES);
            self.api_call(RemoteAction::CreateOrder, params).await
        };
        fail_soft("create_order", request).await
    }

    // ------------------------------------------------------------------
    // Clients
    // ------------------------------------------------------------------

    pub async fn get_client_info(&self, client_id: u32) -> Option<Value> {
        let params = Params::new().with("clientid", client_id);
        self.call("get_client_info", RemoteAction::GetClientsDetails, params)
            .await
    }

    pub async fn register_client(&self, client: &NewClient) -> Option<Value> {
        self.call("register_client", RemoteAction::AddClient, client.to_params())
            .await
    }

    pub async fn get_client_services(&self, client_id: u32) -> Option<Value> {
        let params = Params::new().with("clientid", client_id);
        self.call("get_client_services", RemoteAction::GetClientsServices, params)
            .await
    }

    // ------------------------------------------------------------------
    // Domains
    // ------------------------------------------------------------------

    pub async fn get_domain_pricing(&self, extension: &str) -> Option<Value> {
        let params = Params::new()
            .with("currencyid", self.config.currency_id())
            .with("domain", extension);
        self.call("get_domain_pricing", RemoteAction::GetDomainPricing, params)
            .await
    }

    pub async fn check_domain(&self, domain: &str) -> Option<Value> {
        let params = Params::new().with("domain", domain);
        self.call("check_domain", RemoteAction::CheckDomain, params)
            .await
    }

    // ------------------------------------------------------------------
    // Redirects
    // ------------------------------------------------------------------

    pub fn client_area_url(&self, path: &str) -> String {
        format!("{}{}", self.config.client_area(), path)
    }

    pub fn redirect_to_client_area(&self, navigator: &dyn Navigator, path: &str) {
        let url = self.client_area_url(path);
        tracing::info!(url = %url, "redirecting to client area");
        navigator.navigate(&url);
    }

    pub fn order_url(&self, product_id: u32) -> String {
        format!(
            "{}?action=productlist&id={}",
            self.config.client_area(),
            product_id
        )
    }

    pub fn order_product(&self, navigator: &dyn Navigator, product_id: u32) {
        let url = self.order_url(product_id);
        tracing::info!(product_id, url = %url, "redirecting to order page");
        navigator.navigate(&url);
    }
}

/// Await `request`; on failure log one error naming `operation` and return
/// `None`. This is the only place API errors are swallowed.
pub async fn fail_soft<T, F>(operation: &str, request: F) -> Option<T>
where
    F: Future<Output = Result<T, ApiError>>,
{
    match request.await {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::error!(
                operation = operation,
                kind = err.kind(),
                error = %err,
                "WHMCS request failed"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigate::RecordingNavigator;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use tracing::field::{Field, Visit};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const AREA: &str = "https://billing.example.com/clientarea.php";

    #[derive(Debug)]
    struct CapturedEvent {
        level: Level,
        fields: HashMap<String, String>,
    }

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<CapturedEvent>>>);

    impl Capture {
        fn errors(&self) -> Vec<HashMap<String, String>> {
            self.0
                .lock()
                .unwrap()
                .iter()
                .filter(|e| e.level == Level::ERROR)
                .map(|e| e.fields.clone())
                .collect()
        }
    }

    #[derive(Default)]
    struct Fields(HashMap<String, String>);

    impl Visit for Fields {
        fn record_str(&mut self, field: &Field, value: &str) {
            self.0.insert(field.name().to_string(), value.to_string());
        }

        fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
            self.0.insert(field.name().to_string(), format!("{:?}", value));
        }
    }

    impl<S: Subscriber> Layer<S> for Capture {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut fields = Fields::default();
            event.record(&mut fields);
            self.0.lock().unwrap().push(CapturedEvent {
                level: *event.metadata().level(),
                fields: fields.0,
            });
        }
    }

    fn capture_logs() -> (Capture, tracing::subscriber::DefaultGuard) {
        let capture = Capture::default();
        let subscriber = tracing_subscriber::registry().with(capture.clone());
        let guard = tracing::subscriber::set_default(subscriber);
        (capture, guard)
    }

    fn client_for(api_url: &str) -> WhmcsClient {
        let config = ClientConfiguration::builder(api_url, AREA)
            .key_pair("ak", "sk")
            .build()
            .unwrap();
        // Bypass any proxy from the environment; the mock servers are local.
        let http = Client::builder().no_proxy().build().unwrap();
        WhmcsClient::with_http_client(config, http)
    }

    async fn server_responding(template: ResponseTemplate) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/includes/api.php"))
            .respond_with(template)
            .mount(&server)
            .await;
        server
    }

    fn api_url(server: &MockServer) -> String {
        format!("{}/includes/api.php", server.uri())
    }

    #[test]
    fn every_action_carries_name_and_response_type() {
        let client = client_for("https://billing.example.com/includes/api.php");
        for action in RemoteAction::ALL {
            let form = client.build_form(action, Params::new());
            assert_eq!(form.get("action"), Some(action.as_str()));
            assert_eq!(form.get("responsetype"), Some("json"));
            let body = form.to_form_body();
            assert!(body.starts_with(&format!("action={}&responsetype=json", action)));
        }
    }

    #[test]
    fn key_pair_credentials_exclude_login_fields() {
        let config = ClientConfiguration::builder("https://b.example.com/api.php", AREA)
            .key_pair("ak", "sk")
            .login("admin", "pw")
            .build()
            .unwrap();
        let form = WhmcsClient::new(config).build_form(RemoteAction::GetProducts, Params::new());
        assert_eq!(form.get("accesskey"), Some("ak"));
        assert_eq!(form.get("secretkey"), Some("sk"));
        assert!(!form.contains_key("username"));
        assert!(!form.contains_key("password"));
    }

    #[test]
    fn login_credentials_exclude_key_fields() {
        let config = ClientConfiguration::builder("https://b.example.com/api.php", AREA)
            .login("admin", "pw")
            .build()
            .unwrap();
        let form = WhmcsClient::new(config).build_form(RemoteAction::CheckDomain, Params::new());
        assert_eq!(form.get("username"), Some("admin"));
        assert_eq!(form.get("password"), Some("pw"));
        assert!(!form.contains_key("accesskey"));
        assert!(!form.contains_key("secretkey"));
    }

    #[test]
    fn anonymous_config_sends_no_credentials() {
        let config = ClientConfiguration::builder("https://b.example.com/api.php", AREA)
            .build()
            .unwrap();
        let form = WhmcsClient::new(config)
            .build_form(RemoteAction::GetProducts, Params::new().with("pid", 1));
        for key in ["accesskey", "secretkey", "username", "password"] {
            assert!(!form.contains_key(key), "unexpected {}", key);
        }
        assert_eq!(form.len(), 3);
    }

    #[test]
    fn caller_params_override_builtins_but_not_credentials() {
        let client = client_for("https://b.example.com/api.php");
        let params = Params::new()
            .with("responsetype", "xml")
            .with("accesskey", "spoofed");
        let form = client.build_form(RemoteAction::GetProducts, params);
        assert_eq!(form.get("responsetype"), Some("xml"));
        assert_eq!(form.get("accesskey"), Some("ak"));
    }

    #[tokio::test]
    async fn posts_form_encoded_body_and_returns_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/includes/api.php"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string_contains("action=CheckDomain"))
            .and(body_string_contains("responsetype=json"))
            .and(body_string_contains("domain=frag.gg"))
            .and(body_string_contains("accesskey=ak"))
            .and(body_string_contains("secretkey=sk"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "result": "success", "available": true })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&api_url(&server));
        let response = client.check_domain("frag.gg").await;
        assert_eq!(
            response,
            Some(json!({ "result": "success", "available": true }))
        );
    }

    #[tokio::test]
    async fn http_error_yields_none_and_one_error_log() {
        let server = server_responding(ResponseTemplate::new(500)).await;
        let client = client_for(&api_url(&server));

        let (capture, _guard) = capture_logs();
        assert!(client.get_products().await.is_none());

        let errors = capture.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].get("operation").map(String::as_str), Some("get_products"));
        assert_eq!(errors[0].get("kind").map(String::as_str), Some("transport"));
    }

    #[tokio::test]
    async fn dispatcher_reports_transport_status() {
        let server = server_responding(ResponseTemplate::new(403)).await;
        let client = client_for(&api_url(&server));
        let err = client
            .api_call(RemoteAction::GetClientsDetails, Params::new().with("clientid", 9))
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::Transport { status: 403 });
    }

    #[tokio::test]
    async fn malformed_json_yields_none() {
        let server =
            server_responding(ResponseTemplate::new(200).set_body_string("<html>oops")).await;
        let client = client_for(&api_url(&server));

        let (capture, _guard) = capture_logs();
        assert!(client.get_client_info(7).await.is_none());
        let errors = capture.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].get("kind").map(String::as_str), Some("decode"));

        let err = client
            .api_call(RemoteAction::GetClientsDetails, Params::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "decode");
    }

    #[tokio::test]
    async fn connection_failure_yields_none() {
        // Nothing listens on port 1.
        let client = client_for("http://127.0.0.1:1/includes/api.php");

        let (capture, _guard) = capture_logs();
        assert!(client.get_domain_pricing(".com").await.is_none());
        let errors = capture.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].get("operation").map(String::as_str),
            Some("get_domain_pricing")
        );
        assert_eq!(errors[0].get("kind").map(String::as_str), Some("network"));
    }

    #[tokio::test]
    async fn create_order_sends_json_line_items() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("action=CreateOrder"))
            .and(body_string_contains("clientid=12"))
            .and(body_string_contains("paymentmethod=paypal"))
            .and(body_string_contains(
                "lineitems=%5B%7B%22pid%22%3A4%7D%5D",
            ))
            .and(body_string_contains("notes=Order+created+from+website"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "orderid": 88 })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&format!("{}/api.php", server.uri()));
        let response = client.create_order(12, &[OrderItem::product(4)]).await;
        assert_eq!(response.unwrap()["orderid"], 88);
    }

    #[tokio::test]
    async fn product_pricing_requests_single_product() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("action=GetProducts"))
            .and(body_string_contains("pid=7"))
            .and(body_string_contains("accesskey=ak"))
            .and(body_string_contains("secretkey=sk"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "products": { "product": [ { "pid": 7, "pricing": { "monthly": "9.99" } } ] }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&format!("{}/api.php", server.uri()));
        let response = client.get_product_pricing(7).await.unwrap();
        assert_eq!(response["products"]["product"][0]["pid"], 7);
    }

    #[tokio::test]
    async fn register_client_sends_every_profile_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("action=AddClient"))
            .and(body_string_contains("firstname=Ada"))
            .and(body_string_contains("lastname=Lovelace"))
            .and(body_string_contains("email=ada%40example.com"))
            .and(body_string_contains("address1=12+Analytical+Row"))
            .and(body_string_contains("city=London"))
            .and(body_string_contains("state=Greater+London"))
            .and(body_string_contains("postcode=N1"))
            .and(body_string_contains("country=GB"))
            .and(body_string_contains("phonenumber=555-0100"))
            .and(body_string_contains("password2=engine"))
            .and(body_string_contains("companyname=Difference"))
            .and(body_string_contains("accesskey=ak"))
            .and(body_string_contains("secretkey=sk"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": "success",
                "clientid": 31
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&format!("{}/api.php", server.uri()));
        let new_client = NewClient {
            firstname: "Ada".into(),
            lastname: "Lovelace".into(),
            email: "ada@example.com".into(),
            address1: "12 Analytical Row".into(),
            city: "London".into(),
            state: "Greater London".into(),
            postcode: "N1".into(),
            country: "GB".into(),
            phonenumber: "555-0100".into(),
            password2: "engine".into(),
            companyname: Some("Difference".into()),
        };
        let response = client.register_client(&new_client).await.unwrap();
        assert_eq!(response["clientid"], 31);
    }

    #[tokio::test]
    async fn product_listing_requests_first_page() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("action=GetProducts"))
            .and(body_string_contains("limitstart=0"))
            .and(body_string_contains("limitnum=100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "products": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&format!("{}/api.php", server.uri()));
        assert_eq!(client.get_products().await, Some(json!({ "products": [] })));
    }

    #[test]
    fn order_product_navigates_to_product_list() {
        let client = client_for("https://billing.example.com/includes/api.php");
        let navigator = RecordingNavigator::new();
        client.order_product(&navigator, 4);
        assert_eq!(
            navigator.last().as_deref(),
            Some("https://billing.example.com/clientarea.php?action=productlist&id=4")
        );
    }

    #[test]
    fn client_area_redirect_appends_path() {
        let client = client_for("https://billing.example.com/includes/api.php");
        let navigator = RecordingNavigator::new();
        client.redirect_to_client_area(&navigator, "");
        client.redirect_to_client_area(&navigator, "?action=invoices");
        assert_eq!(
            navigator.visited(),
            vec![
                AREA.to_string(),
                format!("{}?action=invoices", AREA),
            ]
        );
    }

    #[tokio::test]
    async fn separate_clients_keep_their_own_configuration() {
        let staging = MockServer::start().await;
        let production = MockServer::start().await;
        for (server, tag) in [(&staging, "staging"), (&production, "production")] {
            Mock::given(method("POST"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "env": tag })))
                .mount(server)
                .await;
        }

        let a = client_for(&format!("{}/api.php", staging.uri()));
        let b = client_for(&format!("{}/api.php", production.uri()));
        assert_eq!(a.get_client_services(1).await.unwrap()["env"], "staging");
        assert_eq!(b.get_client_services(1).await.unwrap()["env"], "production");
    }
}

//! Remote services and the transport boundary.
//!
//! A [`Service`] turns a finished [`ParameterFilter`] chain into a
//! [`CallRequest`]: the request headers the API reads the object id, mask,
//! filter and result window from. Moving the request over the wire is the
//! job of a [`Transport`].

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::filter::{FilterTarget, ParameterFilter};
use crate::mask::MaskLiteral;
use crate::object_filter::ObjectFilter;
use crate::{Config, Result};

/// Prefix every remote service name carries.
pub const SERVICE_PREFIX: &str = "SoftLayer_";

/// Header holding the object mask.
pub const OBJECT_MASK_HEADER: &str = "SoftLayer_ObjectMask";

/// Header holding the result window.
pub const RESULT_LIMIT_HEADER: &str = "resultLimit";

/// One call, ready for a transport to encode and send.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallRequest {
    /// Endpoint URL for the service.
    pub url: String,
    pub service: String,
    pub method: String,
    pub headers: Map<String, Value>,
    pub args: Vec<Value>,
    pub user_agent: String,
    pub timeout_secs: u64,
}

/// Moves a [`CallRequest`] to the API and decodes the response.
///
/// Implementations own the wire encoding and map remote faults to
/// [`crate::Error::Fault`].
pub trait Transport: Send + Sync {
    fn call(&self, request: &CallRequest) -> Result<Value>;
}

/// A named remote service such as `SoftLayer_Account`.
#[derive(Clone)]
pub struct Service {
    name: String,
    config: Config,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Service")
            .field("name", &self.name)
            .field("endpoint_url", &self.config.endpoint_url)
            .finish_non_exhaustive()
    }
}

impl Service {
    /// Create a service. `Account` and `SoftLayer_Account` name the same one.
    pub fn new(name: &str, config: Config, transport: Arc<dyn Transport>) -> Self {
        Self {
            name: normalize_service_name(name),
            config,
            transport,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Start a filter chain with no options.
    pub fn filter(&self) -> ParameterFilter<'_, Self> {
        ParameterFilter::new(self)
    }

    pub fn object_with_id(&self, id: impl Into<Value>) -> Result<ParameterFilter<'_, Self>> {
        self.filter().with_object_id(id)
    }

    pub fn object_mask<I, M>(&self, fragments: I) -> Result<ParameterFilter<'_, Self>>
    where
        I: IntoIterator<Item = M>,
        M: Into<MaskLiteral>,
    {
        self.filter().with_object_mask(fragments)
    }

    pub fn result_limit(&self, offset: i64, limit: i64) -> ParameterFilter<'_, Self> {
        self.filter().with_result_window(offset, limit)
    }

    pub fn object_filter(&self, filter: ObjectFilter) -> ParameterFilter<'_, Self> {
        self.filter().with_object_filter(filter)
    }

    /// Call `method` without any per-call options.
    pub fn call(&self, method: &str, args: Vec<Value>) -> Result<Value> {
        self.filter().invoke(method, args)
    }

    /// Build the request a filter chain would send, without sending it.
    pub fn request_for(&self, method: &str, filter: &ParameterFilter<'_, Self>, args: Vec<Value>) -> Result<CallRequest> {
        let mut headers = Map::new();

        if let Some(id) = filter.object_id() {
            headers.insert(format!("{}InitParameters", self.name), json!({ "id": id }));
        }
        if let Some(mask) = filter.server_object_mask()? {
            headers.insert(OBJECT_MASK_HEADER.to_string(), json!({ "mask": mask }));
        }
        if let Some(object_filter) = filter.server_object_filter() {
            headers.insert(format!("{}ObjectFilter", self.name), object_filter.to_value());
        }
        if let Some(limit) = filter.result_limit() {
            headers.insert(
                RESULT_LIMIT_HEADER.to_string(),
                json!({ "offset": filter.result_offset().unwrap_or(0), "limit": limit }),
            );
        }

        Ok(CallRequest {
            url: service_url(&self.config.endpoint_url, &self.name),
            service: self.name.clone(),
            method: method.to_string(),
            headers,
            args,
            user_agent: self.config.user_agent.clone(),
            timeout_secs: self.config.timeout_secs,
        })
    }
}

impl FilterTarget for Service {
    type Output = Result<Value>;

    fn call_with_filter(&self, method: &str, filter: &ParameterFilter<'_, Self>, args: Vec<Value>) -> Result<Value> {
        let request = self.request_for(method, filter, args)?;
        log::debug!(
            "calling {}::{} with headers {:?}",
            request.service,
            request.method,
            request.headers.keys().collect::<Vec<_>>()
        );
        self.transport.call(&request)
    }
}

/// Prefix bare service names with `SoftLayer_`.
pub fn normalize_service_name(name: &str) -> String {
    let name = name.trim();
    if name.starts_with(SERVICE_PREFIX) {
        name.to_string()
    } else {
        format!("{}{}", SERVICE_PREFIX, name)
    }
}

fn service_url(endpoint_url: &str, service: &str) -> String {
    format!("{}/{}", endpoint_url.trim_end_matches('/'), service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records requests and answers with a fixed value.
    #[derive(Default)]
    struct Recorder {
        requests: Mutex<Vec<CallRequest>>,
    }

    impl Transport for Recorder {
        fn call(&self, request: &CallRequest) -> Result<Value> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(json!({"ok": true}))
        }
    }

    struct Faulting;

    impl Transport for Faulting {
        fn call(&self, _request: &CallRequest) -> Result<Value> {
            Err(crate::Error::Fault {
                code: "SoftLayer_Exception_ObjectNotFound".to_string(),
                message: "Unable to find object".to_string(),
            })
        }
    }

    fn account(transport: Arc<dyn Transport>) -> Service {
        Service::new("Account", Config::with_endpoint("https://api.example.test/xmlrpc/v3.1/"), transport)
    }

    #[test]
    fn test_service_name_normalized() {
        assert_eq!(normalize_service_name("Account"), "SoftLayer_Account");
        assert_eq!(normalize_service_name("SoftLayer_Hardware_Server"), "SoftLayer_Hardware_Server");
    }

    #[test]
    fn test_plain_call_has_no_headers() {
        let recorder = Arc::new(Recorder::default());
        let service = account(recorder.clone());

        let result = service.call("getObject", vec![]).unwrap();
        assert_eq!(result, json!({"ok": true}));

        let requests = recorder.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "https://api.example.test/xmlrpc/v3.1/SoftLayer_Account");
        assert_eq!(requests[0].method, "getObject");
        assert!(requests[0].headers.is_empty());
    }

    #[test]
    fn test_filter_chain_becomes_headers() {
        let recorder = Arc::new(Recorder::default());
        let service = account(recorder.clone());
        let filter = ObjectFilter::new()
            .with_criteria("hardware.hostname", ObjectFilter::operation("web1"))
            .unwrap();

        service
            .object_with_id(1234)
            .unwrap()
            .with_object_mask(["mask.id", "mask.hostname"])
            .unwrap()
            .with_object_filter(filter)
            .with_result_window(0, 25)
            .invoke("getHardware", vec![json!(true)])
            .unwrap();

        let requests = recorder.requests.lock().unwrap();
        let request = &requests[0];
        assert_eq!(
            Value::Object(request.headers.clone()),
            json!({
                "SoftLayer_AccountInitParameters": {"id": 1234},
                "SoftLayer_ObjectMask": {"mask": "mask[id,hostname]"},
                "SoftLayer_AccountObjectFilter": {"hardware": {"hostname": {"operation": "web1"}}},
                "resultLimit": {"offset": 0, "limit": 25}
            })
        );
        assert_eq!(request.args, vec![json!(true)]);
    }

    #[test]
    fn test_empty_object_filter_is_not_sent() {
        let service = account(Arc::new(Recorder::default()));
        let request = service
            .request_for("getObject", &service.object_filter(ObjectFilter::new()), vec![])
            .unwrap();
        assert!(request.headers.is_empty());
    }

    #[test]
    fn test_stored_chain_branches() {
        let recorder = Arc::new(Recorder::default());
        let service = account(recorder.clone());
        let server = service.object_with_id(7).unwrap();

        server.with_object_mask(["mask.id"]).unwrap().invoke("getObject", vec![]).unwrap();
        server.invoke("getObject", vec![]).unwrap();

        let requests = recorder.requests.lock().unwrap();
        assert!(requests[0].headers.contains_key(OBJECT_MASK_HEADER));
        assert!(!requests[1].headers.contains_key(OBJECT_MASK_HEADER));
        assert!(requests[1].headers.contains_key("SoftLayer_AccountInitParameters"));
    }

    #[test]
    fn test_transport_fault_is_returned() {
        let service = account(Arc::new(Faulting));
        let err = service.call("getObject", vec![]).unwrap_err();
        assert!(err.to_string().contains("SoftLayer_Exception_ObjectNotFound"));
    }

    #[test]
    fn test_request_serializes() {
        let service = account(Arc::new(Recorder::default()));
        let request = service.request_for("getObject", &service.result_limit(5, 10), vec![]).unwrap();
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["service"], json!("SoftLayer_Account"));
        assert_eq!(value["headers"]["resultLimit"], json!({"offset": 5, "limit": 10}));
        assert_eq!(value["timeout_secs"], json!(60));
    }
}

pub mod http;
pub mod registry;

pub use http::TargetClient;
pub use registry::StaticResolver;

use serde_json::Value;

use crate::error::DispatchError;
use crate::state_machine::{Action, Method};

/// A client bound to one resolved target.
pub trait HttpClient {
    async fn post(&self, path: &str, body: &Value) -> Result<(), DispatchError>;
    async fn put(&self, path: &str, body: &Value) -> Result<(), DispatchError>;
    async fn delete(&self, path: &str) -> Result<(), DispatchError>;
}

/// Turns a logical target name into a reachable client.
pub trait ClientResolver {
    type Client: HttpClient;

    /// `None` when the name is unknown. That is not an error here; the
    /// worker turns it into a crashed job.
    async fn get_client(&self, target: &str) -> Option<Self::Client>;
}

/// Send `action` through `client` using its method, path and body.
/// `DELETE` carries no body.
pub async fn dispatch<C: HttpClient>(
    client: &C,
    method: Method,
    action: &Action,
) -> Result<(), DispatchError> {
    match method {
        Method::Post => client.post(&action.path, action.body()).await,
        Method::Put => client.put(&action.path, action.body()).await,
        Method::Delete => client.delete(&action.path).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_machine::Payload;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<(String, String, Option<Value>)>>,
    }

    impl HttpClient for Recorder {
        async fn post(&self, path: &str, body: &Value) -> Result<(), DispatchError> {
            self.calls
                .lock()
                .unwrap()
                .push(("POST".into(), path.into(), Some(body.clone())));
            Ok(())
        }

        async fn put(&self, path: &str, body: &Value) -> Result<(), DispatchError> {
            self.calls
                .lock()
                .unwrap()
                .push(("PUT".into(), path.into(), Some(body.clone())));
            Err(DispatchError::Rejected("put refused".into()))
        }

        async fn delete(&self, path: &str) -> Result<(), DispatchError> {
            self.calls
                .lock()
                .unwrap()
                .push(("DELETE".into(), path.into(), None));
            Ok(())
        }
    }

    fn action(method: &str) -> Action {
        Action {
            target: "svc".into(),
            method: method.into(),
            path: "/items/7".into(),
            payload: Payload {
                body: json!({ "qty": 2 }),
            },
            trace: None,
        }
    }

    #[tokio::test]
    async fn post_sends_body() {
        let client = Recorder::default();
        dispatch(&client, Method::Post, &action("POST")).await.unwrap();

        let calls = client.calls.lock().unwrap();
        assert_eq!(
            calls[0],
            ("POST".into(), "/items/7".into(), Some(json!({ "qty": 2 })))
        );
    }

    #[tokio::test]
    async fn put_errors_propagate() {
        let client = Recorder::default();
        let err = dispatch(&client, Method::Put, &action("PUT")).await.unwrap_err();
        assert_eq!(err.to_string(), "put refused");
    }

    #[tokio::test]
    async fn delete_sends_no_body() {
        let client = Recorder::default();
        dispatch(&client, Method::Delete, &action("DELETE"))
            .await
            .unwrap();

        let calls = client.calls.lock().unwrap();
        assert_eq!(calls[0], ("DELETE".into(), "/items/7".into(), None));
    }
}

//! Route handlers organized by resource

pub mod health;
pub mod medias;
pub mod tweets;
pub mod users;

use axum::Json;
use serde::Serialize;

/// Success envelope: `{"result": true, ...payload}`
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub result: bool,
    #[serde(flatten)]
    pub payload: T,
}

/// Payload of responses that carry nothing but the result flag
#[derive(Debug, Serialize)]
pub struct Done {}

pub fn ok<T: Serialize>(payload: T) -> Json<Envelope<T>> {
    Json(Envelope {
        result: true,
        payload,
    })
}

pub fn done() -> Json<Envelope<Done>> {
    ok(Done {})
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_flattens_payload() {
        #[derive(Serialize)]
        struct Created {
            tweet_id: i64,
        }

        let Json(body) = ok(Created { tweet_id: 5 });
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            serde_json::json!({"result": true, "tweet_id": 5})
        );

        let Json(body) = done();
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            serde_json::json!({"result": true})
        );
    }
}

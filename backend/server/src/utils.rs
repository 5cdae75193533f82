use serde_json::Value;

use crate::{error::RelayError, upstream::UpstreamReply};

/// Maps what the Apps Script sent back onto the relay's outcome.
///
/// Plain text on a 2xx counts as success.
pub fn interpret_reply(reply: UpstreamReply) -> Result<Value, RelayError> {
    if !reply.status.is_success() {
        return Err(RelayError::UpstreamStatus(reply.body));
    }

    match serde_json::from_str::<Value>(&reply.body) {
        Ok(parsed) if parsed.get("ok") == Some(&Value::Bool(false)) => {
            Err(RelayError::UpstreamRejected(parsed))
        }
        Ok(parsed) => Ok(parsed),
        Err(_) => Ok(Value::String(reply.body)),
    }
}

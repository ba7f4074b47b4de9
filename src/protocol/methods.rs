//! JSON-RPC method names of the A2A protocol

pub const MESSAGE_SEND: &str = "message/send";
pub const MESSAGE_STREAM: &str = "message/stream";
pub const TASKS_GET: &str = "tasks/get";
pub const TASKS_CANCEL: &str = "tasks/cancel";
pub const TASKS_RESUBSCRIBE: &str = "tasks/resubscribe";
pub const TASKS_PUSH_NOTIFICATION_CONFIG_SET: &str = "tasks/pushNotificationConfig/set";
pub const TASKS_PUSH_NOTIFICATION_CONFIG_GET: &str = "tasks/pushNotificationConfig/get";

/// Every method an agent may be asked to handle
pub const ALL: [&str; 7] = [
    MESSAGE_SEND,
    MESSAGE_STREAM,
    TASKS_GET,
    TASKS_CANCEL,
    TASKS_RESUBSCRIBE,
    TASKS_PUSH_NOTIFICATION_CONFIG_SET,
    TASKS_PUSH_NOTIFICATION_CONFIG_GET,
];

/// Methods answered with a server-sent event stream
pub fn is_streaming_method(method: &str) -> bool {
    matches!(method, MESSAGE_STREAM | TASKS_RESUBSCRIBE)
}

pub fn is_valid_method(method: &str) -> bool {
    ALL.contains(&method)
}

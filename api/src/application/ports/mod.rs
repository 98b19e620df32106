pub mod edms_client;
pub mod ui_event_publisher;

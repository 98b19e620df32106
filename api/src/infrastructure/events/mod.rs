pub mod publisher_broadcast;

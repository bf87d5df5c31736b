//! Resources exposed by the service

pub mod invoice;

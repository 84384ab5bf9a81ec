//! Request execution plumbing shared by the service clients.

pub mod http;

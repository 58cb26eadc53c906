mod conversation;
mod http_transport;

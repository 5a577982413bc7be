// TCP module - Client acceptance
pub mod acceptor;

pub use acceptor::ConnectionAcceptor;

mod session;

pub use session::SessionId;

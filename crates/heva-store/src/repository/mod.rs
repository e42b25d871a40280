//! In-memory repository implementations.

mod business;
mod session;
mod user;

pub use business::MemBusinessRepository;
pub use session::MemSessionRepository;
pub use user::MemUserRepository;

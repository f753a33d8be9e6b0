pub mod hash;
pub mod password;
pub mod username_allocator;

pub use username_allocator::{AllocateUsernameError, UsernameAllocator};

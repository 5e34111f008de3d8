pub mod clock;
pub mod ids;
pub mod password;

pub use clock::Clock;
pub use ids::IdGenerator;
pub use password::PasswordEncoder;

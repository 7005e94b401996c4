mod health;
mod socket;

pub(crate) use self::health::health;
pub(crate) use self::socket::socket;
pub use self::socket::dispatch;
